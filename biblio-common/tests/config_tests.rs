//! Unit tests for configuration resolution and graceful degradation
//!
//! Note: Uses the serial_test crate to prevent ENV variable race
//! conditions. Every test that reads or writes BIBLIO_* variables is
//! marked with #[serial] to ensure they run sequentially, not in
//! parallel.

use biblio_common::config::{
    default_database_path, Mode, Overrides, Settings, TomlConfig, DEFAULT_PORT,
};
use serial_test::serial;
use std::env;
use std::path::PathBuf;

fn clear_biblio_env() {
    env::remove_var("BIBLIO_DATABASE");
    env::remove_var("BIBLIO_PORT");
    env::remove_var("BIBLIO_MODE");
}

#[test]
#[serial]
fn test_defaults_when_nothing_configured() {
    clear_biblio_env();

    let settings = Settings::resolve_with(Overrides::default(), &TomlConfig::default()).unwrap();

    assert_eq!(settings.mode, Mode::Development);
    assert_eq!(settings.port, DEFAULT_PORT);
    assert_eq!(settings.database_path, default_database_path());
    assert_eq!(settings.log_level, "info");
}

#[test]
#[serial]
fn test_env_variables_apply() {
    clear_biblio_env();
    env::set_var("BIBLIO_PORT", "9001");
    env::set_var("BIBLIO_DATABASE", "/tmp/biblio-test-env.db");
    env::set_var("BIBLIO_MODE", "production");

    let settings = Settings::resolve_with(Overrides::default(), &TomlConfig::default()).unwrap();

    assert_eq!(settings.port, 9001);
    assert_eq!(settings.database_path, PathBuf::from("/tmp/biblio-test-env.db"));
    assert_eq!(settings.mode, Mode::Production);

    clear_biblio_env();
}

#[test]
#[serial]
fn test_cli_overrides_beat_env() {
    clear_biblio_env();
    env::set_var("BIBLIO_PORT", "9001");
    env::set_var("BIBLIO_DATABASE", "/tmp/biblio-from-env.db");

    let overrides = Overrides {
        database: Some(PathBuf::from("/tmp/biblio-from-cli.db")),
        port: Some(9002),
        mode: None,
    };
    let settings = Settings::resolve_with(overrides, &TomlConfig::default()).unwrap();

    assert_eq!(settings.port, 9002);
    assert_eq!(settings.database_path, PathBuf::from("/tmp/biblio-from-cli.db"));

    clear_biblio_env();
}

#[test]
#[serial]
fn test_env_beats_toml() {
    clear_biblio_env();
    env::set_var("BIBLIO_PORT", "9003");

    let toml_config: TomlConfig = toml::from_str(
        r#"
        port = 7000
        database = "/tmp/biblio-from-toml.db"
        "#,
    )
    .unwrap();
    let settings = Settings::resolve_with(Overrides::default(), &toml_config).unwrap();

    // Port comes from the environment, database from TOML
    assert_eq!(settings.port, 9003);
    assert_eq!(settings.database_path, PathBuf::from("/tmp/biblio-from-toml.db"));

    clear_biblio_env();
}

#[test]
#[serial]
fn test_toml_tier_applies_when_no_overrides() {
    clear_biblio_env();

    let toml_config: TomlConfig = toml::from_str(
        r#"
        port = 7000
        mode = "production"
        database = "/tmp/biblio-toml-only.db"

        [logging]
        level = "debug"
        "#,
    )
    .unwrap();
    let settings = Settings::resolve_with(Overrides::default(), &toml_config).unwrap();

    assert_eq!(settings.port, 7000);
    assert_eq!(settings.mode, Mode::Production);
    assert_eq!(settings.database_path, PathBuf::from("/tmp/biblio-toml-only.db"));
    assert_eq!(settings.log_level, "debug");
}

#[test]
#[serial]
fn test_invalid_env_port_falls_through() {
    clear_biblio_env();
    env::set_var("BIBLIO_PORT", "not-a-port");

    let settings = Settings::resolve_with(Overrides::default(), &TomlConfig::default()).unwrap();

    // Unparseable value is ignored, not fatal
    assert_eq!(settings.port, DEFAULT_PORT);

    clear_biblio_env();
}

#[test]
#[serial]
fn test_invalid_mode_falls_through() {
    clear_biblio_env();
    env::set_var("BIBLIO_MODE", "staging");

    let settings = Settings::resolve_with(Overrides::default(), &TomlConfig::default()).unwrap();

    assert_eq!(settings.mode, Mode::Development);

    clear_biblio_env();
}

#[test]
#[serial]
fn test_production_without_database_is_an_error() {
    clear_biblio_env();
    env::set_var("BIBLIO_MODE", "production");

    let result = Settings::resolve_with(Overrides::default(), &TomlConfig::default());

    assert!(result.is_err());

    clear_biblio_env();
}

#[test]
#[serial]
fn test_production_with_database_resolves() {
    clear_biblio_env();
    env::set_var("BIBLIO_MODE", "production");
    env::set_var("BIBLIO_DATABASE", "/srv/biblio/biblio.db");

    let settings = Settings::resolve_with(Overrides::default(), &TomlConfig::default()).unwrap();

    assert_eq!(settings.mode, Mode::Production);
    assert_eq!(settings.database_path, PathBuf::from("/srv/biblio/biblio.db"));

    clear_biblio_env();
}

#[test]
fn test_toml_config_all_fields_optional() {
    // An empty file is a valid config
    let toml_config: TomlConfig = toml::from_str("").unwrap();

    assert!(toml_config.database.is_none());
    assert!(toml_config.port.is_none());
    assert!(toml_config.mode.is_none());
    assert_eq!(toml_config.logging.level, "info");
    assert!(toml_config.logging.file.is_none());
}

#[test]
fn test_toml_config_rejects_malformed_input() {
    let result = toml::from_str::<TomlConfig>("port = \"not a number\"");
    assert!(result.is_err());
}
