//! Configuration loading and settings resolution
//!
//! Settings come from four tiers, highest priority first:
//! 1. Command-line arguments
//! 2. Environment variables (`BIBLIO_DATABASE`, `BIBLIO_PORT`, `BIBLIO_MODE`)
//! 3. TOML config file (`~/.config/biblio/biblio.toml`, then
//!    `/etc/biblio/biblio.toml` on Linux)
//! 4. Compiled defaults
//!
//! A missing or unreadable config file never aborts startup; resolution
//! falls through to the next tier with a warning.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::warn;

/// Default HTTP listening port
pub const DEFAULT_PORT: u16 = 8086;

/// Runtime mode
///
/// Development mode points at an embedded file-backed SQLite database
/// and fills in a default path when none is configured. Production mode
/// requires the database location to be supplied explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Development,
    Production,
}

impl Mode {
    /// Parse a mode name. Accepts the full name or its short form.
    pub fn parse(value: &str) -> Option<Mode> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Some(Mode::Development),
            "production" | "prod" => Some(Mode::Production),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Development => "development",
            Mode::Production => "production",
        }
    }
}

/// Bootstrap configuration loaded from the TOML file
///
/// These settings cannot change during runtime. The application must
/// restart to pick up changes to the TOML file.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    /// Path to the SQLite database file (relative or absolute)
    #[serde(default)]
    pub database: Option<PathBuf>,

    /// HTTP server port
    #[serde(default)]
    pub port: Option<u16>,

    /// Runtime mode (`development` or `production`)
    #[serde(default)]
    pub mode: Option<String>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Command-line overrides (highest priority tier)
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub database: Option<PathBuf>,
    pub port: Option<u16>,
    pub mode: Option<String>,
}

/// Fully resolved settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub mode: Mode,
    pub database_path: PathBuf,
    pub port: u16,
    pub log_level: String,
}

impl Settings {
    /// Resolve settings from all four tiers.
    ///
    /// Reads the platform TOML config file if one exists, then applies
    /// the priority chain per tier. Fails only when production mode is
    /// selected without an explicit database location.
    pub fn resolve(overrides: Overrides) -> Result<Settings> {
        let toml_config = load_toml_config();
        Self::resolve_with(overrides, &toml_config)
    }

    /// Resolve settings against an already-loaded TOML config.
    ///
    /// Split out from [`Settings::resolve`] so tests can supply their
    /// own TOML tier instead of the platform config file.
    pub fn resolve_with(overrides: Overrides, toml_config: &TomlConfig) -> Result<Settings> {
        let mode = resolve_mode(&overrides, toml_config);
        let port = resolve_port(&overrides, toml_config);
        let database_path = resolve_database(&overrides, toml_config, mode)?;

        Ok(Settings {
            mode,
            database_path,
            port,
            log_level: toml_config.logging.level.clone(),
        })
    }
}

fn resolve_mode(overrides: &Overrides, toml_config: &TomlConfig) -> Mode {
    // Priority 1: Command-line argument
    if let Some(value) = &overrides.mode {
        match Mode::parse(value) {
            Some(mode) => return mode,
            None => warn!("Ignoring invalid mode from command line: {:?}", value),
        }
    }

    // Priority 2: Environment variable
    if let Ok(value) = std::env::var("BIBLIO_MODE") {
        match Mode::parse(&value) {
            Some(mode) => return mode,
            None => warn!("Ignoring invalid BIBLIO_MODE: {:?}", value),
        }
    }

    // Priority 3: TOML config file
    if let Some(value) = &toml_config.mode {
        match Mode::parse(value) {
            Some(mode) => return mode,
            None => warn!("Ignoring invalid mode in config file: {:?}", value),
        }
    }

    // Priority 4: Compiled default
    Mode::default()
}

fn resolve_port(overrides: &Overrides, toml_config: &TomlConfig) -> u16 {
    if let Some(port) = overrides.port {
        return port;
    }

    if let Ok(value) = std::env::var("BIBLIO_PORT") {
        match value.parse::<u16>() {
            Ok(port) => return port,
            Err(_) => warn!("Ignoring invalid BIBLIO_PORT: {:?}", value),
        }
    }

    if let Some(port) = toml_config.port {
        return port;
    }

    DEFAULT_PORT
}

fn resolve_database(
    overrides: &Overrides,
    toml_config: &TomlConfig,
    mode: Mode,
) -> Result<PathBuf> {
    if let Some(path) = &overrides.database {
        return Ok(path.clone());
    }

    if let Ok(path) = std::env::var("BIBLIO_DATABASE") {
        return Ok(PathBuf::from(path));
    }

    if let Some(path) = &toml_config.database {
        return Ok(path.clone());
    }

    match mode {
        Mode::Development => Ok(default_database_path()),
        Mode::Production => Err(Error::Config(
            "Production mode requires an explicit database location. Configure using one of:\n\
             1. Command line: --database /path/to/biblio.db\n\
             2. Environment: BIBLIO_DATABASE=/path/to/biblio.db\n\
             3. TOML config: ~/.config/biblio/biblio.toml (database = \"/path/to/biblio.db\")"
                .to_string(),
        )),
    }
}

/// Load the platform TOML config file, falling back to defaults.
///
/// A missing file is normal. An unparseable file is reported with a
/// warning and treated as absent.
pub fn load_toml_config() -> TomlConfig {
    let Some(path) = config_file_path() else {
        return TomlConfig::default();
    };

    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) => {
            warn!("Could not read config file {}: {}", path.display(), e);
            return TomlConfig::default();
        }
    };

    match toml::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            warn!("Could not parse config file {}: {}", path.display(), e);
            TomlConfig::default()
        }
    }
}

/// Get the config file path for the platform, if one exists.
///
/// On Linux tries `~/.config/biblio/biblio.toml` first, then
/// `/etc/biblio/biblio.toml`. Other platforms use the user config
/// directory only.
pub fn config_file_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("biblio").join("biblio.toml"));

    if let Some(path) = &user_config {
        if path.exists() {
            return Some(path.clone());
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/biblio/biblio.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Default database path for development mode.
///
/// Lives under the platform data directory, falling back to the working
/// directory when no data directory can be determined.
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("biblio").join("biblio.db"))
        .unwrap_or_else(|| PathBuf::from("biblio.db"))
}
