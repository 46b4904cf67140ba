//! Database initialization
//!
//! Creates the SQLite database on first run and brings the schema up to
//! date. Schema creation is idempotent so startup is safe against an
//! existing database.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Initialize the database connection pool and create tables if needed.
///
/// The parent directory is created when missing, so a fresh install
/// starts from nothing. Foreign keys are enforced on every pool
/// connection; WAL mode allows concurrent readers with one writer.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(5000));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    init_schema(&pool).await?;

    Ok(pool)
}

/// Create all tables and indexes (idempotent, safe to call repeatedly)
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    create_articles_table(pool).await?;
    create_references_table(pool).await?;
    Ok(())
}

async fn create_articles_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS articles (
            article_id INTEGER PRIMARY KEY AUTOINCREMENT,
            article_title TEXT NOT NULL,
            article_abstract TEXT NOT NULL,
            article_date TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_articles_title ON articles(article_title)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_articles_date ON articles(article_date)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the references table.
///
/// Named `article_references` because bare `references` is a reserved
/// word in SQL. The wire format still calls these records references.
async fn create_references_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS article_references (
            reference_id INTEGER PRIMARY KEY AUTOINCREMENT,
            reference_title TEXT NOT NULL,
            reference_date TEXT NOT NULL,
            reference_authors TEXT NOT NULL,
            article_id INTEGER NOT NULL REFERENCES articles(article_id),
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_article_references_article ON article_references(article_id)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
