//! biblio-api - Article/reference bibliography backend
//!
//! HTTP CRUD service over the articles and references tables, with
//! filtered, sorted, paginated listing.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use biblio_api::AppState;
use biblio_common::config::{Overrides, Settings};

/// Command-line arguments for biblio-api
#[derive(Parser, Debug)]
#[command(name = "biblio-api")]
#[command(about = "Article/reference bibliography backend")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "BIBLIO_PORT")]
    port: Option<u16>,

    /// Path to the SQLite database file
    #[arg(short, long, env = "BIBLIO_DATABASE")]
    database: Option<PathBuf>,

    /// Runtime mode (development or production)
    #[arg(short, long, env = "BIBLIO_MODE")]
    mode: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "biblio_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse command-line arguments
    let args = Args::parse();

    let settings = Settings::resolve(Overrides {
        database: args.database,
        port: args.port,
        mode: args.mode,
    })
    .context("Failed to resolve configuration")?;

    info!(
        "Starting biblio-api ({} mode) on port {}",
        settings.mode.as_str(),
        settings.port
    );
    info!("Database: {}", settings.database_path.display());

    let db = biblio_common::db::init_database(&settings.database_path)
        .await
        .context("Failed to initialize database")?;
    info!("Database connection established");

    let state = AppState::new(db);
    let app = biblio_api::build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        }
    }
}
