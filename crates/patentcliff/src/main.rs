mod app;
mod config;
mod handlers;
mod import;
mod state;
mod storage;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use listenfd::ListenFd;
use tokio::{net::TcpListener, signal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use patentcliff_auth::AuthConfig;

use crate::{
    app::create_app, config::Config, import::import_dataset, state::AppState,
    storage::SqliteRepository,
};

/// Patent Cliff - pharmaceutical patent expiry API
#[derive(Parser, Debug)]
#[command(name = "patentcliff")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API
    Serve {
        /// Host address to bind the server to
        #[arg(long, short = 'H', default_value = "0.0.0.0", env = "HOST")]
        host: String,

        /// Port to listen on
        #[arg(long, short, default_value = "5000", env = "PORT")]
        port: u16,

        /// SQLite database path (overrides DATABASE_PATH)
        #[arg(long)]
        database: Option<String>,
    },
    /// Import a CSV dataset into the database
    Import {
        /// CSV file to import (overrides DATASET_PATH)
        path: Option<PathBuf>,

        /// SQLite database path (overrides DATABASE_PATH)
        #[arg(long)]
        database: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "patentcliff=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    match cli.command {
        Command::Serve {
            host,
            port,
            database,
        } => {
            let database = database.unwrap_or_else(|| config.database_path.clone());
            serve(&config, &host, port, &database).await
        }
        Command::Import { path, database } => {
            let database = database.unwrap_or_else(|| config.database_path.clone());
            let path = path.unwrap_or_else(|| PathBuf::from(&config.dataset_path));
            let repo = open_repository(&database).await?;
            import_dataset(&repo, &path).await?;
            Ok(())
        }
    }
}

/// Opens the database, creating its parent directory if needed.
async fn open_repository(database: &str) -> Result<SqliteRepository> {
    if let Some(parent) = Path::new(database).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }

    let repo = SqliteRepository::new(database)
        .await
        .with_context(|| format!("failed to open database {database}"))?;
    tracing::info!(database, "Database ready");

    Ok(repo)
}

async fn serve(config: &Config, host: &str, port: u16, database: &str) -> Result<()> {
    let repo = open_repository(database).await?;
    let state = AppState::with_sqlite(repo, AuthConfig::from_env(), config.request_timeout());

    // Build the application router
    let app = create_app(state);

    // Auto-reload support via listenfd
    let mut listenfd = ListenFd::from_env();
    let listener = match listenfd.take_tcp_listener(0)? {
        // If we are given a tcp listener on listen fd 0, use that one
        Some(listener) => {
            listener.set_nonblocking(true)?;
            TcpListener::from_std(listener)?
        }
        // Otherwise fall back to CLI-specified host:port
        None => {
            let addr = format!("{host}:{port}");
            TcpListener::bind(&addr).await?
        }
    };

    tracing::info!("listening on {}", listener.local_addr()?);

    // Run the server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Wait for shutdown signals (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }
}
