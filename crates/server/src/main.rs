use std::net::SocketAddr;

use clap::Parser;
use config::ConfigError;
use db::{DBService, DbBootstrapError, DbErr};
use db_migration::{InvalidSchemaVersion, SchemaVersion};
use server::{AppState, cli::Cli, http};
use thiserror::Error;
use tracing_subscriber::{EnvFilter, filter::ParseError, prelude::*};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Bootstrap(#[from] DbBootstrapError),
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error(transparent)]
    SchemaVersion(#[from] InvalidSchemaVersion),
    #[error("failed to create tracing filter: {0}")]
    TracingFilter(#[from] ParseError),
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let filter_string = format!(
        "warn,server={level},services={level},db={level},db_migration={level},config={level}",
        level = log_level
    );
    let env_filter = EnvFilter::try_new(filter_string)?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(env_filter))
        .init();

    let cli = Cli::parse();
    let config = config::resolve(cli.config.as_deref(), cli.config_layer())?;
    tracing::info!(?config, "Starting service: branma");

    if cli.reset {
        tracing::warn!("Resetting database, all data will be lost");
        DBService::reset(&config.db).await?;
    }

    // Migrations are compiled in; the scripts path is only reported.
    tracing::info!(
        schema_scripts_path = %config.db.schema_scripts_path.display(),
        "Using built-in schema migrations, schema scripts path is ignored"
    );
    let target: SchemaVersion = env!("CARGO_PKG_VERSION").parse()?;
    let db = DBService::bootstrap(&config.db, &target).await?;

    let state = AppState::new(db.db.clone(), config);
    let port = state.config.service.port;
    let app = http::router(state);
    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([0, 0, 0, 0], port))).await?;
    tracing::info!("Service listens to port {}", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await?;
    tracing::info!("Service stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
