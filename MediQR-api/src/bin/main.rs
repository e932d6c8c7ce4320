use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use dotenv::dotenv;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use mediqr_api::api::handlers::health::initialize_server_start_time;
use mediqr_api::{create_application, ApiConfig};
use mediqr_data::database::{initialize_database_pool, DatabaseConfig, DatabaseType};

/// The main entry point for the MediQR API server
///
/// This function:
/// 1. Loads environment variables from a .env file
/// 2. Sets up tracing for logging
/// 3. Ensures the data directory exists
/// 4. Opens the patient store
/// 5. Serves the Axum application until shutdown
#[tokio::main]
async fn main() -> Result<()> {
    let dotenv_missing = dotenv().is_err();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_span_events(FmtSpan::CLOSE)
                .with_target(false)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stdout),
        )
        .with(env_filter)
        .init();

    if dotenv_missing {
        warn!(".env file not found or couldn't be read, using environment variables");
    }

    info!("Starting MediQR API server");

    let config = ApiConfig::from_env()?;

    let data_dir = PathBuf::from(&config.data_dir);
    if !data_dir.exists() {
        info!("Creating data directory: {}", data_dir.display());
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;
    }

    let mut db_config = DatabaseConfig::from_env()?;
    if std::env::var("DB_SQLITE_PATH").is_err() {
        db_config.sqlite_path = Some(data_dir.join("mediqr.db").to_string_lossy().to_string());
    }

    let pool = match db_config.db_type {
        DatabaseType::Memory => {
            info!("Keeping patients in memory, nothing survives a restart");
            None
        }
        DatabaseType::Sqlite => match initialize_database_pool(&db_config) {
            Ok(pool) => Some(pool),
            Err(e) => {
                error!("Failed to open patient database: {}", e);
                return Err(e.into());
            }
        },
    };

    initialize_server_start_time();

    let app = create_application(&config, pool);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Wait for CTRL+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
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

    info!("Shutting down server...");
}
