//! Database connection module for MediQR
//!
//! The patient list is persisted in SQLite when `DB_TYPE=sqlite` (the
//! default). `DB_TYPE=memory` keeps everything in process and no pool is
//! created.

use std::env;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::OpenFlags;
use thiserror::Error;
use tracing::{error, info, warn};

use super::migrations::run_sqlite_migrations;

/// Default location of the SQLite file when `DB_SQLITE_PATH` is not set
pub const DEFAULT_SQLITE_PATH: &str = "data/mediqr.db";

/// Supported storage backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseType {
    /// SQLite database (file-based)
    Sqlite,
    /// Process memory only, nothing survives a restart
    Memory,
}

impl FromStr for DatabaseType {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" => Ok(DatabaseType::Sqlite),
            "memory" | "in-memory" => Ok(DatabaseType::Memory),
            _ => Err(DatabaseError::UnsupportedDatabaseType(s.to_string())),
        }
    }
}

impl fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseType::Sqlite => write!(f, "sqlite"),
            DatabaseType::Memory => write!(f, "memory"),
        }
    }
}

/// Database connection pool
#[derive(Debug, Clone)]
pub enum DatabasePool {
    /// SQLite connection pool
    SQLite(Arc<r2d2::Pool<SqliteConnectionManager>>),
}

/// Database error
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// SQLite error
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),

    /// SQLite connection pool error
    #[error("SQLite connection pool error: {0}")]
    SqlitePoolError(#[from] r2d2::Error),

    /// Unsupported database type
    #[error("Unsupported database type: {0}")]
    UnsupportedDatabaseType(String),

    /// Invalid configuration value
    #[error("Database configuration error: {0}")]
    ConfigError(String),

    /// Pool requested for a backend that has none
    #[error("Database type {0} does not use a connection pool")]
    NoPoolForType(DatabaseType),
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Storage backend
    pub db_type: DatabaseType,
    /// Path to SQLite database file
    pub sqlite_path: Option<String>,
    /// Maximum number of pooled connections
    pub max_connections: u32,
    /// Connection timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            db_type: DatabaseType::Sqlite,
            sqlite_path: Some(DEFAULT_SQLITE_PATH.to_string()),
            max_connections: 10,
            timeout_seconds: 30,
        }
    }
}

impl DatabaseConfig {
    /// Create a new database configuration from environment variables
    pub fn from_env() -> Result<Self, DatabaseError> {
        let defaults = Self::default();

        let db_type = match env::var("DB_TYPE") {
            Ok(value) => value.parse::<DatabaseType>()?,
            Err(_) => defaults.db_type,
        };

        let sqlite_path = env::var("DB_SQLITE_PATH").ok().or(defaults.sqlite_path);

        let max_connections = parse_env_or("DB_MAX_CONNECTIONS", defaults.max_connections)?;
        let timeout_seconds = parse_env_or("DB_TIMEOUT_SECONDS", defaults.timeout_seconds)?;

        if max_connections == 0 {
            return Err(DatabaseError::ConfigError(
                "DB_MAX_CONNECTIONS must be at least 1".to_string(),
            ));
        }

        info!(
            "Database configuration: type={}, max_connections={}, timeout={}s",
            db_type, max_connections, timeout_seconds
        );

        Ok(DatabaseConfig {
            db_type,
            sqlite_path,
            max_connections,
            timeout_seconds,
        })
    }
}

fn parse_env_or<T: FromStr>(name: &str, default: T) -> Result<T, DatabaseError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| DatabaseError::ConfigError(format!("{} must be a number, got '{}'", name, value))),
        Err(_) => Ok(default),
    }
}

/// Initialize the database connection pool and run migrations.
///
/// The pool is returned to the caller, which hands it to the repository
/// explicitly. There is no process-wide pool.
pub fn initialize_database_pool(config: &DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    info!("Initializing database pool with type: {}", config.db_type);

    let pool = match config.db_type {
        DatabaseType::Sqlite => initialize_sqlite_pool(config)?,
        DatabaseType::Memory => return Err(DatabaseError::NoPoolForType(config.db_type)),
    };

    run_migrations(&pool)?;
    Ok(pool)
}

/// Initialize SQLite connection pool
fn initialize_sqlite_pool(config: &DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    let sqlite_path = config
        .sqlite_path
        .clone()
        .unwrap_or_else(|| DEFAULT_SQLITE_PATH.to_string());

    info!("Initializing SQLite database at: {}", sqlite_path);

    if let Some(parent) = Path::new(&sqlite_path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            info!("Creating parent directory: {:?}", parent);
            if let Err(e) = fs::create_dir_all(parent) {
                warn!("Failed to create directory: {}, falling back to in-memory database", e);
                return initialize_in_memory_sqlite_pool(config);
            }
        }
    }

    let manager = SqliteConnectionManager::file(&sqlite_path)
        .with_flags(OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE)
        .with_init(|conn| conn.busy_timeout(Duration::from_secs(5)));

    match r2d2::Pool::builder()
        .max_size(config.max_connections)
        .connection_timeout(Duration::from_secs(config.timeout_seconds))
        .build(manager)
    {
        Ok(pool) => {
            info!("SQLite connection pool created successfully");
            Ok(DatabasePool::SQLite(Arc::new(pool)))
        }
        Err(e) => {
            error!("Failed to create SQLite connection pool: {}", e);
            warn!("Falling back to in-memory SQLite database");
            initialize_in_memory_sqlite_pool(config)
        }
    }
}

/// Initialize an in-memory SQLite database.
///
/// Every SQLite memory connection is its own database, so the pool is
/// capped at a single connection that is never reaped. A replacement
/// connection would start empty, so each one creates the schema on open.
pub fn initialize_in_memory_sqlite_pool(config: &DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    info!("Initializing in-memory SQLite database");

    let manager = SqliteConnectionManager::memory().with_init(|conn| run_sqlite_migrations(conn));

    let pool = r2d2::Pool::builder()
        .max_size(1)
        .max_lifetime(None)
        .idle_timeout(None)
        .connection_timeout(Duration::from_secs(config.timeout_seconds))
        .build(manager)?;

    let pool = DatabasePool::SQLite(Arc::new(pool));
    run_migrations(&pool)?;

    info!("In-memory SQLite database initialized successfully");
    Ok(pool)
}

/// Run database migrations
fn run_migrations(pool: &DatabasePool) -> Result<(), DatabaseError> {
    info!("Running database migrations");

    match pool {
        DatabasePool::SQLite(pool) => {
            let conn = pool.get()?;
            run_sqlite_migrations(&conn)?;
        }
    }

    info!("Database migrations completed successfully");
    Ok(())
}

/// Get information about the current database connection
pub fn get_connection_info(pool: &DatabasePool) -> Result<String, DatabaseError> {
    match pool {
        DatabasePool::SQLite(pool) => {
            let conn = pool.get()?;
            let path: String = conn.query_row("PRAGMA database_list", [], |row| row.get(2))?;

            let location = if path.is_empty() || path == ":memory:" {
                "SQLite in-memory database".to_string()
            } else {
                format!("SQLite database at {}", path)
            };

            let state = pool.state();
            Ok(format!(
                "{} (connections: active={}, idle={})",
                location, state.connections, state.idle_connections
            ))
        }
    }
}
