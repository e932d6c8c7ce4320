use rusqlite::Connection;
use tracing::info;

/// Run SQLite migrations
pub fn run_migrations(conn: &Connection) -> Result<(), rusqlite::Error> {
    info!("Running SQLite migrations");

    create_kv_store_table(conn)?;

    info!("SQLite migrations completed successfully");
    Ok(())
}

/// Create the key-value table that holds the serialized patient list
fn create_kv_store_table(conn: &Connection) -> Result<(), rusqlite::Error> {
    info!("Creating kv_store table if not exists");

    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv_store (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    Ok(())
}
