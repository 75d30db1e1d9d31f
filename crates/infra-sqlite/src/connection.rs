// SQLite Connection Pool Setup

use queuedesk_core::error::{AppError, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Create SQLite connection pool with WAL mode.
///
/// Fails when the URL is malformed or the first connection cannot be opened,
/// so callers find out at startup rather than on the first request.
pub async fn create_pool(
    database_url: &str,
    max_connections: u32,
    acquire_timeout: Duration,
) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| AppError::Config(format!("Invalid SQLite URL {}: {}", database_url, e)))?
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(acquire_timeout)
        .connect_with(options)
        .await
        .map_err(|e| AppError::Storage(format!("Failed to connect to {}: {}", database_url, e)))?;

    info!(url = %database_url, max_connections, "Connected to the database");

    Ok(pool)
}
