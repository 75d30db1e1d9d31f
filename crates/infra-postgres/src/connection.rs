// PostgreSQL Connection Pool Setup

use queuedesk_core::error::{AppError, Result};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Discrete connection parameters (host, port, user, password, database)
#[derive(Clone)]
pub struct ConnectionParams {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl ConnectionParams {
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
    }
}

// Password never reaches logs
impl fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .finish()
    }
}

/// Create PostgreSQL connection pool from discrete parameters.
///
/// Connects eagerly so an unreachable database fails startup.
pub async fn create_pool(
    params: &ConnectionParams,
    max_connections: u32,
    acquire_timeout: Duration,
) -> Result<PgPool> {
    let pool = connect(params.connect_options(), max_connections, acquire_timeout)
        .await
        .map_err(|e| {
            AppError::Storage(format!(
                "Failed to connect to {}:{}/{}: {}",
                params.host, params.port, params.database, e
            ))
        })?;

    info!(
        host = %params.host,
        port = params.port,
        database = %params.database,
        max_connections,
        "Connected to the database"
    );

    Ok(pool)
}

/// Create PostgreSQL connection pool from a `postgres://` URL
pub async fn create_pool_from_url(
    database_url: &str,
    max_connections: u32,
    acquire_timeout: Duration,
) -> Result<PgPool> {
    let options = PgConnectOptions::from_str(database_url)
        .map_err(|e| AppError::Config(format!("Invalid PostgreSQL URL: {}", e)))?;

    let pool = connect(options, max_connections, acquire_timeout)
        .await
        .map_err(|e| AppError::Storage(format!("Failed to connect to the database: {}", e)))?;

    info!(max_connections, "Connected to the database");

    Ok(pool)
}

async fn connect(
    options: PgConnectOptions,
    max_connections: u32,
    acquire_timeout: Duration,
) -> std::result::Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(acquire_timeout)
        .connect_with(options)
        .await
}
