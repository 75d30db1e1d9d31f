// Migration Runner

use queuedesk_core::error::{AppError, Result};
use sqlx::PgPool;
use tracing::info;

/// Ordered migrations: (version, description, sql)
const MIGRATIONS: &[(i64, &str, &str)] = &[(
    1,
    "Queue table",
    include_str!("../migrations/001_create_queue.sql"),
)];

// Serializes migration runs from several instances starting at once
const MIGRATION_LOCK_KEY: i64 = 0x7175_6575_6465_736b;

/// Run database migrations.
///
/// Versions already recorded in `schema_version` are skipped.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    info!("Running database migrations...");

    let mut tx = pool.begin().await.map_err(migration_error)?;

    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(MIGRATION_LOCK_KEY)
        .execute(&mut *tx)
        .await
        .map_err(migration_error)?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS schema_version (version BIGINT PRIMARY KEY, applied_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP)",
    )
    .execute(&mut *tx)
    .await
    .map_err(migration_error)?;

    let current_version: i64 =
        sqlx::query_scalar("SELECT COALESCE(MAX(version), 0)::BIGINT FROM schema_version")
            .fetch_one(&mut *tx)
            .await
            .map_err(migration_error)?;

    info!("Current schema version: {}", current_version);

    for (version, description, sql) in MIGRATIONS {
        if current_version < *version {
            info!("Applying migration {:03}: {}", version, description);

            // Multi-statement file
            sqlx::raw_sql(sql)
                .execute(&mut *tx)
                .await
                .map_err(migration_error)?;

            sqlx::query("INSERT INTO schema_version (version) VALUES ($1)")
                .bind(*version)
                .execute(&mut *tx)
                .await
                .map_err(migration_error)?;
        }
    }

    tx.commit().await.map_err(migration_error)?;

    info!("All migrations applied successfully");
    Ok(())
}

fn migration_error(err: sqlx::Error) -> AppError {
    AppError::Storage(format!("Migration failed: {}", err))
}
