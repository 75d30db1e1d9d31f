// SQLite PersonRepository Implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use queuedesk_core::domain::{NewPerson, Person};
use queuedesk_core::error::{AppError, Result};
use queuedesk_core::port::PersonRepository;
use sqlx::SqlitePool;
use tracing::debug;

// Helper to convert sqlx::Error to AppError with structured information
fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => {
            if let Some(code) = db_err.code() {
                let code_str = code.as_ref();

                // SQLite error codes: https://www.sqlite.org/rescode.html
                match code_str {
                    "1299" | "2067" | "1555" | "275" => AppError::Storage(format!(
                        "Constraint violation: {} ({})",
                        db_err.message(),
                        code_str
                    )),
                    "5" => AppError::Storage(format!(
                        "Database locked (SQLITE_BUSY): {}",
                        db_err.message()
                    )),
                    "13" => AppError::Storage(format!("Database full: {}", db_err.message())),
                    _ => AppError::Storage(format!(
                        "Database error [{}]: {}",
                        code_str,
                        db_err.message()
                    )),
                }
            } else {
                AppError::Storage(format!("Database error: {}", db_err.message()))
            }
        }
        sqlx::Error::PoolClosed => {
            AppError::Storage("Connection pool is closed".to_string())
        }
        sqlx::Error::PoolTimedOut => {
            AppError::Storage("Timed out acquiring a database connection".to_string())
        }
        sqlx::Error::ColumnNotFound(col) => {
            AppError::Storage(format!("Column not found: {}", col))
        }
        _ => AppError::Storage(err.to_string()),
    }
}

pub struct SqlitePersonRepository {
    pool: SqlitePool,
}

impl SqlitePersonRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Underlying pool (for shutdown)
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl PersonRepository for SqlitePersonRepository {
    async fn insert(&self, person: &NewPerson) -> Result<Person> {
        // Scoped acquisition: the connection returns to the pool when dropped
        let mut conn = self.pool.acquire().await.map_err(map_sqlx_error)?;

        let result = sqlx::query("INSERT INTO queue (name, surname, timestamp) VALUES (?, ?, ?)")
            .bind(person.name())
            .bind(person.surname())
            .bind(person.timestamp().timestamp_millis())
            .execute(&mut *conn)
            .await
            .map_err(map_sqlx_error)?;

        let id = result.last_insert_rowid();
        debug!(id, "Inserted queue entry");

        Ok(person.clone().into_person(id))
    }

    async fn list_sorted(&self) -> Result<Vec<Person>> {
        let mut conn = self.pool.acquire().await.map_err(map_sqlx_error)?;

        let rows: Vec<PersonRow> = sqlx::query_as(
            r#"
            SELECT id, name, surname, timestamp
            FROM queue
            ORDER BY timestamp ASC, id ASC
            "#,
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(PersonRow::into_person).collect()
    }
}

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
struct PersonRow {
    id: i64,
    name: String,
    surname: String,
    timestamp: i64, // epoch ms
}

impl PersonRow {
    fn into_person(self) -> Result<Person> {
        let timestamp = DateTime::<Utc>::from_timestamp_millis(self.timestamp).ok_or_else(|| {
            AppError::Storage(format!(
                "Entry {} has an out-of-range timestamp: {}",
                self.id, self.timestamp
            ))
        })?;

        Ok(Person {
            id: self.id,
            name: self.name,
            surname: self.surname,
            timestamp,
        })
    }
}
