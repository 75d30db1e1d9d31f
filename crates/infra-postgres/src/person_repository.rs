// PostgreSQL PersonRepository Implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use queuedesk_core::domain::{NewPerson, Person};
use queuedesk_core::error::{AppError, Result};
use queuedesk_core::port::PersonRepository;
use sqlx::PgPool;
use tracing::debug;

fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => {
            if let Some(code) = db_err.code() {
                let code_str = code.as_ref();

                // SQLSTATE: https://www.postgresql.org/docs/current/errcodes-appendix.html
                match code_str {
                    "23505" | "23502" | "23514" => AppError::Storage(format!(
                        "Constraint violation: {} ({})",
                        db_err.message(),
                        code_str
                    )),
                    "22001" => AppError::Storage(format!("Value too long: {}", db_err.message())),
                    "53300" => AppError::Storage(format!(
                        "Too many connections: {}",
                        db_err.message()
                    )),
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
        sqlx::Error::PoolClosed => AppError::Storage("Connection pool is closed".to_string()),
        sqlx::Error::PoolTimedOut => {
            AppError::Storage("Timed out acquiring a database connection".to_string())
        }
        _ => AppError::Storage(err.to_string()),
    }
}

pub struct PostgresPersonRepository {
    pool: PgPool,
}

impl PostgresPersonRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl PersonRepository for PostgresPersonRepository {
    async fn insert(&self, person: &NewPerson) -> Result<Person> {
        let mut conn = self.pool.acquire().await.map_err(map_sqlx_error)?;

        let id: i64 = sqlx::query_scalar(
            r#"INSERT INTO queue (name, surname, "timestamp") VALUES ($1, $2, $3) RETURNING id"#,
        )
        .bind(person.name())
        .bind(person.surname())
        .bind(person.timestamp())
        .fetch_one(&mut *conn)
        .await
        .map_err(map_sqlx_error)?;

        debug!(id, "Inserted queue entry");

        Ok(person.clone().into_person(id))
    }

    async fn list_sorted(&self) -> Result<Vec<Person>> {
        let mut conn = self.pool.acquire().await.map_err(map_sqlx_error)?;

        let rows: Vec<PersonRow> = sqlx::query_as(
            r#"
            SELECT id, name, surname, "timestamp"
            FROM queue
            ORDER BY "timestamp" ASC, id ASC
            "#,
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Person::from).collect())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PersonRow {
    id: i64,
    name: String,
    surname: String,
    timestamp: DateTime<Utc>,
}

impl From<PersonRow> for Person {
    fn from(row: PersonRow) -> Self {
        Person {
            id: row.id,
            name: row.name,
            surname: row.surname,
            timestamp: row.timestamp,
        }
    }
}
