// queuedesk Infrastructure - SQLite Adapter
// Implements: PersonRepository

mod connection;
mod migration;
mod person_repository;

pub use connection::create_pool;
pub use migration::run_migrations;
pub use person_repository::SqlitePersonRepository;

// Note: sqlx::Error conversion is handled by a helper function
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for AppError here)
