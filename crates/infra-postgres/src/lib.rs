// queuedesk Infrastructure - PostgreSQL Adapter
// Implements: PersonRepository

mod connection;
mod migration;
mod person_repository;

pub use connection::{create_pool, create_pool_from_url, ConnectionParams};
pub use migration::run_migrations;
pub use person_repository::PostgresPersonRepository;
