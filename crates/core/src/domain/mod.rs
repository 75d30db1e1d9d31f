// Domain Layer - Pure business logic and entities

pub mod error;
pub mod person;

// Re-exports
pub use error::DomainError;
pub use person::{NewPerson, Person, PersonId};
