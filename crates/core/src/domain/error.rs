// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{0} is required")]
    MissingField(&'static str),
}

pub type Result<T> = std::result::Result<T, DomainError>;
