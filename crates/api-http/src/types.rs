//! Request/Response Types

use serde::{Deserialize, Serialize};

pub use queuedesk_core::application::queue::EnqueueRequest;

pub const PERSON_ADDED: &str = "Person added to the queue successfully";

/// Body of a successful `POST /person`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn person_added() -> Self {
        Self {
            message: PERSON_ADDED.to_string(),
        }
    }
}

/// Body of every failed request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}
