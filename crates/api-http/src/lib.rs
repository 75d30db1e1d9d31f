//! HTTP API Layer
//!
//! Exposes the queue over two endpoints:
//! - `POST /person` appends a person to the queue
//! - `GET /list` downloads the queue as a document

pub mod error;
pub mod handler;
pub mod server;
pub mod types;

pub use server::{build_router, shutdown_signal, HttpServer, HttpServerConfig};

#[cfg(test)]
pub(crate) mod test_support;
