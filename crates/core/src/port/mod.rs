// Port Layer - Interfaces for external dependencies

pub mod artifact_store;
pub mod document_renderer;
pub mod person_repository;
pub mod time_provider; // For deterministic testing

// Re-exports
pub use artifact_store::ArtifactStore;
pub use document_renderer::DocumentRenderer;
pub use person_repository::PersonRepository;
pub use time_provider::TimeProvider;
