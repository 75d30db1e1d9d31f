// queuedesk Infrastructure - Report Adapter
// Implements: DocumentRenderer, ArtifactStore

mod error;
pub mod layout;
mod pdf;
mod writer;

pub use error::RenderError;
pub use pdf::{PdfRenderer, ReportOptions, PDF_CONTENT_TYPE};
pub use writer::{write_atomic, FileArtifactStore};
