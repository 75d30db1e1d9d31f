// Artifact Store Port (Interface)

use crate::error::Result;
use std::path::PathBuf;

/// Keeps the most recently generated document at a well-known location.
pub trait ArtifactStore: Send + Sync {
    /// Replace the stored document with `document`.
    ///
    /// Returns only after the bytes are durably written. Readers of the
    /// location never observe a partially written document.
    fn publish(&self, document: &[u8]) -> Result<PathBuf>;

    /// File name downloads should be offered under
    fn file_name(&self) -> String;
}
