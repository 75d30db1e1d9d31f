// Document Renderer Port (Interface)

use crate::domain::Person;
use crate::error::Result;

/// Renders an ordered queue into a downloadable document.
///
/// Rendering is CPU-bound and synchronous; callers on the async runtime run
/// it through `spawn_blocking`.
pub trait DocumentRenderer: Send + Sync {
    /// Encode `people` (already in queue order) into document bytes.
    ///
    /// Row numbers are the 1-based position in `people`.
    fn render(&self, people: &[Person]) -> Result<Vec<u8>>;

    /// MIME type of the produced bytes (e.g. `application/pdf`)
    fn content_type(&self) -> &'static str;
}
