// Report Export Use Case

use crate::error::{AppError, Result};
use crate::port::{ArtifactStore, DocumentRenderer, PersonRepository};
use std::sync::Arc;
use tracing::{debug, info};

/// Rendered queue document, ready to be returned to a client
#[derive(Debug, Clone)]
pub struct QueueReport {
    pub document: Vec<u8>,
    pub content_type: &'static str,
    pub file_name: String,
    pub entries: usize,
}

/// Execute report export use case
///
/// Reads the sorted queue, renders it on the blocking pool and publishes the
/// bytes. The returned document is the in-memory copy, so concurrent exports
/// never read back each other's file.
pub async fn execute(
    person_repo: &dyn PersonRepository,
    renderer: Arc<dyn DocumentRenderer>,
    artifacts: Arc<dyn ArtifactStore>,
) -> Result<QueueReport> {
    let people = person_repo.list_sorted().await?;
    let entries = people.len();
    let content_type = renderer.content_type();
    let file_name = artifacts.file_name();

    debug!(entries, "Rendering queue report");

    let (document, published_to) = tokio::task::spawn_blocking(move || -> Result<_> {
        let document = renderer.render(&people)?;
        let published_to = artifacts.publish(&document)?;
        Ok((document, published_to))
    })
    .await
    .map_err(|e| AppError::Internal(format!("Report task failed: {}", e)))??;

    info!(
        entries,
        bytes = document.len(),
        path = %published_to.display(),
        "Queue report generated"
    );

    Ok(QueueReport {
        document,
        content_type,
        file_name,
        entries,
    })
}
