// Queue Service - Core use cases for queue entries

pub mod enqueue;
pub mod report;

pub use enqueue::EnqueueRequest;
pub use report::QueueReport;

use crate::domain::Person;
use crate::error::Result;
use crate::port::{ArtifactStore, DocumentRenderer, PersonRepository, TimeProvider};
use std::sync::Arc;

/// Queue Service
///
/// Owns every collaborator explicitly; the daemon builds one at startup and
/// hands it to the HTTP layer.
pub struct QueueService {
    person_repo: Arc<dyn PersonRepository>,
    renderer: Arc<dyn DocumentRenderer>,
    artifacts: Arc<dyn ArtifactStore>,
    time_provider: Arc<dyn TimeProvider>,
}

impl QueueService {
    pub fn new(
        person_repo: Arc<dyn PersonRepository>,
        renderer: Arc<dyn DocumentRenderer>,
        artifacts: Arc<dyn ArtifactStore>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            person_repo,
            renderer,
            artifacts,
            time_provider,
        }
    }

    /// Append a person to the queue
    pub async fn enqueue(&self, req: EnqueueRequest) -> Result<Person> {
        enqueue::execute(self.person_repo.as_ref(), self.time_provider.as_ref(), req).await
    }

    /// All entries in queue order
    pub async fn list_sorted(&self) -> Result<Vec<Person>> {
        self.person_repo.list_sorted().await
    }

    /// Render the current queue and publish it as the latest document
    pub async fn export_report(&self) -> Result<QueueReport> {
        report::execute(
            self.person_repo.as_ref(),
            Arc::clone(&self.renderer),
            Arc::clone(&self.artifacts),
        )
        .await
    }
}
