// Person Repository Port (Interface)

use crate::domain::{NewPerson, Person};
use crate::error::Result;
use async_trait::async_trait;

/// Repository interface for queue entry persistence.
///
/// Implementations acquire one pooled connection per call and release it on
/// every exit path. The store is append-only: there is no update or delete.
#[async_trait]
pub trait PersonRepository: Send + Sync {
    /// Persist a new entry and return it with its assigned id
    async fn insert(&self, person: &NewPerson) -> Result<Person>;

    /// All entries ordered by `timestamp ASC, id ASC` (empty when none)
    async fn list_sorted(&self) -> Result<Vec<Person>>;
}
