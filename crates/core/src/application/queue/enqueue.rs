// Enqueue Use Case

use crate::domain::{NewPerson, Person};
use crate::error::Result;
use crate::port::{PersonRepository, TimeProvider};
use serde::Deserialize;
use tracing::info;

/// Enqueue request as received from the boundary.
///
/// Fields are optional so that a missing value surfaces as a validation
/// error instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnqueueRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub surname: Option<String>,
}

impl EnqueueRequest {
    pub fn new(name: impl Into<String>, surname: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            surname: Some(surname.into()),
        }
    }
}

/// Execute enqueue use case
///
/// # Arguments
///
/// * `person_repo` - Queue store
/// * `time_provider` - Arrival clock (injected for determinism)
/// * `req` - Enqueue request
pub async fn execute(
    person_repo: &dyn PersonRepository,
    time_provider: &dyn TimeProvider,
    req: EnqueueRequest,
) -> Result<Person> {
    // Validation happens before the store is touched
    let new_person = NewPerson::new(
        req.name.as_deref().unwrap_or_default(),
        req.surname.as_deref().unwrap_or_default(),
        time_provider.now(),
    )?;

    let person = person_repo.insert(&new_person).await?;

    info!(
        id = person.id,
        name = %person.name,
        surname = %person.surname,
        "Person added to the queue"
    );

    Ok(person)
}
