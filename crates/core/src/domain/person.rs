// Person Domain Model (one queue entry)

use chrono::{DateTime, Utc};

use crate::domain::error::{DomainError, Result};

/// Store-assigned sequential identifier
pub type PersonId = i64;

/// A persisted queue entry.
///
/// Entries are append-only: once stored, neither the names nor the
/// `timestamp` change. Ordering is `(timestamp, id)` ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    pub surname: String,
    pub timestamp: DateTime<Utc>,
}

impl Person {
    /// Sort key used by every store
    pub fn queue_position_key(&self) -> (DateTime<Utc>, PersonId) {
        (self.timestamp, self.id)
    }
}

/// Validated input for a new queue entry (no id yet)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPerson {
    name: String,
    surname: String,
    timestamp: DateTime<Utc>,
}

impl NewPerson {
    /// Create a new entry with an injected arrival time.
    ///
    /// Both names are trimmed; an empty value after trimming is rejected.
    pub fn new(
        name: impl AsRef<str>,
        surname: impl AsRef<str>,
        timestamp: DateTime<Utc>,
    ) -> Result<Self> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(DomainError::MissingField("name"));
        }

        let surname = surname.as_ref().trim();
        if surname.is_empty() {
            return Err(DomainError::MissingField("surname"));
        }

        Ok(Self {
            name: name.to_string(),
            surname: surname.to_string(),
            timestamp,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn surname(&self) -> &str {
        &self.surname
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Attach the identifier assigned by the store
    pub fn into_person(self, id: PersonId) -> Person {
        Person {
            id,
            name: self.name,
            surname: self.surname,
            timestamp: self.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_new_person_trims_names() {
        let person = NewPerson::new("  John ", "\tDoe\n", at(1_000)).unwrap();
        assert_eq!(person.name(), "John");
        assert_eq!(person.surname(), "Doe");
        assert_eq!(person.timestamp(), at(1_000));
    }

    #[test]
    fn test_new_person_rejects_blank_name() {
        let err = NewPerson::new("   ", "Doe", at(0)).unwrap_err();
        assert_eq!(err, DomainError::MissingField("name"));
        assert_eq!(err.to_string(), "name is required");
    }

    #[test]
    fn test_new_person_rejects_empty_surname() {
        let err = NewPerson::new("John", "", at(0)).unwrap_err();
        assert_eq!(err, DomainError::MissingField("surname"));
    }

    #[test]
    fn test_into_person_keeps_fields() {
        let person = NewPerson::new("Jane", "Roe", at(42)).unwrap().into_person(7);
        assert_eq!(person.id, 7);
        assert_eq!(person.name, "Jane");
        assert_eq!(person.surname, "Roe");
        assert_eq!(person.timestamp, at(42));
    }

    #[test]
    fn test_queue_position_key_breaks_ties_by_id() {
        let first = NewPerson::new("A", "A", at(5)).unwrap().into_person(1);
        let second = NewPerson::new("B", "B", at(5)).unwrap().into_person(2);
        assert!(first.queue_position_key() < second.queue_position_key());
    }
}
