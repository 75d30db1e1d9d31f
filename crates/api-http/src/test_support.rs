// Shared fixtures for router tests

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use queuedesk_core::application::QueueService;
use queuedesk_core::domain::{NewPerson, Person};
use queuedesk_core::error::{AppError, Result};
use queuedesk_core::port::{ArtifactStore, DocumentRenderer, PersonRepository, TimeProvider};
use serde::de::DeserializeOwned;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

#[derive(Default)]
pub struct MemoryRepository {
    rows: Mutex<Vec<Person>>,
    offline: AtomicBool,
}

impl MemoryRepository {
    pub fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AppError::Storage("Connection pool is closed".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl PersonRepository for MemoryRepository {
    async fn insert(&self, person: &NewPerson) -> Result<Person> {
        self.check_online()?;
        let mut rows = self.rows.lock().unwrap();
        let stored = person.clone().into_person(rows.len() as i64 + 1);
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn list_sorted(&self) -> Result<Vec<Person>> {
        self.check_online()?;
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by_key(Person::queue_position_key);
        Ok(rows)
    }
}

/// One "position,name,surname" line per entry
pub struct CsvRenderer;

impl DocumentRenderer for CsvRenderer {
    fn render(&self, people: &[Person]) -> Result<Vec<u8>> {
        let mut out = String::new();
        for (i, p) in people.iter().enumerate() {
            let _ = writeln!(out, "{},{},{}", i + 1, p.name, p.surname);
        }
        Ok(out.into_bytes())
    }

    fn content_type(&self) -> &'static str {
        "text/csv"
    }
}

#[derive(Default)]
pub struct MemoryArtifacts {
    pub latest: Mutex<Option<Vec<u8>>>,
}

impl ArtifactStore for MemoryArtifacts {
    fn publish(&self, document: &[u8]) -> Result<PathBuf> {
        *self.latest.lock().unwrap() = Some(document.to_vec());
        Ok(PathBuf::from("memory/queue.csv"))
    }

    fn file_name(&self) -> String {
        "queue.csv".to_string()
    }
}

/// Advances one second per reading
pub struct SteppingClock {
    start: DateTime<Utc>,
    ticks: AtomicI64,
}

impl Default for SteppingClock {
    fn default() -> Self {
        Self {
            start: Utc.with_ymd_and_hms(2024, 5, 20, 8, 0, 0).unwrap(),
            ticks: AtomicI64::new(0),
        }
    }
}

impl TimeProvider for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        self.start + Duration::seconds(self.ticks.fetch_add(1, Ordering::SeqCst))
    }
}

pub fn service(repo: Arc<MemoryRepository>) -> Arc<QueueService> {
    Arc::new(QueueService::new(
        repo,
        Arc::new(CsvRenderer),
        Arc::new(MemoryArtifacts::default()),
        Arc::new(SteppingClock::default()),
    ))
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json<T: DeserializeOwned>(response: Response) -> T {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Records every event as (level, "field=value ...")
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<(Level, String)>>>);

impl CapturedLogs {
    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.0
            .lock()
            .unwrap()
            .iter()
            .any(|(l, line)| *l == level && line.contains(needle))
    }
}

struct LineVisitor(String);

impl Visit for LineVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let _ = write!(self.0, "{}={:?} ", field.name(), value);
    }
}

impl<S: Subscriber> Layer<S> for CapturedLogs {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = LineVisitor(String::new());
        event.record(&mut visitor);
        self.0
            .lock()
            .unwrap()
            .push((*event.metadata().level(), visitor.0));
    }
}
