//! Shared harness: SQLite file database + PDF renderer + router, all in a temp dir

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::FixedOffset;
use lopdf::content::Content;
use lopdf::Document;
use queuedesk_api_http::build_router;
use queuedesk_core::application::QueueService;
use queuedesk_core::port::time_provider::SystemTimeProvider;
use queuedesk_infra_report::{FileArtifactStore, PdfRenderer, ReportOptions};
use queuedesk_infra_sqlite::{create_pool, run_migrations, SqlitePersonRepository};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

pub const HEADER: [&str; 4] = ["#", "Name", "Surname", "Date"];

pub struct TestApp {
    pub pool: SqlitePool,
    pub router: Router,
    pub pdf_path: PathBuf,
}

impl TestApp {
    /// Build an app whose database and document live under `dir`
    pub async fn start(dir: &Path) -> Self {
        let db_url = format!("sqlite://{}", dir.join("queue.db").display());
        let pool = create_pool(&db_url, 4, Duration::from_secs(5)).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let pdf_path = dir.join("tmp").join("queue.pdf");
        let options = ReportOptions::new("%Y-%m-%d %H:%M:%S", FixedOffset::east_opt(0).unwrap())
            .unwrap();

        let service = Arc::new(QueueService::new(
            Arc::new(SqlitePersonRepository::new(pool.clone())),
            Arc::new(PdfRenderer::new(options)),
            Arc::new(FileArtifactStore::new(pdf_path.clone())),
            Arc::new(SystemTimeProvider),
        ));

        Self {
            pool,
            router: build_router(service),
            pdf_path,
        }
    }

    pub async fn add_person(&self, body: serde_json::Value) -> Response {
        let request = Request::builder()
            .method("POST")
            .uri("/person")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get_list(&self) -> Response {
        let request = Request::builder().uri("/list").body(Body::empty()).unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn stored_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM queue")
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn error_message(response: Response) -> String {
    let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    body["error"].as_str().unwrap().to_string()
}

/// Fetch `/list`, assert it is a PDF download and return its bytes
pub async fn download_pdf(app: &TestApp) -> Vec<u8> {
    let response = app.get_list().await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"queue.pdf\""
    );
    body_bytes(response).await
}

/// Text drawn on each page, in drawing order
pub fn pdf_page_texts(bytes: &[u8]) -> Vec<Vec<String>> {
    let doc = Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .values()
        .map(|page_id| {
            let data = doc.get_page_content(*page_id).unwrap();
            Content::decode(&data)
                .unwrap()
                .operations
                .iter()
                .filter(|op| op.operator == "Tj")
                .map(|op| {
                    op.operands[0]
                        .as_str()
                        .unwrap()
                        .iter()
                        .map(|&b| b as char)
                        .collect()
                })
                .collect()
        })
        .collect()
}

/// Data rows across all pages as (position, name, surname)
pub fn pdf_rows(bytes: &[u8]) -> Vec<(String, String, String)> {
    pdf_page_texts(bytes)
        .into_iter()
        .flat_map(|texts| {
            assert_eq!(texts[..4], HEADER);
            texts[4..]
                .chunks(4)
                .map(|row| (row[0].clone(), row[1].clone(), row[2].clone()))
                .collect::<Vec<_>>()
        })
        .collect()
}
