//! queuedesk - Main Entry Point

mod logging;
mod settings;

use anyhow::{Context, Result};
use queuedesk_api_http::{shutdown_signal, HttpServer, HttpServerConfig};
use queuedesk_core::application::QueueService;
use queuedesk_core::port::time_provider::SystemTimeProvider;
use queuedesk_core::port::PersonRepository;
use queuedesk_infra_postgres::PostgresPersonRepository;
use queuedesk_infra_report::{FileArtifactStore, PdfRenderer};
use queuedesk_infra_sqlite::SqlitePersonRepository;
use settings::{DatabaseTarget, Settings};
use std::sync::Arc;
use tracing::{error, info};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration
    let settings = Settings::load().context("Failed to load configuration")?;

    // 2. Initialize logging
    logging::init(settings.log_format, &settings.log_level)?;

    info!("queuedesk v{} starting...", VERSION);

    // 3. Initialize database (connect + migrate); failure is fatal
    let (person_repo, store) = match open_store(&settings).await {
        Ok(opened) => opened,
        Err(e) => {
            error!(error = %format!("{:#}", e), "Failed to initialize the database");
            return Err(e);
        }
    };

    // 4. Setup dependencies (DI wiring)
    let report_options = settings.report_options()?;
    let queue_filepath = settings.queue_filepath();
    info!(path = %queue_filepath.display(), "Queue document location");

    let service = Arc::new(QueueService::new(
        person_repo,
        Arc::new(PdfRenderer::new(report_options)),
        Arc::new(FileArtifactStore::new(queue_filepath)),
        Arc::new(SystemTimeProvider),
    ));

    // 5. Serve until Ctrl+C
    let server = HttpServer::new(
        HttpServerConfig {
            host: settings.listen_host.clone(),
            port: settings.port,
        },
        service,
    );
    let served = server
        .serve(shutdown_signal())
        .await
        .context("HTTP server failed");

    // 6. Graceful shutdown
    store.close().await;
    info!("Shutdown complete.");

    served
}

async fn open_store(settings: &Settings) -> Result<(Arc<dyn PersonRepository>, Store)> {
    let max_connections = settings.db_max_connections;
    let acquire_timeout = settings.acquire_timeout();

    match settings.database() {
        DatabaseTarget::Sqlite(url) => {
            info!(url = %url, "Initializing SQLite database...");
            let pool = queuedesk_infra_sqlite::create_pool(&url, max_connections, acquire_timeout)
                .await
                .context("DB pool creation failed")?;
            queuedesk_infra_sqlite::run_migrations(&pool)
                .await
                .context("Migration failed")?;
            let repo = Arc::new(SqlitePersonRepository::new(pool));
            let person_repo: Arc<dyn PersonRepository> = repo.clone();
            Ok((person_repo, Store::Sqlite(repo)))
        }
        DatabaseTarget::PostgresUrl(url) => {
            info!("Initializing PostgreSQL database from DATABASE_URL...");
            let pool =
                queuedesk_infra_postgres::create_pool_from_url(&url, max_connections, acquire_timeout)
                    .await
                    .context("DB pool creation failed")?;
            postgres_store(PostgresPersonRepository::new(pool)).await
        }
        DatabaseTarget::Postgres(params) => {
            info!(host = %params.host, port = params.port, database = %params.database, "Initializing PostgreSQL database...");
            let pool = queuedesk_infra_postgres::create_pool(&params, max_connections, acquire_timeout)
                .await
                .context("DB pool creation failed")?;
            postgres_store(PostgresPersonRepository::new(pool)).await
        }
    }
}

async fn postgres_store(
    repo: PostgresPersonRepository,
) -> Result<(Arc<dyn PersonRepository>, Store)> {
    queuedesk_infra_postgres::run_migrations(repo.pool())
        .await
        .context("Migration failed")?;
    let repo = Arc::new(repo);
    let person_repo: Arc<dyn PersonRepository> = repo.clone();
    Ok((person_repo, Store::Postgres(repo)))
}

/// Keeps the concrete repository so its pool can be closed on exit
enum Store {
    Sqlite(Arc<SqlitePersonRepository>),
    Postgres(Arc<PostgresPersonRepository>),
}

impl Store {
    async fn close(&self) {
        match self {
            Store::Sqlite(repo) => repo.pool().close().await,
            Store::Postgres(repo) => repo.pool().close().await,
        }
        info!("Database pool closed");
    }
}
