//! Runtime settings
//!
//! Layered with the `config` crate, later layers win:
//! 1. built-in defaults
//! 2. `queuedesk.{toml,yaml,json}` in the working directory (optional)
//! 3. `queuedesk.<APP_ENV>.*` when `APP_ENV` is set (optional)
//! 4. the file named by `QUEUEDESK_CONFIG` (required when set)
//! 5. process environment, e.g. `PORT=8080`, `POSTGRES_HOST=db`

use chrono::FixedOffset;
use config::{Config, ConfigError, Environment, File, Map};
use queuedesk_core::error::{AppError, Result};
use queuedesk_infra_postgres::ConnectionParams;
use queuedesk_infra_report::ReportOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const BASE_FILE: &str = "queuedesk";
const CONFIG_FILE_ENV: &str = "QUEUEDESK_CONFIG";
const APP_ENV: &str = "APP_ENV";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
    Compact,
}

/// Where the queue lives
#[derive(Debug, Clone)]
pub enum DatabaseTarget {
    Sqlite(String),
    PostgresUrl(String),
    Postgres(ConnectionParams),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub listen_host: String,
    pub port: u16,

    pub database_url: Option<String>,
    pub postgres_host: String,
    pub postgres_port: u16,
    pub postgres_user: String,
    pub postgres_password: String,
    pub postgres_db: String,
    pub db_max_connections: u32,
    pub db_acquire_timeout_secs: u64,

    pub queue_filepath: String,
    pub report_datetime_format: String,
    /// Minutes east of UTC; host local offset when unset
    pub report_utc_offset_minutes: Option<i32>,

    pub log_format: LogFormat,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            listen_host: "0.0.0.0".to_string(),
            port: 3000,
            database_url: None,
            postgres_host: "db".to_string(),
            postgres_port: 5432,
            postgres_user: "test".to_string(),
            postgres_password: "test".to_string(),
            postgres_db: "test".to_string(),
            db_max_connections: 10,
            db_acquire_timeout_secs: 5,
            queue_filepath: "tmp/queue.pdf".to_string(),
            report_datetime_format: ReportOptions::DEFAULT_DATETIME_FORMAT.to_string(),
            report_utc_offset_minutes: None,
            log_format: LogFormat::Pretty,
            log_level: "queuedesk=info,tower_http=info".to_string(),
        }
    }
}

impl Settings {
    /// Load from files and the process environment
    pub fn load() -> Result<Self> {
        Self::from_sources(
            std::env::var(APP_ENV).ok(),
            std::env::var(CONFIG_FILE_ENV).ok(),
            None,
        )
    }

    /// `env` replaces the process environment when given
    fn from_sources(
        app_env: Option<String>,
        config_file: Option<String>,
        env: Option<Map<String, String>>,
    ) -> Result<Self> {
        let mut builder = Config::builder().add_source(File::with_name(BASE_FILE).required(false));

        if let Some(app_env) = app_env.filter(|e| !e.is_empty()) {
            builder = builder
                .add_source(File::with_name(&format!("{}.{}", BASE_FILE, app_env)).required(false));
        }

        if let Some(path) = config_file.filter(|p| !p.is_empty()) {
            builder = builder.add_source(File::with_name(&path).required(true));
        }

        builder = builder.add_source(Environment::default().try_parsing(true).source(env));

        let settings: Settings = builder
            .build()
            .and_then(Config::try_deserialize)
            .map_err(config_error)?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(AppError::Config("PORT must be non-zero".into()));
        }
        if self.db_max_connections == 0 {
            return Err(AppError::Config("DB_MAX_CONNECTIONS must be at least 1".into()));
        }
        let file_name = match Path::new(&self.queue_filepath).file_name() {
            Some(name) => name.to_string_lossy(),
            None => {
                return Err(AppError::Config(format!(
                    "QUEUE_FILEPATH must name a file: '{}'",
                    self.queue_filepath
                )))
            }
        };
        // The file name is sent back in Content-Disposition
        if file_name.chars().any(|c| c.is_control() || c == '"') {
            return Err(AppError::Config(format!(
                "QUEUE_FILEPATH file name contains control characters or quotes: {:?}",
                file_name
            )));
        }
        self.report_options()?;
        Ok(())
    }

    pub fn database(&self) -> DatabaseTarget {
        match self.database_url.as_deref().filter(|u| !u.is_empty()) {
            Some(url) if url.starts_with("sqlite:") => DatabaseTarget::Sqlite(expand_sqlite_url(url)),
            Some(url) => DatabaseTarget::PostgresUrl(url.to_string()),
            None => DatabaseTarget::Postgres(ConnectionParams {
                host: self.postgres_host.clone(),
                port: self.postgres_port,
                user: self.postgres_user.clone(),
                password: self.postgres_password.clone(),
                database: self.postgres_db.clone(),
            }),
        }
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.db_acquire_timeout_secs)
    }

    pub fn queue_filepath(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.queue_filepath).into_owned())
    }

    pub fn report_options(&self) -> Result<ReportOptions> {
        let offset = match self.report_utc_offset_minutes {
            Some(minutes) => minutes
                .checked_mul(60)
                .and_then(FixedOffset::east_opt)
                .ok_or_else(|| {
                    AppError::Config(format!(
                        "REPORT_UTC_OFFSET_MINUTES out of range: {}",
                        minutes
                    ))
                })?,
            None => ReportOptions::local_offset(),
        };

        ReportOptions::new(self.report_datetime_format.clone(), offset)
            .map_err(|e| AppError::Config(e.to_string()))
    }
}

fn expand_sqlite_url(url: &str) -> String {
    match url.strip_prefix("sqlite://") {
        Some(path) => format!("sqlite://{}", shellexpand::tilde(path)),
        None => url.to_string(),
    }
}

fn config_error(err: ConfigError) -> AppError {
    AppError::Config(err.to_string())
}
