// Report Rendering Errors

use queuedesk_core::error::AppError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("PDF encoding failed: {0}")]
    Pdf(String),

    #[error("Invalid date format '{0}'")]
    DateFormat(String),

    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

impl From<lopdf::Error> for RenderError {
    fn from(e: lopdf::Error) -> Self {
        RenderError::Pdf(e.to_string())
    }
}

impl From<RenderError> for AppError {
    fn from(e: RenderError) -> Self {
        match e {
            RenderError::Io(io) => AppError::Io(io),
            other => AppError::Render(other.to_string()),
        }
    }
}
