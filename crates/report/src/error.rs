use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Refusing to render an inconsistent schedule: {0}")]
    Inconsistent(#[from] CoreError),

    #[error("Failed to serialize result: {0}")]
    Json(#[from] serde_json::Error),
}
