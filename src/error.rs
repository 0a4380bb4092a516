// Error taxonomy
// Validation errors surface directly; collaborator failures are recorded
// per-service and never abort a pipeline run.

use thiserror::Error;

pub const MAX_BATCH_SIZE: usize = 50;

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("task did not complete after {attempts} attempts")]
    TaskTimedOut { attempts: u32 },
    #[error("task failed with status: {0}")]
    TaskFailed(String),
}

#[derive(Error, Debug)]
pub enum HumanizerError {
    #[error("empty text provided")]
    EmptyText,
    #[error("invalid mode: {0} (expected fast, balanced or aggressive)")]
    InvalidMode(String),
    #[error("no texts provided for batch processing")]
    EmptyBatch,
    #[error("batch size too large: {len} texts (maximum {max} allowed)")]
    BatchTooLarge { len: usize, max: usize },
    #[error("batch id not found: {0}")]
    UnknownBatch(String),
}
