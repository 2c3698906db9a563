//! Error types for record loading

use thiserror::Error;

/// Errors raised while loading records from their serialized form
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Invalid record JSON: {0}")]
    Json(#[from] serde_json::Error),
}
