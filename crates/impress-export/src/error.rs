//! Error types for impress-export

use impress_records::RecordError;
use thiserror::Error;

/// Result type alias for export operations
pub type Result<T> = std::result::Result<T, ExportError>;

/// Errors that abort an export
///
/// Everything else (unknown pattern functions, malformed markup, duplicate
/// keys or fields) is reported as a warning and the export continues.
#[derive(Error, Debug)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Error), uniffi(flat_error))]
pub enum ExportError {
    /// Configuration could not be parsed
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration could not be serialized
    #[error("Configuration serialization error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The output sink refused a write
    #[error("Write error: {0}")]
    Write(#[from] std::fmt::Error),

    #[error("Record error: {0}")]
    Records(#[from] RecordError),
}
