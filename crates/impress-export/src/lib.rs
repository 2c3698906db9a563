//! BibTeX export driver
//!
//! Ties the record model, the cite key engine and the markup converter
//! together:
//! - ExportConfig: per-run options, loadable from TOML or JSON
//! - latex_escape: field value escaping
//! - EntryWriter: per-entry field output, `biblatexdata[]` directives in extra
//! - BibTeXExporter: batch export into any `fmt::Write` sink

pub mod config;
pub mod error;
pub mod escape;
pub mod exporter;
pub mod field_map;
pub mod writer;

pub use config::{ExportConfig, UnicodeMode};
pub use error::{ExportError, Result};
pub use escape::{latex_escape, EscapeOptions, FieldValue};
pub use exporter::{BibTeXExporter, ExportReport, ExportWarning};
pub use field_map::{FieldKind, FieldMap, FieldMapping};
pub use writer::{EntryWriter, WriterWarning};

use impress_records::records_from_json;

/// Export a JSON array of records with the given configuration
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn export_records_json(
    records_json: &str,
    config: ExportConfig,
) -> std::result::Result<String, ExportError> {
    let records = records_from_json(records_json)?;
    BibTeXExporter::new(config).export_to_string(records)
}

// Setup UniFFI when the feature is enabled
#[cfg(feature = "uniffi")]
uniffi::setup_scaffolding!();
