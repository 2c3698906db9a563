//! Bibliographic records as handed to the export pipeline
//!
//! This crate provides the read-only input model shared by the cite key
//! engine and the BibTeX exporter:
//! - Record: one library item (type, creators, title, date, extra, tags, pages)
//! - Creator: a named contributor with a role
//! - TypeMap: source item type <-> output entry type mapping
//! - Date parsing for year/month extraction

pub mod creator;
pub mod date;
pub mod error;
pub mod item_type;
pub mod record;

pub use creator::*;
pub use date::*;
pub use error::*;
pub use item_type::*;
pub use record::*;

// Setup UniFFI when the feature is enabled
#[cfg(feature = "uniffi")]
uniffi::setup_scaffolding!();
