//! Cite key generation for BibTeX export
//!
//! Keys come from a small pattern language (`[auth:lower][year]`,
//! `[edtr3_1]`, `[shorttitle]|[title]`) evaluated per record, then pass
//! through a per-batch registry that honours keys pinned in a record's
//! `extra` field and suffixes collisions (`smith2020`, `smith2020a`, ...).

pub mod clean;
pub mod formatter;
pub mod functions;
pub mod pattern;
pub mod registry;

pub use clean::{clean_key, remove_diacritics};
pub use formatter::{FormatDiagnostic, FormattedKey, KeyFormatter, DEFAULT_PATTERN, FALLBACK_PREFIX};
pub use functions::{CreatorBuckets, Function, STOP_WORDS};
pub use pattern::{Directive, Filter, NamedFilter, Pattern, Segment, Template};
pub use registry::{
    embedded_key, CiteKeyEntry, CiteKeyRegistry, Duplicate, ItemKeyState, RegistryWarning,
};

/// Clean a candidate cite key
#[cfg(feature = "uniffi")]
#[uniffi::export]
pub fn clean_key_ffi(key: String) -> String {
    clean_key(&key)
}

// Setup UniFFI when the feature is enabled
#[cfg(feature = "uniffi")]
uniffi::setup_scaffolding!();
