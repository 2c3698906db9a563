//! Configuration for impress-export
//!
//! One `ExportConfig` is built per export run and handed to the exporter by
//! reference. Every field has a default, so partial TOML or JSON documents
//! load.

use impress_citekeys::{KeyFormatter, DEFAULT_PATTERN};
use impress_latex::LatexMode;
use impress_records::TypeMap;
use serde::{Deserialize, Serialize};

/// Whether non-ASCII characters survive into the output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
pub enum UnicodeMode {
    Always,
    Never,
    /// Follow the export charset
    #[default]
    Auto,
}

impl UnicodeMode {
    /// Resolve against the export charset; `auto` means unicode for UTF-8 only
    pub fn resolve(self, charset: &str) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => charset.eq_ignore_ascii_case("utf-8"),
        }
    }
}

/// Export run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct ExportConfig {
    /// Cite key pattern
    pub citekey_format: String,
    /// Fields never written
    pub skip_fields: Vec<String>,
    /// Emit `options = {useprefix=true}` for names with a lowercase particle
    pub use_prefix: bool,
    /// Brace-protect every field that asks for it
    pub brace_all: bool,
    /// Write URLs as `\href{url}{label}`
    pub fancy_urls: bool,
    pub unicode: UnicodeMode,
    pub export_charset: String,
    /// Write the host-supplied `file` field
    pub export_file_data: bool,
    /// Write the record's `notes` field as `annote`
    pub export_notes: bool,
    /// Prefer `journalAbbreviation` over `publicationTitle` for `journal`
    pub use_journal_abbreviation: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            citekey_format: DEFAULT_PATTERN.to_string(),
            skip_fields: Vec::new(),
            use_prefix: false,
            brace_all: false,
            fancy_urls: false,
            unicode: UnicodeMode::Auto,
            export_charset: "UTF-8".to_string(),
            export_file_data: false,
            export_notes: false,
            use_journal_abbreviation: false,
        }
    }
}

impl ExportConfig {
    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Whether the output keeps non-ASCII characters
    pub fn unicode_output(&self) -> bool {
        self.unicode.resolve(&self.export_charset)
    }

    /// Character table used for escaping
    pub fn latex_mode(&self) -> LatexMode {
        if self.unicode_output() {
            LatexMode::Unicode
        } else {
            LatexMode::Ascii
        }
    }

    pub fn skips(&self, field: &str) -> bool {
        self.skip_fields.iter().any(|skip| skip == field)
    }

    /// Key formatter for the configured pattern
    pub fn key_formatter(&self, types: TypeMap) -> KeyFormatter {
        KeyFormatter::new(&self.citekey_format, types)
    }
}
