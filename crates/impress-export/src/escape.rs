//! Field value escaping

use crate::config::ExportConfig;
use impress_latex::html_to_latex;

/// A value about to be written to a BibTeX field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Written as is
    Number(i64),
    /// Rich text, converted to LaTeX
    Text(String),
    /// Rich text, converted and wrapped in braces so BibTeX leaves it alone
    Literal(String),
    /// Each element escaped, then joined with the separator
    List(Vec<FieldValue>),
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscapeOptions {
    /// Separator for list values
    pub sep: String,
    /// Ask for brace protection; honoured when `brace_all` is on
    pub brace: bool,
}

impl Default for EscapeOptions {
    fn default() -> Self {
        Self {
            sep: ",".to_string(),
            brace: false,
        }
    }
}

impl EscapeOptions {
    pub fn separated(sep: &str) -> Self {
        Self {
            sep: sep.to_string(),
            ..Default::default()
        }
    }

    pub fn braced() -> Self {
        Self {
            brace: true,
            ..Default::default()
        }
    }
}

/// Escape a value for output, `None` when there is nothing to write
pub fn latex_escape(
    value: &FieldValue,
    options: &EscapeOptions,
    config: &ExportConfig,
) -> Option<String> {
    let mode = config.latex_mode();
    match value {
        FieldValue::Number(n) => Some(n.to_string()),
        FieldValue::List(values) => {
            let parts: Vec<String> = values
                .iter()
                .filter_map(|value| latex_escape(value, options, config))
                .collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(&options.sep))
            }
        }
        FieldValue::Text(text) | FieldValue::Literal(text) if text.is_empty() => None,
        FieldValue::Literal(text) => Some(format!("{{{}}}", html_to_latex(text, mode))),
        FieldValue::Text(text) if options.brace && config.brace_all => {
            Some(format!("{{{}}}", html_to_latex(text, mode)))
        }
        FieldValue::Text(text) => Some(html_to_latex(text, mode)),
    }
}
