//! Cite key pattern interpreter

use crate::pattern::{Directive, Filter, Pattern, Segment, Template};
use impress_records::{Record, TypeMap};

/// Pattern used when none is configured
pub const DEFAULT_PATTERN: &str = "[auth:lower][year]";

/// Prefix of the key used when every alternative comes out empty
pub const FALLBACK_PREFIX: &str = "zotero-";

/// Recoverable problem found while formatting a key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatDiagnostic {
    UnknownFunction(String),
    UnknownFilter(String),
}

impl std::fmt::Display for FormatDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownFunction(name) => write!(f, "requested non-existent item function {}", name),
            Self::UnknownFilter(name) => write!(f, "requested non-existent item filter {}", name),
        }
    }
}

/// A formatted (uncleaned) key with the diagnostics raised on the way
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedKey {
    pub key: String,
    pub diagnostics: Vec<FormatDiagnostic>,
}

/// Formats records into candidate keys
///
/// The pattern is parsed once; formatting never fails. Unknown functions and
/// filters resolve to the empty string.
#[derive(Debug, Clone)]
pub struct KeyFormatter {
    pattern: Pattern,
    types: TypeMap,
}

impl Default for KeyFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERN, TypeMap::bibtex())
    }
}

impl KeyFormatter {
    pub fn new(pattern: &str, types: TypeMap) -> Self {
        Self {
            pattern: Pattern::parse(pattern),
            types,
        }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn types(&self) -> &TypeMap {
        &self.types
    }

    /// Candidate key for a record
    pub fn format(&self, record: &Record) -> String {
        self.format_with_diagnostics(record).key
    }

    /// Like [`format`](Self::format), also returning the diagnostics
    ///
    /// The first alternative with a non-empty result wins; if all are empty
    /// the key falls back to `zotero-` plus the record's library key.
    pub fn format_with_diagnostics(&self, record: &Record) -> FormattedKey {
        let mut diagnostics = Vec::new();

        for template in &self.pattern.alternatives {
            let key = self.render(template, record, &mut diagnostics);
            if !key.is_empty() {
                return FormattedKey { key, diagnostics };
            }
        }

        FormattedKey {
            key: format!("{}{}", FALLBACK_PREFIX, record.key),
            diagnostics,
        }
    }

    fn render(
        &self,
        template: &Template,
        record: &Record,
        diagnostics: &mut Vec<FormatDiagnostic>,
    ) -> String {
        let mut key = String::new();
        for segment in &template.segments {
            match segment {
                Segment::Literal(text) => key.push_str(text),
                Segment::Directive(directive) => {
                    key.push_str(&self.resolve(directive, record, diagnostics))
                }
            }
        }
        key
    }

    fn resolve(
        &self,
        directive: &Directive,
        record: &Record,
        diagnostics: &mut Vec<FormatDiagnostic>,
    ) -> String {
        let mut value = directive.function.evaluate(
            record,
            &self.types,
            directive.only_editors,
            directive.repeat,
            directive.index,
        );

        // Fall back to a record field named like the directive
        if value.is_empty() {
            if let Some(field) = record.field(&directive.property) {
                value = field.to_string();
            }
        }

        if value.is_empty() && directive.function.is_unknown() {
            report(
                diagnostics,
                FormatDiagnostic::UnknownFunction(directive.property.clone()),
            );
        }

        for filter in &directive.filters {
            match filter {
                Filter::Default(text) => {
                    if value.is_empty() {
                        value = text.clone();
                    }
                }
                Filter::Named(named) => value = named.apply(&value),
                Filter::Unknown(name) => {
                    report(diagnostics, FormatDiagnostic::UnknownFilter(name.clone()));
                    value.clear();
                }
            }
        }

        value
    }
}

fn report(diagnostics: &mut Vec<FormatDiagnostic>, diagnostic: FormatDiagnostic) {
    tracing::warn!("{}", diagnostic);
    diagnostics.push(diagnostic);
}
