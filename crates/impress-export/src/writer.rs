//! Per-entry field writer

use crate::config::ExportConfig;
use crate::error::Result;
use crate::escape::{latex_escape, EscapeOptions, FieldValue};
use crate::field_map::{FieldKind, FieldMap};
use impress_latex::{minimal_escape, url_to_latex};
use impress_records::Record;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use std::fmt::Write;

lazy_static! {
    static ref BIBLATEX_DATA: Regex = Regex::new(r"biblatexdata\[([^\]]+)\]").unwrap();
}

/// Problem noticed while writing an entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriterWarning {
    /// The field was written more than once
    DuplicateField(String),
}

impl std::fmt::Display for WriterWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateField(name) => write!(f, "Field {} output more than once!", name),
        }
    }
}

/// Writes the fields of one entry into a sink
///
/// The entry header (`@type{key`) and the closing brace belong to the
/// caller; the writer only appends `,\n  name = value` fragments.
pub struct EntryWriter<'a, W: Write> {
    sink: &'a mut W,
    config: &'a ExportConfig,
    written: HashSet<String>,
    warnings: Vec<WriterWarning>,
}

impl<'a, W: Write> EntryWriter<'a, W> {
    pub fn new(sink: &'a mut W, config: &'a ExportConfig) -> Self {
        Self {
            sink,
            config,
            written: HashSet::new(),
            warnings: Vec::new(),
        }
    }

    /// Write an already escaped value
    ///
    /// Skipped fields and empty values write nothing. Non-bare values are
    /// wrapped in braces.
    pub fn write_field(&mut self, name: &str, value: Option<&str>, bare: bool) -> Result<()> {
        if self.config.skips(name) {
            return Ok(());
        }
        let Some(value) = value.filter(|v| !v.is_empty()) else {
            return Ok(());
        };

        if !self.written.insert(name.to_string()) {
            let warning = WriterWarning::DuplicateField(name.to_string());
            tracing::warn!("{}", warning);
            self.warnings.push(warning);
        }

        if bare {
            write!(self.sink, ",\n  {} = {}", name, value)?;
        } else {
            write!(self.sink, ",\n  {} = {{{}}}", name, value)?;
        }
        Ok(())
    }

    /// Escape and write a value
    pub fn write_escaped(
        &mut self,
        name: &str,
        value: &FieldValue,
        options: &EscapeOptions,
    ) -> Result<()> {
        let escaped = latex_escape(value, options, self.config);
        self.write_field(name, escaped.as_deref(), false)
    }

    pub fn write_url(&mut self, name: &str, url: &str) -> Result<()> {
        if url.is_empty() {
            return Ok(());
        }
        let escaped = url_to_latex(url, self.config.latex_mode(), self.config.fancy_urls);
        self.write_field(name, Some(&escaped), false)
    }

    /// Write an identifier (DOI, file path) with only the specials escaped
    pub fn write_verbatim(&mut self, name: &str, value: &str) -> Result<()> {
        if value.is_empty() {
            return Ok(());
        }
        let escaped = minimal_escape(value, self.config.latex_mode());
        self.write_field(name, Some(&escaped), false)
    }

    /// Write the extra field under `field`
    ///
    /// A `biblatexdata[k1=v1;k2=v2]` directive is taken out of the text and
    /// each assignment written as its own field first.
    pub fn write_extra(&mut self, extra: &str, field: &str) -> Result<()> {
        let mut remainder = extra.to_string();

        if let Some(caps) = BIBLATEX_DATA.captures(extra) {
            if let (Some(whole), Some(data)) = (caps.get(0), caps.get(1)) {
                remainder = format!("{}{}", &extra[..whole.start()], &extra[whole.end()..])
                    .trim()
                    .to_string();
                for assignment in data.as_str().split(';') {
                    let mut parts = assignment.splitn(2, '=');
                    let (Some(name), Some(value)) = (parts.next(), parts.next()) else {
                        continue;
                    };
                    let name = name.trim();
                    if name.is_empty() {
                        continue;
                    }
                    self.write_escaped(name, &value.trim().into(), &EscapeOptions::default())?;
                }
            }
        }

        self.write_escaped(field, &remainder.into(), &EscapeOptions::default())
    }

    /// Write every mapped source field the record has
    pub fn write_field_map(&mut self, record: &Record, map: &FieldMap) -> Result<()> {
        for mapping in map.iter() {
            let Some(value) = record.field(&mapping.source) else {
                continue;
            };
            match mapping.kind {
                FieldKind::Url => self.write_url(&mapping.field, value)?,
                FieldKind::Verbatim => self.write_verbatim(&mapping.field, value)?,
                FieldKind::Text | FieldKind::Literal => {
                    let options = EscapeOptions {
                        brace: mapping.kind == FieldKind::Literal,
                        ..Default::default()
                    };
                    self.write_escaped(&mapping.field, &value.into(), &options)?;
                }
            }
        }
        Ok(())
    }

    /// Make sure the entry carries at least one field
    pub fn flush_entry(&mut self, entry_type: &str) -> Result<()> {
        if self.written.is_empty() {
            self.write_escaped("type", &entry_type.into(), &EscapeOptions::default())?;
        }
        Ok(())
    }

    /// Number of distinct fields written so far
    pub fn field_count(&self) -> usize {
        self.written.len()
    }

    pub fn warnings(&self) -> &[WriterWarning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<WriterWarning> {
        self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(config: &ExportConfig, f: impl FnOnce(&mut EntryWriter<'_, String>)) -> String {
        let mut out = String::new();
        let mut writer = EntryWriter::new(&mut out, config);
        f(&mut writer);
        out
    }

    #[test]
    fn test_write_field() {
        let config = ExportConfig::default();
        let out = written(&config, |w| {
            w.write_field("title", Some("A Title"), false).unwrap();
            w.write_field("month", Some("mar"), true).unwrap();
            w.write_field("note", None, false).unwrap();
            w.write_field("note", Some(""), false).unwrap();
        });
        assert_eq!(out, ",\n  title = {A Title},\n  month = mar");
    }

    #[test]
    fn test_skip_fields() {
        let config = ExportConfig {
            skip_fields: vec!["abstract".to_string()],
            ..Default::default()
        };
        let out = written(&config, |w| {
            w.write_field("abstract", Some("Long text"), false).unwrap();
            assert_eq!(w.field_count(), 0);
        });
        assert!(out.is_empty());
    }

    #[test]
    fn test_duplicate_field_warns_and_writes() {
        let config = ExportConfig::default();
        let mut out = String::new();
        let mut writer = EntryWriter::new(&mut out, &config);
        writer.write_field("note", Some("one"), false).unwrap();
        writer.write_field("note", Some("two"), false).unwrap();
        assert_eq!(
            writer.warnings(),
            &[WriterWarning::DuplicateField("note".to_string())]
        );
        assert_eq!(writer.field_count(), 1);
        assert_eq!(out, ",\n  note = {one},\n  note = {two}");
    }

    #[test]
    fn test_write_extra_with_biblatex_data() {
        let config = ExportConfig::default();
        let out = written(&config, |w| {
            w.write_extra("Read twice. biblatexdata[origdate=1905;pubstate=forthcoming;bogus]", "note")
                .unwrap();
        });
        assert_eq!(
            out,
            ",\n  origdate = {1905},\n  pubstate = {forthcoming},\n  note = {Read twice.}"
        );
    }

    #[test]
    fn test_write_extra_only_directive() {
        let config = ExportConfig::default();
        let out = written(&config, |w| {
            w.write_extra("biblatexdata[langid=german]", "note").unwrap();
        });
        assert_eq!(out, ",\n  langid = {german}");
    }

    #[test]
    fn test_write_url() {
        let config = ExportConfig::default();
        let out = written(&config, |w| w.write_url("url", "http://x.org/a_b").unwrap());
        assert_eq!(out, ",\n  url = {http://x.org/a\\_b}");

        let fancy = ExportConfig {
            fancy_urls: true,
            ..Default::default()
        };
        let out = written(&fancy, |w| w.write_url("url", "http://x.org/a_b").unwrap());
        assert_eq!(out, ",\n  url = {\\href{http://x.org/a\\_b}{http://x.org/a\\_b}}");
    }

    #[test]
    fn test_doi_keeps_identifier_characters() {
        let config = ExportConfig::default();
        let record = Record::new("1", "K", "journalArticle")
            .with_field("DOI", "10.1002/(SICI)x~y<z>_1")
            .with_field("url", "http://x.org/~me");
        let out = written(&config, |w| w.write_field_map(&record, &FieldMap::bibtex()).unwrap());
        assert_eq!(
            out,
            ",\n  doi = {10.1002/(SICI)x~y<z>\\_1},\n  url = {http://x.org/~me}"
        );
    }

    #[test]
    fn test_flush_entry() {
        let config = ExportConfig::default();
        let out = written(&config, |w| w.flush_entry("misc").unwrap());
        assert_eq!(out, ",\n  type = {misc}");

        let out = written(&config, |w| {
            w.write_field("title", Some("T"), false).unwrap();
            w.flush_entry("misc").unwrap();
        });
        assert_eq!(out, ",\n  title = {T}");
    }
}
