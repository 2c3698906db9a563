//! Batch BibTeX export

use crate::config::ExportConfig;
use crate::error::Result;
use crate::escape::{EscapeOptions, FieldValue};
use crate::field_map::FieldMap;
use crate::writer::{EntryWriter, WriterWarning};
use impress_citekeys::{CiteKeyRegistry, RegistryWarning};
use impress_records::{parse_date, primary_creator_role, Creator, CreatorRole, Record, TypeMap};
use std::fmt::Write;

/// Anomaly reported by an export run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportWarning {
    Registry(RegistryWarning),
    /// A field was written twice in the entry with this key
    DuplicateField { key: String, field: String },
}

impl std::fmt::Display for ExportWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Registry(warning) => write!(f, "{}", warning),
            Self::DuplicateField { key, field } => {
                write!(f, "{}: field {} output more than once", key, field)
            }
        }
    }
}

/// Outcome of an export run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    /// Entries written
    pub entries: usize,
    pub warnings: Vec<ExportWarning>,
}

/// Writes batches of records as BibTeX
///
/// Each call to [`export`](Self::export) is a fresh run: cite keys are
/// assigned over the whole batch before the first entry is written.
pub struct BibTeXExporter {
    config: ExportConfig,
    fields: FieldMap,
    registry: CiteKeyRegistry,
}

impl BibTeXExporter {
    pub fn new(config: ExportConfig) -> Self {
        let registry = CiteKeyRegistry::new(config.key_formatter(TypeMap::bibtex()));
        Self {
            config,
            fields: FieldMap::bibtex(),
            registry,
        }
    }

    /// Replace the entry type table
    pub fn with_type_map(mut self, types: TypeMap) -> Self {
        self.registry = CiteKeyRegistry::new(self.config.key_formatter(types));
        self
    }

    /// Replace the table of directly copied fields
    pub fn with_field_map(mut self, fields: FieldMap) -> Self {
        self.fields = fields;
        self
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Key assignments of the last run
    pub fn registry(&self) -> &CiteKeyRegistry {
        &self.registry
    }

    /// Export a batch into `sink`
    ///
    /// Notes and attachments are skipped. Only a failing sink aborts the run.
    pub fn export<W: Write>(&mut self, records: Vec<Record>, sink: &mut W) -> Result<ExportReport> {
        tracing::debug!("Export configuration: {:?}", self.config);

        self.registry.reset();
        let records = self.registry.initialize(records);

        let mut report = ExportReport {
            entries: 0,
            warnings: self
                .registry
                .warnings()
                .iter()
                .cloned()
                .map(ExportWarning::Registry)
                .collect(),
        };

        for record in records.iter().filter(|record| record.is_exportable()) {
            let Some(key) = self.registry.key_for(&record.item_id) else {
                continue;
            };
            let entry_type = self.registry.formatter().types().to_output(record);

            write!(sink, "@{}{{{}", entry_type, key)?;
            let mut writer = EntryWriter::new(&mut *sink, &self.config);
            self.write_entry(&mut writer, record)?;
            writer.flush_entry(&entry_type)?;
            report.warnings.extend(writer.into_warnings().into_iter().map(
                |WriterWarning::DuplicateField(field)| ExportWarning::DuplicateField {
                    key: key.to_string(),
                    field,
                },
            ));
            write!(sink, "\n}}\n\n")?;

            report.entries += 1;
            tracing::debug!("Exported item {} as {}", record.item_id, key);
        }

        Ok(report)
    }

    /// Export a batch into a new string
    pub fn export_to_string(&mut self, records: Vec<Record>) -> Result<String> {
        let mut out = String::new();
        self.export(records, &mut out)?;
        Ok(out)
    }

    fn write_entry<W: Write>(&self, writer: &mut EntryWriter<'_, W>, record: &Record) -> Result<()> {
        writer.write_escaped("title", &record.title.as_str().into(), &EscapeOptions::braced())?;
        self.write_creators(writer, record)?;
        self.write_container(writer, record)?;
        self.write_date(writer, record)?;
        writer.write_escaped("pages", &record.pages.as_str().into(), &EscapeOptions::default())?;
        writer.write_field_map(record, &self.fields)?;

        let keywords = FieldValue::List(
            record
                .tags
                .iter()
                .map(|tag| FieldValue::from(tag.tag.as_str()))
                .collect(),
        );
        writer.write_escaped("keywords", &keywords, &EscapeOptions::separated(", "))?;

        if self.config.use_prefix && record.creators.iter().any(has_name_particle) {
            writer.write_field("options", Some("useprefix=true"), false)?;
        }
        if self.config.export_notes {
            if let Some(notes) = record.field("notes") {
                writer.write_escaped("annote", &notes.into(), &EscapeOptions::default())?;
            }
        }
        if self.config.export_file_data {
            if let Some(file) = record.field("file") {
                writer.write_verbatim("file", file)?;
            }
        }

        writer.write_extra(&record.extra, "note")
    }

    /// Primary creators become `author`, editors `editor`, translators
    /// `translator`; other roles are not exported.
    fn write_creators<W: Write>(&self, writer: &mut EntryWriter<'_, W>, record: &Record) -> Result<()> {
        let primary = primary_creator_role(&record.item_type);
        let mut authors = Vec::new();
        let mut editors = Vec::new();
        let mut translators = Vec::new();

        for creator in &record.creators {
            if creator.role == primary || creator.role == CreatorRole::Author {
                authors.push(creator_name(creator));
            } else if creator.role.is_editor() {
                editors.push(creator_name(creator));
            } else if creator.role == CreatorRole::Translator {
                translators.push(creator_name(creator));
            }
        }

        let names = EscapeOptions::separated(" and ");
        writer.write_escaped("author", &FieldValue::List(authors), &names)?;
        writer.write_escaped("editor", &FieldValue::List(editors), &names)?;
        writer.write_escaped("translator", &FieldValue::List(translators), &names)
    }

    fn write_container<W: Write>(&self, writer: &mut EntryWriter<'_, W>, record: &Record) -> Result<()> {
        let (field, title) = match record.item_type.as_str() {
            "journalArticle" | "magazineArticle" | "newspaperArticle" => {
                let abbreviation = if self.config.use_journal_abbreviation {
                    record.field("journalAbbreviation")
                } else {
                    None
                };
                ("journal", abbreviation.or_else(|| record.field("publicationTitle")))
            }
            "bookSection" | "conferencePaper" => (
                "booktitle",
                record
                    .field("publicationTitle")
                    .or_else(|| record.field("bookTitle"))
                    .or_else(|| record.field("proceedingsTitle")),
            ),
            _ => return Ok(()),
        };

        match title {
            Some(title) => writer.write_escaped(field, &title.into(), &EscapeOptions::braced()),
            None => Ok(()),
        }
    }

    fn write_date<W: Write>(&self, writer: &mut EntryWriter<'_, W>, record: &Record) -> Result<()> {
        let date = parse_date(&record.date);
        match date.year {
            Some(year) => {
                writer.write_field("year", Some(&year.to_string()), false)?;
                writer.write_field("month", date.month_macro(), true)
            }
            // Unparseable dates are kept verbatim
            None => writer.write_escaped("year", &record.date.as_str().into(), &EscapeOptions::default()),
        }
    }
}

/// Single-field names (institutions) are brace-protected
fn creator_name(creator: &Creator) -> FieldValue {
    match creator.first_name.as_deref().map(str::trim) {
        Some(first) if !first.is_empty() => FieldValue::Text(creator.to_bibtex_format()),
        _ => FieldValue::Literal(creator.last_name.trim().to_string()),
    }
}

/// "van der Waals", "de Broglie"
fn has_name_particle(creator: &Creator) -> bool {
    let mut words = creator.last_name.split_whitespace();
    matches!(
        (words.next(), words.next()),
        (Some(first), Some(_)) if first.chars().next().is_some_and(char::is_lowercase)
    )
}
