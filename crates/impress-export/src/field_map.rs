//! Source field -> BibTeX field mapping

/// How a mapped value is escaped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Full markup conversion
    Text,
    /// Full conversion, brace-protected under `brace_all`
    Literal,
    /// A link, written through `write_url`
    Url,
    /// An identifier such as a DOI: specials escaped, nothing else touched
    Verbatim,
}

/// One mapped field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    /// Output field name
    pub field: String,
    /// Source field name
    pub source: String,
    pub kind: FieldKind,
}

/// Ordered list of field mappings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    mappings: Vec<FieldMapping>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, field: &str, source: &str) -> Self {
        self.with_kind(field, source, FieldKind::Text)
    }

    pub fn with_literal(self, field: &str, source: &str) -> Self {
        self.with_kind(field, source, FieldKind::Literal)
    }

    pub fn with_kind(mut self, field: &str, source: &str, kind: FieldKind) -> Self {
        self.mappings.push(FieldMapping {
            field: field.to_string(),
            source: source.to_string(),
            kind,
        });
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldMapping> {
        self.mappings.iter()
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Fields copied straight across for BibTeX
    ///
    /// Title, creators, date, pages, tags, container title and extra get
    /// dedicated handling in the exporter and are not listed.
    pub fn bibtex() -> Self {
        Self::new()
            .with("volume", "volume")
            .with("number", "issue")
            .with("number", "reportNumber")
            .with("edition", "edition")
            .with_literal("series", "series")
            .with_literal("publisher", "publisher")
            .with_literal("institution", "institution")
            .with_literal("school", "university")
            .with("address", "place")
            .with("isbn", "ISBN")
            .with("issn", "ISSN")
            .with_kind("doi", "DOI", FieldKind::Verbatim)
            .with_kind("url", "url", FieldKind::Url)
            .with("urldate", "accessDate")
            .with("abstract", "abstractNote")
            .with("langid", "language")
    }
}
