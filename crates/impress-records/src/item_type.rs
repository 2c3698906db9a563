//! Item type mapping between the library and the output format
//!
//! Each source item type maps to one or more output entry types. The first
//! alias is canonical for export. For the reverse direction the first source
//! type to list an alias claims it, unless a later source type marks the
//! alias with a leading `:`.

use super::Record;
use std::collections::HashMap;

/// Entry type used when a source type has no mapping
pub const FALLBACK_TYPE: &str = "misc";

/// How a source type resolves to an output type
#[derive(Clone)]
pub enum TypeTarget {
    Literal(String),
    /// Decided per record (e.g. thesis -> phdthesis / mastersthesis)
    Resolver(fn(&Record) -> String),
}

impl std::fmt::Debug for TypeTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Literal(s) => write!(f, "Literal({:?})", s),
            Self::Resolver(_) => write!(f, "Resolver(..)"),
        }
    }
}

/// Bidirectional item type table
#[derive(Debug, Clone, Default)]
pub struct TypeMap {
    to_output: HashMap<String, TypeTarget>,
    to_source: HashMap<String, String>,
}

impl TypeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a source type to its output aliases
    pub fn insert(&mut self, source: &str, aliases: &[&str]) {
        let mut canonical = None;
        for alias in aliases {
            let forced = alias.starts_with(':');
            let name = alias.trim_start_matches(':');
            if forced || !self.to_source.contains_key(name) {
                self.to_source.insert(name.to_string(), source.to_string());
            }
            canonical.get_or_insert_with(|| name.to_string());
        }
        if let Some(canonical) = canonical {
            self.to_output
                .insert(source.to_string(), TypeTarget::Literal(canonical));
        }
    }

    /// Map a source type through a per-record resolver
    ///
    /// Resolvers have no reverse entries.
    pub fn insert_resolver(&mut self, source: &str, resolver: fn(&Record) -> String) {
        self.to_output
            .insert(source.to_string(), TypeTarget::Resolver(resolver));
    }

    /// Output entry type for a record, `misc` when unmapped
    pub fn to_output(&self, record: &Record) -> String {
        let resolved = match self.to_output.get(&record.item_type) {
            Some(TypeTarget::Literal(name)) => name.clone(),
            Some(TypeTarget::Resolver(resolve)) => resolve(record),
            None => String::new(),
        };
        if resolved.is_empty() {
            FALLBACK_TYPE.to_string()
        } else {
            resolved
        }
    }

    /// Source item type for an output entry type
    pub fn to_source(&self, output: &str) -> Option<&str> {
        self.to_source
            .get(&output.to_lowercase())
            .map(String::as_str)
    }

    /// The BibTeX entry type table
    pub fn bibtex() -> Self {
        let mut map = Self::new();
        map.insert("journalArticle", &["article"]);
        map.insert("magazineArticle", &["article"]);
        map.insert("newspaperArticle", &["article"]);
        map.insert("book", &["book", "booklet", "manual"]);
        map.insert("bookSection", &["incollection", "inbook"]);
        map.insert("conferencePaper", &["inproceedings", ":conference"]);
        map.insert("report", &["techreport"]);
        map.insert("manuscript", &["unpublished"]);
        map.insert("document", &["misc"]);
        map.insert("webpage", &["online"]);
        map.insert("computerProgram", &["software"]);
        map.insert("dataset", &["dataset"]);
        map.insert_resolver("thesis", thesis_type);
        map
    }
}

fn thesis_type(record: &Record) -> String {
    let kind = record
        .field("thesisType")
        .unwrap_or_default()
        .to_lowercase();
    if kind.contains("master") || kind.contains("m.sc") || kind.contains("msc") {
        "mastersthesis".to_string()
    } else {
        "phdthesis".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_output() {
        let map = TypeMap::bibtex();
        assert_eq!(map.to_output(&Record::new("1", "K", "book")), "book");
        assert_eq!(
            map.to_output(&Record::new("2", "K", "bookSection")),
            "incollection"
        );
        assert_eq!(map.to_output(&Record::new("3", "K", "letter")), "misc");
    }

    #[test]
    fn test_first_alias_claims_reverse() {
        let map = TypeMap::bibtex();
        assert_eq!(map.to_source("article"), Some("journalArticle"));
        assert_eq!(map.to_source("ARTICLE"), Some("journalArticle"));
        assert_eq!(map.to_source("inbook"), Some("bookSection"));
        assert_eq!(map.to_source("nonsense"), None);
    }

    #[test]
    fn test_forced_alias_overrides() {
        let mut map = TypeMap::new();
        map.insert("conferencePaper", &["inproceedings"]);
        map.insert("presentation", &["misc", "inproceedings"]);
        assert_eq!(map.to_source("inproceedings"), Some("conferencePaper"));

        map.insert("presentation", &["misc", ":inproceedings"]);
        assert_eq!(map.to_source("inproceedings"), Some("presentation"));
        assert_eq!(
            map.to_output(&Record::new("1", "K", "presentation")),
            "misc"
        );
    }

    #[test]
    fn test_resolver() {
        let map = TypeMap::bibtex();
        let phd = Record::new("1", "K", "thesis").with_field("thesisType", "PhD dissertation");
        let msc = Record::new("2", "K", "thesis").with_field("thesisType", "Master's thesis");
        assert_eq!(map.to_output(&phd), "phdthesis");
        assert_eq!(map.to_output(&msc), "mastersthesis");
        assert_eq!(map.to_source("phdthesis"), None);
    }
}
