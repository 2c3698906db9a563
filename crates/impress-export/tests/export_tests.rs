//! BibTeX export integration tests

mod common;

use common::fixtures::{fixture_path, load_fixture, load_records};
use impress_export::{
    export_records_json, latex_escape, BibTeXExporter, EscapeOptions, ExportConfig, ExportError,
    ExportWarning, FieldValue,
};
use impress_records::{Creator, CreatorRole, Record};
use proptest::prelude::*;

fn fixture_config() -> ExportConfig {
    ExportConfig::from_toml(&load_fixture("export.toml")).unwrap()
}

fn export_library() -> (BibTeXExporter, String) {
    let mut exporter = BibTeXExporter::new(fixture_config());
    let out = exporter
        .export_to_string(load_records("export_library.json"))
        .unwrap();
    (exporter, out)
}

fn entry<'a>(out: &'a str, header: &str) -> &'a str {
    let start = out
        .find(header)
        .unwrap_or_else(|| panic!("no entry {} in\n{}", header, out));
    let len = out[start..].find("\n}\n\n").map_or(out.len() - start, |end| end + 4);
    &out[start..start + len]
}

#[test]
fn test_config_fixture() {
    assert!(fixture_path("export.toml").exists());
    let config = fixture_config();
    assert!(config.fancy_urls);
    assert!(config.skips("abstract"));
}

#[test]
fn test_library_keys() {
    let (exporter, out) = export_library();
    let registry = exporter.registry();
    assert_eq!(registry.key_for("206"), Some("knuth1984"));
    assert_eq!(registry.key_for("201"), Some("knuth1984a"));
    assert_eq!(registry.key_for("202"), Some("knuth1984b"));
    assert_eq!(registry.key_for("203"), Some("turing1938"));
    assert_eq!(registry.key_for("204"), Some("zotero-WEBPAGE1"));
    assert_eq!(registry.key_for("205"), None);

    assert_eq!(out.matches("\n}\n\n").count(), 5);
    assert!(!out.contains("Loose note"));
}

#[test]
fn test_article_entry() {
    let (_, out) = export_library();
    assert_eq!(
        entry(&out, "@article{knuth1984a,"),
        "@article{knuth1984a,\n  \
         title = {Literate Programming},\n  \
         author = {Knuth, Donald E.},\n  \
         journal = {Comput. J.},\n  \
         year = {1984},\n  \
         month = may,\n  \
         pages = {97-111},\n  \
         volume = {27},\n  \
         number = {2},\n  \
         doi = {10.1093/comjnl/27.2.97},\n  \
         keywords = {programming, TeX \\& friends},\n  \
         pubstate = {published},\n  \
         note = {Classic.}\n}\n\n"
    );
}

#[test]
fn test_book_section_entry() {
    let (_, out) = export_library();
    assert_eq!(
        entry(&out, "@incollection{knuth1984b,"),
        "@incollection{knuth1984b,\n  \
         title = {Typesetting \\emph{Concrete Mathematics}},\n  \
         author = {Knuth, Donald E.},\n  \
         editor = {Patashnik, Oren},\n  \
         booktitle = {TUGboat Anthology},\n  \
         year = {1984},\n  \
         publisher = {TeX Users Group}\n}\n\n"
    );
}

#[test]
fn test_type_mapping() {
    let (_, out) = export_library();
    assert!(entry(&out, "@phdthesis{turing1938,").contains("school = {Princeton University}"));

    let report = entry(&out, "@techreport{knuth1984,");
    assert!(report.contains("institution = {Stanford University}"));
    assert!(report.contains("number = {STAN-CS-90-1}"));
    // The pinning directive is not exported as a note
    assert!(!report.contains("note"));
}

#[test]
fn test_fancy_url() {
    let (_, out) = export_library();
    let webpage = entry(&out, "@online{zotero-WEBPAGE1,");
    assert!(webpage.contains(
        "url = {\\href{https://ctan.org/pkg/hyperref?lang=en\\#top\\_section}{"
    ));
}

#[test]
fn test_duplicate_pinned_keys_reported() {
    let records = vec![
        Record::new("1", "AAAA0001", "book")
            .with_title("One")
            .with_extra("bibtex: same2000"),
        Record::new("2", "AAAA0002", "book")
            .with_title("Two")
            .with_extra("bibtex: same2000"),
    ];
    let mut exporter = BibTeXExporter::new(ExportConfig::default());
    let mut out = String::new();
    let report = exporter.export(records, &mut out).unwrap();

    assert_eq!(report.entries, 2);
    assert_eq!(out.matches("@book{same2000,").count(), 2);
    assert!(report
        .warnings
        .iter()
        .any(|w| matches!(w, ExportWarning::Registry(_))));
}

#[test]
fn test_duplicate_field_reported() {
    let record = Record::new("1", "K", "journalArticle")
        .with_title("Title")
        .with_extra("biblatexdata[title=Other]");
    let mut exporter = BibTeXExporter::new(ExportConfig::default());
    let mut out = String::new();
    let report = exporter.export(vec![record], &mut out).unwrap();

    assert_eq!(
        report.warnings,
        vec![ExportWarning::DuplicateField {
            key: "zotero-K".to_string(),
            field: "title".to_string(),
        }]
    );
    assert!(out.contains("title = {Title}"));
    assert!(out.contains("title = {Other}"));
}

#[test]
fn test_export_records_json() {
    let out = export_records_json(&load_fixture("export_library.json"), fixture_config()).unwrap();
    assert!(out.starts_with("@article{knuth1984a,"));

    assert!(matches!(
        export_records_json("{not json", ExportConfig::default()),
        Err(ExportError::Records(_))
    ));
}

// === Property-Based Tests ===

/// Brace depth never goes negative and ends at zero; escaped braces don't count
fn braces_balanced(text: &str) -> bool {
    let mut depth = 0i64;
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

proptest! {
    #[test]
    fn test_entries_are_brace_balanced(
        titles in prop::collection::vec("[a-zA-Z0-9 &%$#_{}~^\\\\]{0,24}", 1..8),
        brace_all in any::<bool>(),
    ) {
        let records: Vec<Record> = titles
            .iter()
            .enumerate()
            .map(|(i, title)| {
                Record::new(i.to_string(), format!("KEY{}", i), "book")
                    .with_title(title.clone())
                    .with_creator(Creator::new("Author", CreatorRole::Author))
                    .with_extra(title.clone())
            })
            .collect();
        let config = ExportConfig { brace_all, ..Default::default() };

        let mut exporter = BibTeXExporter::new(config);
        let mut out = String::new();
        let report = exporter.export(records, &mut out).unwrap();

        prop_assert_eq!(report.entries, titles.len());
        prop_assert_eq!(out.matches("\n}\n\n").count(), titles.len());
        prop_assert!(braces_balanced(&out));
    }

    #[test]
    fn test_plain_text_escapes_to_itself(text in "[a-zA-Z0-9 .,:;!?()'-]{1,40}") {
        let escaped = latex_escape(
            &FieldValue::Text(text.clone()),
            &EscapeOptions::braced(),
            &ExportConfig::default(),
        );
        prop_assert_eq!(escaped, Some(text));
    }
}
