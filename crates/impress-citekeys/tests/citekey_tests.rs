//! Cite key registry integration tests

mod common;

use common::fixtures::load_records;
use impress_citekeys::{CiteKeyRegistry, KeyFormatter, Pattern, DEFAULT_PATTERN};
use impress_records::{Creator, CreatorRole, Record, TypeMap};
use proptest::prelude::*;
use std::collections::HashSet;

fn registry(pattern: &str) -> CiteKeyRegistry {
    CiteKeyRegistry::new(KeyFormatter::new(pattern, TypeMap::bibtex()))
}

// === Library batch ===

#[test]
fn test_library_batch() {
    let mut registry = registry(DEFAULT_PATTERN);
    let records = registry.initialize(load_records("library.json"));

    assert_eq!(registry.key_for("102"), Some("einstein1935"));
    assert_eq!(registry.key_for("106"), Some("kubrick:2001"));
    assert_eq!(registry.key_for("101"), Some("einstein1935a"));
    assert_eq!(registry.key_for("103"), Some("1962"));
    assert_eq!(registry.key_for("104"), None);
    assert_eq!(registry.key_for("105"), Some("abramowitz1964"));

    assert_eq!(
        records[1].extra,
        "Translated title: On the electrodynamics of moving bodies"
    );
    assert_eq!(records[5].extra, "");

    let generated = registry.state("101").cloned().unwrap_or_default();
    assert_eq!(generated.default.as_deref(), Some("einstein1935"));
    assert_eq!(generated.duplicates, Some(vec!["102".to_string()]));
    assert!(registry.state("102").is_some_and(|s| s.pinned && s.default.is_none()));
}

#[test]
fn test_primary_creator_for_film() {
    let film = load_records("library.json")
        .into_iter()
        .find(|record| record.item_id == "106");
    let Some(film) = film else {
        panic!("film fixture missing");
    };

    // Directors are the film's authors; the scriptwriter is a collaborator
    let formatter = KeyFormatter::new("[auth:lower]-[authors]", TypeMap::bibtex());
    assert_eq!(formatter.format(&film), "kubrick-Kubrick");
}

#[test]
fn test_pinned_stability() {
    let generated = Record::new("1", "AAAA1111", "journalArticle")
        .with_date("2020")
        .with_creator(Creator::new("Mykey", CreatorRole::Author));
    let pinned = Record::new("2", "BBBB2222", "journalArticle")
        .with_date("2020")
        .with_creator(Creator::new("Mykey", CreatorRole::Author))
        .with_extra("bibtex: mykey2020");

    // Order in the batch does not matter
    for batch in [
        vec![generated.clone(), pinned.clone()],
        vec![pinned.clone(), generated.clone()],
    ] {
        let mut registry = registry(DEFAULT_PATTERN);
        registry.initialize(batch);
        assert_eq!(registry.key_for("2"), Some("mykey2020"));
        assert_eq!(registry.key_for("1"), Some("mykey2020a"));
    }
}

#[test]
fn test_pattern_alternation() {
    let record = Record::new("1", "DEEPSEA1", "book").with_title("The Deep Sea");
    let mut registry = registry("[auth][year]|[title]");
    registry.initialize(vec![record]);
    assert_eq!(registry.key_for("1"), Some("TheDeepSea"));
}

// === Property-Based Tests ===

const NAMES: &[&str] = &["Smith", "Jones", "Müller", "O'Brien", ""];

fn batch() -> impl Strategy<Value = Vec<(usize, i32, Option<String>)>> {
    prop::collection::vec(
        (
            0..NAMES.len(),
            2018..2021i32,
            prop::option::weighted(0.2, "(smith2019|jones2020|muller2018|custom)"),
        ),
        0..30,
    )
}

fn build_records(items: &[(usize, i32, Option<String>)]) -> Vec<Record> {
    let mut pinned_keys = HashSet::new();
    items.iter()
        .enumerate()
        .map(|(i, (name, year, pin))| {
            let mut record = Record::new(i.to_string(), format!("KEY{}", i), "journalArticle")
                .with_date(year.to_string())
                .with_creator(Creator::new(NAMES[*name], CreatorRole::Author));
            // Two records pinning the same key are deliberately ambiguous
            if let Some(pin) = pin {
                if pinned_keys.insert(pin.clone()) {
                    record.extra = format!("bibtex: {}", pin);
                }
            }
            record
        })
        .collect()
}

proptest! {
    #[test]
    fn test_keys_are_unique(items in batch()) {
        let mut registry = registry(DEFAULT_PATTERN);
        registry.initialize(build_records(&items));

        let keys = registry.item_keys();
        prop_assert_eq!(keys.len(), items.len());
        let distinct: HashSet<&String> = keys.values().collect();
        prop_assert_eq!(distinct.len(), keys.len());
    }

    #[test]
    fn test_pinned_keys_are_honoured(items in batch()) {
        let records = build_records(&items);
        let expected: Vec<(String, String)> = records
            .iter()
            .filter_map(|record| {
                record
                    .extra
                    .strip_prefix("bibtex: ")
                    .map(|key| (record.item_id.clone(), key.to_string()))
            })
            .collect();

        let mut registry = registry(DEFAULT_PATTERN);
        registry.initialize(records);
        for (item_id, key) in expected {
            prop_assert_eq!(registry.key_for(&item_id), Some(key.as_str()));
            prop_assert!(registry.state(&item_id).is_some_and(|s| s.pinned));
        }
    }

    #[test]
    fn test_assignment_is_deterministic(items in batch()) {
        let mut first = registry(DEFAULT_PATTERN);
        first.initialize(build_records(&items));
        let mut second = registry(DEFAULT_PATTERN);
        second.initialize(build_records(&items));
        prop_assert_eq!(first.item_keys(), second.item_keys());
    }

    #[test]
    fn test_pattern_parse_total(pattern in "[a-z\\[\\]|:()0-9_]{0,40}") {
        let parsed = Pattern::parse(&pattern);
        prop_assert_eq!(parsed.alternatives.len(), pattern.matches('|').count() + 1);
    }
}
