//! Cite key registry: deduplication and pinned keys
//!
//! A registry lives for one export batch. Records carrying a pinned key in
//! their `extra` field (`bibtex: key` or `biblatexcitekey[key]`) claim that
//! key first; every other record gets a formatted, cleaned key, suffixed with
//! `a`, `b`, ... `z`, `aa`, `ab`, ... when it is already taken.

use crate::clean::clean_key;
use crate::formatter::{KeyFormatter, FALLBACK_PREFIX};
use impress_records::Record;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;

lazy_static! {
    static ref EMBEDDED_KEY: Regex = Regex::new(r"bibtex:\s*([^\s\r\n]+)").unwrap();
    static ref BIBLATEX_CITEKEY: Regex = Regex::new(r"biblatexcitekey\[([^\]]+)\]").unwrap();
}

/// A record that asked for a key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Duplicate {
    pub item_id: String,
    pub pinned: bool,
}

/// Registry entry for an assigned key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CiteKeyEntry {
    /// The candidate before suffixing
    pub original: String,
    /// Every record that asked for this key, in registration order
    pub duplicates: Vec<Duplicate>,
}

/// Key assignment for one record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemKeyState {
    pub key: String,
    /// The key came from the record's `extra` field
    pub pinned: bool,
    /// The unsuffixed candidate, when the record had to be suffixed
    pub default: Option<String>,
    /// Other records that asked for the same key
    pub duplicates: Option<Vec<String>>,
}

impl ItemKeyState {
    fn new(key: String) -> Self {
        Self {
            key,
            ..Default::default()
        }
    }
}

/// Anomaly found while building the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryWarning {
    /// Two records pin the same key; both keep it
    DuplicatePinnedKey { key: String, record_id: String },
}

impl std::fmt::Display for RegistryWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicatePinnedKey { key, record_id } => {
                write!(f, "duplicate pinned key {} on item {}", key, record_id)
            }
        }
    }
}

/// Pinned key embedded in an `extra` field, if any
///
/// `bibtex:` takes precedence over `biblatexcitekey[]`.
pub fn embedded_key(extra: &str) -> Option<&str> {
    EMBEDDED_KEY
        .captures(extra)
        .or_else(|| BIBLATEX_CITEKEY.captures(extra))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Per-batch key registry
#[derive(Debug, Clone)]
pub struct CiteKeyRegistry {
    formatter: KeyFormatter,
    keys: BTreeMap<String, CiteKeyEntry>,
    /// Assigned keys in registration order
    order: Vec<String>,
    items: BTreeMap<String, ItemKeyState>,
    warnings: Vec<RegistryWarning>,
    initialized: bool,
}

impl Default for CiteKeyRegistry {
    fn default() -> Self {
        Self::new(KeyFormatter::default())
    }
}

impl CiteKeyRegistry {
    pub fn new(formatter: KeyFormatter) -> Self {
        Self {
            formatter,
            keys: BTreeMap::new(),
            order: Vec::new(),
            items: BTreeMap::new(),
            warnings: Vec::new(),
            initialized: false,
        }
    }

    pub fn formatter(&self) -> &KeyFormatter {
        &self.formatter
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Forget every assignment, ready for a new batch
    pub fn reset(&mut self) {
        self.keys.clear();
        self.order.clear();
        self.items.clear();
        self.warnings.clear();
        self.initialized = false;
    }

    /// Assign keys to a batch of records
    ///
    /// Returns the records in their original order, with pinned-key
    /// directives stripped from `extra`. Notes and attachments get no key.
    /// Calling this again without [`reset`](Self::reset) returns the records
    /// untouched.
    pub fn initialize(&mut self, mut records: Vec<Record>) -> Vec<Record> {
        if self.initialized {
            return records;
        }
        self.initialized = true;

        let (pinned, generated): (Vec<usize>, Vec<usize>) = records
            .iter()
            .enumerate()
            .filter(|(_, record)| record.is_exportable())
            .map(|(i, _)| i)
            .partition(|i| embedded_key(&records[*i].extra).is_some());

        for i in pinned.into_iter().chain(generated) {
            let record = &mut records[i];
            let key = self.build(record);
            tracing::debug!("Assigned cite key {} to item {}", key, record.item_id);
            self.items
                .insert(record.item_id.clone(), ItemKeyState::new(key));
        }

        self.link_duplicates();
        records
    }

    /// Final key of a record
    pub fn key_for(&self, item_id: &str) -> Option<&str> {
        self.items.get(item_id).map(|state| state.key.as_str())
    }

    pub fn state(&self, item_id: &str) -> Option<&ItemKeyState> {
        self.items.get(item_id)
    }

    pub fn entry(&self, key: &str) -> Option<&CiteKeyEntry> {
        self.keys.get(key)
    }

    /// Item id -> final key for every keyed record
    pub fn item_keys(&self) -> BTreeMap<String, String> {
        self.items
            .iter()
            .map(|(id, state)| (id.clone(), state.key.clone()))
            .collect()
    }

    pub fn warnings(&self) -> &[RegistryWarning] {
        &self.warnings
    }

    fn build(&mut self, record: &mut Record) -> String {
        if let Some(key) = self.extract(record) {
            return self.register(&record.item_id, key, true);
        }

        let mut key = clean_key(&self.formatter.format(record));
        if key.is_empty() {
            key = clean_key(&format!("{}{}", FALLBACK_PREFIX, record.key));
        }
        self.register(&record.item_id, key, false)
    }

    /// Take the pinned key out of `extra`
    fn extract(&mut self, record: &mut Record) -> Option<String> {
        let (range, key) = {
            let caps = EMBEDDED_KEY
                .captures(&record.extra)
                .or_else(|| BIBLATEX_CITEKEY.captures(&record.extra))?;
            (caps.get(0)?.range(), caps.get(1)?.as_str().to_string())
        };

        record.extra.replace_range(range, "");
        record.extra = record.extra.trim().to_string();

        if self.keys.contains_key(&key) {
            let warning = RegistryWarning::DuplicatePinnedKey {
                key: key.clone(),
                record_id: record.item_id.clone(),
            };
            tracing::warn!("{}", warning);
            self.warnings.push(warning);
        }

        Some(key)
    }

    fn register(&mut self, item_id: &str, key: String, pinned: bool) -> String {
        let requester = Duplicate {
            item_id: item_id.to_string(),
            pinned,
        };

        let mut assigned = key.clone();
        if let Some(entry) = self.keys.get_mut(&key) {
            entry.duplicates.push(requester.clone());
            // Pinned keys are kept even when ambiguous
            if pinned {
                return key;
            }
            assigned = (0..)
                .map(|n| format!("{}{}", key, suffix(n)))
                .find(|candidate| !self.keys.contains_key(candidate))
                .unwrap_or_default();
        }

        self.order.push(assigned.clone());
        self.keys.insert(
            assigned.clone(),
            CiteKeyEntry {
                original: key,
                duplicates: vec![requester],
            },
        );
        assigned
    }

    fn link_duplicates(&mut self) {
        for key in &self.order {
            let Some(entry) = self.keys.get(key) else {
                continue;
            };
            for source in &entry.duplicates {
                let Some(state) = self.items.get_mut(&source.item_id) else {
                    continue;
                };

                if source.pinned {
                    state.pinned = true;
                } else if state.key != entry.original {
                    state.default = Some(entry.original.clone());
                }

                for target in &entry.duplicates {
                    if target.item_id != source.item_id {
                        state
                            .duplicates
                            .get_or_insert_with(Vec::new)
                            .push(target.item_id.clone());
                    }
                }
            }
        }
    }
}

/// Suffix number `n`: a..z, aa, ab, ...
fn suffix(mut n: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(char::from(b'a' + (n % 26) as u8));
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    letters.iter().rev().collect()
}
