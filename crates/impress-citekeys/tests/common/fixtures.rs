//! Test fixture loading utilities

use impress_records::{records_from_json, Record};
use std::path::PathBuf;

/// Get the path to a fixture file
#[allow(dead_code)]
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_fixtures")
        .join(name)
}

/// Load a fixture file as a string
#[allow(dead_code)]
pub fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name))
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", name))
}

/// Load a JSON record batch
pub fn load_records(name: &str) -> Vec<Record> {
    records_from_json(&load_fixture(name))
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", name, e))
}
