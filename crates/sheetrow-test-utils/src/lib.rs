//! Testing utilities for the sheetrow workspace
//!
//! Shared payload builders, fixtures, and the row types the code generator
//! emits for `fixtures/balance.json`.

#![allow(missing_docs)]

use serde_json::json;
use sheetrow_ingest::{normalize_range, Ingestor, NamedRange};
use sheetrow_model::{Document, Table, DEFAULT_GROUP};
use sheetrow_runtime::{MaterializationCache, RowTypeRegistry};

/// Row types generated at build time from the balance fixture
#[allow(clippy::all, clippy::pedantic, unreachable_pub)]
pub mod balance {
    include!(concat!(env!("OUT_DIR"), "/balance.rs"));
}

/// The balance fixture payload
pub const BALANCE_PAYLOAD: &str = include_str!("../fixtures/balance.json");

/// Batch payload with one range per `(name, grid)` pair
pub fn batch_payload(ranges: &[(&str, Vec<Vec<&str>>)]) -> String {
    let ranges: Vec<_> = ranges
        .iter()
        .map(|(name, grid)| json!({ "range": format!("'{name}'!A1:Z100"), "values": grid }))
        .collect();
    json!({ "valueRanges": ranges }).to_string()
}

/// Single-grid payload
pub fn grid_payload(grid: Vec<Vec<&str>>) -> String {
    json!({ "values": grid }).to_string()
}

/// Normalize a grid into a table in the default group
pub fn table(name: &str, grid: Vec<Vec<&str>>) -> Table {
    normalize_range(&NamedRange::new(name, grid), DEFAULT_GROUP).unwrap()
}

/// Document holding the given tables in order
pub fn document(tables: Vec<Table>) -> Document {
    let mut document = Document::new();
    for table in tables {
        document.push_table(table);
    }
    document
}

/// The balance fixture, ingested
pub fn balance_document() -> Document {
    Ingestor::default().ingest(BALANCE_PAYLOAD).unwrap()
}

/// A document holding only an `Enemies` table
pub fn enemies_document() -> Document {
    document(vec![table(
        "Enemies",
        vec![
            vec!["id", "name", "hp"],
            vec!["string", "string", "int"],
            vec!["E9", "Slime", "5"],
        ],
    )])
}

/// Registry of every generated balance row type
pub fn balance_registry() -> RowTypeRegistry {
    balance::registry()
}

/// Cache over `documents` bound to the generated balance types
pub fn balance_cache(documents: Vec<Document>) -> MaterializationCache {
    let (cache, report) = balance::init(documents);
    assert!(report.is_clean(), "fixture rows failed to materialize: {:?}", report.failures);
    cache
}
