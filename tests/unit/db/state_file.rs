//! Unit tests for the JSON state file store

use marketpulse::db::{JsonFileStateStore, StateStore};
use marketpulse::error::StoreError;
use marketpulse::models::state::{MarketState, StateRecord};
use tempfile::tempdir;
use tokio_test::{assert_err, assert_ok};

fn sample() -> StateRecord {
    [
        ("GC=F".to_string(), MarketState::Overbought),
        ("^MERV".to_string(), MarketState::Neutral),
        ("USDARS=X".to_string(), MarketState::Oversold),
    ]
    .into_iter()
    .collect()
}

#[test]
fn test_missing_file_loads_empty_record() {
    let dir = tempdir().unwrap();
    let store = JsonFileStateStore::new(dir.path().join("state.json"));
    let record = assert_ok!(store.load());
    assert!(record.is_empty());
}

#[test]
fn test_save_then_load_returns_same_record() {
    let dir = tempdir().unwrap();
    let store = JsonFileStateStore::new(dir.path().join("state.json"));
    assert_ok!(store.save(&sample()));
    assert_eq!(assert_ok!(store.load()), sample());
}

#[test]
fn test_saved_file_is_plain_symbol_to_label_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    let store = JsonFileStateStore::new(&path);
    assert_ok!(store.save(&sample()));

    let raw = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["GC=F"], "Overbought");
    assert_eq!(value["USDARS=X"], "Oversold");
    assert_eq!(value["^MERV"], "Neutral");
    assert!(raw.ends_with('\n'));
}

#[test]
fn test_reads_externally_written_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, r#"{"RIO": "Oversold", "YPFD.BA": "Neutral"}"#).unwrap();

    let record = assert_ok!(JsonFileStateStore::new(&path).load());
    assert_eq!(record.get("RIO"), Some(MarketState::Oversold));
    assert_eq!(record.get("YPFD.BA"), Some(MarketState::Neutral));
    assert_eq!(record.get("GC=F"), None);
}

#[test]
fn test_save_replaces_previous_contents() {
    let dir = tempdir().unwrap();
    let store = JsonFileStateStore::new(dir.path().join("state.json"));
    assert_ok!(store.save(&sample()));

    let mut smaller = StateRecord::new();
    smaller.set("RIO", MarketState::Neutral);
    assert_ok!(store.save(&smaller));
    assert_eq!(assert_ok!(store.load()), smaller);

    let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(leftovers.len(), 1, "temporary files must not be left behind");
}

#[test]
fn test_corrupt_file_is_an_error_but_degrades_to_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "{not json").unwrap();
    let store = JsonFileStateStore::new(&path);

    assert!(matches!(assert_err!(store.load()), StoreError::Json(_)));
    assert!(store.load_or_default().is_empty());
}

#[test]
fn test_unknown_label_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, r#"{"RIO": "Sideways"}"#).unwrap();
    assert_err!(JsonFileStateStore::new(&path).load());
}

#[test]
fn test_save_into_missing_directory_fails() {
    let dir = tempdir().unwrap();
    let store = JsonFileStateStore::new(dir.path().join("missing").join("state.json"));
    assert!(matches!(assert_err!(store.save(&sample())), StoreError::Io(_)));
}
