//! Integration tests for paperlens-store
//!
//! These tests verify enumeration, record persistence, and malformed-record
//! handling against a real directory tree.

use paperlens_domain::{
    AnalysisRecord, Category, FailureKind, PaperAnalysis, RecordStore, RelevanceScore,
    StoredRecord, UnitKey,
};
use paperlens_store::{CollectionStore, StoreConfig};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn make_unit(root: &Path, key: &str, files: &[&str]) {
    let dir = root.join(key);
    fs::create_dir_all(&dir).unwrap();
    for name in files {
        fs::write(dir.join(name), b"%PDF-1.4 stub").unwrap();
    }
}

fn collection() -> (TempDir, CollectionStore) {
    let dir = tempfile::tempdir().unwrap();
    make_unit(dir.path(), "B2", &["paper.pdf"]);
    make_unit(dir.path(), "A1", &["z.PDF", "a.pdf", "notes.txt"]);
    make_unit(dir.path(), "C3", &["notes.txt"]);
    make_unit(dir.path(), ".hidden", &["x.pdf"]);
    fs::write(dir.path().join("stray.pdf"), b"x").unwrap();
    let store = CollectionStore::open(dir.path(), StoreConfig::default()).unwrap();
    (dir, store)
}

fn success(title: &str) -> AnalysisRecord {
    AnalysisRecord::Success(Box::new(PaperAnalysis::new(
        title,
        Category::C,
        RelevanceScore::new(3).unwrap(),
    )))
}

#[test]
fn test_units_are_sorted_and_filtered() {
    let (_dir, store) = collection();
    let units = store.units().unwrap();

    let keys: Vec<_> = units.iter().map(|u| u.key.as_str().to_string()).collect();
    assert_eq!(keys, vec!["A1", "B2", "C3"]);
}

#[test]
fn test_first_sorted_document_wins() {
    let (_dir, store) = collection();
    let units = store.units().unwrap();

    assert_eq!(units[0].document_name(), Some("a.pdf"));
    assert_eq!(units[1].document_name(), Some("paper.pdf"));
    assert_eq!(units[2].document, None);
    assert!(!units[2].is_pending());
}

#[test]
fn test_write_then_load_record() {
    let (_dir, store) = collection();
    let unit = store.unit(&UnitKey::new("B2")).unwrap().unwrap();
    assert!(!store.has_record(&unit));
    assert_eq!(store.load_record(&unit).unwrap(), None);

    let record = success("Lattice models");
    store.write_record(&unit, &record).unwrap();

    assert!(store.has_record(&unit));
    assert_eq!(store.load_record(&unit).unwrap(), Some(StoredRecord::Parsed(record)));

    let refreshed = store.unit(&UnitKey::new("B2")).unwrap().unwrap();
    assert!(refreshed.has_record);
    assert!(!refreshed.is_pending());
}

#[test]
fn test_record_is_pretty_json_with_verbatim_unicode() {
    let (_dir, store) = collection();
    let unit = store.unit(&UnitKey::new("A1")).unwrap().unwrap();
    store.write_record(&unit, &success("稀疏数据的迁移学习")).unwrap();

    let text = fs::read_to_string(&unit.record_path).unwrap();
    assert!(text.contains("稀疏数据的迁移学习"));
    assert!(text.contains("\n  \"title\""));
}

#[test]
fn test_malformed_record_is_reported_not_fatal() {
    let (_dir, store) = collection();
    let unit = store.unit(&UnitKey::new("A1")).unwrap().unwrap();
    fs::write(&unit.record_path, "{ truncated").unwrap();

    match store.load_record(&unit).unwrap() {
        Some(StoredRecord::Malformed { reason }) => assert!(!reason.is_empty()),
        other => panic!("Expected malformed record, got {:?}", other),
    }
}

#[test]
fn test_raw_response_removed_after_success() {
    let (_dir, store) = collection();
    let unit = store.unit(&UnitKey::new("A1")).unwrap().unwrap();
    let raw_path = CollectionStore::raw_response_path(&unit);

    store
        .write_record(&unit, &AnalysisRecord::failure(FailureKind::ParseError, "no title"))
        .unwrap();
    store.write_raw_response(&unit, "not json at all").unwrap();
    assert_eq!(fs::read_to_string(&raw_path).unwrap(), "not json at all");

    store.write_record(&unit, &success("Second try")).unwrap();
    assert!(!raw_path.exists());
}

#[test]
fn test_success_record_kept_when_raw_response_cannot_be_removed() {
    let (_dir, store) = collection();
    let unit = store.unit(&UnitKey::new("A1")).unwrap().unwrap();
    let raw_path = CollectionStore::raw_response_path(&unit);

    // A directory in the sidecar's place makes removal fail
    fs::create_dir_all(raw_path.join("nested")).unwrap();

    store.write_record(&unit, &success("Persisted")).unwrap();

    match store.load_record(&unit).unwrap() {
        Some(StoredRecord::Parsed(record)) => assert!(record.is_success()),
        other => panic!("expected a parsed record, got {:?}", other),
    }
    assert!(raw_path.is_dir());
}

#[test]
fn test_custom_record_file_name() {
    let dir = tempfile::tempdir().unwrap();
    make_unit(dir.path(), "K", &["doc.pdf"]);
    let config = StoreConfig {
        record_file_name: "meta.json".to_string(),
        ..StoreConfig::default()
    };
    let store = CollectionStore::open(dir.path(), config).unwrap();

    let unit = store.unit(&UnitKey::new("K")).unwrap().unwrap();
    store.write_record(&unit, &success("T")).unwrap();
    assert!(dir.path().join("K").join("meta.json").is_file());
}
