//! Serialization tests for output records
//!
//! These tests pin the on-disk shape of success and failure records.

use paperlens_domain::{
    AnalysisRecord, Category, FailureKind, Field, Language, PaperAnalysis, RelevanceScore,
};
use proptest::prelude::*;
use serde_json::{json, Value};

fn sample_analysis() -> PaperAnalysis {
    let mut analysis = PaperAnalysis::new("Transfer learning for sparse data", Category::E, RelevanceScore::new(5).unwrap());
    analysis.authors = Field::Known(vec!["Li".to_string(), "Smith".to_string()]);
    analysis.year = Field::Known(2022);
    analysis.language = Field::Known(Language::English);
    analysis.secondary_categories = Field::Known(vec![Category::D]);
    analysis.methods = Field::Known(vec![]);
    analysis.meta.model = "test-model".to_string();
    analysis
}

#[test]
fn test_failure_record_is_single_field_object() {
    let record = AnalysisRecord::failure(FailureKind::TextTooShort, "12 chars");
    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value, json!({ "error": "text_too_short: 12 chars" }));
}

#[test]
fn test_unknown_fields_are_written_as_null() {
    let record = AnalysisRecord::Success(Box::new(sample_analysis()));
    let value = serde_json::to_value(&record).unwrap();
    let obj = value.as_object().unwrap();

    assert_eq!(obj["venue"], Value::Null);
    assert_eq!(obj["dataset"], Value::Null);
    assert_eq!(obj["methods"], json!([]));
    assert_eq!(obj["primary_category"], json!("E"));
    assert_eq!(obj["relevance_score"], json!(5));
    assert_eq!(obj["_meta"]["model"], json!("test-model"));
}

#[test]
fn test_success_record_reads_back() {
    let record = AnalysisRecord::Success(Box::new(sample_analysis()));
    let text = serde_json::to_string_pretty(&record).unwrap();
    let parsed: AnalysisRecord = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, record);

    match parsed {
        AnalysisRecord::Success(analysis) => {
            assert!(analysis.venue.is_unknown());
            assert_eq!(analysis.methods, Field::Known(vec![]));
        }
        AnalysisRecord::Failure(_) => panic!("Expected success record"),
    }
}

#[test]
fn test_failure_with_extra_keys_still_reads_as_failure() {
    let text = r#"{"error": "Failed after 3 attempts", "filename": "x.pdf"}"#;
    let parsed: AnalysisRecord = serde_json::from_str(text).unwrap();
    assert!(!parsed.is_success());
    assert_eq!(parsed.failure_kind(), None);
}

#[test]
fn test_out_of_range_score_is_not_a_record() {
    let text = r#"{"title": "T", "primary_category": "A", "relevance_score": 9}"#;
    assert!(serde_json::from_str::<AnalysisRecord>(text).is_err());
}

#[test]
fn test_unknown_category_is_not_a_record() {
    let text = r#"{"title": "T", "primary_category": "Unknown", "relevance_score": 3}"#;
    assert!(serde_json::from_str::<AnalysisRecord>(text).is_err());
}

proptest! {
    #[test]
    fn prop_category_parse_never_maps_other_letters(c in "[G-Zg-z]") {
        prop_assert_eq!(Category::parse(&c), None);
    }

    #[test]
    fn prop_decorated_label_keeps_letter(idx in 0usize..6, suffix in "[ .):][a-zA-Z ]{0,20}") {
        let category = Category::ALL[idx];
        let label = format!("{}{}", category.as_str(), suffix);
        prop_assert_eq!(Category::parse(&label), Some(category));
    }

    #[test]
    fn prop_score_accepts_exactly_one_to_five(value in -100i64..100) {
        let accepted = RelevanceScore::new(value).is_ok();
        prop_assert_eq!(accepted, (1..=5).contains(&value));
    }
}
