//! Integration tests for paperlens-aggregator
//!
//! Records are written through the real store into a temporary collection,
//! then read back the way the `summarize` and `export` commands do.

use paperlens_aggregator::{
    render_report, write_summary, AggregateConfig, AggregateSummary, Aggregator, BackgroundQuota,
    Normalizer, StagingExport, BACKGROUND_PAPERS_FILE, CORE_PAPERS_FILE,
};
use paperlens_domain::{
    AnalysisRecord, Category, FailureKind, Field, Language, PaperAnalysis, RecordStore,
    RelevanceScore, UnitKey,
};
use paperlens_store::{CollectionStore, StoreConfig};
use std::fs;
use tempfile::TempDir;

struct Paper {
    key: &'static str,
    category: Category,
    score: i64,
    year: Option<i64>,
    methods: &'static [&'static str],
    techniques: &'static [&'static str],
}

fn analysis(paper: &Paper) -> PaperAnalysis {
    let mut analysis = PaperAnalysis::new(
        format!("Title of {}", paper.key),
        paper.category,
        RelevanceScore::new(paper.score).unwrap(),
    );
    analysis.year = paper.year.into();
    analysis.language = Field::Known(Language::English);
    analysis.methods = Field::Known(paper.methods.iter().map(|s| s.to_string()).collect());
    analysis.techniques = Field::Known(paper.techniques.iter().map(|s| s.to_string()).collect());
    analysis.contribution = Field::Known(format!("Contribution of {}", paper.key));
    analysis.meta.input_tokens = 100;
    analysis.meta.output_tokens = 10;
    analysis
}

fn new_collection() -> (TempDir, CollectionStore) {
    let dir = TempDir::new().unwrap();
    let store = CollectionStore::open(dir.path(), StoreConfig::default()).unwrap();
    (dir, store)
}

fn add_unit(dir: &TempDir, store: &CollectionStore, key: &str, record: Option<AnalysisRecord>) {
    let unit_dir = dir.path().join(key);
    fs::create_dir_all(&unit_dir).unwrap();
    fs::write(unit_dir.join("paper.pdf"), "%PDF").unwrap();
    if let Some(record) = record {
        let unit = store.unit(&UnitKey::from(key)).unwrap().unwrap();
        store.write_record(&unit, &record).unwrap();
    }
}

fn success(paper: &Paper) -> Option<AnalysisRecord> {
    Some(AnalysisRecord::Success(Box::new(analysis(paper))))
}

/// Two A papers, one B, three E, one failure, one unit not yet analyzed
fn sample_collection() -> (TempDir, CollectionStore) {
    let (dir, store) = new_collection();
    let papers = [
        Paper {
            key: "a1",
            category: Category::A,
            score: 2,
            year: Some(2019),
            methods: &["ANN", "SVM"],
            techniques: &["Finite element surrogate"],
        },
        Paper {
            key: "a2",
            category: Category::A,
            score: 3,
            year: Some(2021),
            methods: &["Artificial Neural Network"],
            techniques: &[],
        },
        Paper {
            key: "b1",
            category: Category::B,
            score: 3,
            year: None,
            methods: &["XGBoost"],
            techniques: &[""],
        },
        Paper {
            key: "e1",
            category: Category::E,
            score: 5,
            year: Some(2023),
            methods: &["ANN", "ann", "CNN"],
            techniques: &["Transfer learning", "fine-tuning"],
        },
        Paper {
            key: "e2",
            category: Category::E,
            score: 4,
            year: Some(2023),
            methods: &["Gaussian Process"],
            techniques: &["Multi-fidelity fusion"],
        },
        Paper {
            key: "e3",
            category: Category::E,
            score: 2,
            year: Some(0),
            methods: &[],
            techniques: &["Bayesian calibration"],
        },
    ];
    for paper in &papers {
        add_unit(&dir, &store, paper.key, success(paper));
    }
    add_unit(
        &dir,
        &store,
        "f1",
        Some(AnalysisRecord::failure(FailureKind::RateLimited, "HTTP 429")),
    );
    add_unit(&dir, &store, "pending", None);
    (dir, store)
}

fn aggregator() -> Aggregator {
    Aggregator::new(AggregateConfig::default(), Normalizer::default()).unwrap()
}

#[test]
fn test_counts_follow_record_policy() {
    let (_dir, store) = sample_collection();
    let summary = aggregator().aggregate(&store).unwrap();

    assert_eq!(summary.total, 7);
    assert_eq!(summary.analyzed, 6);
    assert_eq!(summary.parse_errors, 1);
    assert_eq!(summary.error_kinds.get("rate_limited"), Some(&1));
    assert_eq!(summary.errors.len(), 1);
    assert_eq!(summary.errors[0].unit, "f1");

    assert_eq!(summary.primary_category[&Category::A], 2);
    assert_eq!(summary.primary_category[&Category::B], 1);
    assert_eq!(summary.primary_category[&Category::C], 0);
    assert_eq!(summary.primary_category[&Category::E], 3);
    assert_eq!(summary.primary_category.values().sum::<usize>(), summary.analyzed);

    assert_eq!(summary.relevance_score[&3], 2);
    assert_eq!(summary.relevance_score[&1], 0);
    let e_row = &summary.category_score[&Category::E];
    assert_eq!((e_row[&5], e_row[&4], e_row[&3], e_row[&2]), (1, 1, 0, 1));
}

#[test]
fn test_frequency_tables_are_normalized() {
    let (_dir, store) = sample_collection();
    let summary = aggregator().aggregate(&store).unwrap();

    // "ANN" and "ann" in one paper count once
    assert_eq!(summary.top_methods[0].label, "Neural Network / ANN");
    assert_eq!(summary.top_methods[0].count, 3);
    assert!(summary
        .top_methods
        .iter()
        .any(|row| row.label == "XGBoost" && row.count == 1));

    let techniques: Vec<(&str, usize)> = summary
        .top_techniques
        .iter()
        .map(|row| (row.label.as_str(), row.count))
        .collect();
    assert!(techniques.contains(&("Transfer Learning", 1)));
    assert!(techniques.contains(&("Surrogate Modeling", 1)));
    assert!(techniques.contains(&("Multi-Fidelity Data Fusion", 1)));
    assert!(techniques.contains(&("Uncertainty Quantification / Bayesian Methods", 1)));
    assert!(!techniques.iter().any(|(label, _)| label.is_empty()));
}

#[test]
fn test_years_and_core_papers() {
    let (_dir, store) = sample_collection();
    let summary = aggregator().aggregate(&store).unwrap();

    assert_eq!(summary.years.get(&2023), Some(&2));
    assert_eq!(summary.years.get(&0), None);
    assert_eq!(summary.invalid_years.count, 2);
    assert_eq!(summary.invalid_years.units, vec!["b1", "e3"]);
    assert_eq!(summary.languages.get("English"), Some(&6));

    assert_eq!(summary.core_papers, 2);
    let listed: Vec<&str> = summary
        .core_paper_list
        .iter()
        .map(|paper| paper.unit.as_str())
        .collect();
    assert_eq!(listed, vec!["e1", "e2"]);
    assert_eq!(summary.core_paper_list[0].methods.len(), 3);

    assert_eq!(summary.tokens.input_tokens, 600);
    assert_eq!(summary.tokens.output_tokens, 60);
}

#[test]
fn test_malformed_records_count_as_parse_errors() {
    let (dir, store) = sample_collection();
    add_unit(&dir, &store, "m1", None);
    fs::write(dir.path().join("m1").join("analysis.json"), "{ not json").unwrap();
    add_unit(&dir, &store, "m2", None);
    fs::write(
        dir.path().join("m2").join("analysis.json"),
        r#"{"title": "no category"}"#,
    )
    .unwrap();

    let summary = aggregator().aggregate(&store).unwrap();
    assert_eq!(summary.total, 9);
    assert_eq!(summary.analyzed, 6);
    assert_eq!(summary.parse_errors, 3);
    assert_eq!(summary.error_kinds.get("malformed"), Some(&2));
}

#[test]
fn test_empty_collection() {
    let (_dir, store) = new_collection();
    let summary = aggregator().aggregate(&store).unwrap();
    assert_eq!(summary.total, 0);
    assert_eq!(summary.category_share(Category::E), 0.0);
    assert!(render_report(&summary, "E, score >= 4").contains("Records: 0"));
}

#[test]
fn test_summary_file_is_replaced() {
    let (dir, store) = sample_collection();
    let summary = aggregator().aggregate(&store).unwrap();
    let path = dir.path().join("summary.json");
    fs::write(&path, "stale").unwrap();

    write_summary(&summary, &path).unwrap();
    let reloaded: AggregateSummary =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(reloaded, summary);
}

#[test]
fn test_summary_json_keys() {
    let (_dir, store) = sample_collection();
    let summary = aggregator().aggregate(&store).unwrap();
    let value = serde_json::to_value(&summary).unwrap();

    for key in [
        "total",
        "analyzed",
        "parse_errors",
        "error_kinds",
        "primary_category_counts",
        "secondary_category_counts",
        "relevance_score_counts",
        "category_score_crosstab",
        "top_methods",
        "top_techniques",
        "year_distribution",
        "invalid_year",
        "language_distribution",
        "core_papers",
    ] {
        assert!(value.get(key).is_some(), "missing key {}", key);
    }
    for key in ["primary_category", "years", "invalid_years", "languages"] {
        assert!(value.get(key).is_none(), "unexpected key {}", key);
    }

    assert_eq!(value["primary_category_counts"]["E"], 3);
    assert_eq!(value["relevance_score_counts"]["1"], 0);
    assert_eq!(value["category_score_crosstab"]["E"]["5"], 1);
    assert_eq!(value["year_distribution"]["2023"], 2);
    assert_eq!(value["invalid_year"]["count"], 2);
    assert_eq!(value["invalid_year"]["units"][0], "b1");
    assert_eq!(value["language_distribution"]["English"], 6);
    assert_eq!(value["core_papers"], 2);
}

#[test]
fn test_report_sections() {
    let (_dir, store) = sample_collection();
    let aggregator = aggregator();
    let summary = aggregator.aggregate(&store).unwrap();
    let report = render_report(&summary, &aggregator.config().core_label());

    assert!(report.contains("Records: 7 | Analyzed: 6 | Parse errors: 1"));
    assert!(report.contains("f1: rate_limited: HTTP 429"));
    assert!(report.contains("E (Solutions to core challenge in domain (core)):    3 ( 50.0%) "));
    assert!(report.contains("9. Core Papers (E, score >= 4): 2 papers"));
    assert!(report.contains("[5] Title of e1 (2023)"));
    assert!(report.contains("Neural Network / ANN: 3"));
    assert!(report.contains("  Unknown:   2"));
    assert!(report.contains("  E          0     1     0     1     1       3"));
}

#[test]
fn test_staging_export() {
    let (dir, store) = sample_collection();
    add_unit(
        &dir,
        &store,
        "d1",
        success(&Paper {
            key: "d1",
            category: Category::D,
            score: 1,
            year: Some(2020),
            methods: &[],
            techniques: &["active learning loop"],
        }),
    );

    let config = AggregateConfig {
        background: vec![BackgroundQuota {
            category: Category::A,
            limit: 1,
        }],
        ..AggregateConfig::default()
    };
    let aggregator = Aggregator::new(config, Normalizer::default()).unwrap();
    let export: StagingExport = aggregator.staging_export(&store).unwrap();

    let order: Vec<&str> = export.core.iter().map(|e| e.unit.as_str()).collect();
    assert_eq!(order, vec!["d1", "e1", "e2", "e3"]);
    assert_eq!(
        export.core[0].techniques,
        vec!["Active Learning / Adaptive Sampling"]
    );

    // a2 outranks a1 on score
    let background = &export.background[&Category::A];
    assert_eq!(background.len(), 1);
    assert_eq!(background[0].unit, "a2");
    assert!(!export.background.contains_key(&Category::B));

    let out = dir.path().join("staging");
    let (core_path, background_path) = export.write(&out).unwrap();
    assert_eq!(core_path, out.join(CORE_PAPERS_FILE));
    assert_eq!(background_path, out.join(BACKGROUND_PAPERS_FILE));

    let core: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(core_path).unwrap()).unwrap();
    assert_eq!(core[0]["primary_category"], "D");
    assert!(core[0]["title_translated"].is_null());
    let background: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(background_path).unwrap()).unwrap();
    assert_eq!(background["A"][0]["unit"], "a2");
}
