//! Collection-level statistics

use crate::config::AggregateConfig;
use crate::corpus::{AnalyzedUnit, Corpus};
use crate::error::AggregateError;
use crate::normalize::Normalizer;
use paperlens_domain::{Category, Field, RecordStore, RelevanceScore};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::info;

/// Label used for records without a language
pub const UNKNOWN_LANGUAGE: &str = "Unknown";

/// One row of a frequency table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCount {
    /// Normalized label
    pub label: String,
    /// Papers mentioning it
    pub count: usize,
}

/// Records whose year is missing or implausible
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidYears {
    /// How many
    pub count: usize,
    /// Their unit keys
    pub units: Vec<String>,
}

/// A high-relevance paper listed in the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorePaper {
    /// Unit key
    pub unit: String,
    /// Paper title
    pub title: String,
    /// Publication year
    pub year: Field<i64>,
    /// Relevance score
    pub relevance_score: u8,
    /// Up to three normalized methods
    pub methods: Vec<String>,
}

/// A record excluded from the tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordError {
    /// Unit key
    pub unit: String,
    /// Failure tag, `malformed`, or `unclassified`
    pub kind: String,
    /// Failure detail or parse error
    pub reason: String,
}

/// Token totals across every success record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenTotals {
    /// Prompt tokens
    pub input_tokens: u64,
    /// Completion tokens
    pub output_tokens: u64,
}

/// Statistics over one collection's records
///
/// Category, score, and crosstab tables always contain every label, zero
/// counts included, so readers never need to special-case a missing key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateSummary {
    /// Record files found
    pub total: usize,
    /// Success records
    pub analyzed: usize,
    /// Failure records plus unreadable record files
    pub parse_errors: usize,
    /// Parse errors by failure tag
    pub error_kinds: BTreeMap<String, usize>,
    /// Every excluded record, in key order
    pub errors: Vec<RecordError>,
    /// Success records per primary category
    #[serde(rename = "primary_category_counts")]
    pub primary_category: BTreeMap<Category, usize>,
    /// Mentions of each category among secondary labels
    #[serde(rename = "secondary_category_counts")]
    pub secondary_category: BTreeMap<Category, usize>,
    /// Success records per relevance score
    #[serde(rename = "relevance_score_counts")]
    pub relevance_score: BTreeMap<u8, usize>,
    /// Category by score counts
    #[serde(rename = "category_score_crosstab")]
    pub category_score: BTreeMap<Category, BTreeMap<u8, usize>>,
    /// Most frequent normalized methods
    pub top_methods: Vec<LabelCount>,
    /// Most frequent normalized techniques
    pub top_techniques: Vec<LabelCount>,
    /// Success records per valid publication year
    #[serde(rename = "year_distribution")]
    pub years: BTreeMap<i64, usize>,
    /// Success records without a valid year
    #[serde(rename = "invalid_year")]
    pub invalid_years: InvalidYears,
    /// Success records per language
    #[serde(rename = "language_distribution")]
    pub languages: BTreeMap<String, usize>,
    /// Number of core papers
    pub core_papers: usize,
    /// Highest-scored core papers, best first
    pub core_paper_list: Vec<CorePaper>,
    /// Token totals
    pub tokens: TokenTotals,
}

impl AggregateSummary {
    /// Share of analyzed records in `category`, as a percentage
    pub fn category_share(&self, category: Category) -> f64 {
        percent(
            self.primary_category.get(&category).copied().unwrap_or(0),
            self.analyzed,
        )
    }

    /// Share of analyzed records with `score`, as a percentage
    pub fn score_share(&self, score: u8) -> f64 {
        percent(
            self.relevance_score.get(&score).copied().unwrap_or(0),
            self.analyzed,
        )
    }
}

/// `part` as a percentage of `whole`, 0 when `whole` is 0
pub fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

/// Computes collection statistics
///
/// # Examples
///
/// ```
/// use paperlens_aggregator::{AggregateConfig, Aggregator, Corpus, Normalizer};
///
/// let aggregator = Aggregator::new(AggregateConfig::default(), Normalizer::default()).unwrap();
/// let summary = aggregator.summarize(&Corpus::default());
/// assert_eq!(summary.total, 0);
/// assert_eq!(summary.primary_category.len(), 6);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    config: AggregateConfig,
    normalizer: Normalizer,
}

impl Aggregator {
    /// Create an aggregator, validating both configuration and rules
    pub fn new(config: AggregateConfig, normalizer: Normalizer) -> Result<Self, AggregateError> {
        config.validate().map_err(AggregateError::Config)?;
        normalizer.validate().map_err(AggregateError::Config)?;
        Ok(Self { config, normalizer })
    }

    /// Load every record from `store` and summarize it
    ///
    /// Safe to call while a batch is still running; units without a record
    /// are simply not counted yet.
    pub fn aggregate<S: RecordStore>(&self, store: &S) -> Result<AggregateSummary, AggregateError> {
        let corpus = Corpus::load(store)?;
        let summary = self.summarize(&corpus);
        info!(
            total = summary.total,
            analyzed = summary.analyzed,
            parse_errors = summary.parse_errors,
            "Aggregated collection"
        );
        Ok(summary)
    }

    /// Configuration
    pub fn config(&self) -> &AggregateConfig {
        &self.config
    }

    /// Rule tables
    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Compute every statistic over `corpus`
    pub fn summarize(&self, corpus: &Corpus) -> AggregateSummary {
        let mut error_kinds = BTreeMap::new();
        let mut errors = Vec::with_capacity(corpus.rejected.len());
        for (key, rejected) in &corpus.rejected {
            *error_kinds.entry(rejected.tag().to_string()).or_insert(0) += 1;
            errors.push(RecordError {
                unit: key.to_string(),
                kind: rejected.tag().to_string(),
                reason: rejected.reason().to_string(),
            });
        }

        let scores: Vec<u8> = RelevanceScore::all().map(u8::from).collect();
        let zero_scores: BTreeMap<u8, usize> = scores.iter().map(|&s| (s, 0)).collect();
        let mut primary_category: BTreeMap<Category, usize> =
            Category::ALL.iter().map(|&c| (c, 0)).collect();
        let mut secondary_category = primary_category.clone();
        let mut relevance_score = zero_scores.clone();
        let mut category_score: BTreeMap<Category, BTreeMap<u8, usize>> = Category::ALL
            .iter()
            .map(|&c| (c, zero_scores.clone()))
            .collect();

        let mut methods: HashMap<String, usize> = HashMap::new();
        let mut techniques: HashMap<String, usize> = HashMap::new();
        let mut years = BTreeMap::new();
        let mut invalid_years = InvalidYears::default();
        let mut languages = BTreeMap::new();
        let mut core: Vec<&AnalyzedUnit> = Vec::new();
        let mut tokens = TokenTotals::default();

        for unit in &corpus.analyzed {
            let paper = &unit.analysis;
            let category = paper.primary_category;
            let score = paper.relevance_score.value();

            *primary_category.entry(category).or_insert(0) += 1;
            for secondary in paper.secondary() {
                *secondary_category.entry(*secondary).or_insert(0) += 1;
            }
            *relevance_score.entry(score).or_insert(0) += 1;
            *category_score
                .entry(category)
                .or_default()
                .entry(score)
                .or_insert(0) += 1;

            // A paper listing the same method twice counts once
            let mut seen: Vec<String> = self.normalizer.methods(paper.method_names()).collect();
            seen.sort();
            seen.dedup();
            for label in seen {
                *methods.entry(label).or_insert(0) += 1;
            }
            let mut seen: Vec<String> =
                self.normalizer.techniques(paper.technique_names()).collect();
            seen.sort();
            seen.dedup();
            for label in seen {
                *techniques.entry(label).or_insert(0) += 1;
            }

            match paper.valid_year() {
                Some(year) => *years.entry(year).or_insert(0) += 1,
                None => {
                    invalid_years.count += 1;
                    invalid_years.units.push(unit.key.to_string());
                }
            }

            let language = match &paper.language {
                Field::Known(language) if !language.as_str().trim().is_empty() => {
                    language.as_str().to_string()
                }
                _ => UNKNOWN_LANGUAGE.to_string(),
            };
            *languages.entry(language).or_insert(0) += 1;

            if self.config.is_core(category, score) {
                core.push(unit);
            }

            tokens.input_tokens += paper.meta.input_tokens;
            tokens.output_tokens += paper.meta.output_tokens;
        }

        core.sort_by(|a, b| {
            b.analysis
                .relevance_score
                .cmp(&a.analysis.relevance_score)
                .then_with(|| a.key.cmp(&b.key))
        });
        let core_paper_list = core
            .iter()
            .take(self.config.core_list_limit)
            .map(|unit| CorePaper {
                unit: unit.key.to_string(),
                title: unit.analysis.title.clone(),
                year: unit.analysis.year.clone(),
                relevance_score: unit.analysis.relevance_score.value(),
                methods: self
                    .normalizer
                    .methods(unit.analysis.method_names())
                    .take(3)
                    .collect(),
            })
            .collect();

        AggregateSummary {
            total: corpus.total(),
            analyzed: corpus.analyzed.len(),
            parse_errors: corpus.rejected.len(),
            error_kinds,
            errors,
            primary_category,
            secondary_category,
            relevance_score,
            category_score,
            top_methods: top_n(methods, self.config.top_n),
            top_techniques: top_n(techniques, self.config.top_n),
            years,
            invalid_years,
            languages,
            core_papers: core.len(),
            core_paper_list,
            tokens,
        }
    }
}

/// Highest counts first, ties broken by label
fn top_n(counts: HashMap<String, usize>, n: usize) -> Vec<LabelCount> {
    let mut rows: Vec<LabelCount> = counts
        .into_iter()
        .map(|(label, count)| LabelCount { label, count })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    rows.truncate(n);
    rows
}
