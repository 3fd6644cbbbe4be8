//! Staging export for the downstream synthesis step
//!
//! Two files are written: every paper in the export categories with full
//! detail, and a handful of top-scored representatives per background
//! category.

use crate::config::AggregateConfig;
use crate::corpus::{AnalyzedUnit, Corpus};
use crate::error::AggregateError;
use crate::normalize::Normalizer;
use crate::summary::{AggregateSummary, Aggregator};
use paperlens_domain::{Category, Field, RecordStore};
use paperlens_store::write_atomic;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name of the core-paper export
pub const CORE_PAPERS_FILE: &str = "core_papers.json";

/// File name of the background-paper export
pub const BACKGROUND_PAPERS_FILE: &str = "background_papers.json";

/// Full-detail entry in `core_papers.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorePaperEntry {
    /// Unit key
    pub unit: String,
    /// Original title
    pub title: String,
    /// Translated title
    pub title_translated: Field<String>,
    /// Publication year
    pub year: Field<i64>,
    /// Primary category
    pub primary_category: Category,
    /// Relevance score
    pub relevance_score: u8,
    /// Methods as written
    pub methods: Field<Vec<String>>,
    /// Normalized techniques
    pub techniques: Vec<String>,
    /// Study subject
    pub study_subject: Field<String>,
    /// Core contribution
    pub contribution: Field<String>,
    /// Core conclusion
    pub conclusion: Field<String>,
    /// How to cite it in the review
    pub citation_guidance: Field<String>,
    /// Keywords
    pub keywords: Field<Vec<String>>,
}

/// Short entry in `background_papers.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundPaperEntry {
    /// Unit key
    pub unit: String,
    /// Original title
    pub title: String,
    /// Translated title
    pub title_translated: Field<String>,
    /// Publication year
    pub year: Field<i64>,
    /// Relevance score
    pub relevance_score: u8,
    /// Core contribution
    pub contribution: Field<String>,
    /// How to cite it in the review
    pub citation_guidance: Field<String>,
}

/// Both export payloads
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagingExport {
    /// Every paper in the export categories
    pub core: Vec<CorePaperEntry>,
    /// Representatives per background category
    pub background: BTreeMap<Category, Vec<BackgroundPaperEntry>>,
}

impl StagingExport {
    /// Select and order the export entries from `corpus`
    pub fn build(corpus: &Corpus, config: &AggregateConfig, normalizer: &Normalizer) -> Self {
        let mut core: Vec<&AnalyzedUnit> = corpus
            .analyzed
            .iter()
            .filter(|unit| config.export_categories.contains(&unit.analysis.primary_category))
            .collect();
        core.sort_by(|a, b| {
            a.analysis
                .primary_category
                .cmp(&b.analysis.primary_category)
                .then_with(|| b.analysis.relevance_score.cmp(&a.analysis.relevance_score))
                .then_with(|| a.key.cmp(&b.key))
        });

        let core = core
            .into_iter()
            .map(|unit| {
                let paper = &unit.analysis;
                CorePaperEntry {
                    unit: unit.key.to_string(),
                    title: paper.title.clone(),
                    title_translated: paper.title_translated.clone(),
                    year: paper.year.clone(),
                    primary_category: paper.primary_category,
                    relevance_score: paper.relevance_score.value(),
                    methods: paper.methods.clone(),
                    techniques: normalizer.techniques(paper.technique_names()).collect(),
                    study_subject: paper.study_subject.clone(),
                    contribution: paper.contribution.clone(),
                    conclusion: paper.conclusion.clone(),
                    citation_guidance: paper.citation_guidance.clone(),
                    keywords: paper.keywords.clone(),
                }
            })
            .collect();

        let mut background = BTreeMap::new();
        for quota in &config.background {
            let mut members: Vec<&AnalyzedUnit> = corpus
                .analyzed
                .iter()
                .filter(|unit| unit.analysis.primary_category == quota.category)
                .collect();
            members.sort_by(|a, b| {
                b.analysis
                    .relevance_score
                    .cmp(&a.analysis.relevance_score)
                    .then_with(|| b.analysis.valid_year().cmp(&a.analysis.valid_year()))
                    .then_with(|| a.key.cmp(&b.key))
            });
            let entries = members
                .into_iter()
                .take(quota.limit)
                .map(|unit| BackgroundPaperEntry {
                    unit: unit.key.to_string(),
                    title: unit.analysis.title.clone(),
                    title_translated: unit.analysis.title_translated.clone(),
                    year: unit.analysis.year.clone(),
                    relevance_score: unit.analysis.relevance_score.value(),
                    contribution: unit.analysis.contribution.clone(),
                    citation_guidance: unit.analysis.citation_guidance.clone(),
                })
                .collect();
            background.insert(quota.category, entries);
        }

        Self { core, background }
    }

    /// Write both files into `dir`, returning their paths
    pub fn write(&self, dir: &Path) -> Result<(PathBuf, PathBuf), AggregateError> {
        std::fs::create_dir_all(dir).map_err(|source| AggregateError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let core_path = dir.join(CORE_PAPERS_FILE);
        write_json(&core_path, &self.core)?;
        let background_path = dir.join(BACKGROUND_PAPERS_FILE);
        write_json(&background_path, &self.background)?;

        info!(
            core = self.core.len(),
            background = self.background.values().map(Vec::len).sum::<usize>(),
            dir = %dir.display(),
            "Wrote staging export"
        );
        Ok((core_path, background_path))
    }
}

impl Aggregator {
    /// Load every record from `store` and select the staging export
    pub fn staging_export<S: RecordStore>(&self, store: &S) -> Result<StagingExport, AggregateError> {
        let corpus = Corpus::load(store)?;
        Ok(StagingExport::build(&corpus, self.config(), self.normalizer()))
    }
}

/// Write the summary as pretty JSON, replacing any previous file atomically
pub fn write_summary(summary: &AggregateSummary, path: &Path) -> Result<(), AggregateError> {
    write_json(path, summary)
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), AggregateError> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    write_atomic(path, json.as_bytes()).map_err(|source| AggregateError::Io {
        path: path.to_path_buf(),
        source,
    })
}
