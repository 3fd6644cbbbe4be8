//! Output record module - the structured result of analyzing one document

use crate::category::Category;
use crate::failure::{FailureKind, FailureRecord};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Optional record field with an explicit "never extracted" state
///
/// `Unknown` is written as JSON `null` and the key is always present, so a
/// reader can tell "the model did not provide this" apart from a present but
/// empty value such as `""` or `[]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field<T> {
    /// Value provided by the model (possibly empty)
    Known(T),
    /// Value absent from the model output or explicitly `null`
    Unknown,
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Unknown
    }
}

impl<T> Field<T> {
    /// Borrow the value if known
    pub fn known(&self) -> Option<&T> {
        match self {
            Field::Known(value) => Some(value),
            Field::Unknown => None,
        }
    }

    /// Whether the field was never extracted
    pub fn is_unknown(&self) -> bool {
        matches!(self, Field::Unknown)
    }

    /// Map the known value
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Field<U> {
        match self {
            Field::Known(value) => Field::Known(f(value)),
            Field::Unknown => Field::Unknown,
        }
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Field::Known(value),
            None => Field::Unknown,
        }
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Field::Known(value) => value.serialize(serializer),
            Field::Unknown => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Field::from)
    }
}

/// Relevance of a paper to the review topic, bounded to 1..=5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct RelevanceScore(u8);

impl RelevanceScore {
    /// Lowest valid score
    pub const MIN: u8 = 1;
    /// Highest valid score
    pub const MAX: u8 = 5;

    /// Create a score, rejecting values outside the bounded range
    ///
    /// # Examples
    ///
    /// ```
    /// use paperlens_domain::RelevanceScore;
    ///
    /// assert_eq!(RelevanceScore::new(4).unwrap().value(), 4);
    /// assert!(RelevanceScore::new(0).is_err());
    /// assert!(RelevanceScore::new(6).is_err());
    /// ```
    pub fn new(value: i64) -> Result<Self, String> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(format!(
                "relevance_score {} out of range [{}, {}]",
                value,
                Self::MIN,
                Self::MAX
            ))
        }
    }

    /// Get the raw score
    pub fn value(&self) -> u8 {
        self.0
    }

    /// All valid scores in ascending order
    pub fn all() -> impl Iterator<Item = RelevanceScore> {
        (Self::MIN..=Self::MAX).map(RelevanceScore)
    }
}

impl TryFrom<i64> for RelevanceScore {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RelevanceScore> for u8 {
    fn from(score: RelevanceScore) -> Self {
        score.0
    }
}

impl fmt::Display for RelevanceScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Language of a paper
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Language {
    /// English only
    English,
    /// Chinese only
    Chinese,
    /// Both languages (e.g. Chinese body with English abstract)
    Bilingual,
    /// Any other label, kept verbatim
    Other(String),
}

impl Language {
    /// Normalize a free-text language label
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "english" | "en" => Language::English,
            "chinese" | "zh" | "中文" => Language::Chinese,
            "bilingual" | "english/chinese" | "chinese/english" => Language::Bilingual,
            _ => Language::Other(trimmed.to_string()),
        }
    }

    /// Display label
    pub fn as_str(&self) -> &str {
        match self {
            Language::English => "English",
            Language::Chinese => "Chinese",
            Language::Bilingual => "Bilingual",
            Language::Other(label) => label,
        }
    }
}

impl From<String> for Language {
    fn from(value: String) -> Self {
        Language::parse(&value)
    }
}

impl From<Language> for String {
    fn from(language: Language) -> Self {
        language.as_str().to_string()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata about the model call that produced a record
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnalysisMeta {
    /// Prompt tokens reported by the endpoint
    pub input_tokens: u64,
    /// Completion tokens reported by the endpoint
    pub output_tokens: u64,
    /// Model identifier used for the request
    pub model: String,
    /// Local timestamp, `YYYY-MM-DD HH:MM:SS`
    pub analyzed_at: String,
}

/// Success variant of an output record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperAnalysis {
    /// Title in the original language
    pub title: String,
    /// Title translated into the review language
    #[serde(default)]
    pub title_translated: Field<String>,
    /// Up to the first three authors
    #[serde(default)]
    pub authors: Field<Vec<String>>,
    /// Publication year
    #[serde(default)]
    pub year: Field<i64>,
    /// Journal or conference
    #[serde(default)]
    pub venue: Field<String>,
    /// Language of the paper
    #[serde(default)]
    pub language: Field<Language>,

    /// Most applicable category
    pub primary_category: Category,
    /// Other applicable categories
    #[serde(default)]
    pub secondary_categories: Field<Vec<Category>>,
    /// Relevance to the review topic
    pub relevance_score: RelevanceScore,

    /// Specific material or system studied
    #[serde(default)]
    pub study_subject: Field<String>,
    /// Problem addressed by the paper
    #[serde(default)]
    pub research_problem: Field<String>,
    /// Method names as extracted
    #[serde(default)]
    pub methods: Field<Vec<String>>,
    /// Technique names for the core challenge as extracted
    #[serde(default)]
    pub techniques: Field<Vec<String>>,
    /// Dataset size and source
    #[serde(default)]
    pub dataset: Field<String>,

    /// Main contribution
    #[serde(default)]
    pub contribution: Field<String>,
    /// Main findings
    #[serde(default)]
    pub conclusion: Field<String>,
    /// Limitations
    #[serde(default)]
    pub limitations: Field<String>,
    /// Where and how to cite the paper in the review
    #[serde(default)]
    pub citation_guidance: Field<String>,

    /// Keywords
    #[serde(default)]
    pub keywords: Field<Vec<String>>,

    /// Call metadata
    #[serde(rename = "_meta", default)]
    pub meta: AnalysisMeta,
}

impl PaperAnalysis {
    /// Minimal record with every optional field unknown
    pub fn new(title: impl Into<String>, primary_category: Category, relevance_score: RelevanceScore) -> Self {
        Self {
            title: title.into(),
            title_translated: Field::Unknown,
            authors: Field::Unknown,
            year: Field::Unknown,
            venue: Field::Unknown,
            language: Field::Unknown,
            primary_category,
            secondary_categories: Field::Unknown,
            relevance_score,
            study_subject: Field::Unknown,
            research_problem: Field::Unknown,
            methods: Field::Unknown,
            techniques: Field::Unknown,
            dataset: Field::Unknown,
            contribution: Field::Unknown,
            conclusion: Field::Unknown,
            limitations: Field::Unknown,
            citation_guidance: Field::Unknown,
            keywords: Field::Unknown,
            meta: AnalysisMeta::default(),
        }
    }

    /// Publication year if known and non-zero
    pub fn valid_year(&self) -> Option<i64> {
        self.year.known().copied().filter(|year| *year != 0)
    }

    /// Method names, empty when unknown
    pub fn method_names(&self) -> &[String] {
        self.methods.known().map(Vec::as_slice).unwrap_or_default()
    }

    /// Technique names, empty when unknown
    pub fn technique_names(&self) -> &[String] {
        self.techniques.known().map(Vec::as_slice).unwrap_or_default()
    }

    /// Secondary categories, empty when unknown
    pub fn secondary(&self) -> &[Category] {
        self.secondary_categories
            .known()
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Output record for one document unit
///
/// Serialized untagged: a failure is an object whose `error` key is a string,
/// anything else must be a complete [`PaperAnalysis`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisRecord {
    /// Model call, parse, and validation failed somewhere
    Failure(FailureRecord),
    /// Validated analysis
    Success(Box<PaperAnalysis>),
}

impl AnalysisRecord {
    /// Build a failure record
    pub fn failure(kind: FailureKind, detail: impl AsRef<str>) -> Self {
        AnalysisRecord::Failure(FailureRecord::new(kind, detail))
    }

    /// Whether this is the success variant
    pub fn is_success(&self) -> bool {
        matches!(self, AnalysisRecord::Success(_))
    }

    /// Failure classification, `None` for successes and unclassified failures
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            AnalysisRecord::Failure(failure) => failure.kind(),
            AnalysisRecord::Success(_) => None,
        }
    }
}

/// A record file as found on disk
#[derive(Debug, Clone, PartialEq)]
pub enum StoredRecord {
    /// Deserialized into one of the record variants
    Parsed(AnalysisRecord),
    /// Present but not a valid record (corrupt JSON, wrong shape)
    Malformed {
        /// Why the file was rejected
        reason: String,
    },
}
