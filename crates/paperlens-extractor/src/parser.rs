//! Parse and validate model output into analysis records

use crate::error::ParseFailure;
use paperlens_domain::{
    AnalysisMeta, Category, Field, Language, PaperAnalysis, RelevanceScore,
};
use serde_json::{Map, Value};

type Object = Map<String, Value>;

/// Parse a raw model response into a validated analysis
///
/// Required fields are `title`, `primary_category`, and `relevance_score`.
/// Optional fields that are absent or `null` become `Field::Unknown`; any
/// field of the wrong JSON type fails the whole record.
///
/// # Examples
///
/// ```
/// use paperlens_extractor::parse_analysis;
/// use paperlens_domain::{AnalysisMeta, Category};
///
/// let raw = r#"{"title": "T", "primary_category": "E. Core", "relevance_score": 5}"#;
/// let analysis = parse_analysis(raw, AnalysisMeta::default()).unwrap();
/// assert_eq!(analysis.primary_category, Category::E);
/// assert!(analysis.venue.is_unknown());
///
/// let bad = r#"{"title": "T", "primary_category": "E", "relevance_score": 7}"#;
/// assert!(parse_analysis(bad, AnalysisMeta::default()).is_err());
/// ```
pub fn parse_analysis(raw: &str, meta: AnalysisMeta) -> Result<PaperAnalysis, ParseFailure> {
    let json_str = extract_json(raw)?;

    let json: Value = serde_json::from_str(json_str)
        .map_err(|e| ParseFailure::new(format!("invalid JSON: {}", e)))?;

    let obj = json
        .as_object()
        .ok_or_else(|| ParseFailure::new("expected a JSON object"))?;

    let title = match obj.get("title") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::String(_)) => return Err(ParseFailure::new("'title' is empty")),
        Some(Value::Null) | None => return Err(ParseFailure::new("missing 'title'")),
        Some(_) => return Err(ParseFailure::new("'title' must be a string")),
    };

    let primary_category = match obj.get("primary_category") {
        Some(Value::String(s)) => parse_category("primary_category", s)?,
        Some(Value::Null) | None => return Err(ParseFailure::new("missing 'primary_category'")),
        Some(_) => return Err(ParseFailure::new("'primary_category' must be a string")),
    };

    let relevance_score = match obj.get("relevance_score") {
        Some(Value::Null) | None => return Err(ParseFailure::new("missing 'relevance_score'")),
        Some(value) => {
            let score = integer("relevance_score", value)?;
            RelevanceScore::new(score).map_err(ParseFailure::new)?
        }
    };

    let mut analysis = PaperAnalysis::new(title, primary_category, relevance_score);

    analysis.title_translated = string_field(obj, &["title_translated", "title_zh"])?;
    analysis.authors = list_field(obj, &["authors"])?;
    analysis.year = match lookup(obj, &["year"]) {
        Some((key, value)) => Field::Known(integer(key, value)?),
        None => Field::Unknown,
    };
    analysis.venue = string_field(obj, &["venue", "journal"])?;
    analysis.language = string_field(obj, &["language"])?.map(|s| Language::parse(&s));

    analysis.secondary_categories = match list_field(obj, &["secondary_categories"])? {
        Field::Known(labels) => Field::Known(
            labels
                .iter()
                .map(|label| parse_category("secondary_categories", label))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Field::Unknown => Field::Unknown,
    };

    analysis.study_subject = string_field(obj, &["study_subject", "domain_specific_material"])?;
    analysis.research_problem = string_field(obj, &["research_problem"])?;
    analysis.methods = list_field(obj, &["methods", "ml_methods"])?;
    analysis.techniques = list_field(obj, &["techniques", "core_technique"])?;
    analysis.dataset = string_field(obj, &["dataset", "dataset_info"])?;

    analysis.contribution = string_field(obj, &["contribution", "core_contribution"])?;
    analysis.conclusion = string_field(obj, &["conclusion", "core_conclusion"])?;
    analysis.limitations = string_field(obj, &["limitations"])?;
    analysis.citation_guidance = string_field(obj, &["citation_guidance", "review_angle"])?;

    analysis.keywords = list_field(obj, &["keywords", "keywords_zh"])?;
    analysis.meta = meta;

    Ok(analysis)
}

/// Extract JSON from response, handling markdown code blocks
pub fn extract_json(response: &str) -> Result<&str, ParseFailure> {
    let mut content = response.trim();

    if let Some(rest) = content.strip_prefix("```") {
        // Drop the fence line, including any language tag
        content = match rest.split_once('\n') {
            Some((_, body)) => body,
            None => rest,
        };
    }
    if let Some(rest) = content.trim_end().strip_suffix("```") {
        content = rest;
    }

    let content = content.trim();
    if content.is_empty() {
        return Err(ParseFailure::new("empty response"));
    }
    Ok(content)
}

fn parse_category(key: &str, label: &str) -> Result<Category, ParseFailure> {
    Category::parse(label)
        .ok_or_else(|| ParseFailure::new(format!("'{}' has unknown label '{}'", key, label)))
}

/// First present, non-null value among `keys`
fn lookup<'a>(obj: &'a Object, keys: &[&'a str]) -> Option<(&'a str, &'a Value)> {
    keys.iter().find_map(|key| match obj.get(*key) {
        Some(Value::Null) | None => None,
        Some(value) => Some((*key, value)),
    })
}

fn integer(key: &str, value: &Value) -> Result<i64, ParseFailure> {
    let parsed = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| ParseFailure::new(format!("'{}' must be an integer, got {}", key, value)))
}

fn string_field(obj: &Object, keys: &[&str]) -> Result<Field<String>, ParseFailure> {
    match lookup(obj, keys) {
        Some((_, Value::String(s))) => Ok(Field::Known(s.trim().to_string())),
        Some((key, _)) => Err(ParseFailure::new(format!("'{}' must be a string", key))),
        None => Ok(Field::Unknown),
    }
}

fn list_field(obj: &Object, keys: &[&str]) -> Result<Field<Vec<String>>, ParseFailure> {
    match lookup(obj, keys) {
        Some((key, Value::Array(items))) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.trim().to_string()),
                _ => Err(ParseFailure::new(format!(
                    "'{}' must contain only strings",
                    key
                ))),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Field::Known),
        Some((key, _)) => Err(ParseFailure::new(format!("'{}' must be an array", key))),
        None => Ok(Field::Unknown),
    }
}
