//! Plain-text collection report

use crate::summary::AggregateSummary;
use paperlens_domain::{Category, Field, RelevanceScore};
use std::fmt::Write;

const WIDTH: usize = 60;
const ERROR_LIST_LIMIT: usize = 10;
const TITLE_CHARS: usize = 60;

/// Horizontal bar of `units` blocks
fn bar(units: usize) -> String {
    "█".repeat(units)
}

/// One block per two percentage points
pub fn percent_bar(pct: f64) -> String {
    bar((pct / 2.0).max(0.0) as usize)
}

/// One block per two papers
pub fn count_bar(count: usize) -> String {
    bar(count / 2)
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{}", "─".repeat(WIDTH));
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "{}", "─".repeat(WIDTH));
}

fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

/// Render the summary as a sectioned text report
///
/// `core_label` describes the core-paper rule in the section heading, e.g.
/// `"E, score >= 4"`.
pub fn render_report(summary: &AggregateSummary, core_label: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "=".repeat(WIDTH));
    let _ = writeln!(out, "Literature Analysis Summary");
    let _ = writeln!(out, "{}", "=".repeat(WIDTH));
    let _ = writeln!(
        out,
        "\nRecords: {} | Analyzed: {} | Parse errors: {}",
        summary.total, summary.analyzed, summary.parse_errors
    );

    if !summary.errors.is_empty() {
        let kinds: Vec<String> = summary
            .error_kinds
            .iter()
            .map(|(kind, count)| format!("{}: {}", kind, count))
            .collect();
        let _ = writeln!(out, "\nExcluded records ({}):", kinds.join(", "));
        for error in summary.errors.iter().take(ERROR_LIST_LIMIT) {
            let _ = writeln!(out, "  - {}: {}", error.unit, error.reason);
        }
        if summary.errors.len() > ERROR_LIST_LIMIT {
            let _ = writeln!(out, "  ... and {} more", summary.errors.len() - ERROR_LIST_LIMIT);
        }
    }

    section(&mut out, "1. Primary Category Distribution");
    for category in Category::ALL {
        let count = summary.primary_category.get(&category).copied().unwrap_or(0);
        let pct = summary.category_share(category);
        let _ = writeln!(
            out,
            "  {} ({}): {:>4} ({:5.1}%) {}",
            category,
            category.description(),
            count,
            pct,
            percent_bar(pct)
        );
    }

    section(&mut out, "2. Relevance Score Distribution (1-5)");
    for score in RelevanceScore::all().map(u8::from) {
        let count = summary.relevance_score.get(&score).copied().unwrap_or(0);
        let pct = summary.score_share(score);
        let _ = writeln!(out, "  {}: {:>4} ({:5.1}%) {}", score, count, pct, percent_bar(pct));
    }

    section(&mut out, "3. Secondary Category Distribution (multi-select)");
    for category in Category::ALL {
        let count = summary.secondary_category.get(&category).copied().unwrap_or(0);
        let _ = writeln!(out, "  {}: {:>4}", category, count);
    }

    section(&mut out, "4. Top Methods");
    for row in &summary.top_methods {
        let _ = writeln!(out, "  {}: {}", row.label, row.count);
    }

    section(&mut out, "5. Top Techniques");
    for row in &summary.top_techniques {
        let _ = writeln!(out, "  {}: {}", row.label, row.count);
    }

    section(&mut out, "6. Year Distribution");
    for (year, count) in &summary.years {
        let _ = writeln!(out, "  {}: {:>3} {}", year, count, count_bar(*count));
    }
    if summary.invalid_years.count > 0 {
        let _ = writeln!(out, "  Unknown: {:>3}", summary.invalid_years.count);
    }

    section(&mut out, "7. Language Distribution");
    for (language, count) in &summary.languages {
        let _ = writeln!(out, "  {}: {}", language, count);
    }

    section(&mut out, "8. Category x Relevance Score Crosstab");
    let _ = write!(out, "  {:<6}", "Cat");
    for score in RelevanceScore::all().map(u8::from) {
        let _ = write!(out, "  {:>4}", score);
    }
    let _ = writeln!(out, "  {:>6}", "Total");
    for (category, row) in &summary.category_score {
        let total: usize = row.values().sum();
        let _ = write!(out, "  {:<6}", category.as_str());
        for count in row.values() {
            let _ = write!(out, "  {:>4}", count);
        }
        let _ = writeln!(out, "  {:>6}", total);
    }

    section(
        &mut out,
        &format!("9. Core Papers ({}): {} papers", core_label, summary.core_papers),
    );
    for paper in &summary.core_paper_list {
        let year = match &paper.year {
            Field::Known(year) => year.to_string(),
            Field::Unknown => "?".to_string(),
        };
        let _ = writeln!(
            out,
            "  [{}] {} ({})",
            paper.relevance_score,
            truncate_chars(&paper.title, TITLE_CHARS),
            year
        );
        if !paper.methods.is_empty() {
            let _ = writeln!(out, "      Methods: {}", paper.methods.join(", "));
        }
    }
    if summary.core_papers > summary.core_paper_list.len() {
        let _ = writeln!(
            out,
            "  ... and {} more",
            summary.core_papers - summary.core_paper_list.len()
        );
    }

    if summary.tokens.input_tokens + summary.tokens.output_tokens > 0 {
        let _ = writeln!(
            out,
            "\nTokens: {} in / {} out",
            summary.tokens.input_tokens, summary.tokens.output_tokens
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_bar_halves() {
        assert_eq!(percent_bar(50.0).chars().count(), 25);
        assert_eq!(percent_bar(1.9), "");
        assert_eq!(percent_bar(33.3).chars().count(), 16);
    }

    #[test]
    fn test_count_bar_halves() {
        assert_eq!(count_bar(5).chars().count(), 2);
        assert_eq!(count_bar(1), "");
    }

    #[test]
    fn test_truncate_chars_is_char_safe() {
        assert_eq!(truncate_chars("短标题", 60), "短标题");
        assert_eq!(truncate_chars("αβγδ", 2), "αβ...");
    }
}
