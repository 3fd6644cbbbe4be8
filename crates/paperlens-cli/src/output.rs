//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use paperlens_aggregator::{render_report, AggregateSummary, StagingExport};
use paperlens_batch::{
    BatchMetrics, DryRunReport, ProgressEvent, ProgressSink, UnitOutcome,
};
use paperlens_domain::FailureKind;
use std::path::Path;
use tabled::{
    builder::Builder,
    settings::{object::Columns, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format the dry-run counts.
    pub fn dry_run(&self, report: &DryRunReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "total_units": report.total_units,
                "with_document": report.with_document,
                "done": report.done,
                "pending": report.pending,
                "no_document": report.no_document,
            }))?),
            OutputFormat::Table => Ok(self.key_value_table(&[
                ("Total folders", report.total_units.to_string()),
                ("With document", report.with_document.to_string()),
                ("Already analyzed", report.done.to_string()),
                ("To process", report.pending.to_string()),
                ("No document", report.no_document.to_string()),
            ])),
        }
    }

    /// Format the final batch tally.
    pub fn metrics(&self, metrics: &BatchMetrics) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let failures: serde_json::Map<String, serde_json::Value> = metrics
                    .failures
                    .iter()
                    .map(|(kind, count)| (kind.as_str().to_string(), (*count).into()))
                    .collect();
                Ok(serde_json::to_string_pretty(&serde_json::json!({
                    "success": metrics.success,
                    "failed": metrics.total_failed(),
                    "failures": failures,
                    "skipped": metrics.skipped,
                    "no_document": metrics.no_document,
                    "write_failed": metrics.write_failed,
                    "input_tokens": metrics.input_tokens,
                    "output_tokens": metrics.output_tokens,
                    "elapsed_secs": metrics.elapsed.as_secs_f64(),
                }))?)
            }
            OutputFormat::Table => {
                let mut out = metrics.summary();
                if metrics.was_rate_limited() {
                    if let Some(at) = out.find("Hint:") {
                        let hint = out.split_off(at);
                        out.push_str(&self.colorize(&hint, "yellow"));
                    }
                }
                Ok(out)
            }
        }
    }

    /// Format a collection summary.
    pub fn summary(&self, summary: &AggregateSummary, core_label: &str) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(summary)?),
            OutputFormat::Table => Ok(render_report(summary, core_label)),
        }
    }

    /// Format the export result.
    pub fn export(&self, export: &StagingExport, core: &Path, background: &Path) -> Result<String> {
        let background_count: usize = export.background.values().map(Vec::len).sum();
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "core_papers": export.core.len(),
                "background_papers": background_count,
                "core_file": core.display().to_string(),
                "background_file": background.display().to_string(),
            }))?),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["File", "Papers"]);
                builder.push_record([core.display().to_string(), export.core.len().to_string()]);
                for (category, entries) in &export.background {
                    builder.push_record([
                        format!("{}  [{}]", background.display(), category),
                        entries.len().to_string(),
                    ]);
                }
                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Columns::last()).with(Alignment::right()));
                Ok(table.to_string())
            }
        }
    }

    fn key_value_table(&self, rows: &[(&str, String)]) -> String {
        let mut builder = Builder::default();
        for (key, value) in rows {
            builder.push_record([key.to_string(), value.clone()]);
        }
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Columns::last()).with(Alignment::right()));
        table.to_string()
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Prints run progress to stdout, one line per unit plus checkpoints
pub struct ConsoleProgress<'a> {
    formatter: &'a Formatter,
}

impl<'a> ConsoleProgress<'a> {
    /// Create a sink printing through `formatter`
    pub fn new(formatter: &'a Formatter) -> Self {
        Self { formatter }
    }

    /// One line describing a finished unit
    pub fn outcome_line(&self, index: usize, total: usize, key: &str, outcome: &UnitOutcome) -> String {
        let prefix = format!("[{}/{}] {}", index, total, key);
        match outcome {
            UnitOutcome::Success => self.formatter.success(&prefix),
            UnitOutcome::Failed(FailureKind::RateLimited) => self
                .formatter
                .warning(&format!("{}: rate limited", prefix)),
            UnitOutcome::Failed(kind) => self.formatter.error(&format!("{}: {}", prefix, kind)),
            UnitOutcome::WriteFailed(reason) => self
                .formatter
                .error(&format!("{}: record not written ({})", prefix, reason)),
            UnitOutcome::Skipped => format!("{}: already analyzed", prefix),
            UnitOutcome::NoDocument => self.formatter.warning(&format!("{}: no document", prefix)),
        }
    }
}

impl ProgressSink for ConsoleProgress<'_> {
    fn report(&self, event: &ProgressEvent<'_>) {
        match event {
            ProgressEvent::Started {
                pending,
                total_units,
            } => println!(
                "{}",
                self.formatter
                    .info(&format!("{} of {} units to process", pending, total_units))
            ),
            ProgressEvent::UnitStarted { .. } => {}
            ProgressEvent::UnitFinished {
                index,
                total,
                key,
                outcome,
            } => println!("{}", self.outcome_line(*index, *total, key.as_str(), outcome)),
            ProgressEvent::Checkpoint {
                done,
                total,
                metrics,
                eta,
            } => println!(
                "{}",
                self.formatter.info(&format!(
                    "Progress {}/{}: {} ok, {} failed, ETA {:.1} min",
                    done,
                    total,
                    metrics.success,
                    metrics.total_failed(),
                    eta.as_secs_f64() / 60.0
                ))
            ),
        }
    }
}
