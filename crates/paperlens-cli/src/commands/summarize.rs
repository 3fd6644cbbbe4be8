//! Summarize command implementation.

use super::{build_aggregator, open_store};
use crate::cli::SummarizeArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use paperlens_aggregator::write_summary;

/// Execute the summarize command.
pub fn execute_summarize(args: SummarizeArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let store = open_store(config)?;
    let aggregator = build_aggregator(config)?;

    let summary = aggregator.aggregate(&store)?;
    write_summary(&summary, &args.output)?;

    println!(
        "{}",
        formatter.summary(&summary, &aggregator.config().core_label())?
    );
    eprintln!(
        "{}",
        formatter.success(&format!("Summary saved to {}", args.output.display()))
    );
    Ok(())
}
