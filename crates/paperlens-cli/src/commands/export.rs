//! Export command implementation.

use super::{build_aggregator, open_store};
use crate::cli::ExportArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;

/// Execute the export command.
pub fn execute_export(args: ExportArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let store = open_store(config)?;
    let aggregator = build_aggregator(config)?;

    let export = aggregator.staging_export(&store)?;
    if export.core.is_empty() {
        eprintln!(
            "{}",
            formatter.warning("No papers in the export categories yet")
        );
    }

    let (core, background) = export.write(&args.out_dir)?;
    println!("{}", formatter.export(&export, &core, &background)?);
    Ok(())
}
