//! Analyze command implementation.

use super::open_store;
use crate::cli::AnalyzeArgs;
use crate::config::{Config, OutputFormat};
use crate::error::{CliError, Result};
use crate::output::{ConsoleProgress, Formatter};
use paperlens_batch::{BatchRunner, DryRunReport, NullProgress, RunScope};
use paperlens_domain::UnitKey;
use paperlens_extractor::{Analyzer, PdfTextExtractor, PromptBuilder};
use paperlens_llm::{OpenRouterProvider, Throttled};
use std::fs;
use tracing::info;

/// Execute the analyze command.
pub fn execute_analyze(args: AnalyzeArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let store = open_store(config)?;

    if args.dry_run {
        let report = DryRunReport::scan(&store)?;
        println!("{}", formatter.dry_run(&report)?);
        return Ok(());
    }

    // Everything fatal is checked before the first unit is touched
    let provider = OpenRouterProvider::from_env(config.provider.clone())
        .map_err(|e| CliError::Config(e.to_string()))?;
    let llm = Throttled::new(provider, config.provider.request_delay());
    let analyzer = Analyzer::new(
        llm,
        PdfTextExtractor::new(config.extractor.clone()),
        build_prompt(config)?,
    );
    let runner = BatchRunner::new(store, analyzer, config.batch.clone())?;

    let scope = scope(&args);
    info!(?scope, model = %config.provider.model, "Starting analysis");

    let metrics = match formatter.format() {
        OutputFormat::Table => runner.run(scope, &ConsoleProgress::new(formatter))?,
        OutputFormat::Json => runner.run(scope, &NullProgress)?,
    };

    println!("{}", formatter.metrics(&metrics)?);
    Ok(())
}

/// Translate flags into the run scope.
pub fn scope(args: &AnalyzeArgs) -> RunScope {
    match (&args.folder, args.limit) {
        (Some(folder), _) => RunScope::Unit(UnitKey::new(folder.as_str())),
        (None, Some(limit)) => RunScope::Limit(limit),
        (None, None) => RunScope::All,
    }
}

/// Prompt from configuration, reading the system prompt file if set.
pub fn build_prompt(config: &Config) -> Result<PromptBuilder> {
    let extractor = &config.extractor;
    let mut prompt = PromptBuilder::new(&extractor.review_language)
        .with_sampling(config.provider.temperature, config.provider.max_tokens);

    if let Some(path) = &extractor.system_prompt_file {
        let text = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Cannot read system prompt {}: {}", path.display(), e))
        })?;
        if text.trim().is_empty() {
            return Err(CliError::Config(format!(
                "System prompt {} is empty",
                path.display()
            )));
        }
        prompt = prompt.with_system_prompt(text.replace("{review_language}", &extractor.review_language));
    }

    Ok(prompt)
}
