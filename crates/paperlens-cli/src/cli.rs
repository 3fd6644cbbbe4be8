//! CLI command definitions and argument parsing.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// paperlens - Batch literature analysis with a language model.
#[derive(Debug, Parser)]
#[command(name = "paperlens")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Collection root (one folder per paper)
    #[arg(short, long, global = true, env = "PAPERLENS_ROOT")]
    pub root: Option<PathBuf>,

    /// Model identifier sent to the endpoint
    #[arg(short, long, global = true, env = "PAPERLENS_MODEL")]
    pub model: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Tables and text reports (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze every pending paper in the collection
    Analyze(AnalyzeArgs),

    /// Aggregate the stored records into a summary
    Summarize(SummarizeArgs),

    /// Write the staging files for the synthesis step
    Export(ExportArgs),

    /// Show or initialize the configuration file
    Config(ConfigArgs),
}

/// Arguments for the analyze command.
#[derive(Debug, Parser)]
pub struct AnalyzeArgs {
    /// Count units only; no model calls, no writes
    #[arg(long)]
    pub dry_run: bool,

    /// Process at most N pending units
    #[arg(short, long, conflicts_with = "folder")]
    pub limit: Option<usize>,

    /// Process exactly this unit, replacing its record
    #[arg(long)]
    pub folder: Option<String>,
}

/// Arguments for the summarize command.
#[derive(Debug, Parser)]
pub struct SummarizeArgs {
    /// Where to write the summary JSON
    #[arg(short, long, default_value = "summary.json")]
    pub output: PathBuf,
}

/// Arguments for the export command.
#[derive(Debug, Parser)]
pub struct ExportArgs {
    /// Directory receiving core_papers.json and background_papers.json
    #[arg(long, default_value = "staging")]
    pub out_dir: PathBuf,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_command() {
        let cli = Cli::parse_from(["paperlens", "analyze", "--dry-run", "--root", "/tmp/lib"]);
        match cli.command {
            Command::Analyze(args) => {
                assert!(args.dry_run);
                assert!(args.limit.is_none());
            }
            _ => panic!("Expected Analyze command"),
        }
        assert_eq!(cli.root, Some(PathBuf::from("/tmp/lib")));
    }

    #[test]
    fn test_limit_conflicts_with_folder() {
        let result = Cli::try_parse_from(["paperlens", "analyze", "--limit", "3", "--folder", "x"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["paperlens", "summarize", "-vv", "--format", "json"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.format, Some(CliFormat::Json));
        match cli.command {
            Command::Summarize(args) => assert_eq!(args.output, PathBuf::from("summary.json")),
            _ => panic!("Expected Summarize command"),
        }
    }

    #[test]
    fn test_config_init() {
        let cli = Cli::parse_from(["paperlens", "config", "init", "--force"]);
        assert!(matches!(
            cli.command,
            Command::Config(ConfigArgs {
                action: ConfigAction::Init { force: true }
            })
        ));
    }
}
