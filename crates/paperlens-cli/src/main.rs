//! paperlens CLI - Batch literature analysis with a language model.

use clap::Parser;
use paperlens_cli::commands;
use paperlens_cli::cli::{ConfigAction, ConfigArgs};
use paperlens_cli::config::OutputFormat;
use paperlens_cli::{logging, Cli, Command, Config, Formatter};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> paperlens_cli::Result<()> {
    let path = match cli.config {
        Some(path) => path,
        None => Config::default_path()?,
    };

    // `config init --force` must work even when the existing file is broken
    if let Command::Config(ConfigArgs {
        action: ConfigAction::Init { force },
    }) = &cli.command
    {
        let formatter = Formatter::new(OutputFormat::Table, !cli.no_color);
        return commands::config::init_config(&path, *force, &formatter);
    }

    let mut config = Config::load(&path)?;
    config.apply_overrides(cli.root, cli.model);
    config.validate()?;

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Analyze(args) => commands::execute_analyze(args, &config, &formatter),
        Command::Summarize(args) => commands::execute_summarize(args, &config, &formatter),
        Command::Export(args) => commands::execute_export(args, &config, &formatter),
        Command::Config(args) => commands::execute_config(args, &config, &path, &formatter),
    }
}
