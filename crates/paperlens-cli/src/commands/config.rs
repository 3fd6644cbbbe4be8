//! Config command implementation.

use crate::cli::{ConfigAction, ConfigArgs};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::Path;

/// Execute the config command.
pub fn execute_config(
    args: ConfigArgs,
    config: &Config,
    path: &Path,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        ConfigAction::Show => show_config(config, path, formatter),
        ConfigAction::Init { force } => init_config(path, force, formatter),
    }
}

/// Print the effective configuration.
fn show_config(config: &Config, path: &Path, formatter: &Formatter) -> Result<()> {
    println!("# {}", path.display());
    println!("{}", config.to_toml()?);

    // The key itself never leaves the environment
    let key_env = &config.provider.api_key_env;
    let status = match std::env::var(key_env) {
        Ok(key) if !key.trim().is_empty() => formatter.success(&format!("{} is set", key_env)),
        _ => formatter.warning(&format!("{} is not set", key_env)),
    };
    println!("{}", status);
    Ok(())
}

/// Write a default configuration file.
pub fn init_config(path: &Path, force: bool, formatter: &Formatter) -> Result<()> {
    if path.exists() && !force {
        return Err(CliError::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    Config::default().save(path)?;
    println!(
        "{}",
        formatter.success(&format!("Wrote default configuration to {}", path.display()))
    );
    Ok(())
}
