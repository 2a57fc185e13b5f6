//! Implementation of the `sprout config` subcommands.

use tracing::instrument;

use crate::{
    cli::ConfigCommands,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

/// Execute a `sprout config` subcommand.
#[instrument(skip_all)]
pub fn execute(cmd: ConfigCommands, mut config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = config.get(&key)?;
            output.print(&value)?;
        }
        ConfigCommands::Set { key, value } => {
            config.set(&key, &value)?;
            let path = AppConfig::config_path();
            config.save(&path)?;
            output.success(&format!("{key} = {value}"))?;
        }
        ConfigCommands::List => {
            for key in [
                "defaults.platform",
                "defaults.output",
                "output.no_color",
                "output.format",
                "catalog.pack_dir",
            ] {
                output.print(&format!("{key} = {}", config.get(key)?))?;
            }
        }
        ConfigCommands::Path => {
            output.print(&AppConfig::config_path().display().to_string())?;
        }
    }
    Ok(())
}
