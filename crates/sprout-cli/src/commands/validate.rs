//! Implementation of the `sprout validate` command.
//!
//! Surfaces catalog integrity findings (overlapping dependencies or config
//! keys between descriptors) as warnings. Generation tolerates these with
//! last-writer-wins, but a shipped catalog or service pack should be clean;
//! `--strict` turns any finding into a non-zero exit for CI use.

use tracing::instrument;

use sprout_core::application::CatalogService;

use crate::{
    cli::{ValidateArgs, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `sprout validate` command.
#[instrument(skip_all)]
pub fn execute(
    args: ValidateArgs,
    _global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let catalog = super::generate::build_catalog(&config)?;
    let service = CatalogService::new(Box::new(catalog));

    let warnings = service.validate().map_err(CliError::Core)?;

    if warnings.is_empty() {
        output.success("Catalog is clean: no overlapping dependencies or config keys.")?;
        return Ok(());
    }

    for warning in &warnings {
        output.warning(&warning.to_string())?;
    }
    output.print("")?;
    output.print(&format!("{} warning(s) found.", warnings.len()))?;

    if args.strict {
        return Err(CliError::CatalogInvalid {
            count: warnings.len(),
        });
    }
    Ok(())
}
