//! Implementation of the `sprout list` command.

use tracing::instrument;

use sprout_core::application::{CatalogService, ServiceInfo};
use sprout_core::domain::{ApplicationType as CoreAppType, Platform as CorePlatform};

use crate::{
    cli::{ApplicationType, ListArgs, ListFormat, Platform, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `sprout list` command.
#[instrument(skip_all)]
pub fn execute(
    args: ListArgs,
    _global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let catalog = super::generate::build_catalog(&config)?;
    let service = CatalogService::new(Box::new(catalog));

    let infos = service
        .list(
            args.platform.map(convert_platform),
            args.application_type.map(convert_application_type),
        )
        .map_err(CliError::Core)?;

    if infos.is_empty() {
        output.info("No services match the given filters.")?;
        return Ok(());
    }

    match args.format {
        ListFormat::List => {
            for info in &infos {
                output.print(&info.name)?;
            }
        }
        ListFormat::Json => {
            output.print(&render_json(&infos))?;
        }
        ListFormat::Table => {
            render_table(&infos, &output)?;
        }
    }

    Ok(())
}

// ── Type conversions CLI → core ───────────────────────────────────────────────

fn convert_platform(platform: Platform) -> CorePlatform {
    match platform {
        Platform::Node => CorePlatform::Node,
        Platform::Python => CorePlatform::Python,
        Platform::Swift => CorePlatform::Swift,
        Platform::Java => CorePlatform::Java,
    }
}

fn convert_application_type(kind: ApplicationType) -> CoreAppType {
    match kind {
        ApplicationType::Web => CoreAppType::Web,
        ApplicationType::Microservice => CoreAppType::Microservice,
    }
}

// ── Rendering ─────────────────────────────────────────────────────────────────

fn render_table(infos: &[ServiceInfo], output: &OutputManager) -> CliResult<()> {
    let name_width = infos
        .iter()
        .map(|i| i.name.len())
        .max()
        .unwrap_or(0)
        .max("SERVICE".len());

    output.header(&format!("{:<name_width$}  {:<10}  DESCRIPTION", "SERVICE", "APP TYPES"))?;
    for info in infos {
        let app_types = info
            .application_types
            .as_ref()
            .map(|kinds| kinds.join(","))
            .unwrap_or_else(|| "any".into());
        output.print(&format!(
            "{:<name_width$}  {:<10}  {}",
            info.name, app_types, info.description
        ))?;
    }
    output.print("")?;
    output.print(&format!("{} service(s)", infos.len()))?;
    Ok(())
}

fn render_json(infos: &[ServiceInfo]) -> String {
    let values: Vec<serde_json::Value> = infos
        .iter()
        .map(|info| {
            serde_json::json!({
                "name": info.name,
                "displayName": info.display_name,
                "description": info.description,
                "platforms": info.platforms,
                "applicationTypes": info.application_types,
                "dependencies": info.dependency_count,
                "configKeys": info.config_key_count,
            })
        })
        .collect();
    serde_json::to_string_pretty(&values).expect("list JSON is always serializable")
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn info(name: &str) -> ServiceInfo {
        ServiceInfo {
            name: name.into(),
            display_name: name.into(),
            description: "A service.".into(),
            platforms: vec!["node".into()],
            application_types: None,
            dependency_count: 1,
            config_key_count: 1,
        }
    }

    #[test]
    fn json_rendering_includes_every_service() {
        let rendered = render_json(&[info("mongodb"), info("redis")]);
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
        assert_eq!(parsed[0]["name"], "mongodb");
        assert_eq!(parsed[0]["applicationTypes"], serde_json::Value::Null);
    }

    #[test]
    fn conversions_cover_all_variants() {
        assert_eq!(convert_platform(Platform::Node), CorePlatform::Node);
        assert_eq!(convert_platform(Platform::Java), CorePlatform::Java);
        assert_eq!(
            convert_application_type(ApplicationType::Microservice),
            CoreAppType::Microservice
        );
    }
}
