//! Implementation of the `sprout generate` command.
//!
//! Responsibility: translate CLI arguments into a `SelectionInput`, call the
//! core generate service, and display results. No business logic lives here.

use std::path::Path;

use tracing::{debug, info, instrument};

use sprout_adapters::{InMemoryCatalog, LocalFilesystem, ServicePackLoader};
use sprout_core::application::GenerateService;
use sprout_core::domain::SelectionInput;

use crate::{
    cli::{GenerateArgs, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `sprout generate` command.
///
/// Dispatch sequence:
/// 1. Resolve the payload arguments (file path or inline JSON)
/// 2. Parse them into a core `SelectionInput` (fatal before any write)
/// 3. Build the catalog (builtin + optional service pack)
/// 4. Early-exit if `--dry-run`
/// 5. Execute generation via `GenerateService`
/// 6. Print a run summary
#[instrument(skip_all)]
pub fn execute(
    args: GenerateArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    // 1. Resolve payloads
    let deploy = resolve_payload(&args.deploy)?;
    let app = args.app.as_deref().map(resolve_payload).transpose()?;

    // 2. Parse into a selection (malformed payloads abort here, before I/O)
    let selection =
        SelectionInput::from_payloads(&deploy, app.as_deref()).map_err(|e| CliError::Core(e.into()))?;

    debug!(
        project = %selection.project_name(),
        platform = %selection.platform(),
        services = selection.enabled_keys().count(),
        "Selection parsed"
    );

    // 3. Build the catalog
    let catalog = build_catalog(&config)?;

    // 4. Dry run: describe but do not write.
    if args.dry_run {
        let service = GenerateService::new(Box::new(catalog), Box::new(LocalFilesystem::new()));
        let tree = service.plan(&selection, &args.output).map_err(CliError::Core)?;

        output.info(&format!(
            "Dry run: would write {} file(s) under {}",
            tree.file_count(),
            args.output.display(),
        ))?;
        for file in tree.files() {
            output.print(&format!("  {}", file.path.display()))?;
        }
        return Ok(());
    }

    // 5. Generate
    let service = GenerateService::new(Box::new(catalog), Box::new(LocalFilesystem::new()));

    output.header(&format!(
        "Generating '{}'...",
        selection.project_name()
    ))?;
    info!(project = %selection.project_name(), output = %args.output.display(), "Generation started");

    let report = service
        .generate(&selection, &args.output)
        .map_err(CliError::Core)?;

    for warning in &report.warnings {
        output.warning(warning)?;
    }

    // 6. Success + summary
    output.success(&format!(
        "Project '{}' generated ({} files)",
        selection.project_name(),
        report.files_written,
    ))?;

    if !global.quiet {
        if report.services.is_empty() {
            output.print("No backing services enabled.")?;
        } else {
            output.print(&format!("Services: {}", report.services.join(", ")))?;
        }
        output.print("")?;
        output.print("Next steps:")?;
        output.print(&format!("  cd {}", args.output.display()))?;
        output.print("  npm install")?;
        output.print("  npm start")?;
    }

    Ok(())
}

// ── Payload resolution ────────────────────────────────────────────────────────

/// Accept either inline JSON (starts with `{`) or a path to a JSON file.
pub fn resolve_payload(arg: &str) -> CliResult<String> {
    let trimmed = arg.trim_start();
    if trimmed.starts_with('{') {
        return Ok(arg.to_string());
    }
    std::fs::read_to_string(arg).map_err(|source| CliError::PayloadNotReadable {
        path: Path::new(arg).to_path_buf(),
        source,
    })
}

// ── Catalog construction ──────────────────────────────────────────────────────

/// Builtin catalog, extended by the configured service pack when present.
pub fn build_catalog(config: &AppConfig) -> CliResult<InMemoryCatalog> {
    let catalog = InMemoryCatalog::with_builtin().map_err(CliError::Core)?;

    if let Some(pack_dir) = &config.catalog.pack_dir {
        let loader = ServicePackLoader::new(pack_dir);
        let descriptors = loader
            .load_all()
            .map_err(|e| CliError::Core(e.into()))?;
        for descriptor in descriptors {
            catalog.insert(descriptor).map_err(CliError::Core)?;
        }
    }

    Ok(catalog)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── resolve_payload ───────────────────────────────────────────────────────

    #[test]
    fn inline_json_is_passed_through() {
        let payload = r#"{"backendPlatform": "NODE"}"#;
        assert_eq!(resolve_payload(payload).unwrap(), payload);
    }

    #[test]
    fn leading_whitespace_still_counts_as_inline() {
        let payload = "  {\"backendPlatform\": \"NODE\"}";
        assert_eq!(resolve_payload(payload).unwrap(), payload);
    }

    #[test]
    fn missing_file_is_a_payload_error() {
        assert!(matches!(
            resolve_payload("definitely-missing.json"),
            Err(CliError::PayloadNotReadable { .. })
        ));
    }

    #[test]
    fn file_payload_is_read_from_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("deploy.json");
        std::fs::write(&path, r#"{"backendPlatform": "NODE"}"#).unwrap();
        let content = resolve_payload(path.to_str().unwrap()).unwrap();
        assert!(content.contains("backendPlatform"));
    }

    // ── build_catalog ─────────────────────────────────────────────────────────

    #[test]
    fn catalog_without_pack_is_builtin_only() {
        let catalog = build_catalog(&AppConfig::default()).unwrap();
        assert!(!catalog.is_empty());
    }

    #[test]
    fn missing_pack_dir_is_an_error() {
        let mut config = AppConfig::default();
        config.catalog.pack_dir = Some("/absolutely/does/not/exist".into());
        assert!(build_catalog(&config).is_err());
    }

    #[test]
    fn pack_services_extend_the_builtin_catalog() {
        let dir = tempfile::TempDir::new().unwrap();
        let slot = dir.path().join("mysql");
        std::fs::create_dir_all(&slot).unwrap();
        std::fs::write(
            slot.join("service.toml"),
            r#"
[service]
name        = "mysql"
payload_key = "mysql"

[applicability]
platforms = ["node"]
"#,
        )
        .unwrap();
        std::fs::write(
            slot.join("instrumentation.js"),
            "module.exports = function(app, serviceManager) {};\n",
        )
        .unwrap();

        let mut config = AppConfig::default();
        config.catalog.pack_dir = Some(dir.path().to_path_buf());

        let catalog = build_catalog(&config).unwrap();
        use sprout_core::application::ports::ServiceCatalog;
        assert!(catalog.get("mysql").is_ok());
        assert!(catalog.get("mongodb").is_ok(), "builtin entries survive");
    }
}
