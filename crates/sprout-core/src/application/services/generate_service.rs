//! Generate Service - main application orchestrator.
//!
//! This service coordinates the entire generation workflow:
//! 1. Validate the selection
//! 2. Resolve enabled descriptors against the catalog
//! 3. Merge fragments into the output tree
//! 4. Write artifacts through the filesystem port
//!
//! It implements the driving port (incoming) and uses driven ports (outgoing).

use std::path::Path;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    application::ports::{Filesystem, ServiceCatalog},
    domain::{DomainValidator as validator, SelectionInput, merger, resolver},
    error::{SproutError, SproutResult},
};

/// Summary of one completed generation run, for display purposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    /// Unique id of this run (appears in log output).
    pub run_id: Uuid,
    /// Names of the services that resolved, in resolution order.
    pub services: Vec<String>,
    /// Number of artifacts written.
    pub files_written: usize,
    /// Merge-time collision warnings (catalog defects), rendered.
    pub warnings: Vec<String>,
}

/// Main generation service.
///
/// Orchestrates the resolve → merge → write pipeline. Resolver and merger
/// are pure; all side effects go through the `Filesystem` port.
pub struct GenerateService {
    catalog: Box<dyn ServiceCatalog>,
    filesystem: Box<dyn Filesystem>,
}

impl GenerateService {
    /// Create a new generate service with the given adapters.
    pub fn new(catalog: Box<dyn ServiceCatalog>, filesystem: Box<dyn Filesystem>) -> Self {
        Self {
            catalog,
            filesystem,
        }
    }

    /// Generate a project tree for `selection` under `output_root`.
    ///
    /// Existing artifacts at the destination are overwritten (full
    /// regeneration semantics — there is no incremental update). A write
    /// failure aborts the run immediately; artifacts already written stay in
    /// place and the caller owns cleanup of the output directory.
    #[instrument(
        skip_all,
        fields(
            selection = %selection,
            output_root = %output_root.as_ref().display()
        )
    )]
    pub fn generate(
        &self,
        selection: &SelectionInput,
        output_root: impl AsRef<Path>,
    ) -> SproutResult<GenerationReport> {
        let run_id = Uuid::new_v4();
        let output_root = output_root.as_ref();
        info!(%run_id, "Generation started");

        // 1. Validate selection
        validator::validate_selection(selection).map_err(SproutError::Domain)?;

        // 2. Load catalog and surface integrity findings early
        let descriptors = self.catalog.all()?;
        for warning in validator::validate_catalog(&descriptors) {
            warn!(%warning, "catalog integrity");
        }

        // 3. Resolve
        let resolved = resolver::resolve(selection, &descriptors);
        info!(
            services = ?resolved.iter().map(|d| d.name.as_str()).collect::<Vec<_>>(),
            "Selection resolved"
        );

        // 4. Merge
        let bundle = self.catalog.base_bundle()?;
        let outcome = merger::merge(selection, &resolved, &bundle, output_root)
            .map_err(SproutError::Domain)?;
        for warning in &outcome.warnings {
            warn!(%warning, "fragment collision");
        }

        // 5. Write
        let files_written = self.write_tree(&outcome.tree)?;
        info!(%run_id, files_written, "Generation completed");

        Ok(GenerationReport {
            run_id,
            services: resolved.iter().map(|d| d.name.clone()).collect(),
            files_written,
            warnings: outcome.warnings.iter().map(ToString::to_string).collect(),
        })
    }

    /// Dry-run variant: resolve and merge but write nothing.
    pub fn plan(
        &self,
        selection: &SelectionInput,
        output_root: impl AsRef<Path>,
    ) -> SproutResult<crate::domain::OutputTree> {
        validator::validate_selection(selection).map_err(SproutError::Domain)?;
        let descriptors = self.catalog.all()?;
        let resolved = resolver::resolve(selection, &descriptors);
        let bundle = self.catalog.base_bundle()?;
        let outcome = merger::merge(selection, &resolved, &bundle, output_root.as_ref())
            .map_err(SproutError::Domain)?;
        Ok(outcome.tree)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    /// Write every artifact in the tree. Fatal on the first failure: the
    /// error names the artifact so diagnosis never requires guessing.
    fn write_tree(&self, tree: &crate::domain::OutputTree) -> SproutResult<usize> {
        self.filesystem.create_dir_all(tree.root())?;

        let mut written = 0;
        for file in tree.files() {
            let destination = tree.root().join(&file.path);
            if let Some(parent) = destination.parent() {
                self.filesystem.create_dir_all(parent)?;
            }
            self.filesystem
                .write_file(&destination, &file.content)
                .map_err(|e| {
                    warn!(artifact = %file.path.display(), error = %e, "write failed, aborting run");
                    e
                })?;
            written += 1;
        }

        Ok(written)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ApplicationError;
    use crate::application::ports::{MockFilesystem, MockServiceCatalog};
    use crate::domain::{Applicability, BaseBundle, Platform, ServiceDescriptor, ServiceParams};
    use mockall::predicate::always;

    fn bundle() -> BaseBundle {
        BaseBundle {
            package_manifest: r#"{"name": "{{PROJECT_NAME_KEBAB}}", "dependencies": {}}"#.into(),
            gitignore: "server/localdev-config.json\n".into(),
            server: "// server\n".into(),
            service_manager: "// manager\n".into(),
        }
    }

    fn mongodb() -> ServiceDescriptor {
        ServiceDescriptor::builder()
            .name("mongodb")
            .payload_key("mongodb")
            .dependency("mongodb", "^3.1.10")
            .config_key("mongodb_uri", "uri")
            .instrumentation("// mongo\n")
            .applicability(Applicability::platform(Platform::Node))
            .build()
            .unwrap()
    }

    fn selection() -> SelectionInput {
        SelectionInput::builder()
            .platform(Platform::Node)
            .project_name("demo")
            .service("mongodb", ServiceParams::new().with("uri", "mongodb://x"))
            .build()
            .unwrap()
    }

    fn catalog_mock() -> MockServiceCatalog {
        let mut catalog = MockServiceCatalog::new();
        catalog.expect_all().returning(|| Ok(vec![mongodb()]));
        catalog.expect_base_bundle().returning(|| Ok(bundle()));
        catalog
    }

    #[test]
    fn generate_writes_every_artifact_and_reports() {
        let mut fs = MockFilesystem::new();
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file()
            .with(always(), always())
            .returning(|_, _| Ok(()));

        let service = GenerateService::new(Box::new(catalog_mock()), Box::new(fs));
        let report = service.generate(&selection(), "/out").unwrap();

        assert_eq!(report.services, vec!["mongodb"]);
        // package.json, .gitignore, server.js, mappings, index.js,
        // service-manager, instrumentation, localdev, doc
        assert_eq!(report.files_written, 9);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn write_failure_aborts_the_run() {
        let mut fs = MockFilesystem::new();
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file().returning(|path, _| {
            Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "disk full".into(),
            }
            .into())
        });

        let service = GenerateService::new(Box::new(catalog_mock()), Box::new(fs));
        let result = service.generate(&selection(), "/out");
        assert!(matches!(
            result,
            Err(SproutError::Application(
                ApplicationError::FilesystemError { .. }
            ))
        ));
    }

    #[test]
    fn plan_touches_no_filesystem() {
        // No expectations set: any filesystem call would panic the mock.
        let fs = MockFilesystem::new();
        let service = GenerateService::new(Box::new(catalog_mock()), Box::new(fs));
        let tree = service.plan(&selection(), "/out").unwrap();
        assert_eq!(tree.file_count(), 9);
    }
}
