//! Filesystem-based service-pack loader.
//!
//! Discovers and parses `service.toml` manifests from a directory tree,
//! converting them into domain [`ServiceDescriptor`] objects that extend the
//! built-in catalog.
//!
//! # Directory layout expected
//!
//! ```text
//! services/
//! ├── mysql/
//! │   ├── service.toml         ← manifest (required)
//! │   ├── instrumentation.js   ← code-stub fragment (required)
//! │   └── README.md            ← doc fragment (optional)
//! └── databases/
//!     └── etcd/                ← nesting for grouping is fine
//!         ├── service.toml
//!         └── instrumentation.js
//! ```
//!
//! # `service.toml` format
//!
//! ```toml
//! [service]
//! name         = "mysql"        # unique kebab-case identifier
//! payload_key  = "mysql"        # key callers enable in the deployment payload
//! display_name = "MySQL"        # optional
//! description  = "..."          # optional
//!
//! [applicability]
//! platforms         = ["node"]  # node | python | swift | java
//! application_types = ["web"]   # optional; web | ms
//!
//! [[dependency]]
//! name    = "mysql2"
//! version = "^1.6.4"
//!
//! [[config]]
//! key   = "mysql_uri"           # local-dev config key
//! param = "uri"                 # dotted path into the caller's parameter bag
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use sprout_core::domain::{
    Applicability, ApplicationType, DomainError, Platform, ServiceDescriptor,
};

// ── Manifest types ────────────────────────────────────────────────────────────

/// Deserialised representation of a `service.toml` file.
///
/// All fields map 1-to-1 to TOML sections; see the module-level docs for the
/// full format.
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceManifest {
    pub service: ServiceSection,
    pub applicability: ApplicabilitySection,
    #[serde(default, rename = "dependency")]
    pub dependencies: Vec<DependencyEntry>,
    #[serde(default, rename = "config")]
    pub config: Vec<ConfigEntry>,
}

/// `[service]` section — identity of the service.
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceSection {
    pub name: String,
    pub payload_key: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
}

/// `[applicability]` section — when the service applies.
#[derive(Debug, Deserialize, Clone)]
pub struct ApplicabilitySection {
    pub platforms: Vec<String>,
    pub application_types: Option<Vec<String>>,
}

/// One entry under `[[dependency]]`.
#[derive(Debug, Deserialize, Clone)]
pub struct DependencyEntry {
    pub name: String,
    pub version: String,
}

/// One entry under `[[config]]`.
#[derive(Debug, Deserialize, Clone)]
pub struct ConfigEntry {
    pub key: String,
    pub param: String,
}

// ── Loader ────────────────────────────────────────────────────────────────────

/// Loads [`ServiceDescriptor`] objects from a directory tree of
/// `service.toml` manifests.
///
/// Directories whose manifest is missing required files or is invalid emit a
/// `WARN` log and are skipped — they do not prevent other services from
/// loading.
pub struct ServicePackLoader {
    pack_dir: PathBuf,
}

impl ServicePackLoader {
    /// Create a loader pointed at `pack_dir`.
    ///
    /// The directory does not need to exist yet; [`Self::load_all`] will
    /// return an error if it is missing when called.
    pub fn new(pack_dir: impl Into<PathBuf>) -> Self {
        Self {
            pack_dir: pack_dir.into(),
        }
    }

    /// Load every valid service found under the pack directory.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidDescriptor`] if the pack directory does
    /// not exist or cannot be walked. Individual service directories that
    /// fail to parse are **skipped with a `WARN` log** rather than failing
    /// the whole batch.
    #[instrument(skip(self), fields(dir = %self.pack_dir.display()))]
    pub fn load_all(&self) -> Result<Vec<ServiceDescriptor>, DomainError> {
        if !self.pack_dir.exists() {
            return Err(DomainError::InvalidDescriptor(format!(
                "service pack directory not found: {}",
                self.pack_dir.display()
            )));
        }

        let mut descriptors = Vec::new();

        for entry in WalkDir::new(&self.pack_dir) {
            let entry = entry.map_err(|e| {
                DomainError::InvalidDescriptor(format!("directory walk error: {e}"))
            })?;
            if entry.file_type().is_file()
                && entry.file_name() == std::ffi::OsStr::new("service.toml")
            {
                let service_dir = entry
                    .path()
                    .parent()
                    .expect("service.toml always has a parent directory");
                match self.load_service_from_dir(service_dir) {
                    Ok(descriptor) => {
                        debug!(name = %descriptor.name, "loaded service");
                        descriptors.push(descriptor);
                    }
                    Err(e) => {
                        // One bad service must not block all others.
                        warn!(
                            dir = %service_dir.display(),
                            error = %e,
                            "skipping service directory due to load error"
                        );
                    }
                }
            }
        }

        debug!(count = descriptors.len(), "finished loading service pack");
        Ok(descriptors)
    }

    /// Load a single service from one directory.
    fn load_service_from_dir(&self, dir: &Path) -> Result<ServiceDescriptor, DomainError> {
        let manifest_path = dir.join("service.toml");
        let raw = fs::read_to_string(&manifest_path).map_err(|e| {
            DomainError::InvalidDescriptor(format!(
                "failed to read '{}': {e}",
                manifest_path.display()
            ))
        })?;

        let manifest: ServiceManifest = toml::from_str(&raw).map_err(|e| {
            DomainError::InvalidDescriptor(format!(
                "failed to parse '{}': {e}",
                manifest_path.display()
            ))
        })?;

        let instrumentation_path = dir.join("instrumentation.js");
        let instrumentation = fs::read_to_string(&instrumentation_path).map_err(|e| {
            DomainError::InvalidDescriptor(format!(
                "failed to read '{}': {e}",
                instrumentation_path.display()
            ))
        })?;

        // Docs are optional; an absent README yields an empty doc fragment.
        let readme = fs::read_to_string(dir.join("README.md")).unwrap_or_default();

        let mut builder = ServiceDescriptor::builder()
            .name(&manifest.service.name)
            .payload_key(&manifest.service.payload_key)
            .display_name(
                manifest
                    .service
                    .display_name
                    .unwrap_or_else(|| manifest.service.name.clone()),
            )
            .description(manifest.service.description.unwrap_or_default())
            .instrumentation(instrumentation)
            .readme(readme)
            .applicability(parse_applicability(&manifest.applicability)?);

        for dep in &manifest.dependencies {
            builder = builder.dependency(&dep.name, &dep.version);
        }
        for entry in &manifest.config {
            builder = builder.config_key(&entry.key, &entry.param);
        }

        builder.build()
    }
}

// ── Free parsing functions ────────────────────────────────────────────────────
// These are `fn` rather than methods because they don't need `&self` and are
// easier to unit-test in isolation.

/// Convert the `[applicability]` section into a domain [`Applicability`].
pub fn parse_applicability(section: &ApplicabilitySection) -> Result<Applicability, DomainError> {
    let mut platforms = Vec::with_capacity(section.platforms.len());
    for token in &section.platforms {
        platforms.push(Platform::parse(token)?);
    }
    if platforms.is_empty() {
        return Err(DomainError::InvalidDescriptor(
            "applicability must declare at least one platform".into(),
        ));
    }

    let application_types = match &section.application_types {
        None => None,
        Some(tokens) => {
            let mut kinds = Vec::with_capacity(tokens.len());
            for token in tokens {
                kinds.push(ApplicationType::parse(token)?);
            }
            Some(kinds)
        }
    };

    Ok(Applicability {
        platforms,
        application_types,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MINIMAL_MANIFEST: &str = r#"
[service]
name        = "mysql"
payload_key = "mysql"

[applicability]
platforms = ["node"]

[[dependency]]
name    = "mysql2"
version = "^1.6.4"

[[config]]
key   = "mysql_uri"
param = "uri"
"#;

    fn seed_service(root: &Path, slot: &str, manifest: &str, with_instrumentation: bool) {
        let dir = root.join(slot);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("service.toml"), manifest).unwrap();
        if with_instrumentation {
            fs::write(
                dir.join("instrumentation.js"),
                "module.exports = function(app, serviceManager) {};\n",
            )
            .unwrap();
        }
    }

    #[test]
    fn load_all_returns_error_for_missing_dir() {
        let loader = ServicePackLoader::new("/absolutely/does/not/exist");
        assert!(matches!(
            loader.load_all(),
            Err(DomainError::InvalidDescriptor(_))
        ));
    }

    #[test]
    fn loads_a_full_manifest() {
        let temp = TempDir::new().unwrap();
        seed_service(temp.path(), "mysql", MINIMAL_MANIFEST, true);
        fs::write(temp.path().join("mysql/README.md"), "# MySQL\n").unwrap();

        let descriptors = ServicePackLoader::new(temp.path()).load_all().unwrap();
        assert_eq!(descriptors.len(), 1);

        let mysql = &descriptors[0];
        assert_eq!(mysql.name, "mysql");
        assert_eq!(mysql.payload_key, "mysql");
        assert_eq!(mysql.dependencies.len(), 1);
        assert_eq!(mysql.dependencies[0].name, "mysql2");
        assert_eq!(mysql.config[0].key, "mysql_uri");
        assert_eq!(mysql.readme, "# MySQL\n");
    }

    #[test]
    fn nested_service_directories_are_discovered() {
        let temp = TempDir::new().unwrap();
        seed_service(temp.path(), "databases/mysql", MINIMAL_MANIFEST, true);

        let descriptors = ServicePackLoader::new(temp.path()).load_all().unwrap();
        assert_eq!(descriptors.len(), 1);
    }

    #[test]
    fn missing_instrumentation_skips_service_but_not_batch() {
        let temp = TempDir::new().unwrap();
        seed_service(temp.path(), "broken", MINIMAL_MANIFEST, false);

        let good = r#"
[service]
name        = "etcd"
payload_key = "etcd"

[applicability]
platforms = ["node"]
"#;
        seed_service(temp.path(), "etcd", good, true);

        let descriptors = ServicePackLoader::new(temp.path()).load_all().unwrap();
        assert_eq!(descriptors.len(), 1, "broken service should be skipped");
        assert_eq!(descriptors[0].name, "etcd");
    }

    #[test]
    fn malformed_manifest_is_skipped() {
        let temp = TempDir::new().unwrap();
        seed_service(temp.path(), "bad", "this is not toml [", true);

        let descriptors = ServicePackLoader::new(temp.path()).load_all().unwrap();
        assert!(descriptors.is_empty());
    }

    #[test]
    fn missing_readme_defaults_to_empty_doc_fragment() {
        let temp = TempDir::new().unwrap();
        seed_service(temp.path(), "mysql", MINIMAL_MANIFEST, true);

        let descriptors = ServicePackLoader::new(temp.path()).load_all().unwrap();
        assert!(descriptors[0].readme.is_empty());
    }

    // ── parse_applicability ───────────────────────────────────────────────────

    #[test]
    fn parse_applicability_accepts_known_tokens() {
        let section = ApplicabilitySection {
            platforms: vec!["node".into(), "JAVA".into()],
            application_types: Some(vec!["web".into()]),
        };
        let applicability = parse_applicability(&section).unwrap();
        assert_eq!(applicability.platforms, vec![Platform::Node, Platform::Java]);
        assert_eq!(
            applicability.application_types,
            Some(vec![ApplicationType::Web])
        );
    }

    #[test]
    fn parse_applicability_rejects_unknown_platform() {
        let section = ApplicabilitySection {
            platforms: vec!["cobol".into()],
            application_types: None,
        };
        assert!(parse_applicability(&section).is_err());
    }

    #[test]
    fn parse_applicability_rejects_empty_platform_list() {
        let section = ApplicabilitySection {
            platforms: vec![],
            application_types: None,
        };
        assert!(parse_applicability(&section).is_err());
    }
}
