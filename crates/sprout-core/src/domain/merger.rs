//! Fragment merger.
//!
//! Folds the fragments of the resolved descriptors into concrete artifacts
//! and assembles the full [`OutputTree`] for one generation run. Like the
//! resolver, the merger is pure: same selection, same resolved set, same
//! base bundle → byte-identical tree.
//!
//! ## Destination artifacts
//!
//! | Artifact | Path | Fragments merged |
//! |----------|------|------------------|
//! | Dependency manifest | `package.json` | dependency entries |
//! | Local-dev config | `server/localdev-config.json` | config bindings (absent when none) |
//! | Config mappings | `server/config/mappings.json` | config bindings (always present) |
//! | Bootstrap index | `server/services/index.js` | one require line per service |
//! | Instrumentation | `server/services/service-<name>.js` | code stub, verbatim |
//! | Documentation | `docs/services/service-<name>.md` | doc section, verbatim |
//!
//! ## Collisions
//!
//! Two descriptors declaring the same manifest dependency or config key is a
//! catalog defect (see `catalog::validate_catalog`). The merger still copes:
//! last-writer-in-resolution-order wins and a [`MergeWarning`] is returned so
//! the application layer can surface it — never a silent override, never a
//! crash.
//!
//! JSON artifacts serialize through serde_json's default (sorted) map, pretty
//! printed with a trailing newline, so output bytes do not depend on
//! declaration order.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde_json::{Map, Value, json};

use crate::domain::{
    catalog::{BaseBundle, ServiceDescriptor},
    error::DomainError,
    naming::to_kebab_case,
    output_tree::OutputTree,
    selection::SelectionInput,
};

// ── Destination paths ─────────────────────────────────────────────────────────

pub const PACKAGE_MANIFEST: &str = "package.json";
pub const GITIGNORE: &str = ".gitignore";
pub const SERVER: &str = "server/server.js";
pub const MAPPINGS: &str = "server/config/mappings.json";
pub const BOOTSTRAP_INDEX: &str = "server/services/index.js";
pub const SERVICE_MANAGER: &str = "server/services/service-manager.js";
pub const LOCALDEV_CONFIG: &str = "server/localdev-config.json";

/// Instrumentation destination for one service.
pub fn instrumentation_path(name: &str) -> String {
    format!("server/services/service-{name}.js")
}

/// Documentation destination for one service.
pub fn doc_path(name: &str) -> String {
    format!("docs/services/service-{name}.md")
}

// ── Warnings ──────────────────────────────────────────────────────────────────

/// A collision observed while merging fragments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeWarning {
    /// Two resolved descriptors contributed the same manifest dependency;
    /// `kept` (later in resolution order) overwrote `overwritten`.
    DependencyCollision {
        dependency: String,
        kept: String,
        overwritten: String,
    },
    /// Two resolved descriptors contributed the same local-dev config key.
    ConfigKeyCollision {
        key: String,
        kept: String,
        overwritten: String,
    },
}

impl fmt::Display for MergeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DependencyCollision {
                dependency,
                kept,
                overwritten,
            } => write!(
                f,
                "dependency '{dependency}': entry from '{overwritten}' overwritten by '{kept}'"
            ),
            Self::ConfigKeyCollision {
                key,
                kept,
                overwritten,
            } => write!(
                f,
                "config key '{key}': value from '{overwritten}' overwritten by '{kept}'"
            ),
        }
    }
}

/// Result of a merge: the assembled tree plus any collision warnings.
#[derive(Debug)]
pub struct MergeOutcome {
    pub tree: OutputTree,
    pub warnings: Vec<MergeWarning>,
}

// ── Merge entry point ─────────────────────────────────────────────────────────

/// Merge the resolved descriptors' fragments into a complete output tree.
///
/// `resolved` must already be in resolution order (see `resolver::resolve`).
///
/// # Errors
///
/// `InvalidBaseBundle` if the base package manifest is not a JSON object —
/// a catalog-adapter defect, not a caller mistake.
pub fn merge(
    selection: &SelectionInput,
    resolved: &[&ServiceDescriptor],
    bundle: &BaseBundle,
    output_root: &Path,
) -> Result<MergeOutcome, DomainError> {
    let mut warnings = Vec::new();
    let mut tree = OutputTree::new(output_root);

    tree.add_file(
        PACKAGE_MANIFEST,
        merge_manifest(selection, resolved, bundle, &mut warnings)?,
    );
    tree.add_file(GITIGNORE, bundle.gitignore.clone());
    tree.add_file(SERVER, render_placeholders(&bundle.server, selection));
    tree.add_file(MAPPINGS, merge_mappings(resolved));
    tree.add_file(BOOTSTRAP_INDEX, merge_bootstrap_index(resolved));
    tree.add_file(SERVICE_MANAGER, bundle.service_manager.clone());

    for descriptor in resolved {
        tree.add_file(
            instrumentation_path(&descriptor.name),
            descriptor.instrumentation.clone(),
        );
    }

    // Absent entirely when no resolved descriptor contributes a key — an
    // empty config file and a missing one are different contracts.
    if let Some(localdev) = merge_localdev(selection, resolved, &mut warnings) {
        tree.add_file(LOCALDEV_CONFIG, localdev);
    }

    for descriptor in resolved {
        tree.add_file(doc_path(&descriptor.name), descriptor.readme.clone());
    }

    tree.validate()?;
    Ok(MergeOutcome { tree, warnings })
}

// ── Per-artifact merges ───────────────────────────────────────────────────────

/// Union the resolved descriptors' dependency entries into the base manifest.
fn merge_manifest(
    selection: &SelectionInput,
    resolved: &[&ServiceDescriptor],
    bundle: &BaseBundle,
    warnings: &mut Vec<MergeWarning>,
) -> Result<String, DomainError> {
    let rendered = render_placeholders(&bundle.package_manifest, selection);
    let mut manifest: Value = serde_json::from_str(&rendered)
        .map_err(|e| DomainError::InvalidBaseBundle(format!("package manifest: {e}")))?;
    let root = manifest
        .as_object_mut()
        .ok_or_else(|| DomainError::InvalidBaseBundle("package manifest must be an object".into()))?;

    let dependencies = root
        .entry("dependencies")
        .or_insert_with(|| Value::Object(Map::new()));
    let dependencies = dependencies.as_object_mut().ok_or_else(|| {
        DomainError::InvalidBaseBundle("'dependencies' must be an object".into())
    })?;

    // Which descriptor last wrote each entry; the base manifest owns its own.
    let mut owners: BTreeMap<String, String> = BTreeMap::new();

    for descriptor in resolved {
        for dep in &descriptor.dependencies {
            if let Some(previous) = owners.insert(dep.name.clone(), descriptor.name.clone()) {
                warnings.push(MergeWarning::DependencyCollision {
                    dependency: dep.name.clone(),
                    kept: descriptor.name.clone(),
                    overwritten: previous,
                });
            }
            dependencies.insert(dep.name.clone(), Value::String(dep.requirement.clone()));
        }
    }

    Ok(to_pretty_json(&manifest))
}

/// Key-wise union of the resolved descriptors' config bindings, with values
/// taken from the caller's parameter bags. `None` when nothing contributes.
fn merge_localdev(
    selection: &SelectionInput,
    resolved: &[&ServiceDescriptor],
    warnings: &mut Vec<MergeWarning>,
) -> Option<String> {
    let mut entries: Map<String, Value> = Map::new();
    let mut owners: BTreeMap<String, String> = BTreeMap::new();

    for descriptor in resolved {
        let params = selection.params(&descriptor.payload_key);
        for binding in &descriptor.config {
            // Missing caller parameter → empty string, key still present.
            let value = params
                .and_then(|bag| bag.lookup(&binding.param_path))
                .cloned()
                .unwrap_or_else(|| Value::String(String::new()));

            if let Some(previous) = owners.insert(binding.key.clone(), descriptor.name.clone()) {
                warnings.push(MergeWarning::ConfigKeyCollision {
                    key: binding.key.clone(),
                    kept: descriptor.name.clone(),
                    overwritten: previous,
                });
            }
            entries.insert(binding.key.clone(), value);
        }
    }

    if entries.is_empty() {
        return None;
    }
    Some(to_pretty_json(&Value::Object(entries)))
}

/// One search-pattern entry per merged config binding. Always emitted; an
/// empty object when no service contributes.
fn merge_mappings(resolved: &[&ServiceDescriptor]) -> String {
    let mut entries: Map<String, Value> = Map::new();

    for descriptor in resolved {
        for binding in &descriptor.config {
            entries.insert(
                binding.key.clone(),
                json!({
                    "searchPatterns": [
                        format!(
                            "cloudfoundry:$['{}'].{}",
                            descriptor.payload_key, binding.param_path
                        ),
                        format!("env:{}", binding.key),
                        format!("file:/server/localdev-config.json:$.{}", binding.key),
                    ]
                }),
            );
        }
    }

    to_pretty_json(&Value::Object(entries))
}

/// Base bootstrap skeleton plus one require line per resolved descriptor,
/// in resolution order.
fn merge_bootstrap_index(resolved: &[&ServiceDescriptor]) -> String {
    let mut index = String::from("const serviceManager = require('./service-manager');\n\n");
    index.push_str("module.exports = function(app) {\n");
    for descriptor in resolved {
        index.push_str(&format!(
            "\trequire('./service-{}')(app, serviceManager);\n",
            descriptor.name
        ));
    }
    index.push_str("};\n");
    index
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Substitute project-name placeholders in a base template.
fn render_placeholders(template: &str, selection: &SelectionInput) -> String {
    template
        .replace("{{PROJECT_NAME_KEBAB}}", &to_kebab_case(selection.project_name()))
        .replace("{{PROJECT_NAME}}", selection.project_name())
}

/// Pretty-print with serde_json's sorted maps and a trailing newline.
fn to_pretty_json(value: &Value) -> String {
    let mut out = serde_json::to_string_pretty(value).expect("JSON value is always serializable");
    out.push('\n');
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
