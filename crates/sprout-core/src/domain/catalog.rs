//! Service descriptor domain model.
//!
//! This module defines the catalog side of the generator: what a backing
//! service *is* and which fragments it contributes. Descriptors are the
//! central concept in sprout — the resolver selects them, the merger folds
//! their fragments into artifacts.
//!
//! ## Structure
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  ServiceDescriptor (Aggregate Root)                         │
//! │  ├── name / payload_key (identity)                          │
//! │  ├── Applicability (Value Object) - when it applies        │
//! │  ├── Vec<DependencyFragment>  → dependency manifest         │
//! │  ├── Vec<ConfigBinding>       → localdev config + mappings  │
//! │  ├── instrumentation (code-stub fragment) → service module  │
//! │  └── readme (doc-section fragment)        → docs file       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants (enforced by `validate()`)
//!
//! 1. `name` is non-empty kebab-case (lowercase, digits, `-`)
//! 2. `payload_key` is non-empty
//! 3. `applicability.platforms` is non-empty
//! 4. the instrumentation fragment is non-empty (every service ships a stub)
//! 5. no duplicate dependency names or config keys *within* one descriptor
//!
//! Cross-descriptor overlaps (two services declaring the same dependency or
//! config key) are a *catalog* concern, reported by [`validate_catalog`] as
//! warnings rather than hard errors: the merger copes with last-writer-wins,
//! but a shipped catalog is expected to be overlap-free.

use std::collections::BTreeMap;
use std::fmt;

use crate::domain::{
    error::DomainError,
    selection::{ApplicationType, Platform},
};

// ============================================================================
// Fragments
// ============================================================================

/// A dependency-entry fragment: one entry destined for the generated
/// dependency manifest (`package.json` `dependencies` object).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyFragment {
    /// Package name as it appears in the generated manifest.
    pub name: String,
    /// Version requirement string, copied verbatim.
    pub requirement: String,
}

impl DependencyFragment {
    pub fn new(name: impl Into<String>, requirement: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            requirement: requirement.into(),
        }
    }
}

/// A config-entry fragment: binds one local-dev config key to a value in the
/// caller's parameter bag.
///
/// `param_path` is a dotted path resolved against the service's parameters
/// (e.g. `"uri"`, or `"writer.userid"` for nested credentials).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigBinding {
    pub key: String,
    pub param_path: String,
}

impl ConfigBinding {
    pub fn new(key: impl Into<String>, param_path: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            param_path: param_path.into(),
        }
    }
}

// ============================================================================
// Applicability
// ============================================================================

/// Declarative rules for when a descriptor applies to a selection.
///
/// `platforms` is an allow-list and must be non-empty. `application_types`
/// uses the open-world convention of the selection model: `None` means
/// "any archetype, including none"; `Some(list)` requires the selection to
/// declare an archetype in the list — an absent archetype fails the check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applicability {
    pub platforms: Vec<Platform>,
    pub application_types: Option<Vec<ApplicationType>>,
}

impl Applicability {
    /// Applies on `platform` for any application type.
    pub fn platform(platform: Platform) -> Self {
        Self {
            platforms: vec![platform],
            application_types: None,
        }
    }

    /// Restrict to particular application types.
    pub fn with_application_types(mut self, kinds: Vec<ApplicationType>) -> Self {
        self.application_types = Some(kinds);
        self
    }

    /// Evaluate the predicate against a selection's context.
    pub fn allows(&self, platform: Platform, application_type: Option<ApplicationType>) -> bool {
        if !self.platforms.contains(&platform) {
            return false;
        }
        match &self.application_types {
            None => true,
            // A constrained descriptor needs a declared, matching archetype;
            // an absent archetype never satisfies the constraint.
            Some(allowed) => application_type.is_some_and(|kind| allowed.contains(&kind)),
        }
    }
}

// ============================================================================
// Descriptor aggregate
// ============================================================================

/// Catalog entry for one optional backing-service integration.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDescriptor {
    /// Unique kebab-case identifier; drives output file names
    /// (`service-<name>.js`, `service-<name>.md`) and resolution order.
    pub name: String,

    /// Key under which callers enable this service in the deployment payload
    /// (e.g. `"cloudObjectStorage"` for the `cloud-object-storage` service).
    pub payload_key: String,

    /// Short display name for CLI listings.
    pub display_name: String,

    /// Longer description for help text.
    pub description: String,

    /// Dependency-entry fragments merged into the manifest.
    pub dependencies: Vec<DependencyFragment>,

    /// Config-entry fragments merged into localdev config and mappings.
    pub config: Vec<ConfigBinding>,

    /// Code-stub fragment emitted verbatim as `server/services/service-<name>.js`.
    pub instrumentation: String,

    /// Doc-section fragment emitted verbatim as `docs/services/service-<name>.md`.
    pub readme: String,

    /// When this descriptor applies.
    pub applicability: Applicability,
}

impl ServiceDescriptor {
    /// Start the builder pattern for fluent construction.
    pub fn builder() -> ServiceDescriptorBuilder {
        ServiceDescriptorBuilder::default()
    }

    /// Validate all single-descriptor invariants.
    ///
    /// Catalog adapters must call this before accepting a descriptor.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.is_empty() {
            return Err(DomainError::InvalidDescriptor(
                "service name cannot be empty".into(),
            ));
        }
        if !self
            .name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(DomainError::InvalidDescriptor(format!(
                "service name '{}' must be kebab-case",
                self.name
            )));
        }
        if self.payload_key.is_empty() {
            return Err(DomainError::InvalidDescriptor(format!(
                "service '{}' has an empty payload key",
                self.name
            )));
        }
        if self.applicability.platforms.is_empty() {
            return Err(DomainError::InvalidDescriptor(format!(
                "service '{}' declares no platforms",
                self.name
            )));
        }
        if self.instrumentation.is_empty() {
            return Err(DomainError::InvalidDescriptor(format!(
                "service '{}' has no instrumentation fragment",
                self.name
            )));
        }

        let mut dep_names = std::collections::HashSet::new();
        for dep in &self.dependencies {
            if !dep_names.insert(dep.name.as_str()) {
                return Err(DomainError::InvalidDescriptor(format!(
                    "service '{}' declares dependency '{}' twice",
                    self.name, dep.name
                )));
            }
        }
        let mut config_keys = std::collections::HashSet::new();
        for binding in &self.config {
            if !config_keys.insert(binding.key.as_str()) {
                return Err(DomainError::InvalidDescriptor(format!(
                    "service '{}' declares config key '{}' twice",
                    self.name, binding.key
                )));
            }
        }

        Ok(())
    }

    /// Whether this descriptor applies in the given context.
    pub fn applies_to(
        &self,
        platform: Platform,
        application_type: Option<ApplicationType>,
    ) -> bool {
        self.applicability.allows(platform, application_type)
    }
}

/// Builder for constructing descriptors with validation at `build()`.
#[derive(Default)]
pub struct ServiceDescriptorBuilder {
    name: Option<String>,
    payload_key: Option<String>,
    display_name: Option<String>,
    description: String,
    dependencies: Vec<DependencyFragment>,
    config: Vec<ConfigBinding>,
    instrumentation: Option<String>,
    readme: String,
    applicability: Option<Applicability>,
}

impl ServiceDescriptorBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn payload_key(mut self, key: impl Into<String>) -> Self {
        self.payload_key = Some(key.into());
        self
    }

    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a dependency-entry fragment (accumulates).
    pub fn dependency(mut self, name: impl Into<String>, requirement: impl Into<String>) -> Self {
        self.dependencies.push(DependencyFragment::new(name, requirement));
        self
    }

    /// Add a config binding (accumulates).
    pub fn config_key(mut self, key: impl Into<String>, param_path: impl Into<String>) -> Self {
        self.config.push(ConfigBinding::new(key, param_path));
        self
    }

    pub fn instrumentation(mut self, source: impl Into<String>) -> Self {
        self.instrumentation = Some(source.into());
        self
    }

    pub fn readme(mut self, content: impl Into<String>) -> Self {
        self.readme = content.into();
        self
    }

    pub fn applicability(mut self, applicability: Applicability) -> Self {
        self.applicability = Some(applicability);
        self
    }

    /// Consume builder and construct a validated `ServiceDescriptor`.
    pub fn build(self) -> Result<ServiceDescriptor, DomainError> {
        let name = self
            .name
            .ok_or(DomainError::MissingRequiredField { field: "name" })?;
        let descriptor = ServiceDescriptor {
            payload_key: self
                .payload_key
                .ok_or(DomainError::MissingRequiredField {
                    field: "payload_key",
                })?,
            display_name: self.display_name.unwrap_or_else(|| name.clone()),
            description: self.description,
            dependencies: self.dependencies,
            config: self.config,
            instrumentation: self
                .instrumentation
                .ok_or(DomainError::MissingRequiredField {
                    field: "instrumentation",
                })?,
            readme: self.readme,
            applicability: self
                .applicability
                .ok_or(DomainError::MissingRequiredField {
                    field: "applicability",
                })?,
            name,
        };
        descriptor.validate()?;
        Ok(descriptor)
    }
}

// ============================================================================
// Base bundle
// ============================================================================

/// The platform-wide template files every generated project starts from,
/// independent of which services are enabled.
///
/// `package_manifest` may contain `{{PROJECT_NAME}}` / `{{PROJECT_NAME_KEBAB}}`
/// placeholders; the remaining files are literal.
#[derive(Debug, Clone)]
pub struct BaseBundle {
    /// `package.json` template the merger folds dependencies into.
    pub package_manifest: String,
    /// Root `.gitignore`; must reference the local-dev config file.
    pub gitignore: String,
    /// `server/server.js` skeleton.
    pub server: String,
    /// `server/services/service-manager.js` registry.
    pub service_manager: String,
}

// ============================================================================
// Catalog validation
// ============================================================================

/// A catalog integrity finding.
///
/// Warnings, not errors: generation proceeds (last-writer-wins), but a
/// shipped catalog producing any of these is defective.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogWarning {
    /// Two descriptors declare the same manifest dependency.
    DuplicateDependency {
        dependency: String,
        first: String,
        second: String,
    },
    /// Two descriptors declare the same local-dev config key.
    DuplicateConfigKey {
        key: String,
        first: String,
        second: String,
    },
    /// Two descriptors share a name or payload key.
    DuplicateIdentity { identity: String },
}

impl fmt::Display for CatalogWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateDependency {
                dependency,
                first,
                second,
            } => write!(
                f,
                "dependency '{dependency}' is declared by both '{first}' and '{second}'"
            ),
            Self::DuplicateConfigKey { key, first, second } => write!(
                f,
                "config key '{key}' is declared by both '{first}' and '{second}'"
            ),
            Self::DuplicateIdentity { identity } => {
                write!(f, "identity '{identity}' is used by more than one service")
            }
        }
    }
}

/// Check a catalog for cross-descriptor overlaps.
///
/// Descriptors are examined in lexicographic name order so the produced
/// warnings are deterministic regardless of input order.
pub fn validate_catalog(descriptors: &[ServiceDescriptor]) -> Vec<CatalogWarning> {
    let mut sorted: Vec<&ServiceDescriptor> = descriptors.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));

    let mut warnings = Vec::new();
    let mut names: BTreeMap<&str, &str> = BTreeMap::new();
    let mut dependency_owner: BTreeMap<&str, &str> = BTreeMap::new();
    let mut config_owner: BTreeMap<&str, &str> = BTreeMap::new();

    for descriptor in sorted {
        let name_taken = names
            .insert(descriptor.name.as_str(), descriptor.name.as_str())
            .is_some();
        // A payload key equal to the descriptor's own name is fine; one
        // claimed by a *different* descriptor is not.
        let key_taken = names
            .insert(descriptor.payload_key.as_str(), descriptor.name.as_str())
            .is_some_and(|owner| owner != descriptor.name);
        if name_taken || key_taken {
            warnings.push(CatalogWarning::DuplicateIdentity {
                identity: descriptor.name.clone(),
            });
        }

        for dep in &descriptor.dependencies {
            match dependency_owner.insert(dep.name.as_str(), descriptor.name.as_str()) {
                Some(first) if first != descriptor.name => {
                    warnings.push(CatalogWarning::DuplicateDependency {
                        dependency: dep.name.clone(),
                        first: first.to_string(),
                        second: descriptor.name.clone(),
                    });
                }
                _ => {}
            }
        }
        for binding in &descriptor.config {
            match config_owner.insert(binding.key.as_str(), descriptor.name.as_str()) {
                Some(first) if first != descriptor.name => {
                    warnings.push(CatalogWarning::DuplicateConfigKey {
                        key: binding.key.clone(),
                        first: first.to_string(),
                        second: descriptor.name.clone(),
                    });
                }
                _ => {}
            }
        }
    }

    warnings
}

// ── Tests ─────────────────────────────────────────────────────────────────────
