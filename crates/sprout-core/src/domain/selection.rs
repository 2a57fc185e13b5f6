//! The `SelectionInput` aggregate root and its typestate builder.
//!
//! A `SelectionInput` is the fully-resolved, validated description of one
//! generation run: which platform to target, what kind of application is
//! being built, and which backing services the caller enabled together with
//! their connection parameters. Once a `SelectionInput` exists it is
//! guaranteed consistent.
//!
//! # Typestate builder
//!
//! The builder uses two phantom marker types (`NoPlatform` / `HasPlatform`)
//! to enforce at *compile time* that a platform is set before any other
//! field. Runtime validation (`validate`) is still called at `build()` to
//! catch invariants that cannot be expressed in the type system.
//!
//! # Payload parsing
//!
//! Callers typically supply two JSON payloads (see [`SelectionInput::from_payloads`]):
//! a *deployment* payload naming the platform and per-service credentials,
//! and an optional *application* payload naming the application archetype.
//! Unknown keys in either payload are ignored for forward compatibility;
//! unparseable payloads are fatal before any file is written.
//!
//! # Domain purity
//!
//! This module must not import `tracing`. Observability is the responsibility
//! of the application and CLI layers, not the domain.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use serde_json::Value;

use crate::domain::error::DomainError;

// ── Value objects ─────────────────────────────────────────────────────────────

/// Target runtime platform of the generated project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Node,
    Python,
    Swift,
    Java,
}

impl Platform {
    /// Parse the platform token used in deployment payloads (e.g. `"NODE"`).
    ///
    /// Matching is case-insensitive; unknown tokens are an error rather than
    /// a silent default, since every fragment bundle is platform-specific.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s.to_ascii_uppercase().as_str() {
            "NODE" => Ok(Self::Node),
            "PYTHON" => Ok(Self::Python),
            "SWIFT" => Ok(Self::Swift),
            "JAVA" => Ok(Self::Java),
            _ => Err(DomainError::UnsupportedPlatform {
                platform: s.to_string(),
            }),
        }
    }

    /// The canonical payload token for this platform.
    pub const fn as_token(&self) -> &'static str {
        match self {
            Self::Node => "NODE",
            Self::Python => "PYTHON",
            Self::Swift => "SWIFT",
            Self::Java => "JAVA",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Node => "node",
            Self::Python => "python",
            Self::Swift => "swift",
            Self::Java => "java",
        };
        write!(f, "{s}")
    }
}

/// Application archetype of the generated project.
///
/// Some services are only meaningful for particular archetypes: the identity
/// instrumentation, for instance, applies to web applications only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApplicationType {
    Web,
    Microservice,
}

impl ApplicationType {
    /// Parse the archetype token used in application payloads (`"WEB"`, `"MS"`).
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s.to_ascii_uppercase().as_str() {
            "WEB" => Ok(Self::Web),
            "MS" => Ok(Self::Microservice),
            _ => Err(DomainError::UnknownApplicationType {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ApplicationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Web => write!(f, "web"),
            Self::Microservice => write!(f, "microservice"),
        }
    }
}

// ── Service parameters ────────────────────────────────────────────────────────

/// The caller-supplied parameter bag for one enabled service.
///
/// Values are opaque JSON supplied by the caller and substituted verbatim
/// into generated artifacts. A `BTreeMap` keeps iteration deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceParams(BTreeMap<String, Value>);

impl ServiceParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fluent insertion for tests and programmatic construction.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Look up a dotted path (e.g. `"writer.userid"`) inside the bag.
    ///
    /// Returns `None` when any path segment is missing or a non-object is
    /// traversed. Callers decide how to render absent parameters.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.0.get(first)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, Value>> for ServiceParams {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self(map)
    }
}

// ── Aggregate root ────────────────────────────────────────────────────────────

/// A fully-validated description of one generation run.
///
/// Guaranteed on construction:
/// - `project_name` is non-empty and contains no path separators
/// - `services` keys are the payload keys the caller enabled; values are the
///   per-service parameter bags
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionInput {
    project_name: String,
    platform: Platform,
    application_type: Option<ApplicationType>,
    services: BTreeMap<String, ServiceParams>,
}

/// Deployment-payload keys that are never treated as service entries.
const RESERVED_KEYS: [&str; 3] = ["name", "backendPlatform", "server"];

impl SelectionInput {
    /// Start building a new `SelectionInput`.
    pub fn builder() -> SelectionBuilder<NoPlatform> {
        SelectionBuilder::new()
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }
    pub const fn platform(&self) -> Platform {
        self.platform
    }
    pub const fn application_type(&self) -> Option<ApplicationType> {
        self.application_type
    }

    /// The parameter bag for an enabled payload key, if present.
    ///
    /// Lookup is case-sensitive: `"cloudObjectStorage"` and
    /// `"cloudobjectstorage"` are different keys.
    pub fn params(&self, payload_key: &str) -> Option<&ServiceParams> {
        self.services.get(payload_key)
    }

    /// Whether the caller enabled the given payload key.
    pub fn is_enabled(&self, payload_key: &str) -> bool {
        self.services.contains_key(payload_key)
    }

    /// All enabled payload keys, in sorted order.
    pub fn enabled_keys(&self) -> impl Iterator<Item = &str> {
        self.services.keys().map(String::as_str)
    }

    /// Parse a `SelectionInput` from the two caller-supplied JSON payloads.
    ///
    /// The deployment payload names the project, the backend platform, and
    /// per-service connection parameters; the application payload (optional)
    /// names the application archetype.
    ///
    /// # Payload conventions
    ///
    /// - Service entries are object-valued keys; array-valued entries take
    ///   their first element (multi-instance bindings).
    /// - Scalar-valued keys and the reserved keys (`name`, `backendPlatform`,
    ///   `server`) are never service entries.
    /// - Unknown keys are retained in the selection and simply resolve to
    ///   nothing — forward-compatible inputs must not fail.
    ///
    /// # Errors
    ///
    /// - `MalformedSelection` if either payload is not a JSON object.
    /// - `UnsupportedPlatform` / `UnknownApplicationType` for bad tokens.
    /// - `MissingRequiredField` if `backendPlatform` is absent.
    pub fn from_payloads(deployment: &str, application: Option<&str>) -> Result<Self, DomainError> {
        let deployment: Value =
            serde_json::from_str(deployment).map_err(|e| DomainError::MalformedSelection {
                reason: format!("deployment payload: {e}"),
            })?;
        let deployment = deployment
            .as_object()
            .ok_or_else(|| DomainError::MalformedSelection {
                reason: "deployment payload must be a JSON object".into(),
            })?;

        let platform = deployment
            .get("backendPlatform")
            .and_then(Value::as_str)
            .ok_or(DomainError::MissingRequiredField {
                field: "backendPlatform",
            })
            .and_then(Platform::parse)?;

        let project_name = deployment
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("app")
            .to_string();

        let application_type = match application {
            None => None,
            Some(raw) => {
                let parsed: Value =
                    serde_json::from_str(raw).map_err(|e| DomainError::MalformedSelection {
                        reason: format!("application payload: {e}"),
                    })?;
                let obj = parsed
                    .as_object()
                    .ok_or_else(|| DomainError::MalformedSelection {
                        reason: "application payload must be a JSON object".into(),
                    })?;
                match obj.get("applicationType").and_then(Value::as_str) {
                    Some(token) => Some(ApplicationType::parse(token)?),
                    None => None,
                }
            }
        };

        let mut services = BTreeMap::new();
        for (key, value) in deployment {
            if RESERVED_KEYS.contains(&key.as_str()) {
                continue;
            }
            // Multi-instance bindings arrive as arrays; the first instance wins.
            let entry = match value {
                Value::Array(items) => items.first().cloned(),
                Value::Object(_) => Some(value.clone()),
                _ => None, // scalar metadata, not a service entry
            };
            if let Some(Value::Object(map)) = entry {
                services.insert(
                    key.clone(),
                    ServiceParams(map.into_iter().collect::<BTreeMap<_, _>>()),
                );
            }
        }

        let selection = Self {
            project_name,
            platform,
            application_type,
            services,
        };
        selection.validate()?;
        Ok(selection)
    }

    /// Validate this selection's internal consistency.
    ///
    /// Called automatically by the builder and by `from_payloads`. Available
    /// for re-validation after external construction.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.project_name.is_empty() {
            return Err(DomainError::InvalidProjectName {
                name: self.project_name.clone(),
                reason: "name cannot be empty".into(),
            });
        }
        if self.project_name.contains('/') || self.project_name.contains('\\') {
            return Err(DomainError::InvalidProjectName {
                name: self.project_name.clone(),
                reason: "name cannot contain path separators".into(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for SelectionInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} on {} ({} service(s))",
            self.project_name,
            self.platform,
            self.services.len()
        )?;
        if let Some(kind) = self.application_type {
            write!(f, " [{kind}]")?;
        }
        Ok(())
    }
}

// ── Typestate markers ─────────────────────────────────────────────────────────

/// Marker: platform has not yet been set.
pub struct NoPlatform;
/// Marker: platform has been set; other fields may now be configured.
pub struct HasPlatform;

// ── Builder ───────────────────────────────────────────────────────────────────

/// Typestate builder for [`SelectionInput`].
///
/// Compile-time guarantee: `application_type`, `project_name`, and `service`
/// are only accessible after `platform` has been set.
pub struct SelectionBuilder<P> {
    platform: Option<Platform>,
    project_name: Option<String>,
    application_type: Option<ApplicationType>,
    services: BTreeMap<String, ServiceParams>,
    _marker: PhantomData<P>,
}

impl SelectionBuilder<NoPlatform> {
    pub fn new() -> Self {
        Self {
            platform: None,
            project_name: None,
            application_type: None,
            services: BTreeMap::new(),
            _marker: PhantomData,
        }
    }

    /// Set the platform. This transitions the builder to `HasPlatform`.
    pub fn platform(self, platform: Platform) -> SelectionBuilder<HasPlatform> {
        SelectionBuilder {
            platform: Some(platform),
            project_name: self.project_name,
            application_type: self.application_type,
            services: self.services,
            _marker: PhantomData,
        }
    }
}

impl Default for SelectionBuilder<NoPlatform> {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionBuilder<HasPlatform> {
    /// Set the project name. Defaults to `"app"` when unset.
    pub fn project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = Some(name.into());
        self
    }

    /// Set the application archetype.
    pub fn application_type(mut self, kind: ApplicationType) -> Self {
        self.application_type = Some(kind);
        self
    }

    /// Enable a service under its payload key with the given parameter bag.
    pub fn service(mut self, payload_key: impl Into<String>, params: ServiceParams) -> Self {
        self.services.insert(payload_key.into(), params);
        self
    }

    /// Build and validate the `SelectionInput`.
    pub fn build(self) -> Result<SelectionInput, DomainError> {
        let platform = self.platform.expect("typestate guarantees platform is set");
        let selection = SelectionInput {
            project_name: self.project_name.unwrap_or_else(|| "app".into()),
            platform,
            application_type: self.application_type,
            services: self.services,
        };
        selection.validate()?;
        Ok(selection)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn node() -> SelectionBuilder<HasPlatform> {
        SelectionInput::builder().platform(Platform::Node)
    }

    // ── Builder ───────────────────────────────────────────────────────────────

    #[test]
    fn builder_defaults_name_and_application_type() {
        let s = node().build().unwrap();
        assert_eq!(s.project_name(), "app");
        assert_eq!(s.platform(), Platform::Node);
        assert_eq!(s.application_type(), None);
        assert_eq!(s.enabled_keys().count(), 0);
    }

    #[test]
    fn builder_collects_services() {
        let s = node()
            .project_name("demo")
            .application_type(ApplicationType::Web)
            .service("mongodb", ServiceParams::new().with("uri", "mongodb://x"))
            .service("redis", ServiceParams::new().with("uri", "redis://y"))
            .build()
            .unwrap();
        assert!(s.is_enabled("mongodb"));
        assert!(s.is_enabled("redis"));
        assert!(!s.is_enabled("cloudant"));
        assert_eq!(
            s.enabled_keys().collect::<Vec<_>>(),
            vec!["mongodb", "redis"]
        );
    }

    #[test]
    fn empty_project_name_is_rejected() {
        assert!(matches!(
            node().project_name("").build(),
            Err(DomainError::InvalidProjectName { .. })
        ));
    }

    #[test]
    fn path_separator_in_name_is_rejected() {
        assert!(node().project_name("a/b").build().is_err());
        assert!(node().project_name("a\\b").build().is_err());
    }

    // ── Platform / ApplicationType parsing ────────────────────────────────────

    #[test]
    fn platform_parse_is_case_insensitive() {
        assert_eq!(Platform::parse("NODE").unwrap(), Platform::Node);
        assert_eq!(Platform::parse("node").unwrap(), Platform::Node);
        assert_eq!(Platform::parse("Java").unwrap(), Platform::Java);
    }

    #[test]
    fn unknown_platform_is_error() {
        assert!(matches!(
            Platform::parse("COBOL"),
            Err(DomainError::UnsupportedPlatform { .. })
        ));
    }

    #[test]
    fn application_type_tokens() {
        assert_eq!(ApplicationType::parse("WEB").unwrap(), ApplicationType::Web);
        assert_eq!(
            ApplicationType::parse("MS").unwrap(),
            ApplicationType::Microservice
        );
        assert!(ApplicationType::parse("DESKTOP").is_err());
    }

    // ── Payload parsing ───────────────────────────────────────────────────────

    #[test]
    fn parses_minimal_deployment_payload() {
        let s = SelectionInput::from_payloads(
            r#"{"name": "acme", "backendPlatform": "NODE"}"#,
            None,
        )
        .unwrap();
        assert_eq!(s.project_name(), "acme");
        assert_eq!(s.platform(), Platform::Node);
        assert_eq!(s.application_type(), None);
        assert_eq!(s.enabled_keys().count(), 0);
    }

    #[test]
    fn parses_service_entries_and_application_type() {
        let s = SelectionInput::from_payloads(
            r#"{
                "name": "acme",
                "backendPlatform": "NODE",
                "mongodb": {"uri": "mongodb://x"},
                "quota": "unlimited"
            }"#,
            Some(r#"{"applicationType": "WEB"}"#),
        )
        .unwrap();
        assert_eq!(s.application_type(), Some(ApplicationType::Web));
        assert!(s.is_enabled("mongodb"));
        // Scalar metadata is not a service entry.
        assert!(!s.is_enabled("quota"));
        assert_eq!(
            s.params("mongodb").unwrap().lookup("uri").unwrap(),
            "mongodb://x"
        );
    }

    #[test]
    fn array_valued_entry_takes_first_instance() {
        let s = SelectionInput::from_payloads(
            r#"{
                "backendPlatform": "NODE",
                "cloudant": [
                    {"username": "u1", "password": "p1", "url": "https://one"},
                    {"username": "u2", "password": "p2", "url": "https://two"}
                ]
            }"#,
            None,
        )
        .unwrap();
        assert_eq!(
            s.params("cloudant").unwrap().lookup("url").unwrap(),
            "https://one"
        );
    }

    #[test]
    fn reserved_keys_are_not_services() {
        let s = SelectionInput::from_payloads(
            r#"{"backendPlatform": "NODE", "server": {"host": "localhost"}}"#,
            None,
        )
        .unwrap();
        assert!(!s.is_enabled("server"));
    }

    #[test]
    fn malformed_deployment_payload_is_fatal() {
        assert!(matches!(
            SelectionInput::from_payloads("{not json", None),
            Err(DomainError::MalformedSelection { .. })
        ));
        assert!(matches!(
            SelectionInput::from_payloads(r#"["array"]"#, None),
            Err(DomainError::MalformedSelection { .. })
        ));
    }

    #[test]
    fn malformed_application_payload_is_fatal() {
        assert!(matches!(
            SelectionInput::from_payloads(
                r#"{"backendPlatform": "NODE"}"#,
                Some("oops")
            ),
            Err(DomainError::MalformedSelection { .. })
        ));
    }

    #[test]
    fn missing_platform_is_fatal() {
        assert!(matches!(
            SelectionInput::from_payloads(r#"{"name": "x"}"#, None),
            Err(DomainError::MissingRequiredField {
                field: "backendPlatform"
            })
        ));
    }

    #[test]
    fn missing_name_defaults_to_app() {
        let s = SelectionInput::from_payloads(r#"{"backendPlatform": "NODE"}"#, None).unwrap();
        assert_eq!(s.project_name(), "app");
    }

    // ── ServiceParams dotted lookup ───────────────────────────────────────────

    #[test]
    fn lookup_traverses_nested_objects() {
        let params = ServiceParams::new().with(
            "writer",
            serde_json::json!({"userid": "admin", "password": "secret"}),
        );
        assert_eq!(params.lookup("writer.userid").unwrap(), "admin");
        assert_eq!(params.lookup("writer.password").unwrap(), "secret");
        assert!(params.lookup("writer.missing").is_none());
        assert!(params.lookup("reader.userid").is_none());
    }

    #[test]
    fn display_includes_platform_and_count() {
        let s = node()
            .project_name("demo")
            .application_type(ApplicationType::Web)
            .service("mongodb", ServiceParams::new())
            .build()
            .unwrap();
        let text = s.to_string();
        assert!(text.contains("demo"));
        assert!(text.contains("node"));
        assert!(text.contains("1 service"));
        assert!(text.contains("web"));
    }
}
