//! Catalog service: listing and integrity checking.
//!
//! Read-only use cases over the service catalog port. Generation itself
//! lives in [`super::GenerateService`].

use tracing::instrument;

use crate::{
    application::ports::ServiceCatalog,
    domain::{ApplicationType, CatalogWarning, DomainValidator as validator, Platform},
    error::SproutResult,
};

/// Information about a catalog service for display purposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceInfo {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub platforms: Vec<String>,
    /// `None` renders as "any".
    pub application_types: Option<Vec<String>>,
    pub dependency_count: usize,
    pub config_key_count: usize,
}

/// Read-only catalog use cases.
pub struct CatalogService {
    catalog: Box<dyn ServiceCatalog>,
}

impl CatalogService {
    pub fn new(catalog: Box<dyn ServiceCatalog>) -> Self {
        Self { catalog }
    }

    /// List catalog services, optionally filtered by platform and
    /// application type. Sorted by name.
    #[instrument(skip(self))]
    pub fn list(
        &self,
        platform: Option<Platform>,
        application_type: Option<ApplicationType>,
    ) -> SproutResult<Vec<ServiceInfo>> {
        let mut descriptors = self.catalog.all()?;
        descriptors.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(descriptors
            .into_iter()
            .filter(|d| platform.is_none_or(|p| d.applicability.platforms.contains(&p)))
            .filter(|d| {
                application_type.is_none_or(|t| {
                    d.applicability
                        .application_types
                        .as_ref()
                        .is_none_or(|allowed| allowed.contains(&t))
                })
            })
            .map(|d| ServiceInfo {
                name: d.name.clone(),
                display_name: d.display_name.clone(),
                description: d.description.clone(),
                platforms: d
                    .applicability
                    .platforms
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
                application_types: d
                    .applicability
                    .application_types
                    .as_ref()
                    .map(|kinds| kinds.iter().map(ToString::to_string).collect()),
                dependency_count: d.dependencies.len(),
                config_key_count: d.config.len(),
            })
            .collect())
    }

    /// Run the catalog integrity check. Findings are warnings, not runtime
    /// failures; generation proceeds with last-writer-wins.
    pub fn validate(&self) -> SproutResult<Vec<CatalogWarning>> {
        let descriptors = self.catalog.all()?;
        Ok(validator::validate_catalog(&descriptors))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
