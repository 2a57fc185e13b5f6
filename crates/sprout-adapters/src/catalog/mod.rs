//! Service catalog adapters.

pub mod builtin;

use std::{
    collections::BTreeMap,
    sync::{Arc, RwLock},
};

use sprout_core::{
    application::ports::ServiceCatalog,
    domain::{BaseBundle, DomainValidator as validator, ServiceDescriptor},
    error::SproutResult,
};

/// Thread-safe in-memory service catalog.
///
/// Read-mostly: populated once at startup (builtin descriptors, optionally
/// extended from a service pack) and then shared across generation runs.
#[derive(Clone)]
pub struct InMemoryCatalog {
    inner: Arc<RwLock<BTreeMap<String, ServiceDescriptor>>>,
    bundle: BaseBundle,
}

impl InMemoryCatalog {
    /// Create a new empty catalog around the given base bundle.
    pub fn new(bundle: BaseBundle) -> Self {
        Self {
            inner: Arc::new(RwLock::new(BTreeMap::new())),
            bundle,
        }
    }

    /// Create a catalog with the built-in descriptors loaded.
    pub fn with_builtin() -> SproutResult<Self> {
        let catalog = Self::new(builtin::base_bundle());
        for descriptor in builtin::all_services()? {
            catalog.insert(descriptor)?;
        }
        Ok(catalog)
    }

    /// Insert or replace a descriptor. Validates before insertion.
    pub fn insert(&self, descriptor: ServiceDescriptor) -> SproutResult<()> {
        validator::validate_descriptor(&descriptor)
            .map_err(sprout_core::error::SproutError::Domain)?;

        let mut inner = self
            .inner
            .write()
            .map_err(|_| sprout_core::application::ApplicationError::StoreLockError)?;
        inner.insert(descriptor.name.clone(), descriptor);
        Ok(())
    }

    /// Get the number of descriptors.
    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.len()).unwrap_or(0)
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ServiceCatalog for InMemoryCatalog {
    fn all(&self) -> SproutResult<Vec<ServiceDescriptor>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| sprout_core::application::ApplicationError::StoreLockError)?;

        // BTreeMap iteration is already name-sorted.
        Ok(inner.values().cloned().collect())
    }

    fn get(&self, name: &str) -> SproutResult<ServiceDescriptor> {
        let inner = self
            .inner
            .read()
            .map_err(|_| sprout_core::application::ApplicationError::StoreLockError)?;

        inner.get(name).cloned().ok_or_else(|| {
            sprout_core::domain::DomainError::ServiceNotFound(name.to_string()).into()
        })
    }

    fn base_bundle(&self) -> SproutResult<BaseBundle> {
        Ok(self.bundle.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprout_core::domain::{Applicability, Platform};

    fn descriptor(name: &str) -> ServiceDescriptor {
        ServiceDescriptor::builder()
            .name(name)
            .payload_key(name)
            .instrumentation("//\n")
            .applicability(Applicability::platform(Platform::Node))
            .build()
            .unwrap()
    }

    #[test]
    fn with_builtin_loads_the_shipped_catalog() {
        let catalog = InMemoryCatalog::with_builtin().unwrap();
        assert!(!catalog.is_empty());
        assert!(catalog.get("mongodb").is_ok());
        assert!(catalog.get("quantum-ledger").is_err());
    }

    #[test]
    fn all_returns_descriptors_sorted_by_name() {
        let catalog = InMemoryCatalog::new(builtin::base_bundle());
        catalog.insert(descriptor("redis")).unwrap();
        catalog.insert(descriptor("cloudant")).unwrap();

        let names: Vec<String> = catalog
            .all()
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["cloudant", "redis"]);
    }

    #[test]
    fn insert_rejects_invalid_descriptors() {
        let catalog = InMemoryCatalog::new(builtin::base_bundle());
        let mut bad = descriptor("ok");
        bad.name = "Not Kebab".into();
        assert!(catalog.insert(bad).is_err());
    }
}
