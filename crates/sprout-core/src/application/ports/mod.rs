//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `sprout-adapters` crate provides implementations.

use std::path::Path;

use crate::domain::{BaseBundle, ServiceDescriptor};
use crate::error::SproutResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `sprout_adapters::filesystem::LocalFilesystem` (production; atomic writes)
/// - `sprout_adapters::filesystem::MemoryFilesystem` (testing)
///
/// ## Design Notes
///
/// - `write_file` must create-or-overwrite with atomic replace semantics:
///   a failed write never leaves a partially-written artifact behind.
/// - Parent directories are the caller's responsibility (`create_dir_all`).
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> SproutResult<()>;

    /// Write content to a file, replacing any existing file atomically.
    fn write_file(&self, path: &Path, content: &str) -> SproutResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// Port for the read-only service catalog.
///
/// Implemented by:
/// - `sprout_adapters::catalog::InMemoryCatalog` (builtin descriptors)
/// - service packs loaded from disk (see `sprout_adapters::catalog_loader`)
#[cfg_attr(test, mockall::automock)]
pub trait ServiceCatalog: Send + Sync {
    /// All descriptors, sorted by name.
    fn all(&self) -> SproutResult<Vec<ServiceDescriptor>>;

    /// Get a specific descriptor by service name.
    fn get(&self, name: &str) -> SproutResult<ServiceDescriptor>;

    /// The platform-wide base bundle generation starts from.
    fn base_bundle(&self) -> SproutResult<BaseBundle>;
}
