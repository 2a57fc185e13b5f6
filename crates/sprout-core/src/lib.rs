//! sprout Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the sprout
//! project generator, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           sprout-cli (CLI)              │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │   (GenerateService, CatalogService)     │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │     (Driven: Catalog, Filesystem)       │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      sprout-adapters (Infrastructure)   │
//! │   (InMemoryCatalog, LocalFilesystem)    │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │  (SelectionInput, Resolver, Merger)     │
//! │         No External Dependencies        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sprout_core::{
//!     application::GenerateService,
//!     domain::{Platform, SelectionInput, ServiceParams},
//! };
//!
//! // 1. Describe the run
//! let selection = SelectionInput::builder()
//!     .platform(Platform::Node)
//!     .project_name("my-app")
//!     .service("mongodb", ServiceParams::new().with("uri", "mongodb://localhost"))
//!     .build()
//!     .unwrap();
//!
//! // 2. Use the application service (with injected adapters)
//! let service = GenerateService::new(catalog, filesystem);
//! service.generate(&selection, "./output").unwrap();
//! ```

// Re-export domain layer (stable, well-defined API)
pub mod domain;

// Re-export application layer (orchestration logic)
pub mod application;

// Re-export error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        CatalogService, GenerateService, GenerationReport, ServiceInfo,
        ports::{Filesystem, ServiceCatalog},
    };
    pub use crate::domain::{
        Applicability, ApplicationType, BaseBundle, CatalogWarning, ConfigBinding,
        DependencyFragment, OutputTree, Platform, SelectionInput, ServiceDescriptor,
        ServiceParams,
    };
    pub use crate::error::{SproutError, SproutResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
