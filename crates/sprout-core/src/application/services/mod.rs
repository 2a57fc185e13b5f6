pub mod catalog_service;
pub mod generate_service;

pub use catalog_service::{CatalogService, ServiceInfo};
pub use generate_service::{GenerateService, GenerationReport};
