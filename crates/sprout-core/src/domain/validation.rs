use crate::domain::{
    catalog::{CatalogWarning, ServiceDescriptor, validate_catalog},
    error::DomainError,
    output_tree::OutputTree,
    selection::SelectionInput,
};

/// Centralized domain validation.
///
/// All validation logic lives here, not scattered across entities.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_selection(selection: &SelectionInput) -> Result<(), DomainError> {
        selection.validate()
    }

    pub fn validate_descriptor(descriptor: &ServiceDescriptor) -> Result<(), DomainError> {
        descriptor.validate()
    }

    pub fn validate_catalog(descriptors: &[ServiceDescriptor]) -> Vec<CatalogWarning> {
        validate_catalog(descriptors)
    }

    pub fn validate_output_tree(tree: &OutputTree) -> Result<(), DomainError> {
        tree.validate()
    }
}
