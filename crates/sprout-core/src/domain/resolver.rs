//! Selection resolver.
//!
//! Decides which catalog descriptors participate in a generation run. The
//! resolver is pure: it inspects the selection and the catalog and returns
//! borrowed descriptors in *resolution order* — lexicographic by descriptor
//! name — which every downstream merge step relies on for determinism.

use crate::domain::{catalog::ServiceDescriptor, selection::SelectionInput};

/// Resolve the descriptors enabled by `selection`.
///
/// A descriptor is included iff:
/// 1. its `payload_key` appears (case-sensitively) among the selection's
///    enabled keys, and
/// 2. its applicability predicate holds for the selection's platform and
///    application type.
///
/// Enabled keys that match no descriptor are silently ignored — callers may
/// send payloads from newer tooling that names services this catalog does
/// not know yet.
///
/// The result is sorted by descriptor name, independent of catalog order.
pub fn resolve<'a>(
    selection: &SelectionInput,
    catalog: &'a [ServiceDescriptor],
) -> Vec<&'a ServiceDescriptor> {
    let mut resolved: Vec<&ServiceDescriptor> = catalog
        .iter()
        .filter(|descriptor| selection.is_enabled(&descriptor.payload_key))
        .filter(|descriptor| {
            descriptor.applies_to(selection.platform(), selection.application_type())
        })
        .collect();

    resolved.sort_by(|a, b| a.name.cmp(&b.name));
    resolved
}

// ── Tests ─────────────────────────────────────────────────────────────────────
