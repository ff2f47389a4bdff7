use std::path::Path;

use crate::domain::{
    entities::{common::is_descendant, manifest::Manifest},
    error::DomainError,
};

/// Centralized domain validation.
///
/// Checks that need more than one entity live here, not scattered across
/// services.
pub struct DomainValidator;

impl DomainValidator {
    /// Every manifest target must land strictly inside `root`.
    pub fn validate_containment(manifest: &Manifest, root: &Path) -> Result<(), DomainError> {
        for entry in manifest.iter() {
            let target = entry.target().under(root);
            if !is_descendant(root, &target) {
                return Err(DomainError::PathTraversal {
                    path: entry.target().to_string(),
                });
            }
        }
        Ok(())
    }
}
