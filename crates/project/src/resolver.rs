//! Project metadata resolution
//!
//! Resolves a fully qualified name against the type universe of exactly one
//! project. Other projects in the solution are never consulted, so identical
//! names in sibling projects cannot cross-resolve.

use modelgen_core::error::{Error, Result};
use modelgen_core::host::{ProjectIndex, TypeResolutionService};
use modelgen_core::{ProjectRef, ResolvedType};
use tracing::debug;

/// Resolves symbols to types using the owning project's build output
pub struct MetadataResolver<'a> {
    index: &'a dyn ProjectIndex,
    types: &'a dyn TypeResolutionService,
}

impl<'a> MetadataResolver<'a> {
    pub fn new(index: &'a dyn ProjectIndex, types: &'a dyn TypeResolutionService) -> Self {
        Self { index, types }
    }

    /// Resolve `full_name` inside `project`
    ///
    /// Fails with `ProjectNotIndexed` when the project is unknown to the index
    /// and with `TypeNotFound` when its build output has no such type.
    pub fn resolve(&self, project: &ProjectRef, full_name: &str) -> Result<ResolvedType> {
        let hierarchy = self
            .index
            .resolve(&project.unique_name)
            .ok_or_else(|| Error::project_not_indexed(&project.unique_name))?;

        let resolver = self.types.resolver(&hierarchy)?;
        let resolved = resolver
            .get_type(full_name)
            .ok_or_else(|| Error::type_not_found(full_name, &project.unique_name))?;

        debug!(
            "Resolved '{}' in project '{}'",
            resolved.full_name, hierarchy.unique_name
        );
        Ok(resolved)
    }
}
