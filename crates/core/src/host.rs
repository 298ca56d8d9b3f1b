//! Collaborator interfaces the pipeline is built from
//!
//! Each trait stands in for a piece of the host environment: the current
//! selection, the solution's project index, the per-project type resolution
//! facility, instantiation, and schema serialization. The pipeline receives
//! them explicitly; nothing is looked up from global state.

use crate::error::Result;
use crate::model::{ProjectConfiguration, ProjectRef, ResolvedType};
use crate::schema::ContextInstance;
use std::collections::BTreeSet;
use std::io::Write;
use std::path::PathBuf;

/// What the host currently has selected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Nothing,
    Multiple(usize),
    /// The solution node itself
    SolutionRoot,
    /// A project's root node
    ProjectRoot(ProjectRef),
    /// A single item inside a project
    Item { path: PathBuf, project: ProjectRef },
}

/// Source of the current selection
///
/// `acquire` may hand out resources that must be given back with `release`.
/// Callers should go through a guard that releases on every exit path.
pub trait SelectionService {
    fn acquire(&self) -> Result<Selection>;

    fn release(&self);
}

/// A project as known to the solution index
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HierarchyHandle {
    pub unique_name: String,
    /// Project name (file stem of the project file)
    pub name: String,
    /// Name of the assembly the project builds, defaults to the project name
    pub assembly_name: String,
    pub directory: PathBuf,
}

/// Maps project unique names to hierarchy handles and their type ids
pub trait ProjectIndex {
    fn resolve(&self, unique_name: &str) -> Option<HierarchyHandle>;

    /// Aggregate project type ids, as written in the project file
    fn project_type_ids(&self, hierarchy: &HierarchyHandle) -> Result<BTreeSet<String>>;
}

/// Type lookup bound to one project's build output
pub trait TypeResolver {
    fn get_type(&self, full_name: &str) -> Option<ResolvedType>;
}

/// Hands out type resolvers scoped to a single project
pub trait TypeResolutionService {
    fn resolver<'a>(&'a self, hierarchy: &HierarchyHandle) -> Result<Box<dyn TypeResolver + 'a>>;
}

/// Constructs a data context from a resolved type and project configuration
pub trait Instantiator {
    fn instantiate(
        &self,
        resolved: &ResolvedType,
        configuration: &ProjectConfiguration,
    ) -> Result<ContextInstance>;
}

/// Writes a context instance as a model document
pub trait SchemaSerializer {
    fn serialize(&self, instance: &ContextInstance, out: &mut dyn Write) -> Result<()>;
}
