//! Per-project type universe backed by build-output type manifests
//!
//! A build writes `<project dir>/<build_output_dir>/<AssemblyName><suffix>`
//! (default `bin/Debug/<AssemblyName>.types.json`) listing the public types it
//! produced. A project without a manifest has not been built, and every lookup
//! against it misses.

use modelgen_core::error::{Error, Result};
use modelgen_core::host::{HierarchyHandle, TypeResolutionService, TypeResolver};
use modelgen_core::{ProjectSettings, ResolvedType, TypeDescriptor};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Contents of a type manifest file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeManifest {
    #[serde(default)]
    pub assembly: String,
    #[serde(default)]
    pub types: Vec<TypeDescriptor>,
}

impl TypeManifest {
    pub fn from_json_str(content: &str, path: &Path) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| {
            Error::parse(
                path.display().to_string(),
                format!("Invalid type manifest: {e}"),
            )
        })
    }
}

/// Resolves types of one project from its type manifest
#[derive(Debug, Clone)]
pub struct ManifestTypeResolver {
    project: String,
    types: HashMap<String, TypeDescriptor>,
}

impl ManifestTypeResolver {
    pub fn new(project: impl Into<String>, manifest: TypeManifest) -> Self {
        let types = manifest
            .types
            .into_iter()
            .map(|descriptor| (descriptor.full_name.clone(), descriptor))
            .collect();
        Self {
            project: project.into(),
            types,
        }
    }

    /// Resolver over an empty universe (project not built)
    pub fn empty(project: impl Into<String>) -> Self {
        Self::new(project, TypeManifest::default())
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeResolver for ManifestTypeResolver {
    fn get_type(&self, full_name: &str) -> Option<ResolvedType> {
        self.types.get(full_name).map(|descriptor| ResolvedType {
            full_name: descriptor.full_name.clone(),
            project: self.project.clone(),
            descriptor: descriptor.clone(),
        })
    }
}

/// Type resolution over each project's build output directory
#[derive(Debug, Clone)]
pub struct BuildOutputTypeService {
    build_output_dir: PathBuf,
    manifest_suffix: String,
}

impl BuildOutputTypeService {
    pub fn new(build_output_dir: impl Into<PathBuf>, manifest_suffix: impl Into<String>) -> Self {
        Self {
            build_output_dir: build_output_dir.into(),
            manifest_suffix: manifest_suffix.into(),
        }
    }

    pub fn from_settings(settings: &ProjectSettings) -> Self {
        Self::new(&settings.build_output_dir, &settings.type_manifest_suffix)
    }

    /// Where the manifest for a project is expected
    pub fn manifest_path(&self, hierarchy: &HierarchyHandle) -> PathBuf {
        hierarchy
            .directory
            .join(&self.build_output_dir)
            .join(format!("{}{}", hierarchy.assembly_name, self.manifest_suffix))
    }
}

impl Default for BuildOutputTypeService {
    fn default() -> Self {
        Self::from_settings(&ProjectSettings::default())
    }
}

impl TypeResolutionService for BuildOutputTypeService {
    fn resolver<'a>(&'a self, hierarchy: &HierarchyHandle) -> Result<Box<dyn TypeResolver + 'a>> {
        let path = self.manifest_path(hierarchy);
        if !path.exists() {
            debug!(
                "No type manifest at {}; project '{}' has not been built",
                path.display(),
                hierarchy.unique_name
            );
            return Ok(Box::new(ManifestTypeResolver::empty(&hierarchy.unique_name)));
        }

        // Read fresh on every call so a rebuild is picked up immediately
        let content = std::fs::read_to_string(&path).map_err(|e| {
            Error::parse(
                path.display().to_string(),
                format!("Failed to read type manifest: {e}"),
            )
        })?;
        let manifest = TypeManifest::from_json_str(&content, &path)?;
        let resolver = ManifestTypeResolver::new(&hierarchy.unique_name, manifest);
        debug!(
            "Loaded {} type(s) for project '{}' from {}",
            resolver.len(),
            hierarchy.unique_name,
            path.display()
        );
        Ok(Box::new(resolver))
    }
}
