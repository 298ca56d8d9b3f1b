//! Data model shared by the inspector, resolver, configuration loader and pipeline

use crate::error::{Error, Result};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use strum_macros::{Display, EnumString};

use crate::schema::TypeDescriptor;

/// Reference to the project that owns a source file
///
/// The unique name is the project's path relative to the solution, with
/// forward slashes (e.g. `App.Data/App.Data.csproj`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectRef {
    pub unique_name: String,
}

impl ProjectRef {
    pub fn new(unique_name: impl Into<String>) -> Self {
        Self {
            unique_name: unique_name.into(),
        }
    }
}

impl std::fmt::Display for ProjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.unique_name)
    }
}

/// A single source file selected for generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    path: PathBuf,
    base_name: String,
    directory: PathBuf,
    project: ProjectRef,
}

impl SourceFile {
    /// Build a source file from its absolute path and owning project
    pub fn new(path: impl Into<PathBuf>, project: ProjectRef) -> Result<Self> {
        let path = path.into();
        if !path.is_absolute() {
            return Err(Error::invalid_input(format!(
                "Source file path must be absolute: {}",
                path.display()
            )));
        }

        let base_name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                Error::invalid_input(format!("Source file has no base name: {}", path.display()))
            })?
            .to_string();

        let directory = path
            .parent()
            .ok_or_else(|| {
                Error::invalid_input(format!("Source file has no directory: {}", path.display()))
            })?
            .to_path_buf();

        Ok(Self {
            path,
            base_name,
            directory,
            project,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name without its extension
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn project(&self) -> &ProjectRef {
        &self.project
    }
}

/// Kind of a type-like declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DeclarationKind {
    Class,
    Struct,
    Interface,
    Record,
}

/// A type declaration with its base types exactly as written in source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[builder(setter(into))]
pub struct TypeDeclaration {
    pub name: String,
    pub kind: DeclarationKind,
    #[builder(default)]
    pub base_types: Vec<String>,
}

/// The first namespace grouping found in a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceScope {
    pub full_name: String,
}

impl NamespaceScope {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
        }
    }

    /// Qualify a bare type name with this namespace
    pub fn qualify(&self, name: &str) -> String {
        format!("{}.{name}", self.full_name)
    }
}

/// Result of inspecting one source file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inspection {
    pub declarations: Vec<TypeDeclaration>,
    pub namespace: Option<NamespaceScope>,
}

impl Inspection {
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty() && self.namespace.is_none()
    }
}

/// A type located in one project's compiled type universe
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedType {
    pub full_name: String,
    /// Unique name of the project whose build output produced this type
    pub project: String,
    pub descriptor: TypeDescriptor,
}

impl ResolvedType {
    /// Simple name, the last `.` segment of the full name
    pub fn simple_name(&self) -> &str {
        self.full_name
            .rsplit_once('.')
            .map_or(self.full_name.as_str(), |(_, name)| name)
    }

    pub fn is_constructible(&self) -> bool {
        self.descriptor.is_constructible()
    }
}

/// A connection string entry from the project's configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStringEntry {
    pub name: String,
    pub connection_string: String,
    pub provider_name: Option<String>,
}

/// Configuration context scoped to one project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfiguration {
    /// Unique name of the owning project
    pub project: String,
    /// The project's own configuration file this context was read from
    pub source_path: PathBuf,
    /// `appSettings` in document order after merging add/remove/clear
    pub app_settings: Vec<(String, String)>,
    /// `connectionStrings` in document order after merging add/remove/clear
    pub connection_strings: Vec<ConnectionStringEntry>,
}

impl ProjectConfiguration {
    pub fn setting(&self, key: &str) -> Option<&str> {
        self.app_settings
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Connection string lookup; names are matched case-insensitively
    pub fn connection_string(&self, name: &str) -> Option<&ConnectionStringEntry> {
        self.connection_strings
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
    }
}

/// The generated model file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedModelArtifact {
    pub path: PathBuf,
}

impl GeneratedModelArtifact {
    /// `<directory>/<base name>.<extension>` for a source file
    pub fn path_for(source: &SourceFile, extension: &str) -> PathBuf {
        source
            .directory()
            .join(format!("{}.{extension}", source.base_name()))
    }
}
