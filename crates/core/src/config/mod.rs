//! Configuration module for modelgen
//!
//! Tool settings are loaded from a TOML file (`modelgen.toml` next to the
//! solution, or an explicit path) with `MODELGEN_` environment overrides.
//! The pipeline itself only ever receives the resolved values.

mod defaults;
mod loading;

#[cfg(test)]
mod tests;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use defaults::{WEB_APPLICATION_PROJECT_TYPE_ID, WEB_SITE_PROJECT_TYPE_ID};

use defaults::*;

/// File name of the per-solution configuration file
pub const CONFIG_FILE_NAME: &str = "modelgen.toml";

/// Returns the conventional configuration path for a solution directory
pub fn solution_config_path(solution_dir: &Path) -> PathBuf {
    solution_dir.join(CONFIG_FILE_NAME)
}

/// Which predicate decides that a file is worth offering generation for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityPolicy {
    /// Base name ends with the suffix convention (default)
    #[default]
    NamingConvention,
    /// Suffix convention, then a declaration in the file must list the base type
    DerivedFromBaseType,
}

/// Eligibility configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibilityConfig {
    /// Case-insensitive suffix the file base name must end with
    #[serde(default = "default_suffix")]
    pub suffix: String,

    /// Base type name a data context derives from
    #[serde(default = "default_base_type")]
    pub base_type: String,

    /// Eligibility policy
    #[serde(default)]
    pub policy: EligibilityPolicy,
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        Self {
            suffix: default_suffix(),
            base_type: default_base_type(),
            policy: EligibilityPolicy::default(),
        }
    }
}

/// Output artifact configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Extension of the generated model file, without the leading dot
    #[serde(default = "default_model_extension")]
    pub extension: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            extension: default_model_extension(),
        }
    }
}

/// Project conventions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSettings {
    /// Project type ids that mark a web-hosted project
    #[serde(default = "default_web_project_type_ids")]
    pub web_project_type_ids: Vec<String>,

    /// Configuration file name used by web projects
    #[serde(default = "default_web_config_file")]
    pub web_config_file: String,

    /// Configuration file name used by standalone applications
    #[serde(default = "default_app_config_file")]
    pub app_config_file: String,

    /// Build output directory, relative to the project directory
    #[serde(default = "default_build_output_dir")]
    pub build_output_dir: String,

    /// Suffix appended to the project name to form the type manifest file name
    #[serde(default = "default_type_manifest_suffix")]
    pub type_manifest_suffix: String,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            web_project_type_ids: default_web_project_type_ids(),
            web_config_file: default_web_config_file(),
            app_config_file: default_app_config_file(),
            build_output_dir: default_build_output_dir(),
            type_manifest_suffix: default_type_manifest_suffix(),
        }
    }
}

/// Main configuration structure for modelgen
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Eligibility configuration
    #[serde(default)]
    pub eligibility: EligibilityConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Project conventions
    #[serde(default)]
    pub project: ProjectSettings,
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.eligibility.suffix.trim().is_empty() {
            return Err(Error::config("eligibility.suffix must not be empty"));
        }

        if self.eligibility.base_type.trim().is_empty() {
            return Err(Error::config("eligibility.base_type must not be empty"));
        }

        let extension = &self.output.extension;
        if extension.is_empty() {
            return Err(Error::config("output.extension must not be empty"));
        }
        if extension.starts_with('.') || extension.contains(['/', '\\']) {
            return Err(Error::config(format!(
                "Invalid output extension '{extension}'. Expected a bare extension such as 'edmx'"
            )));
        }

        if self.project.web_config_file.is_empty() || self.project.app_config_file.is_empty() {
            return Err(Error::config(
                "project.web_config_file and project.app_config_file must not be empty",
            ));
        }

        if self.project.type_manifest_suffix.is_empty() {
            return Err(Error::config("project.type_manifest_suffix must not be empty"));
        }

        Ok(())
    }
}
