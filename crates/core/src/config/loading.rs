//! Configuration loading from files and environment variables

use crate::error::{Error, Result};
use config::{Config as ConfigLib, ConfigBuilder as LibConfigBuilder, Environment, File};
use std::path::Path;
use tracing::debug;

use super::defaults::*;
use super::{solution_config_path, Config};

/// Helper to set a config default with consistent error mapping
fn set_config_default<T: Into<config::Value>>(
    builder: LibConfigBuilder<config::builder::DefaultState>,
    key: &str,
    value: T,
) -> Result<LibConfigBuilder<config::builder::DefaultState>> {
    builder
        .set_default(key, value)
        .map_err(|e| Error::config(format!("Failed to set {key} default: {e}")))
}

impl Config {
    /// Loads configuration from a TOML file with environment variable overrides
    ///
    /// Environment variables are prefixed with `MODELGEN_` and use double underscores
    /// for nested values. For example:
    /// - `MODELGEN_ELIGIBILITY__SUFFIX=Context`
    /// - `MODELGEN_OUTPUT__EXTENSION=xml`
    pub fn from_file(path: &Path) -> Result<Self> {
        let builder = ConfigLib::builder();

        // config doesn't apply serde defaults for missing sections
        let builder = set_config_default(builder, "eligibility.suffix", default_suffix())?;
        let builder = set_config_default(builder, "eligibility.base_type", default_base_type())?;
        let builder = set_config_default(builder, "eligibility.policy", "naming_convention")?;
        let builder = set_config_default(builder, "output.extension", default_model_extension())?;
        let builder = set_config_default(
            builder,
            "project.web_project_type_ids",
            default_web_project_type_ids(),
        )?;
        let builder =
            set_config_default(builder, "project.web_config_file", default_web_config_file())?;
        let builder =
            set_config_default(builder, "project.app_config_file", default_app_config_file())?;
        let builder = set_config_default(
            builder,
            "project.build_output_dir",
            default_build_output_dir(),
        )?;
        let mut builder = set_config_default(
            builder,
            "project.type_manifest_suffix",
            default_type_manifest_suffix(),
        )?;

        // Add the config file if it exists
        if path.exists() {
            debug!("Loading configuration from {}", path.display());
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix("MODELGEN")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| Error::config(format!("Failed to deserialize config: {e}")))
    }

    /// Creates a config from a TOML string (useful for testing)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration
    ///
    /// Precedence (lowest to highest):
    /// 1. Hardcoded defaults
    /// 2. Config file (explicit path, or `modelgen.toml` in the solution directory)
    /// 3. Environment variables (MODELGEN_*)
    pub fn load(config_path: Option<&Path>, solution_dir: &Path) -> Result<Self> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => solution_config_path(solution_dir),
        };
        let config = Self::from_file(&path)?;
        config.validate()?;
        Ok(config)
    }
}
