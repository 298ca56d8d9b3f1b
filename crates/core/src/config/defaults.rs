//! Default values and functions for configuration

// Default constants
pub(crate) const DEFAULT_SUFFIX: &str = "DataContext";
pub(crate) const DEFAULT_BASE_TYPE: &str = "DbContext";
pub(crate) const DEFAULT_MODEL_EXTENSION: &str = "edmx";
pub(crate) const DEFAULT_WEB_CONFIG_FILE: &str = "Web.config";
pub(crate) const DEFAULT_APP_CONFIG_FILE: &str = "App.config";
pub(crate) const DEFAULT_BUILD_OUTPUT_DIR: &str = "bin/Debug";
pub(crate) const DEFAULT_TYPE_MANIFEST_SUFFIX: &str = ".types.json";

/// Project type id of a web application project
pub const WEB_APPLICATION_PROJECT_TYPE_ID: &str = "{349C5851-65DF-11DA-9384-00065B846F21}";

/// Project type id of a web site project
pub const WEB_SITE_PROJECT_TYPE_ID: &str = "{E24C65DC-7377-472B-9ABA-BC803B73C61A}";

pub(crate) fn default_suffix() -> String {
    DEFAULT_SUFFIX.to_string()
}

pub(crate) fn default_base_type() -> String {
    DEFAULT_BASE_TYPE.to_string()
}

pub(crate) fn default_model_extension() -> String {
    DEFAULT_MODEL_EXTENSION.to_string()
}

pub(crate) fn default_web_project_type_ids() -> Vec<String> {
    vec![
        WEB_APPLICATION_PROJECT_TYPE_ID.to_string(),
        WEB_SITE_PROJECT_TYPE_ID.to_string(),
    ]
}

pub(crate) fn default_web_config_file() -> String {
    DEFAULT_WEB_CONFIG_FILE.to_string()
}

pub(crate) fn default_app_config_file() -> String {
    DEFAULT_APP_CONFIG_FILE.to_string()
}

pub(crate) fn default_build_output_dir() -> String {
    DEFAULT_BUILD_OUTPUT_DIR.to_string()
}

pub(crate) fn default_type_manifest_suffix() -> String {
    DEFAULT_TYPE_MANIFEST_SUFFIX.to_string()
}
