//! Tests for configuration module

use super::*;
use crate::error::{Error, Result};
use std::io::Write;
use tempfile::NamedTempFile;

fn create_temp_config_file(content: &str) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .map_err(|e| Error::config(format!("Failed to create temp file: {e}")))?;
    file.write_all(content.as_bytes())
        .map_err(|e| Error::config(format!("Failed to write temp file: {e}")))?;
    file.flush()
        .map_err(|e| Error::config(format!("Failed to flush temp file: {e}")))?;
    Ok(file)
}

fn with_env_var<F, T>(key: &str, value: &str, f: F) -> T
where
    F: FnOnce() -> T,
{
    std::env::set_var(key, value);
    let result = f();
    std::env::remove_var(key);
    result
}

#[test]
fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.eligibility.suffix, "DataContext");
    assert_eq!(config.eligibility.base_type, "DbContext");
    assert_eq!(config.eligibility.policy, EligibilityPolicy::NamingConvention);
    assert_eq!(config.output.extension, "edmx");
    assert_eq!(config.project.web_config_file, "Web.config");
    assert_eq!(config.project.app_config_file, "App.config");
    assert_eq!(
        config.project.web_project_type_ids,
        vec![
            WEB_APPLICATION_PROJECT_TYPE_ID.to_string(),
            WEB_SITE_PROJECT_TYPE_ID.to_string()
        ]
    );
    assert!(config.validate().is_ok());
}

#[test]
fn test_from_toml_str_valid() {
    let toml = r#"
        [eligibility]
        suffix = "Context"
        policy = "derived_from_base_type"

        [output]
        extension = "xml"
    "#;

    let config = Config::from_toml_str(toml).expect("Failed to parse valid TOML");
    assert_eq!(config.eligibility.suffix, "Context");
    assert_eq!(config.eligibility.base_type, "DbContext");
    assert_eq!(
        config.eligibility.policy,
        EligibilityPolicy::DerivedFromBaseType
    );
    assert_eq!(config.output.extension, "xml");
}

#[test]
fn test_from_toml_str_empty_uses_defaults() {
    let config = Config::from_toml_str("").expect("Failed to parse empty TOML");
    assert_eq!(config.eligibility.suffix, "DataContext");
    assert_eq!(config.project.build_output_dir, "bin/Debug");
    assert_eq!(config.project.type_manifest_suffix, ".types.json");
}

#[test]
fn test_from_toml_str_invalid_syntax() {
    let toml = r#"
        [eligibility
        suffix = "Context"
    "#;

    let result = Config::from_toml_str(toml);
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("Failed to parse TOML"));
}

#[test]
fn test_from_toml_str_unknown_policy() {
    let toml = r#"
        [eligibility]
        policy = "whatever"
    "#;

    assert!(Config::from_toml_str(toml).is_err());
}

#[test]
fn test_validate_rejects_empty_suffix() {
    let mut config = Config::default();
    config.eligibility.suffix = "  ".to_string();
    let result = config.validate();
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("eligibility.suffix"));
}

#[test]
fn test_validate_rejects_bad_extension() {
    let mut config = Config::default();

    config.output.extension = ".edmx".to_string();
    assert!(config.validate().is_err());

    config.output.extension = "models/edmx".to_string();
    assert!(config.validate().is_err());

    config.output.extension = String::new();
    assert!(config.validate().is_err());

    config.output.extension = "edmx".to_string();
    assert!(config.validate().is_ok());
}

#[test]
fn test_from_file_reads_values() {
    let file = create_temp_config_file(
        r#"
        [project]
        web_config_file = "web.config"
        build_output_dir = "bin/Release"
    "#,
    )
    .expect("temp config");

    let config = Config::from_file(file.path()).expect("Failed to load config file");
    assert_eq!(config.project.web_config_file, "web.config");
    assert_eq!(config.project.build_output_dir, "bin/Release");
    assert_eq!(config.project.app_config_file, "App.config");
}

#[test]
fn test_from_file_missing_file_uses_defaults() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = Config::from_file(&dir.path().join("absent.toml")).expect("defaults");
    assert_eq!(config.eligibility.suffix, "DataContext");
    assert_eq!(config.project.web_project_type_ids.len(), 2);
}

#[test]
fn test_env_overrides_file() {
    let file = create_temp_config_file(
        r#"
        [eligibility]
        base_type = "ObjectContext"
    "#,
    )
    .expect("temp config");

    let config = with_env_var("MODELGEN_ELIGIBILITY__BASE_TYPE", "IdentityDbContext", || {
        Config::from_file(file.path())
    })
    .expect("Failed to load config with env override");

    assert_eq!(config.eligibility.base_type, "IdentityDbContext");
}

#[test]
fn test_load_uses_solution_config_path() {
    let dir = tempfile::tempdir().expect("temp dir");
    std::fs::write(
        solution_config_path(dir.path()),
        "[eligibility]\nsuffix = \"Db\"\n",
    )
    .expect("write config");

    let config = Config::load(None, dir.path()).expect("load");
    assert_eq!(config.eligibility.suffix, "Db");
}
