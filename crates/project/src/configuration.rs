//! Project configuration loading
//!
//! Picks `Web.config` or `App.config` by project kind, copies the document to a
//! private temporary file and reads the copy into an isolated
//! [`ProjectConfiguration`]. The project's own file is only ever read, and the
//! temporary copy is removed on every exit path.

use modelgen_core::error::{Error, Result};
use modelgen_core::host::{HierarchyHandle, ProjectIndex};
use modelgen_core::{ConnectionStringEntry, ProjectConfiguration, ProjectRef, ProjectSettings};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::BTreeSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Whether a project's type ids intersect the web project type ids
pub fn is_web_project(type_ids: &BTreeSet<String>, settings: &ProjectSettings) -> bool {
    type_ids.iter().any(|id| {
        settings
            .web_project_type_ids
            .iter()
            .any(|web| web.eq_ignore_ascii_case(id))
    })
}

/// Configuration file names to try, the kind's own convention first
pub fn config_file_candidates<'s>(
    type_ids: &BTreeSet<String>,
    settings: &'s ProjectSettings,
) -> [&'s str; 2] {
    if is_web_project(type_ids, settings) {
        [&settings.web_config_file, &settings.app_config_file]
    } else {
        [&settings.app_config_file, &settings.web_config_file]
    }
}

/// Loads project-scoped configuration
pub struct ConfigurationLoader<'a> {
    index: &'a dyn ProjectIndex,
    settings: ProjectSettings,
    temp_dir: Option<PathBuf>,
}

impl<'a> ConfigurationLoader<'a> {
    pub fn new(index: &'a dyn ProjectIndex, settings: ProjectSettings) -> Self {
        Self {
            index,
            settings,
            temp_dir: None,
        }
    }

    /// Place temporary copies in `dir` instead of the system temp directory
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Load the configuration of `project`
    pub fn load(&self, project: &ProjectRef) -> Result<ProjectConfiguration> {
        let hierarchy = self
            .index
            .resolve(&project.unique_name)
            .ok_or_else(|| Error::project_not_indexed(&project.unique_name))?;
        let type_ids = self.index.project_type_ids(&hierarchy)?;

        let path = self.locate(&hierarchy, &type_ids)?;
        debug!(
            "Loading configuration for '{}' from {}",
            hierarchy.unique_name,
            path.display()
        );

        let document = std::fs::read_to_string(&path).map_err(|e| {
            Error::parse(
                path.display().to_string(),
                format!("Failed to read configuration file: {e}"),
            )
        })?;

        let mut copy = self.temp_file()?;
        copy.write_all(document.as_bytes())?;
        copy.flush()?;

        let content = std::fs::read_to_string(copy.path())?;
        let parsed = parse_configuration(&content, &path);
        // the copy is removed here on success, or by drop if close itself fails
        copy.close()?;
        let (app_settings, connection_strings) = parsed?;

        Ok(ProjectConfiguration {
            project: hierarchy.unique_name,
            source_path: path,
            app_settings,
            connection_strings,
        })
    }

    fn locate(&self, hierarchy: &HierarchyHandle, type_ids: &BTreeSet<String>) -> Result<PathBuf> {
        let candidates = config_file_candidates(type_ids, &self.settings);
        for (position, name) in candidates.iter().enumerate() {
            if let Some(path) = find_file_ignoring_case(&hierarchy.directory, name) {
                if position > 0 {
                    warn!(
                        "Project '{}' has no {}, falling back to {}",
                        hierarchy.unique_name, candidates[0], name
                    );
                }
                return Ok(path);
            }
        }

        Err(Error::ConfigFileMissing {
            project: hierarchy.unique_name.clone(),
            candidates: candidates.iter().map(|c| c.to_string()).collect(),
        })
    }

    fn temp_file(&self) -> Result<tempfile::NamedTempFile> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("modelgen-").suffix(".config");
        let file = match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        Ok(file)
    }
}

/// Exact name first, then a case-insensitive match among the directory entries
fn find_file_ignoring_case(directory: &Path, name: &str) -> Option<PathBuf> {
    let exact = directory.join(name);
    if exact.is_file() {
        return Some(exact);
    }

    let entries = std::fs::read_dir(directory).ok()?;
    let mut matches: Vec<PathBuf> = entries
        .flatten()
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|file_name| file_name.eq_ignore_ascii_case(name))
        })
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    matches.sort();
    matches.into_iter().next()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    AppSettings,
    ConnectionStrings,
}

type ParsedConfiguration = (Vec<(String, String)>, Vec<ConnectionStringEntry>);

/// Read `appSettings` and `connectionStrings` directly under `configuration`
///
/// `add`, `remove` and `clear` are applied in document order. Adding an
/// existing key replaces its value in place.
fn parse_configuration(content: &str, origin: &Path) -> Result<ParsedConfiguration> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut app_settings: Vec<(String, String)> = Vec::new();
    let mut connection_strings: Vec<ConnectionStringEntry> = Vec::new();
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let parse_error = |message: String| Error::parse(origin.display().to_string(), message);

    loop {
        let event = reader.read_event().map_err(|e| {
            parse_error(format!(
                "XML parse error at position {}: {e}",
                reader.error_position()
            ))
        })?;

        match event {
            Event::Start(e) => {
                if let Some(section) = current_section(&stack) {
                    apply_entry(
                        section,
                        &e,
                        &mut app_settings,
                        &mut connection_strings,
                        &parse_error,
                    )?;
                }
                stack.push(e.local_name().as_ref().to_vec());
            }
            Event::Empty(e) => {
                if let Some(section) = current_section(&stack) {
                    apply_entry(
                        section,
                        &e,
                        &mut app_settings,
                        &mut connection_strings,
                        &parse_error,
                    )?;
                }
            }
            Event::End(_) => {
                stack.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if stack.first().map(Vec::as_slice) == Some(b"configuration".as_slice()) {
        return Err(parse_error("Unclosed <configuration> element".to_string()));
    }

    Ok((app_settings, connection_strings))
}

/// Section whose entries are applied at this depth; only direct children of
/// `<configuration>` count.
fn current_section(stack: &[Vec<u8>]) -> Option<Section> {
    match stack {
        [root, section] if root.as_slice() == b"configuration" => match section.as_slice() {
            b"appSettings" => Some(Section::AppSettings),
            b"connectionStrings" => Some(Section::ConnectionStrings),
            _ => None,
        },
        _ => None,
    }
}

fn apply_entry(
    section: Section,
    element: &BytesStart<'_>,
    app_settings: &mut Vec<(String, String)>,
    connection_strings: &mut Vec<ConnectionStringEntry>,
    parse_error: &dyn Fn(String) -> Error,
) -> Result<()> {
    let tag = element.local_name();
    match (section, tag.as_ref()) {
        (Section::AppSettings, b"clear") => app_settings.clear(),
        (Section::ConnectionStrings, b"clear") => connection_strings.clear(),
        (Section::AppSettings, b"remove") => {
            if let Some(key) = attribute(element, "key", parse_error)? {
                app_settings.retain(|(k, _)| !k.eq_ignore_ascii_case(&key));
            }
        }
        (Section::ConnectionStrings, b"remove") => {
            if let Some(name) = attribute(element, "name", parse_error)? {
                connection_strings.retain(|entry| !entry.name.eq_ignore_ascii_case(&name));
            }
        }
        (Section::AppSettings, b"add") => {
            let key = attribute(element, "key", parse_error)?
                .ok_or_else(|| parse_error("appSettings <add> without key".to_string()))?;
            let value = attribute(element, "value", parse_error)?.unwrap_or_default();
            match app_settings.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(&key)) {
                Some(existing) => existing.1 = value,
                None => app_settings.push((key, value)),
            }
        }
        (Section::ConnectionStrings, b"add") => {
            let name = attribute(element, "name", parse_error)?
                .ok_or_else(|| parse_error("connectionStrings <add> without name".to_string()))?;
            let entry = ConnectionStringEntry {
                connection_string: attribute(element, "connectionString", parse_error)?
                    .unwrap_or_default(),
                provider_name: attribute(element, "providerName", parse_error)?,
                name,
            };
            match connection_strings
                .iter_mut()
                .find(|existing| existing.name.eq_ignore_ascii_case(&entry.name))
            {
                Some(existing) => *existing = entry,
                None => connection_strings.push(entry),
            }
        }
        _ => {}
    }
    Ok(())
}

fn attribute(
    element: &BytesStart<'_>,
    name: &str,
    parse_error: &dyn Fn(String) -> Error,
) -> Result<Option<String>> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| parse_error(format!("Invalid attribute: {e}")))?;
        if attr.key.local_name().as_ref() == name.as_bytes() {
            let value = attr
                .unescape_value()
                .map_err(|e| parse_error(format!("Invalid attribute value: {e}")))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelgen_core::config::{WEB_APPLICATION_PROJECT_TYPE_ID, WEB_SITE_PROJECT_TYPE_ID};
    use pretty_assertions::assert_eq;

    fn ids(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_web_application_selects_web_config() {
        let settings = ProjectSettings::default();
        let type_ids = ids(&[
            WEB_APPLICATION_PROJECT_TYPE_ID,
            "{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}",
        ]);
        assert!(is_web_project(&type_ids, &settings));
        assert_eq!(
            config_file_candidates(&type_ids, &settings),
            ["Web.config", "App.config"]
        );
    }

    #[test]
    fn test_web_site_selects_web_config_ignoring_case() {
        let settings = ProjectSettings::default();
        let type_ids = ids(&["{e24c65dc-7377-472b-9aba-bc803b73c61a}"]);
        assert!(is_web_project(&type_ids, &settings));
        assert_eq!(config_file_candidates(&type_ids, &settings)[0], "Web.config");
        assert!(WEB_SITE_PROJECT_TYPE_ID.eq_ignore_ascii_case("{e24c65dc-7377-472b-9aba-bc803b73c61a}"));
    }

    #[test]
    fn test_other_kinds_select_app_config() {
        let settings = ProjectSettings::default();
        for type_ids in [
            ids(&[]),
            ids(&["{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}"]),
            ids(&["{60DC8134-EBA5-43B8-BCC9-BB4BC16C2548}", "{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}"]),
        ] {
            assert!(!is_web_project(&type_ids, &settings));
            assert_eq!(
                config_file_candidates(&type_ids, &settings),
                ["App.config", "Web.config"]
            );
        }
    }

    #[test]
    fn test_parse_sections_in_order() {
        let content = r#"<?xml version="1.0" encoding="utf-8"?>
<configuration>
  <configSections>
    <section name="entityFramework" type="X" />
  </configSections>
  <appSettings>
    <add key="Mode" value="Debug" />
    <add key="Retries" value="3" />
  </appSettings>
  <connectionStrings>
    <add name="OrdersDataContext" connectionString="Data Source=.;Initial Catalog=Orders" providerName="System.Data.SqlClient" />
  </connectionStrings>
</configuration>"#;

        let (settings, connections) = parse_configuration(content, Path::new("App.config")).unwrap();
        assert_eq!(
            settings,
            vec![
                ("Mode".to_string(), "Debug".to_string()),
                ("Retries".to_string(), "3".to_string())
            ]
        );
        assert_eq!(
            connections,
            vec![ConnectionStringEntry {
                name: "OrdersDataContext".to_string(),
                connection_string: "Data Source=.;Initial Catalog=Orders".to_string(),
                provider_name: Some("System.Data.SqlClient".to_string()),
            }]
        );
    }

    #[test]
    fn test_add_remove_clear_merge() {
        let content = r#"<configuration>
  <appSettings>
    <add key="A" value="1" />
    <add key="B" value="2" />
    <add key="A" value="10" />
    <remove key="B" />
  </appSettings>
  <connectionStrings>
    <add name="Old" connectionString="x" />
    <clear />
    <add name="New" connectionString="y" />
  </connectionStrings>
</configuration>"#;

        let (settings, connections) = parse_configuration(content, Path::new("Web.config")).unwrap();
        assert_eq!(settings, vec![("A".to_string(), "10".to_string())]);
        assert_eq!(connections.len(), 1);
        assert_eq!(connections[0].name, "New");
        assert_eq!(connections[0].provider_name, None);
    }

    #[test]
    fn test_nested_sections_are_ignored() {
        let content = r#"<configuration>
  <location path="admin">
    <appSettings>
      <add key="Nested" value="1" />
    </appSettings>
  </location>
</configuration>"#;

        let (settings, _) = parse_configuration(content, Path::new("Web.config")).unwrap();
        assert!(settings.is_empty());
    }

    #[test]
    fn test_escaped_values() {
        let content = r#"<configuration><appSettings><add key="Q" value="a &amp; b" /></appSettings></configuration>"#;
        let (settings, _) = parse_configuration(content, Path::new("App.config")).unwrap();
        assert_eq!(settings[0].1, "a & b");
    }

    #[test]
    fn test_malformed_configuration() {
        let result = parse_configuration("<configuration><appSettings>", Path::new("App.config"));
        assert!(matches!(result, Err(Error::Parse { .. })));
    }

    #[test]
    fn test_entries_with_closing_tags() {
        let content = r#"<configuration>
  <connectionStrings>
    <add name="Stale" connectionString="z"></add>
    <clear></clear>
    <add name="OrdersDb" connectionString="x"></add>
  </connectionStrings>
  <appSettings>
    <add key="A" value="1"></add>
    <add key="B" value="2" />
    <remove key="A"></remove>
  </appSettings>
</configuration>"#;

        let (settings, connections) = parse_configuration(content, Path::new("App.config")).unwrap();
        assert_eq!(settings, vec![("B".to_string(), "2".to_string())]);
        assert_eq!(connections.len(), 1);
        assert_eq!(connections[0].name, "OrdersDb");
        assert_eq!(connections[0].connection_string, "x");
    }

    #[test]
    fn test_keys_and_names_ignore_case() {
        let content = r#"<configuration>
  <appSettings>
    <add key="Mode" value="Debug" />
    <add key="MODE" value="Release" />
    <add key="Retries" value="3" />
    <remove key="retries" />
  </appSettings>
  <connectionStrings>
    <add name="Orders" connectionString="a" />
    <add name="ORDERS" connectionString="b" />
    <add name="Audit" connectionString="c" />
    <remove name="audit" />
  </connectionStrings>
</configuration>"#;

        let (settings, connections) = parse_configuration(content, Path::new("App.config")).unwrap();
        assert_eq!(settings, vec![("Mode".to_string(), "Release".to_string())]);
        assert_eq!(connections.len(), 1);
        assert_eq!(connections[0].name, "ORDERS");
        assert_eq!(connections[0].connection_string, "b");

        let (_, connections) = parse_configuration(
            r#"<configuration><connectionStrings><add name="Orders" connectionString="a" /><remove name="orders" /></connectionStrings></configuration>"#,
            Path::new("App.config"),
        )
        .unwrap();
        assert!(connections.is_empty());
    }

    #[test]
    fn test_add_without_key_is_rejected() {
        let content = r#"<configuration><appSettings><add value="1" /></appSettings></configuration>"#;
        let result = parse_configuration(content, Path::new("App.config"));
        assert!(matches!(result, Err(Error::Parse { .. })));
    }
    use crate::solution::{SolutionIndex, SolutionProject};

    fn index_with(directory: &Path, type_ids: &[&str]) -> SolutionIndex {
        SolutionIndex::from_projects(
            directory.join("App.sln"),
            vec![SolutionProject {
                name: "App".to_string(),
                unique_name: "App/App.csproj".to_string(),
                project_guid: "{11111111-1111-1111-1111-111111111111}".to_string(),
                kind: "{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}".to_string(),
                path: directory.join("App.csproj"),
                directory: directory.to_path_buf(),
                assembly_name: "App".to_string(),
                type_ids: type_ids.iter().map(|id| id.to_string()).collect(),
            }],
        )
    }

    const WEB_CONFIG: &str = r#"<configuration><connectionStrings><add name="Web" connectionString="web" /></connectionStrings></configuration>"#;
    const APP_CONFIG: &str = r#"<configuration><connectionStrings><add name="App" connectionString="app" /></connectionStrings></configuration>"#;

    #[test]
    fn test_loader_reads_kind_specific_file() {
        let project_dir = tempfile::tempdir().unwrap();
        let scratch = tempfile::tempdir().unwrap();
        std::fs::write(project_dir.path().join("Web.config"), WEB_CONFIG).unwrap();
        std::fs::write(project_dir.path().join("App.config"), APP_CONFIG).unwrap();

        let web = index_with(project_dir.path(), &[WEB_APPLICATION_PROJECT_TYPE_ID]);
        let loaded = ConfigurationLoader::new(&web, ProjectSettings::default())
            .with_temp_dir(scratch.path())
            .load(&ProjectRef::new("App/App.csproj"))
            .unwrap();
        assert_eq!(loaded.connection_strings[0].name, "Web");
        assert_eq!(loaded.source_path, project_dir.path().join("Web.config"));

        let library = index_with(project_dir.path(), &[]);
        let loaded = ConfigurationLoader::new(&library, ProjectSettings::default())
            .with_temp_dir(scratch.path())
            .load(&ProjectRef::new("App/App.csproj"))
            .unwrap();
        assert_eq!(loaded.connection_strings[0].name, "App");

        // temporary copies are gone and the originals untouched
        assert_eq!(std::fs::read_dir(scratch.path()).unwrap().count(), 0);
        assert_eq!(
            std::fs::read_to_string(project_dir.path().join("Web.config")).unwrap(),
            WEB_CONFIG
        );
    }

    #[test]
    fn test_loader_falls_back_to_other_convention() {
        let project_dir = tempfile::tempdir().unwrap();
        std::fs::write(project_dir.path().join("web.CONFIG"), WEB_CONFIG).unwrap();

        let library = index_with(project_dir.path(), &[]);
        let loaded = ConfigurationLoader::new(&library, ProjectSettings::default())
            .load(&ProjectRef::new("App/App.csproj"))
            .unwrap();
        assert_eq!(loaded.connection_string("web").unwrap().connection_string, "web");
    }

    #[test]
    fn test_loader_reports_missing_file() {
        let project_dir = tempfile::tempdir().unwrap();
        let scratch = tempfile::tempdir().unwrap();
        let web = index_with(project_dir.path(), &[WEB_SITE_PROJECT_TYPE_ID]);

        let result = ConfigurationLoader::new(&web, ProjectSettings::default())
            .with_temp_dir(scratch.path())
            .load(&ProjectRef::new("App/App.csproj"));
        match result {
            Err(Error::ConfigFileMissing { project, candidates }) => {
                assert_eq!(project, "App/App.csproj");
                assert_eq!(candidates, vec!["Web.config", "App.config"]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(std::fs::read_dir(scratch.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_loader_removes_copy_when_parse_fails() {
        let project_dir = tempfile::tempdir().unwrap();
        let scratch = tempfile::tempdir().unwrap();
        std::fs::write(project_dir.path().join("App.config"), "<configuration><appSettings>").unwrap();

        let library = index_with(project_dir.path(), &[]);
        let result = ConfigurationLoader::new(&library, ProjectSettings::default())
            .with_temp_dir(scratch.path())
            .load(&ProjectRef::new("App/App.csproj"));
        assert!(matches!(result, Err(Error::Parse { .. })));
        assert_eq!(std::fs::read_dir(scratch.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_loader_unknown_project() {
        let project_dir = tempfile::tempdir().unwrap();
        let index = index_with(project_dir.path(), &[]);
        let result = ConfigurationLoader::new(&index, ProjectSettings::default())
            .load(&ProjectRef::new("Other/Other.csproj"));
        assert!(matches!(result, Err(Error::ProjectNotIndexed { .. })));
    }
}
