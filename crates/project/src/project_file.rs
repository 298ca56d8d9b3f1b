//! Minimal project file (`.csproj`/`.vbproj`) reader
//!
//! Only the properties the index needs are read: `ProjectTypeGuids` and
//! `AssemblyName`. The first occurrence of each wins.

use modelgen_core::error::{Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ProjectFileInfo {
    pub type_ids: Vec<String>,
    pub assembly_name: Option<String>,
}

pub(crate) fn read_project_file(path: &Path) -> Result<ProjectFileInfo> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::parse(
            path.display().to_string(),
            format!("Failed to read project file: {e}"),
        )
    })?;
    parse_project_file(&content, path)
}

pub(crate) fn parse_project_file(content: &str, path: &Path) -> Result<ProjectFileInfo> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut info = ProjectFileInfo::default();
    let mut current: Option<Vec<u8>> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                current = Some(e.local_name().as_ref().to_vec());
            }
            Ok(Event::End(_)) => {
                current = None;
            }
            Ok(Event::Text(text)) => {
                let Some(element) = current.as_deref() else {
                    continue;
                };
                let value = text
                    .unescape()
                    .map_err(|e| Error::parse(path.display().to_string(), e.to_string()))?;
                match element {
                    b"ProjectTypeGuids" if info.type_ids.is_empty() => {
                        info.type_ids = split_type_ids(&value);
                    }
                    b"AssemblyName" if info.assembly_name.is_none() => {
                        let name = value.trim();
                        if !name.is_empty() {
                            info.assembly_name = Some(name.to_string());
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::parse(
                    path.display().to_string(),
                    format!(
                        "XML parse error at position {}: {e}",
                        reader.error_position()
                    ),
                ));
            }
            _ => {}
        }
    }

    Ok(info)
}

/// `{A};{B}` -> `["{A}", "{B}"]`
pub(crate) fn split_type_ids(value: &str) -> Vec<String> {
    value
        .split(';')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}
