//! File-system solution index
//!
//! Reads a `.sln` file and the project files it references. A project's unique
//! name is its solution-relative path with forward slashes, e.g.
//! `App.Data/App.Data.csproj`.

use crate::project_file::{read_project_file, ProjectFileInfo};
use modelgen_core::error::{Error, Result};
use modelgen_core::host::{HierarchyHandle, ProjectIndex};
use modelgen_core::ProjectRef;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Project kind id of solution folders, which are not projects
pub const SOLUTION_FOLDER_KIND: &str = "{2150E333-8FDC-42A3-9474-1A3956D46DE8}";

/// A project entry of the solution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionProject {
    pub name: String,
    pub unique_name: String,
    pub project_guid: String,
    pub kind: String,
    /// Absolute path of the project file, or the directory for web site projects
    pub path: PathBuf,
    pub directory: PathBuf,
    pub assembly_name: String,
    /// Solution kind plus the project file's `ProjectTypeGuids`, in that order
    pub type_ids: Vec<String>,
}

impl SolutionProject {
    pub fn handle(&self) -> HierarchyHandle {
        HierarchyHandle {
            unique_name: self.unique_name.clone(),
            name: self.name.clone(),
            assembly_name: self.assembly_name.clone(),
            directory: self.directory.clone(),
        }
    }

    pub fn project_ref(&self) -> ProjectRef {
        ProjectRef::new(self.unique_name.clone())
    }
}

/// Index of the projects in one solution
#[derive(Debug, Clone, Default)]
pub struct SolutionIndex {
    solution_path: PathBuf,
    projects: Vec<SolutionProject>,
}

impl SolutionIndex {
    /// Build an index directly from project entries
    pub fn from_projects(solution_path: impl Into<PathBuf>, projects: Vec<SolutionProject>) -> Self {
        Self {
            solution_path: solution_path.into(),
            projects,
        }
    }

    /// Load a `.sln` file and every project file it references
    pub fn load(solution_path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(solution_path).map_err(|e| {
            Error::parse(
                solution_path.display().to_string(),
                format!("Failed to read solution file: {e}"),
            )
        })?;

        let solution_dir = solution_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let mut projects = Vec::new();
        for entry in parse_solution_entries(&content) {
            if entry.kind.eq_ignore_ascii_case(SOLUTION_FOLDER_KIND) {
                continue;
            }
            projects.push(load_project(&solution_dir, entry)?);
        }

        debug!(
            "Loaded solution {} with {} project(s)",
            solution_path.display(),
            projects.len()
        );

        Ok(Self {
            solution_path: solution_path.to_path_buf(),
            projects,
        })
    }

    /// Find the nearest `.sln` at or above `start` and load it
    pub fn discover(start: &Path) -> Result<Self> {
        let path = find_solution_file(start)?;
        Self::load(&path)
    }

    pub fn solution_path(&self) -> &Path {
        &self.solution_path
    }

    pub fn solution_dir(&self) -> &Path {
        self.solution_path.parent().unwrap_or(Path::new(""))
    }

    pub fn projects(&self) -> &[SolutionProject] {
        &self.projects
    }

    /// Look a project up by unique name (case-insensitive, either slash style)
    pub fn project(&self, unique_name: &str) -> Option<&SolutionProject> {
        let wanted = normalize_unique_name(unique_name);
        self.projects
            .iter()
            .find(|p| p.unique_name.eq_ignore_ascii_case(&wanted))
    }

    /// Project whose directory is the longest prefix of `file_path`
    pub fn project_for_file(&self, file_path: &Path) -> Option<&SolutionProject> {
        self.projects
            .iter()
            .filter(|p| file_path.starts_with(&p.directory))
            .max_by_key(|p| p.directory.components().count())
    }
}

impl ProjectIndex for SolutionIndex {
    fn resolve(&self, unique_name: &str) -> Option<HierarchyHandle> {
        self.project(unique_name).map(SolutionProject::handle)
    }

    fn project_type_ids(&self, hierarchy: &HierarchyHandle) -> Result<BTreeSet<String>> {
        let project = self
            .project(&hierarchy.unique_name)
            .ok_or_else(|| Error::project_not_indexed(&hierarchy.unique_name))?;
        Ok(project.type_ids.iter().cloned().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SolutionEntry {
    kind: String,
    name: String,
    relative_path: String,
    guid: String,
}

/// Parse `Project("{kind}") = "Name", "Rel\Path.csproj", "{guid}"` lines
fn parse_solution_entries(content: &str) -> Vec<SolutionEntry> {
    content
        .lines()
        .map(str::trim_start)
        .filter(|line| line.starts_with("Project(\""))
        .filter_map(|line| {
            let parts: Vec<&str> = line.split('"').collect();
            if parts.len() < 8 {
                warn!("Skipping malformed solution line: {line}");
                return None;
            }
            Some(SolutionEntry {
                kind: parts[1].to_string(),
                name: parts[3].to_string(),
                relative_path: parts[5].to_string(),
                guid: parts[7].to_string(),
            })
        })
        .collect()
}

fn load_project(solution_dir: &Path, entry: SolutionEntry) -> Result<SolutionProject> {
    let unique_name = normalize_unique_name(&entry.relative_path);
    let path = solution_dir.join(&unique_name);

    // Web site projects reference a directory instead of a project file
    let (directory, info) = if path.is_dir() {
        (path.clone(), ProjectFileInfo::default())
    } else {
        let directory = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| solution_dir.to_path_buf());
        let info = if path.exists() {
            match read_project_file(&path) {
                Ok(info) => info,
                Err(e) => {
                    warn!("Ignoring unreadable project file {}: {e}", path.display());
                    ProjectFileInfo::default()
                }
            }
        } else {
            warn!(
                "Project file {} listed in solution does not exist",
                path.display()
            );
            ProjectFileInfo::default()
        };
        (directory, info)
    };

    let mut type_ids = vec![entry.kind.clone()];
    for id in info.type_ids {
        if !type_ids.iter().any(|known| known.eq_ignore_ascii_case(&id)) {
            type_ids.push(id);
        }
    }

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| entry.name.clone());

    Ok(SolutionProject {
        assembly_name: info.assembly_name.unwrap_or_else(|| name.clone()),
        name,
        unique_name,
        project_guid: entry.guid,
        kind: entry.kind,
        path,
        directory,
        type_ids,
    })
}

fn normalize_unique_name(name: &str) -> String {
    name.replace('\\', "/")
}

/// Walk up from `start` to the first directory containing a `.sln` file
///
/// When a directory holds several solutions the alphabetically first is used.
pub fn find_solution_file(start: &Path) -> Result<PathBuf> {
    let mut dir = if start.is_dir() {
        Some(start)
    } else {
        start.parent()
    };

    while let Some(current) = dir {
        let pattern = current.join("*.sln");
        let pattern_str = pattern.to_string_lossy();
        let mut matches: Vec<PathBuf> = glob::glob(&pattern_str)
            .map_err(|e| Error::config(format!("Invalid glob pattern '{pattern_str}': {e}")))?
            .flatten()
            .collect();
        matches.sort();
        if let Some(first) = matches.into_iter().next() {
            return Ok(first);
        }
        dir = current.parent();
    }

    Err(Error::config(format!(
        "No solution file found at or above {}",
        start.display()
    )))
}
