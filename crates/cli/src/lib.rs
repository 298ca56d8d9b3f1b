//! Library interface for the modelgen CLI
//!
//! A [`Session`] binds one solution and one tool configuration. The file given
//! on the command line plays the part of the host selection.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use anyhow::{Context, Result};
use modelgen_core::host::{Selection, SelectionService};
use modelgen_core::{Config, EligibilityPolicy, Error};
use modelgen_pipeline::{
    Collaborators, DefaultInstantiator, EdmxSerializer, Eligibility, ModelGenerator,
    PipelineFailure, PipelineResult,
};
use modelgen_project::{BuildOutputTypeService, SolutionIndex};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Treats a file path as the current selection
///
/// The solution file selects the solution root, a project file or directory
/// selects that project, and any other file selects the item of the project
/// that contains it.
pub struct FileSelection<'a> {
    path: PathBuf,
    index: &'a SolutionIndex,
}

impl<'a> FileSelection<'a> {
    pub fn new(path: impl Into<PathBuf>, index: &'a SolutionIndex) -> Self {
        Self {
            path: path.into(),
            index,
        }
    }
}

impl SelectionService for FileSelection<'_> {
    fn acquire(&self) -> modelgen_core::Result<Selection> {
        if self.path == self.index.solution_path() {
            return Ok(Selection::SolutionRoot);
        }

        if let Some(project) = self
            .index
            .projects()
            .iter()
            .find(|p| p.path == self.path || p.directory == self.path)
        {
            return Ok(Selection::ProjectRoot(project.project_ref()));
        }

        let project = self.index.project_for_file(&self.path).ok_or_else(|| {
            Error::selection_invalid(format!(
                "{} is not inside any project of {}",
                self.path.display(),
                self.index.solution_path().display()
            ))
        })?;

        Ok(Selection::Item {
            path: self.path.clone(),
            project: project.project_ref(),
        })
    }

    fn release(&self) {
        debug!("Released selection of {}", self.path.display());
    }
}

/// Options shared by every subcommand
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub solution: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub strict: bool,
}

/// A loaded solution plus the configuration to run against it
pub struct Session {
    index: SolutionIndex,
    config: Config,
}

impl Session {
    /// Locate the solution for `file` and load the configuration
    ///
    /// Without `--solution` the nearest `.sln` at or above the file is used.
    /// The configuration comes from `--config`, else `modelgen.toml` next to
    /// the solution, else defaults.
    pub fn open(file: &Path, options: &SessionOptions) -> Result<Self> {
        let index = match &options.solution {
            Some(solution) => {
                let solution = absolute(solution)?;
                SolutionIndex::load(&solution)
                    .with_context(|| format!("Failed to load solution {}", solution.display()))?
            }
            None => SolutionIndex::discover(file)
                .with_context(|| format!("Failed to find a solution for {}", file.display()))?,
        };

        let mut config = Config::load(options.config.as_deref(), index.solution_dir())
            .context("Failed to load configuration")?;
        if options.strict {
            config.eligibility.policy = EligibilityPolicy::DerivedFromBaseType;
        }

        debug!(
            "Session for {} with {} project(s)",
            index.solution_path().display(),
            index.projects().len()
        );
        Ok(Self { index, config })
    }

    pub fn index(&self) -> &SolutionIndex {
        &self.index
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run only the eligibility gate for `file`
    pub fn check(&self, file: &Path) -> std::result::Result<Eligibility, PipelineFailure> {
        let selection = FileSelection::new(file, &self.index);
        self.with_generator(&selection, |generator| generator.check())
    }

    /// Run the full pipeline for `file`
    pub fn generate(&self, file: &Path) -> PipelineResult {
        let selection = FileSelection::new(file, &self.index);
        self.with_generator(&selection, |generator| generator.run())
    }

    fn with_generator<T>(
        &self,
        selection: &dyn SelectionService,
        f: impl FnOnce(&ModelGenerator<'_>) -> T,
    ) -> T {
        let types = BuildOutputTypeService::from_settings(&self.config.project);
        let collaborators = Collaborators {
            selection,
            projects: &self.index,
            types: &types,
            instantiator: &DefaultInstantiator,
            serializer: &EdmxSerializer,
        };
        let generator = ModelGenerator::new(self.config.clone(), collaborators);
        f(&generator)
    }
}

/// Absolute form of a command-line path, resolved against the working directory
pub fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).with_context(|| format!("Invalid path {}", path.display()))
}
