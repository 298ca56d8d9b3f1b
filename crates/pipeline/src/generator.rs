//! Model generation orchestrator
//!
//! Drives one selection through eligibility, namespace and type resolution,
//! configuration loading, instantiation and serialization. Every step is a
//! guard; the first failing guard ends the run in `Failed` and nothing is
//! written.

use crate::artifact::write_atomically;
use crate::eligibility::{Eligibility, EligibilityGate, IneligibleReason};
use crate::selection::SelectionGuard;
use crate::stage::{PipelineFailure, PipelineStage};
use modelgen_core::error::Error;
use modelgen_core::host::{
    Instantiator, ProjectIndex, SchemaSerializer, SelectionService, TypeResolutionService,
};
use modelgen_core::{Config, GeneratedModelArtifact, Inspection, SourceFile};
use modelgen_languages::inspect_file;
use modelgen_project::{ConfigurationLoader, MetadataResolver};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Host services a generator works with
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub selection: &'a dyn SelectionService,
    pub projects: &'a dyn ProjectIndex,
    pub types: &'a dyn TypeResolutionService,
    pub instantiator: &'a dyn Instantiator,
    pub serializer: &'a dyn SchemaSerializer,
}

/// How a run ended when it did not fail
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    /// The selection is not a data-context file; nothing was done
    NotEligible(IneligibleReason),
    Completed(GeneratedModelArtifact),
}

pub type PipelineResult = std::result::Result<PipelineOutcome, PipelineFailure>;

/// Tracks the current state of a single run
struct Run {
    stage: PipelineStage,
}

impl Run {
    fn new() -> Self {
        Self {
            stage: PipelineStage::Idle,
        }
    }

    fn advance(&mut self, to: PipelineStage) {
        debug!("{} -> {}", self.stage, to);
        self.stage = to;
    }

    /// Fail while trying to reach the next state
    fn fail(&mut self, operation: &'static str, source: Error) -> PipelineFailure {
        let target = self.stage.next().unwrap_or(PipelineStage::Failed);
        warn!("{} -> {} ({operation}: {source})", self.stage, PipelineStage::Failed);
        self.stage = PipelineStage::Failed;
        PipelineFailure::new(target, operation, source)
    }
}

/// Generates a model file for the currently selected data-context source file
pub struct ModelGenerator<'a> {
    config: Config,
    collaborators: Collaborators<'a>,
    config_temp_dir: Option<PathBuf>,
}

impl<'a> ModelGenerator<'a> {
    pub fn new(config: Config, collaborators: Collaborators<'a>) -> Self {
        Self {
            config,
            collaborators,
            config_temp_dir: None,
        }
    }

    /// Directory for the temporary configuration copy (system temp otherwise)
    pub fn with_config_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_temp_dir = Some(dir.into());
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Evaluate only the eligibility gate for the current selection
    pub fn check(&self) -> std::result::Result<Eligibility, PipelineFailure> {
        let mut run = Run::new();
        self.check_selection(&mut run)
    }

    fn check_selection(&self, run: &mut Run) -> std::result::Result<Eligibility, PipelineFailure> {
        let guard = match SelectionGuard::acquire(self.collaborators.selection) {
            Ok(guard) => guard,
            Err(Error::SelectionInvalid(reason)) => {
                debug!("Selection unavailable: {reason}");
                return Ok(Eligibility::Ineligible(IneligibleReason::InvalidSelection(
                    reason,
                )));
            }
            Err(e) => return Err(run.fail("acquire_selection", e)),
        };

        let gate = EligibilityGate::new(self.config.eligibility.clone());
        gate.check(guard.selection())
            .map_err(|e| run.fail("is_eligible", e))
    }

    /// Run the whole pipeline once
    pub fn run(&self) -> PipelineResult {
        let mut run = Run::new();

        let (source, inspection) = match self.check_selection(&mut run)? {
            Eligibility::Eligible { source, inspection } => (source, inspection),
            Eligibility::Ineligible(reason) => {
                info!("Selection is not a data-context source file ({reason:?})");
                return Ok(PipelineOutcome::NotEligible(reason));
            }
        };
        run.advance(PipelineStage::EligibilityChecked);

        let full_name = self.resolve_full_name(&mut run, &source, inspection)?;
        run.advance(PipelineStage::NamespaceResolved);

        let resolver = MetadataResolver::new(self.collaborators.projects, self.collaborators.types);
        let resolved = resolver
            .resolve(source.project(), &full_name)
            .map_err(|e| run.fail("resolve", e))?;
        run.advance(PipelineStage::TypeResolved);

        let mut loader =
            ConfigurationLoader::new(self.collaborators.projects, self.config.project.clone());
        if let Some(dir) = &self.config_temp_dir {
            loader = loader.with_temp_dir(dir);
        }
        let configuration = loader
            .load(source.project())
            .map_err(|e| run.fail("load_project_configuration", e))?;
        run.advance(PipelineStage::ConfigLoaded);

        let instance = self
            .collaborators
            .instantiator
            .instantiate(&resolved, &configuration)
            .map_err(|e| run.fail("instantiate", e))?;
        run.advance(PipelineStage::Instantiated);

        let target = GeneratedModelArtifact::path_for(&source, &self.config.output.extension);
        write_atomically(&target, |out| {
            self.collaborators.serializer.serialize(&instance, out)
        })
        .map_err(|e| run.fail("serialize", e))?;
        run.advance(PipelineStage::Serialized);

        run.advance(PipelineStage::Completed);
        info!("Generated {} for '{}'", target.display(), full_name);
        Ok(PipelineOutcome::Completed(GeneratedModelArtifact { path: target }))
    }

    /// `<namespace>.<base name>`, from the gate's inspection or a fresh one
    fn resolve_full_name(
        &self,
        run: &mut Run,
        source: &SourceFile,
        inspection: Option<Inspection>,
    ) -> std::result::Result<String, PipelineFailure> {
        let inspection = match inspection {
            Some(inspection) => inspection,
            None => inspect_file(source.path()).map_err(|e| run.fail("inspect", e))?,
        };

        let namespace = inspection.namespace.ok_or_else(|| {
            run.fail(
                "find_namespace",
                Error::NamespaceMissing {
                    file: source.path().to_path_buf(),
                },
            )
        })?;

        Ok(namespace.qualify(source.base_name()))
    }
}
