//! Pipeline states and the failure diagnostic

use modelgen_core::Error;
use strum_macros::{Display, EnumIter};

/// States of one generation run, in the order they are reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum PipelineStage {
    Idle,
    EligibilityChecked,
    NamespaceResolved,
    TypeResolved,
    ConfigLoaded,
    Instantiated,
    Serialized,
    Completed,
    Failed,
}

impl PipelineStage {
    /// The state a successful run enters after this one
    pub fn next(self) -> Option<PipelineStage> {
        use PipelineStage::*;
        match self {
            Idle => Some(EligibilityChecked),
            EligibilityChecked => Some(NamespaceResolved),
            NamespaceResolved => Some(TypeResolved),
            TypeResolved => Some(ConfigLoaded),
            ConfigLoaded => Some(Instantiated),
            Instantiated => Some(Serialized),
            Serialized => Some(Completed),
            Completed | Failed => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineStage::Completed | PipelineStage::Failed)
    }
}

/// A run that ended in `Failed`
///
/// `stage` is the state the run was trying to reach and `operation` the
/// collaborator call that failed.
#[derive(Debug, thiserror::Error)]
#[error("Model generation failed reaching {stage} during {operation}: {source}")]
pub struct PipelineFailure {
    pub stage: PipelineStage,
    pub operation: &'static str,
    #[source]
    pub source: Error,
}

impl PipelineFailure {
    pub fn new(stage: PipelineStage, operation: &'static str, source: Error) -> Self {
        Self {
            stage,
            operation,
            source,
        }
    }

    /// Every message in the error chain, outermost first
    pub fn chain(&self) -> Vec<String> {
        let mut messages = vec![self.to_string()];
        let mut current: Option<&(dyn std::error::Error + 'static)> =
            std::error::Error::source(self);
        while let Some(err) = current {
            messages.push(err.to_string());
            current = err.source();
        }
        messages
    }
}
