//! Model generation pipeline for data-context source files
//!
//! [`ModelGenerator`] runs a selection through the linear sequence of
//! [`PipelineStage`]s. Host services are passed in as [`Collaborators`];
//! [`DefaultInstantiator`] and [`EdmxSerializer`] are the stock
//! implementations for the instantiation and serialization steps.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

mod artifact;
pub mod eligibility;
mod generator;
mod instantiator;
pub mod selection;
mod serializer;
mod stage;

pub use artifact::write_atomically;
pub use eligibility::{source_file_from_selection, Eligibility, EligibilityGate, IneligibleReason};
pub use generator::{Collaborators, ModelGenerator, PipelineOutcome, PipelineResult};
pub use instantiator::DefaultInstantiator;
pub use selection::SelectionGuard;
pub use serializer::EdmxSerializer;
pub use stage::{PipelineFailure, PipelineStage};
