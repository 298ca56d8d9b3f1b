//! Project-level collaborators for modelgen
//!
//! - [`solution`]: file-system solution index (`.sln` + project files)
//! - [`type_universe`]: per-project type lookup over build-output type manifests
//! - [`resolver`]: resolves a fully qualified name inside exactly one project
//! - [`configuration`]: loads a project's `Web.config` / `App.config`

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod configuration;
mod project_file;
pub mod resolver;
pub mod solution;
pub mod type_universe;

pub use configuration::{config_file_candidates, is_web_project, ConfigurationLoader};
pub use resolver::MetadataResolver;
pub use solution::{SolutionIndex, SolutionProject};
pub use type_universe::{BuildOutputTypeService, TypeManifest};
