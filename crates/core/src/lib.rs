//! Core types and traits for the modelgen data-context model generator
//!
//! This crate provides the foundational abstractions used throughout
//! modelgen, including:
//!
//! - **Model**: source files, type declarations, resolved types, project configuration
//! - **Schema**: type descriptors from build output and instantiated contexts
//! - **Host**: collaborator traits for selection, project index, type resolution,
//!   instantiation and serialization
//! - **Configuration**: tool configuration management
//! - **Error handling**: unified error types
//!

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod config;
pub mod error;
pub mod host;
pub mod model;
pub mod schema;

// Re-export main types for convenience
pub use config::{Config, EligibilityConfig, EligibilityPolicy, OutputConfig, ProjectSettings};
pub use error::{Error, Result, ResultExt};
pub use model::{
    ConnectionStringEntry, DeclarationKind, GeneratedModelArtifact, Inspection, NamespaceScope,
    ProjectConfiguration, ProjectRef, ResolvedType, SourceFile, TypeDeclaration,
    TypeDeclarationBuilder,
};
pub use schema::{
    ContextInstance, EntitySetDescriptor, EntityTypeDescriptor, PropertyDescriptor, TypeDescriptor,
};

/// Version of the core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Result, ResultExt};
    pub use crate::model::{SourceFile, TypeDeclaration};
}
