//! Symbol graph inspection for data-context source files
//!
//! Front-ends are registered per language through [`LanguageDescriptor`] and
//! selected by file extension. A file without a registered front-end yields
//! an empty [`Inspection`] rather than an error.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use modelgen_core::{error::Result, Error, Inspection};
use std::path::Path;
use tracing::debug;

mod csharp;

pub mod common;
pub mod predicates;

pub use csharp::CSharpInspector;
pub use predicates::{base_name_matches, is_derived_from_base_type, matches_suffix_convention};

/// Trait for inspecting the symbol structure of a source file
pub trait SymbolInspector: Send + Sync {
    /// Collect type declarations and the first namespace from source text
    fn inspect(&self, source: &str, file_path: &Path) -> Result<Inspection>;
}

/// Language descriptor for automatic registration
pub struct LanguageDescriptor {
    pub name: &'static str,
    pub extensions: &'static [&'static str],
    pub factory: fn() -> Result<Box<dyn SymbolInspector>>,
}

inventory::collect!(LanguageDescriptor);

/// Create an appropriate inspector for a file based on its extension
///
/// Returns Ok(None) if the file type is not supported, Err if inspector creation fails
pub fn create_inspector(file_path: &Path) -> Result<Option<Box<dyn SymbolInspector>>> {
    let Some(extension) = file_path.extension().and_then(|e| e.to_str()) else {
        return Ok(None);
    };

    let ext_lower = extension.to_lowercase();

    for descriptor in inventory::iter::<LanguageDescriptor> {
        if descriptor.extensions.contains(&ext_lower.as_str()) {
            return Ok(Some((descriptor.factory)()?));
        }
    }

    Ok(None)
}

/// Get the language identifier from a file path
pub fn detect_language(file_path: &Path) -> Option<&'static str> {
    let extension = file_path.extension()?.to_str()?;
    let ext_lower = extension.to_lowercase();

    for descriptor in inventory::iter::<LanguageDescriptor> {
        if descriptor.extensions.contains(&ext_lower.as_str()) {
            return Some(descriptor.name);
        }
    }

    None
}

/// Read a file from disk and inspect it
///
/// The file is read on every call; nothing is cached between invocations.
pub fn inspect_file(file_path: &Path) -> Result<Inspection> {
    let Some(inspector) = create_inspector(file_path)? else {
        debug!(
            "No symbol front-end for {}, returning empty inspection",
            file_path.display()
        );
        return Ok(Inspection::default());
    };

    let source = std::fs::read_to_string(file_path).map_err(|e| {
        Error::parse(
            file_path.display().to_string(),
            format!("Failed to read source file: {e}"),
        )
    })?;

    inspector.inspect(&source, file_path)
}
