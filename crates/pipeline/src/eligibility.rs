//! Eligibility gate
//!
//! Decides whether the current selection is a data-context source file. The
//! naming convention is checked first and, when it fails, the file is never
//! read. The stricter policy additionally inspects the file's declarations.

use modelgen_core::error::{Error, Result};
use modelgen_core::host::Selection;
use modelgen_core::{EligibilityConfig, EligibilityPolicy, Inspection, SourceFile};
use modelgen_languages::{inspect_file, is_derived_from_base_type, matches_suffix_convention};
use tracing::debug;

/// Outcome of the gate
#[derive(Debug, Clone, PartialEq)]
pub enum Eligibility {
    /// The file qualifies; `inspection` is present when the gate already read it
    Eligible {
        source: SourceFile,
        inspection: Option<Inspection>,
    },
    Ineligible(IneligibleReason),
}

impl Eligibility {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Eligibility::Eligible { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IneligibleReason {
    /// Not exactly one project item selected
    InvalidSelection(String),
    /// Base name lacks the configured suffix
    NameConvention { base_name: String },
    /// No declaration derives from the configured base type
    NotDerived { base_type: String },
}

/// Turn a selection into the single source file it designates
///
/// Anything other than one item inside a project is `SelectionInvalid`.
pub fn source_file_from_selection(selection: &Selection) -> Result<SourceFile> {
    match selection {
        Selection::Item { path, project } => SourceFile::new(path.clone(), project.clone())
            .map_err(|e| Error::selection_invalid(e.to_string())),
        Selection::Nothing => Err(Error::selection_invalid("nothing is selected")),
        Selection::Multiple(count) => Err(Error::selection_invalid(format!(
            "{count} items are selected"
        ))),
        Selection::SolutionRoot => Err(Error::selection_invalid("the solution is selected")),
        Selection::ProjectRoot(project) => Err(Error::selection_invalid(format!(
            "project '{project}' is selected, not a file"
        ))),
    }
}

pub struct EligibilityGate {
    config: EligibilityConfig,
}

impl EligibilityGate {
    pub fn new(config: EligibilityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EligibilityConfig {
        &self.config
    }

    /// Evaluate a selection
    ///
    /// An invalid selection is reported as ineligible, not as an error. Errors
    /// only come from reading the file under the stricter policy.
    pub fn check(&self, selection: &Selection) -> Result<Eligibility> {
        let source = match source_file_from_selection(selection) {
            Ok(source) => source,
            Err(Error::SelectionInvalid(reason)) => {
                debug!("Selection is not eligible: {reason}");
                return Ok(Eligibility::Ineligible(IneligibleReason::InvalidSelection(
                    reason,
                )));
            }
            Err(e) => return Err(e),
        };

        if !matches_suffix_convention(source.base_name(), &self.config.suffix) {
            debug!(
                "'{}' does not end with '{}'",
                source.base_name(),
                self.config.suffix
            );
            return Ok(Eligibility::Ineligible(IneligibleReason::NameConvention {
                base_name: source.base_name().to_string(),
            }));
        }

        match self.config.policy {
            EligibilityPolicy::NamingConvention => Ok(Eligibility::Eligible {
                source,
                inspection: None,
            }),
            EligibilityPolicy::DerivedFromBaseType => {
                let inspection = inspect_file(source.path())?;
                if is_derived_from_base_type(&inspection.declarations, &self.config.base_type) {
                    Ok(Eligibility::Eligible {
                        source,
                        inspection: Some(inspection),
                    })
                } else {
                    debug!(
                        "No declaration in {} derives from '{}'",
                        source.path().display(),
                        self.config.base_type
                    );
                    Ok(Eligibility::Ineligible(IneligibleReason::NotDerived {
                        base_type: self.config.base_type.clone(),
                    }))
                }
            }
        }
    }

    /// Boolean form of [`check`](Self::check); read errors count as ineligible
    pub fn is_eligible(&self, selection: &Selection) -> bool {
        match self.check(selection) {
            Ok(eligibility) => eligibility.is_eligible(),
            Err(e) => {
                debug!("Eligibility check failed: {e}");
                false
            }
        }
    }
}
