//! Eligibility predicates over file names and inspected declarations
//!
//! [`matches_suffix_convention`] only looks at the file's base name and is meant
//! as the cheap pre-filter. [`is_derived_from_base_type`] needs an
//! [`Inspection`](modelgen_core::Inspection) and is the stricter check.

use modelgen_core::TypeDeclaration;

/// Case-insensitive suffix match against a file base name
pub fn matches_suffix_convention(base_name: &str, suffix: &str) -> bool {
    base_name.to_lowercase().ends_with(&suffix.to_lowercase())
}

/// True iff any declaration lists `base_type` among its direct base types
///
/// Only one level is checked; base types declared elsewhere are not followed.
pub fn is_derived_from_base_type(declarations: &[TypeDeclaration], base_type: &str) -> bool {
    declarations.iter().any(|declaration| {
        declaration
            .base_types
            .iter()
            .any(|written| base_name_matches(written, base_type))
    })
}

/// Compare a base type as written in source against a target name
///
/// Matches the written text as a whole, or its simple name: the last
/// `.`/`::` segment with type arguments dropped, so `System.Data.Entity.DbContext`
/// and `global::DbContext` both match `DbContext`. Comparison ignores case.
pub fn base_name_matches(written: &str, base_type: &str) -> bool {
    let written = written.trim();
    if written.eq_ignore_ascii_case(base_type) {
        return true;
    }
    simple_type_name(written).eq_ignore_ascii_case(base_type)
}

fn simple_type_name(written: &str) -> &str {
    let without_args = written.split('<').next().unwrap_or(written).trim();
    let after_alias = without_args
        .rsplit_once("::")
        .map_or(without_args, |(_, rest)| rest);
    after_alias
        .rsplit_once('.')
        .map_or(after_alias, |(_, rest)| rest)
        .trim()
}
