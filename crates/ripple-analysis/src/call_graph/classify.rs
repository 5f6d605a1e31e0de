//! Helper-function classification.

use ripple_core::constants::{HELPER_MAX_PARAMETERS, HELPER_MAX_STATEMENTS, HELPER_NAME_PATTERNS};

use crate::parsers::types::Declaration;

/// Whether a declaration looks like a low-level utility.
///
/// True for single-underscore names, names containing a helper pattern, or
/// short bodies with few parameters.
pub fn is_helper(declaration: &Declaration) -> bool {
    is_helper_name(&declaration.name)
        || (declaration.statement_count < HELPER_MAX_STATEMENTS
            && declaration.parameter_count <= HELPER_MAX_PARAMETERS)
}

pub fn is_helper_name(name: &str) -> bool {
    if name.starts_with('_') && !name.starts_with("__") {
        return true;
    }
    let lower = name.to_lowercase();
    HELPER_NAME_PATTERNS.iter().any(|p| lower.contains(p))
}
