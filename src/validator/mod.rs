mod types;

pub use types::*;

use crate::pattern::{
    has_path_separator, placeholder_runs, MAX_PLACEHOLDER_WIDTH, MIN_PLACEHOLDER_WIDTH,
};
use crate::rename::RenameOptions;
use std::path::Path;
use tracing::{debug, info};

/// Check the folder and options before any plan is built.
///
/// Returns every broken rule in order; an empty list means the request may
/// proceed. The only filesystem access is a single directory-existence check,
/// and it is skipped entirely when no folder was given.
pub fn validate_inputs(folder: &Path, options: &RenameOptions) -> Vec<Violation> {
    let mut violations = Vec::new();

    if folder.as_os_str().to_string_lossy().trim().is_empty() {
        violations.push(Violation::MissingFolder);
        return violations;
    }

    if !folder.is_dir() {
        violations.push(Violation::FolderNotFound);
    }

    if options.pattern.trim().is_empty() {
        violations.push(Violation::MissingPattern);
    } else {
        if let Some(violation) = check_placeholder(&options.pattern) {
            violations.push(violation);
        }
        if has_path_separator(&options.pattern) {
            violations.push(Violation::PathSeparator);
        }
    }

    if options.change_extension {
        let missing = options
            .new_extension
            .as_deref()
            .map_or(true, |ext| ext.trim().is_empty());
        if missing {
            violations.push(Violation::MissingExtension);
        }
    }

    if options.include_time && !options.include_date {
        violations.push(Violation::TimeWithoutDate);
    }

    if violations.is_empty() {
        info!(folder = ?folder, pattern = %options.pattern, "Validation passed");
    } else {
        debug!(count = violations.len(), "Validation failed");
    }

    violations
}

/// Validate and convert the outcome into a `Result`
pub fn ensure_valid(folder: &Path, options: &RenameOptions) -> Result<(), ValidationError> {
    match ValidationError::from_violations(validate_inputs(folder, options)) {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn check_placeholder(pattern: &str) -> Option<Violation> {
    let runs = placeholder_runs(pattern);

    match runs.as_slice() {
        [] => Some(Violation::MissingPlaceholder),
        [run] if !(MIN_PLACEHOLDER_WIDTH..=MAX_PLACEHOLDER_WIDTH).contains(&run.width) => {
            Some(Violation::PlaceholderWidth { width: run.width })
        }
        [_] => None,
        _ => Some(Violation::MultiplePlaceholderGroups { groups: runs.len() }),
    }
}
