use crate::pattern::{MAX_PLACEHOLDER_WIDTH, MIN_PLACEHOLDER_WIDTH};
use thiserror::Error;

/// A single rule broken by the user's input.
///
/// The display form is the message shown to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("Please select a folder.")]
    MissingFolder,

    #[error("Selected folder does not exist or is not a folder.")]
    FolderNotFound,

    #[error("Please enter a rename pattern.")]
    MissingPattern,

    #[error("Pattern must contain a '#' placeholder for the counter (e.g., File_##).")]
    MissingPlaceholder,

    #[error("Pattern must contain only one group of '#' characters (found {groups}).")]
    MultiplePlaceholderGroups { groups: usize },

    #[error(
        "Placeholder width must be between {} and {} characters (found {width}).",
        MIN_PLACEHOLDER_WIDTH,
        MAX_PLACEHOLDER_WIDTH
    )]
    PlaceholderWidth { width: usize },

    #[error("Pattern must not contain path separators ('/' or '\\').")]
    PathSeparator,

    #[error("Please enter a new extension (e.g., jpg or .jpg).")]
    MissingExtension,

    #[error("Include Time requires Include Date (time is based on file timestamp).")]
    TimeWithoutDate,
}

/// Input rejected before any rename work started
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid input ({} problem(s))", violations.len())]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl ValidationError {
    /// Wrap a violation list, or `None` when there is nothing to report
    pub fn from_violations(violations: Vec<Violation>) -> Option<Self> {
        if violations.is_empty() {
            None
        } else {
            Some(Self { violations })
        }
    }

    /// One human-readable message per violation, in rule order
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(|v| v.to_string()).collect()
    }
}
