use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Character that marks the counter position in a rename pattern
pub const PLACEHOLDER: char = '#';

/// Narrowest accepted placeholder run
pub const MIN_PLACEHOLDER_WIDTH: usize = 2;

/// Widest accepted placeholder run
pub const MAX_PLACEHOLDER_WIDTH: usize = 6;

// One or more consecutive placeholder characters, e.g. "##" in "File_##"
static PLACEHOLDER_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"#+").unwrap());

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("Pattern has no '#' placeholder: {0}")]
    MissingPlaceholder(String),

    #[error("Generated name is not a plain file name: {0}")]
    NotAFileName(String),
}

/// A contiguous run of placeholder characters inside a pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceholderRun {
    /// Byte offset of the first placeholder character
    pub start: usize,
    /// Number of placeholder characters, also the zero-pad width
    pub width: usize,
}

/// Whether `pattern` contains a path separator, on any platform
pub fn has_path_separator(pattern: &str) -> bool {
    pattern.contains(['/', '\\'])
}

/// Find every placeholder run in `pattern`, left to right
pub fn placeholder_runs(pattern: &str) -> Vec<PlaceholderRun> {
    PLACEHOLDER_RUN
        .find_iter(pattern)
        .map(|m| PlaceholderRun {
            start: m.start(),
            width: m.len(),
        })
        .collect()
}

/// Expand the first placeholder run of `pattern` into `counter`.
///
/// The counter is zero-padded to the width of the run. A counter with more
/// digits than the run is written out in full rather than truncated, so
/// `Vacation_###` with 1000 gives `Vacation_1000`.
pub fn expand_pattern(pattern: &str, counter: usize) -> Result<String, PatternError> {
    let run = PLACEHOLDER_RUN
        .find(pattern)
        .ok_or_else(|| PatternError::MissingPlaceholder(pattern.to_string()))?;

    let number = format!("{:0width$}", counter, width = run.len());

    let mut expanded = String::with_capacity(pattern.len() + number.len());
    expanded.push_str(&pattern[..run.start()]);
    expanded.push_str(&number);
    expanded.push_str(&pattern[run.end()..]);

    Ok(expanded)
}
