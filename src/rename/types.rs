use std::path::PathBuf;

/// User choices that drive plan generation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameOptions {
    /// Pattern with a single run of '#' marking the counter, e.g. `File_###`
    pub pattern: String,
    /// Append the file timestamp date as `_YYYYMMDD`
    pub include_date: bool,
    /// Append the file timestamp time as `_HHMMSS` (requires `include_date`)
    pub include_time: bool,
    /// Replace the original extension with `new_extension`
    pub change_extension: bool,
    /// Replacement extension, with or without the leading dot
    pub new_extension: Option<String>,
}

impl RenameOptions {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            ..Default::default()
        }
    }

    pub fn with_date(mut self, include_time: bool) -> Self {
        self.include_date = true;
        self.include_time = include_time;
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.change_extension = true;
        self.new_extension = Some(extension.into());
        self
    }

    /// The replacement extension normalized to start with '.', if one applies
    pub fn replacement_extension(&self) -> Option<String> {
        if !self.change_extension {
            return None;
        }

        let ext = self.new_extension.as_deref()?.trim();
        if ext.is_empty() {
            return None;
        }

        if ext.starts_with('.') {
            Some(ext.to_string())
        } else {
            Some(format!(".{}", ext))
        }
    }
}

/// A single planned rename inside one folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameOperation {
    /// Current file name, no directory component
    pub old_name: String,
    /// Target file name, no directory component
    pub new_name: String,
}

impl RenameOperation {
    pub fn new(old_name: impl Into<String>, new_name: impl Into<String>) -> Self {
        Self {
            old_name: old_name.into(),
            new_name: new_name.into(),
        }
    }
}

/// A completed rename, recorded so it can be reversed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMapping {
    /// Where the file lives now
    pub new_path: PathBuf,
    /// Where the file lived before the rename
    pub old_path: PathBuf,
}

impl PathMapping {
    pub fn new(new_path: impl Into<PathBuf>, old_path: impl Into<PathBuf>) -> Self {
        Self {
            new_path: new_path.into(),
            old_path: old_path.into(),
        }
    }

    /// File name of the current path, for messages
    pub fn new_name(&self) -> String {
        self.new_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.new_path.display().to_string())
    }
}
