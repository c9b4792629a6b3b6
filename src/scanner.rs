use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, trace, warn};

#[derive(Error, Debug)]
pub enum ScannerError {
    #[error("Path does not exist: {0}")]
    PathNotFound(PathBuf),

    #[error("Path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    #[error("Failed to read directory: {0}")]
    IoError(#[from] std::io::Error),
}

/// List the regular files directly inside `target`, in numbering order.
///
/// Subdirectories are excluded. Symlinks count when they resolve to a
/// regular file. The order is case-insensitive, with ties between names that
/// only differ in case broken by their byte order, so repeated listings of an
/// unchanged folder always agree.
pub fn list_files(target: &Path) -> Result<Vec<String>, ScannerError> {
    debug!(path = ?target, "Listing files");

    if !target.exists() {
        return Err(ScannerError::PathNotFound(target.to_path_buf()));
    }

    if !target.is_dir() {
        return Err(ScannerError::NotADirectory(target.to_path_buf()));
    }

    let read_dir = fs::read_dir(target).map_err(|e| {
        if e.kind() == std::io::ErrorKind::PermissionDenied {
            ScannerError::PermissionDenied(target.to_path_buf())
        } else {
            ScannerError::IoError(e)
        }
    })?;

    let mut names = Vec::new();

    for entry in read_dir {
        let entry = entry?;
        let path = entry.path();

        trace!(entry = ?path, "Examining entry");

        if !path.is_file() {
            trace!(path = ?path, "Skipping non-file");
            continue;
        }

        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => {
                warn!(name = ?raw, "Skipping file with a non UTF-8 name");
            }
        }
    }

    sort_case_insensitive(&mut names);

    debug!(count = names.len(), "Listing complete");

    Ok(names)
}

/// Stable sort on the lowercase form, after a byte-order sort for ties
pub fn sort_case_insensitive(names: &mut [String]) {
    names.sort();
    names.sort_by_cached_key(|name| name.to_lowercase());
}
