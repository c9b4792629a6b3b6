use std::fs;
use std::path::Path;

use tracing::debug;

use crate::rename::PathMapping;

use super::types::{MappingFile, MAPPING_VERSION};
use super::writer::MappingError;

/// Read a mappings file written by [`super::save_mappings`].
///
/// Fails with [`MappingError::Format`] when the version or list is absent,
/// when an entry is not an object, or when a path is missing or not a string.
pub fn load_mappings(path: &Path) -> Result<Vec<PathMapping>, MappingError> {
    let content = fs::read_to_string(path).map_err(|source| MappingError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let document = parse_mappings(&content)?;

    debug!(
        path = ?path,
        entries = document.mappings.len(),
        "Loaded mappings file"
    );

    Ok(document.into_mappings())
}

/// Parse and check a mappings document
pub fn parse_mappings(content: &str) -> Result<MappingFile, MappingError> {
    let document: MappingFile =
        serde_json::from_str(content).map_err(|e| MappingError::Format(e.to_string()))?;

    if document.version != MAPPING_VERSION {
        return Err(MappingError::UnsupportedVersion {
            expected: MAPPING_VERSION,
            found: document.version,
        });
    }

    Ok(document)
}
