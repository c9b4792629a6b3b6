use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::rename::PathMapping;

use super::types::MappingFile;

/// Error types for mapping file operations
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    #[error("Cannot access mappings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize mappings: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid mappings file format: {0}")]
    Format(String),

    #[error("Unsupported mappings file version: expected {expected}, found {found}")]
    UnsupportedVersion { expected: u32, found: u32 },
}

/// Persist `mappings` as a versioned JSON document at `path`.
///
/// The document is written to a temporary sibling first and then renamed into
/// place, so a crash never leaves a half-written mappings file behind.
pub fn save_mappings(path: &Path, mappings: &[PathMapping]) -> Result<(), MappingError> {
    let document = MappingFile::from_mappings(mappings);
    write_document(&document, path)?;

    info!("Mappings written to: {:?} ({} entries)", path, mappings.len());

    Ok(())
}

fn write_document(document: &MappingFile, path: &Path) -> Result<(), MappingError> {
    let temp_path = temp_path_for(path);

    if let Err(e) = write_temp(document, &temp_path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    fs::rename(&temp_path, path).map_err(|source| {
        let _ = fs::remove_file(&temp_path);
        MappingError::Io {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Serialize into `temp_path` and make sure every byte reached the disk
fn write_temp(document: &MappingFile, temp_path: &Path) -> Result<(), MappingError> {
    let io_err = |source: std::io::Error| MappingError::Io {
        path: temp_path.to_path_buf(),
        source,
    };

    let file = File::create(temp_path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, document)?;
    writer.flush().map_err(io_err)?;

    let file = writer.into_inner().map_err(|e| io_err(e.into_error()))?;
    file.sync_all().map_err(io_err)
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
