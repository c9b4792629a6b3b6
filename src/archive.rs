//! Zip-in / zip-out variant of a rename run.
//!
//! The archive is extracted into a scratch directory, the usual
//! validate -> plan -> apply pipeline runs against the extracted root (only
//! its top-level files take part), and the result is packed into a new
//! archive. Mappings saved from such a run point into the scratch directory
//! and stop being meaningful once it is discarded at the end of the call.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::apply::{apply_plan, ApplyError, ApplyOptions, ApplyResult};
use crate::mapping::{save_mappings, MappingError};
use crate::observer::ProgressObserver;
use crate::rename::{build_plan, PlanError, RenameOperation, RenameOptions};
use crate::session_log::LogSink;
use crate::validator::{validate_inputs, ValidationError};

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Input zip not found: {0}")]
    InputNotFound(PathBuf),

    #[error("Failed to read archive: {0:#}")]
    Read(anyhow::Error),

    #[error("Failed to write archive: {0:#}")]
    Write(anyhow::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error(transparent)]
    Apply(#[from] ApplyError),

    #[error("Failed to save mappings to {path}: {source}")]
    Mapping {
        path: PathBuf,
        #[source]
        source: MappingError,
    },
}

/// Everything needed for one archive rename run
#[derive(Debug, Clone)]
pub struct ArchiveRequest<'a> {
    pub zip_in: &'a Path,
    pub zip_out: &'a Path,
    pub options: &'a RenameOptions,
    pub dry_run: bool,
    pub log: Option<&'a LogSink>,
    pub mappings_out: Option<&'a Path>,
}

/// Outcome of an archive rename run
#[derive(Debug, Clone)]
pub struct ArchiveOutcome {
    pub planned: Vec<RenameOperation>,
    pub result: ApplyResult,
    /// Set when a new archive was written (never for dry runs)
    pub archive_written: Option<PathBuf>,
}

/// Rename the top-level files of `request.zip_in` and pack them into
/// `request.zip_out`
pub fn rename_in_archive(
    request: &ArchiveRequest<'_>,
    observer: Option<&mut dyn ProgressObserver<RenameOperation>>,
) -> Result<ArchiveOutcome, ArchiveError> {
    if !request.zip_in.is_file() {
        return Err(ArchiveError::InputNotFound(request.zip_in.to_path_buf()));
    }

    let scratch = tempfile::tempdir()
        .context("cannot create scratch directory")
        .map_err(ArchiveError::Read)?;
    let extract_dir = scratch.path().join("extracted");

    extract_zip(request.zip_in, &extract_dir).map_err(ArchiveError::Read)?;
    info!(archive = ?request.zip_in, into = ?extract_dir, "Archive extracted");

    if let Some(err) = ValidationError::from_violations(validate_inputs(&extract_dir, request.options)) {
        return Err(err.into());
    }

    let planned = build_plan(&extract_dir, request.options)?;
    let apply_options = ApplyOptions {
        log: request.log,
        dry_run: request.dry_run,
    };
    let result = apply_plan(&extract_dir, &planned, &apply_options, observer)?;

    let mut archive_written = None;
    if !request.dry_run {
        create_zip(&extract_dir, request.zip_out).map_err(ArchiveError::Write)?;
        info!(archive = ?request.zip_out, "Archive written");
        archive_written = Some(request.zip_out.to_path_buf());

        if let Some(path) = request.mappings_out {
            save_mappings(path, &result.mappings).map_err(|source| ArchiveError::Mapping {
                path: path.to_path_buf(),
                source,
            })?;
        }
    }

    Ok(ArchiveOutcome {
        planned,
        result,
        archive_written,
    })
}

/// Unpack every entry of `zip_path` under `dest`
pub fn extract_zip(zip_path: &Path, dest: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dest)
        .with_context(|| format!("cannot create {}", dest.display()))?;

    let file = File::open(zip_path).with_context(|| format!("cannot open {}", zip_path.display()))?;
    let mut archive = ZipArchive::new(file)
        .with_context(|| format!("{} is not a zip archive", zip_path.display()))?;

    archive
        .extract(dest)
        .with_context(|| format!("cannot extract {}", zip_path.display()))?;

    Ok(())
}

/// Pack every file below `src_folder` into a new archive at `zip_out`.
///
/// Entry names are relative to `src_folder` and use '/' separators.
pub fn create_zip(src_folder: &Path, zip_out: &Path) -> anyhow::Result<()> {
    let file =
        File::create(zip_out).with_context(|| format!("cannot create {}", zip_out.display()))?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in WalkDir::new(src_folder).sort_by_file_name() {
        let entry = entry.context("cannot walk extracted files")?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(src_folder)
            .context("entry outside of source folder")?;
        let name = archive_name(relative);

        debug!(entry = %name, "Adding to archive");
        writer
            .start_file(name.as_str(), options)
            .with_context(|| format!("cannot start entry {}", name))?;
        let mut source = File::open(entry.path())
            .with_context(|| format!("cannot read {}", entry.path().display()))?;
        io::copy(&mut source, &mut writer).with_context(|| format!("cannot write entry {}", name))?;
    }

    writer.finish().context("cannot finalize archive")?;

    Ok(())
}

fn archive_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
