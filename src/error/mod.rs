mod codes;

pub use codes::ExitCode;

use crate::apply::ApplyError;
use crate::archive::ArchiveError;
use crate::mapping::MappingError;
use crate::pattern::PatternError;
use crate::rename::PlanError;
use crate::scanner::ScannerError;
use crate::validator::{ValidationError, Violation};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input")]
    Validation { violations: Vec<Violation> },

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] PatternError),

    #[error("Target directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to load mappings file: {message}")]
    MappingLoad { path: PathBuf, message: String },

    #[error("Failed to save mappings file: {message}")]
    MappingSave { path: PathBuf, message: String },

    #[error("Archive error: {message}")]
    Archive { message: String },

    #[error("{0}")]
    Other(String),
}

impl AppError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            AppError::Validation { .. } => ExitCode::InvalidInput,
            AppError::Pattern(_) => ExitCode::InvalidInput,
            AppError::DirectoryNotFound { .. } => ExitCode::DirectoryError,
            AppError::NotADirectory { .. } => ExitCode::DirectoryError,
            AppError::PermissionDenied { .. } => ExitCode::DirectoryError,
            AppError::MappingLoad { .. } => ExitCode::InvalidInput,
            AppError::MappingSave { .. } => ExitCode::GeneralError,
            AppError::Archive { .. } => ExitCode::ArchiveError,
            AppError::Other(_) => ExitCode::GeneralError,
        }
    }

    /// Lines to print after `Error: `, one per problem
    pub fn messages(&self) -> Vec<String> {
        match self {
            AppError::Validation { violations } => {
                violations.iter().map(|v| v.to_string()).collect()
            }
            other => vec![other.to_string()],
        }
    }

    pub fn mapping_load(path: impl Into<PathBuf>, err: MappingError) -> Self {
        AppError::MappingLoad {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub fn mapping_save(path: impl Into<PathBuf>, err: MappingError) -> Self {
        AppError::MappingSave {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation {
            violations: err.violations,
        }
    }
}

impl From<ScannerError> for AppError {
    fn from(err: ScannerError) -> Self {
        match err {
            ScannerError::PathNotFound(path) => AppError::DirectoryNotFound { path },
            ScannerError::NotADirectory(path) => AppError::NotADirectory { path },
            ScannerError::PermissionDenied(path) => AppError::PermissionDenied { path },
            ScannerError::IoError(e) => AppError::Other(format!("I/O error: {}", e)),
        }
    }
}

impl From<PlanError> for AppError {
    fn from(err: PlanError) -> Self {
        match err {
            PlanError::Pattern(e) => AppError::Pattern(e),
            PlanError::Scan(e) => e.into(),
            PlanError::Timestamp { .. } => AppError::Other(err.to_string()),
        }
    }
}

impl From<ApplyError> for AppError {
    fn from(err: ApplyError) -> Self {
        match err {
            ApplyError::FolderMissing(path) => AppError::DirectoryNotFound { path },
        }
    }
}

impl From<ArchiveError> for AppError {
    fn from(err: ArchiveError) -> Self {
        match err {
            ArchiveError::Validation(e) => e.into(),
            ArchiveError::Plan(e) => e.into(),
            ArchiveError::Mapping { path, source } => AppError::mapping_save(path, source),
            other => AppError::Archive {
                message: other.to_string(),
            },
        }
    }
}
