pub mod apply;
pub mod archive;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod mapping;
pub mod observer;
pub mod output;
pub mod pattern;
pub mod progress;
pub mod rename;
pub mod scanner;
pub mod session_log;
pub mod undo;
pub mod validator;

pub use apply::{apply_plan, ApplyError, ApplyOptions, ApplyResult};
pub use archive::{rename_in_archive, ArchiveError, ArchiveOutcome, ArchiveRequest};
pub use error::{AppError, ExitCode};
pub use mapping::{load_mappings, save_mappings, MappingError};
pub use observer::ProgressObserver;
pub use pattern::{expand_pattern, PatternError};
pub use rename::{build_plan, PathMapping, PlanError, RenameOperation, RenameOptions};
pub use scanner::{list_files, ScannerError};
pub use session_log::{maybe_create_log_path, LogConfig, LogSink};
pub use undo::undo_mappings;
pub use validator::{ensure_valid, validate_inputs, ValidationError, Violation};
