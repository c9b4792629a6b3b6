use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::observer::{notify, ProgressObserver};
use crate::rename::{PathMapping, RenameOperation};
use crate::session_log::{log_line, LogSink};

/// Failures that abort a whole apply call before any file is touched
#[derive(Error, Debug)]
pub enum ApplyError {
    #[error("Folder no longer exists: {0}")]
    FolderMissing(PathBuf),
}

/// Options for one apply call
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplyOptions<'a> {
    /// Session log; `None` disables logging
    pub log: Option<&'a LogSink>,
    /// Run every check and log line without renaming anything
    pub dry_run: bool,
}

/// Everything that happened during one apply call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyResult {
    /// `(old_name, new_name)` for each rename performed (or simulated)
    pub renamed: Vec<(String, String)>,
    /// Target names left alone because something already occupied them
    pub skipped: Vec<String>,
    /// Per-file failures
    pub errors: Vec<String>,
    /// Completed renames in the order they happened, for undo
    pub mappings: Vec<PathMapping>,
}

impl ApplyResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no per-file error was recorded; skips do not count
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

enum Outcome {
    Renamed,
    DryRun,
    Skipped,
    Failed,
}

/// Execute `operations` against `folder`, one at a time, in order.
///
/// Per-file problems never abort the run: a missing source or a failed
/// rename is recorded in `errors`, an occupied destination in `skipped`.
/// Nothing is ever overwritten and earlier successes are never rolled back;
/// reversing them is the job of [`crate::undo::undo_mappings`].
///
/// The destination check and the rename are two separate steps. Another
/// process creating the destination in between is not defended against.
pub fn apply_plan(
    folder: &Path,
    operations: &[RenameOperation],
    options: &ApplyOptions<'_>,
    mut observer: Option<&mut dyn ProgressObserver<RenameOperation>>,
) -> Result<ApplyResult, ApplyError> {
    if !folder.is_dir() {
        return Err(ApplyError::FolderMissing(folder.to_path_buf()));
    }

    let log = options.log;
    let total = operations.len();
    let mut result = ApplyResult::new();

    info!(folder = ?folder, total, dry_run = options.dry_run, "Rename session started");
    log_line(log, "=== Rename session started ===");
    log_line(log, &format!("Folder: {}", folder.display()));
    log_line(log, &format!("Operations: {}", total));
    log_line(log, &format!("Dry run: {}", options.dry_run));

    for (index, op) in operations.iter().enumerate() {
        let outcome = apply_one(folder, op, options, &mut result);
        debug!(
            from = %op.old_name,
            to = %op.new_name,
            outcome = outcome.label(),
            "Processed operation"
        );
        notify(&mut observer, index + 1, total, op);
    }

    log_line(log, "=== Rename session finished ===");
    log_line(log, &format!("Renamed: {}", result.renamed.len()));
    log_line(log, &format!("Skipped: {}", result.skipped.len()));
    log_line(log, &format!("Errors: {}", result.errors.len()));
    info!(
        renamed = result.renamed.len(),
        skipped = result.skipped.len(),
        errors = result.errors.len(),
        "Rename session finished"
    );

    Ok(result)
}

fn apply_one(
    folder: &Path,
    op: &RenameOperation,
    options: &ApplyOptions<'_>,
    result: &mut ApplyResult,
) -> Outcome {
    let log = options.log;
    let source = folder.join(&op.old_name);
    let destination = folder.join(&op.new_name);

    if !source.exists() {
        let msg = format!("Missing source file: {}", op.old_name);
        info!("{}", msg);
        log_line(log, &format!("Error: {}", msg));
        result.errors.push(msg);
        return Outcome::Failed;
    }

    if is_occupied(&destination) {
        info!(name = %op.new_name, "Skipping, destination already exists");
        log_line(log, &format!("Skipped (already exists): {}", op.new_name));
        result.skipped.push(op.new_name.clone());
        return Outcome::Skipped;
    }

    if options.dry_run {
        log_line(log, &format!("Dry-run: {} -> {}", op.old_name, op.new_name));
        result
            .renamed
            .push((op.old_name.clone(), op.new_name.clone()));
        return Outcome::DryRun;
    }

    match fs::rename(&source, &destination) {
        Ok(()) => {
            info!("Renamed: {} -> {}", op.old_name, op.new_name);
            log_line(log, &format!("Renamed: {} -> {}", op.old_name, op.new_name));
            result
                .renamed
                .push((op.old_name.clone(), op.new_name.clone()));
            result.mappings.push(PathMapping::new(destination, source));
            Outcome::Renamed
        }
        Err(e) => {
            let msg = format!("Error renaming {} -> {}: {}", op.old_name, op.new_name, e);
            info!("{}", msg);
            log_line(log, &msg);
            result.errors.push(msg);
            Outcome::Failed
        }
    }
}

/// Whether anything, including a dangling symlink, sits at `path`
pub(crate) fn is_occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

impl Outcome {
    fn label(&self) -> &'static str {
        match self {
            Outcome::Renamed => "renamed",
            Outcome::DryRun => "dry-run",
            Outcome::Skipped => "skipped",
            Outcome::Failed => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn create_files(folder: &Path, names: &[&str]) {
        for name in names {
            fs::write(folder.join(name), "x").unwrap();
        }
    }

    fn ops(pairs: &[(&str, &str)]) -> Vec<RenameOperation> {
        pairs
            .iter()
            .map(|(old, new)| RenameOperation::new(*old, *new))
            .collect()
    }

    #[test]
    fn test_apply_renames_files() {
        let dir = tempdir().unwrap();
        create_files(dir.path(), &["a.txt", "b.txt"]);

        let plan = ops(&[("a.txt", "File_00001.txt"), ("b.txt", "File_00002.txt")]);
        let result = apply_plan(dir.path(), &plan, &ApplyOptions::default(), None).unwrap();

        assert!(result.errors.is_empty());
        assert!(result.skipped.is_empty());
        assert!(result.is_success());
        assert!(dir.path().join("File_00001.txt").exists());
        assert!(dir.path().join("File_00002.txt").exists());
        assert!(!dir.path().join("a.txt").exists());
        assert!(!dir.path().join("b.txt").exists());
        assert_eq!(
            result.renamed,
            vec![
                ("a.txt".to_string(), "File_00001.txt".to_string()),
                ("b.txt".to_string(), "File_00002.txt".to_string()),
            ]
        );
        assert_eq!(
            result.mappings,
            vec![
                PathMapping::new(dir.path().join("File_00001.txt"), dir.path().join("a.txt")),
                PathMapping::new(dir.path().join("File_00002.txt"), dir.path().join("b.txt")),
            ]
        );
    }

    #[test]
    fn test_apply_skips_when_target_exists() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "source").unwrap();
        fs::write(dir.path().join("File_00001.txt"), "existing").unwrap();

        let plan = ops(&[("a.txt", "File_00001.txt")]);
        let result = apply_plan(dir.path(), &plan, &ApplyOptions::default(), None).unwrap();

        assert!(result.errors.is_empty());
        assert!(result.is_success());
        assert_eq!(result.skipped, vec!["File_00001.txt".to_string()]);
        assert!(result.mappings.is_empty());
        assert_eq!(fs::read_to_string(dir.path().join("a.txt")).unwrap(), "source");
        assert_eq!(
            fs::read_to_string(dir.path().join("File_00001.txt")).unwrap(),
            "existing"
        );
    }

    #[test]
    fn test_missing_source_is_an_error_and_run_continues() {
        let dir = tempdir().unwrap();
        create_files(dir.path(), &["b.txt"]);

        let plan = ops(&[("gone.txt", "X_01.txt"), ("b.txt", "X_02.txt")]);
        let result = apply_plan(dir.path(), &plan, &ApplyOptions::default(), None).unwrap();

        assert_eq!(result.errors, vec!["Missing source file: gone.txt".to_string()]);
        assert!(!result.is_success());
        assert_eq!(result.mappings.len(), 1);
        assert!(dir.path().join("X_02.txt").exists());
        assert!(!dir.path().join("X_01.txt").exists());
    }

    #[test]
    fn test_rename_failure_is_an_error_and_run_continues() {
        let dir = tempdir().unwrap();
        create_files(dir.path(), &["a.txt", "b.txt"]);

        let plan = ops(&[("a.txt", "nodir/x.txt"), ("b.txt", "X_02.txt")]);
        let result = apply_plan(dir.path(), &plan, &ApplyOptions::default(), None).unwrap();

        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].starts_with("Error renaming a.txt -> nodir/x.txt: "));
        assert!(!result.is_success());
        assert!(dir.path().join("a.txt").exists());
        assert_eq!(
            result.mappings,
            vec![PathMapping::new(dir.path().join("X_02.txt"), dir.path().join("b.txt"))]
        );
        assert_eq!(
            result.renamed,
            vec![("b.txt".to_string(), "X_02.txt".to_string())]
        );
    }

    #[test]
    fn test_dry_run_is_side_effect_free() {
        let dir = tempdir().unwrap();
        create_files(dir.path(), &["a.txt", "b.txt", "c.txt"]);

        let plan = ops(&[
            ("a.txt", "X_01.txt"),
            ("b.txt", "X_02.txt"),
            ("c.txt", "X_03.txt"),
        ]);
        let options = ApplyOptions {
            dry_run: true,
            ..Default::default()
        };
        let result = apply_plan(dir.path(), &plan, &options, None).unwrap();

        assert_eq!(result.renamed.len(), 3);
        assert!(result.mappings.is_empty());
        for name in ["a.txt", "b.txt", "c.txt"] {
            assert!(dir.path().join(name).exists());
        }
        for name in ["X_01.txt", "X_02.txt", "X_03.txt"] {
            assert!(!dir.path().join(name).exists());
        }
    }

    #[test]
    fn test_dry_run_still_reports_collisions() {
        let dir = tempdir().unwrap();
        create_files(dir.path(), &["a.txt", "X_01.txt"]);

        let options = ApplyOptions {
            dry_run: true,
            ..Default::default()
        };
        let result =
            apply_plan(dir.path(), &ops(&[("a.txt", "X_01.txt")]), &options, None).unwrap();

        assert!(result.renamed.is_empty());
        assert_eq!(result.skipped, vec!["X_01.txt".to_string()]);
    }

    #[test]
    fn test_folder_missing_aborts() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("vanished");

        let result = apply_plan(&missing, &ops(&[("a", "b")]), &ApplyOptions::default(), None);

        assert!(matches!(result, Err(ApplyError::FolderMissing(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_counts_as_occupied() {
        let dir = tempdir().unwrap();
        create_files(dir.path(), &["a.txt"]);
        std::os::unix::fs::symlink(dir.path().join("nowhere"), dir.path().join("X_01.txt"))
            .unwrap();

        let result = apply_plan(
            dir.path(),
            &ops(&[("a.txt", "X_01.txt")]),
            &ApplyOptions::default(),
            None,
        )
        .unwrap();

        assert_eq!(result.skipped, vec!["X_01.txt".to_string()]);
        assert!(dir.path().join("a.txt").exists());
    }

    #[test]
    fn test_progress_observer_called_for_every_operation() {
        let dir = tempdir().unwrap();
        create_files(dir.path(), &["a.txt", "taken.txt"]);

        let plan = ops(&[
            ("a.txt", "X_01.txt"),
            ("b.txt", "X_02.txt"),
            ("c.txt", "taken.txt"),
        ]);

        let mut calls = Vec::new();
        let mut observer = |current: usize, total: usize, op: &RenameOperation| -> anyhow::Result<()> {
            calls.push((current, total, op.old_name.clone()));
            Ok(())
        };
        apply_plan(dir.path(), &plan, &ApplyOptions::default(), Some(&mut observer)).unwrap();

        assert_eq!(
            calls,
            vec![
                (1, 3, "a.txt".to_string()),
                (2, 3, "b.txt".to_string()),
                (3, 3, "c.txt".to_string()),
            ]
        );
    }

    #[test]
    fn test_failing_observer_does_not_abort() {
        let dir = tempdir().unwrap();
        create_files(dir.path(), &["a.txt", "b.txt"]);

        let mut observer = |_: usize, _: usize, _: &RenameOperation| -> anyhow::Result<()> {
            anyhow::bail!("progress bar went away")
        };
        let plan = ops(&[("a.txt", "X_01.txt"), ("b.txt", "X_02.txt")]);
        let result =
            apply_plan(dir.path(), &plan, &ApplyOptions::default(), Some(&mut observer)).unwrap();

        assert_eq!(result.renamed.len(), 2);
        assert!(dir.path().join("X_02.txt").exists());
    }

    #[test]
    fn test_session_log_lines() {
        let dir = tempdir().unwrap();
        let work = dir.path().join("work");
        fs::create_dir(&work).unwrap();
        create_files(&work, &["a.txt", "b.txt", "X_02.txt"]);

        let sink = LogSink::new(dir.path().join("session.log"));
        let options = ApplyOptions {
            log: Some(&sink),
            dry_run: false,
        };
        let plan = ops(&[
            ("a.txt", "X_01.txt"),
            ("b.txt", "X_02.txt"),
            ("c.txt", "X_03.txt"),
        ]);
        apply_plan(&work, &plan, &options, None).unwrap();

        let content = fs::read_to_string(sink.path()).unwrap();
        let messages: Vec<&str> = content
            .lines()
            .map(|line| line.split_once("] ").unwrap().1)
            .collect();

        assert_eq!(messages[0], "=== Rename session started ===");
        assert_eq!(messages[2], "Operations: 3");
        assert_eq!(messages[3], "Dry run: false");
        assert_eq!(messages[4], "Renamed: a.txt -> X_01.txt");
        assert_eq!(messages[5], "Skipped (already exists): X_02.txt");
        assert_eq!(messages[6], "Error: Missing source file: c.txt");
        assert_eq!(messages[7], "=== Rename session finished ===");
        assert_eq!(&messages[8..], &["Renamed: 1", "Skipped: 1", "Errors: 1"]);
    }
}
