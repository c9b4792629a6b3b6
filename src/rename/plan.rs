use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::Path;

use chrono::{DateTime, Local};
use thiserror::Error;
use tracing::{debug, info};

use crate::pattern::{expand_pattern, has_path_separator, PatternError};
use crate::scanner::{list_files, ScannerError};

use super::types::{RenameOperation, RenameOptions};

/// Errors that stop a plan from being built
#[derive(Error, Debug)]
pub enum PlanError {
    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error("Cannot list folder: {0}")]
    Scan(#[from] ScannerError),

    #[error("Cannot read timestamp of '{name}': {source}")]
    Timestamp {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// Compute the full old -> new mapping for the files in `folder`.
///
/// Nothing is written, so this is safe to call for a preview and again right
/// before applying. The folder may change between the two calls.
pub fn build_plan(folder: &Path, options: &RenameOptions) -> Result<Vec<RenameOperation>, PlanError> {
    build_plan_with(folder, options, file_timestamp)
}

/// Same as [`build_plan`], reading file timestamps through `timestamp`
pub fn build_plan_with<F>(
    folder: &Path,
    options: &RenameOptions,
    timestamp: F,
) -> Result<Vec<RenameOperation>, PlanError>
where
    F: Fn(&Path) -> io::Result<DateTime<Local>>,
{
    // Pattern problems surface even for an empty folder
    expand_pattern(&options.pattern, 1)?;

    let files = list_files(folder)?;
    let extension = options.replacement_extension();

    debug!(count = files.len(), pattern = %options.pattern, "Building rename plan");

    let mut operations = Vec::with_capacity(files.len());

    for (index, file_name) in files.into_iter().enumerate() {
        let new_base = expand_pattern(&options.pattern, index + 1)?;
        let (_, original_ext) = split_extension(&file_name);
        let ext = extension.as_deref().unwrap_or(original_ext);

        let new_name = if options.include_date {
            let created = timestamp(&folder.join(&file_name)).map_err(|source| {
                PlanError::Timestamp {
                    name: file_name.clone(),
                    source,
                }
            })?;
            format!(
                "{}{}{}",
                new_base,
                date_suffix(&created, options.include_time),
                ext
            )
        } else {
            format!("{}{}", new_base, ext)
        };

        if !is_plain_file_name(&new_name) {
            return Err(PatternError::NotAFileName(new_name).into());
        }

        debug!(from = %file_name, to = %new_name, "Planned rename");
        operations.push(RenameOperation::new(file_name, new_name));
    }

    info!("Planned {} renames", operations.len());

    Ok(operations)
}

/// Split a file name at its last '.'; the extension keeps the dot
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(pos) => name.split_at(pos),
        None => (name, ""),
    }
}

/// True when `name` is a single path component naming an entry in the folder
fn is_plain_file_name(name: &str) -> bool {
    !has_path_separator(name) && Path::new(name).file_name() == Some(OsStr::new(name))
}

/// `_YYYYMMDD` or `_YYYYMMDD_HHMMSS`
fn date_suffix(created: &DateTime<Local>, include_time: bool) -> String {
    if include_time {
        created.format("_%Y%m%d_%H%M%S").to_string()
    } else {
        created.format("_%Y%m%d").to_string()
    }
}

/// Creation time of a file in local time.
///
/// Filesystems without a birth time fall back to the modification time.
pub fn file_timestamp(path: &Path) -> io::Result<DateTime<Local>> {
    let metadata = fs::metadata(path)?;
    let time = metadata.created().or_else(|_| metadata.modified())?;
    Ok(DateTime::<Local>::from(time))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn create_files(folder: &Path, names: &[&str]) {
        for name in names {
            fs::write(folder.join(name), "x").unwrap();
        }
    }

    fn fixed_clock(_: &Path) -> io::Result<DateTime<Local>> {
        Ok(Local.with_ymd_and_hms(2026, 1, 5, 9, 8, 7).unwrap())
    }

    fn new_names(ops: &[RenameOperation]) -> Vec<&str> {
        ops.iter().map(|op| op.new_name.as_str()).collect()
    }

    #[test]
    fn test_numbering_and_pattern_replacement() {
        let dir = tempdir().unwrap();
        create_files(dir.path(), &["a.txt", "b.txt", "c.txt"]);

        let ops = build_plan(dir.path(), &RenameOptions::new("File_#####")).unwrap();

        let old: Vec<&str> = ops.iter().map(|op| op.old_name.as_str()).collect();
        assert_eq!(old, vec!["a.txt", "b.txt", "c.txt"]);
        assert_eq!(
            new_names(&ops),
            vec!["File_00001.txt", "File_00002.txt", "File_00003.txt"]
        );
    }

    #[test]
    fn test_case_insensitive_sort() {
        let dir = tempdir().unwrap();
        create_files(dir.path(), &["b.txt", "A.txt"]);

        let ops = build_plan(dir.path(), &RenameOptions::new("File_##")).unwrap();

        assert_eq!(
            ops,
            vec![
                RenameOperation::new("A.txt", "File_01.txt"),
                RenameOperation::new("b.txt", "File_02.txt"),
            ]
        );
    }

    #[test]
    fn test_plan_is_deterministic() {
        let dir = tempdir().unwrap();
        create_files(dir.path(), &["Zeta.png", "alpha.png", "Beta.png", "beta.PNG"]);
        let options = RenameOptions::new("Pic_###");

        let first = build_plan(dir.path(), &options).unwrap();
        let second = build_plan(dir.path(), &options).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_ignores_directories() {
        let dir = tempdir().unwrap();
        create_files(dir.path(), &["a.txt"]);
        fs::create_dir(dir.path().join("subfolder")).unwrap();
        fs::write(dir.path().join("subfolder").join("inside.txt"), "x").unwrap();

        let ops = build_plan(dir.path(), &RenameOptions::new("X_##")).unwrap();

        assert_eq!(ops, vec![RenameOperation::new("a.txt", "X_01.txt")]);
    }

    #[test]
    fn test_change_extension_adds_dot_when_missing() {
        let dir = tempdir().unwrap();
        create_files(dir.path(), &["one.JPG", "two.png"]);

        let options = RenameOptions::new("Img_#####").with_extension("webp");
        let ops = build_plan(dir.path(), &options).unwrap();

        assert_eq!(new_names(&ops), vec!["Img_00001.webp", "Img_00002.webp"]);
    }

    #[test]
    fn test_change_extension_keeps_dot_when_present() {
        let dir = tempdir().unwrap();
        create_files(dir.path(), &["one.txt"]);

        let options = RenameOptions::new("Doc_##").with_extension(".md");
        let ops = build_plan(dir.path(), &options).unwrap();

        assert_eq!(ops[0].new_name, "Doc_01.md");
    }

    #[test]
    fn test_keeps_missing_extension() {
        let dir = tempdir().unwrap();
        create_files(dir.path(), &["README", "archive.tar.gz"]);

        let ops = build_plan(dir.path(), &RenameOptions::new("F_##")).unwrap();

        assert_eq!(new_names(&ops), vec!["F_01.gz", "F_02"]);
    }

    #[test]
    fn test_include_date_appends_yyyymmdd() {
        let dir = tempdir().unwrap();
        create_files(dir.path(), &["a.txt"]);

        let options = RenameOptions::new("File_#####").with_date(false);
        let ops = build_plan_with(dir.path(), &options, fixed_clock).unwrap();

        assert_eq!(ops[0].new_name, "File_00001_20260105.txt");
    }

    #[test]
    fn test_include_date_and_time_appends_yyyymmdd_hhmmss() {
        let dir = tempdir().unwrap();
        create_files(dir.path(), &["a.txt"]);

        let options = RenameOptions::new("File_#####")
            .with_date(true)
            .with_extension("md");
        let ops = build_plan_with(dir.path(), &options, fixed_clock).unwrap();

        assert_eq!(ops[0].new_name, "File_00001_20260105_090807.md");
    }

    #[test]
    fn test_clock_not_consulted_without_date() {
        let dir = tempdir().unwrap();
        create_files(dir.path(), &["a.txt"]);

        let ops = build_plan_with(dir.path(), &RenameOptions::new("X_##"), |_: &Path| {
            Err(io::Error::new(io::ErrorKind::Other, "should not be called"))
        })
        .unwrap();

        assert_eq!(ops[0].new_name, "X_01.txt");
    }

    #[test]
    fn test_timestamp_failure_is_reported() {
        let dir = tempdir().unwrap();
        create_files(dir.path(), &["a.txt"]);

        let options = RenameOptions::new("X_##").with_date(false);
        let result = build_plan_with(dir.path(), &options, |_: &Path| {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        });

        assert!(matches!(result, Err(PlanError::Timestamp { ref name, .. }) if name == "a.txt"));
    }

    #[test]
    fn test_real_timestamp_shape() {
        let dir = tempdir().unwrap();
        create_files(dir.path(), &["a.txt"]);

        let options = RenameOptions::new("X_##").with_date(true);
        let ops = build_plan(dir.path(), &options).unwrap();

        // X_01_YYYYMMDD_HHMMSS.txt
        assert_eq!(ops[0].new_name.len(), "X_01_20260105_090807.txt".len());
        assert!(ops[0].new_name.starts_with("X_01_"));
    }

    #[test]
    fn test_missing_placeholder_fails() {
        let dir = tempdir().unwrap();
        create_files(dir.path(), &["a.txt"]);

        let result = build_plan(dir.path(), &RenameOptions::new("NoCounter"));
        assert!(matches!(result, Err(PlanError::Pattern(_))));
    }

    #[test]
    fn test_missing_placeholder_fails_on_empty_folder() {
        let dir = tempdir().unwrap();

        let result = build_plan(dir.path(), &RenameOptions::new("NoCounter"));

        assert!(matches!(
            result,
            Err(PlanError::Pattern(PatternError::MissingPlaceholder(_)))
        ));
    }

    #[test]
    fn test_names_never_leave_the_folder() {
        let work = tempdir().unwrap();
        create_files(work.path(), &["a.txt"]);

        let result = build_plan(work.path(), &RenameOptions::new("../Esc_##"));
        assert!(matches!(
            result,
            Err(PlanError::Pattern(PatternError::NotAFileName(ref name))) if name == "../Esc_01.txt"
        ));

        let options = RenameOptions::new("X_##").with_extension("/../../etc");
        let result = build_plan(work.path(), &options);
        assert!(matches!(result, Err(PlanError::Pattern(PatternError::NotAFileName(_)))));
    }

    #[test]
    fn test_plain_file_name() {
        assert!(is_plain_file_name("File_01.txt"));
        assert!(is_plain_file_name(".hidden"));
        assert!(!is_plain_file_name(".."));
        assert!(!is_plain_file_name("../x"));
        assert!(!is_plain_file_name("sub/x"));
        assert!(!is_plain_file_name("sub\\x"));
        assert!(!is_plain_file_name(""));
    }

    #[test]
    fn test_unreadable_folder_fails() {
        let result = build_plan(Path::new("/nonexistent/relabeler"), &RenameOptions::new("X_##"));
        assert!(matches!(result, Err(PlanError::Scan(ScannerError::PathNotFound(_)))));
    }

    #[test]
    fn test_split_extension() {
        assert_eq!(split_extension("photo.jpg"), ("photo", ".jpg"));
        assert_eq!(split_extension("archive.tar.gz"), ("archive.tar", ".gz"));
        assert_eq!(split_extension("README"), ("README", ""));
        assert_eq!(split_extension(".bashrc"), ("", ".bashrc"));
    }
}
