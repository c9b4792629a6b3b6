use crate::apply::ApplyResult;
use crate::rename::RenameOperation;
use std::io::{self, Write};

/// Print the plan as `old -> new` lines, one per operation
pub fn display_preview(operations: &[RenameOperation], writer: &mut impl Write) -> io::Result<()> {
    for op in operations {
        writeln!(writer, "{} -> {}", op.old_name, op.new_name)?;
    }
    Ok(())
}

/// Print counts followed by skipped targets and errors, if any
pub fn display_apply_summary(
    planned: usize,
    result: &ApplyResult,
    dry_run: bool,
    writer: &mut impl Write,
) -> io::Result<()> {
    if dry_run {
        writeln!(writer, "Dry run: no files were changed.")?;
    }
    writeln!(writer, "Planned: {}", planned)?;
    writeln!(writer, "Renamed: {}", result.renamed.len())?;
    writeln!(writer, "Skipped: {}", result.skipped.len())?;
    writeln!(writer, "Errors: {}", result.errors.len())?;

    if !result.skipped.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "Skipped targets (already exist):")?;
        for name in &result.skipped {
            writeln!(writer, "  - {}", name)?;
        }
    }

    if !result.errors.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "Errors:")?;
        for err in &result.errors {
            writeln!(writer, "  - {}", err)?;
        }
    }

    Ok(())
}

/// Print the outcome of an undo run
pub fn display_undo_report(errors: &[String], writer: &mut impl Write) -> io::Result<()> {
    if errors.is_empty() {
        writeln!(writer, "Undo successful.")?;
        return Ok(());
    }

    writeln!(writer, "Undo completed with errors:")?;
    for err in errors {
        writeln!(writer, "  - {}", err)?;
    }
    Ok(())
}
