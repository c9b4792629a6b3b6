//! Progress output for user-facing status updates.
//!
//! Per-file lines go to stderr so stdout stays clean for the preview and
//! summary. In verbose mode output is suppressed since tracing handles
//! everything.

use colored::Colorize;
use std::io::{self, IsTerminal, Write};
use std::path::Path;

/// Progress reporter for user-facing output
pub struct Progress {
    writer: Box<dyn Write>,
    /// When true, all output is suppressed (verbose mode uses tracing instead)
    silent: bool,
    /// When true, output is colorized
    colors_enabled: bool,
}

/// Check if we should use colors in output
pub fn should_use_colors() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }
    io::stderr().is_terminal()
}

impl Default for Progress {
    fn default() -> Self {
        Self::new(false)
    }
}

impl Progress {
    /// Create a progress reporter writing to stderr.
    /// When verbose=true, output is suppressed (tracing handles it)
    pub fn new(verbose: bool) -> Self {
        Self {
            writer: Box::new(io::stderr()),
            silent: verbose,
            colors_enabled: should_use_colors(),
        }
    }

    /// Create a progress reporter with a custom writer (for testing)
    #[cfg(test)]
    pub fn with_writer(writer: Box<dyn Write>) -> Self {
        Self {
            writer,
            silent: false,
            colors_enabled: false,
        }
    }

    fn step(&mut self, current: usize, total: usize, from: &str, to: &str) {
        if self.silent {
            return;
        }
        if self.colors_enabled {
            let counter = format!("[{}/{}]", current, total);
            let _ = writeln!(
                self.writer,
                "{} {} {} {}",
                counter.cyan(),
                from.dimmed(),
                "→".cyan(),
                to
            );
        } else {
            let _ = writeln!(self.writer, "[{}/{}] {} -> {}", current, total, from, to);
        }
    }

    /// Report progress on a single rename
    pub fn rename_progress(&mut self, current: usize, total: usize, from: &str, to: &str) {
        self.step(current, total, from, to);
    }

    /// Report progress on a single undo; `from` is the renamed file
    pub fn undo_progress(&mut self, current: usize, total: usize, from: &str, to: &str) {
        self.step(current, total, from, to);
    }

    /// Report a non-fatal problem
    pub fn warn(&mut self, message: &str) {
        if self.silent {
            return;
        }
        if self.colors_enabled {
            let _ = writeln!(self.writer, "{} {}", "!".yellow().bold(), message.yellow());
        } else {
            let _ = writeln!(self.writer, "Warning: {}", message);
        }
    }

    /// Report the session log location
    pub fn log_started(&mut self, path: &Path) {
        if self.silent {
            return;
        }
        if self.colors_enabled {
            let _ = writeln!(
                self.writer,
                "{}",
                format!("Logging to: {}", path.display()).dimmed()
            );
        } else {
            let _ = writeln!(self.writer, "Logging to: {}", path.display());
        }
    }
}
