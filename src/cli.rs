use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use crate::rename::RenameOptions;

#[derive(Parser, Debug)]
#[command(name = "relabeler")]
#[command(author, version, long_about = None)]
#[command(about = "Batch rename files with a numbered pattern (preview, rename, undo)")]
pub struct Args {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the rename plan without changing anything
    Preview(PatternArgs),

    /// Apply the rename plan to the folder
    Rename {
        #[command(flatten)]
        pattern: PatternArgs,

        /// Write a session log file (see RELABELER_LOG_DIR)
        #[arg(long)]
        log: bool,

        /// Simulate without modifying the filesystem
        #[arg(long)]
        dry_run: bool,

        /// Where to save undo mappings [default: undo_mappings.json]
        #[arg(long, value_name = "PATH")]
        mappings_out: Option<PathBuf>,
    },

    /// Undo a previous rename using a mappings file
    Undo {
        /// Mappings file produced by `rename`
        mappings: PathBuf,
    },

    /// Rename the top-level files inside a zip archive
    Zip {
        /// Input zip file containing files to rename
        zip_in: PathBuf,

        /// Output zip file path
        zip_out: PathBuf,

        #[command(flatten)]
        options: OptionArgs,

        /// Write a session log file (see RELABELER_LOG_DIR)
        #[arg(long)]
        log: bool,

        /// Simulate without writing the output archive
        #[arg(long)]
        dry_run: bool,

        /// Write undo mappings to this path (paths point into a scratch folder)
        #[arg(long, value_name = "PATH")]
        mappings_out: Option<PathBuf>,
    },
}

/// Folder plus rename options, shared by `preview` and `rename`
#[derive(ClapArgs, Debug)]
pub struct PatternArgs {
    /// Folder containing the files to rename
    pub folder: PathBuf,

    #[command(flatten)]
    pub options: OptionArgs,
}

#[derive(ClapArgs, Debug)]
pub struct OptionArgs {
    /// Rename pattern with one run of 2-6 '#' for the counter, e.g. "File_###"
    #[arg(short, long)]
    pub pattern: String,

    /// Append the file timestamp date (YYYYMMDD)
    #[arg(long)]
    pub date: bool,

    /// Append the file timestamp time (HHMMSS). Requires --date
    #[arg(long)]
    pub time: bool,

    /// Change the extension, e.g. "jpg" or ".jpg"
    #[arg(long, value_name = "EXT")]
    pub ext: Option<String>,
}

impl OptionArgs {
    pub fn to_options(&self) -> RenameOptions {
        RenameOptions {
            pattern: self.pattern.clone(),
            include_date: self.date,
            include_time: self.time,
            change_extension: self.ext.is_some(),
            new_extension: self.ext.clone(),
        }
    }
}
