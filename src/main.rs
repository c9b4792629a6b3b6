use std::io;
use std::path::Path;

use clap::Parser;
use relabeler::apply::{apply_plan, ApplyOptions};
use relabeler::archive::{rename_in_archive, ArchiveRequest};
use relabeler::cli::{Args, Command, OptionArgs, PatternArgs};
use relabeler::config::{config_from_env, AppConfig};
use relabeler::error::{AppError, ExitCode};
use relabeler::logging;
use relabeler::mapping::{load_mappings, save_mappings};
use relabeler::observer::ProgressObserver;
use relabeler::output::{display_apply_summary, display_preview, display_undo_report};
use relabeler::progress::Progress;
use relabeler::rename::{build_plan, PathMapping, RenameOperation};
use relabeler::session_log::{maybe_create_log_path, LogSink};
use relabeler::undo::undo_mappings;
use relabeler::validator::ensure_valid;
use tracing::{debug, error, info};

fn main() {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    logging::init(args.verbose);

    let config = config_from_env();
    debug!(?config, "Configuration loaded");

    let code = match run(args, &config) {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            for msg in e.messages() {
                eprintln!("Error: {}", msg);
            }
            e.exit_code()
        }
    };

    std::process::exit(code.into());
}

fn run(args: Args, config: &AppConfig) -> Result<ExitCode, AppError> {
    let mut progress = Progress::new(args.verbose > 0);

    match args.command {
        Command::Preview(target) => preview(&target),
        Command::Rename {
            pattern,
            log,
            dry_run,
            mappings_out,
        } => {
            let mappings_out = mappings_out.unwrap_or_else(|| config.mappings_file.clone());
            rename(&pattern, log, dry_run, &mappings_out, config, &mut progress)
        }
        Command::Undo { mappings } => undo(&mappings, &mut progress),
        Command::Zip {
            zip_in,
            zip_out,
            options,
            log,
            dry_run,
            mappings_out,
        } => zip(
            &zip_in,
            &zip_out,
            &options,
            log,
            dry_run,
            mappings_out.as_deref(),
            config,
            &mut progress,
        ),
    }
}

fn output_error(e: io::Error) -> AppError {
    AppError::Other(format!("Failed to display output: {}", e))
}

fn open_log(enabled: bool, config: &AppConfig, progress: &mut Progress) -> Result<Option<LogSink>, AppError> {
    let path = maybe_create_log_path(enabled, &config.log)
        .map_err(|e| AppError::Other(format!("Failed to create log directory: {}", e)))?;

    Ok(path.map(|path| {
        progress.log_started(&path);
        LogSink::new(path)
    }))
}

fn preview(target: &PatternArgs) -> Result<ExitCode, AppError> {
    let options = target.options.to_options();
    ensure_valid(&target.folder, &options)?;

    let plan = build_plan(&target.folder, &options)?;
    info!("Planned {} renames", plan.len());

    display_preview(&plan, &mut io::stdout()).map_err(output_error)?;

    Ok(ExitCode::Success)
}

fn rename(
    target: &PatternArgs,
    log: bool,
    dry_run: bool,
    mappings_out: &Path,
    config: &AppConfig,
    progress: &mut Progress,
) -> Result<ExitCode, AppError> {
    let options = target.options.to_options();
    ensure_valid(&target.folder, &options)?;

    let plan = build_plan(&target.folder, &options)?;
    let sink = open_log(log, config, progress)?;

    let mut on_step = |current: usize, total: usize, op: &RenameOperation| -> anyhow::Result<()> {
        progress.rename_progress(current, total, &op.old_name, &op.new_name);
        Ok(())
    };
    let apply_options = ApplyOptions {
        log: sink.as_ref(),
        dry_run,
    };
    let result = apply_plan(
        &target.folder,
        &plan,
        &apply_options,
        Some(&mut on_step as &mut dyn ProgressObserver<RenameOperation>),
    )?;

    let mut stdout = io::stdout();
    display_apply_summary(plan.len(), &result, dry_run, &mut stdout).map_err(output_error)?;

    if !dry_run {
        save_mappings(mappings_out, &result.mappings)
            .map_err(|e| AppError::mapping_save(mappings_out, e))?;
        println!("\nUndo mappings saved to: {}", mappings_out.display());
    }

    if result.is_success() {
        Ok(ExitCode::Success)
    } else {
        Ok(ExitCode::GeneralError)
    }
}

fn undo(mappings_path: &Path, progress: &mut Progress) -> Result<ExitCode, AppError> {
    let mappings =
        load_mappings(mappings_path).map_err(|e| AppError::mapping_load(mappings_path, e))?;
    info!(path = ?mappings_path, count = mappings.len(), "Mappings loaded");

    let mut on_step = |current: usize, total: usize, m: &PathMapping| -> anyhow::Result<()> {
        progress.undo_progress(
            current,
            total,
            &m.new_name(),
            &m.old_path.display().to_string(),
        );
        Ok(())
    };
    let errors = undo_mappings(
        &mappings,
        Some(&mut on_step as &mut dyn ProgressObserver<PathMapping>),
    );

    display_undo_report(&errors, &mut io::stdout()).map_err(output_error)?;

    if errors.is_empty() {
        Ok(ExitCode::Success)
    } else {
        Ok(ExitCode::GeneralError)
    }
}

#[allow(clippy::too_many_arguments)]
fn zip(
    zip_in: &Path,
    zip_out: &Path,
    options: &OptionArgs,
    log: bool,
    dry_run: bool,
    mappings_out: Option<&Path>,
    config: &AppConfig,
    progress: &mut Progress,
) -> Result<ExitCode, AppError> {
    let options = options.to_options();
    let sink = open_log(log, config, progress)?;

    if mappings_out.is_some() && !dry_run {
        progress.warn("Undo mappings point into a temporary folder that is removed after this run");
    }

    let mut on_step = |current: usize, total: usize, op: &RenameOperation| -> anyhow::Result<()> {
        progress.rename_progress(current, total, &op.old_name, &op.new_name);
        Ok(())
    };
    let request = ArchiveRequest {
        zip_in,
        zip_out,
        options: &options,
        dry_run,
        log: sink.as_ref(),
        mappings_out,
    };
    let outcome = rename_in_archive(
        &request,
        Some(&mut on_step as &mut dyn ProgressObserver<RenameOperation>),
    )?;

    display_apply_summary(outcome.planned.len(), &outcome.result, dry_run, &mut io::stdout())
        .map_err(output_error)?;

    if let Some(path) = &outcome.archive_written {
        println!("\nArchive written to: {}", path.display());
    }
    if let (Some(path), false) = (mappings_out, dry_run) {
        println!("Undo mappings saved to: {}", path.display());
    }

    if outcome.result.is_success() {
        Ok(ExitCode::Success)
    } else {
        Ok(ExitCode::GeneralError)
    }
}
