//! pdfsplice - Merge, split and trim PDF files.
//!
//! Command-line front end: runs one job per invocation, or reports the
//! start-up state derived from the given files.

mod cli;

use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;
use std::process;

use crate::cli::{Cli, Command};
use pdfsplice::error::{Result, SpliceError};
use pdfsplice::job::{JobHandle, JobResult};
use pdfsplice::launch::LaunchPlan;
use pdfsplice::output::{TerminalProgress, describe_session};
use pdfsplice::selection::AddOutcome;
use pdfsplice::{EngineOptions, Session};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(cli).await {
        Ok(JobResult::Succeeded) => {}
        Ok(JobResult::Failed(_)) => process::exit(1),
        Err(err) => {
            eprintln!("Error: {err}");
            process::exit(err.exit_code());
        }
    }
}

/// Install `env_logger`. `RUST_LOG` takes precedence over the flags.
fn init_logging(cli: &Cli) {
    env_logger::Builder::new()
        .filter_level(log_level(cli.verbose, cli.quiet))
        .format_timestamp(None)
        .parse_default_env()
        .init();
}

fn log_level(verbose: bool, quiet: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Error
    } else {
        LevelFilter::Warn
    }
}

/// Engine options from `--config`, then the flag overrides.
fn engine_options(cli: &Cli) -> Result<EngineOptions> {
    let mut options = match &cli.config {
        Some(path) => EngineOptions::load(path)?,
        None => EngineOptions::default(),
    };
    if let Some(dir) = &cli.staging_dir {
        options = options.with_staging_dir(dir);
    }
    if cli.no_compress {
        options.compress = false;
    }
    options.validate()?;
    Ok(options)
}

/// Main application logic.
async fn run(cli: Cli) -> Result<JobResult> {
    let options = engine_options(&cli)?;
    log::debug!("{} v{}", pdfsplice::NAME, pdfsplice::VERSION);

    let Some(command) = cli.command else {
        let plan = LaunchPlan::from_args(&cli.files);
        for path in &plan.ignored {
            log::warn!("Ignoring {}: not a PDF file", path.display());
        }
        let session = Session::from_plan(plan, options).await?;
        print!("{}", describe_session(&session));
        return Ok(JobResult::Succeeded);
    };

    let mut session = Session::new(options)?;
    let handle = match command {
        Command::Extract {
            file,
            pages,
            output,
        } => {
            session.open_extract(file).await?;
            session.extract_range(&pages, output)?
        }
        Command::Split { file, output } => {
            session.open_extract(file).await?;
            session.split_pages(output)?
        }
        Command::Delete {
            file,
            pages,
            output,
        } => {
            session.open_delete(file).await?;
            session.delete_range(&pages, output)?
        }
        Command::Merge {
            inputs,
            output,
            no_bookmarks,
        } => {
            fill_merge_list(&mut session, inputs)?;
            session.merge(output, !no_bookmarks)?
        }
    };

    Ok(wait_for(&session, handle, cli.quiet).await)
}

/// Add the inputs in the order given. Repeats are kept since they were typed
/// on purpose.
fn fill_merge_list(session: &mut Session, inputs: Vec<PathBuf>) -> Result<()> {
    let list = session.merge_list_mut();
    for path in inputs {
        if list.add(path.clone(), true) == AddOutcome::NotPdf {
            log::warn!("Ignoring {}: not a PDF file", path.display());
        }
    }
    if list.len() < 2 {
        return Err(SpliceError::NothingToMerge);
    }
    Ok(())
}

async fn wait_for(session: &Session, handle: JobHandle, quiet: bool) -> JobResult {
    let output = handle.output_path().to_path_buf();
    let kind = handle.kind();

    let mut progress = TerminalProgress::stdout(quiet);
    let result = session.monitor(handle).run(&mut progress).await;

    if result.is_success() && !quiet {
        println!("{kind} result: {}", output.display());
    }
    result
}
