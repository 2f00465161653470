//! CLI argument parsing for pdfsplice.
//!
//! Without a subcommand the positional files decide the start view: a single
//! PDF is opened for extracting and deleting, anything else becomes the merge
//! list. Each subcommand runs one job and waits for it.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Merge, split and trim PDF files.
#[derive(Parser, Debug)]
#[command(name = "pdfsplice")]
#[command(version)]
#[command(about = "Merge, split and trim PDF files", long_about = None)]
#[command(author)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Files to open
    ///
    /// One PDF is opened for extracting and deleting pages. Zero or several
    /// PDFs are placed in the merge list, sorted by path. Other files are
    /// ignored.
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Verbose output - log every job step
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Read engine options from a JSON file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory for staged result files
    ///
    /// Overrides the staging directory of --config. Defaults to the system
    /// temporary directory.
    #[arg(long, global = true, value_name = "DIR")]
    pub staging_dir: Option<PathBuf>,

    /// Write result files without compression
    #[arg(long, global = true)]
    pub no_compress: bool,
}

/// One job to run.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Copy a page range into a new file
    ///
    /// Pages are written in the order the range lists them, repeats
    /// included.
    ///
    /// Example:
    ///   pdfsplice extract report.pdf --pages "3-7,9,3"
    Extract {
        /// Source PDF
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Pages to copy (e.g., "3-7,9,14-17")
        #[arg(short, long, value_name = "RANGE")]
        pages: String,

        /// Result file [default: {stem}_extr_result_{timestamp}.pdf beside FILE]
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Write every page to its own file
    ///
    /// Pages go to a new directory named {stem}_extr_result_{timestamp}.
    Split {
        /// Source PDF
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Directory that receives the split directory [default: beside FILE]
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Write a copy without the given pages
    ///
    /// Example:
    ///   pdfsplice delete report.pdf --pages "1,10-12"
    Delete {
        /// Source PDF
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Pages to remove (e.g., "1,10-12")
        #[arg(short, long, value_name = "RANGE")]
        pages: String,

        /// Result file [default: {stem}_del_result_{timestamp}.pdf beside FILE]
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Concatenate PDF files in the given order
    ///
    /// Example:
    ///   pdfsplice merge cover.pdf body.pdf -o book.pdf
    Merge {
        /// Input PDFs, in merge order
        #[arg(required = true, value_name = "FILE")]
        inputs: Vec<PathBuf>,

        /// Result file [default: result_{timestamp}.pdf beside the first input]
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Do not add a bookmark per input file
        #[arg(long)]
        no_bookmarks: bool,
    },
}
