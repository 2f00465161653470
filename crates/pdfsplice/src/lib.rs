//! pdfsplice - Merge, split and trim PDF files in the background.
//!
//! This library runs page-level PDF transforms on worker threads while the
//! caller keeps polling for progress. It supports:
//!
//! - Extracting a page range, in the order the range lists it
//! - Deleting a page range
//! - Splitting a document into one file per page
//! - Merging several documents, optionally with one bookmark per file
//! - Crash-safe publishing through a private staging file
//!
//! # Examples
//!
//! ```no_run
//! use pdfsplice::config::EngineOptions;
//! use pdfsplice::output::TerminalProgress;
//! use pdfsplice::session::Session;
//!
//! # async fn example() -> pdfsplice::Result<()> {
//! let mut session = Session::new(EngineOptions::default())?;
//! session.open_extract("report.pdf").await?;
//!
//! let handle = session.extract_range("3-7,9", None)?;
//! let mut progress = TerminalProgress::stdout(false);
//! let result = session.monitor(handle).run(&mut progress).await;
//! println!("succeeded: {}", result.is_success());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod io;
pub mod job;
pub mod launch;
pub mod output;
pub mod range;
pub mod selection;
pub mod session;
pub mod transform;
pub mod utils;

// Re-export commonly used types
pub use config::EngineOptions;
pub use error::{Result, SpliceError};
pub use job::{JobResult, OperationArea};
pub use range::PageRange;
pub use session::Session;
pub use transform::TransformJob;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
