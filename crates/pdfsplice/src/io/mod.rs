//! I/O operations for pdfsplice.
//!
//! This module handles loading source documents and publishing results:
//! - [`DocumentHandle`] opens a PDF off the async runtime and shares it
//! - [`StagedWrite`] writes through a private temp file and publishes by copy
//!
//! # Examples
//!
//! ```no_run
//! use pdfsplice::io::{DocumentHandle, StagedWrite};
//! use std::path::Path;
//!
//! # async fn example() -> pdfsplice::Result<()> {
//! let handle = DocumentHandle::open("input.pdf").await?;
//! let mut copy = handle.document().clone();
//! StagedWrite::new().stage_document(&mut copy, Path::new("copy.pdf"))?;
//! # Ok(())
//! # }
//! ```

pub mod document;
pub mod staging;

pub use document::DocumentHandle;
pub use staging::{PublishReport, StagedWrite};
