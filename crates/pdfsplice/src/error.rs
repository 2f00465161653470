//! Error types for pdfsplice.
//!
//! Errors fall into two groups. Validation errors (`RangeFormat`,
//! `RangeOutOfBounds`, `SelfOverwrite`, `NothingToMerge`, `NoDocument`,
//! `AreaBusy`) are returned synchronously before any background job starts.
//! Everything else is raised inside a running job and ends up as that job's
//! terminal failure message.

use std::io;
use std::path::PathBuf;

use crate::job::OperationArea;

/// Result type alias for pdfsplice operations.
pub type Result<T> = std::result::Result<T, SpliceError>;

/// Main error type for pdfsplice operations.
#[derive(Debug, thiserror::Error)]
pub enum SpliceError {
    /// Page range text could not be parsed.
    #[error("Invalid range format: '{input}'\n  Reason: {reason}")]
    RangeFormat {
        /// The text the user entered.
        input: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Page range refers to a page past the end of the document.
    #[error("Page range is not correct: page {max} requested but the document has {page_count} page(s)")]
    RangeOutOfBounds {
        /// Highest page number in the range.
        max: u32,
        /// Pages in the target document.
        page_count: usize,
    },

    /// A merge input disappeared before it could be appended.
    #[error("The file {} does not exist.\nThe merging was not completed!", path.display())]
    MissingSource {
        /// Path of the missing input.
        path: PathBuf,
    },

    /// The split output directory could not be created.
    #[error("Failed to create directory: {}\n  Reason: {source}", path.display())]
    DirectoryCreate {
        /// Directory that was being created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Writing the staged file or publishing it failed.
    #[error("Failed to write result file: {}\n  Reason: {source}", path.display())]
    Staging {
        /// Destination being published.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A source document could not be opened.
    #[error("Failed to load PDF: {}\n  Reason: {reason}", path.display())]
    FailedToLoadPdf {
        /// Path to the PDF file.
        path: PathBuf,
        /// Reason reported by the codec.
        reason: String,
    },

    /// A page index was not present in the source while a job ran.
    #[error("Page {page} does not exist (document has {page_count} page(s))")]
    PageNotFound {
        /// Requested 1-based page number.
        page: u32,
        /// Pages in the source document.
        page_count: usize,
    },

    /// Merge destination is one of the inputs.
    #[error("The file cannot be written to itself: {}", path.display())]
    SelfOverwrite {
        /// The offending destination.
        path: PathBuf,
    },

    /// Fewer than two merge inputs were supplied.
    #[error("Nothing to merge...")]
    NothingToMerge,

    /// No document is open for the requested area.
    #[error("Nothing to do...\nPlease choose a Source File ({0})")]
    NoDocument(OperationArea),

    /// A job is already running in this operation area.
    #[error("A {0} job is already running")]
    AreaBusy(OperationArea),

    /// Engine options are invalid.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// What is wrong with the configuration.
        message: String,
    },

    /// PDF codec failure.
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Anything else; surfaced as a generic warning.
    #[error("{message}")]
    Unexpected {
        /// Error message.
        message: String,
    },
}

impl SpliceError {
    /// Create a RangeFormat error.
    pub fn range_format(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::RangeFormat {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create a Staging error.
    pub fn staging(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Staging {
            path: path.into(),
            source,
        }
    }

    /// Create a FailedToLoadPdf error.
    pub fn failed_to_load_pdf(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::FailedToLoadPdf {
            path,
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Unexpected error with a custom message.
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }

    /// Whether this error is caught before a job is started.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::RangeFormat { .. }
                | Self::RangeOutOfBounds { .. }
                | Self::SelfOverwrite { .. }
                | Self::NothingToMerge
                | Self::NoDocument(_)
                | Self::AreaBusy(_)
        )
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::RangeFormat { .. } => 1,
            Self::RangeOutOfBounds { .. } => 1,
            Self::NothingToMerge => 1,
            Self::NoDocument(_) => 1,
            Self::InvalidConfig { .. } => 1,
            Self::MissingSource { .. } => 2,
            Self::FailedToLoadPdf { .. } => 3,
            Self::PageNotFound { .. } => 3,
            Self::Pdf(_) => 3,
            Self::SelfOverwrite { .. } => 4,
            Self::DirectoryCreate { .. } => 5,
            Self::Staging { .. } => 5,
            Self::Io(_) => 5,
            Self::AreaBusy(_) => 6,
            Self::Unexpected { .. } => 1,
        }
    }
}
