//! Background job execution and observation.
//!
//! A job moves through `Idle -> Running -> {Succeeded, Failed}` exactly once.
//! The worker thread is the only writer of a job's [`JobSnapshot`]; the
//! [`ProgressMonitor`] is its only reader.

pub mod events;
pub mod monitor;
pub mod runner;

pub use events::{JobEvent, JobObserver, LogObserver, MemoryObserver};
pub use monitor::{MonitorSink, MonitorStep, ProgressMonitor};
pub use runner::{JobHandle, JobRunner};

use std::fmt;

/// Message shown when a job fails for an unexpected reason.
pub const GENERIC_FAILURE: &str = "Something went wrong...";

/// Group of controls that share one running job at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OperationArea {
    /// Merging several files.
    Merge,
    /// Range extraction and page split.
    Extract,
    /// Range deletion.
    Delete,
}

impl fmt::Display for OperationArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Merge => "merge",
            Self::Extract => "extract",
            Self::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Identifier of a submitted job, unique per runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Progress counters and the text to show for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobProgress {
    /// Items done.
    pub current: u64,
    /// Items in total.
    pub total: u64,
    /// Human-readable progress line.
    pub message: String,
}

impl JobProgress {
    /// Create a progress update.
    pub fn new(current: u64, total: u64, message: impl Into<String>) -> Self {
        Self {
            current,
            total,
            message: message.into(),
        }
    }
}

/// Lifecycle state of a job.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum JobStatus {
    /// Not started.
    #[default]
    Idle,
    /// Executing on a worker.
    Running,
    /// Finished and published.
    Succeeded,
    /// Finished with an error message.
    Failed(String),
}

impl JobStatus {
    /// Whether the job has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed(_))
    }

    /// The terminal result, if there is one.
    pub fn result(&self) -> Option<JobResult> {
        match self {
            Self::Succeeded => Some(JobResult::Succeeded),
            Self::Failed(message) => Some(JobResult::Failed(message.clone())),
            Self::Idle | Self::Running => None,
        }
    }
}

/// Terminal outcome of a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobResult {
    /// The result was published.
    Succeeded,
    /// The job stopped; the message says why.
    Failed(String),
}

impl JobResult {
    /// Build a result from a terminal message; an empty message means success.
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.is_empty() {
            Self::Succeeded
        } else {
            Self::Failed(message)
        }
    }

    /// Whether the job succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }

    /// Terminal message; empty on success.
    pub fn message(&self) -> &str {
        match self {
            Self::Succeeded => "",
            Self::Failed(message) => message,
        }
    }
}

impl From<JobResult> for JobStatus {
    fn from(result: JobResult) -> Self {
        match result {
            JobResult::Succeeded => Self::Succeeded,
            JobResult::Failed(message) => Self::Failed(message),
        }
    }
}

/// What the worker last published about a job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobSnapshot {
    /// Lifecycle state.
    pub status: JobStatus,
    /// Latest progress update, if any.
    pub progress: Option<JobProgress>,
}

impl JobSnapshot {
    /// Snapshot of a job that has just been started.
    pub fn running() -> Self {
        Self {
            status: JobStatus::Running,
            progress: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_from_message() {
        assert_eq!(JobResult::from_message(""), JobResult::Succeeded);
        assert_eq!(
            JobResult::from_message("Page range is not correct"),
            JobResult::Failed("Page range is not correct".into())
        );
    }

    #[test]
    fn test_result_message() {
        assert_eq!(JobResult::Succeeded.message(), "");
        assert_eq!(JobResult::Failed("x".into()).message(), "x");
        assert!(JobResult::Succeeded.is_success());
    }

    #[test]
    fn test_status_terminal() {
        assert!(!JobStatus::Idle.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
        assert!(JobStatus::Succeeded.is_terminal());
        assert_eq!(
            JobStatus::Failed("boom".into()).result(),
            Some(JobResult::Failed("boom".into()))
        );
        assert_eq!(JobStatus::Running.result(), None);
    }

    #[test]
    fn test_area_display() {
        assert_eq!(OperationArea::Merge.to_string(), "merge");
        assert_eq!(OperationArea::Extract.to_string(), "extract");
        assert_eq!(OperationArea::Delete.to_string(), "delete");
    }
}
