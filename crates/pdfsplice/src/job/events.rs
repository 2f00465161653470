//! Structured job events.
//!
//! The runner reports every job as `Started` followed by exactly one of
//! `Succeeded` or `Failed`. Observers are injected into the runner; the
//! default one writes the events to the `log` facade.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crate::job::{JobId, OperationArea};
use crate::transform::JobKind;

/// Something that happened to a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobEvent {
    /// The job was accepted and handed to a worker.
    Started {
        /// Job identifier.
        id: JobId,
        /// Transform kind.
        kind: JobKind,
        /// Area the job occupies.
        area: OperationArea,
    },
    /// The job published its result.
    Succeeded {
        /// Job identifier.
        id: JobId,
        /// Transform kind.
        kind: JobKind,
        /// Wall time on the worker.
        elapsed: Duration,
    },
    /// The job stopped with an error.
    Failed {
        /// Job identifier.
        id: JobId,
        /// Transform kind.
        kind: JobKind,
        /// Wall time on the worker.
        elapsed: Duration,
        /// Terminal message.
        message: String,
    },
}

impl JobEvent {
    /// Job the event belongs to.
    pub fn id(&self) -> JobId {
        match self {
            Self::Started { id, .. } | Self::Succeeded { id, .. } | Self::Failed { id, .. } => *id,
        }
    }

    /// Whether this is a terminal event.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Started { .. })
    }
}

/// Receiver of job events.
pub trait JobObserver: Send + Sync {
    /// Called on the submitting thread for `Started` and on the worker for
    /// terminal events.
    fn on_event(&self, event: &JobEvent);
}

/// Writes job events to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl JobObserver for LogObserver {
    fn on_event(&self, event: &JobEvent) {
        match event {
            JobEvent::Started { id, kind, area } => {
                log::info!("Job {id} started: {kind} ({area})");
            }
            JobEvent::Succeeded { id, kind, elapsed } => {
                log::info!("Job {id} finished: {kind} in {:.2}s", elapsed.as_secs_f64());
            }
            JobEvent::Failed {
                id,
                kind,
                elapsed,
                message,
            } => {
                log::error!(
                    "Job {id} failed: {kind} after {:.2}s: {message}",
                    elapsed.as_secs_f64()
                );
            }
        }
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct MemoryObserver {
    events: Mutex<Vec<JobEvent>>,
}

impl MemoryObserver {
    /// Create an empty observer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Events received so far, in order.
    pub fn events(&self) -> Vec<JobEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Events received for one job, in order.
    pub fn events_for(&self, id: JobId) -> Vec<JobEvent> {
        self.events()
            .into_iter()
            .filter(|event| event.id() == id)
            .collect()
    }
}

impl JobObserver for MemoryObserver {
    fn on_event(&self, event: &JobEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}
