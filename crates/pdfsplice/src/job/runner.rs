//! Running transform jobs off the caller's thread.
//!
//! Each accepted job gets one `spawn_blocking` worker. The worker publishes
//! progress through a `watch` channel, catches panics, and always ends with
//! exactly one terminal status. At most one job runs per [`OperationArea`].

use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::EngineOptions;
use crate::error::{Result, SpliceError};
use crate::io::StagedWrite;
use crate::job::{
    GENERIC_FAILURE, JobEvent, JobId, JobObserver, JobResult, JobSnapshot, LogObserver,
    OperationArea,
};
use crate::transform::{JobKind, TransformJob};

type BusyAreas = Arc<Mutex<HashSet<OperationArea>>>;

/// Marks an area busy for as long as it lives.
struct AreaClaim {
    busy: BusyAreas,
    area: OperationArea,
}

impl AreaClaim {
    fn acquire(busy: &BusyAreas, area: OperationArea) -> Result<Self> {
        let mut areas = busy.lock().unwrap_or_else(PoisonError::into_inner);
        if !areas.insert(area) {
            return Err(SpliceError::AreaBusy(area));
        }
        Ok(Self {
            busy: Arc::clone(busy),
            area,
        })
    }
}

impl Drop for AreaClaim {
    fn drop(&mut self) {
        self.busy
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.area);
    }
}

/// Submits transform jobs to blocking workers.
pub struct JobRunner {
    staging: StagedWrite,
    observer: Arc<dyn JobObserver>,
    busy: BusyAreas,
    next_id: AtomicU64,
}

impl JobRunner {
    /// Create a runner that logs job events.
    pub fn new(options: &EngineOptions) -> Self {
        Self {
            staging: StagedWrite::from_options(options),
            observer: Arc::new(LogObserver),
            busy: Arc::default(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Replace the job observer.
    pub fn with_observer(mut self, observer: Arc<dyn JobObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Whether a job is running in `area`.
    pub fn is_busy(&self, area: OperationArea) -> bool {
        self.busy
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&area)
    }

    /// Start `job` on a blocking worker.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `AreaBusy` if a job is already running in the job's area.
    /// Errors raised while the job runs are not returned here; they become
    /// the job's terminal status.
    pub fn submit(&self, job: TransformJob) -> Result<JobHandle> {
        let area = job.area();
        let claim = AreaClaim::acquire(&self.busy, area)?;

        let id = JobId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let kind = job.kind();
        let output = job.output_path();
        let (tx, rx) = watch::channel(JobSnapshot::running());

        self.observer
            .on_event(&JobEvent::Started { id, kind, area });

        let staging = self.staging.clone();
        let observer = Arc::clone(&self.observer);
        let task = tokio::task::spawn_blocking(move || {
            let start = Instant::now();
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                job.execute(&staging, &mut |update| {
                    tx.send_modify(|snapshot| snapshot.progress = Some(update));
                })
            }));

            let result = match outcome {
                Ok(Ok(())) => JobResult::Succeeded,
                Ok(Err(e)) => JobResult::Failed(e.to_string()),
                Err(_) => JobResult::Failed(GENERIC_FAILURE.to_string()),
            };

            let elapsed = start.elapsed();
            observer.on_event(&match &result {
                JobResult::Succeeded => JobEvent::Succeeded { id, kind, elapsed },
                JobResult::Failed(message) => JobEvent::Failed {
                    id,
                    kind,
                    elapsed,
                    message: message.clone(),
                },
            });

            drop(claim);
            tx.send_modify(|snapshot| snapshot.status = result.clone().into());
            result
        });

        Ok(JobHandle {
            id,
            kind,
            area,
            output,
            snapshot: rx,
            task,
        })
    }
}

/// Caller-side view of a submitted job.
#[derive(Debug)]
pub struct JobHandle {
    id: JobId,
    kind: JobKind,
    area: OperationArea,
    output: PathBuf,
    snapshot: watch::Receiver<JobSnapshot>,
    task: JoinHandle<JobResult>,
}

impl JobHandle {
    /// Job identifier.
    pub fn id(&self) -> JobId {
        self.id
    }

    /// Transform kind.
    pub fn kind(&self) -> JobKind {
        self.kind
    }

    /// Area the job occupies.
    pub fn area(&self) -> OperationArea {
        self.area
    }

    /// Destination file, or the split directory.
    pub fn output_path(&self) -> &Path {
        &self.output
    }

    /// Whether the worker is still running.
    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }

    /// Latest published state.
    pub fn snapshot(&self) -> JobSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Latest state, marking it seen. Returns `None` if nothing changed
    /// since the previous call.
    pub(crate) fn changed_snapshot(&mut self) -> Option<JobSnapshot> {
        match self.snapshot.has_changed() {
            Ok(true) => Some(self.snapshot.borrow_and_update().clone()),
            _ => None,
        }
    }

    /// Wait for the job to finish.
    pub async fn wait(self) -> JobResult {
        match self.task.await {
            Ok(result) => result,
            Err(e) => {
                log::error!("Job {} worker failed: {}", self.id, e);
                JobResult::Failed(GENERIC_FAILURE.to_string())
            }
        }
    }
}
