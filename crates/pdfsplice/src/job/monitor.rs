//! Cooperative progress polling.
//!
//! The monitor never blocks the caller. Each [`ProgressMonitor::poll`] relays
//! new progress text, and once the worker is gone it reads the terminal
//! result and hands it to the sink exactly once. [`ProgressMonitor::run`]
//! repeats that on a timer until the job is done.

use std::time::Duration;
use tokio::time::MissedTickBehavior;

use crate::job::{GENERIC_FAILURE, JobHandle, JobResult};

/// The caller's side of a monitor.
pub trait MonitorSink {
    /// New progress text is available.
    fn progress(&mut self, message: &str);

    /// The job reached its terminal state.
    fn finished(&mut self, result: &JobResult);
}

/// Outcome of one poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorStep {
    /// The worker is still active; poll again later.
    Running,
    /// The job is done.
    Finished(JobResult),
}

/// Relays one job's progress to a [`MonitorSink`].
#[derive(Debug)]
pub struct ProgressMonitor {
    handle: JobHandle,
    interval: Duration,
    last_message: Option<String>,
    result: Option<JobResult>,
}

impl ProgressMonitor {
    /// Monitor `handle`, polling every `interval` when run.
    pub fn new(handle: JobHandle, interval: Duration) -> Self {
        Self {
            handle,
            interval,
            last_message: None,
            result: None,
        }
    }

    /// The monitored job.
    pub fn handle(&self) -> &JobHandle {
        &self.handle
    }

    /// One cooperative tick.
    pub fn poll(&mut self, sink: &mut dyn MonitorSink) -> MonitorStep {
        if let Some(result) = &self.result {
            return MonitorStep::Finished(result.clone());
        }

        // Checked before reading the snapshot: a finished worker has already
        // published its terminal status.
        let active = self.handle.is_active();

        if let Some(snapshot) = self.handle.changed_snapshot()
            && let Some(progress) = snapshot.progress
            && self.last_message.as_deref() != Some(progress.message.as_str())
        {
            sink.progress(&progress.message);
            self.last_message = Some(progress.message);
        }

        if active {
            return MonitorStep::Running;
        }

        let result = self
            .handle
            .snapshot()
            .status
            .result()
            .unwrap_or_else(|| JobResult::Failed(GENERIC_FAILURE.to_string()));
        sink.finished(&result);
        self.result = Some(result.clone());
        MonitorStep::Finished(result)
    }

    /// Poll on a timer until the job finishes.
    pub async fn run(mut self, sink: &mut dyn MonitorSink) -> JobResult {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let MonitorStep::Finished(result) = self.poll(sink) {
                return result;
            }
        }
    }
}
