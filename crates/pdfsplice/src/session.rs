//! Caller-side workflow.
//!
//! A [`Session`] owns the document slots of the extract and delete areas,
//! the merge list, and the job runner. Every operation validates its input
//! synchronously and only then submits a job, so malformed ranges,
//! out-of-bounds pages and self-overwriting merges are rejected before any
//! background work starts.

use chrono::Local;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::EngineOptions;
use crate::error::{Result, SpliceError};
use crate::io::DocumentHandle;
use crate::job::{JobHandle, JobObserver, JobRunner, OperationArea, ProgressMonitor};
use crate::launch::{LaunchPlan, StartView};
use crate::range::PageRange;
use crate::selection::MergeList;
use crate::transform::{ProgressSink, TransformJob};
use crate::utils::{self, same_file, sibling_dir};

/// Document slots, merge list and job runner for one user.
pub struct Session {
    options: EngineOptions,
    runner: JobRunner,
    extract_doc: Option<DocumentHandle>,
    delete_doc: Option<DocumentHandle>,
    merge_list: MergeList,
    sink: Option<Arc<dyn ProgressSink>>,
}

impl Session {
    /// Create a session with empty slots.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `options` fail validation.
    pub fn new(options: EngineOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            runner: JobRunner::new(&options),
            options,
            extract_doc: None,
            delete_doc: None,
            merge_list: MergeList::new(),
            sink: None,
        })
    }

    /// Create a session and apply a launch plan.
    ///
    /// A single-document plan loads the file once and places it in both the
    /// extract and delete slots.
    pub async fn from_plan(plan: LaunchPlan, options: EngineOptions) -> Result<Self> {
        let mut session = Self::new(options)?;
        match plan.view {
            StartView::ExtractDelete(path) => {
                let handle = DocumentHandle::open(path).await?;
                session.delete_doc = Some(handle.clone());
                session.extract_doc = Some(handle);
            }
            StartView::Merge(list) => session.merge_list = list,
        }
        Ok(session)
    }

    /// Replace the job observer.
    pub fn with_observer(mut self, observer: Arc<dyn JobObserver>) -> Self {
        self.runner = self.runner.with_observer(observer);
        self
    }

    /// Attach a progress sink to every job submitted from now on.
    pub fn with_progress_sink(mut self, sink: impl ProgressSink + 'static) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// Engine options in effect.
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// The job runner.
    pub fn runner(&self) -> &JobRunner {
        &self.runner
    }

    /// Open `path` into the extract slot.
    pub async fn open_extract(&mut self, path: impl Into<PathBuf>) -> Result<&DocumentHandle> {
        self.ensure_idle(OperationArea::Extract)?;
        let handle = DocumentHandle::open(path).await?;
        Ok(self.extract_doc.insert(handle))
    }

    /// Open `path` into the delete slot.
    pub async fn open_delete(&mut self, path: impl Into<PathBuf>) -> Result<&DocumentHandle> {
        self.ensure_idle(OperationArea::Delete)?;
        let handle = DocumentHandle::open(path).await?;
        Ok(self.delete_doc.insert(handle))
    }

    /// Document open in `area`, if any. The merge area has none.
    pub fn document(&self, area: OperationArea) -> Option<&DocumentHandle> {
        match area {
            OperationArea::Extract => self.extract_doc.as_ref(),
            OperationArea::Delete => self.delete_doc.as_ref(),
            OperationArea::Merge => None,
        }
    }

    /// Drop the document open in `area`.
    ///
    /// # Errors
    ///
    /// Returns `AreaBusy` while a job runs in `area`.
    pub fn close(&mut self, area: OperationArea) -> Result<()> {
        self.ensure_idle(area)?;
        match area {
            OperationArea::Extract => self.extract_doc = None,
            OperationArea::Delete => self.delete_doc = None,
            OperationArea::Merge => self.merge_list.clear(),
        }
        Ok(())
    }

    /// The merge list.
    pub fn merge_list(&self) -> &MergeList {
        &self.merge_list
    }

    /// The merge list, for editing.
    pub fn merge_list_mut(&mut self) -> &mut MergeList {
        &mut self.merge_list
    }

    /// Extract the pages of `range_text` from the extract document.
    ///
    /// Without a destination the result is written next to the source as
    /// `{stem}_extr_result_{timestamp}.pdf`.
    ///
    /// # Errors
    ///
    /// Returns `NoDocument`, `RangeFormat`, `RangeOutOfBounds` or `AreaBusy`
    /// without starting a job.
    pub fn extract_range(
        &self,
        range_text: &str,
        destination: Option<PathBuf>,
    ) -> Result<JobHandle> {
        let source = self.require(OperationArea::Extract)?;
        let range = checked_range(range_text, source)?;
        let destination = destination.unwrap_or_else(|| {
            default_beside(source.source_path(), |p| {
                utils::extract_output_name(p, Local::now())
            })
        });
        self.submit(TransformJob::range_extract(source.clone(), range, destination))
    }

    /// Split the extract document into one file per page.
    ///
    /// Pages are written to `root/{stem}_extr_result_{timestamp}/`; `root`
    /// defaults to the source's directory.
    pub fn split_pages(&self, root: Option<PathBuf>) -> Result<JobHandle> {
        let source = self.require(OperationArea::Extract)?;
        let root = root.unwrap_or_else(|| sibling_dir(source.source_path()));
        let dir_name = utils::split_dir_name(source.source_path(), Local::now());
        self.submit(TransformJob::page_split(source.clone(), root, dir_name))
    }

    /// Delete the pages of `range_text` from a copy of the delete document.
    ///
    /// Without a destination the result is written next to the source as
    /// `{stem}_del_result_{timestamp}.pdf`.
    pub fn delete_range(
        &self,
        range_text: &str,
        destination: Option<PathBuf>,
    ) -> Result<JobHandle> {
        let source = self.require(OperationArea::Delete)?;
        let range = checked_range(range_text, source)?;
        let destination = destination.unwrap_or_else(|| {
            default_beside(source.source_path(), |p| {
                utils::delete_output_name(p, Local::now())
            })
        });
        self.submit(TransformJob::range_delete(source.clone(), range, destination))
    }

    /// Merge the listed files.
    ///
    /// Without a destination the result is written next to the first input
    /// as `result_{timestamp}.pdf`.
    ///
    /// # Errors
    ///
    /// Returns `NothingToMerge` for fewer than two inputs and `SelfOverwrite`
    /// when the destination is one of the inputs.
    pub fn merge(&self, destination: Option<PathBuf>, outlines: bool) -> Result<JobHandle> {
        let inputs = self.merge_list.paths();
        if inputs.len() < 2 {
            return Err(SpliceError::NothingToMerge);
        }

        let destination = destination.unwrap_or_else(|| {
            sibling_dir(&inputs[0]).join(utils::merge_output_name(Local::now()))
        });
        if inputs.iter().any(|input| same_file(input, &destination)) {
            return Err(SpliceError::SelfOverwrite { path: destination });
        }

        self.submit(TransformJob::merge(inputs.to_vec(), destination, outlines))
    }

    /// A monitor for `handle` using the configured polling interval.
    pub fn monitor(&self, handle: JobHandle) -> ProgressMonitor {
        ProgressMonitor::new(handle, self.options.poll_interval())
    }

    fn submit(&self, job: TransformJob) -> Result<JobHandle> {
        let job = match &self.sink {
            Some(sink) => job.with_shared_sink(Arc::clone(sink)),
            None => job,
        };
        self.runner.submit(job)
    }

    fn require(&self, area: OperationArea) -> Result<&DocumentHandle> {
        self.document(area).ok_or(SpliceError::NoDocument(area))
    }

    fn ensure_idle(&self, area: OperationArea) -> Result<()> {
        if self.runner.is_busy(area) {
            return Err(SpliceError::AreaBusy(area));
        }
        Ok(())
    }
}

fn checked_range(text: &str, source: &DocumentHandle) -> Result<PageRange> {
    let range = PageRange::parse(text)?;
    range.validate(source.page_count())?;
    Ok(range)
}

fn default_beside(source: &Path, name: impl FnOnce(&Path) -> String) -> PathBuf {
    sibling_dir(source).join(name(source))
}
