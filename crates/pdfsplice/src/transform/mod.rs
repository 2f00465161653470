//! Document transforms.
//!
//! A [`TransformJob`] describes one unit of background work:
//! - [`Transform::RangeExtract`] copies selected pages, in range order
//! - [`Transform::RangeDelete`] keeps every page not in the range
//! - [`Transform::PageSplit`] writes each page to its own file
//! - [`Transform::Merge`] concatenates several files, optionally with bookmarks
//!
//! Jobs are plain data. They are executed by the
//! [`JobRunner`](crate::job::JobRunner), which calls [`TransformJob::execute`]
//! on a blocking worker thread.

pub mod bookmarks;
pub mod delete;
pub mod extract;
pub mod merge;
pub mod pages;
pub mod split;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::Result;
use crate::io::{DocumentHandle, StagedWrite};
use crate::job::{JobProgress, OperationArea};
use crate::range::PageRange;

pub use pages::PageAssembler;

/// Receiver of human-readable progress text.
///
/// Implemented for any `Fn(&str) + Send + Sync`, so a closure can be passed
/// where a sink is expected.
pub trait ProgressSink: Send + Sync {
    /// Report a progress line.
    fn report(&self, message: &str);
}

impl<F> ProgressSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn report(&self, message: &str) {
        self(message)
    }
}

/// What kind of transform a job performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobKind {
    /// Copy a page range into a new file.
    RangeExtract,
    /// Remove a page range, keeping the rest.
    RangeDelete,
    /// One output file per page.
    PageSplit,
    /// Concatenate several files.
    Merge,
}

impl JobKind {
    /// Operation area jobs of this kind run in.
    pub fn area(self) -> OperationArea {
        match self {
            Self::RangeExtract | Self::PageSplit => OperationArea::Extract,
            Self::RangeDelete => OperationArea::Delete,
            Self::Merge => OperationArea::Merge,
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RangeExtract => "range extract",
            Self::RangeDelete => "range delete",
            Self::PageSplit => "page split",
            Self::Merge => "merge",
        };
        f.write_str(name)
    }
}

/// The transform a job performs, with its inputs.
#[derive(Debug, Clone)]
pub enum Transform {
    /// Copy the pages of `range`, in range order, into `destination`.
    RangeExtract {
        /// Document to copy from.
        source: DocumentHandle,
        /// Pages to copy, in output order.
        range: PageRange,
        /// Result file.
        destination: PathBuf,
    },
    /// Copy every page not in `range` into `destination`.
    RangeDelete {
        /// Document to copy from.
        source: DocumentHandle,
        /// Pages to leave out.
        range: PageRange,
        /// Result file.
        destination: PathBuf,
    },
    /// Write every page to `root/dir_name/Page {n} - {stem}.pdf`.
    PageSplit {
        /// Document to split.
        source: DocumentHandle,
        /// Directory the job directory is created in.
        root: PathBuf,
        /// Name of the job directory; must not exist yet.
        dir_name: String,
    },
    /// Concatenate `inputs` into `destination`.
    Merge {
        /// Files to concatenate, in order.
        inputs: Vec<PathBuf>,
        /// Result file.
        destination: PathBuf,
        /// Add one bookmark per input.
        outlines: bool,
    },
}

/// A transform plus an optional progress sink.
#[derive(Clone)]
pub struct TransformJob {
    transform: Transform,
    sink: Option<Arc<dyn ProgressSink>>,
}

impl fmt::Debug for TransformJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformJob")
            .field("transform", &self.transform)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

impl TransformJob {
    /// Wrap a transform without a sink.
    pub fn new(transform: Transform) -> Self {
        Self {
            transform,
            sink: None,
        }
    }

    /// Extract `range` from `source` into `destination`.
    pub fn range_extract(
        source: DocumentHandle,
        range: PageRange,
        destination: impl Into<PathBuf>,
    ) -> Self {
        Self::new(Transform::RangeExtract {
            source,
            range,
            destination: destination.into(),
        })
    }

    /// Delete `range` from a copy of `source` written to `destination`.
    pub fn range_delete(
        source: DocumentHandle,
        range: PageRange,
        destination: impl Into<PathBuf>,
    ) -> Self {
        Self::new(Transform::RangeDelete {
            source,
            range,
            destination: destination.into(),
        })
    }

    /// Split `source` into single pages under `root/dir_name`.
    pub fn page_split(
        source: DocumentHandle,
        root: impl Into<PathBuf>,
        dir_name: impl Into<String>,
    ) -> Self {
        Self::new(Transform::PageSplit {
            source,
            root: root.into(),
            dir_name: dir_name.into(),
        })
    }

    /// Merge `inputs` into `destination`.
    pub fn merge(inputs: Vec<PathBuf>, destination: impl Into<PathBuf>, outlines: bool) -> Self {
        Self::new(Transform::Merge {
            inputs,
            destination: destination.into(),
            outlines,
        })
    }

    /// Attach a progress sink.
    pub fn with_sink(self, sink: impl ProgressSink + 'static) -> Self {
        self.with_shared_sink(Arc::new(sink))
    }

    /// Attach a sink shared with other jobs.
    pub fn with_shared_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// The transform performed.
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// The attached sink, if any.
    pub fn sink(&self) -> Option<&Arc<dyn ProgressSink>> {
        self.sink.as_ref()
    }

    /// What kind of job this is.
    pub fn kind(&self) -> JobKind {
        match self.transform {
            Transform::RangeExtract { .. } => JobKind::RangeExtract,
            Transform::RangeDelete { .. } => JobKind::RangeDelete,
            Transform::PageSplit { .. } => JobKind::PageSplit,
            Transform::Merge { .. } => JobKind::Merge,
        }
    }

    /// Operation area the job occupies while it runs.
    pub fn area(&self) -> OperationArea {
        self.kind().area()
    }

    /// Where the result is published: a file, or the split directory.
    pub fn output_path(&self) -> PathBuf {
        match &self.transform {
            Transform::RangeExtract { destination, .. }
            | Transform::RangeDelete { destination, .. }
            | Transform::Merge { destination, .. } => destination.clone(),
            Transform::PageSplit { root, dir_name, .. } => root.join(dir_name),
        }
    }

    /// Run the transform on the current thread.
    ///
    /// Every progress update goes to `progress` and, as text, to the attached
    /// sink. This blocks; the runner calls it from a blocking worker.
    ///
    /// # Errors
    ///
    /// Returns the first error the transform hits. Nothing is published to a
    /// destination file unless the whole document was produced.
    pub fn execute(
        &self,
        staging: &StagedWrite,
        progress: &mut dyn FnMut(JobProgress),
    ) -> Result<()> {
        let mut report = |update: JobProgress| {
            if let Some(sink) = &self.sink {
                sink.report(&update.message);
            }
            progress(update);
        };

        match &self.transform {
            Transform::RangeExtract {
                source,
                range,
                destination,
            } => extract::run(source, range, destination, staging, &mut report).map(|_| ()),
            Transform::RangeDelete {
                source,
                range,
                destination,
            } => delete::run(source, range, destination, staging, &mut report).map(|_| ()),
            Transform::PageSplit {
                source,
                root,
                dir_name,
            } => split::run(source, &root.join(dir_name), staging, &mut report),
            Transform::Merge {
                inputs,
                destination,
                outlines,
            } => merge::run(inputs, destination, *outlines, staging, &mut report).map(|_| ()),
        }
    }
}
