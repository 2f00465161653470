//! Start-up view selection from command-line arguments.
//!
//! Exactly one PDF argument opens it for extraction and deletion. Anything
//! else (no PDFs, or several) starts in the merge view with the PDFs listed
//! in sorted order. Arguments that are not `.pdf` files are ignored.

use std::path::PathBuf;

use crate::selection::MergeList;
use crate::utils::is_pdf_path;

/// Which view the session starts in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartView {
    /// One document, preloaded into both the extract and delete slots.
    ExtractDelete(PathBuf),
    /// The merge list, pre-populated.
    Merge(MergeList),
}

/// Start-up decision derived from command-line arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    /// View to start in.
    pub view: StartView,
    /// Arguments that were ignored because they are not PDFs.
    pub ignored: Vec<PathBuf>,
}

impl LaunchPlan {
    /// Decide the start view from the arguments after the program name.
    pub fn from_args<I, P>(args: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let (pdfs, ignored): (Vec<PathBuf>, Vec<PathBuf>) =
            args.into_iter().map(Into::into).partition(|p| is_pdf_path(p));

        let view = match <[PathBuf; 1]>::try_from(pdfs) {
            Ok([single]) => StartView::ExtractDelete(single),
            Err(pdfs) => StartView::Merge(MergeList::from_paths(pdfs)),
        };

        Self { view, ignored }
    }

    /// Whether the plan starts in the merge view.
    pub fn is_merge(&self) -> bool {
        matches!(self.view, StartView::Merge(_))
    }
}
