//! Range extraction.

use std::path::Path;

use crate::error::Result;
use crate::io::{DocumentHandle, PublishReport, StagedWrite};
use crate::job::JobProgress;
use crate::range::PageRange;
use crate::transform::PageAssembler;

/// Copy the pages of `range`, in range order, into `destination`.
///
/// Pages are appended one at a time; a page number missing from `source`
/// aborts the job before anything is staged.
pub fn run(
    source: &DocumentHandle,
    range: &PageRange,
    destination: &Path,
    staging: &StagedWrite,
    progress: &mut dyn FnMut(JobProgress),
) -> Result<PublishReport> {
    let total = range.len();
    let mut assembler = PageAssembler::for_source(source.document());

    for (index, number) in range.pages().enumerate() {
        let page_id = source.page_id(number)?;
        assembler.push_page(source.document(), page_id)?;

        let done = index as u64 + 1;
        progress(JobProgress::new(
            done,
            total,
            format!("Extracting page progress: extracted {done} of {total}..."),
        ));
    }

    progress(JobProgress::new(
        total,
        total,
        "Extracting page progress: writing result file...",
    ));

    let mut result = assembler.finish()?;
    staging.stage_document(&mut result, destination)
}
