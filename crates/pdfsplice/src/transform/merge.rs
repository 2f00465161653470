//! Multi-document merge.
//!
//! Inputs are loaded one at a time, in list order, and every page is
//! appended to the result. Each input is renumbered above the ids already in
//! use so objects from different files never collide.

use lopdf::{Document, ObjectId};
use std::path::{Path, PathBuf};

use crate::error::{Result, SpliceError};
use crate::io::{PublishReport, StagedWrite};
use crate::job::JobProgress;
use crate::transform::PageAssembler;
use crate::utils::file_stem;

/// PDF version of a merge result when no input sets one.
const DEFAULT_VERSION: &str = "1.5";

/// Concatenate `inputs` into `destination`.
///
/// With `outlines`, each input gets a top-level bookmark named after its file
/// stem that points at its first page. Inputs without pages get no bookmark.
///
/// # Errors
///
/// Returns `MissingSource` naming the first input that no longer exists;
/// nothing is published in that case.
pub fn run(
    inputs: &[PathBuf],
    destination: &Path,
    outlines: bool,
    staging: &StagedWrite,
    progress: &mut dyn FnMut(JobProgress),
) -> Result<PublishReport> {
    let total = inputs.len() as u64;
    let mut assembler: Option<PageAssembler> = None;

    for (index, path) in inputs.iter().enumerate() {
        if !path.exists() {
            return Err(SpliceError::MissingSource { path: path.clone() });
        }

        let mut doc = Document::load(path)
            .map_err(|e| SpliceError::failed_to_load_pdf(path.clone(), e.to_string()))?;
        let assembler = assembler.get_or_insert_with(|| PageAssembler::for_source(&doc));
        doc.renumber_objects_with(assembler.next_object_number());

        if let Some(first_page) = append_all(assembler, &doc)?
            && outlines
        {
            assembler.bookmark(file_stem(path), first_page);
        }

        let done = index as u64 + 1;
        progress(JobProgress::new(
            done,
            total,
            format!("Merging progress: appended {done} of {total}..."),
        ));
    }

    progress(JobProgress::new(
        total,
        total,
        "Merging progress: writing result file...",
    ));

    let assembler = assembler.unwrap_or_else(|| PageAssembler::new(DEFAULT_VERSION));
    log::debug!(
        "Merged {} page(s) from {} file(s)",
        assembler.page_count(),
        inputs.len()
    );
    let mut result = assembler.finish()?;
    staging.stage_document(&mut result, destination)
}

/// Append every page of `doc`; returns the result id of its first page.
fn append_all(assembler: &mut PageAssembler, doc: &Document) -> Result<Option<ObjectId>> {
    let mut first = None;
    for page_id in doc.get_pages().into_values() {
        let placed = assembler.push_page(doc, page_id)?;
        first.get_or_insert(placed);
    }
    Ok(first)
}
