//! Page-by-page split.
//!
//! Each page becomes `Page {n} - {stem}.pdf` inside a fresh job directory.
//! If any page fails, the whole job directory is removed so no partial split
//! is left behind.

use lopdf::Document;
use std::path::{Path, PathBuf};

use crate::error::{Result, SpliceError};
use crate::io::{DocumentHandle, StagedWrite};
use crate::job::JobProgress;
use crate::transform::PageAssembler;
use crate::utils::split_page_name;

/// Split `source` into single-page files under `job_dir`.
///
/// `job_dir` is created with its parents and must not exist yet.
pub fn run(
    source: &DocumentHandle,
    job_dir: &Path,
    staging: &StagedWrite,
    progress: &mut dyn FnMut(JobProgress),
) -> Result<()> {
    create_job_dir(job_dir)?;
    split_into(source, job_dir, progress, |doc, dest| {
        staging.stage_document(doc, dest).map(|_| ())
    })
}

fn create_job_dir(job_dir: &Path) -> Result<()> {
    let directory_error = |source: std::io::Error| SpliceError::DirectoryCreate {
        path: job_dir.to_path_buf(),
        source,
    };

    if let Some(parent) = job_dir.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(directory_error)?;
    }
    std::fs::create_dir(job_dir).map_err(directory_error)
}

/// Write every page through `publish`, cleaning up `job_dir` on failure.
pub(crate) fn split_into<P>(
    source: &DocumentHandle,
    job_dir: &Path,
    progress: &mut dyn FnMut(JobProgress),
    mut publish: P,
) -> Result<()>
where
    P: FnMut(&mut Document, &Path) -> Result<()>,
{
    let stem = source.stem();
    let total = source.page_count() as u64;

    for (index, &page_id) in source.page_ids().iter().enumerate() {
        let dest = job_dir.join(split_page_name(index + 1, &stem));

        let outcome = single_page(source, page_id).and_then(|mut doc| publish(&mut doc, &dest));
        if let Err(e) = outcome {
            log::error!(
                "Split of {} failed on page {}: {}",
                source.source_path().display(),
                index + 1,
                e
            );
            remove_job_dir(job_dir);
            return Err(e);
        }

        let done = index as u64 + 1;
        progress(JobProgress::new(
            done,
            total,
            format!("Extracting page progress: extracted {done} of {total}..."),
        ));
    }

    Ok(())
}

fn single_page(source: &DocumentHandle, page_id: lopdf::ObjectId) -> Result<Document> {
    let mut assembler = PageAssembler::for_source(source.document());
    assembler.push_page(source.document(), page_id)?;
    assembler.finish()
}

fn remove_job_dir(job_dir: &Path) {
    if let Err(e) = std::fs::remove_dir_all(job_dir) {
        log::warn!(
            "Failed to remove split directory {}: {}",
            job_dir.display(),
            e
        );
    }
}

/// Files a finished split wrote, in page order.
pub fn split_outputs(job_dir: &Path, stem: &str, page_count: usize) -> Vec<PathBuf> {
    (1..=page_count)
        .map(|n| job_dir.join(split_page_name(n, stem)))
        .collect()
}
