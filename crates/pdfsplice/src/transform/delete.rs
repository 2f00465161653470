//! Range deletion.

use std::path::Path;

use crate::error::Result;
use crate::io::{DocumentHandle, PublishReport, StagedWrite};
use crate::job::JobProgress;
use crate::range::PageRange;
use crate::transform::PageAssembler;

/// Copy every page of `source` whose number is not in `range`.
///
/// Only membership matters: order and repeats in `range` are ignored.
/// Removing every page still publishes a document, with no pages.
pub fn run(
    source: &DocumentHandle,
    range: &PageRange,
    destination: &Path,
    staging: &StagedWrite,
    progress: &mut dyn FnMut(JobProgress),
) -> Result<PublishReport> {
    let total = range.distinct_len();
    let mut assembler = PageAssembler::for_source(source.document());
    let mut deleted = 0;

    for (index, &page_id) in source.page_ids().iter().enumerate() {
        let number = index as u32 + 1;
        if range.contains(number) {
            deleted += 1;
            progress(JobProgress::new(
                deleted,
                total,
                format!("Deleting page progress: deleted {deleted} of {total}..."),
            ));
        } else {
            assembler.push_page(source.document(), page_id)?;
        }
    }

    progress(JobProgress::new(
        deleted,
        total,
        "Deleting page progress: writing result file...",
    ));

    log::debug!(
        "Kept {} of {} page(s) from {}",
        assembler.page_count(),
        source.page_count(),
        source.source_path().display()
    );

    let mut result = assembler.finish()?;
    staging.stage_document(&mut result, destination)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::test_support::{
        any_stream_contains, document_with_pages, link_page, page_widths_at, stored_page_objects,
    };
    use lopdf::Document;
    use rstest::rstest;
    use tempfile::TempDir;

    fn delete(pages: usize, range: &str, dest: &Path) -> Vec<String> {
        delete_from(document_with_pages(pages), range, dest)
    }

    fn delete_from(doc: Document, range: &str, dest: &Path) -> Vec<String> {
        let handle = DocumentHandle::from_document(doc, "src.pdf");
        let range = PageRange::parse(range).unwrap();
        let mut messages = Vec::new();
        run(
            &handle,
            &range,
            dest,
            &StagedWrite::new(),
            &mut |p: JobProgress| messages.push(p.message),
        )
        .unwrap();
        messages
    }

    #[rstest]
    #[case(5, "2,4", vec![101, 103, 105])]
    #[case(5, "4,2,2", vec![101, 103, 105])]
    #[case(6, "1-3,2-4", vec![105, 106])]
    #[case(3, "3", vec![101, 102])]
    fn test_delete_keeps_source_order(
        #[case] pages: usize,
        #[case] range: &str,
        #[case] expected: Vec<i64>,
    ) {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("out.pdf");
        delete(pages, range, &dest);
        assert_eq!(page_widths_at(&dest), expected);
    }

    #[test]
    fn test_delete_all_pages_publishes_empty_document() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("out.pdf");
        delete(3, "1-3", &dest);
        assert!(dest.exists());
        assert!(page_widths_at(&dest).is_empty());
    }

    #[test]
    fn test_progress_counts_distinct_exclusions() {
        let dir = TempDir::new().unwrap();
        let messages = delete(5, "2,2,4", &dir.path().join("out.pdf"));
        assert_eq!(
            messages,
            vec![
                "Deleting page progress: deleted 1 of 2...",
                "Deleting page progress: deleted 2 of 2...",
                "Deleting page progress: writing result file...",
            ]
        );
    }

    #[test]
    fn test_deleted_page_stays_out_when_linked() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("out.pdf");
        let mut source = document_with_pages(3);
        link_page(&mut source, 1, 2);

        delete_from(source, "2", &dest);

        assert_eq!(page_widths_at(&dest), vec![101, 103]);
        let result = Document::load(&dest).unwrap();
        assert_eq!(stored_page_objects(&result), 2);
        assert!(!any_stream_contains(&result, b"(w102)"));
        let first = result.get_pages()[&1];
        assert!(!result.get_dictionary(first).unwrap().has(b"Annots"));
    }
}
