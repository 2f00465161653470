//! Page-by-page split through a session.

use crate::common::{RecordingSink, page_widths, write_numbered_pdf};
use pdfsplice::io::DocumentHandle;
use pdfsplice::job::JobRunner;
use pdfsplice::transform::split::split_outputs;
use pdfsplice::{EngineOptions, Session, TransformJob};
use std::fs;
use tempfile::TempDir;

#[tokio::test]
async fn test_split_into_fresh_directory() {
    let dir = TempDir::new().unwrap();
    let source = write_numbered_pdf(dir.path(), "deck.pdf", 200, 3);
    let mut session = Session::new(EngineOptions::default()).unwrap();
    session.open_extract(&source).await.unwrap();

    let root = dir.path().join("pages");
    let handle = session.split_pages(Some(root.clone())).unwrap();
    let job_dir = handle.output_path().to_path_buf();
    assert_eq!(job_dir.parent(), Some(root.as_path()));

    let mut sink = RecordingSink::default();
    assert!(session.monitor(handle).run(&mut sink).await.is_success());

    let outputs = split_outputs(&job_dir, "deck", 3);
    assert_eq!(
        outputs[2].file_name().unwrap().to_string_lossy(),
        "Page 3 - deck.pdf"
    );
    for (n, path) in outputs.iter().enumerate() {
        assert_eq!(page_widths(path), vec![201 + n as i64]);
    }
    assert_eq!(fs::read_dir(&job_dir).unwrap().count(), 3);
}

#[tokio::test]
async fn test_split_fails_when_directory_exists() {
    let dir = TempDir::new().unwrap();
    let source = write_numbered_pdf(dir.path(), "deck.pdf", 200, 2);
    let handle = DocumentHandle::open(&source).await.unwrap();

    let job_dir = dir.path().join("deck_extr_result_1");
    fs::create_dir(&job_dir).unwrap();
    fs::write(job_dir.join("keep.txt"), b"mine").unwrap();

    let runner = JobRunner::new(&EngineOptions::default());
    let job = TransformJob::page_split(handle, dir.path(), "deck_extr_result_1");
    let result = runner.submit(job).unwrap().wait().await;

    assert!(!result.is_success());
    assert!(result.message().contains("Failed to create directory"));
    // An existing directory is never cleaned up by a failed split.
    assert!(job_dir.join("keep.txt").exists());
}
