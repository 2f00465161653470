//! Extract and delete through a session, end to end.

use crate::common::{RecordingSink, page_widths, write_numbered_pdf};
use pdfsplice::job::JobResult;
use pdfsplice::{EngineOptions, OperationArea, Session, SpliceError};
use tempfile::TempDir;

async fn session_with(dir: &TempDir, pages: usize) -> Session {
    let source = write_numbered_pdf(dir.path(), "report.pdf", 100, pages);
    let mut session = Session::new(EngineOptions::default()).unwrap();
    session.open_extract(&source).await.unwrap();
    session.open_delete(&source).await.unwrap();
    session
}

#[tokio::test]
async fn test_extract_keeps_range_order_and_duplicates() {
    let dir = TempDir::new().unwrap();
    let session = session_with(&dir, 10).await;
    let dest = dir.path().join("out.pdf");

    let handle = session.extract_range("9-10, 2, 2", Some(dest.clone())).unwrap();
    let mut sink = RecordingSink::default();
    let result = session.monitor(handle).run(&mut sink).await;

    assert_eq!(result, JobResult::Succeeded);
    assert_eq!(sink.results, vec![JobResult::Succeeded]);
    assert_eq!(page_widths(&dest), vec![109, 110, 102, 102]);
}

#[tokio::test]
async fn test_extract_default_name_beside_source() {
    let dir = TempDir::new().unwrap();
    let session = session_with(&dir, 3).await;

    let handle = session.extract_range("1", None).unwrap();
    let output = handle.output_path().to_path_buf();
    assert!(handle.wait().await.is_success());

    assert_eq!(output.parent(), Some(dir.path()));
    let name = output.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("report_extr_result_"));
    assert!(name.ends_with(".pdf"));
    assert_eq!(page_widths(&output), vec![101]);
}

#[tokio::test]
async fn test_extract_rejects_out_of_bounds_before_running() {
    let dir = TempDir::new().unwrap();
    let session = session_with(&dir, 5).await;
    let dest = dir.path().join("out.pdf");

    let err = session.extract_range("4-6", Some(dest.clone())).unwrap_err();
    assert!(matches!(
        err,
        SpliceError::RangeOutOfBounds { max: 6, page_count: 5 }
    ));
    assert!(!session.runner().is_busy(OperationArea::Extract));
    assert!(!dest.exists());
}

#[tokio::test]
async fn test_malformed_ranges_rejected() {
    let dir = TempDir::new().unwrap();
    let session = session_with(&dir, 5).await;

    for text in ["", "a-3", "1,,2", "0", "3-x"] {
        let err = session.delete_range(text, None).unwrap_err();
        assert!(
            matches!(err, SpliceError::RangeFormat { .. }),
            "{text:?} gave {err:?}"
        );
    }
}

#[tokio::test]
async fn test_delete_removes_listed_pages() {
    let dir = TempDir::new().unwrap();
    let session = session_with(&dir, 6).await;
    let dest = dir.path().join("trimmed.pdf");

    let handle = session.delete_range("5,2-3,2", Some(dest.clone())).unwrap();
    let mut sink = RecordingSink::default();
    let result = session.monitor(handle).run(&mut sink).await;

    assert!(result.is_success());
    assert_eq!(page_widths(&dest), vec![101, 104, 106]);
    // The open document is untouched.
    let source = session.document(OperationArea::Delete).unwrap();
    assert_eq!(source.page_count(), 6);
}

#[tokio::test]
async fn test_delete_requires_document() {
    let session = Session::new(EngineOptions::default()).unwrap();
    let err = session.delete_range("1", None).unwrap_err();
    assert!(matches!(err, SpliceError::NoDocument(OperationArea::Delete)));
}

#[tokio::test]
async fn test_progress_lines_use_job_wording() {
    let dir = TempDir::new().unwrap();
    let session = session_with(&dir, 4).await;
    let dest = dir.path().join("trimmed.pdf");

    let handle = session.delete_range("1-2", Some(dest)).unwrap();
    let mut sink = RecordingSink::default();
    session.monitor(handle).run(&mut sink).await;

    assert!(
        sink.lines
            .iter()
            .all(|line| line.starts_with("Deleting page progress: "))
    );
}
