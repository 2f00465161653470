//! Job lifecycle: area exclusivity, events, and launch handling.

use crate::common::{RecordingSink, write_numbered_pdf};
use pdfsplice::job::{JobEvent, JobStatus, MemoryObserver};
use pdfsplice::launch::{LaunchPlan, StartView};
use pdfsplice::transform::JobKind;
use pdfsplice::{EngineOptions, OperationArea, Session, SpliceError};
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn test_observer_sees_start_then_one_terminal_event() {
    let dir = TempDir::new().unwrap();
    let source = write_numbered_pdf(dir.path(), "report.pdf", 100, 4);
    let observer = Arc::new(MemoryObserver::new());
    let mut session = Session::new(EngineOptions::default())
        .unwrap()
        .with_observer(observer.clone());
    session.open_extract(&source).await.unwrap();

    let handle = session
        .extract_range("1-2", Some(dir.path().join("out.pdf")))
        .unwrap();
    let id = handle.id();
    let mut sink = RecordingSink::default();
    session.monitor(handle).run(&mut sink).await;

    let events = observer.events_for(id);
    assert_eq!(events.len(), 2);
    assert!(matches!(
        events[0],
        JobEvent::Started {
            kind: JobKind::RangeExtract,
            area: OperationArea::Extract,
            ..
        }
    ));
    assert!(matches!(events[1], JobEvent::Succeeded { .. }));
}

#[tokio::test]
async fn test_failed_job_reports_message_once() {
    let dir = TempDir::new().unwrap();
    let mut session = Session::new(EngineOptions::default()).unwrap();
    let list = session.merge_list_mut();
    list.add(write_numbered_pdf(dir.path(), "a.pdf", 100, 1), false);
    list.add(dir.path().join("gone.pdf"), false);

    let handle = session
        .merge(Some(dir.path().join("merged.pdf")), true)
        .unwrap();
    let mut sink = RecordingSink::default();
    let result = session.monitor(handle).run(&mut sink).await;

    assert_eq!(sink.results, vec![result.clone()]);
    assert!(!result.is_success());
    assert!(!session.runner().is_busy(OperationArea::Merge));
}

#[tokio::test]
async fn test_area_released_after_job() {
    let dir = TempDir::new().unwrap();
    let source = write_numbered_pdf(dir.path(), "report.pdf", 100, 3);
    let mut session = Session::new(EngineOptions::default()).unwrap();
    session.open_delete(&source).await.unwrap();

    let handle = session
        .delete_range("1", Some(dir.path().join("one.pdf")))
        .unwrap();
    assert!(handle.wait().await.is_success());

    assert!(!session.runner().is_busy(OperationArea::Delete));
    let again = session
        .delete_range("2", Some(dir.path().join("two.pdf")))
        .unwrap();
    assert_eq!(JobStatus::from(again.wait().await), JobStatus::Succeeded);
}

#[tokio::test]
async fn test_closing_idle_area() {
    let dir = TempDir::new().unwrap();
    let source = write_numbered_pdf(dir.path(), "report.pdf", 100, 2);
    let mut session = Session::new(EngineOptions::default()).unwrap();
    session.open_extract(&source).await.unwrap();

    session.close(OperationArea::Extract).unwrap();
    assert!(session.document(OperationArea::Extract).is_none());
    let err = session.split_pages(None).unwrap_err();
    assert!(matches!(err, SpliceError::NoDocument(OperationArea::Extract)));
}

#[tokio::test]
async fn test_single_pdf_launch_fills_both_slots() {
    let dir = TempDir::new().unwrap();
    let source = write_numbered_pdf(dir.path(), "report.pdf", 100, 5);
    let notes = dir.path().join("notes.txt");

    let plan = LaunchPlan::from_args([notes.clone(), source.clone()]);
    assert_eq!(plan.view, StartView::ExtractDelete(source.clone()));
    assert_eq!(plan.ignored, vec![notes]);

    let session = Session::from_plan(plan, EngineOptions::default())
        .await
        .unwrap();
    assert_eq!(
        session.document(OperationArea::Extract).unwrap().page_count(),
        5
    );
    assert_eq!(
        session.document(OperationArea::Delete).unwrap().page_count(),
        5
    );
    assert!(session.merge_list().is_empty());
}

#[tokio::test]
async fn test_several_pdfs_launch_sorted_merge_list() {
    let dir = TempDir::new().unwrap();
    let b = write_numbered_pdf(dir.path(), "b.pdf", 100, 1);
    let a = write_numbered_pdf(dir.path(), "a.pdf", 200, 1);

    let plan = LaunchPlan::from_args([b.clone(), a.clone()]);
    assert!(plan.is_merge());

    let session = Session::from_plan(plan, EngineOptions::default())
        .await
        .unwrap();
    assert_eq!(session.merge_list().paths(), &[a, b]);
    assert!(session.document(OperationArea::Extract).is_none());
}
