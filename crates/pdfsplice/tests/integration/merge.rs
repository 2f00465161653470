//! Merging through a session.

use crate::common::{RecordingSink, page_widths, write_numbered_pdf};
use lopdf::Document;
use pdfsplice::selection::AddOutcome;
use pdfsplice::transform::bookmarks::outline_entries;
use pdfsplice::{EngineOptions, OperationArea, Session, SpliceError};
use std::fs;
use tempfile::TempDir;

fn merge_session(dir: &TempDir) -> Session {
    let mut session = Session::new(EngineOptions::default()).unwrap();
    let list = session.merge_list_mut();
    for (name, base) in [("alpha.pdf", 100), ("beta.pdf", 200), ("gamma.pdf", 300)] {
        let path = write_numbered_pdf(dir.path(), name, base, 2);
        assert_eq!(list.add(path, false), AddOutcome::Added);
    }
    session
}

#[tokio::test]
async fn test_merge_follows_list_order_with_bookmarks() {
    let dir = TempDir::new().unwrap();
    let mut session = merge_session(&dir);
    session.merge_list_mut().select(2);
    session.merge_list_mut().move_to_top();

    let dest = dir.path().join("merged.pdf");
    let handle = session.merge(Some(dest.clone()), true).unwrap();
    let mut sink = RecordingSink::default();
    let result = session.monitor(handle).run(&mut sink).await;

    assert!(result.is_success(), "{}", result.message());
    assert_eq!(page_widths(&dest), vec![301, 302, 101, 102, 201, 202]);

    let doc = Document::load(&dest).unwrap();
    assert_eq!(
        outline_entries(&doc),
        vec![
            ("gamma".to_string(), 1),
            ("alpha".to_string(), 3),
            ("beta".to_string(), 5),
        ]
    );
}

#[tokio::test]
async fn test_merge_without_bookmarks() {
    let dir = TempDir::new().unwrap();
    let session = merge_session(&dir);

    let dest = dir.path().join("merged.pdf");
    let result = session.merge(Some(dest.clone()), false).unwrap().wait().await;

    assert!(result.is_success());
    assert_eq!(page_widths(&dest).len(), 6);
    assert!(outline_entries(&Document::load(&dest).unwrap()).is_empty());
}

#[tokio::test]
async fn test_merge_needs_two_files() {
    let dir = TempDir::new().unwrap();
    let mut session = Session::new(EngineOptions::default()).unwrap();
    let only = write_numbered_pdf(dir.path(), "only.pdf", 100, 1);
    session.merge_list_mut().add(only, false);

    let err = session.merge(None, true).unwrap_err();
    assert!(matches!(err, SpliceError::NothingToMerge));
    assert!(!session.runner().is_busy(OperationArea::Merge));
}

#[tokio::test]
async fn test_merge_refuses_to_overwrite_input() {
    let dir = TempDir::new().unwrap();
    let session = merge_session(&dir);
    let input = session.merge_list().paths()[1].clone();
    let before = fs::read(&input).unwrap();

    let err = session.merge(Some(input.clone()), true).unwrap_err();
    assert!(matches!(err, SpliceError::SelfOverwrite { .. }));
    assert_eq!(fs::read(&input).unwrap(), before);
}

#[tokio::test]
async fn test_merge_reports_missing_input() {
    let dir = TempDir::new().unwrap();
    let session = merge_session(&dir);
    let missing = session.merge_list().paths()[1].clone();
    fs::remove_file(&missing).unwrap();

    let dest = dir.path().join("merged.pdf");
    let result = session.merge(Some(dest.clone()), true).unwrap().wait().await;

    assert!(!result.is_success());
    assert!(result.message().contains("does not exist"));
    assert!(result.message().contains("beta.pdf"));
    assert!(!dest.exists());
}

#[tokio::test]
async fn test_duplicate_names_need_confirmation() {
    let dir = TempDir::new().unwrap();
    let mut session = merge_session(&dir);
    let again = dir.path().join("alpha.pdf");

    let list = session.merge_list_mut();
    assert_eq!(list.add(&again, false), AddOutcome::Duplicate);
    assert_eq!(list.add(dir.path().join("notes.txt"), true), AddOutcome::NotPdf);
    assert_eq!(list.add(&again, true), AddOutcome::Added);
    assert_eq!(list.len(), 4);
}

#[tokio::test]
async fn test_non_ascii_stem_becomes_bookmark_title() {
    let dir = TempDir::new().unwrap();
    let mut session = Session::new(EngineOptions::default()).unwrap();
    let list = session.merge_list_mut();
    list.add(write_numbered_pdf(dir.path(), "résumé.pdf", 100, 1), false);
    list.add(write_numbered_pdf(dir.path(), "b.pdf", 200, 2), false);

    let dest = dir.path().join("merged.pdf");
    let result = session.merge(Some(dest.clone()), true).unwrap().wait().await;

    assert!(result.is_success(), "{}", result.message());
    let doc = Document::load(&dest).unwrap();
    assert_eq!(
        outline_entries(&doc),
        vec![("résumé".to_string(), 1), ("b".to_string(), 2)]
    );
}
