//! User-facing output for pdfsplice.
//!
//! This module renders job progress and results for a terminal, and
//! summarizes a session's start-up state.

pub mod progress;

pub use progress::{TerminalProgress, format_duration};

use std::fmt::Write as _;

use crate::job::OperationArea;
use crate::session::Session;

/// Describe the session's slots and merge list, one item per line.
pub fn describe_session(session: &Session) -> String {
    let mut text = String::new();

    for area in [OperationArea::Extract, OperationArea::Delete] {
        match session.document(area) {
            Some(doc) => {
                let _ = writeln!(
                    text,
                    "{area}: {} ({} pages)",
                    doc.source_path().display(),
                    doc.page_count()
                );
            }
            None => {
                let _ = writeln!(text, "{area}: no document");
            }
        }
    }

    let list = session.merge_list();
    let _ = writeln!(text, "merge: {} file(s)", list.len());
    for (index, path) in list.paths().iter().enumerate() {
        let _ = writeln!(text, "  {}. {}", index + 1, path.display());
    }

    text
}
