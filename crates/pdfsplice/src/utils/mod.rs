//! Utilities for output naming, path comparison and size formatting.

use chrono::{DateTime, Local};
use std::path::{Component, Path, PathBuf};

/// Timestamp format used in default output names.
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Format a timestamp the way default output names embed it.
pub fn timestamp(at: DateTime<Local>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// File stem of `path`, or `"document"` when it has none.
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string())
}

/// Whether `path` has a `.pdf` extension, ignoring case.
pub fn is_pdf_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Default result name for a range extraction: `{stem}_extr_result_{ts}.pdf`.
pub fn extract_output_name(source: &Path, at: DateTime<Local>) -> String {
    format!("{}_extr_result_{}.pdf", file_stem(source), timestamp(at))
}

/// Default result name for a range deletion: `{stem}_del_result_{ts}.pdf`.
pub fn delete_output_name(source: &Path, at: DateTime<Local>) -> String {
    format!("{}_del_result_{}.pdf", file_stem(source), timestamp(at))
}

/// Default directory name for a page split: `{stem}_extr_result_{ts}`.
pub fn split_dir_name(source: &Path, at: DateTime<Local>) -> String {
    format!("{}_extr_result_{}", file_stem(source), timestamp(at))
}

/// Default result name for a merge: `result_{ts}.pdf`.
pub fn merge_output_name(at: DateTime<Local>) -> String {
    format!("result_{}.pdf", timestamp(at))
}

/// File name of one split page: `Page {n} - {stem}.pdf`, `n` 1-based.
pub fn split_page_name(number: usize, stem: &str) -> String {
    format!("Page {number} - {stem}.pdf")
}

/// Directory that default outputs for `source` are placed in.
pub fn sibling_dir(source: &Path) -> PathBuf {
    match source.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Normalize a path for equality checks.
///
/// Existing paths are canonicalized so symlinks and case-insensitive file
/// systems compare correctly. Paths that do not exist yet are made absolute
/// and `.`/`..` components are folded lexically.
pub fn normalize_path(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }

    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Whether two paths refer to the same file after normalization.
pub fn same_file(a: &Path, b: &Path) -> bool {
    normalize_path(a) == normalize_path(b)
}

/// Format file size as human-readable string.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}
