//! Ordered merge input list with a multi-selection.
//!
//! Moves apply to the whole selection at once. Selected items keep their
//! relative order and the gaps between them, and a move that would push any
//! selected item past either end of the list does nothing.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::utils::is_pdf_path;

/// What happened to a path offered to [`MergeList::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Appended to the list.
    Added,
    /// Not a `.pdf` file; ignored.
    NotPdf,
    /// A file with the same name is already listed and duplicates were not
    /// allowed; ignored.
    Duplicate,
}

/// Merge inputs in merge order, plus the selected indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeList {
    items: Vec<PathBuf>,
    selected: BTreeSet<usize>,
}

impl MergeList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from command-line paths: non-PDFs are dropped and the
    /// rest sorted.
    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut items: Vec<PathBuf> = paths
            .into_iter()
            .map(Into::into)
            .filter(|p| is_pdf_path(p))
            .collect();
        items.sort();
        Self {
            items,
            selected: BTreeSet::new(),
        }
    }

    /// Listed paths in merge order.
    pub fn paths(&self) -> &[PathBuf] {
        &self.items
    }

    /// Number of listed paths.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether a file with the same name as `path` is listed.
    pub fn contains_name(&self, path: &Path) -> bool {
        let Some(name) = path.file_name() else {
            return false;
        };
        self.items.iter().any(|p| p.file_name() == Some(name))
    }

    /// Append `path`.
    ///
    /// Files are told apart by name only, so `a/x.pdf` and `b/x.pdf` count
    /// as duplicates. `allow_duplicate` is the caller's answer to "add it
    /// anyway?".
    pub fn add(&mut self, path: impl Into<PathBuf>, allow_duplicate: bool) -> AddOutcome {
        let path = path.into();
        if !is_pdf_path(&path) {
            return AddOutcome::NotPdf;
        }
        if !allow_duplicate && self.contains_name(&path) {
            return AddOutcome::Duplicate;
        }
        self.items.push(path);
        AddOutcome::Added
    }

    /// Selected indices, ascending.
    pub fn selection(&self) -> Vec<usize> {
        self.selected.iter().copied().collect()
    }

    /// Add `index` to the selection. Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) {
        if index < self.items.len() {
            self.selected.insert(index);
        }
    }

    /// Replace the selection. Out-of-range indices are ignored.
    pub fn set_selection(&mut self, indices: impl IntoIterator<Item = usize>) {
        let len = self.items.len();
        self.selected = indices.into_iter().filter(|&i| i < len).collect();
    }

    /// Clear the selection.
    pub fn deselect_all(&mut self) {
        self.selected.clear();
    }

    /// Move the selection one place towards the top.
    pub fn move_up(&mut self) {
        self.shift_up(1);
    }

    /// Move the selection one place towards the bottom.
    pub fn move_down(&mut self) {
        self.shift_down(1);
    }

    /// Move the selection up until its first item is at the top.
    pub fn move_to_top(&mut self) {
        if let Some(&first) = self.selected.first() {
            self.shift_up(first);
        }
    }

    /// Move the selection down until its last item is at the bottom.
    pub fn move_to_bottom(&mut self) {
        if let Some(&last) = self.selected.last() {
            self.shift_down(self.items.len() - 1 - last);
        }
    }

    /// Remove the selected items and clear the selection.
    pub fn remove_selected(&mut self) {
        for &index in self.selected.iter().rev() {
            self.items.remove(index);
        }
        self.selected.clear();
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        self.items.clear();
        self.selected.clear();
    }

    fn shift_up(&mut self, delta: usize) {
        match self.selected.first() {
            Some(&first) if delta > 0 && first >= delta => {}
            _ => return,
        }
        let moved: BTreeSet<usize> = self.selected.iter().map(|&i| i - delta).collect();
        for &index in &self.selected {
            let item = self.items.remove(index);
            self.items.insert(index - delta, item);
        }
        self.selected = moved;
    }

    fn shift_down(&mut self, delta: usize) {
        match self.selected.last() {
            Some(&last) if delta > 0 && last + delta < self.items.len() => {}
            _ => return,
        }
        let moved: BTreeSet<usize> = self.selected.iter().map(|&i| i + delta).collect();
        for &index in self.selected.iter().rev() {
            let item = self.items.remove(index);
            self.items.insert(index + delta, item);
        }
        self.selected = moved;
    }
}
