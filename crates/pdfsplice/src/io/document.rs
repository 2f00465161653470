//! Opened source documents.
//!
//! A [`DocumentHandle`] is a read-only, cheaply clonable view of a loaded PDF.
//! Jobs keep their own clone, so the caller can open a different file into
//! the same slot while a job keeps reading the old one.

use lopdf::{Document, ObjectId};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{Result, SpliceError};

/// Loaded source document plus its page table.
#[derive(Debug, Clone)]
pub struct DocumentHandle {
    document: Arc<Document>,
    source_path: PathBuf,
    page_ids: Arc<[ObjectId]>,
    load_time: Duration,
}

impl DocumentHandle {
    /// Open a PDF off the async runtime.
    ///
    /// # Errors
    ///
    /// Returns `FailedToLoadPdf` if the file cannot be parsed, or `Io` if the
    /// loading task itself fails.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use pdfsplice::io::DocumentHandle;
    /// # async fn example() -> pdfsplice::Result<()> {
    /// let handle = DocumentHandle::open("report.pdf").await?;
    /// println!("{} pages", handle.page_count());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        tokio::task::spawn_blocking(move || Self::open_blocking(&path))
            .await
            .map_err(|e| SpliceError::unexpected(format!("Load task failed: {e}")))?
    }

    /// Open a PDF on the current thread.
    pub fn open_blocking(path: &Path) -> Result<Self> {
        let start = Instant::now();
        let document = Document::load(path)
            .map_err(|e| SpliceError::failed_to_load_pdf(path.to_path_buf(), e.to_string()))?;
        let mut handle = Self::from_document(document, path);
        handle.load_time = start.elapsed();
        log::debug!(
            "Loaded {} ({} pages) in {:?}",
            path.display(),
            handle.page_count(),
            handle.load_time
        );
        Ok(handle)
    }

    /// Wrap an already loaded document.
    pub fn from_document(document: Document, source_path: impl Into<PathBuf>) -> Self {
        let page_ids: Vec<ObjectId> = document.get_pages().into_values().collect();
        Self {
            document: Arc::new(document),
            source_path: source_path.into(),
            page_ids: page_ids.into(),
            load_time: Duration::ZERO,
        }
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Object id of the page with 1-based number `number`.
    ///
    /// # Errors
    ///
    /// Returns `PageNotFound` when the number is out of bounds.
    pub fn page_id(&self, number: u32) -> Result<ObjectId> {
        (number as usize)
            .checked_sub(1)
            .and_then(|index| self.page_ids.get(index))
            .copied()
            .ok_or(SpliceError::PageNotFound {
                page: number,
                page_count: self.page_count(),
            })
    }

    /// Page object ids in document order.
    pub fn page_ids(&self) -> &[ObjectId] {
        &self.page_ids
    }

    /// The loaded document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Path the document was loaded from.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// File stem of the source path.
    pub fn stem(&self) -> String {
        crate::utils::file_stem(&self.source_path)
    }

    /// Time spent loading.
    pub fn load_time(&self) -> Duration {
        self.load_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::test_support::{document_with_pages, page_widths_of};
    use tempfile::TempDir;

    #[test]
    fn test_page_lookup() {
        let handle = DocumentHandle::from_document(document_with_pages(3), "three.pdf");
        assert_eq!(handle.page_count(), 3);
        assert!(handle.page_id(1).is_ok());
        assert!(handle.page_id(3).is_ok());
        assert!(matches!(
            handle.page_id(0),
            Err(SpliceError::PageNotFound { page: 0, .. })
        ));
        assert!(matches!(
            handle.page_id(4),
            Err(SpliceError::PageNotFound {
                page: 4,
                page_count: 3
            })
        ));
    }

    #[test]
    fn test_stem() {
        let handle = DocumentHandle::from_document(document_with_pages(1), "/a/b/report.pdf");
        assert_eq!(handle.stem(), "report");
    }

    #[tokio::test]
    async fn test_open_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.pdf");
        document_with_pages(4).save(&path).unwrap();

        let handle = DocumentHandle::open(&path).await.unwrap();
        assert_eq!(handle.page_count(), 4);
        assert_eq!(handle.source_path(), path.as_path());
        assert_eq!(page_widths_of(handle.document()), vec![101, 102, 103, 104]);
    }

    #[tokio::test]
    async fn test_open_garbage_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"not a pdf at all").unwrap();

        let err = DocumentHandle::open(&path).await.unwrap_err();
        assert!(matches!(err, SpliceError::FailedToLoadPdf { .. }));
    }

    #[test]
    fn test_clone_shares_document() {
        let handle = DocumentHandle::from_document(document_with_pages(2), "x.pdf");
        let other = handle.clone();
        assert!(std::ptr::eq(handle.document(), other.document()));
    }
}
