//! Crash-safe result publishing.
//!
//! Output is first produced into a private temporary file and only then
//! copied over the destination in one step. The destination is never opened
//! while the document is still being serialized, so a failure halfway leaves
//! whatever was there before untouched. The temporary file is removed on every
//! path; a failed removal is logged, never raised.

use lopdf::Document;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::config::EngineOptions;
use crate::error::{Result, SpliceError};
use crate::utils::format_file_size;

const STAGING_PREFIX: &str = ".pdfsplice-";
const STAGING_SUFFIX: &str = ".pdf";
const BUFFER_SIZE: usize = 64 * 1024;

/// Outcome of a successful publish.
#[derive(Debug, Clone)]
pub struct PublishReport {
    /// Where the result was published.
    pub destination: PathBuf,

    /// Bytes copied to the destination.
    pub bytes: u64,

    /// Time spent producing and publishing.
    pub elapsed: Duration,
}

impl PublishReport {
    /// Format the published size as human-readable string.
    pub fn format_size(&self) -> String {
        format_file_size(self.bytes)
    }
}

/// Temp-file staging followed by a whole-file copy.
#[derive(Debug, Clone, Default)]
pub struct StagedWrite {
    staging_dir: Option<PathBuf>,
    compress: bool,
}

impl StagedWrite {
    /// Stage in the system temp directory without compression.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage according to engine options.
    pub fn from_options(options: &EngineOptions) -> Self {
        Self {
            staging_dir: options.staging_dir.clone(),
            compress: options.compress,
        }
    }

    /// Stage inside `dir` instead of the system temp directory.
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = Some(dir.into());
        self
    }

    /// Produce output into a staging file, then publish it to `destination`.
    ///
    /// # Errors
    ///
    /// Returns the producer's error unchanged, or `Staging` if the temporary
    /// file cannot be created, flushed, or copied.
    pub fn stage<F>(&self, destination: &Path, producer: F) -> Result<PublishReport>
    where
        F: FnOnce(&mut dyn Write) -> Result<()>,
    {
        let start = Instant::now();

        let mut builder = tempfile::Builder::new();
        builder.prefix(STAGING_PREFIX).suffix(STAGING_SUFFIX);
        let temp = match &self.staging_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(|e| SpliceError::staging(destination, e))?;

        log::debug!(
            "Staging {} via {}",
            destination.display(),
            temp.path().display()
        );

        let outcome = produce_and_publish(temp.path(), temp.as_file(), destination, producer);

        let temp_path = temp.path().to_path_buf();
        if let Err(e) = temp.close() {
            log::warn!(
                "Failed to remove staging file {}: {}",
                temp_path.display(),
                e
            );
        }

        let bytes = outcome?;
        let report = PublishReport {
            destination: destination.to_path_buf(),
            bytes,
            elapsed: start.elapsed(),
        };
        log::debug!(
            "Published {} ({}) in {:?}",
            report.destination.display(),
            report.format_size(),
            report.elapsed
        );
        Ok(report)
    }

    /// Serialize `document` through a staging file to `destination`.
    pub fn stage_document(
        &self,
        document: &mut Document,
        destination: &Path,
    ) -> Result<PublishReport> {
        if self.compress {
            document.compress();
        }
        self.stage(destination, |mut out| {
            document.save_to(&mut out)?;
            Ok(())
        })
    }
}

fn produce_and_publish<F>(
    temp_path: &Path,
    file: &std::fs::File,
    destination: &Path,
    producer: F,
) -> Result<u64>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let mut writer = BufWriter::with_capacity(BUFFER_SIZE, file);
    producer(&mut writer)?;
    writer
        .flush()
        .map_err(|e| SpliceError::staging(destination, e))?;
    drop(writer);

    std::fs::copy(temp_path, destination).map_err(|e| SpliceError::staging(destination, e))
}
