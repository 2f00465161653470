//! Engine configuration.
//!
//! `EngineOptions` carries the knobs shared by every job: how often the
//! progress monitor polls, where staged files are written, and whether result
//! documents are compressed before publishing. Options can be loaded from a
//! JSON file and are validated before the engine is built.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Result, SpliceError};

/// Default monitor polling interval in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Options shared by the job runner, the monitor and the staging layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineOptions {
    /// Monitor polling interval in milliseconds.
    pub poll_interval_ms: u64,

    /// Directory for staged files. `None` uses the system temp directory.
    pub staging_dir: Option<PathBuf>,

    /// Compress result documents before writing.
    pub compress: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            staging_dir: None,
            compress: true,
        }
    }
}

impl EngineOptions {
    /// Load options from a JSON file.
    ///
    /// Missing fields take their default values.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the file cannot be read, is not valid JSON,
    /// or fails validation.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            SpliceError::invalid_config(format!("cannot read {}: {e}", path.display()))
        })?;
        let options: Self = serde_json::from_str(&text).map_err(|e| {
            SpliceError::invalid_config(format!("cannot parse {}: {e}", path.display()))
        })?;
        options.validate()?;
        Ok(options)
    }

    /// Validate the options.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the polling interval is zero or the staging
    /// directory is not an existing directory.
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            return Err(SpliceError::invalid_config(
                "poll_interval_ms must be at least 1",
            ));
        }

        if let Some(dir) = &self.staging_dir
            && !dir.is_dir()
        {
            return Err(SpliceError::invalid_config(format!(
                "staging directory does not exist: {}",
                dir.display()
            )));
        }

        Ok(())
    }

    /// Monitor polling interval.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Return a copy with a different staging directory.
    pub fn with_staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = Some(dir.into());
        self
    }
}
