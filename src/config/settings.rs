//! User settings

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SecureFilesError};
use crate::naming::DEFAULT_SUFFIX;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Suffix appended to encrypted files (default: ".enc")
    pub suffix: String,
    /// Worker threads; `None` uses every core
    pub jobs: Option<usize>,
    /// Replace existing output files
    pub overwrite: bool,
    /// Where outputs go; `None` writes next to each input
    pub output_dir: Option<PathBuf>,
    /// Print a reminder to delete plaintext after encrypting
    pub remind_delete_originals: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_SUFFIX.to_string(),
            jobs: None,
            overwrite: false,
            output_dir: None,
            remind_delete_originals: true,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.suffix.is_empty() {
            return Err(SecureFilesError::InvalidConfig(
                "suffix must not be empty".into(),
            ));
        }
        if self.suffix.contains('/') || self.suffix.contains('\\') {
            return Err(SecureFilesError::InvalidConfig(format!(
                "suffix '{}' must not contain a path separator",
                self.suffix
            )));
        }
        if self.jobs == Some(0) {
            return Err(SecureFilesError::InvalidConfig(
                "jobs must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Apply command-line overrides on top of file values.
    pub fn with_overrides(
        mut self,
        jobs: Option<usize>,
        output_dir: Option<PathBuf>,
        force: bool,
    ) -> Self {
        if jobs.is_some() {
            self.jobs = jobs;
        }
        if output_dir.is_some() {
            self.output_dir = output_dir;
        }
        if force {
            self.overwrite = true;
        }
        self
    }
}
