//! Settings file location and persistence
//!
//! Default location: `secure-files.json` next to the executable, so a
//! portable install carries its settings with it.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, SecureFilesError};

use super::Settings;

const SETTINGS_FILE: &str = "secure-files.json";

/// Directory containing the running executable
pub fn get_exe_dir() -> Result<PathBuf> {
    let exe_path = std::env::current_exe().map_err(SecureFilesError::Io)?;

    exe_path
        .parent()
        .map(|p| p.to_path_buf())
        .ok_or_else(|| SecureFilesError::Other("Cannot determine executable directory".into()))
}

/// Default settings file path
pub fn get_settings_path() -> Result<PathBuf> {
    Ok(get_exe_dir()?.join(SETTINGS_FILE))
}

/// Load and validate settings from `path`, or the default location.
///
/// A missing file is not an error; defaults are returned.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => get_settings_path()?,
    };

    if !path.exists() {
        debug!(path = %path.display(), "no settings file, using defaults");
        return Ok(Settings::default());
    }

    let data = fs::read(&path)?;
    let settings: Settings = serde_json::from_slice(&data)?;
    settings.validate()?;

    debug!(path = %path.display(), "loaded settings");
    Ok(settings)
}

/// Write `settings` as pretty JSON.
pub fn save_settings(settings: &Settings, path: &Path) -> Result<()> {
    settings.validate()?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_vec_pretty(settings)?;
    let mut file = File::create(path)?;
    file.write_all(&json)?;
    file.write_all(b"\n")?;
    file.sync_all()?;

    Ok(())
}
