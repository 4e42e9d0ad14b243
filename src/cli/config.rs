//! Show or create the settings file

use std::path::{Path, PathBuf};

use colored::Colorize;

use secure_files::config::{self, Settings};
use secure_files::error::{Result, SecureFilesError};

fn resolve(path: Option<&Path>) -> Result<PathBuf> {
    match path {
        Some(p) => Ok(p.to_path_buf()),
        None => config::get_settings_path(),
    }
}

pub fn show(path: Option<&Path>) -> Result<()> {
    let location = resolve(path)?;
    let settings = config::load_settings(Some(&location))?;

    println!("{} {}", "Settings file:".cyan(), location.display());
    if !location.exists() {
        println!("{}", "(not present, showing defaults)".dimmed());
    }
    println!("{}", serde_json::to_string_pretty(&settings)?);

    Ok(())
}

pub fn init(path: Option<&Path>, force: bool) -> Result<()> {
    let location = resolve(path)?;

    if location.exists() && !force {
        return Err(SecureFilesError::OutputExists(location));
    }

    config::save_settings(&Settings::default(), &location)?;
    println!("{} {}", "Wrote default settings to".green(), location.display());

    Ok(())
}
