//! Command implementations

pub mod auto;
pub mod config;
pub mod decrypt;
pub mod encrypt;

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use colored::Colorize;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use secure_files::config::Settings;
use secure_files::error::{Result, SecureFilesError};
use secure_files::files::{self, SourceFile};
use secure_files::BatchProcessor;

/// Environment variable consulted before prompting
pub const PASSPHRASE_ENV: &str = "SECURE_FILES_PASSPHRASE";

/// Below this length a passphrase triggers a warning
pub const MIN_RECOMMENDED_LEN: usize = 12;

/// How a command finished, when it did not abort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every file succeeded
    Clean,
    /// At least one file failed
    Partial,
}

/// Arguments shared by every batch command
#[derive(Args, Debug, Clone)]
pub struct BatchArgs {
    /// Files to process
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Directory for output files (default: next to each input)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Overwrite existing output files
    #[arg(short, long)]
    pub force: bool,

    /// Number of worker threads (default: all cores)
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

impl BatchArgs {
    /// Merge these flags over file settings and validate the result.
    pub fn apply(&self, settings: Settings) -> Result<Settings> {
        let settings = settings.with_overrides(self.jobs, self.output_dir.clone(), self.force);
        settings.validate()?;
        Ok(settings)
    }
}

/// Read every path up front; a missing input aborts before any crypto runs.
pub fn read_sources(paths: &[PathBuf]) -> anyhow::Result<Vec<SourceFile>> {
    paths
        .iter()
        .map(|path| {
            files::read_source(path).with_context(|| format!("reading {}", path.display()))
        })
        .collect()
}

pub fn build_processor(settings: &Settings) -> Result<BatchProcessor> {
    let processor = BatchProcessor::new().with_suffix(settings.suffix.clone());
    match settings.jobs {
        Some(jobs) => processor.with_threads(jobs),
        None => Ok(processor),
    }
}

/// Get the passphrase from the environment or the terminal.
///
/// With `confirm_new`, the passphrase is asked twice and a short one must be
/// explicitly accepted.
pub fn prompt_passphrase(confirm_new: bool) -> Result<SecretString> {
    if let Ok(value) = std::env::var(PASSPHRASE_ENV) {
        debug!("passphrase taken from {}", PASSPHRASE_ENV);
        let passphrase = SecretString::new(value);
        warn_if_weak(&passphrase);
        return Ok(passphrase);
    }

    if !io::stdin().is_terminal() {
        return Err(SecureFilesError::Other(format!(
            "No terminal for the passphrase prompt; set {}",
            PASSPHRASE_ENV
        )));
    }

    loop {
        let passphrase = SecretString::new(rpassword::prompt_password("Passphrase: ")?);

        if !confirm_new {
            return Ok(passphrase);
        }

        let again = SecretString::new(rpassword::prompt_password("Confirm passphrase: ")?);
        if passphrase.expose_secret() != again.expose_secret() {
            println!("{} Passphrases do not match", "Error:".red());
            continue;
        }

        if warn_if_weak(&passphrase) && !confirm("Use this passphrase anyway?") {
            return Err(SecureFilesError::Cancelled);
        }

        return Ok(passphrase);
    }
}

/// Returns true if a warning was printed.
fn warn_if_weak(passphrase: &SecretString) -> bool {
    let len = passphrase.expose_secret().chars().count();
    if len >= MIN_RECOMMENDED_LEN {
        return false;
    }

    if len == 0 {
        eprintln!("{} The passphrase is empty.", "Warning:".yellow().bold());
    } else {
        eprintln!(
            "{} Passphrases shorter than {} characters are easy to guess.",
            "Warning:".yellow().bold(),
            MIN_RECOMMENDED_LEN
        );
    }
    true
}

/// Ask a yes/no question
pub fn confirm(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    io::stdout().flush().ok();

    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return false;
    }

    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}

pub fn print_ok(from: &str, to: &std::path::Path) {
    println!("  {} {} -> {}", "ok".green(), from, to.display());
}

pub fn print_failed(from: &str, error: &SecureFilesError) {
    println!("  {} {}: {}", "failed".red(), from, error);
}

pub fn print_summary(verb: &str, succeeded: usize, total: usize, seconds: f64) {
    let line = format!(
        "{} {} of {} file(s) in {:.2} seconds.",
        verb, succeeded, total, seconds
    );
    if succeeded == total {
        println!("{}", line.green().bold());
    } else {
        println!("{}", line.yellow().bold());
    }
}
