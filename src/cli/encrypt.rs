//! Encrypt files

use std::path::PathBuf;
use std::time::Instant;

use colored::Colorize;

use secure_files::config::Settings;
use secure_files::files::{self, SourceFile};
use secure_files::InputFile;

use super::{
    build_processor, print_failed, print_ok, print_summary, prompt_passphrase, BatchArgs,
    RunStatus,
};

pub fn run(args: &BatchArgs, settings: Settings) -> anyhow::Result<RunStatus> {
    let settings = args.apply(settings)?;
    let sources = super::read_sources(&args.paths)?;
    encrypt_sources(sources, &settings)
}

/// Encrypt already-loaded sources and write each blob out.
pub fn encrypt_sources(
    sources: Vec<SourceFile>,
    settings: &Settings,
) -> anyhow::Result<RunStatus> {
    println!(
        "{}",
        format!("=== Encrypting {} file(s) ===", sources.len()).cyan().bold()
    );

    let passphrase = prompt_passphrase(true)?;
    let processor = build_processor(settings)?;

    let (paths, inputs): (Vec<PathBuf>, Vec<InputFile>) =
        sources.into_iter().map(|s| (s.path, s.input)).unzip();

    let started = Instant::now();
    let result = processor.encrypt_all(&inputs, &passphrase)?;
    let elapsed = started.elapsed().as_secs_f64();
    drop(passphrase);
    drop(inputs);

    let total = result.len();
    let mut succeeded = 0;

    for (source_path, outcome) in paths.iter().zip(result.into_outcomes()) {
        let written = outcome.result.and_then(|file| {
            let path =
                files::output_path(source_path, &file.name, settings.output_dir.as_deref());
            files::write_output(&path, &file.blob, settings.overwrite).map(|()| path)
        });

        match written {
            Ok(path) => {
                succeeded += 1;
                print_ok(&outcome.source, &path);
            }
            Err(e) => print_failed(&outcome.source, &e),
        }
    }

    println!();
    print_summary("Encrypted", succeeded, total, elapsed);

    if succeeded > 0 && settings.remind_delete_originals {
        println!("Please remember to delete the original files from your system.");
    }

    Ok(if succeeded == total {
        RunStatus::Clean
    } else {
        RunStatus::Partial
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::test_support::{settings_into, sources_in, with_passphrase};
    use std::fs;

    const PASSPHRASE: &str = "encrypt test passphrase";

    #[test]
    fn test_all_files_written_is_clean() {
        let plain = tempfile::tempdir().unwrap();
        let vault = tempfile::tempdir().unwrap();
        let sources = sources_in(plain.path(), &[("a.txt", "alpha"), ("b.txt", "bravo")]);

        let status = with_passphrase(PASSPHRASE, || {
            encrypt_sources(sources, &settings_into(vault.path())).unwrap()
        });

        assert_eq!(status, RunStatus::Clean);
        assert!(vault.path().join("a.txt.enc").exists());
        assert!(vault.path().join("b.txt.enc").exists());
    }

    #[test]
    fn test_existing_output_makes_run_partial() {
        let plain = tempfile::tempdir().unwrap();
        let vault = tempfile::tempdir().unwrap();
        let sources = sources_in(plain.path(), &[("a.txt", "alpha"), ("b.txt", "bravo")]);
        fs::write(vault.path().join("b.txt.enc"), b"keep me").unwrap();

        let status = with_passphrase(PASSPHRASE, || {
            encrypt_sources(sources, &settings_into(vault.path())).unwrap()
        });

        assert_eq!(status, RunStatus::Partial);
        assert!(vault.path().join("a.txt.enc").exists());
        assert_eq!(fs::read(vault.path().join("b.txt.enc")).unwrap(), b"keep me");
    }

    #[test]
    fn test_force_replaces_existing_output() {
        let plain = tempfile::tempdir().unwrap();
        let vault = tempfile::tempdir().unwrap();
        let sources = sources_in(plain.path(), &[("a.txt", "alpha")]);
        fs::write(vault.path().join("a.txt.enc"), b"stale").unwrap();

        let mut settings = settings_into(vault.path());
        settings.overwrite = true;

        let status = with_passphrase(PASSPHRASE, || encrypt_sources(sources, &settings).unwrap());

        assert_eq!(status, RunStatus::Clean);
        assert_ne!(fs::read(vault.path().join("a.txt.enc")).unwrap(), b"stale");
    }
}
