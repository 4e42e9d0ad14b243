//! Decrypt files

use std::path::PathBuf;
use std::time::Instant;

use colored::Colorize;
use tracing::info;

use secure_files::config::Settings;
use secure_files::files::{self, SourceFile};
use secure_files::naming;
use secure_files::InputFile;

use super::{
    build_processor, print_failed, print_ok, print_summary, prompt_passphrase, BatchArgs,
    RunStatus,
};

pub fn run(args: &BatchArgs, settings: Settings) -> anyhow::Result<RunStatus> {
    let settings = args.apply(settings)?;
    let sources = super::read_sources(&args.paths)?;
    decrypt_sources(sources, &settings)
}

/// Decrypt already-loaded sources and write each plaintext out.
///
/// Files without the suffix are decrypted too; their output keeps the same
/// name, so with no `--output-dir` the write fails unless `--force` is given.
pub fn decrypt_sources(
    sources: Vec<SourceFile>,
    settings: &Settings,
) -> anyhow::Result<RunStatus> {
    println!(
        "{}",
        format!("=== Decrypting {} file(s) ===", sources.len()).cyan().bold()
    );

    let processor = build_processor(settings)?;

    for source in &sources {
        if !naming::is_encrypted_name(&source.input.name, processor.suffix()) {
            info!(
                file = %source.input.name,
                suffix = %processor.suffix(),
                "decrypting file without suffix"
            );
        }
    }

    let passphrase = prompt_passphrase(false)?;

    let (paths, inputs): (Vec<PathBuf>, Vec<InputFile>) =
        sources.into_iter().map(|s| (s.path, s.input)).unzip();

    let started = Instant::now();
    let result = processor.decrypt_all(&inputs, &passphrase)?;
    let elapsed = started.elapsed().as_secs_f64();
    drop(passphrase);
    drop(inputs);

    let total = result.len();
    let mut succeeded = 0;

    for (source_path, outcome) in paths.iter().zip(result.into_outcomes()) {
        let written = outcome.result.and_then(|file| {
            let path =
                files::output_path(source_path, &file.name, settings.output_dir.as_deref());
            files::write_output(&path, &file.data, settings.overwrite).map(|()| path)
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
    print_summary("Decrypted", succeeded, total, elapsed);

    if succeeded < total {
        println!("Some files could not be decrypted. Check the passphrase and try again.");
    }

    Ok(if succeeded == total {
        RunStatus::Clean
    } else {
        RunStatus::Partial
    })
}
