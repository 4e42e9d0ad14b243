//! Pick encrypt or decrypt from the file names
//!
//! If any selected file lacks the suffix, those files are encrypted and the
//! already-encrypted ones are left alone. Otherwise everything is decrypted.

use colored::Colorize;

use secure_files::config::Settings;
use secure_files::files::SourceFile;
use secure_files::naming;

use super::{decrypt, encrypt, BatchArgs, RunStatus};

#[derive(Debug)]
pub enum Route {
    Encrypt {
        plain: Vec<SourceFile>,
        skipped: Vec<SourceFile>,
    },
    Decrypt(Vec<SourceFile>),
}

pub fn route(sources: Vec<SourceFile>, suffix: &str) -> Route {
    let (encrypted, plain): (Vec<_>, Vec<_>) = sources
        .into_iter()
        .partition(|s| naming::is_encrypted_name(&s.input.name, suffix));

    if plain.is_empty() {
        Route::Decrypt(encrypted)
    } else {
        Route::Encrypt {
            plain,
            skipped: encrypted,
        }
    }
}

pub fn run(args: &BatchArgs, settings: Settings) -> anyhow::Result<RunStatus> {
    let settings = args.apply(settings)?;
    let sources = super::read_sources(&args.paths)?;

    match route(sources, &settings.suffix) {
        Route::Encrypt { plain, skipped } => {
            for source in &skipped {
                println!(
                    "{} {} is already encrypted, skipping",
                    "Note:".dimmed(),
                    source.input.name
                );
            }
            encrypt::encrypt_sources(plain, &settings)
        }
        Route::Decrypt(encrypted) => decrypt::decrypt_sources(encrypted, &settings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secure_files::InputFile;
    use std::path::PathBuf;

    fn source(name: &str) -> SourceFile {
        SourceFile {
            path: PathBuf::from(name),
            input: InputFile::new(name, Vec::new()),
        }
    }

    fn names(sources: &[SourceFile]) -> Vec<&str> {
        sources.iter().map(|s| s.input.name.as_str()).collect()
    }

    #[test]
    fn test_mixed_selection_encrypts_plain_files() {
        let sources = vec![source("a.txt"), source("b.txt.enc"), source("c.png")];

        match route(sources, ".enc") {
            Route::Encrypt { plain, skipped } => {
                assert_eq!(names(&plain), vec!["a.txt", "c.png"]);
                assert_eq!(names(&skipped), vec!["b.txt.enc"]);
            }
            other => panic!("expected encrypt, got {:?}", other),
        }
    }

    #[test]
    fn test_all_encrypted_selection_decrypts() {
        let sources = vec![source("a.txt.enc"), source("b.enc")];

        match route(sources, ".enc") {
            Route::Decrypt(files) => assert_eq!(names(&files), vec!["a.txt.enc", "b.enc"]),
            other => panic!("expected decrypt, got {:?}", other),
        }
    }
}
