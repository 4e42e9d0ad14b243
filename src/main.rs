use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use secure_files::config;

mod cli;

use cli::{BatchArgs, RunStatus};

const EXIT_CLEAN: u8 = 0;
const EXIT_FAILED: u8 = 1;
/// Exit code when some files in a batch failed
const EXIT_PARTIAL: u8 = 2;

#[derive(Parser)]
#[command(name = "secure-files")]
#[command(version)]
#[command(about = "Encrypt and decrypt files under a single passphrase", long_about = None)]
struct Cli {
    /// Settings file (default: secure-files.json next to the executable)
    #[arg(long, global = true, env = "SECURE_FILES_CONFIG")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt files, writing <name><suffix>
    Encrypt(BatchArgs),

    /// Decrypt files, stripping the suffix from each name
    Decrypt(BatchArgs),

    /// Encrypt plain files, or decrypt if every file is already encrypted
    Auto(BatchArgs),

    /// Manage the settings file
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective settings
    Show,
    /// Write a settings file with default values
    Init {
        /// Replace an existing settings file
        #[arg(short, long)]
        force: bool,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = run(cli);
    if let Err(e) = &result {
        tracing::error!(error = %e, "command failed");
        eprintln!("{} {:#}", "Error:".red().bold(), e);
    }

    ExitCode::from(exit_status(&result))
}

/// 0 when every file succeeded, 2 when some failed, 1 when the command aborted.
fn exit_status(result: &anyhow::Result<RunStatus>) -> u8 {
    match result {
        Ok(RunStatus::Clean) => EXIT_CLEAN,
        Ok(RunStatus::Partial) => EXIT_PARTIAL,
        Err(_) => EXIT_FAILED,
    }
}

fn run(cli: Cli) -> anyhow::Result<RunStatus> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Encrypt(args) => cli::encrypt::run(&args, config::load_settings(config_path)?),
        Commands::Decrypt(args) => cli::decrypt::run(&args, config::load_settings(config_path)?),
        Commands::Auto(args) => cli::auto::run(&args, config::load_settings(config_path)?),
        Commands::Config { action } => {
            match action {
                ConfigCommands::Show => cli::config::show(config_path)?,
                ConfigCommands::Init { force } => cli::config::init(config_path, force)?,
            }
            Ok(RunStatus::Clean)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secure_files::error::SecureFilesError;

    #[test]
    fn test_exit_status_mapping() {
        assert_eq!(exit_status(&Ok(RunStatus::Clean)), 0);
        assert_eq!(exit_status(&Ok(RunStatus::Partial)), 2);

        let aborted: anyhow::Result<RunStatus> =
            Err(SecureFilesError::EntropyUnavailable("no entropy".into()).into());
        assert_eq!(exit_status(&aborted), 1);
    }

    #[test]
    fn test_cli_parses_batch_flags() {
        let cli = Cli::try_parse_from([
            "secure-files", "decrypt", "-f", "-j", "3", "-o", "/tmp/out", "a.enc", "b.enc",
        ])
        .unwrap();

        match cli.command {
            Commands::Decrypt(args) => {
                assert_eq!(args.paths.len(), 2);
                assert!(args.force);
                assert_eq!(args.jobs, Some(3));
                assert_eq!(args.output_dir, Some(PathBuf::from("/tmp/out")));
            }
            _ => panic!("expected decrypt"),
        }
    }
}
