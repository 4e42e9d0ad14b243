use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SecureFilesError>;

#[derive(Debug, Error)]
pub enum SecureFilesError {
    #[error("Secure random source unavailable: {0}")]
    EntropyUnavailable(String),

    /// Deliberately carries no detail: a wrong passphrase and a corrupted
    /// blob must be indistinguishable.
    #[error("Decryption failed: wrong passphrase or corrupted data")]
    AuthenticationFailed,

    #[error("Malformed encrypted blob: {len} bytes is too short to hold a nonce")]
    MalformedBlob { len: usize },

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Failed to start worker pool: {0}")]
    ThreadPool(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Refusing to overwrite existing file '{}' (use --force)", .0.display())]
    OutputExists(PathBuf),

    #[error("Operation cancelled by user")]
    Cancelled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl SecureFilesError {
    /// Errors that abort a whole batch instead of failing a single file.
    pub fn is_batch_fatal(&self) -> bool {
        matches!(
            self,
            SecureFilesError::EntropyUnavailable(_) | SecureFilesError::ThreadPool(_)
        )
    }
}
