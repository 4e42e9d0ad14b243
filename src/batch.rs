//! Parallel encryption and decryption of file batches
//!
//! One key is derived per batch and shared read-only by every worker. Each
//! file draws its own nonce and produces its own outcome; a bad file never
//! stops its siblings. Only a failing entropy source aborts the batch.
//! Results come back in input order.

use rayon::prelude::*;
use rayon::ThreadPool;
use secrecy::SecretString;
use tracing::{debug, error, warn};

use crate::blob;
use crate::crypto::{self, DerivedKey, NonceSource, OsNonceSource, SecureBytes};
use crate::error::{Result, SecureFilesError};
use crate::naming::{self, DEFAULT_SUFFIX};

/// A named buffer handed in by the caller: plaintext for encryption, an
/// encrypted blob for decryption.
#[derive(Debug, Clone)]
pub struct InputFile {
    pub name: String,
    pub data: Vec<u8>,
}

impl InputFile {
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }
}

/// Encryption output, ready to be written under `name`.
#[derive(Debug, Clone)]
pub struct EncryptedFile {
    pub name: String,
    pub blob: Vec<u8>,
}

/// Decryption output, ready to be written under `name`.
#[derive(Debug)]
pub struct PlaintextFile {
    pub name: String,
    pub data: SecureBytes,
}

/// Outcome for one input, tagged with the input's name.
#[derive(Debug)]
pub struct FileOutcome<T> {
    pub source: String,
    pub result: Result<T>,
}

impl<T> FileOutcome<T> {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Overall shape of a completed batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    AllSucceeded,
    PartialFailure { failed: usize, total: usize },
}

/// Per-file outcomes in the order the inputs were given.
#[derive(Debug)]
pub struct BatchResult<T> {
    outcomes: Vec<FileOutcome<T>>,
}

impl<T> BatchResult<T> {
    fn new(outcomes: Vec<FileOutcome<T>>) -> Self {
        Self { outcomes }
    }

    pub fn outcomes(&self) -> &[FileOutcome<T>] {
        &self.outcomes
    }

    pub fn into_outcomes(self) -> Vec<FileOutcome<T>> {
        self.outcomes
    }

    pub fn iter(&self) -> impl Iterator<Item = &FileOutcome<T>> {
        self.outcomes.iter()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.len() - self.succeeded()
    }

    pub fn status(&self) -> BatchStatus {
        match self.failed() {
            0 => BatchStatus::AllSucceeded,
            failed => BatchStatus::PartialFailure {
                failed,
                total: self.len(),
            },
        }
    }
}

/// Encrypt `plaintext` into a self-contained blob with a fresh nonce.
///
/// `EntropyUnavailable` from the nonce source is passed through unchanged so
/// callers can tell it apart from per-file failures.
pub fn seal_blob(
    key: &DerivedKey,
    nonces: &dyn NonceSource,
    plaintext: &[u8],
) -> Result<Vec<u8>> {
    let nonce = nonces.next_nonce()?;
    let ciphertext = crypto::seal(key, &nonce, plaintext)?;
    Ok(blob::encode(&nonce, &ciphertext))
}

/// Decrypt a blob produced by [`seal_blob`].
pub fn open_blob(key: &DerivedKey, data: &[u8]) -> Result<SecureBytes> {
    let (nonce, ciphertext) = blob::decode(data)?;
    crypto::open(key, &nonce, ciphertext)
}

/// Fans a batch out over a rayon pool and gathers the results.
pub struct BatchProcessor<N = OsNonceSource> {
    nonces: N,
    pool: Option<ThreadPool>,
    suffix: String,
}

impl BatchProcessor<OsNonceSource> {
    /// Processor on rayon's global pool with OS nonces and the `.enc` suffix.
    pub fn new() -> Self {
        Self::with_nonce_source(OsNonceSource)
    }
}

impl Default for BatchProcessor<OsNonceSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: NonceSource> BatchProcessor<N> {
    pub fn with_nonce_source(nonces: N) -> Self {
        Self {
            nonces,
            pool: None,
            suffix: DEFAULT_SUFFIX.to_string(),
        }
    }

    /// Run on a dedicated pool of `threads` workers instead of the global one.
    pub fn with_threads(mut self, threads: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("secure-files-{}", i))
            .build()
            .map_err(|e| SecureFilesError::ThreadPool(e.to_string()))?;
        self.pool = Some(pool);
        Ok(self)
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Encrypt every file under a key derived from `passphrase`.
    ///
    /// # Errors
    /// Returns `EntropyUnavailable` if any nonce draw fails; no partial
    /// result is returned in that case.
    pub fn encrypt_all(
        &self,
        files: &[InputFile],
        passphrase: &SecretString,
    ) -> Result<BatchResult<EncryptedFile>> {
        if files.is_empty() {
            return Ok(BatchResult::new(Vec::new()));
        }

        debug!(files = files.len(), "encrypting batch");
        let key = crypto::derive_key(passphrase);
        debug!("derived batch key");

        let outcomes = self.install(|| {
            files
                .par_iter()
                .map(|file| self.encrypt_one(&key, file))
                .collect::<Result<Vec<_>>>()
        });

        let outcomes = outcomes.map_err(|e| {
            error!(error = %e, "encryption batch aborted");
            e
        })?;

        let result = BatchResult::new(outcomes);
        debug!(
            succeeded = result.succeeded(),
            failed = result.failed(),
            "encryption batch finished"
        );
        Ok(result)
    }

    /// Decrypt every blob under a key derived from `passphrase`.
    ///
    /// Per-file failures (`MalformedBlob`, `AuthenticationFailed`) are
    /// recorded in the result and never abort the batch.
    pub fn decrypt_all(
        &self,
        blobs: &[InputFile],
        passphrase: &SecretString,
    ) -> Result<BatchResult<PlaintextFile>> {
        if blobs.is_empty() {
            return Ok(BatchResult::new(Vec::new()));
        }

        debug!(files = blobs.len(), "decrypting batch");
        let key = crypto::derive_key(passphrase);
        debug!("derived batch key");

        let outcomes = self.install(|| {
            blobs
                .par_iter()
                .map(|file| self.decrypt_one(&key, file))
                .collect::<Vec<_>>()
        });

        let result = BatchResult::new(outcomes);
        debug!(
            succeeded = result.succeeded(),
            failed = result.failed(),
            "decryption batch finished"
        );
        Ok(result)
    }

    fn encrypt_one(
        &self,
        key: &DerivedKey,
        file: &InputFile,
    ) -> Result<FileOutcome<EncryptedFile>> {
        let result = match seal_blob(key, &self.nonces, &file.data) {
            Ok(blob) => Ok(EncryptedFile {
                name: naming::encrypted_name(&file.name, &self.suffix),
                blob,
            }),
            Err(e) if e.is_batch_fatal() => return Err(e),
            Err(e) => {
                warn!(file = %file.name, error = %e, "encryption failed");
                Err(e)
            }
        };

        Ok(FileOutcome {
            source: file.name.clone(),
            result,
        })
    }

    fn decrypt_one(&self, key: &DerivedKey, file: &InputFile) -> FileOutcome<PlaintextFile> {
        let result = open_blob(key, &file.data)
            .map(|data| PlaintextFile {
                name: naming::decrypted_name(&file.name, &self.suffix),
                data,
            })
            .map_err(|e| {
                warn!(file = %file.name, error = %e, "decryption failed");
                e
            });

        FileOutcome {
            source: file.name.clone(),
            result,
        }
    }

    fn install<F, R>(&self, op: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }
}
