//! Per-file nonce generation

use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{Result, SecureFilesError};

/// Nonce length for AES-GCM (96 bits)
pub const NONCE_LEN: usize = 12;

/// A 96-bit nonce. Must never repeat under the same key.
pub type Nonce = [u8; NONCE_LEN];

/// Source of fresh nonces, shared by every worker in a batch.
pub trait NonceSource: Send + Sync {
    /// Draw a new random nonce.
    ///
    /// Fails with `EntropyUnavailable` rather than falling back to a weaker
    /// generator.
    fn next_nonce(&self) -> Result<Nonce>;
}

/// Nonces straight from the operating system CSPRNG.
///
/// `OsRng` holds no state, so concurrent draws need no coordination.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsNonceSource;

impl NonceSource for OsNonceSource {
    fn next_nonce(&self) -> Result<Nonce> {
        let mut nonce = [0u8; NONCE_LEN];
        OsRng
            .try_fill_bytes(&mut nonce)
            .map_err(|e| SecureFilesError::EntropyUnavailable(e.to_string()))?;
        Ok(nonce)
    }
}
