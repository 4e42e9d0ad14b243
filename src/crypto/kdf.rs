//! Passphrase to key derivation
//!
//! The key is a single SHA-256 over the UTF-8 passphrase: no salt, no
//! iterations. This matches existing `.enc` artifacts and is therefore fast
//! to brute-force offline. Moving to a slow KDF needs a salt stored next to
//! the nonce, which is a format change.

use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Derived key length in bytes (256 bits for AES-256)
pub const KEY_LEN: usize = 32;

/// A 256-bit symmetric key derived from a passphrase.
///
/// Zeroized on drop; never printed.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    bytes: [u8; KEY_LEN],
}

impl DerivedKey {
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Derive the file encryption key from a passphrase.
///
/// Pure and deterministic: the same passphrase always yields the same key.
/// The empty passphrase is accepted.
pub fn derive_key(passphrase: &SecretString) -> DerivedKey {
    let mut hasher = Sha256::new();
    hasher.update(passphrase.expose_secret().as_bytes());
    let mut digest = hasher.finalize();

    let mut bytes = [0u8; KEY_LEN];
    bytes.copy_from_slice(&digest);
    digest.as_mut_slice().zeroize();

    DerivedKey::from_bytes(bytes)
}
