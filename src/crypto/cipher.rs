//! AES-256-GCM Authenticated Encryption
//!
//! No associated data is bound. The 16-byte tag is appended to the
//! ciphertext by the `aes-gcm` crate and checked in constant time on open.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key,
};

use super::{DerivedKey, Nonce, SecureBytes};
use crate::error::{Result, SecureFilesError};

/// Authentication tag length (128 bits)
pub const TAG_LEN: usize = 16;

fn cipher_for(key: &DerivedKey) -> Aes256Gcm {
    Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()))
}

/// Encrypt `plaintext` under `key` and `nonce`.
///
/// Output is `plaintext.len() + TAG_LEN` bytes. The caller must never reuse
/// a nonce with the same key.
pub fn seal(key: &DerivedKey, nonce: &Nonce, plaintext: &[u8]) -> Result<Vec<u8>> {
    cipher_for(key)
        .encrypt(aes_gcm::Nonce::from_slice(nonce), plaintext)
        .map_err(|e| SecureFilesError::EncryptionFailed(e.to_string()))
}

/// Decrypt and authenticate `ciphertext` (tag included).
///
/// # Errors
/// Returns `AuthenticationFailed` for a wrong key, a wrong nonce, or any
/// modification of the ciphertext. No partial plaintext is ever returned.
pub fn open(key: &DerivedKey, nonce: &Nonce, ciphertext: &[u8]) -> Result<SecureBytes> {
    let plaintext = cipher_for(key)
        .decrypt(aes_gcm::Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| SecureFilesError::AuthenticationFailed)?;

    Ok(SecureBytes::new(plaintext))
}
