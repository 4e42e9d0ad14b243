//! Cryptographic primitives for secure-files
//!
//! This module provides:
//! - SHA-256 passphrase-to-key derivation
//! - OS-backed random nonces
//! - AES-256-GCM authenticated encryption
//! - Secure memory handling with automatic zeroing

mod cipher;
mod kdf;
mod nonce;
mod secure_bytes;

pub use cipher::{open, seal, TAG_LEN};
pub use kdf::{derive_key, DerivedKey, KEY_LEN};
pub use nonce::{Nonce, NonceSource, OsNonceSource, NONCE_LEN};
pub use secure_bytes::SecureBytes;
