//! Secure Files - passphrase-based batch file encryption
//!
//! This crate turns a set of files and one passphrase into self-contained
//! encrypted blobs, and back:
//! - The key is SHA-256 of the passphrase, derived once per batch
//! - Every file gets a fresh random 96-bit nonce
//! - Files are sealed with AES-256-GCM and stored as `nonce ‖ ciphertext ‖ tag`
//! - Batches run in parallel and report success or failure per file

pub mod batch;
pub mod blob;
pub mod config;
pub mod crypto;
pub mod error;
pub mod files;
pub mod naming;

pub use batch::{
    open_blob, seal_blob, BatchProcessor, BatchResult, BatchStatus, EncryptedFile, FileOutcome,
    InputFile, PlaintextFile,
};
pub use error::{Result, SecureFilesError};
