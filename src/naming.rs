//! Output filename convention
//!
//! Advisory only: the blob format carries no name, and decryption works
//! regardless of what a file is called.

/// Suffix appended to encrypted files
pub const DEFAULT_SUFFIX: &str = ".enc";

/// Name for the encrypted form of `name`.
pub fn encrypted_name(name: &str, suffix: &str) -> String {
    format!("{}{}", name, suffix)
}

/// Name for the decrypted form of `name`.
///
/// Strips a trailing `suffix`. A name without it, or consisting only of it,
/// is returned unchanged.
pub fn decrypted_name(name: &str, suffix: &str) -> String {
    match name.strip_suffix(suffix) {
        Some(stem) if !stem.is_empty() && !suffix.is_empty() => stem.to_string(),
        _ => name.to_string(),
    }
}

/// Whether `name` looks like an encrypted file.
pub fn is_encrypted_name(name: &str, suffix: &str) -> bool {
    !suffix.is_empty() && name.len() > suffix.len() && name.ends_with(suffix)
}
