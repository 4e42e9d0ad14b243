//! Zero-on-drop container for decrypted file contents
//!
//! Plaintext handed back to the caller lives here until it is written out.
//! The buffer is wiped on drop, hidden from `Debug`, and on Unix pinned in
//! RAM for its lifetime.

use std::ops::Deref;
use zeroize::Zeroize;

pub struct SecureBytes(Vec<u8>);

impl SecureBytes {
    /// Take ownership of `data`. The caller's copy is the only one.
    pub fn new(data: Vec<u8>) -> Self {
        let secure = Self(data);
        secure.lock_memory();
        secure
    }

    /// Best effort; `mlock` fails quietly without the privilege or for
    /// buffers above RLIMIT_MEMLOCK.
    #[cfg(unix)]
    fn lock_memory(&self) {
        if self.0.is_empty() {
            return;
        }
        unsafe {
            libc::mlock(self.0.as_ptr() as *const libc::c_void, self.0.len());
        }
    }

    #[cfg(not(unix))]
    fn lock_memory(&self) {}

    #[cfg(unix)]
    fn unlock_memory(&self) {
        if self.0.is_empty() {
            return;
        }
        unsafe {
            libc::munlock(self.0.as_ptr() as *const libc::c_void, self.0.len());
        }
    }

    #[cfg(not(unix))]
    fn unlock_memory(&self) {}

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Wipes the contents in place. The length is kept so the locked range
/// can still be released on drop.
impl Zeroize for SecureBytes {
    fn zeroize(&mut self) {
        self.0.as_mut_slice().zeroize();
    }
}

impl Drop for SecureBytes {
    fn drop(&mut self) {
        // Wipe while the pages are still locked, then release them.
        self.zeroize();
        self.unlock_memory();
    }
}

impl Deref for SecureBytes {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl PartialEq<[u8]> for SecureBytes {
    fn eq(&self, other: &[u8]) -> bool {
        self.0.as_slice() == other
    }
}

impl std::fmt::Debug for SecureBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureBytes")
            .field("len", &self.0.len())
            .field("data", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_bytes_deref() {
        let secure = SecureBytes::new(vec![1, 2, 3, 4]);
        assert_eq!(secure.len(), 4);
        assert_eq!(&*secure, &[1, 2, 3, 4]);
        assert!(secure == [1u8, 2, 3, 4][..]);
    }

    #[test]
    fn test_zeroize_wipes_but_keeps_locked_length() {
        let mut secure = SecureBytes::new(vec![0xDE, 0xAD, 0xBE, 0xEF]);
        secure.zeroize();
        assert_eq!(secure.len(), 4);
        assert_eq!(&*secure, &[0, 0, 0, 0]);
    }

    #[test]
    fn test_debug_hides_contents() {
        let secure = SecureBytes::new(b"top secret".to_vec());
        let printed = format!("{:?}", secure);
        assert!(printed.contains("[REDACTED]"));
        assert!(!printed.contains("116"));
    }

    #[test]
    fn test_empty_buffer() {
        let secure = SecureBytes::new(Vec::new());
        assert!(secure.is_empty());
    }
}
