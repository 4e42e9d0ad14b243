//! Encrypted blob layout
//!
//! ```text
//! [12 bytes: nonce][N bytes: ciphertext][16 bytes: GCM tag]
//! ```
//!
//! No header, version, or magic number. The nonce width is fixed, so no
//! length prefix is needed.

use crate::crypto::{Nonce, NONCE_LEN};
use crate::error::{Result, SecureFilesError};

/// Concatenate `nonce ‖ ciphertext` into one buffer.
pub fn encode(nonce: &Nonce, ciphertext: &[u8]) -> Vec<u8> {
    let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    blob.extend_from_slice(nonce);
    blob.extend_from_slice(ciphertext);
    blob
}

/// Split a blob into its nonce and the ciphertext that follows.
///
/// A blob of exactly `NONCE_LEN` bytes decodes to an empty ciphertext; it is
/// left to the cipher to reject it.
pub fn decode(blob: &[u8]) -> Result<(Nonce, &[u8])> {
    if blob.len() < NONCE_LEN {
        return Err(SecureFilesError::MalformedBlob { len: blob.len() });
    }

    let (nonce_bytes, ciphertext) = blob.split_at(NONCE_LEN);
    let mut nonce = [0u8; NONCE_LEN];
    nonce.copy_from_slice(nonce_bytes);

    Ok((nonce, ciphertext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_layout_is_nonce_then_ciphertext() {
        let nonce = [0xAAu8; NONCE_LEN];
        let blob = encode(&nonce, &[1, 2, 3]);

        assert_eq!(blob.len(), NONCE_LEN + 3);
        assert_eq!(&blob[..NONCE_LEN], &nonce);
        assert_eq!(&blob[NONCE_LEN..], &[1, 2, 3]);
    }

    #[test]
    fn test_short_blobs_are_malformed() {
        for len in 0..NONCE_LEN {
            let data = vec![0u8; len];
            let result = decode(&data);
            assert!(
                matches!(result, Err(SecureFilesError::MalformedBlob { len: l }) if l == len),
                "{} byte blob should be malformed",
                len
            );
        }
    }

    #[test]
    fn test_nonce_only_blob_has_empty_ciphertext() {
        let (nonce, ciphertext) = decode(&[9u8; NONCE_LEN]).unwrap();
        assert_eq!(nonce, [9u8; NONCE_LEN]);
        assert!(ciphertext.is_empty());
    }

    proptest! {
        #[test]
        fn prop_decode_inverts_encode(
            nonce in any::<[u8; NONCE_LEN]>(),
            ciphertext in proptest::collection::vec(any::<u8>(), 0..512),
        ) {
            let blob = encode(&nonce, &ciphertext);
            let (n, c) = decode(&blob).unwrap();
            prop_assert_eq!(n, nonce);
            prop_assert_eq!(c, &ciphertext[..]);
        }
    }
}
