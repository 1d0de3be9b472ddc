//! # Hashing
//!
//! - SHA-384: topic running hashes and transaction hashes.
//! - Keccak-256: message prehash for secp256k1 signatures.

use sha2::{Digest, Sha384};
use sha3::Keccak256;

/// SHA-384 digest length in bytes.
pub const SHA384_LEN: usize = 48;

/// SHA-384 output (384-bit).
pub type Sha384Hash = [u8; SHA384_LEN];

/// Stateful SHA-384 hasher.
#[derive(Clone, Default)]
pub struct Sha384Hasher {
    inner: Sha384,
}

impl Sha384Hasher {
    /// Create new hasher.
    pub fn new() -> Self {
        Self {
            inner: Sha384::new(),
        }
    }

    /// Update with data.
    pub fn update(&mut self, data: &[u8]) -> &mut Self {
        self.inner.update(data);
        self
    }

    /// Finalize and return hash.
    pub fn finalize(self) -> Sha384Hash {
        self.inner.finalize().into()
    }
}

/// Hash data with SHA-384 (one-shot).
pub fn sha384(data: &[u8]) -> Sha384Hash {
    Sha384::digest(data).into()
}

/// Hash data with Keccak-256 (the pre-standard SHA-3 padding).
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha384_known_vector() {
        assert_eq!(
            hex::encode(sha384(b"abc")),
            "cb00753f45a35e8bb5a03d699ac65007272c32ab0eed1631a8b605a43ff5bed8\
             086072ba1e7cc2358baeca134c825a7"
        );
    }

    #[test]
    fn test_streaming() {
        let mut hasher = Sha384Hasher::new();
        hasher.update(b"hello ").update(b"world");
        assert_eq!(hasher.finalize(), sha384(b"hello world"));
    }

    #[test]
    fn test_keccak256_known_vectors() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
        assert_eq!(
            hex::encode(keccak256(b"abc")),
            "4e03657aea45a94fc7d47ba826c8d667c0d1e6e33a64a036ec44f58fa12d6c45"
        );
    }
}
