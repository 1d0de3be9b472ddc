//! # Shared Crypto - Keys, Signatures and Digests
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `hashing` | SHA-384, Keccak-256 | Running hashes, ECDSA prehash |
//! | `ed25519` | Ed25519 | Transaction signing |
//! | `ecdsa` | secp256k1 | Transaction signing (EVM-compatible keys) |
//! | `keys` | both | `SigningCapability`, algorithm-tagged keys, DER import |
//!
//! ## Security Properties
//!
//! - **Ed25519**: Deterministic nonces, no RNG dependency
//! - **secp256k1**: RFC 6979 deterministic, low-S normalization
//! - Secret key material is zeroized on drop and never printed

#![warn(clippy::all)]

pub mod der;
pub mod ecdsa;
pub mod ed25519;
pub mod errors;
pub mod hashing;
pub mod keys;

// Re-exports
pub use ecdsa::{Secp256k1KeyPair, Secp256k1PublicKey};
pub use ed25519::{Ed25519KeyPair, Ed25519PublicKey};
pub use errors::CryptoError;
pub use hashing::{keccak256, sha384, Sha384Hash, Sha384Hasher, SHA384_LEN};
pub use keys::{KeyAlgorithm, PrivateKey, PublicKey, SigningCapability};
