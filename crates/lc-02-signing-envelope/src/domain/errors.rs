//! # Envelope Errors

use shared_crypto::CryptoError;
use thiserror::Error;

/// Errors raised by envelope state transitions and encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    /// The body can no longer change.
    #[error("Envelope is frozen; the body can no longer change")]
    AlreadyFrozen,

    /// Signing and serialization need a frozen body.
    #[error("Envelope must be frozen first")]
    NotFrozen,

    /// Submission needs at least one signature.
    #[error("Envelope has no signatures")]
    NoSignatures,

    /// Memo exceeds the network limit.
    #[error("Memo too long: {len} bytes, max {max}")]
    MemoTooLong { len: usize, max: usize },

    /// The signing capability failed.
    #[error("Signing failed: {0}")]
    Signing(#[from] CryptoError),

    /// An attached signature does not verify against the body.
    #[error("Signature from {public_key} does not verify: {reason}")]
    InvalidSignature { public_key: String, reason: String },

    /// Body or envelope could not be encoded.
    #[error("Encoding failed: {0}")]
    Encoding(String),

    /// Wire bytes could not be decoded.
    #[error("Decoding failed: {0}")]
    Decoding(String),
}
