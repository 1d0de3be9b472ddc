//! # Ed25519 Signatures
//!
//! Twisted Edwards curve signatures with deterministic nonces. The message
//! is signed as-is (no prehash).

use crate::der;
use crate::CryptoError;
use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use zeroize::Zeroize;

/// Ed25519 public key (32 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ed25519PublicKey([u8; 32]);

impl Ed25519PublicKey {
    /// Create from raw bytes, validating the curve point.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let bytes: [u8; 32] = bytes.try_into().map_err(|_| CryptoError::InvalidKeyLength {
            expected: 32,
            actual: bytes.len(),
        })?;
        VerifyingKey::from_bytes(&bytes).map_err(|_| CryptoError::InvalidPublicKey)?;
        Ok(Self(bytes))
    }

    /// Parse a `SubjectPublicKeyInfo` DER structure.
    pub fn from_der(der_bytes: &[u8]) -> Result<Self, CryptoError> {
        let raw = der::strip(der_bytes, &der::ED25519_PUBLIC_PREFIX, 32)
            .ok_or_else(|| CryptoError::UnsupportedDer("expected Ed25519 public key".into()))?;
        Self::from_bytes(raw)
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Encode as `SubjectPublicKeyInfo` DER.
    pub fn to_der(&self) -> Vec<u8> {
        der::wrap(&der::ED25519_PUBLIC_PREFIX, &self.0)
    }

    /// Verify a 64-byte signature over `message`.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
        let verifying_key =
            VerifyingKey::from_bytes(&self.0).map_err(|_| CryptoError::InvalidPublicKey)?;

        let sig = ed25519_dalek::Signature::from_slice(signature)
            .map_err(|_| CryptoError::InvalidSignature)?;

        verifying_key
            .verify(message, &sig)
            .map_err(|_| CryptoError::SignatureVerificationFailed)
    }
}

/// Ed25519 keypair.
pub struct Ed25519KeyPair {
    signing_key: SigningKey,
}

impl Ed25519KeyPair {
    /// Generate random keypair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut rand::thread_rng());
        Self { signing_key }
    }

    /// Create from secret seed (32 bytes).
    pub fn from_seed(seed: &[u8]) -> Result<Self, CryptoError> {
        let mut seed: [u8; 32] = seed.try_into().map_err(|_| CryptoError::InvalidKeyLength {
            expected: 32,
            actual: seed.len(),
        })?;
        let signing_key = SigningKey::from_bytes(&seed);
        seed.zeroize();
        Ok(Self { signing_key })
    }

    /// Parse a PKCS#8 `PrivateKeyInfo` DER structure.
    pub fn from_der(der_bytes: &[u8]) -> Result<Self, CryptoError> {
        let seed = der::strip(der_bytes, &der::ED25519_PRIVATE_PREFIX, 32)
            .ok_or_else(|| CryptoError::UnsupportedDer("expected Ed25519 private key".into()))?;
        Self::from_seed(seed)
    }

    /// Get public key.
    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign a message (deterministic - no RNG needed).
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }

    /// Encode as PKCS#8 DER.
    pub fn to_der(&self) -> Vec<u8> {
        let mut seed = self.signing_key.to_bytes();
        let der_bytes = der::wrap(&der::ED25519_PRIVATE_PREFIX, &seed);
        seed.zeroize();
        der_bytes
    }
}

impl Drop for Ed25519KeyPair {
    fn drop(&mut self) {
        // Zeroize secret key material
        let mut bytes = self.signing_key.to_bytes();
        bytes.zeroize();
    }
}
