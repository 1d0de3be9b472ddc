//! # ECDSA Signatures (secp256k1)
//!
//! ECDSA over secp256k1, signing the Keccak-256 digest of the message.
//!
//! ## Security Properties
//!
//! - RFC 6979 deterministic nonces (no RNG dependency for signing)
//! - Low-S normalization
//! - Signatures are 64 bytes, `r || s`

use crate::der;
use crate::hashing::keccak256;
use crate::CryptoError;
use k256::ecdsa::{
    signature::hazmat::{PrehashSigner, PrehashVerifier},
    Signature, SigningKey, VerifyingKey,
};
use zeroize::Zeroize;

/// Compressed secp256k1 public key (33 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Secp256k1PublicKey([u8; 33]);

impl Secp256k1PublicKey {
    /// Create from SEC1 bytes, compressed (33) or uncompressed (65).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let verifying_key =
            VerifyingKey::from_sec1_bytes(bytes).map_err(|_| CryptoError::InvalidPublicKey)?;
        Ok(Self::from_verifying_key(&verifying_key))
    }

    /// Parse a `SubjectPublicKeyInfo` DER structure holding a compressed point.
    pub fn from_der(der_bytes: &[u8]) -> Result<Self, CryptoError> {
        let raw = der::strip(der_bytes, &der::SECP256K1_PUBLIC_PREFIX, 33).ok_or_else(|| {
            CryptoError::UnsupportedDer("expected secp256k1 public key".into())
        })?;
        Self::from_bytes(raw)
    }

    fn from_verifying_key(verifying_key: &VerifyingKey) -> Self {
        let point = verifying_key.to_encoded_point(true);
        let mut bytes = [0u8; 33];
        bytes.copy_from_slice(point.as_bytes());
        Self(bytes)
    }

    /// Get raw compressed bytes.
    pub fn as_bytes(&self) -> &[u8; 33] {
        &self.0
    }

    /// Encode as `SubjectPublicKeyInfo` DER.
    pub fn to_der(&self) -> Vec<u8> {
        der::wrap(&der::SECP256K1_PUBLIC_PREFIX, &self.0)
    }

    /// Verify an `r || s` signature over the Keccak-256 digest of `message`.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
        let verifying_key =
            VerifyingKey::from_sec1_bytes(&self.0).map_err(|_| CryptoError::InvalidPublicKey)?;

        let sig = Signature::from_slice(signature).map_err(|_| CryptoError::InvalidSignature)?;

        verifying_key
            .verify_prehash(&keccak256(message), &sig)
            .map_err(|_| CryptoError::SignatureVerificationFailed)
    }
}

/// secp256k1 ECDSA keypair.
pub struct Secp256k1KeyPair {
    signing_key: SigningKey,
}

impl Secp256k1KeyPair {
    /// Generate random keypair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::random(&mut rand::thread_rng());
        Self { signing_key }
    }

    /// Create from secret scalar bytes (32 bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != 32 {
            return Err(CryptoError::InvalidKeyLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let signing_key =
            SigningKey::from_slice(bytes).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self { signing_key })
    }

    /// Parse a PKCS#8 `PrivateKeyInfo` DER structure.
    pub fn from_der(der_bytes: &[u8]) -> Result<Self, CryptoError> {
        let raw = der::strip(der_bytes, &der::SECP256K1_PRIVATE_PREFIX, 32).ok_or_else(|| {
            CryptoError::UnsupportedDer("expected secp256k1 private key".into())
        })?;
        Self::from_bytes(raw)
    }

    /// Get public key (compressed, 33 bytes).
    pub fn public_key(&self) -> Secp256k1PublicKey {
        Secp256k1PublicKey::from_verifying_key(self.signing_key.verifying_key())
    }

    /// Sign the Keccak-256 digest of `message` (deterministic RFC 6979).
    pub fn sign(&self, message: &[u8]) -> Result<[u8; 64], CryptoError> {
        let sig: Signature = self
            .signing_key
            .sign_prehash(&keccak256(message))
            .map_err(|_| CryptoError::InvalidSignature)?;
        let sig = sig.normalize_s().unwrap_or(sig);
        Ok(sig.to_bytes().into())
    }

    /// Encode as PKCS#8 DER.
    pub fn to_der(&self) -> Vec<u8> {
        let mut scalar: [u8; 32] = self.signing_key.to_bytes().into();
        let der_bytes = der::wrap(&der::SECP256K1_PRIVATE_PREFIX, &scalar);
        scalar.zeroize();
        der_bytes
    }
}

impl Drop for Secp256k1KeyPair {
    fn drop(&mut self) {
        // Zeroize secret key material
        let mut bytes: [u8; 32] = self.signing_key.to_bytes().into();
        bytes.zeroize();
    }
}
