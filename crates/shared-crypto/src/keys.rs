//! # Keys and Signing Capability
//!
//! [`SigningCapability`] is the only thing the envelope needs from a key:
//! an algorithm tag, the public key bytes and a way to sign. Local keys
//! implement it through [`PrivateKey`]; remote signers (HSMs, wallets) can
//! implement it directly.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ecdsa::{Secp256k1KeyPair, Secp256k1PublicKey};
use crate::ed25519::{Ed25519KeyPair, Ed25519PublicKey};
use crate::CryptoError;

/// Signature scheme of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyAlgorithm {
    Ed25519,
    EcdsaSecp256k1,
}

impl fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyAlgorithm::Ed25519 => f.write_str("ed25519"),
            KeyAlgorithm::EcdsaSecp256k1 => f.write_str("ecdsa-secp256k1"),
        }
    }
}

/// Something that can produce signatures for a single public key.
pub trait SigningCapability: Send + Sync {
    /// Scheme of the produced signatures.
    fn algorithm(&self) -> KeyAlgorithm;

    /// Raw public key bytes (32 for Ed25519, 33 compressed for secp256k1).
    fn public_key_bytes(&self) -> Vec<u8>;

    /// Sign `message`.
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, CryptoError>;
}

/// A locally held private key.
pub enum PrivateKey {
    Ed25519(Ed25519KeyPair),
    EcdsaSecp256k1(Secp256k1KeyPair),
}

impl PrivateKey {
    /// Generate a fresh Ed25519 key.
    pub fn generate_ed25519() -> Self {
        PrivateKey::Ed25519(Ed25519KeyPair::generate())
    }

    /// Generate a fresh secp256k1 key.
    pub fn generate_ecdsa() -> Self {
        PrivateKey::EcdsaSecp256k1(Secp256k1KeyPair::generate())
    }

    /// Import raw secret bytes for the given algorithm.
    pub fn from_bytes(algorithm: KeyAlgorithm, bytes: &[u8]) -> Result<Self, CryptoError> {
        match algorithm {
            KeyAlgorithm::Ed25519 => Ed25519KeyPair::from_seed(bytes).map(PrivateKey::Ed25519),
            KeyAlgorithm::EcdsaSecp256k1 => {
                Secp256k1KeyPair::from_bytes(bytes).map(PrivateKey::EcdsaSecp256k1)
            }
        }
    }

    /// Import a PKCS#8 DER key, detecting the algorithm from its header.
    pub fn from_der(der_bytes: &[u8]) -> Result<Self, CryptoError> {
        if let Ok(key) = Ed25519KeyPair::from_der(der_bytes) {
            return Ok(PrivateKey::Ed25519(key));
        }
        if let Ok(key) = Secp256k1KeyPair::from_der(der_bytes) {
            return Ok(PrivateKey::EcdsaSecp256k1(key));
        }
        Err(CryptoError::UnsupportedDer(format!(
            "no supported private key header ({} bytes)",
            der_bytes.len()
        )))
    }

    /// Encode as PKCS#8 DER.
    pub fn to_der(&self) -> Vec<u8> {
        match self {
            PrivateKey::Ed25519(key) => key.to_der(),
            PrivateKey::EcdsaSecp256k1(key) => key.to_der(),
        }
    }

    /// Matching public key.
    pub fn public_key(&self) -> PublicKey {
        match self {
            PrivateKey::Ed25519(key) => PublicKey::Ed25519(key.public_key()),
            PrivateKey::EcdsaSecp256k1(key) => PublicKey::EcdsaSecp256k1(key.public_key()),
        }
    }
}

impl FromStr for PrivateKey {
    type Err = CryptoError;

    /// Parse hex-encoded DER.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PrivateKey::from_der(&hex::decode(s.trim())?)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print secret material.
        f.debug_struct("PrivateKey")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}

impl SigningCapability for PrivateKey {
    fn algorithm(&self) -> KeyAlgorithm {
        self.public_key().algorithm()
    }

    fn public_key_bytes(&self) -> Vec<u8> {
        self.public_key().to_bytes()
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, CryptoError> {
        match self {
            PrivateKey::Ed25519(key) => Ok(key.sign(message).to_vec()),
            PrivateKey::EcdsaSecp256k1(key) => key.sign(message).map(|sig| sig.to_vec()),
        }
    }
}

/// A public key of either supported algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PublicKey {
    Ed25519(Ed25519PublicKey),
    EcdsaSecp256k1(Secp256k1PublicKey),
}

impl PublicKey {
    /// Import raw public key bytes for the given algorithm.
    pub fn from_bytes(algorithm: KeyAlgorithm, bytes: &[u8]) -> Result<Self, CryptoError> {
        match algorithm {
            KeyAlgorithm::Ed25519 => Ed25519PublicKey::from_bytes(bytes).map(PublicKey::Ed25519),
            KeyAlgorithm::EcdsaSecp256k1 => {
                Secp256k1PublicKey::from_bytes(bytes).map(PublicKey::EcdsaSecp256k1)
            }
        }
    }

    /// Import a `SubjectPublicKeyInfo` DER key, detecting the algorithm.
    pub fn from_der(der_bytes: &[u8]) -> Result<Self, CryptoError> {
        if let Ok(key) = Ed25519PublicKey::from_der(der_bytes) {
            return Ok(PublicKey::Ed25519(key));
        }
        if let Ok(key) = Secp256k1PublicKey::from_der(der_bytes) {
            return Ok(PublicKey::EcdsaSecp256k1(key));
        }
        Err(CryptoError::UnsupportedDer(format!(
            "no supported public key header ({} bytes)",
            der_bytes.len()
        )))
    }

    pub fn algorithm(&self) -> KeyAlgorithm {
        match self {
            PublicKey::Ed25519(_) => KeyAlgorithm::Ed25519,
            PublicKey::EcdsaSecp256k1(_) => KeyAlgorithm::EcdsaSecp256k1,
        }
    }

    /// Raw key bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            PublicKey::Ed25519(key) => key.as_bytes().to_vec(),
            PublicKey::EcdsaSecp256k1(key) => key.as_bytes().to_vec(),
        }
    }

    pub fn to_der(&self) -> Vec<u8> {
        match self {
            PublicKey::Ed25519(key) => key.to_der(),
            PublicKey::EcdsaSecp256k1(key) => key.to_der(),
        }
    }

    /// Verify `signature` over `message` with this key's scheme.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
        match self {
            PublicKey::Ed25519(key) => key.verify(message, signature),
            PublicKey::EcdsaSecp256k1(key) => key.verify(message, signature),
        }
    }
}

impl fmt::Display for PublicKey {
    /// Hex-encoded DER.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.to_der()))
    }
}

impl FromStr for PublicKey {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PublicKey::from_der(&hex::decode(s.trim())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signing_capability_ed25519() {
        let key = PrivateKey::generate_ed25519();
        let sig = key.sign(b"body").unwrap();

        assert_eq!(key.algorithm(), KeyAlgorithm::Ed25519);
        assert_eq!(key.public_key_bytes().len(), 32);
        assert_eq!(sig.len(), 64);

        let public = PublicKey::from_bytes(key.algorithm(), &key.public_key_bytes()).unwrap();
        assert!(public.verify(b"body", &sig).is_ok());
    }

    #[test]
    fn test_signing_capability_ecdsa() {
        let key = PrivateKey::generate_ecdsa();
        let sig = key.sign(b"body").unwrap();

        assert_eq!(key.algorithm(), KeyAlgorithm::EcdsaSecp256k1);
        assert_eq!(key.public_key_bytes().len(), 33);

        let public = PublicKey::from_bytes(key.algorithm(), &key.public_key_bytes()).unwrap();
        assert!(public.verify(b"body", &sig).is_ok());
        assert!(public.verify(b"other", &sig).is_err());
    }

    #[test]
    fn test_der_detects_algorithm() {
        for key in [PrivateKey::generate_ed25519(), PrivateKey::generate_ecdsa()] {
            let text = hex::encode(key.to_der());
            let parsed: PrivateKey = text.parse().unwrap();
            assert_eq!(parsed.public_key(), key.public_key());

            let public: PublicKey = key.public_key().to_string().parse().unwrap();
            assert_eq!(public, key.public_key());
        }
    }

    #[test]
    fn test_garbage_der_rejected() {
        assert!(matches!(
            PrivateKey::from_der(&[0x30, 0x00]),
            Err(CryptoError::UnsupportedDer(_))
        ));
        assert!(matches!(
            "zz".parse::<PublicKey>(),
            Err(CryptoError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_debug_hides_secret() {
        let key = PrivateKey::from_bytes(KeyAlgorithm::Ed25519, &[9u8; 32]).unwrap();
        let rendered = format!("{key:?}");
        assert!(!rendered.contains(&hex::encode([9u8; 32])));
    }
}
