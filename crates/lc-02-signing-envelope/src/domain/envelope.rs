//! # Signing Envelope
//!
//! Body bytes plus an ordered list of signatures, at most one per public
//! key. Signing a frozen envelope again with the same key replaces that
//! key's signature in place.

use serde::{Deserialize, Serialize};
use shared_crypto::{sha384, KeyAlgorithm, PublicKey, Sha384Hash, SigningCapability};
use shared_types::TransactionId;
use std::fmt;
use tracing::debug;

use super::body::TransactionBody;
use super::errors::EnvelopeError;

/// Lifecycle of an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnvelopeState {
    /// Body may still change; no signatures yet.
    Building,
    /// Body bytes are final.
    Frozen,
}

/// One signature over the body bytes.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignaturePair {
    pub public_key: Vec<u8>,
    pub algorithm: KeyAlgorithm,
    pub signature: Vec<u8>,
}

impl fmt::Debug for SignaturePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignaturePair")
            .field("public_key", &hex::encode(&self.public_key))
            .field("algorithm", &self.algorithm)
            .field("signature", &hex::encode(&self.signature))
            .finish()
    }
}

/// Serialized shape of a frozen envelope.
#[derive(Serialize, Deserialize)]
struct WireEnvelope {
    body_bytes: Vec<u8>,
    signatures: Vec<SignaturePair>,
}

/// A transaction body and the signatures collected over it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningEnvelope {
    body: TransactionBody,
    body_bytes: Vec<u8>,
    state: EnvelopeState,
    signatures: Vec<SignaturePair>,
}

impl SigningEnvelope {
    /// Start building an envelope around `body`.
    pub fn new(body: &TransactionBody) -> Result<Self, EnvelopeError> {
        body.validate()?;
        Ok(Self {
            body: body.clone(),
            body_bytes: body.to_bytes()?,
            state: EnvelopeState::Building,
            signatures: Vec::new(),
        })
    }

    /// Replace the body. Only allowed before [`freeze`](Self::freeze).
    pub fn set_body(&mut self, body: &TransactionBody) -> Result<(), EnvelopeError> {
        if self.state == EnvelopeState::Frozen {
            return Err(EnvelopeError::AlreadyFrozen);
        }
        body.validate()?;
        self.body_bytes = body.to_bytes()?;
        self.body = body.clone();
        Ok(())
    }

    /// Lock the body bytes. Idempotent.
    pub fn freeze(&mut self) -> &mut Self {
        if self.state == EnvelopeState::Building {
            debug!(transaction_id = %self.body.transaction_id, "Envelope frozen");
            self.state = EnvelopeState::Frozen;
        }
        self
    }

    /// Sign the body bytes with `signer`.
    pub fn sign(&mut self, signer: &dyn SigningCapability) -> Result<&mut Self, EnvelopeError> {
        if self.state != EnvelopeState::Frozen {
            return Err(EnvelopeError::NotFrozen);
        }
        let signature = signer.sign(&self.body_bytes)?;
        self.attach(SignaturePair {
            public_key: signer.public_key_bytes(),
            algorithm: signer.algorithm(),
            signature,
        });
        Ok(self)
    }

    /// Attach a signature produced elsewhere over [`body_bytes`](Self::body_bytes).
    pub fn add_signature(&mut self, pair: SignaturePair) -> Result<&mut Self, EnvelopeError> {
        if self.state != EnvelopeState::Frozen {
            return Err(EnvelopeError::NotFrozen);
        }
        self.attach(pair);
        Ok(self)
    }

    fn attach(&mut self, pair: SignaturePair) {
        match self
            .signatures
            .iter_mut()
            .find(|existing| existing.public_key == pair.public_key)
        {
            Some(existing) => *existing = pair,
            None => self.signatures.push(pair),
        }
        debug!(
            transaction_id = %self.body.transaction_id,
            signatures = self.signatures.len(),
            "Signature attached"
        );
    }

    /// Check every attached signature against the body bytes.
    pub fn verify_signatures(&self) -> Result<(), EnvelopeError> {
        for pair in &self.signatures {
            let invalid = |reason: String| EnvelopeError::InvalidSignature {
                public_key: hex::encode(&pair.public_key),
                reason,
            };
            let key = PublicKey::from_bytes(pair.algorithm, &pair.public_key)
                .map_err(|e| invalid(e.to_string()))?;
            key.verify(&self.body_bytes, &pair.signature)
                .map_err(|e| invalid(e.to_string()))?;
        }
        Ok(())
    }

    /// Frozen and signed at least once.
    pub fn ensure_executable(&self) -> Result<(), EnvelopeError> {
        if self.state != EnvelopeState::Frozen {
            return Err(EnvelopeError::NotFrozen);
        }
        if self.signatures.is_empty() {
            return Err(EnvelopeError::NoSignatures);
        }
        Ok(())
    }

    /// Serialize a frozen envelope for submission or hand-off.
    pub fn to_wire(&self) -> Result<Vec<u8>, EnvelopeError> {
        if self.state != EnvelopeState::Frozen {
            return Err(EnvelopeError::NotFrozen);
        }
        let wire = WireEnvelope {
            body_bytes: self.body_bytes.clone(),
            signatures: self.signatures.clone(),
        };
        bincode::serialize(&wire).map_err(|e| EnvelopeError::Encoding(e.to_string()))
    }

    /// Rebuild a frozen envelope from [`to_wire`](Self::to_wire) output.
    pub fn from_wire(bytes: &[u8]) -> Result<Self, EnvelopeError> {
        let wire: WireEnvelope =
            bincode::deserialize(bytes).map_err(|e| EnvelopeError::Decoding(e.to_string()))?;
        let body = TransactionBody::from_bytes(&wire.body_bytes)?;
        Ok(Self {
            body,
            body_bytes: wire.body_bytes,
            state: EnvelopeState::Frozen,
            signatures: wire.signatures,
        })
    }

    /// SHA-384 of the wire bytes, as the network reports it in records.
    pub fn transaction_hash(&self) -> Result<Sha384Hash, EnvelopeError> {
        Ok(sha384(&self.to_wire()?))
    }

    pub fn transaction_id(&self) -> TransactionId {
        self.body.transaction_id
    }

    pub fn body(&self) -> &TransactionBody {
        &self.body
    }

    /// The exact bytes every signature covers.
    pub fn body_bytes(&self) -> &[u8] {
        &self.body_bytes
    }

    pub fn state(&self) -> EnvelopeState {
        self.state
    }

    pub fn is_frozen(&self) -> bool {
        self.state == EnvelopeState::Frozen
    }

    pub fn signatures(&self) -> &[SignaturePair] {
        &self.signatures
    }
}
