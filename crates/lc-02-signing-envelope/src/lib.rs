//! # Signing Envelope Subsystem (LC-02)
//!
//! Holds a serialized transaction body together with its signatures.
//!
//! ## State Machine
//!
//! ```text
//! [Building] ──freeze──→ [Frozen] ──sign / add_signature──→ [Frozen + signatures]
//!     │                     │
//!  set_body              to_wire ⇄ from_wire
//! ```
//!
//! Once frozen the body bytes never change, so every signature covers
//! exactly the bytes that are later submitted. An envelope can be
//! serialized, handed to another party, deserialized, signed and
//! serialized again without touching its id or body.

pub mod domain;

pub use domain::body::{
    TransactionBody, DEFAULT_MAX_TRANSACTION_FEE, DEFAULT_VALID_DURATION_SECS, MAX_MEMO_BYTES,
};
pub use domain::envelope::{EnvelopeState, SignaturePair, SigningEnvelope};
pub use domain::errors::EnvelopeError;
