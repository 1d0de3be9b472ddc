//! # Domain Layer
//!
//! Envelope state and body encoding. No I/O.

pub mod body;
pub mod envelope;
pub mod errors;
