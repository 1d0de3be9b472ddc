//! # Adapters Layer (Hexagonal Architecture)
//!
//! In-process implementation of the node transport port.

mod scripted;

pub use scripted::{ScriptedCall, ScriptedTransport};
