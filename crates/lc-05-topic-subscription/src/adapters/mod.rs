//! # Adapters Layer
//!
//! In-process mirror node used by tests and local tooling.

mod memory;

pub use memory::{InMemoryMirror, MirrorFault};
