//! # Domain Layer
//!
//! Running-hash chain, chunk reassembly and query parameters. No I/O.

pub mod chunks;
pub mod errors;
pub mod message;
pub mod query;
pub mod running_hash;
pub mod state;
