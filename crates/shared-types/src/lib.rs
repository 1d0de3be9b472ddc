//! # Shared Types Crate
//!
//! Ledger value types used by every subsystem of the client: entity ids,
//! timestamps, transaction ids, response codes, receipts and records.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: all cross-crate ledger types live here.
//! - **Immutable values**: every type is `Copy` or cheaply clonable and has
//!   no interior mutability.
//! - **Exact text forms**: `Display` and `FromStr` round-trip.

pub mod entities;
pub mod errors;
pub mod receipt;
pub mod status;
pub mod timestamp;
pub mod transaction_id;

pub use entities::*;
pub use errors::*;
pub use receipt::{TransactionReceipt, TransactionRecord};
pub use status::Status;
pub use timestamp::Timestamp;
pub use transaction_id::TransactionId;
