//! # Domain Layer
//!
//! Retry policy, outcome classification and the transaction lifecycle.
//! No I/O.

pub mod errors;
pub mod lifecycle;
pub mod policy;
pub mod verdict;
