//! # Adapters
//!
//! Concrete [`Clock`](crate::ports::outbound::Clock) implementations.

pub mod clock;
