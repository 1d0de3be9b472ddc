//! # Domain Layer
//!
//! Id generation logic. The only I/O is the injected clock.

pub mod generator;
