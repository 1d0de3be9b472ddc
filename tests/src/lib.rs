//! # Ledger SDK Test Suite
//!
//! Unified test crate for scenarios that span several subsystems.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/integration/
//! │   ├── execution_flows.rs   # id → envelope → submit → receipt
//! │   └── topic_flows.rs       # mirror stream → running hash → subscriber
//! └── benches/
//!     └── client_benchmarks.rs # hashing, id generation, signing
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p lc-tests
//! cargo test -p lc-tests integration::topic_flows
//!
//! # Benchmarks
//! cargo bench -p lc-tests
//! ```

pub mod integration;
