//! # Ledger Client
//!
//! Facade over the client subsystems:
//!
//! | Subsystem | Crate | Used for |
//! |-----------|-------|----------|
//! | LC-01 | `lc-01-transaction-id` | fresh transaction ids per payer |
//! | LC-02 | `lc-02-signing-envelope` | freezing and signing bodies |
//! | LC-03 | `lc-03-node-pool` | node selection and health |
//! | LC-04 | `lc-04-execution` | submission, retries, receipt polling |
//! | LC-05 | `lc-05-topic-subscription` | validated topic streams |
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ledger_client::{init_telemetry, Client, ClientConfig, TelemetryConfig};
//!
//! init_telemetry(&TelemetryConfig::from_env())?;
//! let client = Client::from_config(&config, transport)?;
//! let envelope = client.freeze_with_operator(payload, "memo")?;
//! let receipt = client.execute_and_wait(&envelope).await?;
//! ```
//!
//! Sync callers wrap the client in a [`BlockingClient`]; callback-style
//! callers use [`spawn_with_callback`].

pub mod blocking;
pub mod client;
pub mod config;
pub mod errors;

pub use blocking::{spawn_with_callback, BlockingClient};
pub use client::{Client, Operator};
pub use config::{ClientConfig, NodeConfig, OperatorConfig};
pub use errors::ClientError;
pub use ledger_telemetry::{init_telemetry, TelemetryConfig};
