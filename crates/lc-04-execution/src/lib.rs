//! # Execution Subsystem (LC-04)
//!
//! Multi-node submission with precheck interpretation, retry and backoff,
//! plus receipt and record polling.
//!
//! ## Architecture
//!
//! - **Domain**: [`RetryPolicy`], response classification, the transaction
//!   lifecycle and error types. Pure.
//! - **Ports**: [`Executable`] (what can be run) and [`NodeTransport`]
//!   (how a node is reached).
//! - **Service**: [`ExecutionEngine`] and [`ReceiptPoller`].
//! - **Adapters**: [`ScriptedTransport`] for tests and offline use.
//!
//! ## Attempt Outcomes
//!
//! | Answer | Action |
//! |--------|--------|
//! | `OK` / `SUCCESS` | return |
//! | `BUSY`, `PLATFORM_NOT_ACTIVE`, `PLATFORM_TRANSACTION_NOT_CREATED` | exclude node, back off, retry |
//! | receipt pending (`UNKNOWN`, `RECEIPT_NOT_FOUND`, ...) | back off, poll again |
//! | node unreachable | mark node unhealthy, retry |
//! | anything else | fail |

pub mod adapters;
pub mod cancellation;
pub mod domain;
pub mod poller;
pub mod ports;
pub mod requests;
pub mod service;

pub use adapters::{ScriptedCall, ScriptedTransport};
pub use cancellation::CancellationToken;
pub use domain::errors::{ExecutionError, TimeoutReason};
pub use domain::lifecycle::TransactionLifecycle;
pub use domain::policy::{RetryPolicy, MAX_POLICY_DURATION};
pub use domain::verdict::{RetryReason, Verdict};
pub use poller::ReceiptPoller;
pub use ports::inbound::{Executable, RequestKind};
pub use ports::outbound::{NodeTransport, QueryAnswer, TransportError};
pub use requests::{ReceiptQuery, RecordQuery, TransactionResponse, TransactionSubmission};
pub use service::ExecutionEngine;
