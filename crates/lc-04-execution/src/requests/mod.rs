//! # Requests
//!
//! [`Executable`](crate::ports::inbound::Executable) implementations for
//! transaction submission and receipt/record queries.

pub mod receipt;
pub mod record;
pub mod submission;

pub use receipt::ReceiptQuery;
pub use record::RecordQuery;
pub use submission::{TransactionResponse, TransactionSubmission};
