//! # Client Errors

use lc_02_signing_envelope::EnvelopeError;
use lc_03_node_pool::PoolError;
use lc_04_execution::ExecutionError;
use lc_05_topic_subscription::SubscriptionError;
use shared_crypto::CryptoError;
use thiserror::Error;

/// Errors surfaced by the client facade.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    /// The configuration is incomplete or inconsistent.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The operation needs a payer account and key.
    #[error("No operator configured")]
    NoOperator,

    /// Topic subscriptions need a mirror transport.
    #[error("No mirror node configured")]
    NoMirror,

    #[error(transparent)]
    Pool(#[from] PoolError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error(transparent)]
    Subscription(#[from] SubscriptionError),

    /// The blocking runtime could not be started.
    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl ClientError {
    /// The execution error underneath, if any.
    pub fn as_execution(&self) -> Option<&ExecutionError> {
        match self {
            ClientError::Execution(err) => Some(err),
            _ => None,
        }
    }
}
