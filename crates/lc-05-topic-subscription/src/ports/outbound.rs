//! # Outbound Ports (Driven Ports / SPI)
//!
//! The mirror node's server-streaming topic call.

use async_trait::async_trait;
use std::pin::Pin;
use thiserror::Error;
use tokio_stream::Stream;

use crate::domain::message::TopicResponse;
use crate::domain::query::TopicQuery;

/// Failure of a mirror stream or of opening one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MirrorError {
    /// The topic is not known to the mirror yet.
    #[error("Topic not found: {0}")]
    NotFound(String),

    #[error("Mirror unavailable: {0}")]
    Unavailable(String),

    #[error("Mirror resource exhausted: {0}")]
    ResourceExhausted(String),

    /// The connection was reset mid-stream.
    #[error("Stream reset: {0}")]
    StreamReset(String),

    #[error("Mirror error: {0}")]
    Other(String),
}

impl MirrorError {
    /// Whether reconnecting may help.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, MirrorError::Other(_))
    }
}

/// Ordered topic responses; ends when the query is exhausted.
pub type MirrorStream = Pin<Box<dyn Stream<Item = Result<TopicResponse, MirrorError>> + Send>>;

/// Mirror node transport.
#[async_trait]
pub trait MirrorTransport: Send + Sync {
    /// Open a stream for `query`. Dropping the stream releases the call.
    async fn subscribe_topic(&self, query: &TopicQuery) -> Result<MirrorStream, MirrorError>;
}
