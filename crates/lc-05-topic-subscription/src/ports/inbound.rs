//! # Inbound Ports (Driving Ports / API)

use crate::domain::errors::SubscriptionError;
use crate::domain::query::TopicQuery;
use crate::domain::running_hash::ConsensusTopicRunningHash;
use crate::service::SubscriptionHandle;

/// Start validated topic subscriptions.
pub trait TopicSubscriptionApi: Send + Sync {
    /// Stream `query`, checking every message against the chain starting
    /// at `initial`. Must be called inside a Tokio runtime.
    fn subscribe(
        &self,
        query: TopicQuery,
        initial: ConsensusTopicRunningHash,
    ) -> Result<SubscriptionHandle, SubscriptionError>;
}
