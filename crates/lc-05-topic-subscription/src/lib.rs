//! # Topic Subscription Subsystem (LC-05)
//!
//! Consensus topic running hashes and validated mirror-node subscriptions.
//!
//! ## Running Hash
//!
//! Every message submitted to a topic advances a SHA-384 chain:
//!
//! ```text
//! h[n] = SHA-384(header ‖ h[n-1] ‖ topic ‖ consensus time ‖ n ‖ message)
//! ```
//!
//! A subscriber that knows `h[n-1]` can check every message it receives
//! and detects dropped, reordered or altered messages.
//!
//! ## Architecture
//!
//! - **Domain**: [`ConsensusTopicRunningHash`], [`TopicRunningHashState`],
//!   [`ChunkAssembler`] and [`TopicQuery`]. No I/O.
//! - **Ports**: [`TopicSubscriptionApi`] and [`MirrorTransport`].
//! - **Service**: [`TopicSubscriptionService`] runs one task per
//!   subscription; [`SubscriptionHandle`] receives from it.
//! - **Adapters**: [`InMemoryMirror`].

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{InMemoryMirror, MirrorFault};
pub use domain::chunks::ChunkAssembler;
pub use domain::errors::{SubscriptionError, TopicIntegrityError};
pub use domain::message::{ChunkInfo, TopicMessage, TopicMessageChunk, TopicResponse};
pub use domain::query::{TopicQuery, BASE_RECONNECT_DELAY};
pub use domain::running_hash::ConsensusTopicRunningHash;
pub use domain::state::TopicRunningHashState;
pub use ports::inbound::TopicSubscriptionApi;
pub use ports::outbound::{MirrorError, MirrorStream, MirrorTransport};
pub use service::{SubscriptionHandle, TopicSubscriptionService, Unsubscriber};
