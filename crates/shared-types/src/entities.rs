//! # Entity Identifiers
//!
//! Every addressable object on the ledger (accounts, topics, files,
//! contracts) is named by a `shard.realm.num` triple.
//!
//! ## Design
//!
//! - [`EntityId`] is the shared shape with total ordering by
//!   `(shard, realm, num)`.
//! - Each specialization is its own newtype so an `AccountId` can never be
//!   passed where a `TopicId` is expected.
//! - Text form is `"{shard}.{realm}.{num}"`; parsing rejects negative,
//!   empty and non-numeric components.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::ParseError;

/// Shared `shard.realm.num` shape for all ledger entities.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct EntityId {
    /// Shard number.
    pub shard: u64,
    /// Realm number within the shard.
    pub realm: u64,
    /// Entity number within the realm.
    pub num: u64,
}

impl EntityId {
    /// Create an entity id from its three components.
    pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
        Self { shard, realm, num }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
    }
}

impl FromStr for EntityId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('.');
        let (Some(shard), Some(realm), Some(num), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(ParseError::InvalidEntityId(s.to_string()));
        };

        Ok(Self {
            shard: parse_component(s, shard)?,
            realm: parse_component(s, realm)?,
            num: parse_component(s, num)?,
        })
    }
}

/// Parse a single id component, accepting only ASCII digits.
///
/// `u64::from_str` alone would accept a leading `+`.
fn parse_component(input: &str, component: &str) -> Result<u64, ParseError> {
    if component.is_empty() || !component.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::InvalidEntityId(input.to_string()));
    }
    component
        .parse()
        .map_err(|_| ParseError::InvalidEntityId(input.to_string()))
}

/// Declares a distinct id type sharing the [`EntityId`] shape.
macro_rules! entity_id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub EntityId);

        impl $name {
            /// Create an id from its three components.
            pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
                Self(EntityId::new(shard, realm, num))
            }

            /// The untyped `shard.realm.num` triple.
            pub const fn entity(&self) -> EntityId {
                self.0
            }

            /// Shard number.
            pub const fn shard(&self) -> u64 {
                self.0.shard
            }

            /// Realm number.
            pub const fn realm(&self) -> u64 {
                self.0.realm
            }

            /// Entity number.
            pub const fn num(&self) -> u64 {
                self.0.num
            }
        }

        impl From<EntityId> for $name {
            fn from(id: EntityId) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = ParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                EntityId::from_str(s).map(Self)
            }
        }
    };
}

entity_id_type!(
    /// A cryptocurrency account. Also names the account a network node is
    /// paid through, which is how nodes are addressed.
    AccountId
);

entity_id_type!(
    /// A consensus topic.
    TopicId
);

entity_id_type!(
    /// A file stored on the ledger.
    FileId
);

entity_id_type!(
    /// A smart contract instance.
    ContractId
);
