//! # Node Pool
//!
//! Fixed membership decided at construction; only health changes later.
//! Endpoints are handed out as shared read-only references and health sits
//! behind a read-mostly lock, so one pool can be shared through an `Arc`.

use parking_lot::RwLock;
use rand::seq::SliceRandom;
use shared_types::AccountId;
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, warn};

use super::config::NodeHealthConfig;
use super::endpoint::NodeEndpoint;
use super::errors::PoolError;
use super::health::NodeHealth;

/// The nodes a client may talk to.
pub struct NodePool {
    nodes: Vec<NodeEndpoint>,
    index: HashMap<AccountId, usize>,
    health: RwLock<Vec<NodeHealth>>,
    config: NodeHealthConfig,
}

impl NodePool {
    /// Build a pool with default health settings.
    pub fn new(nodes: Vec<NodeEndpoint>) -> Result<Self, PoolError> {
        Self::with_config(nodes, NodeHealthConfig::default())
    }

    pub fn with_config(
        nodes: Vec<NodeEndpoint>,
        config: NodeHealthConfig,
    ) -> Result<Self, PoolError> {
        config.validate()?;

        let mut index = HashMap::with_capacity(nodes.len());
        for (position, node) in nodes.iter().enumerate() {
            if index.insert(node.account_id(), position).is_some() {
                return Err(PoolError::DuplicateAccount(node.account_id()));
            }
        }

        let health = RwLock::new(vec![NodeHealth::new(&config); nodes.len()]);
        Ok(Self {
            nodes,
            index,
            health,
            config,
        })
    }

    /// Build from `(address, account)` pairs such as `("127.0.0.1:50211", 0.0.3)`.
    pub fn from_addresses<'a>(
        entries: impl IntoIterator<Item = (&'a str, AccountId)>,
    ) -> Result<Self, PoolError> {
        let nodes = entries
            .into_iter()
            .map(|(address, account)| NodeEndpoint::from_address(address, account))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(nodes)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All endpoints in construction order.
    pub fn nodes(&self) -> &[NodeEndpoint] {
        &self.nodes
    }

    pub fn config(&self) -> &NodeHealthConfig {
        &self.config
    }

    pub fn by_account(&self, account_id: AccountId) -> Option<&NodeEndpoint> {
        self.index.get(&account_id).map(|&i| &self.nodes[i])
    }

    /// First endpoint on `host`, in construction order.
    pub fn by_host(&self, host: &str) -> Option<&NodeEndpoint> {
        self.nodes.iter().find(|node| node.host() == host)
    }

    /// Every endpoint on `host`, in construction order.
    pub fn all_by_host(&self, host: &str) -> Vec<&NodeEndpoint> {
        self.nodes.iter().filter(|node| node.host() == host).collect()
    }

    /// Uniformly random healthy node; any node when none is healthy.
    pub fn random(&self) -> Result<&NodeEndpoint, PoolError> {
        self.random_excluding(&[])
    }

    /// Like [`random`](Self::random), never returning an excluded node.
    pub fn random_excluding(&self, excluded: &[AccountId]) -> Result<&NodeEndpoint, PoolError> {
        self.random_excluding_at(excluded, Instant::now())
    }

    pub(crate) fn random_excluding_at(
        &self,
        excluded: &[AccountId],
        now: Instant,
    ) -> Result<&NodeEndpoint, PoolError> {
        if self.nodes.is_empty() {
            return Err(PoolError::Empty);
        }

        let eligible: Vec<usize> = (0..self.nodes.len())
            .filter(|&i| !excluded.contains(&self.nodes[i].account_id()))
            .collect();
        if eligible.is_empty() {
            return Err(PoolError::AllExcluded(self.nodes.len()));
        }

        let healthy: Vec<usize> = {
            let health = self.health.read();
            eligible
                .iter()
                .copied()
                .filter(|&i| health[i].is_healthy_at(now))
                .collect()
        };

        let candidates = if healthy.is_empty() {
            debug!(eligible = eligible.len(), "No healthy node; selecting from all eligible");
            &eligible
        } else {
            &healthy
        };

        let chosen = candidates
            .choose(&mut rand::thread_rng())
            .copied()
            .ok_or(PoolError::Empty)?;
        Ok(&self.nodes[chosen])
    }

    pub fn is_healthy(&self, account_id: AccountId) -> Result<bool, PoolError> {
        self.is_healthy_at(account_id, Instant::now())
    }

    pub(crate) fn is_healthy_at(
        &self,
        account_id: AccountId,
        now: Instant,
    ) -> Result<bool, PoolError> {
        let i = self.position(account_id)?;
        Ok(self.health.read()[i].is_healthy_at(now))
    }

    /// Health record snapshot.
    pub fn health(&self, account_id: AccountId) -> Result<NodeHealth, PoolError> {
        let i = self.position(account_id)?;
        Ok(self.health.read()[i])
    }

    /// Take a node out of selection for its current backoff, then double it.
    pub fn mark_unhealthy(&self, account_id: AccountId) -> Result<(), PoolError> {
        self.mark_unhealthy_at(account_id, Instant::now())
    }

    pub(crate) fn mark_unhealthy_at(
        &self,
        account_id: AccountId,
        now: Instant,
    ) -> Result<(), PoolError> {
        let i = self.position(account_id)?;
        let mut health = self.health.write();
        health[i].record_failure(&self.config, now);
        warn!(
            node = %account_id,
            failures = health[i].failures(),
            next_backoff_ms = health[i].current_backoff().as_millis() as u64,
            "Node marked unhealthy"
        );
        Ok(())
    }

    /// Record a successful exchange; halves the node's backoff.
    pub fn mark_healthy(&self, account_id: AccountId) -> Result<(), PoolError> {
        let i = self.position(account_id)?;
        self.health.write()[i].record_success(&self.config);
        Ok(())
    }

    fn position(&self, account_id: AccountId) -> Result<usize, PoolError> {
        self.index
            .get(&account_id)
            .copied()
            .ok_or(PoolError::UnknownNode(account_id))
    }
}

impl std::fmt::Debug for NodePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodePool")
            .field("nodes", &self.nodes)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
