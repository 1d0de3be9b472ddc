//! # Client Configuration
//!
//! A serde struct the caller fills from whatever source it likes. Durations
//! are human-readable strings (`"250ms"`, `"8s"`).
//!
//! ```json
//! {
//!   "nodes": [
//!     { "address": "127.0.0.1:50211", "account_id": { "shard": 0, "realm": 0, "num": 3 } }
//!   ],
//!   "operator": { "account_id": { "shard": 0, "realm": 0, "num": 2 }, "private_key": "302e..." },
//!   "retry": { "max_attempts": 5, "initial_backoff": "250ms" },
//!   "valid_start_offset": "10s"
//! }
//! ```

use lc_01_transaction_id::DEFAULT_VALID_START_OFFSET;
use lc_03_node_pool::{NodeEndpoint, NodeHealthConfig, NodePool};
use lc_04_execution::RetryPolicy;
use serde::{Deserialize, Serialize};
use shared_crypto::PrivateKey;
use shared_types::AccountId;
use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use crate::errors::ClientError;

/// Everything needed to build a [`Client`](crate::Client).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Consensus nodes to submit to
    pub nodes: Vec<NodeConfig>,
    /// Default payer and signer
    pub operator: Option<OperatorConfig>,
    /// Default retry policy for executions and receipt polling
    pub retry: RetryPolicy,
    /// Node readmission backoff
    pub node_health: NodeHealthConfig,
    /// How far before "now" generated transaction ids start
    #[serde(with = "humantime_serde")]
    pub valid_start_offset: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            operator: None,
            retry: RetryPolicy::default(),
            node_health: NodeHealthConfig::default(),
            valid_start_offset: DEFAULT_VALID_START_OFFSET,
        }
    }
}

/// One consensus node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// `host:port`
    pub address: String,
    /// Account the node is paid through
    pub account_id: AccountId,
}

/// Payer account and its key.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorConfig {
    pub account_id: AccountId,
    /// Hex-encoded DER private key (Ed25519 or secp256k1)
    pub private_key: String,
}

impl fmt::Debug for OperatorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorConfig")
            .field("account_id", &self.account_id)
            .finish_non_exhaustive()
    }
}

impl ClientConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.nodes.is_empty() {
            return Err(ClientError::Config("at least one node is required".into()));
        }

        let mut accounts = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !accounts.insert(node.account_id) {
                return Err(ClientError::Config(format!(
                    "node account {} listed twice",
                    node.account_id
                )));
            }
            NodeEndpoint::from_address(&node.address, node.account_id)
                .map_err(|e| ClientError::Config(format!("node {}: {e}", node.account_id)))?;
        }

        self.retry
            .validate()
            .map_err(|e| ClientError::Config(e.to_string()))?;
        self.node_health
            .validate()
            .map_err(|e| ClientError::Config(e.to_string()))?;

        if let Some(operator) = &self.operator {
            operator.key()?;
        }
        Ok(())
    }

    /// Build the node pool described by `nodes` and `node_health`.
    pub fn build_pool(&self) -> Result<NodePool, ClientError> {
        let endpoints = self
            .nodes
            .iter()
            .map(|node| NodeEndpoint::from_address(&node.address, node.account_id))
            .collect::<Result<Vec<_>, _>>()
            .map_err(lc_03_node_pool::PoolError::from)?;
        Ok(NodePool::with_config(endpoints, self.node_health)?)
    }
}

impl OperatorConfig {
    /// Decode the private key.
    pub fn key(&self) -> Result<PrivateKey, ClientError> {
        self.private_key.parse::<PrivateKey>().map_err(|e| {
            ClientError::Config(format!("operator {} key: {e}", self.account_id))
        })
    }
}
