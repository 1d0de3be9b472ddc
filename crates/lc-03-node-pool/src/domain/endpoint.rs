//! # Node Endpoints

use serde::{Deserialize, Serialize};
use shared_types::{AccountId, ParseError};
use std::fmt;

/// A network node: where to reach it and which account it is paid through.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeEndpoint {
    host: String,
    port: u16,
    account_id: AccountId,
}

impl NodeEndpoint {
    pub fn new(host: impl Into<String>, port: u16, account_id: AccountId) -> Self {
        Self {
            host: host.into(),
            port,
            account_id,
        }
    }

    /// Parse `"host:port"` (IPv6 hosts in brackets, `"[::1]:50211"`).
    pub fn from_address(address: &str, account_id: AccountId) -> Result<Self, ParseError> {
        let invalid = || ParseError::InvalidAddress(address.to_string());

        let (host, port) = address.rsplit_once(':').ok_or_else(invalid)?;
        if host.is_empty() {
            return Err(invalid());
        }
        let port: u16 = port.parse().map_err(|_| invalid())?;
        Ok(Self::new(host, port, account_id))
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    /// `host:port`
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Display for NodeEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}:{}", self.account_id, self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_round_trip() {
        let node = NodeEndpoint::from_address("0.testnet.example.com:50211", AccountId::new(0, 0, 3))
            .unwrap();
        assert_eq!(node.host(), "0.testnet.example.com");
        assert_eq!(node.port(), 50211);
        assert_eq!(node.address(), "0.testnet.example.com:50211");
        assert_eq!(node.to_string(), "0.0.3@0.testnet.example.com:50211");
    }

    #[test]
    fn test_ipv6_host() {
        let node = NodeEndpoint::from_address("[::1]:50211", AccountId::new(0, 0, 3)).unwrap();
        assert_eq!(node.host(), "[::1]");
        assert_eq!(node.port(), 50211);
    }

    #[test]
    fn test_rejects_bad_addresses() {
        for bad in ["localhost", ":50211", "host:", "host:99999", "host:port"] {
            assert!(
                NodeEndpoint::from_address(bad, AccountId::new(0, 0, 3)).is_err(),
                "accepted {bad:?}"
            );
        }
    }
}
