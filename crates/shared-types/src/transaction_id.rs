//! # Transaction Identifiers
//!
//! A transaction is identified by the paying account plus the instant from
//! which it becomes valid. The network rejects a second transaction with the
//! same id, so ids must never repeat for a payer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::entities::AccountId;
use crate::errors::ParseError;
use crate::timestamp::{Timestamp, NANOS_PER_SECOND};

/// Identifier of a single transaction: `payer@seconds.nanos`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransactionId {
    payer: AccountId,
    valid_start: Timestamp,
}

impl TransactionId {
    /// Build an id from its parts.
    pub const fn new(payer: AccountId, valid_start: Timestamp) -> Self {
        Self { payer, valid_start }
    }

    /// Account paying the transaction fee.
    pub const fn payer(&self) -> AccountId {
        self.payer
    }

    /// Instant from which the transaction is valid.
    pub const fn valid_start(&self) -> Timestamp {
        self.valid_start
    }

    /// Encode to the binary wire form.
    pub fn to_bytes(&self) -> Vec<u8> {
        // Serializing a plain struct of integers cannot fail.
        bincode::serialize(self).unwrap_or_default()
    }

    /// Decode from the binary wire form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ParseError> {
        let id: Self = bincode::deserialize(bytes).map_err(|e| ParseError::Wire(e.to_string()))?;
        let (seconds, nanos) = (id.valid_start.seconds(), id.valid_start.nanos() as i64);
        if !(0..NANOS_PER_SECOND).contains(&nanos) {
            return Err(ParseError::Wire(format!("nanos out of range: {nanos}")));
        }
        let valid_start = Timestamp::checked_new(seconds, nanos)
            .ok_or_else(|| ParseError::Wire(format!("valid start out of range: {seconds}")))?;
        Ok(Self::new(id.payer, valid_start))
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.payer, self.valid_start)
    }
}

impl FromStr for TransactionId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidTransactionId(s.to_string());

        let (payer, start) = s.split_once('@').ok_or_else(invalid)?;
        let payer: AccountId = payer.parse().map_err(|_| invalid())?;
        let valid_start: Timestamp = start.parse().map_err(|_| invalid())?;
        Ok(Self::new(payer, valid_start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_text_form() {
        let id = TransactionId::new(AccountId::new(0, 0, 2), Timestamp::new(1_700_000_000, 42));
        assert_eq!(id.to_string(), "0.0.2@1700000000.000000042");
        assert_eq!("0.0.2@1700000000.000000042".parse::<TransactionId>().unwrap(), id);
    }

    #[test]
    fn test_reject_malformed_text() {
        for bad in ["0.0.2", "0.0.2@", "@1.0", "0.0@1.0", "0.0.2@1", "0.0.2@1.x"] {
            assert!(bad.parse::<TransactionId>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_wire_rejects_truncated_input() {
        let id = TransactionId::new(AccountId::new(0, 0, 2), Timestamp::new(1, 1));
        let bytes = id.to_bytes();
        assert!(TransactionId::from_bytes(&bytes[..bytes.len() - 1]).is_err());
    }

    /// Overwrite the trailing `seconds`/`nanos` fields of an encoded id.
    fn with_valid_start(id: TransactionId, seconds: i64, nanos: i32) -> Vec<u8> {
        let mut bytes = id.to_bytes();
        let tail = bytes.len() - 12;
        bytes[tail..tail + 8].copy_from_slice(&seconds.to_le_bytes());
        bytes[tail + 8..].copy_from_slice(&nanos.to_le_bytes());
        bytes
    }

    #[test]
    fn test_wire_rejects_out_of_range_valid_start() {
        let id = TransactionId::new(AccountId::new(0, 0, 2), Timestamp::new(1, 1));

        let overflowing = with_valid_start(id, i64::MAX, i32::MAX);
        assert!(matches!(
            TransactionId::from_bytes(&overflowing),
            Err(ParseError::Wire(_))
        ));

        let negative_nanos = with_valid_start(id, 5, -1);
        assert!(matches!(
            TransactionId::from_bytes(&negative_nanos),
            Err(ParseError::Wire(_))
        ));

        let unnormalized = with_valid_start(id, 5, 1_000_000_000);
        assert!(matches!(
            TransactionId::from_bytes(&unnormalized),
            Err(ParseError::Wire(_))
        ));

        let edge = with_valid_start(id, i64::MAX, 999_999_999);
        let decoded = TransactionId::from_bytes(&edge).unwrap();
        assert_eq!(decoded.valid_start(), Timestamp::new(i64::MAX, 999_999_999));
    }

    proptest! {
        #[test]
        fn prop_text_and_wire_forms_round_trip(
            shard in any::<u64>(),
            realm in any::<u64>(),
            num in any::<u64>(),
            seconds in 0i64..=i64::MAX / 2,
            nanos in 0i64..1_000_000_000,
        ) {
            let id = TransactionId::new(
                AccountId::new(shard, realm, num),
                Timestamp::new(seconds, nanos),
            );
            prop_assert_eq!(id.to_string().parse::<TransactionId>().unwrap(), id);
            prop_assert_eq!(TransactionId::from_bytes(&id.to_bytes()).unwrap(), id);
        }
    }
}
