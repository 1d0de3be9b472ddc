//! # Response Codes
//!
//! Every node answer (precheck or receipt) carries a [`Status`]. The engine
//! only needs to distinguish a handful of codes; the rest are kept by name
//! for diagnostics and anything unknown is preserved as
//! [`Status::Unrecognized`].

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! status_codes {
    ($($(#[$meta:meta])* $variant:ident = $code:literal => $name:literal,)*) => {
        /// Ledger response code.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "i32", into = "i32")]
        pub enum Status {
            $($(#[$meta])* $variant,)*
            /// A code this client does not know by name.
            Unrecognized(i32),
        }

        impl Status {
            /// Numeric code as sent on the wire.
            pub const fn code(&self) -> i32 {
                match self {
                    $(Status::$variant => $code,)*
                    Status::Unrecognized(code) => *code,
                }
            }

            /// Map a numeric code to a status.
            pub const fn from_code(code: i32) -> Self {
                match code {
                    $($code => Status::$variant,)*
                    other => Status::Unrecognized(other),
                }
            }

            /// Protocol name, e.g. `INSUFFICIENT_PAYER_BALANCE`.
            pub const fn name(&self) -> &'static str {
                match self {
                    $(Status::$variant => $name,)*
                    Status::Unrecognized(_) => "UNRECOGNIZED",
                }
            }
        }
    };
}

status_codes! {
    /// Precheck passed.
    Ok = 0 => "OK",
    InvalidTransaction = 1 => "INVALID_TRANSACTION",
    PayerAccountNotFound = 2 => "PAYER_ACCOUNT_NOT_FOUND",
    InvalidNodeAccount = 3 => "INVALID_NODE_ACCOUNT",
    TransactionExpired = 4 => "TRANSACTION_EXPIRED",
    InvalidTransactionStart = 5 => "INVALID_TRANSACTION_START",
    InvalidTransactionDuration = 6 => "INVALID_TRANSACTION_DURATION",
    InvalidSignature = 7 => "INVALID_SIGNATURE",
    MemoTooLong = 8 => "MEMO_TOO_LONG",
    InsufficientTxFee = 9 => "INSUFFICIENT_TX_FEE",
    InsufficientPayerBalance = 10 => "INSUFFICIENT_PAYER_BALANCE",
    DuplicateTransaction = 11 => "DUPLICATE_TRANSACTION",
    /// Node is overloaded; retry elsewhere.
    Busy = 12 => "BUSY",
    NotSupported = 13 => "NOT_SUPPORTED",
    InvalidFileId = 14 => "INVALID_FILE_ID",
    InvalidAccountId = 15 => "INVALID_ACCOUNT_ID",
    InvalidContractId = 16 => "INVALID_CONTRACT_ID",
    InvalidTransactionId = 17 => "INVALID_TRANSACTION_ID",
    /// Receipt not yet known to the queried node.
    ReceiptNotFound = 18 => "RECEIPT_NOT_FOUND",
    RecordNotFound = 19 => "RECORD_NOT_FOUND",
    InvalidSolidityId = 20 => "INVALID_SOLIDITY_ID",
    /// Transaction reached the node but has not reached consensus.
    Unknown = 21 => "UNKNOWN",
    /// Transaction reached consensus and was applied.
    Success = 22 => "SUCCESS",
    FailInvalid = 23 => "FAIL_INVALID",
    FailFee = 24 => "FAIL_FEE",
    FailBalance = 25 => "FAIL_BALANCE",
    KeyRequired = 26 => "KEY_REQUIRED",
    BadEncoding = 27 => "BAD_ENCODING",
    InsufficientAccountBalance = 28 => "INSUFFICIENT_ACCOUNT_BALANCE",
    InvalidSolidityAddress = 29 => "INVALID_SOLIDITY_ADDRESS",
    InsufficientGas = 30 => "INSUFFICIENT_GAS",
    InvalidFeeSubmitted = 42 => "INVALID_FEE_SUBMITTED",
    InvalidPayerSignature = 43 => "INVALID_PAYER_SIGNATURE",
    TransactionOversize = 64 => "TRANSACTION_OVERSIZE",
    PlatformNotActive = 67 => "PLATFORM_NOT_ACTIVE",
    PlatformTransactionNotCreated = 69 => "PLATFORM_TRANSACTION_NOT_CREATED",
    InvalidTopicId = 150 => "INVALID_TOPIC_ID",
}

impl Status {
    /// Precheck codes that mean "try again, possibly on another node".
    pub const fn is_transient_precheck(&self) -> bool {
        matches!(
            self,
            Status::Busy | Status::PlatformNotActive | Status::PlatformTransactionNotCreated
        )
    }

    /// Precheck codes for a receipt or record query that mean the answer
    /// is not available yet.
    pub const fn is_query_precheck_retryable(&self) -> bool {
        matches!(
            self,
            Status::Busy | Status::Unknown | Status::ReceiptNotFound | Status::RecordNotFound
        )
    }

    /// Receipt statuses that mean consensus has not been reached yet.
    pub const fn is_receipt_pending(&self) -> bool {
        matches!(
            self,
            Status::Busy
                | Status::Unknown
                | Status::Ok
                | Status::ReceiptNotFound
                | Status::RecordNotFound
        )
    }

    /// Terminal success.
    pub const fn is_success(&self) -> bool {
        matches!(self, Status::Success)
    }
}

impl From<i32> for Status {
    fn from(code: i32) -> Self {
        Status::from_code(code)
    }
}

impl From<Status> for i32 {
    fn from(status: Status) -> Self {
        status.code()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Unrecognized(code) => write!(f, "UNRECOGNIZED({code})"),
            other => f.write_str(other.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_mapping_round_trips() {
        for code in -5..200 {
            assert_eq!(Status::from_code(code).code(), code);
        }
        assert_eq!(Status::from_code(12), Status::Busy);
        assert_eq!(Status::from_code(9999), Status::Unrecognized(9999));
    }

    #[test]
    fn test_classification() {
        assert!(Status::Busy.is_transient_precheck());
        assert!(Status::PlatformNotActive.is_transient_precheck());
        assert!(!Status::Ok.is_transient_precheck());
        assert!(!Status::InvalidAccountId.is_transient_precheck());

        assert!(Status::Ok.is_receipt_pending());
        assert!(Status::ReceiptNotFound.is_receipt_pending());
        assert!(!Status::Success.is_receipt_pending());
        assert!(!Status::InsufficientPayerBalance.is_receipt_pending());

        assert!(Status::Unknown.is_query_precheck_retryable());
        assert!(!Status::Ok.is_query_precheck_retryable());
    }

    #[test]
    fn test_display() {
        assert_eq!(Status::InsufficientPayerBalance.to_string(), "INSUFFICIENT_PAYER_BALANCE");
        assert_eq!(Status::Unrecognized(777).to_string(), "UNRECOGNIZED(777)");
    }

    #[test]
    fn test_serde_uses_numeric_code() {
        let json = serde_json::to_string(&Status::Busy).unwrap();
        assert_eq!(json, "12");
        let back: Status = serde_json::from_str("22").unwrap();
        assert_eq!(back, Status::Success);
    }
}
