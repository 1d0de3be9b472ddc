//! # Timestamps
//!
//! Second + nanosecond precision instants, as the ledger records them.
//! Values are always normalized so that `0 <= nanos < 1_000_000_000`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::errors::ParseError;

/// Nanoseconds per second.
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// A point in time relative to the UNIX epoch.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Timestamp {
    seconds: i64,
    nanos: i32,
}

impl Timestamp {
    /// The UNIX epoch.
    pub const EPOCH: Timestamp = Timestamp {
        seconds: 0,
        nanos: 0,
    };

    /// Create a timestamp, carrying excess or negative nanoseconds into
    /// the seconds field.
    pub fn new(seconds: i64, nanos: i64) -> Self {
        let seconds = seconds + nanos.div_euclid(NANOS_PER_SECOND);
        let nanos = nanos.rem_euclid(NANOS_PER_SECOND) as i32;
        Self { seconds, nanos }
    }

    /// Like [`new`](Self::new), but `None` if carrying the nanoseconds
    /// overflows the seconds field.
    pub fn checked_new(seconds: i64, nanos: i64) -> Option<Self> {
        let seconds = seconds.checked_add(nanos.div_euclid(NANOS_PER_SECOND))?;
        let nanos = nanos.rem_euclid(NANOS_PER_SECOND) as i32;
        Some(Self { seconds, nanos })
    }

    /// Whole seconds since the epoch.
    pub const fn seconds(&self) -> i64 {
        self.seconds
    }

    /// Nanoseconds within the second, always in `0..1_000_000_000`.
    pub const fn nanos(&self) -> i32 {
        self.nanos
    }

    /// Current wall-clock time.
    pub fn now() -> Self {
        Self::from(SystemTime::now())
    }

    /// Total nanoseconds since the epoch.
    pub fn as_nanos(&self) -> i128 {
        self.seconds as i128 * NANOS_PER_SECOND as i128 + self.nanos as i128
    }

    /// Add `n` nanoseconds, carrying into seconds.
    pub fn plus_nanos(&self, n: i64) -> Self {
        Self::new(self.seconds, self.nanos as i64 + n)
    }

    /// Add a duration, `None` on overflow.
    pub fn checked_add(&self, duration: Duration) -> Option<Self> {
        let secs = i64::try_from(duration.as_secs()).ok()?;
        let seconds = self.seconds.checked_add(secs)?;
        let nanos = self.nanos as i64 + duration.subsec_nanos() as i64;
        seconds.checked_add(nanos / NANOS_PER_SECOND)?;
        Some(Self::new(seconds, nanos))
    }

    /// Subtract a duration, `None` on overflow.
    pub fn checked_sub(&self, duration: Duration) -> Option<Self> {
        let secs = i64::try_from(duration.as_secs()).ok()?;
        let seconds = self.seconds.checked_sub(secs)?.checked_sub(1)?;
        let nanos = self.nanos as i64 - duration.subsec_nanos() as i64 + NANOS_PER_SECOND;
        Some(Self::new(seconds, nanos))
    }
}

impl From<SystemTime> for Timestamp {
    fn from(time: SystemTime) -> Self {
        match time.duration_since(UNIX_EPOCH) {
            Ok(after) => Self::new(after.as_secs() as i64, after.subsec_nanos() as i64),
            Err(before) => {
                let before = before.duration();
                Self::new(
                    -(before.as_secs() as i64),
                    -(before.subsec_nanos() as i64),
                )
            }
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.seconds, self.nanos)
    }
}

impl FromStr for Timestamp {
    type Err = ParseError;

    /// Accepts `"{seconds}.{nanos}"` where `nanos` is an integer count of
    /// nanoseconds (zero-padded or not).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidTimestamp(s.to_string());

        let (seconds, nanos) = s.split_once('.').ok_or_else(invalid)?;
        if nanos.is_empty() || !nanos.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let seconds: i64 = seconds.parse().map_err(|_| invalid())?;
        let nanos: i64 = nanos.parse().map_err(|_| invalid())?;
        if nanos >= NANOS_PER_SECOND {
            return Err(invalid());
        }

        Ok(Self::new(seconds, nanos))
    }
}
