//! # Transaction Id Generator
//!
//! Keeps the last valid start issued per payer. A candidate taken from the
//! clock is used only if it is strictly later than that value; otherwise the
//! last value plus one nanosecond is issued. The per-payer table sits behind
//! one mutex, which is the only hot shared state in the client.

use parking_lot::Mutex;
use shared_types::{AccountId, Timestamp, TransactionId};
use std::collections::HashMap;
use std::time::Duration;
use tracing::trace;

use crate::adapters::clock::SystemClock;
use crate::ports::inbound::TransactionIdSource;
use crate::ports::outbound::Clock;

/// How far before "now" a generated id starts being valid.
pub const DEFAULT_VALID_START_OFFSET: Duration = Duration::from_secs(10);

/// Issues strictly increasing transaction ids per payer.
pub struct TransactionIdGenerator<C: Clock = SystemClock> {
    clock: C,
    offset: Duration,
    last_issued: Mutex<HashMap<AccountId, Timestamp>>,
}

impl TransactionIdGenerator<SystemClock> {
    /// Generator reading the system clock with the default offset.
    pub fn system() -> Self {
        Self::new(SystemClock)
    }
}

impl Default for TransactionIdGenerator<SystemClock> {
    fn default() -> Self {
        Self::system()
    }
}

impl<C: Clock> TransactionIdGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self::with_offset(clock, DEFAULT_VALID_START_OFFSET)
    }

    /// Use a custom valid-start offset.
    pub fn with_offset(clock: C, offset: Duration) -> Self {
        Self {
            clock,
            offset,
            last_issued: Mutex::new(HashMap::new()),
        }
    }

    pub fn offset(&self) -> Duration {
        self.offset
    }

    /// Issue the next id for `payer`.
    pub fn next(&self, payer: AccountId) -> TransactionId {
        let now = self.clock.now();
        let candidate = now.checked_sub(self.offset).unwrap_or(now);

        let mut last_issued = self.last_issued.lock();
        let valid_start = match last_issued.get(&payer) {
            Some(last) if candidate <= *last => {
                trace!(payer = %payer, last = %last, "Clock did not advance; bumping by 1ns");
                last.plus_nanos(1)
            }
            _ => candidate,
        };
        last_issued.insert(payer, valid_start);

        TransactionId::new(payer, valid_start)
    }
}

impl<C: Clock> TransactionIdSource for TransactionIdGenerator<C> {
    fn next(&self, payer: AccountId) -> TransactionId {
        TransactionIdGenerator::next(self, payer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::clock::ManualClock;
    use proptest::prelude::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    const PAYER: AccountId = AccountId::new(0, 0, 2);

    fn frozen_generator() -> TransactionIdGenerator<ManualClock> {
        TransactionIdGenerator::new(ManualClock::new(Timestamp::new(1_700_000_000, 0)))
    }

    #[test]
    fn test_backdates_by_offset() {
        let generator = frozen_generator();
        let id = generator.next(PAYER);
        assert_eq!(id.payer(), PAYER);
        assert_eq!(id.valid_start(), Timestamp::new(1_699_999_990, 0));
    }

    #[test]
    fn test_stalled_clock_bumps_by_one_nanosecond() {
        let generator = frozen_generator();
        let first = generator.next(PAYER);
        let second = generator.next(PAYER);
        let third = generator.next(PAYER);

        assert_eq!(second.valid_start(), first.valid_start().plus_nanos(1));
        assert_eq!(third.valid_start(), first.valid_start().plus_nanos(2));
    }

    #[test]
    fn test_backwards_clock_still_increases() {
        let clock = Arc::new(ManualClock::new(Timestamp::new(1_000, 0)));
        let generator = TransactionIdGenerator::new(Arc::clone(&clock));

        let first = generator.next(PAYER);
        clock.set(Timestamp::new(500, 0));
        let second = generator.next(PAYER);

        assert!(second.valid_start() > first.valid_start());
    }

    #[test]
    fn test_advancing_clock_uses_fresh_time() {
        let clock = Arc::new(ManualClock::new(Timestamp::new(1_000, 0)));
        let generator = TransactionIdGenerator::new(Arc::clone(&clock));

        generator.next(PAYER);
        clock.advance(Duration::from_secs(5));
        let id = generator.next(PAYER);
        assert_eq!(id.valid_start(), Timestamp::new(995, 0));
    }

    #[test]
    fn test_payers_are_independent() {
        let generator = frozen_generator();
        let other = AccountId::new(0, 0, 3);

        let a = generator.next(PAYER);
        let b = generator.next(other);
        assert_eq!(a.valid_start(), b.valid_start());
        assert_ne!(a, b);
    }

    #[test]
    fn test_concurrent_callers_get_distinct_ids() {
        let generator = Arc::new(frozen_generator());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let generator = Arc::clone(&generator);
                std::thread::spawn(move || (0..25).map(|_| generator.next(PAYER)).collect::<Vec<_>>())
            })
            .collect();

        let mut all = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(all.insert(id), "duplicate id {id}");
            }
        }
        assert_eq!(all.len(), 200);
    }

    proptest! {
        #[test]
        fn prop_ids_strictly_increase_for_any_clock_walk(
            steps in proptest::collection::vec(-2_000_000i64..2_000_000, 1..64)
        ) {
            let clock = Arc::new(ManualClock::new(Timestamp::new(1_700_000_000, 0)));
            let generator = TransactionIdGenerator::new(Arc::clone(&clock));

            let mut previous = generator.next(PAYER).valid_start();
            for step in steps {
                clock.set(clock.now().plus_nanos(step));
                let next = generator.next(PAYER).valid_start();
                prop_assert!(next > previous);
                previous = next;
            }
        }
    }
}
