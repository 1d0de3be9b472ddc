//! # Transaction Id Subsystem (LC-01)
//!
//! Issues transaction ids that never repeat for a payer.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): the generator and its per-payer state
//! - **Ports Layer** (`ports/`): the inbound id source and the outbound clock
//! - **Adapters** (`adapters/`): system and manually driven clocks
//!
//! ## Guarantees
//!
//! - Ids for one payer are strictly increasing by valid start, even when
//!   the clock stalls or steps backwards.
//! - Concurrent callers never receive the same id.
//! - The valid start is backdated by a fixed offset (10 s by default) so
//!   a node whose clock runs slightly behind still accepts the id.

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::clock::{ManualClock, SystemClock};
pub use domain::generator::{TransactionIdGenerator, DEFAULT_VALID_START_OFFSET};
pub use ports::inbound::TransactionIdSource;
pub use ports::outbound::Clock;
