//! # Outbound Ports (Driven Ports / SPI)

use shared_types::Timestamp;

/// Wall-clock time source.
pub trait Clock: Send + Sync {
    /// Current time.
    fn now(&self) -> Timestamp;
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}
