mod provider;

pub use provider::{EmbeddedTimeProvider, ManualClock};

/// Monotonic millisecond clock starting at boot.
pub trait TimeProvider {
    fn uptime_ms(&self) -> u64;
}
