use core::cell::Cell;

use embassy_time::Instant;

use super::TimeProvider;

/// Uptime from the embassy time driver, counted from construction.
#[derive(Debug, Clone)]
pub struct EmbeddedTimeProvider {
    boot_instant: Instant,
}

impl EmbeddedTimeProvider {
    pub fn new() -> Self {
        Self {
            boot_instant: Instant::now(),
        }
    }
}

impl TimeProvider for EmbeddedTimeProvider {
    fn uptime_ms(&self) -> u64 {
        self.boot_instant.elapsed().as_millis()
    }
}

impl Default for EmbeddedTimeProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Clock advanced by hand, for replaying scenarios.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: Cell<u64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now_ms: Cell::new(start_ms),
        }
    }

    pub fn set(&self, now_ms: u64) {
        self.now_ms.set(now_ms);
    }

    pub fn advance(&self, delta_ms: u64) -> u64 {
        let now_ms = self.now_ms.get() + delta_ms;
        self.now_ms.set(now_ms);
        now_ms
    }
}

impl TimeProvider for ManualClock {
    fn uptime_ms(&self) -> u64 {
        self.now_ms.get()
    }
}
