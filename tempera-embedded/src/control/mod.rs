mod station;
mod watchdog;

pub use station::*;
pub use watchdog::StalenessWatchdog;

use alloc::string::String;

use serde::{Deserialize, Serialize};

pub const DEFAULT_DEVICE_ID: &str = "G4T2-TD-1";

/// Timing and identity of a station. All intervals are in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StationConfig {
    /// Published in `deviceInfo`; also the advertised name
    pub device_id: String,
    /// Time between two sensor samples
    pub sample_interval_ms: u64,
    /// Minimum time between two accepted mode changes
    pub mode_throttle_ms: u64,
    /// How long published data may go unacknowledged before the alert shows
    pub read_interval_ms: u64,
    /// Indicator stays off this long after a mode change
    pub quiet_window_ms: u64,
    /// Half period of the alert blink
    pub blink_interval_ms: u64,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            device_id: String::from(DEFAULT_DEVICE_ID),
            sample_interval_ms: 10_000,
            mode_throttle_ms: 1_000,
            read_interval_ms: 90_000,
            quiet_window_ms: 100,
            blink_interval_ms: 200,
        }
    }
}
