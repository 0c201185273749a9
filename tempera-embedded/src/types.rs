use core::fmt;

use serde::{Deserialize, Serialize};

/// One raw reading of the room, as written into a sample window slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Temperature (℃)
    pub temperature: f32,
    /// Relative humidity (%)
    pub humidity: f32,
    /// Raw light intensity from the analog channel
    pub light_intensity: i32,
    /// Gas resistance in kΩ
    pub pollution_index: f32,
}

impl Sample {
    pub fn new(temperature: f32, humidity: f32, light_intensity: i32, pollution_index: f32) -> Self {
        Self {
            temperature,
            humidity,
            light_intensity,
            pollution_index,
        }
    }
}

/// Mean of a full sample window. `light_intensity` is truncated by integer division.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AverageSample {
    pub temperature: f32,
    pub humidity: f32,
    pub light_intensity: i32,
    pub pollution_index: f32,
}

/// Operating mode selected at the station.
///
/// The discriminants double as indicator color codes, so `OutOfOffice` (0)
/// shows as an unlit LED.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum Workmode {
    #[default]
    OutOfOffice = 0,
    DeepWork = 1,
    Meeting = 2,
    Available = 3,
}

impl Workmode {
    pub const ALL: [Workmode; 4] = [
        Workmode::OutOfOffice,
        Workmode::DeepWork,
        Workmode::Meeting,
        Workmode::Available,
    ];

    /// Name published in the `workmode` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Workmode::OutOfOffice => "OUT_OF_OFFICE",
            Workmode::DeepWork => "DEEP_WORK",
            Workmode::Meeting => "MEETING",
            Workmode::Available => "AVAILABLE",
        }
    }

    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for Workmode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
