mod light_sensor;
mod window;

pub use light_sensor::{AnalogLightSensor, LightSensorCalibration};
pub use window::*;

use crate::error::Error;
use crate::types::Sample;

/// Raw output of the combined temperature/humidity/gas/pressure sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvironmentReading {
    /// Temperature (℃)
    pub temperature: f32,
    /// Relative humidity (%)
    pub humidity: f32,
    /// Pressure (Pa)
    pub pressure: f32,
    /// Gas resistance (Ω)
    pub gas_resistance: f32,
}

impl EnvironmentReading {
    /// Gas resistance expressed in kΩ.
    pub fn pollution_index(&self) -> f32 {
        self.gas_resistance / 1000.0
    }

    pub fn to_sample(&self, light_intensity: i32) -> Sample {
        Sample::new(
            self.temperature,
            self.humidity,
            light_intensity,
            self.pollution_index(),
        )
    }
}

pub trait EnvironmentSensor {
    /// Run one forced measurement. Bus failures map to `Error::SensorUnavailable`.
    fn read_environment(&mut self) -> Result<EnvironmentReading, Error>;
}

pub trait LightSensorDriver {
    fn read_intensity(&mut self) -> Result<i32, Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_to_sample() {
        let reading = EnvironmentReading {
            temperature: 21.5,
            humidity: 40.0,
            pressure: 101_325.0,
            gas_resistance: 52_000.0,
        };

        let sample = reading.to_sample(512);

        assert_eq!(sample.temperature, 21.5);
        assert_eq!(sample.humidity, 40.0);
        assert_eq!(sample.light_intensity, 512);
        assert_eq!(sample.pollution_index, 52.0);
    }
}
