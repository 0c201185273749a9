use embedded_io::Read;

use crate::error::Error;

use super::LightSensorDriver;

#[derive(Debug, Clone, Copy)]
pub struct LightSensorCalibration {
    /// ADC full-scale value, 1023 for 10-bit or 4095 for 12-bit converters
    pub adc_max_value: u16,
}

impl Default for LightSensorCalibration {
    fn default() -> Self {
        Self {
            adc_max_value: 1023, // 10-bit ADC
        }
    }
}

/// Photoresistor behind an ADC channel. The channel delivers one big-endian
/// 16-bit conversion per read.
pub struct AnalogLightSensor<IO>
where
    IO: Read,
{
    io_device: IO,
    buffer: [u8; 2],
    calibration: LightSensorCalibration,
}

impl<IO> AnalogLightSensor<IO>
where
    IO: Read,
{
    pub fn new(io_device: IO) -> Self {
        Self::with_calibration(io_device, LightSensorCalibration::default())
    }

    pub fn with_calibration(io_device: IO, calibration: LightSensorCalibration) -> Self {
        Self {
            io_device,
            buffer: [0; 2],
            calibration,
        }
    }

    pub fn read_raw(&mut self) -> Result<u16, Error> {
        self.buffer = [0; 2];

        let read_count = self
            .io_device
            .read(&mut self.buffer)
            .map_err(|_| Error::SensorUnavailable)?;

        if read_count < 2 {
            return Err(Error::SensorUnavailable);
        }

        let raw_value = u16::from_be_bytes(self.buffer);

        if raw_value > self.calibration.adc_max_value {
            return Err(Error::SensorReadingOutOfRange);
        }

        Ok(raw_value)
    }

    pub fn set_calibration(&mut self, calibration: LightSensorCalibration) {
        self.calibration = calibration;
    }

    pub fn get_calibration(&self) -> LightSensorCalibration {
        self.calibration
    }
}

impl<IO> LightSensorDriver for AnalogLightSensor<IO>
where
    IO: Read,
{
    fn read_intensity(&mut self) -> Result<i32, Error> {
        self.read_raw().map(i32::from)
    }
}
