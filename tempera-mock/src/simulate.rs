use std::convert::Infallible;
use std::f64::consts::PI;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::digital::{ErrorType, InputPin};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use tokio::time::Instant;

use tempera_embedded::Error;
use tempera_embedded::indicator::{Rgb, RgbSink};
use tempera_embedded::input::ModeButton;
use tempera_embedded::sensor::{EnvironmentReading, EnvironmentSensor};
use tempera_embedded::time::TimeProvider;

use crate::error::{MockError, Result};
use crate::settings::Simulation;

const MAX_SUNLIGHT_LUX: f64 = 500.0;
const MAX_MOONLIGHT_LUX: f64 = 5.0;

pub fn simulation_lux(day_fraction: f64) -> f64 {
    let radians = day_fraction * 2.0 * PI;

    // Smooth transition factors
    const SUNRISE_START: f64 = 0.23;
    const SUNRISE_END: f64 = 0.25;
    const SUNSET_START: f64 = 0.73;
    const SUNSET_END: f64 = 0.75;

    if (SUNRISE_START..=SUNSET_END).contains(&day_fraction) {
        if day_fraction <= SUNRISE_END {
            let sunrise = (day_fraction - SUNRISE_START) / (SUNRISE_END - SUNRISE_START);
            (sunrise * PI / 2.0).sin() * MAX_SUNLIGHT_LUX
        } else if day_fraction >= SUNSET_START {
            let sunset = (day_fraction - SUNSET_START) / (SUNSET_END - SUNSET_START);
            (sunset * PI / 2.0).cos() * MAX_SUNLIGHT_LUX
        } else {
            MAX_SUNLIGHT_LUX
        }
    } else {
        // Moonlight peaks at midnight
        (radians + PI).cos().max(0.0) * (MAX_MOONLIGHT_LUX - 0.01) + 0.01
    }
}

pub fn simulated_humidity(day_fraction: f64) -> f64 {
    let radians = day_fraction * 2.0 * PI;

    if (0.3..=0.7).contains(&day_fraction) {
        (radians.sin().max(0.0) * 25.0 + 65.0).round()
    } else {
        (radians.cos().max(0.0) * 30.0 + 60.0).round()
    }
}

/// Indoor temperature in °C, warmest in the afternoon.
pub fn simulated_temperature(day_fraction: f64) -> f64 {
    let radians = (day_fraction - 0.25) * 2.0 * PI;
    21.0 + radians.sin() * 3.0
}

/// Simulation time, counted from construction. Follows tokio's clock, so it
/// also advances under a paused test runtime.
#[derive(Debug, Clone, Copy)]
pub struct SimClock {
    start: Instant,
    day_length_ms: u64,
}

impl SimClock {
    pub fn new(day_length_ms: u64) -> Self {
        Self {
            start: Instant::now(),
            day_length_ms: day_length_ms.max(1),
        }
    }

    pub fn day_fraction(&self) -> f64 {
        (self.uptime_ms() % self.day_length_ms) as f64 / self.day_length_ms as f64
    }
}

impl TimeProvider for SimClock {
    fn uptime_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Combined temperature, humidity, pressure and gas sensor following the day
/// curves with some noise.
pub struct SimulatedEnvironment {
    clock: SimClock,
    rng: StdRng,
    noise: Normal<f64>,
    gas: Normal<f64>,
    failure_probability: f64,
}

impl SimulatedEnvironment {
    pub fn new(clock: SimClock, simulation: &Simulation) -> Result<Self> {
        if !(0.0..=1.0).contains(&simulation.failure_probability) {
            return Err(MockError::InvalidParameter(format!(
                "failure_probability {} is not within 0.0..=1.0",
                simulation.failure_probability
            )));
        }

        let noise =
            Normal::new(0.0, 0.2).map_err(|e| MockError::InvalidParameter(e.to_string()))?;
        let gas = Normal::new(50_000.0, 5_000.0)
            .map_err(|e| MockError::InvalidParameter(e.to_string()))?;

        Ok(Self {
            clock,
            rng: seeded_rng(simulation.seed),
            noise,
            gas,
            failure_probability: simulation.failure_probability,
        })
    }
}

impl EnvironmentSensor for SimulatedEnvironment {
    fn read_environment(&mut self) -> std::result::Result<EnvironmentReading, Error> {
        if self.rng.random_bool(self.failure_probability) {
            return Err(Error::SensorUnavailable);
        }

        let day_fraction = self.clock.day_fraction();
        let temperature = simulated_temperature(day_fraction) + self.noise.sample(&mut self.rng);
        let humidity = simulated_humidity(day_fraction) + self.noise.sample(&mut self.rng);
        // Air pressure in Pa around the standard 1013.25 hPa
        let pressure = 101_325.0 + self.rng.random_range(-300.0..300.0);
        let gas_resistance = self.gas.sample(&mut self.rng).max(1_000.0);

        Ok(EnvironmentReading {
            temperature: temperature as f32,
            humidity: humidity.clamp(0.0, 100.0) as f32,
            pressure: pressure as f32,
            gas_resistance: gas_resistance as f32,
        })
    }
}

/// ADC channel behind a photoresistor. Every read delivers one big-endian
/// conversion scaled from the simulated lux level.
pub struct SimulatedAdc {
    clock: SimClock,
    adc_max: u16,
}

impl SimulatedAdc {
    pub fn new(clock: SimClock, adc_max: u16) -> Self {
        Self { clock, adc_max }
    }

    pub fn conversion(&self) -> u16 {
        let level = simulation_lux(self.clock.day_fraction()) / MAX_SUNLIGHT_LUX;
        (level.clamp(0.0, 1.0) * self.adc_max as f64).round() as u16
    }
}

impl embedded_io::ErrorType for SimulatedAdc {
    type Error = Infallible;
}

impl embedded_io::Read for SimulatedAdc {
    fn read(&mut self, buf: &mut [u8]) -> std::result::Result<usize, Self::Error> {
        let bytes = self.conversion().to_be_bytes();
        let count = buf.len().min(bytes.len());
        buf[..count].copy_from_slice(&bytes[..count]);
        Ok(count)
    }
}

/// Active-low button pin shared with whoever presses it.
#[derive(Debug, Clone, Default)]
pub struct SimButton {
    pressed: Arc<AtomicBool>,
}

impl ErrorType for SimButton {
    type Error = Infallible;
}

impl InputPin for SimButton {
    fn is_high(&mut self) -> std::result::Result<bool, Self::Error> {
        Ok(!self.pressed.load(Ordering::Relaxed))
    }

    fn is_low(&mut self) -> std::result::Result<bool, Self::Error> {
        Ok(self.pressed.load(Ordering::Relaxed))
    }
}

/// The four mode buttons, in [`ModeButton::PRIORITY`] order.
#[derive(Debug, Clone, Default)]
pub struct ButtonPanel {
    buttons: [SimButton; 4],
}

impl ButtonPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pins(&self) -> [SimButton; 4] {
        self.buttons.clone()
    }

    fn button(&self, button: ModeButton) -> &SimButton {
        let index = ModeButton::PRIORITY
            .iter()
            .position(|b| *b == button)
            .unwrap_or_default();
        &self.buttons[index]
    }

    pub fn press(&self, button: ModeButton) {
        tracing::info!("Button {:?} pressed", button);
        self.button(button).pressed.store(true, Ordering::Relaxed);
    }

    pub fn release(&self, button: ModeButton) {
        tracing::debug!("Button {:?} released", button);
        self.button(button).pressed.store(false, Ordering::Relaxed);
    }

    pub fn is_pressed(&self, button: ModeButton) -> bool {
        self.button(button).pressed.load(Ordering::Relaxed)
    }
}

/// RGB LED that logs every color change.
#[derive(Debug, Default)]
pub struct LoggingLed {
    current: Rgb,
    changes: u64,
}

impl LoggingLed {
    pub fn current(&self) -> Rgb {
        self.current
    }

    pub fn changes(&self) -> u64 {
        self.changes
    }
}

impl RgbSink for LoggingLed {
    fn set_rgb(&mut self, color: Rgb) {
        if color != self.current {
            tracing::debug!(
                "LED #{:02x}{:02x}{:02x}",
                color.red,
                color.green,
                color.blue
            );
            self.current = color;
            self.changes += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use embedded_io::Read;
    use tempera_embedded::sensor::{AnalogLightSensor, LightSensorCalibration, LightSensorDriver};

    use super::*;

    fn simulation(failure_probability: f64) -> Simulation {
        Simulation {
            tick_ms: 50,
            day_length_ms: 86_400_000,
            failure_probability,
            light_adc_max: 1023,
            seed: Some(7),
        }
    }

    #[test]
    fn test_day_curves() {
        assert_eq!(simulation_lux(0.5), MAX_SUNLIGHT_LUX);
        assert!(simulation_lux(0.0) <= MAX_MOONLIGHT_LUX);
        assert!(simulation_lux(0.9) < 1.0);

        for step in 0..100 {
            let day_fraction = step as f64 / 100.0;
            let humidity = simulated_humidity(day_fraction);
            assert!((0.0..=100.0).contains(&humidity));
            let temperature = simulated_temperature(day_fraction);
            assert!((18.0..=24.0).contains(&temperature));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_environment_reading_plausible() {
        let clock = SimClock::new(86_400_000);
        let mut sensor = SimulatedEnvironment::new(clock, &simulation(0.0)).unwrap();

        for _ in 0..20 {
            let reading = sensor.read_environment().unwrap();
            assert!((15.0..=30.0).contains(&reading.temperature));
            assert!((0.0..=100.0).contains(&reading.humidity));
            assert!(reading.gas_resistance >= 1_000.0);
            assert!(reading.pollution_index() >= 1.0);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_environment_always_fails() {
        let clock = SimClock::new(86_400_000);
        let mut sensor = SimulatedEnvironment::new(clock, &simulation(1.0)).unwrap();

        assert_eq!(sensor.read_environment(), Err(Error::SensorUnavailable));
    }

    #[tokio::test(start_paused = true)]
    async fn test_environment_rejects_bad_probability() {
        let clock = SimClock::new(86_400_000);

        assert!(matches!(
            SimulatedEnvironment::new(clock, &simulation(1.5)),
            Err(MockError::InvalidParameter(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_adc_feeds_light_sensor() {
        let clock = SimClock::new(86_400_000);
        let mut adc = SimulatedAdc::new(clock, 1023);

        // Midnight: moonlight only
        let mut buf = [0u8; 2];
        assert_eq!(adc.read(&mut buf).unwrap(), 2);
        assert!(u16::from_be_bytes(buf) <= 11);

        tokio::time::advance(std::time::Duration::from_millis(43_200_000)).await;
        assert_eq!(adc.conversion(), 1023);

        let mut sensor = AnalogLightSensor::with_calibration(
            adc,
            LightSensorCalibration { adc_max_value: 1023 },
        );
        assert_eq!(sensor.read_intensity(), Ok(1023));
    }

    #[test]
    fn test_button_panel_shares_pins() {
        let panel = ButtonPanel::new();
        let mut pins = panel.pins();

        panel.press(ModeButton::Meeting);
        assert!(pins[2].is_low().unwrap());
        assert!(pins[0].is_high().unwrap());
        assert!(panel.is_pressed(ModeButton::Meeting));

        panel.release(ModeButton::Meeting);
        assert!(pins[2].is_high().unwrap());
    }

    #[test]
    fn test_logging_led_counts_changes() {
        let mut led = LoggingLed::default();

        led.set_rgb(Rgb::OFF);
        led.set_rgb(Rgb::new(0, 0, 255));
        led.set_rgb(Rgb::new(0, 0, 255));

        assert_eq!(led.current(), Rgb::new(0, 0, 255));
        assert_eq!(led.changes(), 1);
    }
}
