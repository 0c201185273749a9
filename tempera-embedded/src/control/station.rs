use alloc::format;
use alloc::string::String;

use embedded_hal::digital::InputPin;

use crate::error::Error;
use crate::indicator::{IndicatorInput, IndicatorPattern, RgbSink, StatusIndicator};
use crate::input::ModeSelector;
use crate::sensor::{DEFAULT_WINDOW_LEN, EnvironmentSensor, LightSensorDriver, SampleWindow};
use crate::time::TimeProvider;
use crate::transport::{AckHandshake, AckSnapshot, Field, FieldValue, Transport};
use crate::types::{AverageSample, Sample, Workmode};

use super::{StalenessWatchdog, StationConfig};

/// Shown in the sensor fields until the first window average is available.
pub const NO_READING: &str = "None";

#[derive(Debug, Clone, PartialEq)]
pub enum SampleOutcome {
    NotDue,
    Written(Sample),
    Skipped(Error),
}

/// What happened during one [`StationController::tick`].
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub acks: AckSnapshot,
    pub stale: bool,
    pub mode_change: Option<Workmode>,
    pub sample: SampleOutcome,
    pub average: Option<AverageSample>,
    pub pattern: IndicatorPattern,
}

/// Rendered text of each averaged field, in publication order.
pub fn average_fields(average: &AverageSample) -> [(Field, String); 4] {
    [
        (Field::Temperature, format!("{:.2}", average.temperature)),
        (Field::Humidity, format!("{:.2}", average.humidity)),
        (Field::AirQuality, format!("{:.2}", average.pollution_index)),
        (Field::LightIntensity, format!("{}", average.light_intensity)),
    ]
}

/// The station's main loop body.
///
/// Owns every piece of controller state and the collaborators it talks to.
/// [`StationController::start`] runs once after the hardware is up, then
/// [`StationController::tick`] is called from the superloop as often as
/// possible. Nothing in a tick blocks.
pub struct StationController<Env, Light, Pin, T, Led, const N: usize = DEFAULT_WINDOW_LEN>
where
    Env: EnvironmentSensor,
    Light: LightSensorDriver,
    Pin: InputPin,
    T: Transport,
    Led: RgbSink,
{
    config: StationConfig,
    environment: Env,
    light: Light,
    selector: ModeSelector<Pin>,
    transport: T,
    led: Led,
    acks: AckHandshake,
    watchdog: StalenessWatchdog,
    indicator: StatusIndicator,
    window: SampleWindow<N>,
    workmode: Workmode,
    mode_changed: bool,
    data_published: bool,
    last_mode_change_ms: Option<u64>,
    next_sample_ms: u64,
    latest_average: Option<AverageSample>,
    stale: bool,
}

impl<Env, Light, Pin, T, Led, const N: usize> StationController<Env, Light, Pin, T, Led, N>
where
    Env: EnvironmentSensor,
    Light: LightSensorDriver,
    Pin: InputPin,
    T: Transport,
    Led: RgbSink,
{
    /// `buttons` are the InOffice, DeepWork, Meeting and OutOfOffice inputs,
    /// in that order.
    pub fn new(
        config: StationConfig,
        environment: Env,
        light: Light,
        buttons: [Pin; 4],
        transport: T,
        led: Led,
    ) -> Self {
        let selector = ModeSelector::new(buttons, config.mode_throttle_ms);
        let watchdog = StalenessWatchdog::new(config.read_interval_ms, 0);
        let indicator = StatusIndicator::new(config.quiet_window_ms, config.blink_interval_ms);

        Self {
            config,
            environment,
            light,
            selector,
            transport,
            led,
            acks: AckHandshake::new(),
            watchdog,
            indicator,
            window: SampleWindow::new(),
            workmode: Workmode::default(),
            mode_changed: false,
            data_published: false,
            last_mode_change_ms: None,
            next_sample_ms: 0,
            latest_average: None,
            stale: false,
        }
    }

    /// Publish initial field values and arm the timers at `now_ms`.
    ///
    /// The staleness deadline starts at `now_ms`, so the alert shows from the
    /// first tick after start until a reader acknowledges data.
    pub fn start(&mut self, now_ms: u64) -> Result<(), Error> {
        self.selector.reset(now_ms);
        self.watchdog = StalenessWatchdog::new(self.config.read_interval_ms, now_ms);
        self.next_sample_ms = now_ms;

        let device_id = self.config.device_id.clone();
        let initial = [
            (Field::DeviceInfo, FieldValue::Text(&device_id)),
            (Field::Temperature, FieldValue::Text(NO_READING)),
            (Field::Humidity, FieldValue::Text(NO_READING)),
            (Field::AirQuality, FieldValue::Text(NO_READING)),
            (Field::LightIntensity, FieldValue::Text(NO_READING)),
            (Field::DataReadAck, FieldValue::Flag(false)),
            (Field::Workmode, FieldValue::Text(self.workmode.as_str())),
            (Field::ModeReadAck, FieldValue::Flag(false)),
        ];

        for (field, value) in initial {
            self.transport.publish(field, value).map_err(|e| {
                log::error!("Failed to initialise {}: {}", field, e);
                Error::InitializationError
            })?;
        }

        log::info!("Station {} started in {}", device_id, self.workmode);
        Ok(())
    }

    pub fn run_once<C: TimeProvider>(&mut self, clock: &C) -> TickOutcome {
        self.tick(clock.uptime_ms())
    }

    /// One pass of the control loop at `now_ms`.
    pub fn tick(&mut self, now_ms: u64) -> TickOutcome {
        if let Err(e) = self.transport.poll(&mut self.acks) {
            log::warn!("Transport poll failed: {}", e);
        }

        let acks = self.acks.drain();
        if acks.data_acked {
            self.watchdog.on_data_ack(now_ms);
            self.data_published = false;
            self.publish(Field::DataReadAck, FieldValue::Flag(false));
        }
        if acks.mode_acked {
            self.mode_changed = false;
        }

        self.update_staleness(now_ms);

        let mode_change = self.selector.try_change_mode(now_ms);
        if let Some(mode) = mode_change {
            self.apply_mode(mode, now_ms);
        }

        let (sample, average) = if now_ms >= self.next_sample_ms {
            self.next_sample_ms += self.config.sample_interval_ms;
            self.sample()
        } else {
            (SampleOutcome::NotDue, None)
        };

        let pattern = self.indicator.update(
            &IndicatorInput {
                stale: self.stale,
                workmode: self.workmode,
                last_mode_change_ms: self.last_mode_change_ms,
            },
            now_ms,
        );
        self.led.set_rgb(pattern.rgb());

        TickOutcome {
            acks,
            stale: self.stale,
            mode_change,
            sample,
            average,
            pattern,
        }
    }

    fn update_staleness(&mut self, now_ms: u64) {
        let stale = self.watchdog.is_stale(now_ms);

        if stale != self.stale {
            if stale {
                log::warn!(
                    "Data acknowledgment deadline {} ms passed, showing alert",
                    self.watchdog.deadline_ms()
                );
            } else {
                log::info!("Data acknowledged, alert cleared");
            }
        }

        self.stale = stale;
    }

    fn apply_mode(&mut self, mode: Workmode, now_ms: u64) {
        self.workmode = mode;
        self.mode_changed = true;
        self.last_mode_change_ms = Some(now_ms);
        self.acks.clear_mode_read();

        self.publish(Field::ModeReadAck, FieldValue::Flag(false));
        self.publish(Field::Workmode, FieldValue::Text(mode.as_str()));

        log::info!("The workmode is: {}", mode);
    }

    fn read_sample(&mut self) -> Result<Sample, Error> {
        let reading = self.environment.read_environment()?;
        let light = self.light.read_intensity()?;
        Ok(reading.to_sample(light))
    }

    fn sample(&mut self) -> (SampleOutcome, Option<AverageSample>) {
        let sample = match self.read_sample() {
            Ok(sample) => sample,
            Err(e) => {
                log::warn!("Failed to complete reading: {}", e);
                return (SampleOutcome::Skipped(e), None);
            }
        };

        if !self.window.write(sample) {
            return (SampleOutcome::Written(sample), None);
        }

        let average = self.window.average();
        for (field, text) in average_fields(&average) {
            self.publish(field, FieldValue::Text(&text));
        }
        self.latest_average = Some(average);
        self.data_published = true;

        log::debug!("Published window average {:?}", average);
        (SampleOutcome::Written(sample), Some(average))
    }

    fn publish(&mut self, field: Field, value: FieldValue<'_>) {
        if let Err(e) = self.transport.publish(field, value) {
            log::warn!("Failed to publish {}: {}", field, e);
        }
    }

    pub fn config(&self) -> &StationConfig {
        &self.config
    }

    pub fn workmode(&self) -> Workmode {
        self.workmode
    }

    /// A mode was published and the reader has not acknowledged it yet.
    pub fn is_mode_changed(&self) -> bool {
        self.mode_changed
    }

    /// An average was published and no data acknowledgment followed yet.
    pub fn is_data_published(&self) -> bool {
        self.data_published
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn latest_average(&self) -> Option<AverageSample> {
        self.latest_average
    }

    pub fn next_sample_ms(&self) -> u64 {
        self.next_sample_ms
    }

    pub fn window(&self) -> &SampleWindow<N> {
        &self.window
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn led(&self) -> &Led {
        &self.led
    }
}
