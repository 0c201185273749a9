use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time;

use tempera_embedded::sensor::{AnalogLightSensor, LightSensorCalibration};
use tempera_embedded::time::TimeProvider;
use tempera_embedded::transport::MemoryTransport;
use tempera_embedded::{SampleOutcome, StationController};

use crate::command::{Command, CommandHandler, PressSchedule};
use crate::error::Result;
use crate::reader::AccessPoint;
use crate::settings::Settings;
use crate::simulate::{
    ButtonPanel, LoggingLed, SimButton, SimClock, SimulatedAdc, SimulatedEnvironment,
};

pub mod command;
pub mod error;
pub mod reader;
pub mod settings;
pub mod simulate;

/// Hold time for a `tap` typed on stdin.
const TAP_HOLD_MS: u64 = 200;

pub type SimulatedStation = StationController<
    SimulatedEnvironment,
    AnalogLightSensor<SimulatedAdc>,
    SimButton,
    MemoryTransport,
    LoggingLed,
>;

/// A station wired to simulated hardware and a simulated access point.
pub struct Simulator {
    clock: SimClock,
    station: SimulatedStation,
    panel: ButtonPanel,
    schedule: PressSchedule,
    reader: AccessPoint,
    tick_period: Duration,
    reader_period: Duration,
}

impl Simulator {
    pub fn new(settings: &Settings) -> Result<Self> {
        let clock = SimClock::new(settings.simulation.day_length_ms);
        let panel = ButtonPanel::new();

        let environment = SimulatedEnvironment::new(clock, &settings.simulation)?;
        let light = AnalogLightSensor::with_calibration(
            SimulatedAdc::new(clock, settings.simulation.light_adc_max),
            LightSensorCalibration {
                adc_max_value: settings.simulation.light_adc_max,
            },
        );

        let mut station = StationController::new(
            settings.station.clone(),
            environment,
            light,
            panel.pins(),
            MemoryTransport::new(),
            LoggingLed::default(),
        );
        station.start(clock.uptime_ms())?;

        if settings.reader.connected {
            station.transport_mut().connect();
        }

        Ok(Self {
            clock,
            station,
            panel,
            schedule: PressSchedule::new(settings.presses.clone()),
            reader: AccessPoint::new(),
            tick_period: Duration::from_millis(settings.simulation.tick_ms.max(1)),
            reader_period: Duration::from_millis(settings.reader.poll_interval_ms.max(1)),
        })
    }

    pub fn station(&self) -> &SimulatedStation {
        &self.station
    }

    pub fn reader(&self) -> &AccessPoint {
        &self.reader
    }

    pub fn panel(&self) -> &ButtonPanel {
        &self.panel
    }

    /// One controller tick at the current simulation time.
    pub fn step(&mut self) {
        let now = self.clock.uptime_ms();
        self.schedule.apply(now, &self.panel);

        let outcome = self.station.tick(now);

        if let Some(mode) = outcome.mode_change {
            tracing::info!("[{now} ms] Mode changed to {mode}");
        }
        if let SampleOutcome::Skipped(e) = &outcome.sample {
            tracing::warn!("[{now} ms] Sample skipped: {e}");
        }
        if let Some(average) = outcome.average {
            tracing::info!(
                "[{now} ms] Average temp={:.2} humd={:.2} pollution={:.2} lght={}",
                average.temperature,
                average.humidity,
                average.pollution_index,
                average.light_intensity
            );
        }
    }

    pub fn visit_reader(&mut self) {
        if !self.station.transport().is_connected() {
            tracing::debug!("Reader out of range");
            return;
        }

        if let Err(e) = self.reader.visit(self.station.transport_mut()) {
            tracing::warn!("Reader visit failed: {e}");
        }
    }

    /// Apply an operator command. Returns `false` once the simulation should stop.
    pub fn handle(&mut self, command: Command) -> bool {
        let now = self.clock.uptime_ms();

        match command {
            Command::Press(button) => self.panel.press(button),
            Command::Release(button) => self.panel.release(button),
            Command::Tap(button) => self.schedule.tap(button, now, TAP_HOLD_MS, &self.panel),
            Command::Connect => self.station.transport_mut().connect(),
            Command::Disconnect => self.station.transport_mut().disconnect(),
            Command::Status => self.report_status(),
            Command::Quit => return false,
        }

        true
    }

    fn report_status(&self) {
        tracing::info!(
            "Mode {} (ack pending: {}), stale: {}, data pending: {}, latest average: {:?}, reader visits: {}",
            self.station.workmode(),
            self.station.is_mode_changed(),
            self.station.is_stale(),
            self.station.is_data_published(),
            self.station.latest_average(),
            self.reader.visits()
        );
    }

    /// Drive ticks and reader visits until a quit command arrives.
    pub async fn run(&mut self, cmd_rx: &mut mpsc::Receiver<Command>) {
        let mut tick = time::interval(self.tick_period);
        let mut poll = time::interval(self.reader_period);
        tick.set_missed_tick_behavior(time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = tick.tick() => self.step(),
                _ = poll.tick() => self.visit_reader(),
                Some(command) = cmd_rx.recv() => {
                    if !self.handle(command) {
                        break;
                    }
                }
            }
        }
    }
}

pub async fn run(settings: &Settings) -> Result<()> {
    let mut simulator = Simulator::new(settings)?;
    let mut command_handler = CommandHandler::new();
    command_handler.start_stdin_processor();

    tracing::info!(
        "Simulating station {}; commands: press|release|tap <button>, connect, disconnect, status, quit",
        settings.station.device_id
    );

    simulator.run(&mut command_handler.cmd_rx).await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use tempera_embedded::input::ModeButton;
    use tempera_embedded::transport::Field;
    use tempera_embedded::{StationConfig, Workmode};

    use crate::settings::{Logger, Reader, ScriptedPress, Simulation};

    use super::*;

    fn settings(connected: bool, presses: Vec<ScriptedPress>) -> Settings {
        Settings {
            logger: Logger {
                level: "debug".into(),
            },
            station: StationConfig {
                sample_interval_ms: 1_000,
                read_interval_ms: 5_000,
                ..StationConfig::default()
            },
            simulation: Simulation {
                tick_ms: 50,
                day_length_ms: 600_000,
                failure_probability: 0.0,
                light_adc_max: 1023,
                seed: Some(42),
            },
            reader: Reader {
                poll_interval_ms: 2_000,
                connected,
            },
            presses,
        }
    }

    fn quit_after(cmd_tx: mpsc::Sender<Command>, after: Duration) {
        tokio::spawn(async move {
            time::sleep(after).await;
            cmd_tx.send(Command::Quit).await.ok();
        });
    }

    #[tokio::test(start_paused = true)]
    async fn test_connected_reader_keeps_station_fresh() {
        let mut simulator = Simulator::new(&settings(true, Vec::new())).unwrap();
        let (cmd_tx, mut cmd_rx) = mpsc::channel(8);
        quit_after(cmd_tx, Duration::from_secs(20));

        simulator.run(&mut cmd_rx).await;

        let station = simulator.station();
        assert!(!station.is_stale());
        assert!(station.latest_average().is_some());
        assert_ne!(station.transport().text(Field::Temperature), Some("None"));
        assert!(simulator.reader().visits() >= 9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disconnected_reader_goes_stale() {
        let mut simulator = Simulator::new(&settings(false, Vec::new())).unwrap();
        let (cmd_tx, mut cmd_rx) = mpsc::channel(8);
        quit_after(cmd_tx, Duration::from_secs(10));

        simulator.run(&mut cmd_rx).await;

        assert!(simulator.station().is_stale());
        assert_eq!(simulator.reader().visits(), 0);
        assert!(simulator.station().is_data_published());
    }

    #[tokio::test(start_paused = true)]
    async fn test_scripted_press_changes_mode() {
        let presses = vec![ScriptedPress {
            at_ms: 1_000,
            button: ModeButton::Meeting,
            hold_ms: 100,
        }];
        let mut simulator = Simulator::new(&settings(true, presses)).unwrap();
        let (cmd_tx, mut cmd_rx) = mpsc::channel(8);
        quit_after(cmd_tx, Duration::from_secs(5));

        simulator.run(&mut cmd_rx).await;

        let station = simulator.station();
        assert_eq!(station.workmode(), Workmode::Meeting);
        assert_eq!(station.transport().text(Field::Workmode), Some("MEETING"));
        // The reader visited after the change and acknowledged it.
        assert!(!station.is_mode_changed());
        assert!(!simulator.panel().is_pressed(ModeButton::Meeting));
    }

    #[tokio::test(start_paused = true)]
    async fn test_commands_drive_buttons_and_link() {
        let mut simulator = Simulator::new(&settings(false, Vec::new())).unwrap();
        let (cmd_tx, mut cmd_rx) = mpsc::channel(8);

        tokio::spawn(async move {
            cmd_tx.send(Command::Tap(ModeButton::DeepWork)).await.ok();
            time::sleep(Duration::from_millis(500)).await;
            cmd_tx.send(Command::Connect).await.ok();
            cmd_tx.send(Command::Status).await.ok();
            time::sleep(Duration::from_secs(3)).await;
            cmd_tx.send(Command::Quit).await.ok();
        });

        simulator.run(&mut cmd_rx).await;

        let station = simulator.station();
        assert_eq!(station.workmode(), Workmode::DeepWork);
        assert!(station.transport().is_connected());
        assert!(simulator.reader().visits() >= 1);
        assert!(!simulator.panel().is_pressed(ModeButton::DeepWork));
    }
}
