use std::env;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use tempera_embedded::StationConfig;
use tempera_embedded::input::ModeButton;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Simulation {
    /// Period of the controller superloop
    pub tick_ms: u64,
    /// Length of one simulated day; the sensor curves repeat with it
    pub day_length_ms: u64,
    /// Chance that a single environment read fails, 0.0 to 1.0
    pub failure_probability: f64,
    pub light_adc_max: u16,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reader {
    pub poll_interval_ms: u64,
    /// Whether the access point is connected from the start
    pub connected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptedPress {
    pub at_ms: u64,
    pub button: ModeButton,
    pub hold_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub logger: Logger,
    #[serde(default)]
    pub station: StationConfig,
    pub simulation: Simulation,
    pub reader: Reader,
    #[serde(default)]
    pub presses: Vec<ScriptedPress>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or("development".into());

        Config::builder()
            .add_source(File::with_name("configs/default"))
            .add_source(File::with_name(&format!("configs/{run_mode}")).required(false))
            .add_source(
                Environment::with_prefix("TEMPERA")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    const DEFAULT_TOML: &str = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../",
        "configs/default.toml"
    ));

    #[test]
    fn test_default_config_parses() {
        let settings: Settings = Config::builder()
            .add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.station, StationConfig::default());
        assert!(settings.simulation.failure_probability >= 0.0);
        assert!(settings.simulation.failure_probability <= 1.0);
        assert_eq!(settings.simulation.light_adc_max, 1023);
        assert!(!settings.presses.is_empty());
    }

    #[test]
    fn test_station_section_is_optional() {
        let toml = r#"
            [logger]
            level = "debug"

            [simulation]
            tick_ms = 50
            day_length_ms = 600000
            failure_probability = 0.0
            light_adc_max = 4095

            [reader]
            poll_interval_ms = 1000
            connected = false
        "#;

        let settings: Settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.station, StationConfig::default());
        assert_eq!(settings.simulation.seed, None);
        assert!(settings.presses.is_empty());
    }

    #[test]
    fn test_scripted_press_buttons() {
        let toml = r#"
            [logger]
            level = "info"

            [station]
            device_id = "G4T2-TD-9"
            read_interval_ms = 30000

            [simulation]
            tick_ms = 50
            day_length_ms = 600000
            failure_probability = 0.0
            light_adc_max = 1023

            [reader]
            poll_interval_ms = 1000
            connected = true

            [[presses]]
            at_ms = 2000
            button = "deep_work"
            hold_ms = 300
        "#;

        let settings: Settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.station.device_id, "G4T2-TD-9");
        assert_eq!(settings.station.read_interval_ms, 30_000);
        assert_eq!(settings.station.sample_interval_ms, 10_000);
        assert_eq!(
            settings.presses,
            vec![ScriptedPress {
                at_ms: 2000,
                button: ModeButton::DeepWork,
                hold_ms: 300,
            }]
        );
    }
}
