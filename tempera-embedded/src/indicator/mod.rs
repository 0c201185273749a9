mod rgb_led;

pub use rgb_led::PwmRgbLed;

use crate::types::Workmode;

/// Intensity per channel, 0-255.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const OFF: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

/// Sink for the indicator output, typically three PWM channels.
pub trait RgbSink {
    fn set_rgb(&mut self, color: Rgb);
}

/// Indicator colors by numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LedColor {
    Off = 0,
    Red = 1,
    Blue = 2,
    Green = 3,
}

impl LedColor {
    pub fn rgb(&self) -> Rgb {
        match self {
            LedColor::Off => Rgb::OFF,
            LedColor::Red => Rgb::new(255, 0, 0),
            LedColor::Blue => Rgb::new(0, 0, 255),
            LedColor::Green => Rgb::new(0, 255, 0),
        }
    }
}

impl From<Workmode> for LedColor {
    fn from(mode: Workmode) -> Self {
        match mode {
            Workmode::OutOfOffice => LedColor::Off,
            Workmode::DeepWork => LedColor::Red,
            Workmode::Meeting => LedColor::Blue,
            Workmode::Available => LedColor::Green,
        }
    }
}

/// Alert color while published data goes unacknowledged.
pub const ALERT_COLOR: LedColor = LedColor::Red;

/// Controller conditions the indicator is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorInput {
    pub stale: bool,
    pub workmode: Workmode,
    pub last_mode_change_ms: Option<u64>,
}

/// Condition that wins for one tick, highest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorState {
    Stale,
    Quiet,
    Normal(Workmode),
}

impl IndicatorState {
    pub fn classify(input: &IndicatorInput, now_ms: u64, quiet_window_ms: u64) -> Self {
        if input.stale {
            return IndicatorState::Stale;
        }

        match input.last_mode_change_ms {
            Some(changed_at) if now_ms < changed_at + quiet_window_ms => IndicatorState::Quiet,
            _ => IndicatorState::Normal(input.workmode),
        }
    }
}

/// What the LED shows for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorPattern {
    /// Blinking alert; `lit` is the current blink phase.
    Alert { lit: bool },
    /// Forced off right after a mode change.
    Quiet,
    Solid(LedColor),
}

impl IndicatorPattern {
    pub fn rgb(&self) -> Rgb {
        match self {
            IndicatorPattern::Alert { lit: true } => ALERT_COLOR.rgb(),
            IndicatorPattern::Alert { lit: false } | IndicatorPattern::Quiet => Rgb::OFF,
            IndicatorPattern::Solid(color) => color.rgb(),
        }
    }
}

/// Turns controller state into an LED pattern.
///
/// The blink phase is derived from the time elapsed since the alert started,
/// so it toggles every `blink_interval_ms` whatever the tick rate is.
#[derive(Debug, Clone)]
pub struct StatusIndicator {
    quiet_window_ms: u64,
    blink_interval_ms: u64,
    stale_since_ms: Option<u64>,
}

impl StatusIndicator {
    pub fn new(quiet_window_ms: u64, blink_interval_ms: u64) -> Self {
        Self {
            quiet_window_ms,
            blink_interval_ms: blink_interval_ms.max(1),
            stale_since_ms: None,
        }
    }

    /// Alert phase at `now_ms`. The first phase is dark, the LED rests lit.
    fn alert_lit(&mut self, now_ms: u64) -> bool {
        let since = *self.stale_since_ms.get_or_insert(now_ms);
        let phase = now_ms.saturating_sub(since) / self.blink_interval_ms;

        phase % 2 == 1
    }

    pub fn update(&mut self, input: &IndicatorInput, now_ms: u64) -> IndicatorPattern {
        match IndicatorState::classify(input, now_ms, self.quiet_window_ms) {
            IndicatorState::Stale => IndicatorPattern::Alert {
                lit: self.alert_lit(now_ms),
            },
            IndicatorState::Quiet => {
                self.stale_since_ms = None;
                IndicatorPattern::Quiet
            }
            IndicatorState::Normal(mode) => {
                self.stale_since_ms = None;
                IndicatorPattern::Solid(mode.into())
            }
        }
    }
}
