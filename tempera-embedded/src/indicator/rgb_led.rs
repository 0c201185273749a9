use embedded_hal::pwm::SetDutyCycle;

use super::{Rgb, RgbSink};

/// Common-cathode RGB LED on three PWM channels.
pub struct PwmRgbLed<R, G, B>
where
    R: SetDutyCycle,
    G: SetDutyCycle,
    B: SetDutyCycle,
{
    red: R,
    green: G,
    blue: B,
    current: Option<Rgb>,
}

impl<R, G, B> PwmRgbLed<R, G, B>
where
    R: SetDutyCycle,
    G: SetDutyCycle,
    B: SetDutyCycle,
{
    pub fn new(red: R, green: G, blue: B) -> Self {
        Self {
            red,
            green,
            blue,
            current: None,
        }
    }

    pub fn current(&self) -> Option<Rgb> {
        self.current
    }

    pub fn release(self) -> (R, G, B) {
        (self.red, self.green, self.blue)
    }
}

impl<R, G, B> RgbSink for PwmRgbLed<R, G, B>
where
    R: SetDutyCycle,
    G: SetDutyCycle,
    B: SetDutyCycle,
{
    fn set_rgb(&mut self, color: Rgb) {
        if self.current == Some(color) {
            return;
        }

        self.red.set_duty_cycle_fraction(color.red as u16, 255).ok();
        self.green.set_duty_cycle_fraction(color.green as u16, 255).ok();
        self.blue.set_duty_cycle_fraction(color.blue as u16, 255).ok();
        self.current = Some(color);
    }
}
