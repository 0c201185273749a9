use embedded_hal::digital::InputPin;
use serde::{Deserialize, Serialize};

use crate::types::Workmode;

/// Physical mode-select buttons, listed in tie-break priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeButton {
    InOffice,
    DeepWork,
    Meeting,
    OutOfOffice,
}

impl ModeButton {
    /// Scan order. When several buttons are held, the first one here wins.
    pub const PRIORITY: [ModeButton; 4] = [
        ModeButton::InOffice,
        ModeButton::DeepWork,
        ModeButton::Meeting,
        ModeButton::OutOfOffice,
    ];

    pub fn workmode(&self) -> Workmode {
        match self {
            ModeButton::InOffice => Workmode::Available,
            ModeButton::DeepWork => Workmode::DeepWork,
            ModeButton::Meeting => Workmode::Meeting,
            ModeButton::OutOfOffice => Workmode::OutOfOffice,
        }
    }
}

/// Throttled reader for the four active-low mode buttons.
///
/// Pins are given in [`ModeButton::PRIORITY`] order. After an accepted press
/// further presses are ignored for `throttle_ms`, which also swallows contact
/// bounce and a button held across several polls.
pub struct ModeSelector<Pin>
where
    Pin: InputPin,
{
    pins: [Pin; 4],
    throttle_ms: u64,
    next_allowed_ms: u64,
}

impl<Pin> ModeSelector<Pin>
where
    Pin: InputPin,
{
    pub fn new(pins: [Pin; 4], throttle_ms: u64) -> Self {
        Self {
            pins,
            throttle_ms,
            next_allowed_ms: 0,
        }
    }

    /// Allow the next press from `now_ms` on.
    pub fn reset(&mut self, now_ms: u64) {
        self.next_allowed_ms = now_ms;
    }

    pub fn next_allowed_ms(&self) -> u64 {
        self.next_allowed_ms
    }

    /// First held button in priority order. A pin that fails to read counts
    /// as released.
    pub fn pressed_button(&mut self) -> Option<ModeButton> {
        ModeButton::PRIORITY
            .into_iter()
            .zip(self.pins.iter_mut())
            .find_map(|(button, pin)| pin.is_low().unwrap_or(false).then_some(button))
    }

    /// Returns the requested mode if a press is accepted at `now_ms`.
    ///
    /// Re-pressing the button of the current mode is accepted as well; the
    /// caller re-announces the mode in that case.
    pub fn try_change_mode(&mut self, now_ms: u64) -> Option<Workmode> {
        if now_ms < self.next_allowed_ms {
            return None;
        }

        let button = self.pressed_button()?;
        self.next_allowed_ms = now_ms + self.throttle_ms;

        Some(button.workmode())
    }
}

#[cfg(test)]
pub mod mock {
    use alloc::rc::Rc;
    use core::cell::Cell;
    use core::convert::Infallible;

    use embedded_hal::digital::ErrorType;

    use super::*;

    /// Button pin whose level is shared with the test. `true` means held.
    #[derive(Debug, Clone, Default)]
    pub struct MockButton {
        pub pressed: Rc<Cell<bool>>,
    }

    impl ErrorType for MockButton {
        type Error = Infallible;
    }

    impl InputPin for MockButton {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.pressed.get())
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(self.pressed.get())
        }
    }

    pub fn mock_buttons() -> ([MockButton; 4], [Rc<Cell<bool>>; 4]) {
        let pins: [MockButton; 4] = Default::default();
        let handles = [
            pins[0].pressed.clone(),
            pins[1].pressed.clone(),
            pins[2].pressed.clone(),
            pins[3].pressed.clone(),
        ];
        (pins, handles)
    }

    const IN_OFFICE: usize = 0;
    const DEEP_WORK: usize = 1;
    const MEETING: usize = 2;
    const OUT_OF_OFFICE: usize = 3;

    #[test]
    fn test_no_press_no_change() {
        let (pins, _) = mock_buttons();
        let mut selector = ModeSelector::new(pins, 1000);

        assert_eq!(selector.try_change_mode(0), None);
        assert_eq!(selector.try_change_mode(5000), None);
        assert_eq!(selector.next_allowed_ms(), 0);
    }

    #[test]
    fn test_each_button_maps_to_mode() {
        let cases = [
            (IN_OFFICE, Workmode::Available),
            (DEEP_WORK, Workmode::DeepWork),
            (MEETING, Workmode::Meeting),
            (OUT_OF_OFFICE, Workmode::OutOfOffice),
        ];

        for (index, expected) in cases {
            let (pins, buttons) = mock_buttons();
            let mut selector = ModeSelector::new(pins, 1000);

            buttons[index].set(true);
            assert_eq!(selector.try_change_mode(0), Some(expected));
        }
    }

    #[test]
    fn test_priority_order() {
        let (pins, buttons) = mock_buttons();
        let mut selector = ModeSelector::new(pins, 1000);

        buttons[IN_OFFICE].set(true);
        buttons[MEETING].set(true);
        assert_eq!(selector.try_change_mode(0), Some(Workmode::Available));

        buttons[IN_OFFICE].set(false);
        buttons[DEEP_WORK].set(true);
        buttons[OUT_OF_OFFICE].set(true);
        assert_eq!(selector.try_change_mode(1000), Some(Workmode::DeepWork));
    }

    #[test]
    fn test_throttle_blocks_second_press() {
        let (pins, buttons) = mock_buttons();
        let mut selector = ModeSelector::new(pins, 1000);

        buttons[IN_OFFICE].set(true);
        assert_eq!(selector.try_change_mode(0), Some(Workmode::Available));
        buttons[IN_OFFICE].set(false);

        buttons[MEETING].set(true);
        assert_eq!(selector.try_change_mode(500), None);
        assert_eq!(selector.try_change_mode(999), None);
        assert_eq!(selector.try_change_mode(1000), Some(Workmode::Meeting));
        assert_eq!(selector.next_allowed_ms(), 2000);
    }

    #[test]
    fn test_held_button_repeats_after_throttle() {
        let (pins, buttons) = mock_buttons();
        let mut selector = ModeSelector::new(pins, 1000);

        buttons[DEEP_WORK].set(true);
        assert_eq!(selector.try_change_mode(0), Some(Workmode::DeepWork));
        assert_eq!(selector.try_change_mode(10), None);
        assert_eq!(selector.try_change_mode(1000), Some(Workmode::DeepWork));
    }

    #[test]
    fn test_reset_moves_gate() {
        let (pins, buttons) = mock_buttons();
        let mut selector = ModeSelector::new(pins, 1000);
        selector.reset(5000);

        buttons[MEETING].set(true);
        assert_eq!(selector.try_change_mode(4999), None);
        assert_eq!(selector.try_change_mode(5000), Some(Workmode::Meeting));
    }
}
