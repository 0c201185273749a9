use crate::types::{AverageSample, Sample};

pub const DEFAULT_WINDOW_LEN: usize = 6;

/// Fixed-capacity ring of samples, averaged once per full revolution.
#[derive(Debug, Clone)]
pub struct SampleWindow<const N: usize = DEFAULT_WINDOW_LEN> {
    slots: [Sample; N],
    cursor: usize,
    wrapped: bool,
}

impl<const N: usize> SampleWindow<N> {
    pub fn new() -> Self {
        const { assert!(N > 0, "sample window needs at least one slot") };

        Self {
            slots: [Sample::default(); N],
            cursor: 0,
            wrapped: false,
        }
    }

    /// Slot the next write lands in.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Stores `sample` at the cursor. Returns `true` when this write completed a
    /// revolution, i.e. on every N-th write.
    pub fn write(&mut self, sample: Sample) -> bool {
        self.slots[self.cursor] = sample;
        self.cursor = (self.cursor + 1) % N;

        if self.cursor == 0 {
            self.wrapped = true;
            true
        } else {
            false
        }
    }

    /// Whether every slot has been written at least once.
    pub fn is_full(&self) -> bool {
        self.wrapped
    }

    /// Per-field mean over all slots. Before the first revolution this includes
    /// slots that were never written; see [`SampleWindow::completed_average`].
    pub fn average(&self) -> AverageSample {
        let mut temperature = 0.0f32;
        let mut humidity = 0.0f32;
        let mut pollution_index = 0.0f32;
        let mut light_intensity = 0i32;

        for slot in self.slots.iter() {
            temperature += slot.temperature;
            humidity += slot.humidity;
            pollution_index += slot.pollution_index;
            light_intensity += slot.light_intensity;
        }

        AverageSample {
            temperature: temperature / N as f32,
            humidity: humidity / N as f32,
            light_intensity: light_intensity / N as i32,
            pollution_index: pollution_index / N as f32,
        }
    }

    pub fn completed_average(&self) -> Option<AverageSample> {
        self.is_full().then(|| self.average())
    }
}

impl<const N: usize> Default for SampleWindow<N> {
    fn default() -> Self {
        Self::new()
    }
}
