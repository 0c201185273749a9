/// Tracks how long published data has gone without a read acknowledgment.
///
/// Once past the deadline the station stays stale until the next
/// acknowledgment moves the deadline forward.
#[derive(Debug, Clone)]
pub struct StalenessWatchdog {
    read_interval_ms: u64,
    deadline_ms: u64,
}

impl StalenessWatchdog {
    pub fn new(read_interval_ms: u64, initial_deadline_ms: u64) -> Self {
        Self {
            read_interval_ms,
            deadline_ms: initial_deadline_ms,
        }
    }

    pub fn deadline_ms(&self) -> u64 {
        self.deadline_ms
    }

    pub fn on_data_ack(&mut self, now_ms: u64) {
        self.deadline_ms = now_ms + self.read_interval_ms;
    }

    pub fn is_stale(&self, now_ms: u64) -> bool {
        now_ms > self.deadline_ms
    }
}
