/// Result of draining the acknowledgment flags for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AckSnapshot {
    pub data_acked: bool,
    pub mode_acked: bool,
}

/// Level-triggered acknowledgments from the remote reader.
///
/// The transport sets a flag each time the reader acknowledges; the
/// controller drains both once per tick. Several acknowledgments between two
/// drains collapse into one.
#[derive(Debug, Clone, Default)]
pub struct AckHandshake {
    data_read: bool,
    mode_read: bool,
}

impl AckHandshake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acknowledge_data(&mut self) {
        self.data_read = true;
    }

    pub fn acknowledge_mode(&mut self) {
        self.mode_read = true;
    }

    /// Discard a pending mode acknowledgment so only one given after a new
    /// mode was published counts.
    pub fn clear_mode_read(&mut self) {
        self.mode_read = false;
    }

    pub fn is_data_pending(&self) -> bool {
        self.data_read
    }

    pub fn is_mode_pending(&self) -> bool {
        self.mode_read
    }

    pub fn drain(&mut self) -> AckSnapshot {
        AckSnapshot {
            data_acked: core::mem::take(&mut self.data_read),
            mode_acked: core::mem::take(&mut self.mode_read),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_clears_flags() {
        let mut acks = AckHandshake::new();
        acks.acknowledge_data();

        assert_eq!(
            acks.drain(),
            AckSnapshot {
                data_acked: true,
                mode_acked: false
            }
        );
        assert_eq!(acks.drain(), AckSnapshot::default());
    }

    #[test]
    fn test_repeated_acks_collapse() {
        let mut acks = AckHandshake::new();
        acks.acknowledge_mode();
        acks.acknowledge_mode();
        acks.acknowledge_data();
        acks.acknowledge_data();

        let snapshot = acks.drain();
        assert!(snapshot.data_acked);
        assert!(snapshot.mode_acked);
        assert!(!acks.is_data_pending());
        assert!(!acks.is_mode_pending());
    }

    #[test]
    fn test_clear_mode_read_keeps_data() {
        let mut acks = AckHandshake::new();
        acks.acknowledge_mode();
        acks.acknowledge_data();
        acks.clear_mode_read();

        let snapshot = acks.drain();
        assert!(snapshot.data_acked);
        assert!(!snapshot.mode_acked);
    }
}
