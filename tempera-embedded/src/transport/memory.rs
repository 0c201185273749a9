use alloc::collections::{BTreeMap, VecDeque};
use alloc::string::{String, ToString};

use crate::error::Error;

use super::{Access, AckHandshake, Field, FieldValue, Transport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredValue {
    Text(String),
    Flag(bool),
}

impl StoredValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            StoredValue::Text(text) => Some(text),
            StoredValue::Flag(_) => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            StoredValue::Flag(flag) => Some(*flag),
            StoredValue::Text(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum RemoteEvent {
    Connected,
    Disconnected,
    Written(Field, bool),
}

/// Characteristic table kept in memory, with a remote side driven by the
/// owner. Used by the host simulator and in tests.
///
/// Remote writes are queued and only reach the handshake on the next
/// [`Transport::poll`], the way a radio stack delivers its callbacks.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    values: BTreeMap<Field, StoredValue>,
    pending: VecDeque<RemoteEvent>,
    connected: bool,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn value(&self, field: Field) -> Option<&StoredValue> {
        self.values.get(&field)
    }

    pub fn text(&self, field: Field) -> Option<&str> {
        self.value(field).and_then(StoredValue::as_text)
    }

    pub fn flag(&self, field: Field) -> Option<bool> {
        self.value(field).and_then(StoredValue::as_flag)
    }

    pub fn connect(&mut self) {
        if !self.connected {
            self.connected = true;
            self.pending.push_back(RemoteEvent::Connected);
        }
    }

    pub fn disconnect(&mut self) {
        if self.connected {
            self.connected = false;
            self.pending.push_back(RemoteEvent::Disconnected);
        }
    }

    /// Read a field as the remote peer would.
    pub fn remote_read(&self, field: Field) -> Result<StoredValue, Error> {
        if !self.connected {
            return Err(Error::NotConnected);
        }

        self.values.get(&field).cloned().ok_or(Error::UnknownField)
    }

    /// Write an ack flag as the remote peer would.
    pub fn remote_write(&mut self, field: Field, flag: bool) -> Result<(), Error> {
        if !self.connected {
            return Err(Error::NotConnected);
        }
        if field.access() != Access::ReadWrite {
            return Err(Error::InvalidCommand);
        }

        self.values.insert(field, StoredValue::Flag(flag));
        self.pending.push_back(RemoteEvent::Written(field, flag));
        Ok(())
    }
}

impl Transport for MemoryTransport {
    fn poll(&mut self, acks: &mut AckHandshake) -> Result<(), Error> {
        while let Some(event) = self.pending.pop_front() {
            match event {
                RemoteEvent::Connected => log::info!("Remote reader connected"),
                RemoteEvent::Disconnected => log::info!("Remote reader disconnected"),
                RemoteEvent::Written(Field::DataReadAck, true) => acks.acknowledge_data(),
                RemoteEvent::Written(Field::ModeReadAck, true) => acks.acknowledge_mode(),
                RemoteEvent::Written(field, flag) => {
                    log::debug!("Ignoring write of {} to {}", flag as u8, field)
                }
            }
        }

        Ok(())
    }

    fn publish(&mut self, field: Field, value: FieldValue<'_>) -> Result<(), Error> {
        let stored = match (field.access(), value) {
            (Access::Read, FieldValue::Text(text)) if text.len() <= field.capacity() => {
                StoredValue::Text(text.to_string())
            }
            (Access::ReadWrite, FieldValue::Flag(flag)) => StoredValue::Flag(flag),
            _ => return Err(Error::InvalidCommand),
        };

        self.values.insert(field, stored);
        Ok(())
    }
}
