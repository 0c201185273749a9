mod fields;
mod handshake;
mod memory;

pub use fields::*;
pub use handshake::{AckHandshake, AckSnapshot};
pub use memory::{MemoryTransport, StoredValue};

use crate::error::Error;

/// Characteristic-style link to the remote reader.
///
/// Remote activity is only processed inside [`Transport::poll`], on the
/// caller's thread. Implementations record remote acknowledgments by setting
/// flags on the handshake passed in and must not block.
pub trait Transport {
    /// Process pending remote events.
    fn poll(&mut self, acks: &mut AckHandshake) -> Result<(), Error>;

    /// Replace the value of a transport-facing field.
    fn publish(&mut self, field: Field, value: FieldValue<'_>) -> Result<(), Error>;
}
