use core::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    SensorUnavailable,
    SensorReadingOutOfRange,
    NotConnected,
    InvalidCommand,
    UnknownField,
    InitializationError,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::SensorUnavailable => write!(f, "Sensor unavailable"),
            Error::SensorReadingOutOfRange => write!(f, "Sensor reading out of valid range"),
            Error::NotConnected => write!(f, "Not connected"),
            Error::InvalidCommand => write!(f, "Invalid command"),
            Error::UnknownField => write!(f, "Unknown field"),
            Error::InitializationError => write!(f, "Initialization error"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;
