use config::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MockError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Station error: {0}")]
    Station(#[from] tempera_embedded::Error),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Invalid simulation parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, MockError>;
