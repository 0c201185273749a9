#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod control;
pub mod error;
pub mod indicator;
pub mod input;
pub mod sensor;
pub mod time;
pub mod transport;
pub mod types;

pub use control::*;
pub use error::*;
pub use types::*;
