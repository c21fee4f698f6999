#![doc = include_str!("../README.md")]

// private mods (will be partly re-exported)
mod effect;
mod error;
mod format;
mod parameter;
mod registers;

// public, flat re-exports
pub use error::Error;

pub use effect::EchoEffect;
pub use format::SampleFormat;
pub use parameter::{ByteParameter, EchoParameter};
pub use registers::EchoRegisters;

// public mods
pub mod utils;
