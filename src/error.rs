use std::{error, fmt};

// -------------------------------------------------------------------------------------------------

/// Provides an enumeration of all possible errors reported by specho.
#[derive(Debug)]
pub enum Error {
    UnsupportedFormat(String),
    InvalidChannelCount(usize),
    ParameterError(String),
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedFormat(name) => {
                write!(f, "Unsupported sample format: '{name}'")
            }
            Self::InvalidChannelCount(channel_count) => {
                write!(f, "Unsupported channel count: {channel_count}")
            }
            Self::ParameterError(str) => write!(f, "Invalid parameter: {str}"),
        }
    }
}
