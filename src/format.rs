use byteorder::{BigEndian, ByteOrder, LittleEndian};
use strum::{Display, EnumIter, EnumString};

use crate::Error;

// -------------------------------------------------------------------------------------------------

/// Raw sample layout of the interleaved PCM stream an [`EchoEffect`](crate::EchoEffect)
/// processes.
///
/// The serialized names ("S16LE", "F32BE", ...) are the format names audio drivers and their
/// config files commonly use, so values parse directly from driver configuration strings. Parsing
/// is case-insensitive.
///
/// All layouts decode into the same fixed-point domain: the 16 bit PCM value shifted left by 7,
/// which leaves headroom for the echo's FIR and mixing stages. Float samples quantize to 16 bits
/// first, so processing float streams sounds identical to processing their 16 bit counterparts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Display, EnumIter, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum SampleFormat {
    /// Signed 16 bit integer samples, little-endian.
    #[default]
    #[strum(serialize = "S16LE")]
    S16Le,
    /// Signed 16 bit integer samples, big-endian.
    #[strum(serialize = "S16BE")]
    S16Be,
    /// 32 bit float samples, little-endian.
    #[strum(serialize = "F32LE")]
    F32Le,
    /// 32 bit float samples, big-endian.
    #[strum(serialize = "F32BE")]
    F32Be,
}

impl SampleFormat {
    /// Parses a driver format name such as "S16LE" or "F32BE".
    pub fn from_name(name: &str) -> Result<Self, Error> {
        name.parse()
            .map_err(|_| Error::UnsupportedFormat(name.to_string()))
    }

    /// Number of bytes a single sample occupies in the raw stream.
    #[inline]
    pub const fn bytes_per_sample(&self) -> usize {
        match self {
            Self::S16Le | Self::S16Be => 2,
            Self::F32Le | Self::F32Be => 4,
        }
    }

    /// Returns true for the 32 bit float layouts.
    #[inline]
    pub const fn is_float(&self) -> bool {
        matches!(self, Self::F32Le | Self::F32Be)
    }

    /// Returns true for the big-endian layouts.
    #[inline]
    pub const fn is_big_endian(&self) -> bool {
        matches!(self, Self::S16Be | Self::F32Be)
    }

    /// Decodes the sample at the start of `bytes` into the shared fixed-point domain.
    ///
    /// Panics when `bytes` holds less than [`bytes_per_sample`](Self::bytes_per_sample) bytes.
    #[inline]
    pub fn read_sample(&self, bytes: &[u8]) -> i32 {
        match self {
            Self::S16Le => i32::from(LittleEndian::read_i16(bytes)) << 7,
            Self::S16Be => i32::from(BigEndian::read_i16(bytes)) << 7,
            Self::F32Le => Self::quantize(LittleEndian::read_f32(bytes)),
            Self::F32Be => Self::quantize(BigEndian::read_f32(bytes)),
        }
    }

    /// Encodes a processed 16 bit sample value at the start of `bytes`.
    ///
    /// Panics when `bytes` holds less than [`bytes_per_sample`](Self::bytes_per_sample) bytes.
    #[inline]
    pub fn write_sample(&self, bytes: &mut [u8], value: i16) {
        match self {
            Self::S16Le => LittleEndian::write_i16(bytes, value),
            Self::S16Be => BigEndian::write_i16(bytes, value),
            Self::F32Le => LittleEndian::write_f32(bytes, f32::from(value) / 32768.0),
            Self::F32Be => BigEndian::write_f32(bytes, f32::from(value) / 32768.0),
        }
    }

    // Round to 16 bits, then shift into the headroom domain. f64 keeps the intermediate exact
    // and the final cast saturates, so NaN and out-of-range floats can't wrap.
    #[inline]
    fn quantize(value: f32) -> i32 {
        ((f64::from(value) * 32768.0).round() * 128.0) as i32
    }
}

// -------------------------------------------------------------------------------------------------
