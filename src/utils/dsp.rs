//! Common, shared DSP tools for the echo engine.

pub mod delay;
pub mod fir;

// -------------------------------------------------------------------------------------------------

/// Saturates a mixing result to the 16 bit sample range.
///
/// Out-of-range values fold to the nearest bound via the sign word: `(value >> 63) ^ 0x7FFF` is
/// `0x7FFF` for positive and `-0x8000` for negative overflows.
#[inline(always)]
pub fn clamp16(value: i64) -> i16 {
    if value as i16 as i64 == value {
        value as i16
    } else {
        ((value >> 63) ^ 0x7FFF) as i16
    }
}

// -------------------------------------------------------------------------------------------------
