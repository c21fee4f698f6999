//! Echo parameter descriptors: the named control surface over the register bank.

use std::ops::RangeInclusive;

use four_cc::FourCC;
use strum::{Display, EnumIter, EnumString};

use crate::Error;

// -------------------------------------------------------------------------------------------------

/// The set of named echo registers settable via
/// [`EchoEffect::set_parameter`](crate::EchoEffect::set_parameter).
///
/// Each key addresses one byte-sized register of the bank; [`description`](Self::description)
/// exposes its address, factory default and value interpretation for UIs and automation.
/// Registers without a named key here (`ESA`, `FLG`) are reachable through the raw bank access
/// of [`EchoRegisters`](crate::EchoRegisters).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, EnumIter, EnumString)]
pub enum EchoParameter {
    /// Echo enable switch (`EON` bit 0): gates the input into the echo path.
    EchoEnable,
    /// Echo delay length (`EDL`, low nibble): selects the ring buffer window.
    DelayLength,
    /// Echo feedback coefficient (`EFB`), signed.
    Feedback,
    /// Main (dry) output volume, left (`MVOLL`), signed.
    MainVolumeL,
    /// Main (dry) output volume, right (`MVOLR`), signed.
    MainVolumeR,
    /// Echo (wet) output volume, left (`EVOLL`), signed.
    EchoVolumeL,
    /// Echo (wet) output volume, right (`EVOLR`), signed.
    EchoVolumeR,
    /// FIR filter coefficient 0 (the oldest tap), signed.
    Fir0,
    /// FIR filter coefficient 1, signed.
    Fir1,
    /// FIR filter coefficient 2, signed.
    Fir2,
    /// FIR filter coefficient 3, signed.
    Fir3,
    /// FIR filter coefficient 4, signed.
    Fir4,
    /// FIR filter coefficient 5, signed.
    Fir5,
    /// FIR filter coefficient 6, signed.
    Fir6,
    /// FIR filter coefficient 7 (the newest tap), signed.
    Fir7,
}

impl EchoParameter {
    /// Parses a parameter from its key string, e.g. "Feedback" or "Fir3".
    pub fn from_name(name: &str) -> Result<Self, Error> {
        name.parse()
            .map_err(|_| Error::ParameterError(format!("Unknown parameter key: '{name}'")))
    }

    /// Register bank address of the parameter's byte.
    pub const fn address(self) -> u8 {
        match self {
            Self::EchoEnable => 0x4D,
            Self::DelayLength => 0x7D,
            Self::Feedback => 0x0D,
            Self::MainVolumeL => 0x0C,
            Self::MainVolumeR => 0x1C,
            Self::EchoVolumeL => 0x2C,
            Self::EchoVolumeR => 0x3C,
            Self::Fir0 => 0x0F,
            Self::Fir1 => 0x1F,
            Self::Fir2 => 0x2F,
            Self::Fir3 => 0x3F,
            Self::Fir4 => 0x4F,
            Self::Fir5 => 0x5F,
            Self::Fir6 => 0x6F,
            Self::Fir7 => 0x7F,
        }
    }

    /// Descriptor of the parameter's register byte.
    pub fn description(self) -> ByteParameter {
        let address = self.address();
        match self {
            Self::EchoEnable => {
                ByteParameter::new(FourCC(*b"eon "), "Echo Enable", address, 0x01).with_mask(0x01)
            }
            Self::DelayLength => {
                ByteParameter::new(FourCC(*b"edl "), "Delay Length", address, 0x05).with_mask(0x0F)
            }
            Self::Feedback => {
                ByteParameter::new(FourCC(*b"efb "), "Feedback", address, 0x60).signed()
            }
            Self::MainVolumeL => {
                ByteParameter::new(FourCC(*b"mvl "), "Main Volume L", address, 0x60).signed()
            }
            Self::MainVolumeR => {
                ByteParameter::new(FourCC(*b"mvr "), "Main Volume R", address, 0x60).signed()
            }
            Self::EchoVolumeL => {
                ByteParameter::new(FourCC(*b"evl "), "Echo Volume L", address, 0x30).signed()
            }
            Self::EchoVolumeR => {
                ByteParameter::new(FourCC(*b"evr "), "Echo Volume R", address, 0x30).signed()
            }
            Self::Fir0 => ByteParameter::new(FourCC(*b"fir0"), "FIR 0", address, 0x00).signed(),
            Self::Fir1 => ByteParameter::new(FourCC(*b"fir1"), "FIR 1", address, 0x00).signed(),
            Self::Fir2 => ByteParameter::new(FourCC(*b"fir2"), "FIR 2", address, 0x00).signed(),
            Self::Fir3 => ByteParameter::new(FourCC(*b"fir3"), "FIR 3", address, 0x00).signed(),
            Self::Fir4 => ByteParameter::new(FourCC(*b"fir4"), "FIR 4", address, 0x00).signed(),
            Self::Fir5 => ByteParameter::new(FourCC(*b"fir5"), "FIR 5", address, 0x00).signed(),
            Self::Fir6 => ByteParameter::new(FourCC(*b"fir6"), "FIR 6", address, 0x00).signed(),
            Self::Fir7 => ByteParameter::new(FourCC(*b"fir7"), "FIR 7", address, 0x7F).signed(),
        }
    }
}

// -------------------------------------------------------------------------------------------------

/// Describes a single byte-sized echo register for use in UIs or for automation.
///
/// Every possible byte pattern is a legal register value. The descriptor only defines how the
/// byte is interpreted: signed registers read as two's complement, masked registers use the low
/// bits of the byte. The interpreted value drives the normalized \[0, 1\] mapping.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ByteParameter {
    id: FourCC,
    name: &'static str,
    address: u8,
    default: u8,
    mask: u8,
    signed: bool,
}

impl ByteParameter {
    pub const fn new(id: FourCC, name: &'static str, address: u8, default: u8) -> Self {
        Self {
            id,
            name,
            address,
            default,
            mask: 0xFF,
            signed: false,
        }
    }

    /// Marks the register as two's complement signed.
    pub const fn signed(mut self) -> Self {
        self.signed = true;
        self
    }

    /// Limits the interpreted value to the low bits selected by `mask`.
    pub const fn with_mask(mut self, mask: u8) -> Self {
        self.mask = mask;
        self
    }

    /// The unique id of the parameter.
    pub const fn id(&self) -> FourCC {
        self.id
    }

    /// The name of the parameter.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Register bank address of the parameter's byte.
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Factory default register byte.
    pub const fn default_value(&self) -> u8 {
        self.default
    }

    /// True when the register byte reads as two's complement.
    pub const fn is_signed(&self) -> bool {
        self.signed
    }

    /// Range of the interpreted register value.
    pub const fn range(&self) -> RangeInclusive<i32> {
        if self.signed {
            -128..=127
        } else {
            0..=self.mask as i32
        }
    }

    /// Interpreted value of a raw register byte.
    pub const fn byte_to_value(&self, byte: u8) -> i32 {
        if self.signed {
            byte as i8 as i32
        } else {
            (byte & self.mask) as i32
        }
    }

    /// Raw register byte for an interpreted value. Out-of-range values are clamped.
    pub fn value_to_byte(&self, value: i32) -> u8 {
        self.clamp_value(value) as u8
    }

    pub fn clamp_value(&self, value: i32) -> i32 {
        value.clamp(*self.range().start(), *self.range().end())
    }

    pub fn normalize_value(&self, value: i32) -> f32 {
        let range = self.range();
        (value as f32 - *range.start() as f32) / (*range.end() as f32 - *range.start() as f32)
    }

    pub fn denormalize_value(&self, normalized: f32) -> i32 {
        assert!((0.0..=1.0).contains(&normalized));
        let range = self.range();
        let value = *range.start() as f32
            + normalized * (*range.end() as f32 - *range.start() as f32);
        value.round() as i32
    }
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn parameter_addresses() {
        // Test named register addresses
        assert_eq!(EchoParameter::MainVolumeL.address(), 0x0C);
        assert_eq!(EchoParameter::MainVolumeR.address(), 0x1C);
        assert_eq!(EchoParameter::EchoVolumeL.address(), 0x2C);
        assert_eq!(EchoParameter::EchoVolumeR.address(), 0x3C);
        assert_eq!(EchoParameter::Feedback.address(), 0x0D);
        assert_eq!(EchoParameter::EchoEnable.address(), 0x4D);
        assert_eq!(EchoParameter::DelayLength.address(), 0x7D);

        // Test FIR coefficient address stride
        let fir = [
            EchoParameter::Fir0,
            EchoParameter::Fir1,
            EchoParameter::Fir2,
            EchoParameter::Fir3,
            EchoParameter::Fir4,
            EchoParameter::Fir5,
            EchoParameter::Fir6,
            EchoParameter::Fir7,
        ];
        for (index, parameter) in fir.iter().enumerate() {
            assert_eq!(parameter.address(), 0x0F + (index as u8) * 0x10);
        }

        // Test description addresses match and ids are unique
        let mut ids = Vec::new();
        for parameter in EchoParameter::iter() {
            let description = parameter.description();
            assert_eq!(description.address(), parameter.address());
            assert!(!ids.contains(&description.id()));
            ids.push(description.id());
        }
        assert_eq!(ids.len(), 15);
    }

    #[test]
    fn parameter_names() {
        // Test key string round-trip
        for parameter in EchoParameter::iter() {
            assert_eq!(
                EchoParameter::from_name(&parameter.to_string()).unwrap(),
                parameter
            );
        }
        assert!(matches!(
            EchoParameter::from_name("Resonance"),
            Err(Error::ParameterError(_))
        ));
    }

    #[test]
    fn byte_interpretation() {
        // Test signed registers
        let feedback = EchoParameter::Feedback.description();
        assert!(feedback.is_signed());
        assert_eq!(feedback.byte_to_value(0xFF), -1);
        assert_eq!(feedback.byte_to_value(0x7F), 127);
        assert_eq!(feedback.byte_to_value(0x80), -128);
        assert_eq!(feedback.value_to_byte(-1), 0xFF);
        assert_eq!(feedback.value_to_byte(300), 0x7F);

        // Test masked registers
        let delay = EchoParameter::DelayLength.description();
        assert_eq!(delay.range(), 0..=15);
        assert_eq!(delay.byte_to_value(0xF3), 3);
        assert_eq!(delay.value_to_byte(99), 0x0F);

        let enable = EchoParameter::EchoEnable.description();
        assert_eq!(enable.byte_to_value(0xFE), 0);
        assert_eq!(enable.byte_to_value(0x01), 1);

        // Test defaults
        assert_eq!(feedback.default_value(), 0x60);
        assert_eq!(EchoParameter::Fir7.description().default_value(), 0x7F);
        assert_eq!(EchoParameter::Fir0.description().default_value(), 0x00);
    }

    #[test]
    fn normalized_values() {
        // Test signed register mapping
        let volume = EchoParameter::MainVolumeL.description();
        assert_eq!(volume.denormalize_value(0.0), -128);
        assert_eq!(volume.denormalize_value(1.0), 127);
        assert_eq!(volume.normalize_value(-128), 0.0);
        assert_eq!(volume.normalize_value(127), 1.0);

        // Test round-trip over the whole interpreted range
        for value in -128..=127 {
            let normalized = volume.normalize_value(value);
            assert!((0.0..=1.0).contains(&normalized));
            assert_eq!(volume.denormalize_value(normalized), value);
        }

        // Test masked register mapping
        let delay = EchoParameter::DelayLength.description();
        assert_eq!(delay.denormalize_value(0.0), 0);
        assert_eq!(delay.denormalize_value(1.0), 15);
        for value in 0..=15 {
            assert_eq!(delay.denormalize_value(delay.normalize_value(value)), value);
        }
    }
}
