//! The echo register bank and its typed views.

use strum::IntoEnumIterator;

use crate::parameter::EchoParameter;

// -------------------------------------------------------------------------------------------------

/// 128 byte-addressable register slots at the native S-DSP offsets.
///
/// The bank holds every echo parameter as a raw byte: mix volumes at `0x0C/0x1C` and
/// `0x2C/0x3C`, feedback at `0x0D`, the FIR coefficients at `0x0F + n * 0x10`, echo enable at
/// `0x4D`, flags at `0x6C`, the echo region base at `0x6D` and the delay length at `0x7D`.
/// Slots in between are unused by the echo unit but remain readable and writable, so complete
/// S-DSP register dumps can be replayed onto the bank byte by byte.
///
/// Any byte pattern is a legal value for any register. Addresses wrap at the bank size, as the
/// hardware's 7 bit register addressing does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EchoRegisters {
    bank: [u8; Self::SIZE],
}

impl EchoRegisters {
    /// Number of register slots in the bank.
    pub const SIZE: usize = 128;

    /// `FLG` register address: global flag bits.
    pub const FLG_ADDRESS: u8 = 0x6C;
    /// `ESA` register address: echo region base, in `0x100` byte pages.
    pub const ESA_ADDRESS: u8 = 0x6D;

    /// `FLG` bit disabling echo buffer writes while the echo keeps circulating.
    pub const FLG_ECHO_WRITE_DISABLE: u8 = 0x20;
    /// `FLG` bit muting the effect output.
    pub const FLG_MUTE: u8 = 0x40;

    /// Creates a bank initialized to the factory preset: a moderately fed back echo with an
    /// identity FIR response, echo enabled, no flags set.
    pub fn new() -> Self {
        let mut registers = Self {
            bank: [0; Self::SIZE],
        };
        registers.reset_to_defaults();
        registers
    }

    /// Restores every register to the factory preset, including the unnamed slots.
    pub fn reset_to_defaults(&mut self) {
        self.bank.fill(0);
        for parameter in EchoParameter::iter() {
            let description = parameter.description();
            self.write(description.address(), description.default_value());
        }
    }

    /// Reads the raw byte at `address`. Addresses wrap at the bank size.
    #[inline]
    pub fn read(&self, address: u8) -> u8 {
        self.bank[(address as usize) & (Self::SIZE - 1)]
    }

    /// Writes the raw byte at `address`. Addresses wrap at the bank size.
    #[inline]
    pub fn write(&mut self, address: u8, value: u8) {
        self.bank[(address as usize) & (Self::SIZE - 1)] = value;
    }

    /// Reads the register byte of a named parameter.
    #[inline]
    pub fn parameter(&self, parameter: EchoParameter) -> u8 {
        self.read(parameter.address())
    }

    /// Writes the register byte of a named parameter.
    #[inline]
    pub fn set_parameter(&mut self, parameter: EchoParameter, value: u8) {
        self.write(parameter.address(), value);
    }

    /// Main (dry) output volumes for the left and right channel.
    #[inline]
    pub fn main_volume(&self) -> (i8, i8) {
        (
            self.read(EchoParameter::MainVolumeL.address()) as i8,
            self.read(EchoParameter::MainVolumeR.address()) as i8,
        )
    }

    /// Echo (wet) output volumes for the left and right channel.
    #[inline]
    pub fn echo_volume(&self) -> (i8, i8) {
        (
            self.read(EchoParameter::EchoVolumeL.address()) as i8,
            self.read(EchoParameter::EchoVolumeR.address()) as i8,
        )
    }

    /// Echo feedback coefficient.
    #[inline]
    pub fn feedback(&self) -> i8 {
        self.read(EchoParameter::Feedback.address()) as i8
    }

    /// FIR filter coefficients, tap 0 (oldest) to tap 7 (newest).
    #[inline]
    pub fn fir(&self) -> [i8; 8] {
        let mut fir = [0; 8];
        for (tap, coefficient) in fir.iter_mut().enumerate() {
            *coefficient = self.read(0x0F + (tap as u8) * 0x10) as i8;
        }
        fir
    }

    /// True when `EON` bit 0 feeds the input into the echo path.
    #[inline]
    pub fn echo_enabled(&self) -> bool {
        self.read(EchoParameter::EchoEnable.address()) & 0x01 != 0
    }

    /// True when `FLG` disables echo buffer writes.
    #[inline]
    pub fn echo_writes_frozen(&self) -> bool {
        self.read(Self::FLG_ADDRESS) & Self::FLG_ECHO_WRITE_DISABLE != 0
    }

    /// True when `FLG` mutes the effect output.
    #[inline]
    pub fn muted(&self) -> bool {
        self.read(Self::FLG_ADDRESS) & Self::FLG_MUTE != 0
    }

    /// Echo delay length selector: the low nibble of `EDL`.
    #[inline]
    pub fn delay_length(&self) -> u8 {
        self.read(EchoParameter::DelayLength.address()) & 0x0F
    }

    /// Echo region base offset in bytes: `ESA * 0x100`.
    #[inline]
    pub fn echo_base(&self) -> usize {
        (self.read(Self::ESA_ADDRESS) as usize) << 8
    }
}

impl Default for EchoRegisters {
    fn default() -> Self {
        Self::new()
    }
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_defaults() {
        let registers = EchoRegisters::new();

        // Test named register defaults
        assert_eq!(registers.main_volume(), (0x60, 0x60));
        assert_eq!(registers.echo_volume(), (0x30, 0x30));
        assert_eq!(registers.feedback(), 0x60);
        assert_eq!(registers.fir(), [0, 0, 0, 0, 0, 0, 0, 0x7F]);
        assert!(registers.echo_enabled());
        assert_eq!(registers.delay_length(), 0x05);

        // Test unnamed slots stay zeroed
        assert_eq!(registers.echo_base(), 0);
        assert!(!registers.echo_writes_frozen());
        assert!(!registers.muted());
        assert_eq!(registers.read(0x00), 0);
        assert_eq!(registers.read(0x23), 0);
    }

    #[test]
    fn raw_access() {
        let mut registers = EchoRegisters::new();

        // Test address wrapping
        registers.write(0x8C, 0x11);
        assert_eq!(registers.read(0x0C), 0x11);
        assert_eq!(registers.read(0x8C), 0x11);
        assert_eq!(registers.main_volume().0, 0x11);

        // Test raw and named access alias the same slot
        registers.set_parameter(EchoParameter::Feedback, 0x80);
        assert_eq!(registers.read(0x0D), 0x80);
        assert_eq!(registers.feedback(), -128);
    }

    #[test]
    fn typed_views() {
        let mut registers = EchoRegisters::new();

        // Test EON only reads bit 0
        registers.set_parameter(EchoParameter::EchoEnable, 0xFE);
        assert!(!registers.echo_enabled());
        registers.set_parameter(EchoParameter::EchoEnable, 0x03);
        assert!(registers.echo_enabled());

        // Test FLG bits
        registers.write(EchoRegisters::FLG_ADDRESS, EchoRegisters::FLG_ECHO_WRITE_DISABLE);
        assert!(registers.echo_writes_frozen());
        assert!(!registers.muted());
        registers.write(EchoRegisters::FLG_ADDRESS, EchoRegisters::FLG_MUTE);
        assert!(registers.muted());
        assert!(!registers.echo_writes_frozen());

        // Test EDL nibble masking and ESA paging
        registers.set_parameter(EchoParameter::DelayLength, 0xF7);
        assert_eq!(registers.delay_length(), 7);
        registers.write(EchoRegisters::ESA_ADDRESS, 0x12);
        assert_eq!(registers.echo_base(), 0x1200);

        // Test FIR tap ordering
        for tap in 0..8_u8 {
            registers.write(0x0F + tap * 0x10, tap + 1);
        }
        assert_eq!(registers.fir(), [1, 2, 3, 4, 5, 6, 7, 8]);

        // Test reset restores the preset
        registers.reset_to_defaults();
        assert_eq!(registers.fir(), [0, 0, 0, 0, 0, 0, 0, 0x7F]);
        assert_eq!(registers.delay_length(), 0x05);
        assert_eq!(registers.echo_base(), 0);
    }
}
