use crate::{
    format::SampleFormat,
    parameter::EchoParameter,
    registers::EchoRegisters,
    utils::dsp::{clamp16, delay::EchoDelayLine, fir::FirHistory},
    Error,
};

// -------------------------------------------------------------------------------------------------

/// SPC-style echo/reverb effect, processing interleaved raw PCM chunks in-place.
///
/// One `EchoEffect` serves one audio stream: sample rate, channel count and sample format are
/// fixed at construction, which also allocates the delay memory for the largest possible echo
/// window. Afterwards [`process`](Self::process) runs allocation-free with deterministic cost
/// per frame, so it can be called directly from real-time audio callbacks.
///
/// All effect state is controlled through the [`EchoRegisters`] bank: volumes, feedback, FIR
/// coefficients, delay length and flags are register bytes, read freshly for every processed
/// frame. Register updates from a control thread must be serialized against `process` by the
/// audio subsystem's lock. This is enforced structurally: every mutating call takes
/// `&mut self`, so sharing an effect across threads means wrapping it in that lock (e.g. an
/// `Arc<Mutex<EchoEffect>>` locked in the callback), as usual in Rust.
///
/// The per-frame echo pipeline, in the fixed-point domain of [`SampleFormat`]:
///
/// 1. The frame's delay slot is read and the write cursor advances, wrapping at the active
///    window length. Delay length register changes recompute the window at the wrap only.
/// 2. The delayed frame runs through the 8 tap FIR filter over a rolling per channel history.
/// 3. Input (when echo is enabled) plus the filtered echo scaled by the feedback coefficient
///    is saturated and stored back into the frame's slot, unless echo writes are frozen.
/// 4. The output mixes dry input and filtered echo through the main and echo volumes, right
///    shifted by 14 and saturated to 16 bits. Odd channels use the right volume registers,
///    even channels the left ones.
#[derive(Debug)]
pub struct EchoEffect {
    sample_rate: u32,
    sample_format: SampleFormat,
    channel_count: usize,
    registers: EchoRegisters,
    delay: EchoDelayLine,
    fir: FirHistory,
}

impl EchoEffect {
    /// Highest supported channel count.
    pub const MAX_CHANNELS: usize = 8;

    /// Sample rate the delay length register steps are defined against.
    pub const NATIVE_SAMPLE_RATE: u32 = 32000;

    // One delay length step spans 0x800 echo bytes at the native stereo layout.
    const DELAY_STEP_FRAMES: usize = 0x800 / 4;

    /// Creates a new echo effect for a stream with the given properties.
    ///
    /// This allocates the echo delay memory, so construction belongs on a non-real-time
    /// thread. Registers start at the factory preset: a moderately fed back echo with an
    /// identity FIR response.
    pub fn new(
        sample_rate: u32,
        sample_format: SampleFormat,
        channel_count: usize,
    ) -> Result<Self, Error> {
        assert!(sample_rate > 0, "Invalid sample rate");
        if channel_count == 0 || channel_count > Self::MAX_CHANNELS {
            return Err(Error::InvalidChannelCount(channel_count));
        }

        log::debug!(
            "creating echo effect: {sample_rate} Hz, {channel_count} channel {sample_format} stream"
        );

        let registers = EchoRegisters::new();
        let max_window_frames = Self::window_frames_for(sample_rate, 0x0F);
        let delay = EchoDelayLine::new(max_window_frames, channel_count);
        let fir = FirHistory::new(channel_count);
        Ok(Self {
            sample_rate,
            sample_format,
            channel_count,
            registers,
            delay,
            fir,
        })
    }

    /// The stream's sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// The stream's raw sample layout.
    pub fn sample_format(&self) -> SampleFormat {
        self.sample_format
    }

    /// The stream's channel count.
    pub fn channel_count(&self) -> usize {
        self.channel_count
    }

    /// Size of one interleaved sample frame in bytes.
    pub fn frame_bytes(&self) -> usize {
        self.channel_count * self.sample_format.bytes_per_sample()
    }

    /// The effect's register bank.
    pub fn registers(&self) -> &EchoRegisters {
        &self.registers
    }

    /// Mutable access to the register bank, e.g. to replay raw register dumps or to reach the
    /// unnamed `ESA` and `FLG` slots.
    pub fn registers_mut(&mut self) -> &mut EchoRegisters {
        &mut self.registers
    }

    /// Reads the register byte of a named parameter.
    pub fn parameter(&self, parameter: EchoParameter) -> u8 {
        self.registers.parameter(parameter)
    }

    /// Writes the register byte of a named parameter. Takes effect on the next processed
    /// frame; delay length changes apply when the echo window next wraps around.
    pub fn set_parameter(&mut self, parameter: EchoParameter, value: u8) {
        self.registers.set_parameter(parameter, value);
    }

    /// Reads a named parameter as normalized value in range \[0, 1\].
    pub fn parameter_normalized(&self, parameter: EchoParameter) -> f32 {
        let description = parameter.description();
        description.normalize_value(description.byte_to_value(self.parameter(parameter)))
    }

    /// Writes a named parameter from a normalized value in range \[0, 1\], e.g. from an UI
    /// slider. Out of range values are clamped.
    pub fn set_parameter_normalized(&mut self, parameter: EchoParameter, normalized: f32) {
        let description = parameter.description();
        if !(0.0..=1.0).contains(&normalized) {
            log::warn!(
                "Out of range normalized value {normalized} for parameter '{}'",
                description.name()
            );
        }
        let value = description.denormalize_value(normalized.max(0.0).min(1.0));
        self.set_parameter(parameter, description.value_to_byte(value));
    }

    /// Restores all registers to the factory preset. The echo history keeps playing; use
    /// [`flush`](Self::flush) to clear it as well.
    pub fn reset_parameters(&mut self) {
        self.registers.reset_to_defaults();
    }

    /// Clears the delay memory and FIR history without touching the register bank, like a
    /// player does when the processed stream seeks.
    pub fn flush(&mut self) {
        self.delay.flush();
        self.fir.flush();
    }

    /// Number of audible sample frames one echo circulation will produce after the input went
    /// silent: the active delay window plus the FIR lookback. With feedback set the echo rings
    /// beyond that, fading with each circulation.
    pub fn tail_frames(&self) -> usize {
        self.delay.window_frames() + 8
    }

    /// Processes a chunk of interleaved raw samples in-place.
    ///
    /// The chunk is expected to hold whole sample frames in the stream's format; a trailing
    /// partial frame is left untouched. Chunks shorter than one frame are a no-op.
    ///
    /// This is the real-time path: it must not block and does not allocate. With the
    /// `assert-allocs` feature enabled, allocations in here abort in debug builds.
    pub fn process(&mut self, buffer: &mut [u8]) {
        Self::assert_no_alloc(|| self.process_frames(buffer));
    }

    // ---------------------------------------------------------------------------------------------

    fn assert_no_alloc<T, F: FnOnce() -> T>(func: F) -> T {
        #[cfg(feature = "assert-allocs")]
        return assert_no_alloc::assert_no_alloc::<T, F>(func);

        #[cfg(not(feature = "assert-allocs"))]
        return func();
    }

    /// Sample frames in the echo window a delay length register value selects at `sample_rate`,
    /// scaled from the native rate and rounded to whole frames, at least one.
    fn window_frames_for(sample_rate: u32, delay_length: u8) -> usize {
        let native_rate = u64::from(Self::NATIVE_SAMPLE_RATE);
        let steps = u64::from(delay_length & 0x0F) * Self::DELAY_STEP_FRAMES as u64;
        let frames = (steps * u64::from(sample_rate) + native_rate / 2) / native_rate;
        (frames as usize).max(1)
    }

    fn process_frames(&mut self, buffer: &mut [u8]) {
        let bytes_per_sample = self.sample_format.bytes_per_sample();
        let frame_bytes = bytes_per_sample * self.channel_count;
        if buffer.len() < frame_bytes {
            return;
        }

        for frame in buffer.chunks_exact_mut(frame_bytes) {
            let registers = &self.registers;
            let (main_l, main_r) = registers.main_volume();
            let (echo_l, echo_r) = registers.echo_volume();
            let feedback = i64::from(registers.feedback());
            let fir_coefficients = registers.fir();
            let echo_enabled = registers.echo_enabled();
            let write_frozen = registers.echo_writes_frozen();
            let muted = registers.muted();
            let window_base = registers.echo_base();

            // the delay length register is only consumed when a new window starts
            let window_frames = if self.delay.at_window_start() {
                Self::window_frames_for(self.sample_rate, registers.delay_length())
            } else {
                self.delay.window_frames()
            };
            let slot = self.delay.next_slot(window_frames, window_base);

            for channel in 0..self.channel_count {
                let sample_bytes = &mut frame[channel * bytes_per_sample..][..bytes_per_sample];
                let main_out = self.sample_format.read_sample(sample_bytes);
                let echo_out = if echo_enabled { main_out } else { 0 };

                let echo_in = self.delay.read_sample(slot, channel);
                let fir_out = self.fir.process_sample(channel, echo_in, &fir_coefficients);

                if !write_frozen {
                    let circulated =
                        i64::from(echo_out >> 7) + ((i64::from(fir_out) * feedback) >> 14);
                    self.delay.write_sample(slot, channel, clamp16(circulated));
                }

                let (main_volume, echo_volume) = if channel % 2 == 0 {
                    (main_l, echo_l)
                } else {
                    (main_r, echo_r)
                };
                let mixed = (i64::from(main_out) * i64::from(main_volume)
                    + i64::from(fir_out) * i64::from(echo_volume))
                    >> 14;
                let output = if muted { 0 } else { clamp16(mixed) };
                self.sample_format.write_sample(sample_bytes, output);
            }
            self.fir.advance();
        }
    }
}

// -------------------------------------------------------------------------------------------------
