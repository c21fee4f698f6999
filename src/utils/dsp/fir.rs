//! Rolling tap history for the echo's 8 tap FIR filter.

// -------------------------------------------------------------------------------------------------

/// Per channel history of the last 8 echo samples with an 8 tap convolution over them.
///
/// Each channel keeps its 8 history slots twice: every push writes the sample at the shared
/// write index and again 8 slots above it. The 7 older taps are then always the contiguous
/// slots following the write index, so the convolution needs no per-tap wrapping.
///
/// The write index is shared across channels and advances once per frame via
/// [`advance`](Self::advance), after all channels pushed their sample.
#[derive(Debug)]
pub struct FirHistory {
    history: Vec<i16>,
    index: usize,
    channel_count: usize,
}

impl FirHistory {
    const TAPS: usize = 8;
    const SLOTS_PER_CHANNEL: usize = 2 * Self::TAPS;

    /// Creates an empty history for `channel_count` channels.
    pub fn new(channel_count: usize) -> Self {
        assert!(channel_count > 0, "Invalid channel count");
        let history = vec![0; channel_count * Self::SLOTS_PER_CHANNEL];
        let index = 0;
        Self {
            history,
            index,
            channel_count,
        }
    }

    /// Clears all channel histories and rewinds the write index.
    pub fn flush(&mut self) {
        self.history.fill(0);
        self.index = 0;
    }

    /// Pushes this frame's echo sample for `channel` and returns the 8 tap convolution with
    /// `coefficients`, where coefficient 7 weighs the pushed sample and coefficient 0 the
    /// oldest one in the history.
    #[inline]
    pub fn process_sample(&mut self, channel: usize, value: i16, coefficients: &[i8; 8]) -> i32 {
        debug_assert!(channel < self.channel_count, "Invalid channel");

        let base = channel * Self::SLOTS_PER_CHANNEL;
        self.history[base + self.index] = value;
        self.history[base + self.index + Self::TAPS] = value;

        let mut output = i32::from(value) * i32::from(coefficients[Self::TAPS - 1]);
        let taps = &self.history[base + self.index + 1..base + self.index + Self::TAPS];
        for (tap, coefficient) in taps.iter().zip(coefficients.iter()) {
            output += i32::from(*tap) * i32::from(*coefficient);
        }
        output
    }

    /// Advances the shared write index to the next frame.
    #[inline]
    pub fn advance(&mut self) {
        self.index = (self.index + 1) & (Self::TAPS - 1);
    }
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impulse_response() {
        let mut history = FirHistory::new(1);
        let coefficients: [i8; 8] = [1, 2, 3, 4, 5, 6, 7, 8];

        // Test an impulse walks the taps from the newest to the oldest coefficient
        assert_eq!(history.process_sample(0, 100, &coefficients), 800);
        history.advance();
        for tap in (1..8).rev() {
            let output = history.process_sample(0, 0, &coefficients);
            assert_eq!(output, 100 * i32::from(coefficients[tap - 1]));
            history.advance();
        }

        // Test the impulse has left the history after 8 frames
        assert_eq!(history.process_sample(0, 0, &coefficients), 0);
        history.advance();
        assert_eq!(history.process_sample(0, 0, &coefficients), 0);
    }

    #[test]
    fn history_accumulation() {
        let mut history = FirHistory::new(1);

        // Test a constant signal sums all coefficients
        let coefficients: [i8; 8] = [1; 8];
        for frame in 0..16 {
            let output = history.process_sample(0, 1000, &coefficients);
            history.advance();
            let expected = 1000 * (frame + 1).min(8);
            assert_eq!(output, expected);
        }

        // Test saturated samples and coefficients stay within i32
        let mut history = FirHistory::new(1);
        let coefficients: [i8; 8] = [-128; 8];
        let mut output = 0;
        for _ in 0..8 {
            output = history.process_sample(0, i16::MIN, &coefficients);
            history.advance();
        }
        assert_eq!(output, 8 * 32768 * 128);
    }

    #[test]
    fn channel_isolation() {
        let mut history = FirHistory::new(2);
        let coefficients: [i8; 8] = [0, 0, 0, 0, 0, 0, 0, 127];

        // Test channels keep separate histories under the shared index
        assert_eq!(history.process_sample(0, 10, &coefficients), 10 * 127);
        assert_eq!(history.process_sample(1, -10, &coefficients), -10 * 127);
        history.advance();

        let lookback: [i8; 8] = [0, 0, 0, 0, 0, 0, 127, 0];
        assert_eq!(history.process_sample(0, 0, &lookback), 10 * 127);
        assert_eq!(history.process_sample(1, 0, &lookback), -10 * 127);
        history.advance();

        // Test flush clears every channel
        history.flush();
        assert_eq!(history.process_sample(0, 0, &lookback), 0);
        assert_eq!(history.process_sample(1, 0, &lookback), 0);
    }
}
