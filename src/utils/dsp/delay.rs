//! The echo delay line: raw ring memory addressed like the hardware echo region.

use byteorder::{ByteOrder, LittleEndian};

// -------------------------------------------------------------------------------------------------

/// Ring buffer of raw 16 bit echo history, addressed in bytes.
///
/// Models the hardware's echo memory: an active window of whole sample frames starting `base`
/// bytes into the physical buffer, written frame by frame and wrapping at the window end. All
/// sample addresses pass through a power-of-two capacity mask, so windows that straddle the
/// physical buffer end wrap around per sample instead of running out of bounds.
///
/// The active window length follows the delay length register lazily: it is recaptured each
/// time the write cursor wraps to the window start, never mid-window. Buffer memory is
/// allocated once for the largest possible window, so live delay length changes stay
/// allocation-free.
#[derive(Debug)]
pub struct EchoDelayLine {
    buffer: Vec<u8>,
    buffer_mask: usize,
    frame_len: usize,
    window_len: usize,
    write_cursor: usize,
}

impl EchoDelayLine {
    /// Highest supported window base offset: the echo region base register selects pages of
    /// `0x100` bytes, up to `0xFF00`.
    pub const MAX_BASE: usize = 0xFF00;

    /// Creates a delay line for up to `max_window_frames` per window, with room for any window
    /// base. `channel_count` defines the frame layout and must not be zero.
    pub fn new(max_window_frames: usize, channel_count: usize) -> Self {
        assert!(channel_count > 0, "Invalid channel count");
        assert!(max_window_frames > 0, "Invalid window size");

        let frame_len = channel_count * 2;
        let capacity = (Self::MAX_BASE + max_window_frames * frame_len).next_power_of_two();
        let buffer = vec![0; capacity];
        let buffer_mask = capacity - 1;

        // a single frame until the first `next_slot` captures the real window
        let window_len = frame_len;
        let write_cursor = 0;
        Self {
            buffer,
            buffer_mask,
            frame_len,
            window_len,
            write_cursor,
        }
    }

    /// Clears the echo history and rewinds the write cursor to the window start.
    pub fn flush(&mut self) {
        self.buffer.fill(0);
        self.write_cursor = 0;
    }

    /// Sample frames in the currently active window.
    #[inline]
    pub fn window_frames(&self) -> usize {
        self.window_len / self.frame_len
    }

    /// True while the write cursor sits at the window start, where the next
    /// [`next_slot`](Self::next_slot) call captures a new window length.
    #[inline]
    pub fn at_window_start(&self) -> bool {
        self.write_cursor == 0
    }

    /// Starts the next frame: returns the frame's slot as a byte offset and advances the write
    /// cursor by one frame. A cursor sitting at the window start captures `window_frames` as
    /// the active window length first.
    #[inline]
    pub fn next_slot(&mut self, window_frames: usize, base: usize) -> usize {
        debug_assert!(window_frames > 0, "Invalid window size");
        if self.write_cursor == 0 {
            self.window_len = window_frames * self.frame_len;
        }
        let slot = (base + self.write_cursor) & self.buffer_mask;
        self.write_cursor += self.frame_len;
        if self.write_cursor >= self.window_len {
            self.write_cursor = 0;
        }
        slot
    }

    /// Reads the 16 bit sample of `channel` in the frame at byte offset `slot`. Sample
    /// addresses wrap at the buffer capacity; `slot` must be sample aligned (even).
    #[inline]
    pub fn read_sample(&self, slot: usize, channel: usize) -> i16 {
        debug_assert!(slot % 2 == 0, "Misaligned slot address");
        let offset = (slot + channel * 2) & self.buffer_mask;
        LittleEndian::read_i16(&self.buffer[offset..offset + 2])
    }

    /// Writes the 16 bit sample of `channel` in the frame at byte offset `slot`. Sample
    /// addresses wrap at the buffer capacity; `slot` must be sample aligned (even).
    #[inline]
    pub fn write_sample(&mut self, slot: usize, channel: usize, value: i16) {
        debug_assert!(slot % 2 == 0, "Misaligned slot address");
        let offset = (slot + channel * 2) & self.buffer_mask;
        LittleEndian::write_i16(&mut self.buffer[offset..offset + 2], value);
    }
}

// -------------------------------------------------------------------------------------------------
