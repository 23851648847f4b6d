//! Circular-buffer delay line with runtime-adjustable length.
//!
//! [`DelayLine`] holds a fixed-capacity ring buffer that is sized once at
//! stream start (when the sample rate becomes known) and never resized on
//! the audio thread. The delay length can change every block but is always
//! clamped to the capacity chosen at allocation.
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized --set_maximum_delay--> Ready --set_delay / tick / next_out--> Ready
//! ```
//!
//! Reading or writing an uninitialized line is a caller bug. Debug builds
//! assert; release builds return silence and leave the line untouched.
//!
//! # Read/Write Contract
//!
//! [`DelayLine::next_out`] reads the slot at [`DelayLine::read_pos`] and
//! [`DelayLine::tick`] returns exactly that value before writing its input,
//! for every delay length. For `D >= 1` this is the sample written `D` ticks
//! ago. At `D = 0` the read and write positions coincide, so the line yields
//! the slot the pending write replaces; callers wanting a zero-latency path
//! at that length route the input around the line, as
//! [`FeedbackDelay`](crate::FeedbackDelay) does.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

/// Integer-length feedback delay line (heap-allocated, allocation-free after setup).
///
/// # Example
///
/// ```rust
/// use ekko_core::DelayLine;
///
/// let mut line = DelayLine::new();
/// line.set_maximum_delay(8);
/// line.set_delay(3);
///
/// line.tick(1.0);
/// line.tick(0.0);
/// line.tick(0.0);
/// assert_eq!(line.next_out(), 1.0);
/// assert_eq!(line.tick(0.0), 1.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DelayLine {
    /// Ring storage, `max_delay + 1` slots once allocated
    buffer: Vec<f32>,
    /// Slot the next `tick` writes into
    write_pos: usize,
    /// Delay currently in effect, `0..=max_delay`
    delay: usize,
}

impl DelayLine {
    /// Creates an uninitialized delay line.
    ///
    /// Call [`set_maximum_delay`](Self::set_maximum_delay) before any
    /// read or write.
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            write_pos: 0,
            delay: 0,
        }
    }

    /// Creates a ready delay line with the given maximum delay in samples.
    pub fn with_maximum_delay(max_samples: usize) -> Self {
        let mut line = Self::new();
        line.set_maximum_delay(max_samples);
        line
    }

    /// Allocates a zeroed buffer able to hold `max_samples` of delay.
    ///
    /// Resets the write position and current delay to zero. Calling this
    /// again discards all state and reallocates, so it belongs in the
    /// stream-start path, never in the audio callback.
    pub fn set_maximum_delay(&mut self, max_samples: usize) {
        self.buffer = vec![0.0; max_samples + 1];
        self.write_pos = 0;
        self.delay = 0;
    }

    /// Sets the delay length in samples, clamped to `[0, max_delay]`.
    ///
    /// Returns the delay actually applied.
    #[inline]
    pub fn set_delay(&mut self, samples: usize) -> usize {
        let clamped = samples.min(self.max_delay());
        #[cfg(feature = "tracing")]
        if clamped != samples {
            tracing::debug!(requested = samples, applied = clamped, "delay length clamped");
        }
        self.delay = clamped;
        clamped
    }

    /// Returns the delayed sample the next [`tick`](Self::tick) will emit,
    /// without changing any state.
    #[inline]
    pub fn next_out(&self) -> f32 {
        debug_assert!(self.is_ready(), "DelayLine read before set_maximum_delay");
        if !self.is_ready() {
            return 0.0;
        }
        self.buffer[self.read_pos()]
    }

    /// Emits the sample at [`read_pos`](Self::read_pos), then writes `input`
    /// and advances the write position.
    #[inline]
    pub fn tick(&mut self, input: f32) -> f32 {
        let len = self.buffer.len();
        debug_assert!(len > 0, "DelayLine write before set_maximum_delay");
        if len == 0 {
            return 0.0;
        }
        let out = self.buffer[self.read_pos()];
        self.buffer[self.write_pos] = input;
        self.write_pos = (self.write_pos + 1) % len;
        out
    }

    /// Clears the buffer contents, keeping capacity and delay length.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }

    /// Whether storage has been allocated.
    pub fn is_ready(&self) -> bool {
        !self.buffer.is_empty()
    }

    /// Largest delay this line can represent, in samples.
    pub fn max_delay(&self) -> usize {
        self.buffer.len().saturating_sub(1)
    }

    /// Delay currently in effect, in samples.
    pub fn delay(&self) -> usize {
        self.delay
    }

    /// Slot [`next_out`](Self::next_out) and the next [`tick`](Self::tick)
    /// read from.
    ///
    /// Always `(write_pos - delay + capacity) % capacity`, where capacity
    /// is `max_delay + 1`.
    pub fn read_pos(&self) -> usize {
        let len = self.buffer.len().max(1);
        (self.write_pos + len - self.delay) % len
    }

    /// Position the next write goes to.
    pub fn write_pos(&self) -> usize {
        self.write_pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_uninitialized() {
        let line = DelayLine::new();
        assert!(!line.is_ready());
        assert_eq!(line.max_delay(), 0);
    }

    #[test]
    fn test_set_maximum_delay_allocates_zeroed() {
        let mut line = DelayLine::new();
        line.set_maximum_delay(16);
        assert!(line.is_ready());
        assert_eq!(line.max_delay(), 16);
        assert_eq!(line.delay(), 0);
        line.set_delay(4);
        for _ in 0..4 {
            assert_eq!(line.tick(0.5), 0.0);
        }
    }

    #[test]
    fn test_set_maximum_delay_again_resets_state() {
        let mut line = DelayLine::with_maximum_delay(8);
        line.set_delay(2);
        line.tick(1.0);
        line.tick(1.0);

        line.set_maximum_delay(4);
        assert_eq!(line.max_delay(), 4);
        assert_eq!(line.delay(), 0);
        assert_eq!(line.write_pos(), 0);
        line.set_delay(2);
        assert_eq!(line.next_out(), 0.0);
    }

    #[test]
    fn test_set_delay_clamps_to_capacity() {
        let mut line = DelayLine::with_maximum_delay(10);
        assert_eq!(line.set_delay(25), 10);
        assert_eq!(line.delay(), 10);
        assert_eq!(line.set_delay(3), 3);
    }

    #[test]
    fn test_impulse_delayed_exactly() {
        let mut line = DelayLine::with_maximum_delay(32);
        line.set_delay(5);

        let mut seen = Vec::new();
        for n in 0..12 {
            seen.push(line.next_out());
            line.tick(if n == 0 { 1.0 } else { 0.0 });
        }
        for (n, &v) in seen.iter().enumerate() {
            let expected = if n == 5 { 1.0 } else { 0.0 };
            assert_eq!(v, expected, "sample {n}");
        }
    }

    #[test]
    fn test_tick_matches_preceding_next_out() {
        let mut line = DelayLine::with_maximum_delay(7);
        line.set_delay(3);
        for n in 0..40 {
            let peek = line.next_out();
            let out = line.tick(n as f32);
            assert_eq!(peek, out, "tick {n}");
        }
    }

    #[test]
    fn test_next_out_is_idempotent() {
        let mut line = DelayLine::with_maximum_delay(8);
        line.set_delay(1);
        line.tick(0.75);
        let a = line.next_out();
        let b = line.next_out();
        let c = line.next_out();
        assert_eq!(a, 0.75);
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_zero_delay_tick_matches_preceding_next_out() {
        let mut line = DelayLine::with_maximum_delay(8);
        line.set_delay(0);
        line.tick(0.3);
        let peek = line.next_out();
        assert_eq!(peek, line.tick(-0.9));
        assert_eq!(line.read_pos(), line.write_pos());
    }

    #[test]
    fn test_zero_delay_reads_slot_being_replaced() {
        let mut line = DelayLine::with_maximum_delay(2);
        line.set_delay(0);
        let outputs: Vec<f32> = (1..=5).map(|n| line.tick(n as f32)).collect();
        assert_eq!(outputs, vec![0.0, 0.0, 0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_full_capacity_delay() {
        let mut line = DelayLine::with_maximum_delay(4);
        line.set_delay(4);
        let outputs: Vec<f32> = (1..=10).map(|n| line.tick(n as f32)).collect();
        assert_eq!(outputs, vec![0.0, 0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_read_pos_invariant() {
        let mut line = DelayLine::with_maximum_delay(9);
        for delay in [4, 0, 9] {
            line.set_delay(delay);
            for n in 0..30 {
                let capacity = line.max_delay() + 1;
                let expected = (line.write_pos() + capacity - line.delay()) % capacity;
                assert_eq!(line.read_pos(), expected);
                let peek = line.next_out();
                assert_eq!(line.tick(n as f32), peek, "delay {delay}, tick {n}");
            }
        }
    }

    #[test]
    fn test_shortening_delay_reads_newer_samples() {
        let mut line = DelayLine::with_maximum_delay(16);
        line.set_delay(8);
        for n in 1..=8 {
            line.tick(n as f32);
        }
        line.set_delay(2);
        // Written 2 ticks ago
        assert_eq!(line.next_out(), 7.0);
    }

    #[test]
    fn test_clear_keeps_delay() {
        let mut line = DelayLine::with_maximum_delay(8);
        line.set_delay(2);
        line.tick(1.0);
        line.tick(1.0);
        line.clear();
        assert_eq!(line.delay(), 2);
        assert_eq!(line.next_out(), 0.0);
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn test_uninitialized_reads_silence_in_release() {
        let mut line = DelayLine::new();
        assert_eq!(line.next_out(), 0.0);
        assert_eq!(line.tick(1.0), 0.0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic]
    fn test_uninitialized_read_asserts_in_debug() {
        let line = DelayLine::new();
        let _ = line.next_out();
    }
}
