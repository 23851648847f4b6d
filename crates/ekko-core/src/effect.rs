//! Core Effect trait.
//!
//! The [`Effect`] trait is the seam between the DSP core and whatever hosts
//! it: an offline file renderer, a real-time stream callback, or a test
//! harness. Hosts drive it frame by frame or block by block and never need
//! to know the concrete effect type.
//!
//! ## Design Decisions
//!
//! - **Stereo frames**: processing takes and returns one `(left, right)`
//!   pair, matching a two-channel audio boundary.
//!
//! - **Object-safe**: `dyn Effect` works for runtime selection, but
//!   generic/static dispatch is preferred in the audio callback.
//!
//! - **No allocations**: all methods may be called from a real-time
//!   audio context.

/// Core trait for stereo audio effects.
///
/// # Example
///
/// ```rust
/// use ekko_core::Effect;
///
/// struct Swap;
///
/// impl Effect for Swap {
///     fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
///         (right, left)
///     }
///
///     fn set_sample_rate(&mut self, _sample_rate: f32) {}
///
///     fn reset(&mut self) {}
/// }
///
/// let mut fx = Swap;
/// assert_eq!(fx.process_stereo(1.0, 0.0), (0.0, 1.0));
/// ```
pub trait Effect {
    /// Process a single stereo frame.
    ///
    /// For effects with internal state this advances the state by one sample.
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32);

    /// Process a stereo block in place.
    ///
    /// Default implementation calls [`process_stereo`](Self::process_stereo)
    /// for each frame. Only the common prefix of the two slices is processed.
    fn process_block_stereo(&mut self, left: &mut [f32], right: &mut [f32]) {
        debug_assert_eq!(
            left.len(),
            right.len(),
            "Left and right buffers must have same length"
        );
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let (out_l, out_r) = self.process_stereo(*l, *r);
            *l = out_l;
            *r = out_r;
        }
    }

    /// Update the sample rate.
    ///
    /// Called at stream start. Effects size sample-rate-dependent storage
    /// here, so this may allocate and must stay off the audio thread.
    fn set_sample_rate(&mut self, sample_rate: f32);

    /// Reset internal state.
    ///
    /// Clears delay lines and history without changing parameters.
    fn reset(&mut self);

    /// Report processing latency in samples.
    ///
    /// Default returns 0 (no latency).
    fn latency_samples(&self) -> usize {
        0
    }
}
