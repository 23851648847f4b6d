//! Stereo feedback delay processor.
//!
//! [`FeedbackDelay`] owns one [`DelayLine`] per channel plus the most recent
//! [`DerivedParams`]. Hosts call [`FeedbackDelay::prepare`] at stream start,
//! then [`FeedbackDelay::process_block`] once per audio callback.
//!
//! # Signal Flow
//!
//! Per channel, per sample:
//!
//! ```text
//! feed_in = wet * input + feedback      (feedback is a per-block constant)
//! delayed = line.tick(feed_in)
//! output  = dry * input + wet * delayed
//! ```
//!
//! The feedback term is injected as a constant bias into the line input, not
//! scaled by the delayed signal.
//!
//! # Parameters
//!
//! | Index | ID | Name | Range | Default |
//! |-------|----|------|-------|---------|
//! | 0 | 100 | Feedback Gain | -20.0–20.0 dB | 0.0 |
//! | 1 | 101 | Mix | 0–100% | 50.0 |
//! | 2 | 102 | Delay Time | 5.0–10000.0 ms | 500.0 |

use crate::delay::DelayLine;
use crate::effect::Effect;
use crate::math::flush_denormal;
use crate::param_info::{ParamDescriptor, ParameterInfo};
use crate::params::{
    CONTROL_DESCRIPTORS, ControlParams, DerivedParams, max_delay_samples, recompute,
};
use crate::shared::{DELAY_INDEX, FEEDBACK_INDEX, MIX_INDEX};

/// Stereo feedback delay with wet/dry mix.
///
/// # Example
///
/// ```rust
/// use ekko_core::{ControlParams, FeedbackDelay};
///
/// let mut delay = FeedbackDelay::new(44100.0);
/// let mut left = vec![0.0; 256];
/// let mut right = vec![0.0; 256];
/// left[0] = 1.0;
///
/// delay.process_stereo_block(&ControlParams::default(), &mut left, &mut right);
/// assert_eq!(left[0], 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct FeedbackDelay {
    left: DelayLine,
    right: DelayLine,
    controls: ControlParams,
    derived: DerivedParams,
    sample_rate: f32,
}

impl FeedbackDelay {
    /// Creates a processor ready to run at `sample_rate` with default controls.
    pub fn new(sample_rate: f32) -> Self {
        let mut delay = Self {
            left: DelayLine::new(),
            right: DelayLine::new(),
            controls: ControlParams::default(),
            derived: DerivedParams::defaults(sample_rate),
            sample_rate,
        };
        delay.prepare(sample_rate);
        delay
    }

    /// Stream-start preparation.
    ///
    /// Allocates both delay lines for the maximum delay at `sample_rate`,
    /// discarding any audio in flight, and re-derives the current controls.
    /// Allocates, so never call from the audio callback.
    pub fn prepare(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        let capacity = max_delay_samples(sample_rate);
        self.left.set_maximum_delay(capacity);
        self.right.set_maximum_delay(capacity);

        #[cfg(feature = "tracing")]
        tracing::debug!(sample_rate, capacity, "feedback delay prepared");

        let controls = self.controls;
        self.update(&controls);
    }

    /// Per-block parameter update.
    ///
    /// Clamps `controls`, recomputes the derived gains and delay length and
    /// applies the length to both lines.
    #[inline]
    pub fn update(&mut self, controls: &ControlParams) {
        self.controls = controls.clamped();
        self.derived = recompute(&self.controls, self.sample_rate);
        self.left.set_delay(self.derived.delay_samples);
        self.right.set_delay(self.derived.delay_samples);
    }

    /// Runs one stereo frame through the delay using the current derived state.
    #[inline]
    pub fn process_frame(&mut self, left: f32, right: f32) -> (f32, f32) {
        (
            Self::process_sample(&mut self.left, &self.derived, left),
            Self::process_sample(&mut self.right, &self.derived, right),
        )
    }

    #[inline]
    fn process_sample(line: &mut DelayLine, derived: &DerivedParams, input: f32) -> f32 {
        let feed_in = flush_denormal(derived.wet_gain * input + derived.feedback_gain);
        let delayed = line.tick(feed_in);
        // A zero-length line is a direct path
        let delayed = if line.delay() == 0 { feed_in } else { delayed };
        derived.dry_gain * input + derived.wet_gain * delayed
    }

    #[inline]
    fn process_channel(line: &mut DelayLine, derived: &DerivedParams, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = Self::process_sample(line, derived, *sample);
        }
    }

    /// Processes one host block in place.
    ///
    /// Recomputes the derived state from `controls` once, zeroes every
    /// channel at index `num_inputs` or above, then processes channel 0
    /// through the left line and channel 1 through the right line. Channels
    /// past the second are zeroed if they carry no input and otherwise left
    /// untouched.
    pub fn process_block(
        &mut self,
        controls: &ControlParams,
        channels: &mut [&mut [f32]],
        num_inputs: usize,
    ) {
        self.update(controls);

        for channel in channels.iter_mut().skip(num_inputs) {
            channel.fill(0.0);
        }

        let derived = self.derived;
        match channels {
            [] => {}
            [left] => Self::process_channel(&mut self.left, &derived, left),
            [left, right, ..] => {
                Self::process_channel(&mut self.left, &derived, left);
                Self::process_channel(&mut self.right, &derived, right);
            }
        }
    }

    /// Processes a two-channel block in place.
    pub fn process_stereo_block(
        &mut self,
        controls: &ControlParams,
        left: &mut [f32],
        right: &mut [f32],
    ) {
        debug_assert_eq!(left.len(), right.len(), "channel length mismatch");
        self.process_block(controls, &mut [left, right], 2);
    }

    /// Derived state from the most recent update.
    pub fn derived(&self) -> &DerivedParams {
        &self.derived
    }

    /// Controls from the most recent update, after clamping.
    pub fn controls(&self) -> &ControlParams {
        &self.controls
    }

    /// Sample rate the lines were prepared for.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Tail length in samples, equal to the current delay length.
    pub fn tail_samples(&self) -> usize {
        self.left.delay()
    }
}

impl Default for FeedbackDelay {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl Effect for FeedbackDelay {
    #[inline]
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        self.process_frame(left, right)
    }

    fn process_block_stereo(&mut self, left: &mut [f32], right: &mut [f32]) {
        let derived = self.derived;
        Self::process_channel(&mut self.left, &derived, left);
        Self::process_channel(&mut self.right, &derived, right);
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.prepare(sample_rate);
    }

    fn reset(&mut self) {
        self.left.clear();
        self.right.clear();
    }
}

impl ParameterInfo for FeedbackDelay {
    fn param_count(&self) -> usize {
        CONTROL_DESCRIPTORS.len()
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        CONTROL_DESCRIPTORS.get(index).copied()
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            FEEDBACK_INDEX => self.controls.feedback_db,
            MIX_INDEX => self.controls.mix_percent,
            DELAY_INDEX => self.controls.delay_ms,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        let mut controls = self.controls;
        match index {
            FEEDBACK_INDEX => controls.feedback_db = value,
            MIX_INDEX => controls.mix_percent = value,
            DELAY_INDEX => controls.delay_ms = value,
            _ => return,
        }
        self.update(&controls);
    }
}
