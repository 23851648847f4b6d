//! User-facing controls and the per-block parameter controller.
//!
//! [`ControlParams`] is what a host or UI manipulates: feedback in dB, mix
//! in percent wet, delay time in milliseconds. [`recompute`] turns those
//! into [`DerivedParams`], the algorithm-ready gains and delay length, once
//! per processing block so the per-sample loop does no conversions.
//!
//! | Control | Range | Default | Unit |
//! |---------|-------|---------|------|
//! | Feedback Gain | -20.0–20.0 | 0.0 | dB |
//! | Wet/Dry Mix | 0.0–100.0 | 50.0 | % wet |
//! | Delay Time | 5.0–10000.0 | 500.0 | ms |

use core::ops::RangeInclusive;

use crate::math::{clamp_or, db_to_linear, ms_to_samples};
use crate::param_info::{ParamDescriptor, ParamId};

/// Valid feedback gain range in decibels.
pub const FEEDBACK_DB_RANGE: RangeInclusive<f32> = -20.0..=20.0;
/// Valid wet/dry mix range in percent wet.
pub const MIX_PERCENT_RANGE: RangeInclusive<f32> = 0.0..=100.0;
/// Valid delay time range in milliseconds.
pub const DELAY_MS_RANGE: RangeInclusive<f32> = 5.0..=10000.0;

/// Default feedback gain (dB).
pub const DEFAULT_FEEDBACK_DB: f32 = 0.0;
/// Default wet/dry mix (% wet).
pub const DEFAULT_MIX_PERCENT: f32 = 50.0;
/// Default delay time (ms).
pub const DEFAULT_DELAY_MS: f32 = 500.0;

/// Longest delay the engine allocates for, in milliseconds.
pub const MAX_DELAY_MS: f32 = 10000.0;

/// Descriptors for the three controls, in parameter-index order.
///
/// Order is feedback, mix, delay. IDs are stable across releases.
pub const CONTROL_DESCRIPTORS: [ParamDescriptor; 3] = [
    ParamDescriptor::gain_db("Feedback Gain", "Feedback", -20.0, 20.0, DEFAULT_FEEDBACK_DB)
        .with_id(ParamId(100), "feedback_db"),
    ParamDescriptor::mix().with_id(ParamId(101), "mix"),
    ParamDescriptor::time_ms("Delay Time", "Delay", 5.0, 10000.0, DEFAULT_DELAY_MS)
        .with_id(ParamId(102), "delay_ms"),
];

/// Capacity in samples each delay line needs at `sample_rate`.
///
/// ```rust
/// use ekko_core::max_delay_samples;
///
/// assert_eq!(max_delay_samples(44100.0), 441_000);
/// ```
#[inline]
pub fn max_delay_samples(sample_rate: f32) -> usize {
    ms_to_samples(MAX_DELAY_MS, sample_rate)
}

/// The three user-adjustable controls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlParams {
    /// Feedback gain in decibels.
    pub feedback_db: f32,
    /// Wet/dry mix as percent wet.
    pub mix_percent: f32,
    /// Requested delay time in milliseconds.
    pub delay_ms: f32,
}

impl Default for ControlParams {
    fn default() -> Self {
        Self {
            feedback_db: DEFAULT_FEEDBACK_DB,
            mix_percent: DEFAULT_MIX_PERCENT,
            delay_ms: DEFAULT_DELAY_MS,
        }
    }
}

impl ControlParams {
    /// Creates a control set. Values are stored as given; see [`clamped`](Self::clamped).
    pub const fn new(feedback_db: f32, mix_percent: f32, delay_ms: f32) -> Self {
        Self {
            feedback_db,
            mix_percent,
            delay_ms,
        }
    }

    /// Returns a copy with every field forced into its declared range.
    ///
    /// NaN fields fall back to their defaults.
    pub fn clamped(&self) -> Self {
        Self {
            feedback_db: clamp_or(
                self.feedback_db,
                *FEEDBACK_DB_RANGE.start(),
                *FEEDBACK_DB_RANGE.end(),
                DEFAULT_FEEDBACK_DB,
            ),
            mix_percent: clamp_or(
                self.mix_percent,
                *MIX_PERCENT_RANGE.start(),
                *MIX_PERCENT_RANGE.end(),
                DEFAULT_MIX_PERCENT,
            ),
            delay_ms: clamp_or(
                self.delay_ms,
                *DELAY_MS_RANGE.start(),
                *DELAY_MS_RANGE.end(),
                DEFAULT_DELAY_MS,
            ),
        }
    }

    /// Whether every field already lies in its range.
    pub fn is_in_range(&self) -> bool {
        FEEDBACK_DB_RANGE.contains(&self.feedback_db)
            && MIX_PERCENT_RANGE.contains(&self.mix_percent)
            && DELAY_MS_RANGE.contains(&self.delay_ms)
    }
}

/// Algorithm-ready values, valid for one processing block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedParams {
    /// Gain applied to the delayed signal and to the delay input.
    pub wet_gain: f32,
    /// Gain applied to the unprocessed input; `1.0 - wet_gain`.
    pub dry_gain: f32,
    /// Linear feedback amount, `10^(feedback_db / 20)`.
    pub feedback_gain: f32,
    /// Delay length in whole samples.
    pub delay_samples: usize,
}

impl DerivedParams {
    /// Derived state for the default controls at `sample_rate`.
    pub fn defaults(sample_rate: f32) -> Self {
        recompute(&ControlParams::default(), sample_rate)
    }
}

/// Translates controls into per-block algorithm state.
///
/// Out-of-range controls are clamped first. The delay length is
/// `delay_ms / 1000 * sample_rate` truncated toward zero, and never exceeds
/// [`max_delay_samples`] for the same sample rate.
///
/// # Example
///
/// ```rust
/// use ekko_core::{ControlParams, recompute};
///
/// let derived = recompute(&ControlParams::default(), 44100.0);
/// assert_eq!(derived.wet_gain, 0.5);
/// assert_eq!(derived.dry_gain, 0.5);
/// assert_eq!(derived.feedback_gain, 1.0);
/// assert_eq!(derived.delay_samples, 22050);
/// ```
pub fn recompute(controls: &ControlParams, sample_rate: f32) -> DerivedParams {
    debug_assert!(sample_rate > 0.0, "sample rate must be positive");
    let controls = controls.clamped();

    let wet_gain = controls.mix_percent / 100.0;
    let dry_gain = 1.0 - wet_gain;
    let feedback_gain = db_to_linear(controls.feedback_db);
    let delay_samples =
        ms_to_samples(controls.delay_ms, sample_rate).min(max_delay_samples(sample_rate));

    DerivedParams {
        wet_gain,
        dry_gain,
        feedback_gain,
        delay_samples,
    }
}
