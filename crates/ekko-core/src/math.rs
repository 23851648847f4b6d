//! Mathematical utility functions for DSP.
//!
//! All functions are allocation-free and suitable for `no_std`.
//!
//! # Level Conversions
//!
//! - [`db_to_linear`] / [`linear_to_db`] - Convert between dB and linear gain
//!
//! # Time Conversions
//!
//! - [`ms_to_samples`] - Milliseconds to a whole number of samples (truncating)
//! - [`samples_to_ms`] - Samples back to milliseconds

use libm::{expf, logf};

/// Convert decibels to linear gain.
///
/// # Arguments
/// * `db` - Value in decibels
///
/// # Returns
/// Linear gain value (e.g., 0 dB → 1.0, -6 dB → 0.5, +6 dB → 2.0)
///
/// # Example
/// ```rust
/// use ekko_core::db_to_linear;
///
/// assert_eq!(db_to_linear(0.0), 1.0);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert linear gain to decibels.
///
/// # Arguments
/// * `linear` - Linear gain value (floored at 1e-10)
///
/// # Returns
/// Value in decibels
///
/// # Example
/// ```rust
/// use ekko_core::linear_to_db;
///
/// assert!((linear_to_db(1.0) - 0.0).abs() < 0.001);
/// assert!((linear_to_db(0.5) - (-6.02)).abs() < 0.01);
/// ```
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    // 20 * log10(linear) = 20 * ln(linear) / ln(10)
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    logf(linear.max(1e-10)) * FACTOR
}

/// Convert milliseconds to a whole number of samples.
///
/// Computed as `ms / 1000 * sample_rate` in `f32` and truncated toward
/// zero. Negative and NaN results map to `0`.
///
/// # Example
/// ```rust
/// use ekko_core::ms_to_samples;
///
/// assert_eq!(ms_to_samples(500.0, 44100.0), 22050);
/// // 5512.5 truncates, it does not round
/// assert_eq!(ms_to_samples(125.0, 44100.0), 5512);
/// ```
#[inline]
pub fn ms_to_samples(ms: f32, sample_rate: f32) -> usize {
    let samples = (ms / 1000.0) * sample_rate;
    // `as` saturates: NaN -> 0, negative -> 0
    samples as usize
}

/// Convert samples to milliseconds.
#[inline]
pub fn samples_to_ms(samples: usize, sample_rate: f32) -> f32 {
    samples as f32 * 1000.0 / sample_rate
}

/// Flush subnormal (denormalized) floats to zero.
///
/// Values below 1e-20 are replaced with zero, leaving margin before the
/// IEEE 754 subnormal range begins. Delay lines recirculate their contents
/// indefinitely, so stored samples pass through this before being written.
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// Clamp `value` into `[min, max]`, mapping NaN to `fallback`.
#[inline]
pub fn clamp_or(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(min, max)
    }
}
