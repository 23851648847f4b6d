//! Lock-free control storage shared between a control thread and the audio thread.
//!
//! Each control lives in its own `AtomicU32` holding the `f32` bit pattern.
//! The control side stores whenever a value changes; the audio side takes a
//! [`SharedParams::snapshot`] once per block. Fields are loaded
//! independently, so a snapshot may mix one fresh and one stale value for a
//! single block. The next block picks up the rest. Nothing here ever blocks.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::params::{
    ControlParams, DELAY_MS_RANGE, DEFAULT_DELAY_MS, DEFAULT_FEEDBACK_DB, DEFAULT_MIX_PERCENT,
    FEEDBACK_DB_RANGE, MIX_PERCENT_RANGE,
};
use crate::math::clamp_or;

/// Index of the feedback control in [`SharedParams::get_by_index`] order.
pub const FEEDBACK_INDEX: usize = 0;
/// Index of the mix control.
pub const MIX_INDEX: usize = 1;
/// Index of the delay-time control.
pub const DELAY_INDEX: usize = 2;

/// Per-field atomic control values.
///
/// Wrap in `Arc` to hand one side to a UI or stdin thread and the other to
/// the audio callback.
///
/// # Example
///
/// ```rust
/// use ekko_core::{ControlParams, SharedParams};
///
/// let shared = SharedParams::default();
/// shared.set_mix_percent(25.0);
/// shared.set_delay_ms(1_000_000.0); // clamped to 10000
///
/// let c = shared.snapshot();
/// assert_eq!(c.mix_percent, 25.0);
/// assert_eq!(c.delay_ms, 10000.0);
/// ```
#[derive(Debug)]
pub struct SharedParams {
    feedback_db: AtomicU32,
    mix_percent: AtomicU32,
    delay_ms: AtomicU32,
}

impl Default for SharedParams {
    fn default() -> Self {
        Self::new(ControlParams::default())
    }
}

impl SharedParams {
    /// Creates shared storage seeded with `initial` (clamped).
    pub fn new(initial: ControlParams) -> Self {
        let c = initial.clamped();
        Self {
            feedback_db: AtomicU32::new(c.feedback_db.to_bits()),
            mix_percent: AtomicU32::new(c.mix_percent.to_bits()),
            delay_ms: AtomicU32::new(c.delay_ms.to_bits()),
        }
    }

    #[inline]
    fn load(cell: &AtomicU32) -> f32 {
        f32::from_bits(cell.load(Ordering::Relaxed))
    }

    #[inline]
    fn store(cell: &AtomicU32, value: f32) {
        cell.store(value.to_bits(), Ordering::Relaxed);
    }

    /// Feedback gain in dB.
    pub fn feedback_db(&self) -> f32 {
        Self::load(&self.feedback_db)
    }

    /// Wet/dry mix in percent wet.
    pub fn mix_percent(&self) -> f32 {
        Self::load(&self.mix_percent)
    }

    /// Delay time in milliseconds.
    pub fn delay_ms(&self) -> f32 {
        Self::load(&self.delay_ms)
    }

    /// Sets the feedback gain, clamped to -20..=20 dB.
    pub fn set_feedback_db(&self, value: f32) {
        let v = clamp_or(
            value,
            *FEEDBACK_DB_RANGE.start(),
            *FEEDBACK_DB_RANGE.end(),
            DEFAULT_FEEDBACK_DB,
        );
        Self::store(&self.feedback_db, v);
    }

    /// Sets the mix, clamped to 0..=100 %.
    pub fn set_mix_percent(&self, value: f32) {
        let v = clamp_or(
            value,
            *MIX_PERCENT_RANGE.start(),
            *MIX_PERCENT_RANGE.end(),
            DEFAULT_MIX_PERCENT,
        );
        Self::store(&self.mix_percent, v);
    }

    /// Sets the delay time, clamped to 5..=10000 ms.
    pub fn set_delay_ms(&self, value: f32) {
        let v = clamp_or(
            value,
            *DELAY_MS_RANGE.start(),
            *DELAY_MS_RANGE.end(),
            DEFAULT_DELAY_MS,
        );
        Self::store(&self.delay_ms, v);
    }

    /// Stores every field of `controls`.
    pub fn set_all(&self, controls: &ControlParams) {
        self.set_feedback_db(controls.feedback_db);
        self.set_mix_percent(controls.mix_percent);
        self.set_delay_ms(controls.delay_ms);
    }

    /// Reads a control by parameter index. `None` for unknown indices.
    pub fn get_by_index(&self, index: usize) -> Option<f32> {
        match index {
            FEEDBACK_INDEX => Some(self.feedback_db()),
            MIX_INDEX => Some(self.mix_percent()),
            DELAY_INDEX => Some(self.delay_ms()),
            _ => None,
        }
    }

    /// Writes a control by parameter index. Unknown indices are ignored.
    pub fn set_by_index(&self, index: usize, value: f32) {
        match index {
            FEEDBACK_INDEX => self.set_feedback_db(value),
            MIX_INDEX => self.set_mix_percent(value),
            DELAY_INDEX => self.set_delay_ms(value),
            _ => {}
        }
    }

    /// Loads all three controls for one processing block.
    #[inline]
    pub fn snapshot(&self) -> ControlParams {
        ControlParams {
            feedback_db: self.feedback_db(),
            mix_percent: self.mix_percent(),
            delay_ms: self.delay_ms(),
        }
    }
}
