//! Stereo audio buffer for file-level processing.
//!
//! [`StereoSamples`] holds a pair of `Vec<f32>` buffers (left/right channels)
//! and provides conversion utilities (mono, interleaved) plus the level
//! measurements the offline host reports.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// A pair of stereo audio buffers (left and right channels).
///
/// Each channel is a `Vec<f32>` of equal length.
///
/// # Example
///
/// ```rust
/// use ekko_core::StereoSamples;
///
/// let samples = StereoSamples::new(vec![1.0; 1024], vec![0.5; 1024]);
/// assert_eq!(samples.len(), 1024);
/// assert_eq!(samples.to_interleaved()[..4], [1.0, 0.5, 1.0, 0.5]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StereoSamples {
    /// Left channel samples.
    pub left: Vec<f32>,
    /// Right channel samples.
    pub right: Vec<f32>,
}

impl StereoSamples {
    /// Create new stereo samples from left and right channels.
    pub fn new(left: Vec<f32>, right: Vec<f32>) -> Self {
        debug_assert_eq!(left.len(), right.len(), "Channels must have same length");
        Self { left, right }
    }

    /// Create stereo samples from mono by duplicating to both channels.
    pub fn from_mono(mono: Vec<f32>) -> Self {
        Self {
            left: mono.clone(),
            right: mono,
        }
    }

    /// Create from interleaved format (L, R, L, R, ...).
    ///
    /// A trailing odd sample is dropped.
    pub fn from_interleaved(interleaved: &[f32]) -> Self {
        let len = interleaved.len() / 2;
        let mut left = Vec::with_capacity(len);
        let mut right = Vec::with_capacity(len);

        for frame in interleaved.chunks_exact(2) {
            left.push(frame[0]);
            right.push(frame[1]);
        }

        Self { left, right }
    }

    /// Convert to interleaved format (L, R, L, R, ...).
    pub fn to_interleaved(&self) -> Vec<f32> {
        let mut interleaved = Vec::with_capacity(self.left.len() * 2);
        for (l, r) in self.left.iter().zip(self.right.iter()) {
            interleaved.push(*l);
            interleaved.push(*r);
        }
        interleaved
    }

    /// Get the number of samples per channel.
    pub fn len(&self) -> usize {
        self.left.len()
    }

    /// Check if the buffers are empty.
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Largest absolute sample across both channels.
    pub fn peak(&self) -> f32 {
        self.left
            .iter()
            .chain(self.right.iter())
            .fold(0.0_f32, |acc, s| acc.max(s.abs()))
    }

    /// Root-mean-square level across both channels.
    pub fn rms(&self) -> f32 {
        let count = self.left.len() + self.right.len();
        if count == 0 {
            return 0.0;
        }
        let sum: f32 = self.left.iter().chain(self.right.iter()).map(|s| s * s).sum();
        libm::sqrtf(sum / count as f32)
    }
}
