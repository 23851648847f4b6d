//! Offline block-driven host for the feedback delay.

use std::sync::Arc;

use ekko_core::{ControlParams, Effect, FeedbackDelay, SharedParams, StereoSamples};

/// Position of a block within an offline render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockContext {
    /// Zero-based block number.
    pub index: usize,
    /// First frame of the block within the file.
    pub start_frame: usize,
    /// Frames in this block (the last block may be short).
    pub len: usize,
}

/// Callback run before each block, free to change the shared controls.
pub type BlockAutomation = Box<dyn FnMut(BlockContext, &SharedParams) + Send>;

/// Renders whole files through a [`FeedbackDelay`] the way a real-time
/// host would: fixed-size blocks, one control snapshot per block.
///
/// Controls live in an [`Arc<SharedParams>`] so another thread (or an
/// automation callback) can change them while a render is running.
///
/// # Example
///
/// ```rust
/// use ekko_core::{ControlParams, StereoSamples};
/// use ekko_io::OfflineHost;
///
/// let mut host = OfflineHost::with_controls(44100.0, ControlParams::default());
/// let mut impulse = vec![0.0; 1024];
/// impulse[0] = 1.0;
///
/// let output = host.process_file(&StereoSamples::from_mono(impulse), 256);
/// assert_eq!(output.left[0], 0.5);
/// ```
pub struct OfflineHost {
    delay: FeedbackDelay,
    params: Arc<SharedParams>,
    automation: Option<BlockAutomation>,
}

impl OfflineHost {
    /// Create a host at `sample_rate` reading controls from `params`.
    pub fn new(sample_rate: f32, params: Arc<SharedParams>) -> Self {
        let mut delay = FeedbackDelay::new(sample_rate);
        delay.update(&params.snapshot());
        Self {
            delay,
            params,
            automation: None,
        }
    }

    /// Create a host with its own shared controls seeded from `controls`.
    pub fn with_controls(sample_rate: f32, controls: ControlParams) -> Self {
        Self::new(sample_rate, Arc::new(SharedParams::new(controls)))
    }

    /// Install a per-block automation callback.
    pub fn set_automation<F>(&mut self, automation: F)
    where
        F: FnMut(BlockContext, &SharedParams) + Send + 'static,
    {
        self.automation = Some(Box::new(automation));
    }

    /// Remove the automation callback.
    pub fn clear_automation(&mut self) {
        self.automation = None;
    }

    /// Shared controls handle.
    pub fn params(&self) -> &Arc<SharedParams> {
        &self.params
    }

    /// The hosted processor.
    pub fn delay(&self) -> &FeedbackDelay {
        &self.delay
    }

    /// Sample rate the processor was prepared for.
    pub fn sample_rate(&self) -> f32 {
        self.delay.sample_rate()
    }

    /// Clear the delay lines, keeping controls and sample rate.
    pub fn reset(&mut self) {
        self.delay.reset();
    }

    /// Process an entire file's worth of samples in blocks of `block_size`.
    ///
    /// Returns new buffers; the input is untouched. A `block_size` of zero
    /// is treated as one.
    pub fn process_file(&mut self, input: &StereoSamples, block_size: usize) -> StereoSamples {
        self.process_file_with_progress(input, block_size, |_, _| {})
    }

    /// Like [`process_file`](Self::process_file), calling `progress` with
    /// `(frames_done, frames_total)` after every block.
    pub fn process_file_with_progress<F>(
        &mut self,
        input: &StereoSamples,
        block_size: usize,
        mut progress: F,
    ) -> StereoSamples
    where
        F: FnMut(usize, usize),
    {
        let block_size = block_size.max(1);
        let total = input.len();
        let mut output = input.clone();

        let blocks = output
            .left
            .chunks_mut(block_size)
            .zip(output.right.chunks_mut(block_size));

        for (index, (left, right)) in blocks.enumerate() {
            let ctx = BlockContext {
                index,
                start_frame: index * block_size,
                len: left.len(),
            };
            if let Some(automation) = self.automation.as_mut() {
                automation(ctx, &self.params);
            }

            let controls = self.params.snapshot();
            self.delay.process_stereo_block(&controls, left, right);
            progress(ctx.start_frame + ctx.len, total);
        }

        tracing::debug!(frames = total, block_size, "offline render complete");
        output
    }
}
