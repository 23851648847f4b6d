//! Audio I/O layer for the ekko delay.
//!
//! This crate provides:
//!
//! - **WAV file I/O**: [`read_wav_stereo`] and [`write_wav_stereo`] for loading/saving audio files
//! - **Offline hosting**: [`OfflineHost`] renders files block by block through a [`FeedbackDelay`](ekko_core::FeedbackDelay)
//! - **Real-time streaming**: [`AudioStream`] for live input-to-output processing
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ekko_core::ControlParams;
//! use ekko_io::{OfflineHost, read_wav_stereo, write_wav_stereo};
//!
//! let (samples, spec) = read_wav_stereo("input.wav")?;
//!
//! let mut host = OfflineHost::with_controls(spec.sample_rate as f32, ControlParams::default());
//! let processed = host.process_file(&samples, 512);
//!
//! write_wav_stereo("output.wav", &processed, spec)?;
//! # Ok::<(), ekko_io::Error>(())
//! ```

mod engine;
mod stream;
mod wav;

pub use engine::{BlockAutomation, BlockContext, OfflineHost};
pub use stream::{AudioDevice, AudioStream, StreamConfig, default_device, list_devices};
pub use wav::{WavFormat, WavInfo, WavSpec, read_wav_info, read_wav_stereo, write_wav_stereo};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Audio stream setup or runtime error.
    #[error("Audio stream error: {0}")]
    Stream(String),

    /// No audio device available on the system.
    #[error("No audio device available")]
    NoDevice,

    /// The requested audio device was not found.
    #[error("Device not found: {0}")]
    DeviceNotFound(String),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
