//! Ekko Core - stereo feedback delay DSP
//!
//! This crate holds the signal-processing core of the ekko delay, designed
//! for real-time audio processing with zero allocation in the audio path.
//!
//! # Core Abstractions
//!
//! ## Parameter Controller
//!
//! - [`ControlParams`] - The three user controls (feedback dB, mix %, delay ms)
//! - [`recompute`] - Per-block translation into [`DerivedParams`]
//! - [`SharedParams`] - Lock-free per-field storage shared with a control thread
//!
//! ## Delay Engine
//!
//! - [`DelayLine`] - Fixed-capacity circular buffer with adjustable length
//! - [`FeedbackDelay`] - Stereo processor running the per-sample algorithm
//!
//! ## Host Seams
//!
//! - [`Effect`] - Object-safe stereo processing trait
//! - [`ParameterInfo`] - Parameter introspection for hosts and listings
//! - [`StereoSamples`] - File-level stereo interchange (`std` only)
//!
//! ## Utilities
//!
//! - Math functions: [`db_to_linear`], [`linear_to_db`], [`ms_to_samples`], [`flush_denormal`]
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible for embedded audio applications.
//! Disable the default `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! ekko-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use ekko_core::{ControlParams, FeedbackDelay};
//!
//! // Stream start: sample rate known, buffers allocated once
//! let mut delay = FeedbackDelay::new(48000.0);
//!
//! // Each audio callback: controls in, channels processed in place
//! let controls = ControlParams::new(-6.0, 35.0, 250.0);
//! let mut left = vec![0.0_f32; 512];
//! let mut right = vec![0.0_f32; 512];
//! delay.process_block(&controls, &mut [&mut left, &mut right], 2);
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: No allocations after [`FeedbackDelay::prepare`]
//! - **No dependencies on std**: Pure `no_std` with `libm` for math
//! - **Clamp, never fail**: Out-of-range controls are forced into range

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod delay;
pub mod effect;
pub mod math;
pub mod param_info;
pub mod params;
pub mod processor;
pub mod shared;
pub mod stereo;

// Re-export main types at crate root
pub use delay::DelayLine;
pub use effect::Effect;
pub use math::{
    clamp_or, db_to_linear, flush_denormal, linear_to_db, ms_to_samples, samples_to_ms,
};
pub use param_info::{ParamDescriptor, ParamFlags, ParamId, ParamUnit, ParameterInfo};
pub use params::{
    CONTROL_DESCRIPTORS, ControlParams, DEFAULT_DELAY_MS, DEFAULT_FEEDBACK_DB,
    DEFAULT_MIX_PERCENT, DELAY_MS_RANGE, DerivedParams, FEEDBACK_DB_RANGE, MAX_DELAY_MS,
    MIX_PERCENT_RANGE, max_delay_samples, recompute,
};
pub use processor::FeedbackDelay;
pub use shared::{DELAY_INDEX, FEEDBACK_INDEX, MIX_INDEX, SharedParams};
pub use stereo::StereoSamples;
