//! Shared CLI helpers used across multiple commands.

use clap::Args;
use ekko_config::{Preset, resolve_preset, validate_preset};
use ekko_core::{ControlParams, StereoSamples, linear_to_db};

/// Control selection shared by `process` and `realtime`.
///
/// A preset supplies the starting values; explicit flags override it.
#[derive(Args, Debug, Default)]
pub struct ControlArgs {
    /// Preset name (factory or user) or path to a preset TOML file
    #[arg(short, long)]
    pub preset: Option<String>,

    /// Feedback gain in dB (-20 to 20)
    #[arg(long, allow_negative_numbers = true)]
    pub feedback_db: Option<f32>,

    /// Wet/dry mix in percent (0 to 100)
    #[arg(long)]
    pub mix: Option<f32>,

    /// Delay time in milliseconds (5 to 10000)
    #[arg(long)]
    pub delay_ms: Option<f32>,
}

impl ControlArgs {
    /// Resolve the preset (if any), apply overrides and clamp.
    ///
    /// Out-of-range values are reported as warnings, never rejected.
    pub fn resolve(&self) -> anyhow::Result<(Preset, ControlParams)> {
        let mut preset = match &self.preset {
            Some(name) => resolve_preset(name).map_err(|e| {
                anyhow::anyhow!("{e}. Use 'ekko presets list' to see available presets.")
            })?,
            None => Preset::default(),
        };

        if let Some(v) = self.feedback_db {
            preset.feedback_db = v;
        }
        if let Some(v) = self.mix {
            preset.mix_percent = v;
        }
        if let Some(v) = self.delay_ms {
            preset.delay_ms = v;
        }

        if let Err(err) = validate_preset(&preset) {
            tracing::warn!("{err}; clamping");
        }

        let controls = preset.controls();
        Ok((preset, controls))
    }
}

/// One-line summary of a control set.
pub fn describe_controls(controls: &ControlParams) -> String {
    format!(
        "feedback {:+.1} dB, mix {:.0}%, delay {:.1} ms",
        controls.feedback_db, controls.mix_percent, controls.delay_ms
    )
}

/// RMS and peak level of both channels, in dBFS.
pub fn level_stats(samples: &StereoSamples) -> (f32, f32) {
    (linear_to_db(samples.rms()), linear_to_db(samples.peak()))
}
