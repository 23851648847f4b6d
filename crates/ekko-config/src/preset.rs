//! Preset file format and operations.

use ekko_core::{ControlParams, DEFAULT_DELAY_MS, DEFAULT_FEEDBACK_DB, DEFAULT_MIX_PERCENT};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConfigError, FileOp};

/// Preset file format for the delay's three controls.
///
/// Presets are stored as TOML files. They can be loaded from files, created
/// programmatically, and saved to disk. Missing control fields take their
/// default values; out-of-range values load as written and are clamped by
/// [`Preset::controls`].
///
/// # TOML Format
///
/// ```toml
/// name = "Slapback"
/// description = "Short single echo"
/// feedback_db = -20.0
/// mix_percent = 35.0
/// delay_ms = 110.0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preset {
    /// Name of the preset.
    pub name: String,

    /// Optional description of the preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Feedback gain in dB.
    #[serde(default = "default_feedback_db")]
    pub feedback_db: f32,

    /// Wet/dry mix in percent wet.
    #[serde(default = "default_mix_percent")]
    pub mix_percent: f32,

    /// Delay time in milliseconds.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: f32,
}

fn default_feedback_db() -> f32 {
    DEFAULT_FEEDBACK_DB
}

fn default_mix_percent() -> f32 {
    DEFAULT_MIX_PERCENT
}

fn default_delay_ms() -> f32 {
    DEFAULT_DELAY_MS
}

impl Preset {
    /// Create a preset with default controls.
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_controls(name, &ControlParams::default())
    }

    /// Create a preset holding `controls` as given.
    pub fn from_controls(name: impl Into<String>, controls: &ControlParams) -> Self {
        Self {
            name: name.into(),
            description: None,
            feedback_db: controls.feedback_db,
            mix_percent: controls.mix_percent,
            delay_ms: controls.delay_ms,
        }
    }

    /// Create a preset with a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The preset's controls, clamped to their valid ranges.
    pub fn controls(&self) -> ControlParams {
        ControlParams::new(self.feedback_db, self.mix_percent, self.delay_ms).clamped()
    }

    /// Load a preset from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::io(FileOp::Read, path, e))?;
        let preset: Preset = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), name = %preset.name, "loaded preset");
        Ok(preset)
    }

    /// Load a preset from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the preset to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::io(FileOp::CreateDir, parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::io(FileOp::Write, path, e))?;
        Ok(())
    }

    /// Convert the preset to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::new("Untitled")
    }
}
