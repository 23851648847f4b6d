//! Configuration and preset management for the ekko delay.
//!
//! # Features
//!
//! - **Preset System**: Load and save the three delay controls as TOML files
//! - **Validation**: Range diagnostics for controls and presets
//! - **Paths**: Platform-specific user preset directory
//! - **Factory Presets**: Built-in presets for common use cases
//!
//! # Example
//!
//! ```rust,no_run
//! use ekko_config::{Preset, resolve_preset, user_presets_dir};
//! use ekko_core::ControlParams;
//!
//! // Factory name, user preset name, or a path
//! let preset = resolve_preset("slapback").unwrap();
//! let controls = preset.controls();
//!
//! // Save a custom preset to the user presets directory
//! let mine = Preset::from_controls("Tape Room", &ControlParams::new(-9.0, 30.0, 180.0));
//! mine.save(user_presets_dir().join("tape_room.toml")).unwrap();
//! ```

mod error;
mod preset;

/// Platform-specific paths for presets and configuration.
pub mod paths;

/// Control and preset validation.
pub mod validation;

/// Factory presets bundled with the library.
pub mod factory_presets;

pub use error::{ConfigError, FileOp};
pub use factory_presets::{
    factory_preset_names, factory_presets, get_factory_preset, is_factory_preset,
};
pub use paths::{
    ensure_user_presets_dir, find_preset, list_user_presets, preset_name_from_path,
    user_config_dir, user_presets_dir,
};
pub use preset::Preset;
pub use validation::{
    ValidationError, ValidationResult, find_param, parse_param_value, validate_param,
    validate_preset,
};

/// Resolve a preset by factory name, user preset name, or file path.
///
/// Factory presets win over files of the same name.
///
/// # Errors
///
/// Returns [`ConfigError::PresetNotFound`] when nothing matches, or the
/// read/parse error of a matching file.
pub fn resolve_preset(name: &str) -> Result<Preset, ConfigError> {
    if let Some(preset) = get_factory_preset(name) {
        tracing::debug!(name, "using factory preset");
        return Ok(preset);
    }

    match find_preset(name) {
        Some(path) => Preset::load(path),
        None => Err(ConfigError::PresetNotFound(name.to_string())),
    }
}
