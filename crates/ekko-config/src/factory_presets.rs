//! Factory presets bundled with the ekko library.
//!
//! Built-in presets are always available without external files. They are
//! embedded as TOML so they go through exactly the same parser as user
//! presets.

use crate::Preset;

/// TOML content for factory presets, keyed by lookup name.
static FACTORY_PRESETS_TOML: &[(&str, &str)] = &[
    ("default", DEFAULT_PRESET),
    ("slapback", SLAPBACK_PRESET),
    ("long-echo", LONG_ECHO_PRESET),
    ("ambient", AMBIENT_PRESET),
    ("dry", DRY_PRESET),
];

const DEFAULT_PRESET: &str = r#"
name = "Default"
description = "Half wet, half a second, unity feedback"
feedback_db = 0.0
mix_percent = 50.0
delay_ms = 500.0
"#;

const SLAPBACK_PRESET: &str = r#"
name = "Slapback"
description = "Short single repeat for vocals and guitar"
feedback_db = -20.0
mix_percent = 35.0
delay_ms = 110.0
"#;

const LONG_ECHO_PRESET: &str = r#"
name = "Long Echo"
description = "Spacious repeat well behind the beat"
feedback_db = -6.0
mix_percent = 40.0
delay_ms = 1200.0
"#;

const AMBIENT_PRESET: &str = r#"
name = "Ambient"
description = "Mostly wet with a multi-second delay"
feedback_db = -3.0
mix_percent = 70.0
delay_ms = 2500.0
"#;

const DRY_PRESET: &str = r#"
name = "Dry"
description = "Bypass-equivalent: input passes unchanged"
feedback_db = 0.0
mix_percent = 0.0
delay_ms = 500.0
"#;

/// Get all factory presets in their canonical order.
///
/// # Example
///
/// ```rust
/// use ekko_config::factory_presets;
///
/// for preset in factory_presets() {
///     println!("  - {}: {}", preset.name, preset.description.as_deref().unwrap_or(""));
/// }
/// ```
pub fn factory_presets() -> Vec<Preset> {
    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(_, toml)| Preset::from_toml(toml).ok())
        .collect()
}

/// Get a factory preset by name.
///
/// Matches the lookup name (`"long-echo"`) or the display name
/// (`"Long Echo"`), case-insensitively.
///
/// # Example
///
/// ```rust
/// use ekko_config::get_factory_preset;
///
/// let preset = get_factory_preset("Slapback").unwrap();
/// assert_eq!(preset.delay_ms, 110.0);
/// ```
pub fn get_factory_preset(name: &str) -> Option<Preset> {
    if let Some((_, toml)) = FACTORY_PRESETS_TOML
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
    {
        return Preset::from_toml(toml).ok();
    }

    factory_presets()
        .into_iter()
        .find(|preset| preset.name.eq_ignore_ascii_case(name))
}

/// Get the lookup names of all factory presets.
///
/// ```rust
/// use ekko_config::factory_preset_names;
///
/// assert!(factory_preset_names().contains(&"ambient"));
/// ```
pub fn factory_preset_names() -> Vec<&'static str> {
    FACTORY_PRESETS_TOML.iter().map(|(name, _)| *name).collect()
}

/// Check if a name refers to a factory preset.
pub fn is_factory_preset(name: &str) -> bool {
    get_factory_preset(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate_preset;
    use ekko_core::ControlParams;

    #[test]
    fn test_every_factory_preset_parses() {
        assert_eq!(factory_presets().len(), FACTORY_PRESETS_TOML.len());
    }

    #[test]
    fn test_factory_presets_are_in_range() {
        for preset in factory_presets() {
            assert!(
                validate_preset(&preset).is_ok(),
                "factory preset '{}' has out-of-range controls",
                preset.name
            );
        }
    }

    #[test]
    fn test_default_preset_matches_control_defaults() {
        let preset = get_factory_preset("default").unwrap();
        assert_eq!(preset.controls(), ControlParams::default());
    }

    #[test]
    fn test_lookup_by_key_and_display_name() {
        assert_eq!(get_factory_preset("long-echo").unwrap().name, "Long Echo");
        assert_eq!(get_factory_preset("LONG ECHO").unwrap().name, "Long Echo");
        assert!(get_factory_preset("hall").is_none());
        assert!(is_factory_preset("Dry"));
        assert!(!is_factory_preset("my_custom_preset"));
    }

    #[test]
    fn test_dry_preset_is_fully_dry() {
        assert_eq!(get_factory_preset("dry").unwrap().mix_percent, 0.0);
    }

    #[test]
    fn test_names_are_unique() {
        let mut names = factory_preset_names();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), FACTORY_PRESETS_TOML.len());
    }
}
