//! Integration tests for ekko-config.
//!
//! These tests verify end-to-end functionality across modules: presets on
//! disk, resolution order, and presets driving the delay processor.

use ekko_config::{
    ConfigError, FileOp, Preset, factory_presets, get_factory_preset, resolve_preset,
    validate_preset,
};
use ekko_core::{ControlParams, FeedbackDelay};
use tempfile::TempDir;

#[test]
fn test_save_and_load_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("room.toml");

    let preset = Preset::from_controls("Room", &ControlParams::new(-9.0, 30.0, 180.0))
        .with_description("saved by test");
    preset.save(&path).unwrap();

    let loaded = Preset::load(&path).unwrap();
    assert_eq!(loaded, preset);
}

#[test]
fn test_load_missing_file_reports_path() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("missing.toml");

    let err = Preset::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Io { op: FileOp::Read, .. }));
    assert!(err.to_string().contains("missing.toml"));
}

#[test]
fn test_save_under_a_file_reports_directory_failure() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();

    let err = Preset::default().save(blocker.join("sub/x.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { op: FileOp::CreateDir, .. }));
    assert_eq!(err.path(), Some(blocker.join("sub").as_path()));

    let err = Preset::default().save(blocker.join("x.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { op: FileOp::Write, .. }));
}

#[test]
fn test_load_malformed_toml() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bad.toml");
    std::fs::write(&path, "name = \"Bad\"\ndelay_ms = \"long\"").unwrap();

    assert!(matches!(Preset::load(&path), Err(ConfigError::Parse(_))));
}

#[test]
fn test_resolve_prefers_factory_then_path() {
    assert_eq!(resolve_preset("ambient").unwrap().name, "Ambient");

    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("custom.toml");
    std::fs::write(&path, "name = \"Custom\"\nmix_percent = 12.0").unwrap();

    let preset = resolve_preset(path.to_str().unwrap()).unwrap();
    assert_eq!(preset.name, "Custom");
    assert_eq!(preset.mix_percent, 12.0);
    assert_eq!(preset.delay_ms, 500.0);
}

#[test]
fn test_resolve_unknown_name() {
    let err = resolve_preset("definitely_not_a_preset_98765").unwrap_err();
    assert!(matches!(err, ConfigError::PresetNotFound(ref n) if n == "definitely_not_a_preset_98765"));
}

#[test]
fn test_out_of_range_file_is_clamped_not_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("wild.toml");
    std::fs::write(
        &path,
        "name = \"Wild\"\nfeedback_db = 60.0\nmix_percent = 150.0\ndelay_ms = 60000.0",
    )
    .unwrap();

    let preset = Preset::load(&path).unwrap();
    assert!(validate_preset(&preset).is_err());
    assert_eq!(preset.controls(), ControlParams::new(20.0, 100.0, 10000.0));
}

#[test]
fn test_factory_presets_drive_processor() {
    for preset in factory_presets() {
        let mut delay = FeedbackDelay::new(48000.0);
        let mut left: Vec<f32> = (0..1024).map(|i| (i as f32 * 0.01).sin() * 0.5).collect();
        let mut right = left.clone();

        delay.process_stereo_block(&preset.controls(), &mut left, &mut right);

        assert!(
            left.iter().chain(right.iter()).all(|s| s.is_finite()),
            "preset '{}' produced non-finite output",
            preset.name
        );
        assert_eq!(delay.controls(), &preset.controls());
    }
}

#[test]
fn test_dry_factory_preset_is_transparent() {
    let preset = get_factory_preset("dry").unwrap();
    let mut delay = FeedbackDelay::new(44100.0);
    let input: Vec<f32> = (0..512).map(|i| (i as f32 * 0.03).cos()).collect();
    let mut left = input.clone();
    let mut right = input.clone();

    delay.process_stereo_block(&preset.controls(), &mut left, &mut right);

    assert_eq!(left, input);
    assert_eq!(right, input);
}
