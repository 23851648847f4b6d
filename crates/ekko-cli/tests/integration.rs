//! Integration tests for ekko-cli.
//!
//! Tests invoke the built `ekko` binary and check its output and the files
//! it writes.

use ekko_core::StereoSamples;
use ekko_io::{WavSpec, read_wav_stereo, write_wav_stereo};
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Helper to get the path to the `ekko` binary built by cargo.
fn ekko_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_ekko"))
}

fn run_ok(cmd: &mut Command) -> Output {
    let output = cmd.output().expect("failed to run ekko");
    assert!(
        output.status.success(),
        "ekko failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    output
}

fn write_impulse(path: &Path, sample_rate: u32, frames: usize) {
    let mut left = vec![0.0; frames];
    left[0] = 1.0;
    let spec = WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 32,
    };
    write_wav_stereo(path, &StereoSamples::new(left, vec![0.0; frames]), spec).unwrap();
}

// ---------------------------------------------------------------------------
// General
// ---------------------------------------------------------------------------

#[test]
fn cli_help_lists_commands() {
    let output = run_ok(ekko_bin().arg("--help"));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ekko stereo feedback delay"));
    for cmd in ["process", "realtime", "params", "presets", "info", "devices"] {
        assert!(stdout.contains(cmd), "help should mention '{cmd}'");
    }
}

#[test]
fn cli_version_works() {
    let output = run_ok(ekko_bin().arg("--version"));
    assert!(String::from_utf8_lossy(&output.stdout).contains("ekko"));
}

// ---------------------------------------------------------------------------
// `ekko params`
// ---------------------------------------------------------------------------

#[test]
fn cli_params_table() {
    let output = run_ok(ekko_bin().arg("params"));
    let stdout = String::from_utf8_lossy(&output.stdout);
    for key in ["feedback_db", "mix", "delay_ms"] {
        assert!(stdout.contains(key), "params should list '{key}'");
    }
}

#[test]
fn cli_params_json_in_index_order() {
    let output = run_ok(ekko_bin().args(["params", "--json"]));
    let params: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();

    let ids: Vec<u64> = params.iter().map(|p| p["id"].as_u64().unwrap()).collect();
    assert_eq!(ids, [100, 101, 102]);
    assert_eq!(params[0]["min"], -20.0);
    assert_eq!(params[1]["default"], 50.0);
    assert_eq!(params[2]["min"], 5.0);
}

// ---------------------------------------------------------------------------
// `ekko presets`
// ---------------------------------------------------------------------------

#[test]
fn cli_presets_list_shows_factory() {
    let output = run_ok(ekko_bin().args(["presets", "list", "--factory"]));
    let stdout = String::from_utf8_lossy(&output.stdout);
    for name in ["Default", "Slapback", "Long Echo", "Ambient", "Dry"] {
        assert!(stdout.contains(name), "list should contain '{name}'");
    }
}

#[test]
fn cli_presets_show_factory() {
    let output = run_ok(ekko_bin().args(["presets", "show", "slapback"]));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Preset: Slapback"));
    assert!(stdout.contains("delay_ms    = 110"));
}

#[test]
fn cli_presets_show_unknown_fails() {
    let output = ekko_bin()
        .args(["presets", "show", "no-such-preset"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[cfg(target_os = "linux")]
#[test]
fn cli_presets_save_then_use() {
    let config = TempDir::new().unwrap();
    let with_config = |cmd: &mut Command| {
        cmd.env("XDG_CONFIG_HOME", config.path());
    };

    let mut save = ekko_bin();
    save.args(["presets", "save", "tape", "--delay-ms", "5", "--mix", "100"]);
    with_config(&mut save);
    run_ok(&mut save);
    assert!(config.path().join("ekko/presets/tape.toml").exists());

    // Saving again without --force refuses
    let mut again = ekko_bin();
    again.args(["presets", "save", "tape"]);
    with_config(&mut again);
    assert!(!again.output().unwrap().status.success());

    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    let output = dir.path().join("out.wav");
    write_impulse(&input, 1000, 16);

    let mut process = ekko_bin();
    process.args(["process", "--preset", "tape", "--feedback-db", "-20"]);
    process.arg(&input).arg(&output);
    with_config(&mut process);
    run_ok(&mut process);

    let (rendered, _) = read_wav_stereo(&output).unwrap();
    assert!((rendered.left[5] - 1.1).abs() < 1e-5);
}

// ---------------------------------------------------------------------------
// `ekko process`
// ---------------------------------------------------------------------------

#[test]
fn cli_process_default_impulse_response() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("impulse.wav");
    let output = dir.path().join("echo.wav");
    write_impulse(&input, 44100, 22100);

    run_ok(ekko_bin().arg("process").arg(&input).arg(&output));

    let (rendered, spec) = read_wav_stereo(&output).unwrap();
    assert_eq!(spec.sample_rate, 44100);
    assert_eq!(spec.channels, 2);
    assert_eq!(rendered.len(), 22100);
    assert_eq!(rendered.left[0], 0.5);
    assert_eq!(rendered.left[22050], 0.75);
    assert_eq!(rendered.left[22051], 0.5);
}

#[test]
fn cli_process_flags_override_defaults() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    let output = dir.path().join("out.wav");
    write_impulse(&input, 1000, 16);

    run_ok(
        ekko_bin()
            .arg("process")
            .arg(&input)
            .arg(&output)
            .args(["--feedback-db", "-20", "--mix", "100", "--delay-ms", "5"])
            .args(["--block-size", "3"]),
    );

    let (rendered, _) = read_wav_stereo(&output).unwrap();
    assert!(rendered.left[..5].iter().all(|&s| s == 0.0));
    assert!((rendered.left[5] - 1.1).abs() < 1e-5);
}

#[test]
fn cli_process_dry_preset_is_transparent() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    let output = dir.path().join("out.wav");

    let signal: Vec<f32> = (0..500).map(|i| (i as f32 * 0.05).sin() * 0.5).collect();
    write_wav_stereo(
        &input,
        &StereoSamples::from_mono(signal),
        WavSpec {
            sample_rate: 8000,
            ..Default::default()
        },
    )
    .unwrap();

    run_ok(
        ekko_bin()
            .arg("process")
            .arg(&input)
            .arg(&output)
            .args(["--preset", "dry"]),
    );

    let (original, _) = read_wav_stereo(&input).unwrap();
    let (rendered, _) = read_wav_stereo(&output).unwrap();
    assert_eq!(original, rendered);
}

#[test]
fn cli_process_tail_extends_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    let output = dir.path().join("out.wav");
    write_impulse(&input, 1000, 10);

    run_ok(
        ekko_bin()
            .arg("process")
            .arg(&input)
            .arg(&output)
            .args(["--delay-ms", "100", "--tail"]),
    );

    let (rendered, _) = read_wav_stereo(&output).unwrap();
    assert_eq!(rendered.len(), 110);
}

#[test]
fn cli_process_16_bit_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    let output = dir.path().join("out.wav");
    write_impulse(&input, 1000, 32);

    run_ok(
        ekko_bin()
            .arg("process")
            .arg(&input)
            .arg(&output)
            .args(["--bit-depth", "16", "--mix", "0"]),
    );

    let info = ekko_io::read_wav_info(&output).unwrap();
    assert_eq!(info.bits_per_sample, 16);
    assert_eq!(info.format, ekko_io::WavFormat::Pcm);
}

#[test]
fn cli_process_rejects_bad_bit_depth() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    write_impulse(&input, 1000, 8);

    let output = ekko_bin()
        .arg("process")
        .arg(&input)
        .arg(dir.path().join("out.wav"))
        .args(["--bit-depth", "12"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn cli_process_missing_input_fails() {
    let dir = TempDir::new().unwrap();
    let output = ekko_bin()
        .arg("process")
        .arg(dir.path().join("missing.wav"))
        .arg(dir.path().join("out.wav"))
        .output()
        .unwrap();
    assert!(!output.status.success());
}

// ---------------------------------------------------------------------------
// `ekko info`
// ---------------------------------------------------------------------------

#[test]
fn cli_info_shows_metadata() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    write_impulse(&input, 44100, 44100);

    let output = run_ok(ekko_bin().arg("info").arg(&input));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("IEEE Float 32-bit"));
    assert!(stdout.contains("44100 Hz"));
    assert!(stdout.contains("1.000s"));
}
