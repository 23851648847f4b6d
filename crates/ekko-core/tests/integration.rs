//! Integration tests for ekko-core.
//!
//! Drives the full processor the way a host does: stream-start preparation,
//! per-block control updates and in-place channel buffers. Verifies the
//! sample-exact impulse response of the default settings and the audio
//! boundary rules for mono and multi-channel layouts.

use ekko_core::{
    ControlParams, DELAY_INDEX, Effect, FeedbackDelay, MIX_INDEX, ParamId, ParameterInfo,
    SharedParams, StereoSamples,
};

const SAMPLE_RATE: f32 = 44100.0;

/// Run `input` through `delay` in blocks of `block_size`, left channel only.
fn run_blocks(
    delay: &mut FeedbackDelay,
    controls: &ControlParams,
    input: &[f32],
    block_size: usize,
) -> Vec<f32> {
    let mut left = input.to_vec();
    let mut right = vec![0.0; input.len()];
    for (l, r) in left
        .chunks_mut(block_size)
        .zip(right.chunks_mut(block_size))
    {
        delay.process_stereo_block(controls, l, r);
    }
    left
}

// ============================================================================
// 1. Impulse response at default settings
// ============================================================================

#[test]
fn default_impulse_response_44k() {
    let mut delay = FeedbackDelay::new(SAMPLE_RATE);
    let mut input = vec![0.0; 22100];
    input[0] = 1.0;

    let out = run_blocks(&mut delay, &ControlParams::default(), &input, 512);

    // Dry half of the impulse, delay line still empty
    assert_eq!(out[0], 0.5);
    // Nothing comes back before the delay length
    assert!(out[1..22050].iter().all(|&s| s == 0.0));
    // 0.5 * (0.5 * 1.0 + 1.0)
    assert_eq!(out[22050], 0.75);
    // Silence written with the bias only: 0.5 * (0.0 + 1.0)
    assert_eq!(out[22051], 0.5);
}

#[test]
fn impulse_response_is_block_size_independent() {
    let mut input = vec![0.0; 3000];
    input[0] = 1.0;
    input[700] = -0.5;
    let controls = ControlParams::new(-6.0, 30.0, 50.0);

    let reference = run_blocks(&mut FeedbackDelay::new(SAMPLE_RATE), &controls, &input, 1);
    for block_size in [7, 64, 256, 1024, 3000] {
        let out = run_blocks(
            &mut FeedbackDelay::new(SAMPLE_RATE),
            &controls,
            &input,
            block_size,
        );
        assert_eq!(out, reference, "block size {block_size}");
    }
}

#[test]
fn right_channel_matches_left_for_same_input() {
    let mut delay = FeedbackDelay::new(SAMPLE_RATE);
    let signal: Vec<f32> = (0..4096).map(|n| libm::sinf(n as f32 * 0.05)).collect();
    let mut left = signal.clone();
    let mut right = signal;
    delay.process_stereo_block(&ControlParams::new(3.0, 60.0, 20.0), &mut left, &mut right);
    assert_eq!(left, right);
}

// ============================================================================
// 2. Per-block control changes
// ============================================================================

#[test]
fn delay_change_takes_effect_next_block() {
    let mut delay = FeedbackDelay::new(1000.0);
    let wet = ControlParams::new(-20.0, 100.0, 10.0);

    let mut left = vec![0.0; 10];
    let mut right = vec![0.0; 10];
    delay.process_stereo_block(&wet, &mut left, &mut right);
    assert_eq!(delay.derived().delay_samples, 10);

    let shorter = ControlParams { delay_ms: 5.0, ..wet };
    delay.process_stereo_block(&shorter, &mut left, &mut right);
    assert_eq!(delay.derived().delay_samples, 5);
    assert_eq!(delay.tail_samples(), 5);
}

#[test]
fn shared_params_drive_blocks() {
    let shared = SharedParams::default();
    let mut delay = FeedbackDelay::new(SAMPLE_RATE);
    let mut left = vec![0.0; 128];
    let mut right = vec![0.0; 128];

    shared.set_by_index(MIX_INDEX, 0.0);
    delay.process_stereo_block(&shared.snapshot(), &mut left, &mut right);
    assert_eq!(delay.derived().wet_gain, 0.0);
    // Fully dry: the bias never reaches the output
    assert!(left.iter().all(|&s| s == 0.0));

    shared.set_by_index(DELAY_INDEX, 5.0);
    delay.process_stereo_block(&shared.snapshot(), &mut left, &mut right);
    assert_eq!(delay.derived().delay_samples, 220);
}

// ============================================================================
// 3. Channel layouts
// ============================================================================

#[test]
fn mono_block_processes_left_line_only() {
    let mut delay = FeedbackDelay::new(SAMPLE_RATE);
    let mut mono = vec![1.0, 0.0, 0.0];
    delay.process_block(&ControlParams::default(), &mut [&mut mono], 1);
    assert_eq!(mono, vec![0.5, 0.0, 0.0]);
}

#[test]
fn surplus_output_channels_are_silent() {
    let mut delay = FeedbackDelay::new(SAMPLE_RATE);
    let mut left = vec![0.25; 64];
    let mut right = vec![f32::NAN; 64];
    let mut extra = vec![123.0; 64];
    let controls = ControlParams::new(0.0, 0.0, 500.0);

    delay.process_block(&controls, &mut [&mut left, &mut right, &mut extra], 1);

    assert!(left.iter().all(|&s| s == 0.25));
    assert!(right.iter().all(|&s| s == 0.0));
    assert!(extra.iter().all(|&s| s == 0.0));
}

#[test]
fn empty_channel_list_is_a_no_op() {
    let mut delay = FeedbackDelay::new(SAMPLE_RATE);
    delay.process_block(&ControlParams::default(), &mut [], 0);
    assert_eq!(delay.derived().delay_samples, 22050);
}

// ============================================================================
// 4. Host seams
// ============================================================================

#[test]
fn effect_trait_matches_block_processing() {
    let signal: Vec<f32> = (0..2048).map(|n| libm::sinf(n as f32 * 0.01)).collect();
    let controls = ControlParams::new(-3.0, 45.0, 12.0);

    let mut by_block = FeedbackDelay::new(SAMPLE_RATE);
    let mut left = signal.clone();
    let mut right = signal.clone();
    by_block.process_stereo_block(&controls, &mut left, &mut right);

    let mut by_frame: Box<dyn Effect> = {
        let mut fx = FeedbackDelay::new(SAMPLE_RATE);
        fx.update(&controls);
        Box::new(fx)
    };
    let framed: Vec<f32> = signal
        .iter()
        .map(|&x| by_frame.process_stereo(x, x).0)
        .collect();

    assert_eq!(framed, left);
    assert_eq!(by_frame.latency_samples(), 0);
}

#[test]
fn parameter_ids_are_stable() {
    let delay = FeedbackDelay::new(SAMPLE_RATE);
    assert_eq!(delay.param_index_by_id(ParamId(100)), Some(0));
    assert_eq!(delay.param_index_by_id(ParamId(101)), Some(1));
    assert_eq!(delay.param_index_by_id(ParamId(102)), Some(2));
    assert_eq!(delay.get_param(0), 0.0);
    assert_eq!(delay.get_param(1), 50.0);
    assert_eq!(delay.get_param(2), 500.0);
}

#[test]
fn stereo_samples_roundtrip_through_processor() {
    let mut samples = StereoSamples::from_mono(vec![1.0, 0.0, 0.0, 0.0]);
    let mut delay = FeedbackDelay::new(SAMPLE_RATE);
    let StereoSamples { left, right } = &mut samples;
    delay.process_stereo_block(&ControlParams::new(0.0, 0.0, 500.0), left, right);
    assert_eq!(samples.to_interleaved(), vec![1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
}
