//! File-based delay processing command.

use crate::commands::common::{ControlArgs, describe_controls, level_stats};
use clap::Args;
use ekko_io::{OfflineHost, WavSpec, read_wav_stereo, write_wav_stereo};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    #[command(flatten)]
    controls: ControlArgs,

    /// Processing block size (frames per control snapshot)
    #[arg(long, default_value = "512")]
    block_size: usize,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32", value_parser = parse_bit_depth)]
    bit_depth: u16,

    /// Append silence so the last repeat is not cut off
    #[arg(long)]
    tail: bool,
}

fn parse_bit_depth(s: &str) -> Result<u16, String> {
    match s.parse::<u16>() {
        Ok(bits @ (16 | 24 | 32)) => Ok(bits),
        _ => Err(format!("unsupported bit depth '{s}' (expected 16, 24 or 32)")),
    }
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    let (preset, controls) = args.controls.resolve()?;

    println!("Reading {}...", args.input.display());
    let (mut samples, spec) = read_wav_stereo(&args.input)?;
    let sample_rate = spec.sample_rate as f32;

    println!(
        "  {} frames, {} Hz, {} ch, {:.2}s",
        samples.len(),
        spec.sample_rate,
        spec.channels,
        samples.len() as f32 / sample_rate
    );

    let mut host = OfflineHost::with_controls(sample_rate, controls);

    if args.tail {
        let padded = samples.len() + host.delay().tail_samples();
        samples.left.resize(padded, 0.0);
        samples.right.resize(padded, 0.0);
    }

    if args.controls.preset.is_some() {
        println!("Preset: {}", preset.name);
    }
    println!("Processing with {}...", describe_controls(&controls));
    tracing::debug!(block_size = args.block_size, "offline render");

    let pb = ProgressBar::new(samples.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    let output = host.process_file_with_progress(&samples, args.block_size, |done, _| {
        pb.set_position(done as u64);
    });
    pb.finish_and_clear();

    let (input_rms, input_peak) = level_stats(&samples);
    let (output_rms, output_peak) = level_stats(&output);

    println!("\nStats:");
    println!("  Input:  RMS {input_rms:.1} dB, Peak {input_peak:.1} dB");
    println!("  Output: RMS {output_rms:.1} dB, Peak {output_peak:.1} dB");
    if output_peak > 0.0 {
        println!("  Warning: output exceeds 0 dBFS");
    }

    let out_spec = WavSpec {
        channels: 2,
        sample_rate: spec.sample_rate,
        bits_per_sample: args.bit_depth,
    };

    println!("\nWriting {}...", args.output.display());
    write_wav_stereo(&args.output, &output, out_spec)?;
    println!("Done!");

    Ok(())
}
