//! Audio device listing command.

use clap::Args;
use ekko_io::{default_device, list_devices};

#[derive(Args)]
pub struct DevicesArgs {
    /// Show only the default input and output
    #[arg(long)]
    default: bool,
}

pub fn run(args: DevicesArgs) -> anyhow::Result<()> {
    if args.default {
        let (input, output) = default_device()?;
        let name = |d: Option<ekko_io::AudioDevice>| {
            d.map_or_else(
                || "(none)".to_string(),
                |d| format!("{} ({} Hz)", d.name, d.default_sample_rate),
            )
        };
        println!("Default input:  {}", name(input));
        println!("Default output: {}", name(output));
        return Ok(());
    }

    let devices = list_devices()?;
    if devices.is_empty() {
        println!("No audio devices found.");
        return Ok(());
    }

    println!("Available Audio Devices");
    println!("=======================\n");

    let inputs: Vec<_> = devices.iter().filter(|d| d.is_input).collect();
    if !inputs.is_empty() {
        println!("Input Devices:");
        for (idx, device) in inputs.iter().enumerate() {
            let also = if device.is_output { " (also output)" } else { "" };
            println!(
                "  [{idx}] {} ({} Hz){also}",
                device.name, device.default_sample_rate
            );
        }
        println!();
    }

    let outputs: Vec<_> = devices.iter().filter(|d| d.is_output).collect();
    if !outputs.is_empty() {
        println!("Output Devices:");
        for (idx, device) in outputs.iter().enumerate() {
            let also = if device.is_input { " (also input)" } else { "" };
            println!(
                "  [{idx}] {} ({} Hz){also}",
                device.name, device.default_sample_rate
            );
        }
        println!();
    }

    println!(
        "Total: {} input(s), {} output(s)",
        inputs.len(),
        outputs.len()
    );
    println!();
    println!("Tip: Use device index or partial name:");
    println!("  ekko realtime --input-device 0 --output-device 0");

    Ok(())
}
