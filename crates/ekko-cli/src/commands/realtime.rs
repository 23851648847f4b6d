//! Real-time delay processing with a stdin control thread.

use crate::commands::common::{ControlArgs, describe_controls};
use clap::Args;
use ekko_config::{ValidationError, find_param, parse_param_value};
use ekko_core::{FeedbackDelay, SharedParams};
use ekko_io::{AudioStream, StreamConfig};
use std::io::BufRead;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Args)]
pub struct RealtimeArgs {
    #[command(flatten)]
    controls: ControlArgs,

    /// Input device (index, name, or partial name)
    #[arg(long)]
    input_device: Option<String>,

    /// Output device (index, name, or partial name)
    #[arg(long)]
    output_device: Option<String>,
}

/// A parsed line from the control thread.
#[derive(Debug, PartialEq)]
enum ControlCommand {
    /// Write one control by index.
    Set { index: usize, value: f32 },
    Show,
    Quit,
    Help,
}

fn parse_command(line: &str) -> Result<Option<ControlCommand>, ValidationError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };

    let command = match head.to_ascii_lowercase().as_str() {
        "show" | "s" => ControlCommand::Show,
        "quit" | "q" | "exit" => ControlCommand::Quit,
        "help" | "?" => ControlCommand::Help,
        name => {
            let (index, desc) = find_param(name)
                .ok_or_else(|| ValidationError::UnknownParameter(name.to_string()))?;
            let rest: String = words.collect::<Vec<_>>().join("");
            let value = parse_param_value(desc.string_id, &rest)?;
            ControlCommand::Set { index, value }
        }
    };
    Ok(Some(command))
}

fn print_help() {
    println!("Commands:");
    println!("  feedback <dB>     set feedback gain (-20 to 20)");
    println!("  mix <percent>     set wet/dry mix (0 to 100)");
    println!("  delay <ms>        set delay time (5 to 10000)");
    println!("  show              print current values");
    println!("  quit              stop");
}

/// Read control lines until EOF, `quit`, or the stream stops.
fn control_loop(params: &SharedParams, running: &AtomicBool) {
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        if !running.load(Ordering::SeqCst) {
            break;
        }
        let Ok(line) = line else { break };

        match parse_command(&line) {
            Ok(Some(ControlCommand::Set { index, value })) => {
                params.set_by_index(index, value);
                tracing::debug!(index, value, "control changed");
                println!("{}", describe_controls(&params.snapshot()));
            }
            Ok(Some(ControlCommand::Show)) => {
                println!("{}", describe_controls(&params.snapshot()));
            }
            Ok(Some(ControlCommand::Quit)) => {
                running.store(false, Ordering::SeqCst);
                break;
            }
            Ok(Some(ControlCommand::Help)) => print_help(),
            Ok(None) => {}
            Err(err) => println!("{err} (type 'help' for commands)"),
        }
    }
}

pub fn run(args: RealtimeArgs) -> anyhow::Result<()> {
    let (preset, controls) = args.controls.resolve()?;
    let params = Arc::new(SharedParams::new(controls));

    let mut stream = AudioStream::new(StreamConfig {
        input_device: args.input_device,
        output_device: args.output_device,
    })?;

    let sample_rate = stream.sample_rate();
    let (input_name, output_name) = stream.device_names();

    if args.controls.preset.is_some() {
        println!("Preset: {}", preset.name);
    }
    println!("Real-time delay: {}", describe_controls(&controls));
    println!("  Input:  {input_name}");
    println!("  Output: {output_name}");
    println!("  Sample rate: {sample_rate} Hz");
    println!();
    print_help();
    println!("\nPress Ctrl+C to stop...\n");

    let running = stream.running_flag();
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        println!("\nStopping...");
        r.store(false, Ordering::SeqCst);
    })?;

    // Detached: a blocked stdin read must not hold up shutdown
    let control_params = Arc::clone(&params);
    let control_running = Arc::clone(&running);
    std::thread::Builder::new()
        .name("ekko-control".into())
        .spawn(move || control_loop(&control_params, &control_running))?;

    stream.run(FeedbackDelay::new(sample_rate as f32), params)?;

    println!("Done!");
    Ok(())
}
