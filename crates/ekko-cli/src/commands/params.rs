//! Parameter listing command.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use clap::Args;
use ekko_core::{CONTROL_DESCRIPTORS, ParamDescriptor};

#[derive(Args)]
pub struct ParamsArgs {
    /// Emit machine-readable JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn to_json(index: usize, desc: &ParamDescriptor) -> serde_json::Value {
    serde_json::json!({
        "index": index,
        "id": desc.id.0,
        "string_id": desc.string_id,
        "name": desc.name,
        "short_name": desc.short_name,
        "unit": desc.unit.suffix().trim(),
        "min": desc.min,
        "max": desc.max,
        "default": desc.default,
        "step": desc.step,
    })
}

pub fn run(args: ParamsArgs) -> anyhow::Result<()> {
    if args.json {
        let params: Vec<_> = CONTROL_DESCRIPTORS
            .iter()
            .enumerate()
            .map(|(i, d)| to_json(i, d))
            .collect();
        println!("{}", serde_json::to_string_pretty(&params)?);
        return Ok(());
    }

    println!("Parameters");
    println!("==========");
    println!();
    println!(
        "  {:3}  {:4}  {:12}  {:14}  {:20}  {}",
        "#", "ID", "Key", "Name", "Range", "Default"
    );
    println!(
        "  {:3}  {:4}  {:12}  {:14}  {:20}  {}",
        "-", "--", "---", "----", "-----", "-------"
    );

    for (i, desc) in CONTROL_DESCRIPTORS.iter().enumerate() {
        let unit = desc.unit.suffix();
        let range = format!("{}{unit} .. {}{unit}", desc.min, desc.max);
        println!(
            "  {:3}  {:4}  {:12}  {:14}  {:20}  {}{unit}",
            i, desc.id.0, desc.string_id, desc.name, range, desc.default
        );
    }

    println!();
    println!("Set values with e.g.: ekko process in.wav out.wav --feedback-db -6 --mix 40 --delay-ms 250");

    Ok(())
}
