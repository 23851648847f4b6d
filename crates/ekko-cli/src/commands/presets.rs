//! Preset management commands.
//!
//! Lists factory and user presets, shows a preset's controls, and saves
//! control sets as user presets.

use crate::commands::common::describe_controls;
use clap::{Args, Subcommand};
use ekko_config::{
    Preset, ensure_user_presets_dir, factory_presets, get_factory_preset, list_user_presets,
    preset_name_from_path, resolve_preset, user_presets_dir, validate_preset,
};
use ekko_core::ControlParams;

#[derive(Args)]
pub struct PresetsArgs {
    #[command(subcommand)]
    command: PresetsCommand,
}

#[derive(Subcommand)]
enum PresetsCommand {
    /// List available presets (factory and user)
    List {
        /// Show only factory presets
        #[arg(long)]
        factory: bool,

        /// Show only user presets
        #[arg(long)]
        user: bool,
    },

    /// Show details of a preset
    Show {
        /// Preset name or path
        name: String,
    },

    /// Save a control set as a user preset
    Save {
        /// Name for the new preset
        name: String,

        /// Feedback gain in dB
        #[arg(long, allow_negative_numbers = true)]
        feedback_db: Option<f32>,

        /// Wet/dry mix in percent
        #[arg(long)]
        mix: Option<f32>,

        /// Delay time in milliseconds
        #[arg(long)]
        delay_ms: Option<f32>,

        /// Description of the preset
        #[arg(short, long)]
        description: Option<String>,

        /// Overwrite if preset already exists
        #[arg(long)]
        force: bool,
    },

    /// Show preset directories
    Paths,
}

pub fn run(args: PresetsArgs) -> anyhow::Result<()> {
    match args.command {
        PresetsCommand::List { factory, user } => list_presets(factory, user),
        PresetsCommand::Show { name } => show_preset(&name),
        PresetsCommand::Save {
            name,
            feedback_db,
            mix,
            delay_ms,
            description,
            force,
        } => {
            let defaults = ControlParams::default();
            let controls = ControlParams::new(
                feedback_db.unwrap_or(defaults.feedback_db),
                mix.unwrap_or(defaults.mix_percent),
                delay_ms.unwrap_or(defaults.delay_ms),
            );
            save_preset(&name, &controls, description, force)
        }
        PresetsCommand::Paths => show_paths(),
    }
}

fn list_presets(factory_only: bool, user_only: bool) -> anyhow::Result<()> {
    if !user_only {
        println!("Factory Presets:");
        println!("================");
        for preset in factory_presets() {
            let desc = preset.description.as_deref().unwrap_or("");
            println!("  {:20} - {}", preset.name, desc);
        }
        println!();
    }

    if !factory_only {
        println!("User Presets:");
        println!("=============");
        let user_presets = list_user_presets();
        if user_presets.is_empty() {
            println!("  (none)");
            println!();
            println!("  Create a preset with: ekko presets save <name> --delay-ms 250\n");
        } else {
            for path in user_presets {
                let name = preset_name_from_path(&path).unwrap_or_else(|| "unknown".into());
                match Preset::load(&path) {
                    Ok(preset) => {
                        let desc = preset.description.as_deref().unwrap_or("");
                        println!("  {name:20} - {desc}");
                    }
                    Err(_) => println!("  {name:20} - (error loading)"),
                }
            }
        }
        println!();
    }

    Ok(())
}

fn show_preset(name: &str) -> anyhow::Result<()> {
    let preset = resolve_preset(name)?;

    println!("Preset: {}", preset.name);
    println!("{}", "=".repeat(8 + preset.name.len()));
    println!();

    if let Some(desc) = &preset.description {
        println!("Description: {desc}");
        println!();
    }

    println!("  feedback_db = {}", preset.feedback_db);
    println!("  mix_percent = {}", preset.mix_percent);
    println!("  delay_ms    = {}", preset.delay_ms);

    if let Err(err) = validate_preset(&preset) {
        println!();
        println!("Warning: {err}");
        println!("Effective: {}", describe_controls(&preset.controls()));
    }

    if get_factory_preset(name).is_some() {
        println!();
        println!("(factory preset)");
    }

    Ok(())
}

fn save_preset(
    name: &str,
    controls: &ControlParams,
    description: Option<String>,
    force: bool,
) -> anyhow::Result<()> {
    if get_factory_preset(name).is_some() {
        anyhow::bail!("'{name}' is a factory preset name. Choose a different name.");
    }

    ensure_user_presets_dir()?;
    let preset_path = user_presets_dir().join(format!("{name}.toml"));

    if preset_path.exists() && !force {
        anyhow::bail!("Preset '{name}' already exists. Use --force to overwrite.");
    }

    let mut preset = Preset::from_controls(name, &controls.clamped());
    if let Some(desc) = description {
        preset = preset.with_description(desc);
    }
    preset.save(&preset_path)?;

    println!("Saved preset '{}' to {}", name, preset_path.display());
    Ok(())
}

fn show_paths() -> anyhow::Result<()> {
    println!("User presets: {}", user_presets_dir().display());
    Ok(())
}
