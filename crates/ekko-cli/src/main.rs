//! ekko CLI - Command-line host for the ekko stereo feedback delay.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ekko")]
#[command(author, version, about = "ekko stereo feedback delay", long_about = None)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a WAV file through the delay
    Process(commands::process::ProcessArgs),

    /// Run the delay on live audio input
    Realtime(commands::realtime::RealtimeArgs),

    /// List the delay's parameters
    Params(commands::params::ParamsArgs),

    /// List and inspect presets
    Presets(commands::presets::PresetsArgs),

    /// Show WAV file metadata
    Info(commands::info::InfoArgs),

    /// List audio devices
    Devices(commands::devices::DevicesArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Process(args) => commands::process::run(args),
        Commands::Realtime(args) => commands::realtime::run(args),
        Commands::Params(args) => commands::params::run(args),
        Commands::Presets(args) => commands::presets::run(args),
        Commands::Info(args) => commands::info::run(args),
        Commands::Devices(args) => commands::devices::run(args),
    }
}
