use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "asus-fan")]
#[command(about = "Manual and automatic fan control for ASUS laptops via ACPI")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// JSON config file (default: /etc/asus-fan/config.json if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the detected platform profile without touching the fans
    Identify,

    /// Reset the fans, print their state, and hand them back to firmware
    Status {
        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Force every fan back to automatic mode with the factory ceiling
    Auto,

    /// Pin fans and/or set the ceiling, then monitor until Ctrl+C
    Run {
        /// CPU fan speed (0–255, or 256 for automatic)
        #[arg(long)]
        cpu: Option<u32>,

        /// GFX fan speed (0–255, or 256 for automatic)
        #[arg(long)]
        gfx: Option<u32>,

        /// Maximum fan speed ceiling (0–255)
        #[arg(long, conflicts_with = "reset_max")]
        max: Option<u32>,

        /// Restore the factory ceiling
        #[arg(long)]
        reset_max: bool,

        /// Refresh interval in seconds
        #[arg(short, long, default_value = "2")]
        interval: u64,
    },
}
