mod cli;
mod config;

use std::fs::File;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode, WriteLogger};

use asus_fan::firmware::AcpiCallTransport;
use asus_fan::platform::{identify, read_identity};
use asus_fan::{AsusFanDriver, Fan, FanController, FanIndex, FanMode, PlatformProfile};
use cli::{Cli, Commands};
use config::Config;

fn level_from_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn init_logging(config: &Config, verbosity: u8) {
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let log_level = level_from_verbosity(verbosity);
    match &config.log_file {
        Some(path) => {
            if let Ok(file) = File::create(path) {
                let _ = WriteLogger::init(log_level, log_config, file);
            }
        }
        None => {
            let _ = TermLogger::init(log_level, log_config, TerminalMode::Stderr, ColorChoice::Auto);
        }
    }
    info!("asus-fan started (log level: {})", log_level);
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    init_logging(&config, cli.verbose);

    match cli.command {
        Commands::Identify => cmd_identify(&config),
        Commands::Status { json } => {
            let mut driver = open_driver(&config)?;
            cmd_status(&driver, json)?;
            driver.shutdown().context("failed to hand fans back to firmware")
        }
        Commands::Auto => {
            let mut driver = open_driver(&config)?;
            driver.shutdown().context("failed to hand fans back to firmware")?;
            println!("All fans returned to automatic mode, ceiling 255.");
            Ok(())
        }
        Commands::Run {
            cpu,
            gfx,
            max,
            reset_max,
            interval,
        } => {
            // Installed before any fan is touched so an early Ctrl+C still
            // reaches the hand-back below.
            let running = Arc::new(AtomicBool::new(true));
            let handler_flag = Arc::clone(&running);
            ctrlc::set_handler(move || handler_flag.store(false, Ordering::SeqCst))
                .context("failed to install Ctrl+C handler")?;

            let mut driver = open_driver(&config)?;
            let result = cmd_run(&driver, &running, cpu, gfx, max, reset_max, interval);
            driver.shutdown().context("failed to hand fans back to firmware")?;
            result
        }
    }
}

fn resolve_profile(config: &Config) -> Result<PlatformProfile> {
    let (vendor, product) = read_identity(&config.dmi_path)
        .with_context(|| format!("cannot read DMI identity from {}", config.dmi_path.display()))?;
    identify(&vendor, &product).context("refusing to control fans on this machine")
}

fn open_driver(config: &Config) -> Result<AsusFanDriver> {
    let profile = resolve_profile(config)?;
    let transport = AcpiCallTransport::with_path(config.acpi_call_path.clone());
    AsusFanDriver::activate(profile, Box::new(transport), config.fan_minimum)
        .context("failed to activate fan control")
}

fn cmd_identify(config: &Config) -> Result<()> {
    let profile = resolve_profile(config)?;
    println!("Model:      {}", profile.model);
    println!(
        "Fans:       {}",
        if profile.has_secondary_fan { "CPU + GFX" } else { "CPU" }
    );
    println!("Read quirk: {:?}", profile.quirk);
    Ok(())
}

fn cmd_status(controller: &dyn FanController, json: bool) -> Result<()> {
    let fans = controller.discover()?;

    if json {
        let status = serde_json::json!({
            "max_speed": controller.get_max_speed(),
            "fans": fans,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    print_table(&fans, controller.get_max_speed());
    Ok(())
}

fn print_table(fans: &[Fan], max_speed: u32) {
    println!(
        "{:<10} {:>6} {:>8} {:>4} MODE",
        "FAN", "SPEED", "RPM", "MIN"
    );
    println!("{}", "-".repeat(40));
    for fan in fans {
        let mode = match fan.mode {
            FanMode::Automatic => "auto".to_string(),
            FanMode::Manual(speed) => format!("manual ({})", speed),
        };
        println!(
            "{:<10} {:>6} {:>8} {:>4} {}",
            fan.label, fan.speed, fan.speed_rpm, fan.minimum, mode
        );
    }
    println!("\nSpeed ceiling: {}", max_speed);
}

fn cmd_run(
    controller: &dyn FanController,
    running: &AtomicBool,
    cpu: Option<u32>,
    gfx: Option<u32>,
    max: Option<u32>,
    reset_max: bool,
    interval_secs: u64,
) -> Result<()> {
    if reset_max {
        controller.set_max_speed(0, true)?;
    } else if let Some(value) = max {
        controller.set_max_speed(value, false)?;
    }
    for (fan, value) in [(FanIndex::Primary, cpu), (FanIndex::Secondary, gfx)] {
        if !running.load(Ordering::SeqCst) {
            break;
        }
        if let Some(value) = value {
            controller
                .set_speed(fan, value)
                .with_context(|| format!("failed to set {} to {}", fan, value))?;
        }
    }

    let interval = Duration::from_secs(interval_secs.max(1));
    while running.load(Ordering::SeqCst) {
        // Clear screen with ANSI escape
        print!("\x1B[2J\x1B[H");
        println!("Fan Monitor (every {}s) - Ctrl+C to stop and restore auto mode\n", interval.as_secs());
        match controller.discover() {
            Ok(fans) => print_table(&fans, controller.get_max_speed()),
            Err(error) => {
                warn!("monitor refresh failed: {}", error);
                println!("refresh failed: {}", error);
            }
        }

        let started = Instant::now();
        while running.load(Ordering::SeqCst) && started.elapsed() < interval {
            thread::sleep(Duration::from_millis(100));
        }
    }

    info!("interrupted, restoring automatic fan control");
    Ok(())
}
