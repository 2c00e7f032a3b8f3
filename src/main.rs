//! gpiomem - Raspberry Pi GPIO control without root
//!
//! Drives the BCM283x GPIO block through the `/dev/gpiomem` register page.
//!
//! # Architecture
//!
//! The register mapper (`gpiomem_core::Gpio`) is generic over the device
//! that provides the register page:
//! - **gpiomem** - the real page, mapped from `/dev/gpiomem`
//! - **dummy** - an in-memory page for trying commands without hardware
//!
//! Commands see either one through the `PinControl` trait, so they behave
//! the same regardless of backend.

mod backends;
mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

/// Default env_logger filter for a `-v` count
fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logger; RUST_LOG still takes precedence
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(log_filter(cli.verbose)),
    )
    .init();

    if let Commands::ListBackends = cli.command {
        commands::list_backends();
        return Ok(());
    }

    let mut gpio = backends::open_backend(&cli.backend)?;

    match cli.command {
        Commands::Mode {
            pin,
            mode,
            pull,
            edge,
        } => commands::pin::cmd_mode(gpio.as_mut(), pin, mode.into(), pull.into(), edge.into()),
        Commands::Write { pin, level } => {
            commands::pin::cmd_write(gpio.as_mut(), pin, level.into())
        }
        Commands::Read { pin } => commands::pin::cmd_read(gpio.as_ref(), pin),
        Commands::Watch {
            pin,
            pull,
            edge,
            interval_ms,
            count,
        } => commands::watch::cmd_watch(
            gpio.as_mut(),
            pin,
            pull.into(),
            edge.into(),
            interval_ms,
            count,
        ),
        Commands::Blink {
            pin,
            period_ms,
            count,
        } => commands::pin::cmd_blink(gpio.as_mut(), pin, period_ms, count),
        Commands::ListBackends => Ok(()),
    }
}
