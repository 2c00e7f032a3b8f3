//! CLI argument parsing

use crate::backends;
use clap::{Parser, Subcommand, ValueEnum};
use gpiomem_core::{Edge, Level, Mode, Pull};

/// Generate dynamic help text for the backend argument
fn backend_help() -> String {
    backends::backend_help()
}

#[derive(Parser)]
#[command(name = "gpiomem")]
#[command(author, version, about = "Raspberry Pi GPIO control via /dev/gpiomem", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Backend to use, with optional parameters (e.g. gpiomem:dev=/dev/gpiomem)
    #[arg(short, long, global = true, default_value = "gpiomem", help = backend_help())]
    pub backend: String,

    #[command(subcommand)]
    pub command: Commands,
}

/// Pin direction argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Function select 000
    #[value(alias = "in")]
    Input,
    /// Function select 001
    #[value(alias = "out")]
    Output,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Mode {
        match arg {
            ModeArg::Input => Mode::Input,
            ModeArg::Output => Mode::Output,
        }
    }
}

/// Pull resistor argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PullArg {
    /// No pull resistor
    #[value(alias = "off")]
    Floating,
    /// Pull to ground
    Down,
    /// Pull to 3.3V
    Up,
}

impl From<PullArg> for Pull {
    fn from(arg: PullArg) -> Pull {
        match arg {
            PullArg::Floating => Pull::Floating,
            PullArg::Down => Pull::Down,
            PullArg::Up => Pull::Up,
        }
    }
}

/// Edge detect argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EdgeArg {
    /// No edge detection
    None,
    /// Low-to-high transitions
    Rising,
    /// High-to-low transitions
    Falling,
    /// Any transition
    Both,
}

impl From<EdgeArg> for Edge {
    fn from(arg: EdgeArg) -> Edge {
        match arg {
            EdgeArg::None => Edge::NONE,
            EdgeArg::Rising => Edge::RISING,
            EdgeArg::Falling => Edge::FALLING,
            EdgeArg::Both => Edge::BOTH,
        }
    }
}

/// Output level argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LevelArg {
    /// Drive high
    #[value(aliases = ["1", "on"])]
    High,
    /// Drive low
    #[value(aliases = ["0", "off"])]
    Low,
}

impl From<LevelArg> for Level {
    fn from(arg: LevelArg) -> Level {
        match arg {
            LevelArg::High => Level::High,
            LevelArg::Low => Level::Low,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Configure a pin's direction, pull resistor and edge detection
    Mode {
        /// BCM pin number (2-27)
        pin: u8,

        /// Pin direction
        #[arg(value_enum)]
        mode: ModeArg,

        /// Pull resistor (inputs only)
        #[arg(long, value_enum, default_value_t = PullArg::Floating)]
        pull: PullArg,

        /// Edge detection (inputs only)
        #[arg(long, value_enum, default_value_t = EdgeArg::None)]
        edge: EdgeArg,
    },

    /// Configure a pin as output and drive it
    Write {
        /// BCM pin number (2-27)
        pin: u8,

        /// Level to drive
        #[arg(value_enum)]
        level: LevelArg,
    },

    /// Read a pin's level
    Read {
        /// BCM pin number (2-27)
        pin: u8,
    },

    /// Configure a pin as input and poll its edge detector
    Watch {
        /// BCM pin number (2-27)
        pin: u8,

        /// Pull resistor
        #[arg(long, value_enum, default_value_t = PullArg::Floating)]
        pull: PullArg,

        /// Edges to report
        #[arg(long, value_enum, default_value_t = EdgeArg::Both)]
        edge: EdgeArg,

        /// Poll interval in milliseconds
        #[arg(long, default_value = "10")]
        interval_ms: u64,

        /// Stop after this many edges (default: run until interrupted)
        #[arg(long)]
        count: Option<u64>,
    },

    /// Toggle an output pin
    Blink {
        /// BCM pin number (2-27)
        pin: u8,

        /// Full on/off period in milliseconds
        #[arg(long, default_value = "500")]
        period_ms: u64,

        /// Number of on/off cycles
        #[arg(long, default_value = "10")]
        count: u64,
    },

    /// List available backends
    ListBackends,
}
