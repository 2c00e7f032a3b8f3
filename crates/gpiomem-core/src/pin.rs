//! Pin identifiers and configuration types
//!
//! Pins use BCM numbering. Only GPIO2 through GPIO27 (the user pins on the
//! 40-pin header) are supported; the compute-module-only pins live in a
//! second register bank which this crate does not touch.

use crate::error::{Error, Result};
use bitflags::bitflags;
use core::fmt;
use core::str::FromStr;

/// A validated BCM GPIO pin number in `Pin::MIN..=Pin::MAX`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pin(u8);

impl Pin {
    /// Lowest supported pin (GPIO0/1 are reserved for the HAT EEPROM)
    pub const MIN: u8 = 2;
    /// Highest pin routed to the 40-pin header
    pub const MAX: u8 = 27;

    /// Validate a raw BCM pin number
    pub const fn new(number: u8) -> Result<Self> {
        if number >= Self::MIN && number <= Self::MAX {
            Ok(Self(number))
        } else {
            Err(Error::InvalidPin(number))
        }
    }

    /// The BCM pin number
    pub const fn number(self) -> u8 {
        self.0
    }

    /// Iterate over every supported pin
    pub fn all() -> impl Iterator<Item = Pin> {
        (Self::MIN..=Self::MAX).map(Pin)
    }
}

impl TryFrom<u8> for Pin {
    type Error = Error;

    fn try_from(number: u8) -> Result<Self> {
        Self::new(number)
    }
}

impl From<Pin> for u8 {
    fn from(pin: Pin) -> u8 {
        pin.0
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GPIO{}", self.0)
    }
}

/// Pin direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Function select `000`
    #[default]
    Input,
    /// Function select `001`
    Output,
}

impl Mode {
    /// Function select field value for this mode
    pub const fn fsel_bits(self) -> u32 {
        match self {
            Self::Input => 0b000,
            Self::Output => 0b001,
        }
    }
}

impl TryFrom<u8> for Mode {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Input),
            1 => Ok(Self::Output),
            v => Err(Error::InvalidMode(v)),
        }
    }
}

/// Accepts the display name (any case), `in`/`out`, or the raw value
///
/// Unrecognized text is reported as `InvalidMode(u8::MAX)`.
impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("input") || s.eq_ignore_ascii_case("in") {
            Ok(Self::Input)
        } else if s.eq_ignore_ascii_case("output") || s.eq_ignore_ascii_case("out") {
            Ok(Self::Output)
        } else {
            s.parse::<u8>()
                .map_err(|_| Error::InvalidMode(u8::MAX))
                .and_then(Self::try_from)
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => write!(f, "INPUT"),
            Self::Output => write!(f, "OUTPUT"),
        }
    }
}

/// Pull resistor state, encoded as the GPPUD control code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum Pull {
    /// No pull resistor
    #[default]
    Floating = 0,
    /// Pull to ground
    Down = 1,
    /// Pull to 3.3V
    Up = 2,
}

impl Pull {
    /// Two-bit GPPUD control code
    pub const fn code(self) -> u32 {
        self as u32
    }
}

impl TryFrom<u32> for Pull {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            0 => Ok(Self::Floating),
            1 => Ok(Self::Down),
            2 => Ok(Self::Up),
            v => Err(Error::InvalidPull(v)),
        }
    }
}

/// Accepts the display name (any case), `off` for floating, or the raw code
///
/// Unrecognized text is reported as `InvalidPull(u32::MAX)`.
impl FromStr for Pull {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("floating") || s.eq_ignore_ascii_case("off") {
            Ok(Self::Floating)
        } else if s.eq_ignore_ascii_case("down") {
            Ok(Self::Down)
        } else if s.eq_ignore_ascii_case("up") {
            Ok(Self::Up)
        } else {
            s.parse::<u32>()
                .map_err(|_| Error::InvalidPull(u32::MAX))
                .and_then(Self::try_from)
        }
    }
}

impl fmt::Display for Pull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Floating => write!(f, "FLOATING"),
            Self::Down => write!(f, "DOWN"),
            Self::Up => write!(f, "UP"),
        }
    }
}

bitflags! {
    /// Edge detect enables for an input pin
    ///
    /// Only meaningful in [`Mode::Input`]. Both bits clear disables edge
    /// detection for the pin.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Edge: u8 {
        /// Latch low-to-high transitions (GPREN0)
        const RISING  = 1 << 0;
        /// Latch high-to-low transitions (GPFEN0)
        const FALLING = 1 << 1;

        /// Latch any transition
        const BOTH = Self::RISING.bits() | Self::FALLING.bits();
    }
}

impl Edge {
    /// Edge detection disabled
    pub const NONE: Self = Self::empty();
}

impl Default for Edge {
    fn default() -> Self {
        Edge::NONE
    }
}

impl TryFrom<u8> for Edge {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::from_bits(value).ok_or(Error::InvalidEdge(value))
    }
}

/// Accepts the display name (any case) or the raw flag bits
///
/// Unrecognized text is reported as `InvalidEdge(u8::MAX)`.
impl FromStr for Edge {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        const NAMES: [(&str, Edge); 4] = [
            ("NONE", Edge::NONE),
            ("RISING", Edge::RISING),
            ("FALLING", Edge::FALLING),
            ("BOTH", Edge::BOTH),
        ];

        if let Some((_, edge)) = NAMES.iter().find(|(name, _)| s.eq_ignore_ascii_case(name)) {
            return Ok(*edge);
        }
        s.parse::<u8>()
            .map_err(|_| Error::InvalidEdge(u8::MAX))
            .and_then(Self::try_from)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::BOTH {
            write!(f, "BOTH")
        } else if *self == Self::RISING {
            write!(f, "RISING")
        } else if *self == Self::FALLING {
            write!(f, "FALLING")
        } else {
            write!(f, "NONE")
        }
    }
}

/// Logic level of a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    /// Logic low
    Low,
    /// Logic high
    High,
}

impl From<bool> for Level {
    #[inline]
    fn from(high: bool) -> Self {
        if high {
            Self::High
        } else {
            Self::Low
        }
    }
}

impl From<Level> for bool {
    #[inline]
    fn from(level: Level) -> bool {
        level == Level::High
    }
}

impl core::ops::Not for Level {
    type Output = Level;

    fn not(self) -> Level {
        match self {
            Self::Low => Self::High,
            Self::High => Self::Low,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::High => write!(f, "high"),
        }
    }
}
