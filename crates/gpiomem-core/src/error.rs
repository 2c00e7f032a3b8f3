//! Error types for gpiomem-core
//!
//! This module provides a no_std compatible error type shared by the
//! configurator and the pin I/O operations.

use core::fmt;

/// Core error type - no_std compatible, Copy for efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The register block is not mapped
    NotOpen,
    /// Pin number outside the supported 2..=27 range
    InvalidPin(u8),
    /// Raw value is not a known pin mode (`u8::MAX` for unparsable text)
    InvalidMode(u8),
    /// Raw value is not a known pull-up/down code (`u32::MAX` for unparsable text)
    InvalidPull(u32),
    /// Edge bits outside [`crate::Edge::BOTH`] (`u8::MAX` for unparsable text)
    InvalidEdge(u8),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotOpen => write!(f, "GPIO register block is not mapped"),
            Self::InvalidPin(pin) => write!(
                f,
                "GPIO pin {} is not supported (valid range {}..={})",
                pin,
                crate::pin::Pin::MIN,
                crate::pin::Pin::MAX
            ),
            Self::InvalidMode(v) => write!(f, "invalid pin mode {}", v),
            Self::InvalidPull(v) => write!(f, "invalid pull-up/down code {}", v),
            Self::InvalidEdge(v) => write!(f, "invalid edge detect mode {:#x}", v),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;
