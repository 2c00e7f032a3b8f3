//! Error types for the /dev/gpiomem backend

use thiserror::Error;

/// /dev/gpiomem specific errors
#[derive(Debug, Error)]
pub enum GpioMemError {
    /// Failed to open the device file
    #[error("Failed to open {path}: {source}")]
    OpenFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The device opened but the register page could not be mapped
    #[error("Failed to map {size} bytes of {path} at offset {offset:#x}: {source}")]
    MapFailed {
        path: String,
        offset: u64,
        size: usize,
        #[source]
        source: std::io::Error,
    },

    /// Memory mapping is not available on this platform
    #[error("/dev/gpiomem mapping is only supported on Linux")]
    NotSupported,

    /// Device not specified
    #[error("No device specified. Use dev=/dev/gpiomem")]
    NoDevice,
}

/// Result type for /dev/gpiomem operations
pub type Result<T> = std::result::Result<T, GpioMemError>;
