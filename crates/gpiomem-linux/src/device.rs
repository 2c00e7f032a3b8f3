//! /dev/gpiomem device binding
//!
//! This module provides `GpioMemDevice`, the [`GpioDevice`] implementation
//! that maps the register page from the kernel's restricted GPIO device.

use crate::error::{GpioMemError, Result};
use crate::map::GpioMemMap;

use gpiomem_core::GpioDevice;

/// Default device path
pub const DEFAULT_DEVICE: &str = "/dev/gpiomem";

/// Offset of the GPIO controller within the device
///
/// The device's addressable region starts at the GPIO block, so the
/// controller sits at offset 0 rather than at its 0x200000 offset from the
/// peripheral base. The `bcm2835-gpiomem` driver ignores the page offset and
/// always maps the GPIO block, so 0x200000 happens to work too, but 0 is the
/// offset that describes the device.
pub const GPIO_OFFSET: u64 = 0;

/// Configuration for opening /dev/gpiomem
#[derive(Debug, Clone)]
pub struct GpioMemConfig {
    /// Device path (e.g., "/dev/gpiomem")
    pub device: String,
    /// Byte offset of the register page within the device
    pub offset: u64,
}

impl Default for GpioMemConfig {
    fn default() -> Self {
        Self {
            device: DEFAULT_DEVICE.to_string(),
            offset: GPIO_OFFSET,
        }
    }
}

impl GpioMemConfig {
    /// Create a new configuration for the given device path
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            ..Default::default()
        }
    }

    /// Set the mapping offset
    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }
}

/// The /dev/gpiomem device
///
/// Each call to [`GpioDevice::map`] opens the device file afresh and maps
/// one page.
#[derive(Debug, Clone, Default)]
pub struct GpioMemDevice {
    config: GpioMemConfig,
}

impl GpioMemDevice {
    /// Create a device from a configuration
    pub fn new(config: GpioMemConfig) -> Result<Self> {
        if config.device.is_empty() {
            return Err(GpioMemError::NoDevice);
        }
        Ok(Self { config })
    }

    /// Get the configuration
    pub fn config(&self) -> &GpioMemConfig {
        &self.config
    }
}

impl GpioDevice for GpioMemDevice {
    type Map = GpioMemMap;
    type Error = GpioMemError;

    fn map(&mut self) -> Result<GpioMemMap> {
        log::debug!(
            "gpiomem: Opening {} at offset {:#x}",
            self.config.device,
            self.config.offset
        );
        GpioMemMap::new(&self.config.device, self.config.offset)
    }
}

/// Parse backend options into a GpioMemConfig
///
/// # Options
///
/// - `dev=/dev/gpiomem` - Device path (optional, default /dev/gpiomem)
/// - `offset=N` - Mapping offset in bytes, decimal or 0x-prefixed hex
///   (optional, default 0)
pub fn parse_options(options: &[(&str, &str)]) -> std::result::Result<GpioMemConfig, String> {
    let mut config = GpioMemConfig::default();

    for (key, value) in options {
        match *key {
            "dev" => {
                if value.is_empty() {
                    return Err("dev must not be empty".to_string());
                }
                config.device = value.to_string();
            }
            "offset" => {
                let parsed = if let Some(hex) =
                    value.strip_prefix("0x").or_else(|| value.strip_prefix("0X"))
                {
                    u64::from_str_radix(hex, 16)
                } else {
                    value.parse()
                };
                config.offset = parsed.map_err(|_| format!("Invalid offset value: {}", value))?;
                if config.offset % gpiomem_core::regs::BLOCK_SIZE as u64 != 0 {
                    return Err(format!("offset {} is not page aligned", value));
                }
            }
            _ => {
                log::warn!("gpiomem: Unknown option: {}={}", key, value);
            }
        }
    }

    Ok(config)
}
