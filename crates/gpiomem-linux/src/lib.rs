//! gpiomem-linux - /dev/gpiomem register mapping
//!
//! This crate maps the BCM283x GPIO register page through the Linux
//! `/dev/gpiomem` device and plugs it into the register mapper from
//! `gpiomem-core`.
//!
//! # Overview
//!
//! `/dev/gpiomem` is provided by the `bcm2835-gpiomem` driver on Raspberry Pi
//! kernels. It exposes a single 4 KiB page containing the GPIO registers and
//! nothing else, so access can be granted through group permissions instead
//! of requiring root as `/dev/mem` does.
//!
//! # Example
//!
//! ```no_run
//! use gpiomem_core::{Edge, Mode, Pull};
//!
//! let mut gpio = gpiomem_linux::new_default();
//! gpio.open()?;
//!
//! gpio.set_pin_mode(18, Mode::Output, Pull::Floating, Edge::NONE)?;
//! gpio.set_pin(18, true)?;
//!
//! gpio.set_pin_mode(17, Mode::Input, Pull::Up, Edge::FALLING)?;
//! if gpio.get_pin_edge_detected(17)? {
//!     println!("button pressed");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # System Requirements
//!
//! - Raspberry Pi kernel with the `bcm2835-gpiomem` driver (BCM2835/6/7)
//! - Read/write access to `/dev/gpiomem` (usually via the `gpio` group)

pub mod device;
pub mod error;
pub mod map;

// Re-exports
pub use device::{parse_options, GpioMemConfig, GpioMemDevice, DEFAULT_DEVICE, GPIO_OFFSET};
pub use error::{GpioMemError, Result};
pub use map::GpioMemMap;

/// Register mapper bound to /dev/gpiomem
pub type GpioMem = gpiomem_core::Gpio<GpioMemDevice>;

/// A closed mapper for the default device
pub fn new_default() -> GpioMem {
    gpiomem_core::Gpio::new(GpioMemDevice::default())
}

/// Open /dev/gpiomem from backend options and return a mapped GpioMem
///
/// This is a convenience function for use in the CLI backend dispatch.
///
/// # Example Options
///
/// - `dev=/dev/gpiomem` - Optional: device path
/// - `offset=0` - Optional: mapping offset
pub fn open_gpiomem(
    options: &[(&str, &str)],
) -> std::result::Result<GpioMem, Box<dyn std::error::Error>> {
    let config = parse_options(options)?;
    let mut gpio = gpiomem_core::Gpio::new(GpioMemDevice::new(config)?);
    gpio.open()?;
    Ok(gpio)
}
