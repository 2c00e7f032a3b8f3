//! gpiomem-core - BCM283x GPIO register access
//!
//! This crate provides the register layout, pin types and the register
//! mapper used to drive the GPIO block of a BCM2835/6/7 SoC. It is `no_std`
//! compatible: the actual memory mapping is supplied by a backend crate
//! through the [`GpioDevice`] and [`RegisterMap`] traits.
//!
//! # Features
//!
//! - `std` - Implement `std::error::Error` for [`Error`]
//!
//! # Example
//!
//! ```ignore
//! use gpiomem_core::{Edge, Gpio, Mode, Pull};
//!
//! fn button<D: gpiomem_core::GpioDevice>(gpio: &mut Gpio<D>) -> gpiomem_core::Result<bool> {
//!     gpio.set_pin_mode(17, Mode::Input, Pull::Up, Edge::FALLING)?;
//!     gpio.get_pin_edge_detected(17)
//! }
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

#[cfg(feature = "std")]
extern crate std;

pub mod error;
pub mod gpio;
pub mod pin;
pub mod registers;
pub mod regs;

pub use error::{Error, Result};
pub use gpio::Gpio;
pub use pin::{Edge, Level, Mode, Pin, Pull};
pub use registers::{GpioDevice, RegisterMap};
