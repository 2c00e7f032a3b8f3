//! Register mapper
//!
//! [`Gpio`] owns the mapping of the GPIO register page and implements pin
//! configuration and pin I/O on top of it. Every operation checks that the
//! mapping is open and that the pin is in range before touching a register,
//! so misuse is reported as an [`Error`] rather than scribbling on the
//! register page.
//!
//! The mapper is not internally synchronized. Several pins share each
//! function select and edge enable register, so two threads configuring
//! different pins at once can lose each other's updates.

use crate::error::{Error, Result};
use crate::pin::{Edge, Mode, Pin, Pull};
use crate::registers::{GpioDevice, RegisterMap};
use crate::regs::{self, FSEL_MASK};

/// Set-up and hold time used for each step of the pull-up/down handshake
///
/// The peripheral manual asks for 150 core clock cycles. A millisecond is
/// far longer than that on any BCM283x clock configuration.
pub const PULL_SETTLE_US: u32 = 1000;

/// Owner of a GPIO register page mapping
///
/// Lifecycle is Closed -> Open -> Closed. Dropping the mapper closes it.
pub struct Gpio<D: GpioDevice> {
    device: D,
    map: Option<D::Map>,
}

impl<D: GpioDevice> Gpio<D> {
    /// Create a closed mapper for `device`
    pub fn new(device: D) -> Self {
        Self { device, map: None }
    }

    /// Get a reference to the underlying device
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Map the register page
    ///
    /// An existing mapping is released first. On failure the mapper is left
    /// closed; there is no retry.
    pub fn open(&mut self) -> core::result::Result<(), D::Error> {
        self.close();
        let map = self.device.map()?;
        self.map = Some(map);
        log::debug!("GPIO register page mapped");
        Ok(())
    }

    /// Unmap the register page. Does nothing if not open.
    pub fn close(&mut self) {
        if let Some(map) = self.map.take() {
            log::debug!("Unmapping GPIO register page");
            drop(map);
        }
    }

    /// Returns true if the register page is mapped
    pub fn is_open(&self) -> bool {
        self.map.is_some()
    }

    fn regs(&self) -> Result<&D::Map> {
        self.map.as_ref().ok_or(Error::NotOpen)
    }

    /// Configure a pin's direction, pull resistor and edge detection
    ///
    /// `pull` and `edge` only apply to [`Mode::Input`] and are ignored for
    /// outputs. Changing the pull state takes about 2 ms because of the
    /// hardware handshake.
    ///
    /// Nothing is written if the mapper is closed, the pin is invalid or
    /// `edge` carries bits outside [`Edge::BOTH`].
    pub fn set_pin_mode(&mut self, pin: u8, mode: Mode, pull: Pull, edge: Edge) -> Result<()> {
        let regs = self.regs()?;
        let pin = Pin::new(pin)?;
        if !Edge::all().contains(edge) {
            return Err(Error::InvalidEdge(edge.bits()));
        }

        let (offset, shift) = regs::fsel_field(pin);
        let fsel = regs.read(offset) & !(FSEL_MASK << shift);

        match mode {
            Mode::Output => {
                regs.write(offset, fsel | (mode.fsel_bits() << shift));
                log::debug!(
                    "pin: {} Offset: {} Shift: {} Mode: {} Pull: IGNORED Edge: IGNORED",
                    pin.number(),
                    offset,
                    shift,
                    mode
                );
            }
            Mode::Input => {
                regs.write(offset, fsel | (mode.fsel_bits() << shift));
                pull_handshake(regs, pin, pull);

                let mask = regs::pin_mask(pin);
                write_bit(regs, regs::GPREN0, mask, edge.contains(Edge::RISING));
                write_bit(regs, regs::GPFEN0, mask, edge.contains(Edge::FALLING));

                log::debug!(
                    "pin: {} Offset: {} Shift: {} Mode: {} Pull: {} Edge: {}",
                    pin.number(),
                    offset,
                    shift,
                    mode,
                    pull,
                    edge
                );
            }
        }

        Ok(())
    }

    /// Configure a pin as an output
    pub fn set_output(&mut self, pin: u8) -> Result<()> {
        self.set_pin_mode(pin, Mode::Output, Pull::Floating, Edge::NONE)
    }

    /// Drive an output pin high or low
    ///
    /// The pin should have been configured with [`Mode::Output`]; the
    /// hardware ignores set/clear writes to input pins.
    #[inline]
    pub fn set_pin(&self, pin: u8, high: bool) -> Result<()> {
        let regs = self.regs()?;
        let mask = regs::pin_mask(Pin::new(pin)?);
        if high {
            regs.write(regs::GPSET0, mask);
        } else {
            regs.write(regs::GPCLR0, mask);
        }
        Ok(())
    }

    /// Read a pin's logic level. `true` means high.
    #[inline]
    pub fn get_pin(&self, pin: u8) -> Result<bool> {
        let regs = self.regs()?;
        let mask = regs::pin_mask(Pin::new(pin)?);
        Ok(regs.read(regs::GPLEV0) & mask != 0)
    }

    /// Check and consume the latched edge event for a pin
    ///
    /// Returns true if the edge detector has fired since the last call, and
    /// clears the latch so the next call only reports new edges. Which edges
    /// are latched depends on the [`Edge`] passed to [`Gpio::set_pin_mode`].
    pub fn get_pin_edge_detected(&self, pin: u8) -> Result<bool> {
        let regs = self.regs()?;
        let mask = regs::pin_mask(Pin::new(pin)?);
        if regs.read(regs::GPEDS0) & mask != 0 {
            // Write-one-to-clear; other pins' latched events are left alone
            regs.write(regs::GPEDS0, mask);
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

impl<D: GpioDevice> Drop for Gpio<D> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Latch `pull` into a single pin
///
/// Sequence from the peripheral manual (GPPUDCLKn description):
/// 1. Write the control signal to GPPUD
/// 2. Wait for the set-up time
/// 3. Clock the control signal into the pin via GPPUDCLK0
/// 4. Wait for the hold time
/// 5. Remove the control signal
/// 6. Remove the clock
///
/// Pins that do not receive a clock keep their previous state, so the clock
/// mask must contain this pin's bit only.
fn pull_handshake<M: RegisterMap>(regs: &M, pin: Pin, pull: Pull) {
    regs.write(regs::GPPUD, pull.code() & 0b11);
    regs.delay_us(PULL_SETTLE_US);
    regs.write(regs::GPPUDCLK0, regs::pin_mask(pin));
    regs.delay_us(PULL_SETTLE_US);
    regs.write(regs::GPPUD, 0);
    regs.write(regs::GPPUDCLK0, 0);
}

/// Set or clear one pin's bit in a shared enable register
fn write_bit<M: RegisterMap>(regs: &M, index: usize, mask: u32, set: bool) {
    let value = regs.read(index);
    if set {
        regs.write(index, value | mask);
    } else {
        regs.write(index, value & !mask);
    }
}
