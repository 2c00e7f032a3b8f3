//! Register access traits
//!
//! A backend provides two things: a [`GpioDevice`] that knows how to
//! establish a mapping of the GPIO register page, and the [`RegisterMap`]
//! that mapping produces. Dropping the map must release everything the
//! device acquired for it.

/// A live mapping of the GPIO register page
///
/// Indices are 32-bit word offsets (see [`crate::regs`]). Implementations
/// must perform every access as a single volatile 32-bit load or store, in
/// program order.
pub trait RegisterMap {
    /// Read the register at word index `index`
    fn read(&self, index: usize) -> u32;

    /// Write `value` to the register at word index `index`
    fn write(&self, index: usize, value: u32);

    /// Block the calling thread for at least `us` microseconds
    ///
    /// Used for the set-up and hold times of the pull-up/down handshake.
    fn delay_us(&self, us: u32);
}

/// Something that can map the GPIO register page
pub trait GpioDevice {
    /// The mapping produced by [`GpioDevice::map`]
    type Map: RegisterMap;
    /// Error returned when the device cannot be opened or mapped
    type Error;

    /// Open the device and map the register page
    ///
    /// On failure nothing acquired by the attempt may remain held.
    fn map(&mut self) -> Result<Self::Map, Self::Error>;
}
