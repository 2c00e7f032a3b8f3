//! BCM283x GPIO register definitions
//!
//! Word indices into the register page exposed by `/dev/gpiomem`, taken
//! from the BCM2835 ARM Peripherals manual, section 6.1. All indices are in
//! units of 32-bit registers, not bytes.
//!
//! Only bank 0 (GPIO0-31) registers are listed since pins above 27 are not
//! supported.

use crate::pin::Pin;

/// Size of the mapped register page in bytes
pub const BLOCK_SIZE: usize = 4 * 1024;

/// Number of 32-bit registers in the mapped page
pub const REGISTER_COUNT: usize = BLOCK_SIZE / 4;

// ============================================================================
// Register indices
// ============================================================================

/// Function Select 0 (GPIO0-9); GPFSEL1..5 follow contiguously
pub const GPFSEL0: usize = 0;
/// Pin Output Set 0
pub const GPSET0: usize = 7;
/// Pin Output Clear 0
pub const GPCLR0: usize = 10;
/// Pin Level 0
pub const GPLEV0: usize = 13;
/// Pin Event Detect Status 0 (write 1 to clear)
pub const GPEDS0: usize = 16;
/// Pin Rising Edge Detect Enable 0
pub const GPREN0: usize = 19;
/// Pin Falling Edge Detect Enable 0
pub const GPFEN0: usize = 22;
/// Pull-up/down control (applies to all pins when clocked)
pub const GPPUD: usize = 37;
/// Pull-up/down Clock 0
pub const GPPUDCLK0: usize = 38;

// ============================================================================
// Field layout
// ============================================================================

/// Width of one pin's function select field
pub const FSEL_BITS: u32 = 3;
/// Mask for one function select field (before shifting)
pub const FSEL_MASK: u32 = (1 << FSEL_BITS) - 1;
/// Pins per function select register
pub const PINS_PER_FSEL: u8 = 10;

/// Register index and bit shift of a pin's function select field
#[inline]
pub const fn fsel_field(pin: Pin) -> (usize, u32) {
    let n = pin.number();
    (
        GPFSEL0 + (n / PINS_PER_FSEL) as usize,
        (n % PINS_PER_FSEL) as u32 * FSEL_BITS,
    )
}

/// Single-bit mask for a pin in the bank 0 set/clear/level/event registers
#[inline]
pub const fn pin_mask(pin: Pin) -> u32 {
    1 << (pin.number() & 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pin(n: u8) -> Pin {
        Pin::new(n).unwrap()
    }

    #[test]
    fn test_fsel_field() {
        assert_eq!(fsel_field(pin(2)), (0, 6));
        assert_eq!(fsel_field(pin(9)), (0, 27));
        assert_eq!(fsel_field(pin(10)), (1, 0));
        assert_eq!(fsel_field(pin(17)), (1, 21));
        assert_eq!(fsel_field(pin(27)), (2, 21));
    }

    #[test]
    fn test_fsel_fields_fit_in_register() {
        for p in Pin::all() {
            let (index, shift) = fsel_field(p);
            assert!(index <= 2);
            assert!(shift + FSEL_BITS <= 30);
        }
    }

    #[test]
    fn test_pin_mask() {
        assert_eq!(pin_mask(pin(2)), 0x0000_0004);
        assert_eq!(pin_mask(pin(17)), 0x0002_0000);
        assert_eq!(pin_mask(pin(27)), 0x0800_0000);
    }

    #[test]
    fn test_register_offsets() {
        // Byte offsets from the peripheral manual
        assert_eq!(GPSET0 * 4, 0x1C);
        assert_eq!(GPCLR0 * 4, 0x28);
        assert_eq!(GPLEV0 * 4, 0x34);
        assert_eq!(GPEDS0 * 4, 0x40);
        assert_eq!(GPREN0 * 4, 0x4C);
        assert_eq!(GPFEN0 * 4, 0x58);
        assert_eq!(GPPUD * 4, 0x94);
        assert_eq!(GPPUDCLK0 * 4, 0x98);
        assert!(GPPUDCLK0 < REGISTER_COUNT);
    }
}
