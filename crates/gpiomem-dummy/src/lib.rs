//! gpiomem-dummy - In-memory GPIO register block for testing
//!
//! This crate provides a dummy GPIO device that emulates the BCM283x
//! register page in memory. It's useful for testing and development without
//! real hardware.
//!
//! Besides storing register values, the emulation models the parts of the
//! register page that are not plain memory:
//!
//! - GPSET0/GPCLR0 drive the level register and read back as zero
//! - GPLEV0 ignores writes
//! - GPEDS0 is write-one-to-clear and latches edges enabled in GPREN0/GPFEN0
//!
//! Every register read, write and delay is recorded so tests can check the
//! exact access sequence of an operation.

use std::cell::RefCell;
use std::rc::Rc;

use gpiomem_core::regs::{self, REGISTER_COUNT};
use gpiomem_core::{GpioDevice, Pin, RegisterMap};
use thiserror::Error;

/// A single recorded register access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Register read and the value returned
    Read {
        /// Word index
        index: usize,
        /// Value returned
        value: u32,
    },
    /// Register write
    Write {
        /// Word index
        index: usize,
        /// Value written
        value: u32,
    },
    /// Delay requested by the driver
    Delay {
        /// Microseconds
        us: u32,
    },
}

/// Errors from the dummy device
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DummyError {
    /// Opening was refused via [`DummyDevice::set_refuse_open`]
    #[error("dummy GPIO device refused to open")]
    OpenRefused,
}

#[derive(Debug)]
struct State {
    regs: Vec<u32>,
    accesses: Vec<Access>,
    refuse_open: bool,
    live_maps: usize,
}

impl State {
    /// Apply a new level word, latching enabled edges
    fn update_levels(&mut self, new: u32) {
        let old = self.regs[regs::GPLEV0];
        let rising = !old & new & self.regs[regs::GPREN0];
        let falling = old & !new & self.regs[regs::GPFEN0];
        self.regs[regs::GPLEV0] = new;
        self.regs[regs::GPEDS0] |= rising | falling;
    }
}

/// Dummy GPIO device
///
/// Clones share the same register page, so a test can keep a handle to
/// inspect registers while a [`gpiomem_core::Gpio`] owns another. Register
/// contents survive close and reopen, like the real hardware.
#[derive(Debug, Clone)]
pub struct DummyDevice {
    state: Rc<RefCell<State>>,
}

impl Default for DummyDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl DummyDevice {
    /// Create a device with every register zeroed
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(State {
                regs: vec![0; REGISTER_COUNT],
                accesses: Vec::new(),
                refuse_open: false,
                live_maps: 0,
            })),
        }
    }

    /// Make subsequent opens fail (or succeed again)
    pub fn set_refuse_open(&self, refuse: bool) {
        self.state.borrow_mut().refuse_open = refuse;
    }

    /// Returns true while a map handed out by this device is alive
    pub fn is_mapped(&self) -> bool {
        self.state.borrow().live_maps > 0
    }

    /// Current value of a register, without recording an access
    pub fn register(&self, index: usize) -> u32 {
        self.state.borrow().regs[index]
    }

    /// Copy of the whole register page
    pub fn registers(&self) -> Vec<u32> {
        self.state.borrow().regs.clone()
    }

    /// Set a register directly, without recording an access
    pub fn poke(&self, index: usize, value: u32) {
        self.state.borrow_mut().regs[index] = value;
    }

    /// Drive an external level onto a pin, latching an edge if enabled
    pub fn set_level(&self, pin: Pin, high: bool) {
        let mut state = self.state.borrow_mut();
        let mask = regs::pin_mask(pin);
        let old = state.regs[regs::GPLEV0];
        let new = if high { old | mask } else { old & !mask };
        state.update_levels(new);
    }

    /// Latch an edge event for a pin regardless of the enable registers
    pub fn trigger_edge(&self, pin: Pin) {
        self.state.borrow_mut().regs[regs::GPEDS0] |= regs::pin_mask(pin);
    }

    /// Accesses recorded since creation or the last [`clear_accesses`](Self::clear_accesses)
    pub fn accesses(&self) -> Vec<Access> {
        self.state.borrow().accesses.clone()
    }

    /// Forget recorded accesses
    pub fn clear_accesses(&self) {
        self.state.borrow_mut().accesses.clear();
    }
}

/// A live "mapping" of the dummy register page
pub struct DummyMap {
    state: Rc<RefCell<State>>,
}

impl RegisterMap for DummyMap {
    fn read(&self, index: usize) -> u32 {
        assert!(index < REGISTER_COUNT, "register index {} out of range", index);
        let mut state = self.state.borrow_mut();
        let value = state.regs[index];
        state.accesses.push(Access::Read { index, value });
        value
    }

    fn write(&self, index: usize, value: u32) {
        assert!(index < REGISTER_COUNT, "register index {} out of range", index);
        let mut state = self.state.borrow_mut();
        state.accesses.push(Access::Write { index, value });
        match index {
            regs::GPSET0 => {
                let new = state.regs[regs::GPLEV0] | value;
                state.update_levels(new);
            }
            regs::GPCLR0 => {
                let new = state.regs[regs::GPLEV0] & !value;
                state.update_levels(new);
            }
            regs::GPLEV0 => {
                log::trace!("dummy: ignoring write to read-only GPLEV0");
            }
            regs::GPEDS0 => state.regs[regs::GPEDS0] &= !value,
            _ => state.regs[index] = value,
        }
    }

    fn delay_us(&self, us: u32) {
        self.state.borrow_mut().accesses.push(Access::Delay { us });
    }
}

impl Drop for DummyMap {
    fn drop(&mut self) {
        self.state.borrow_mut().live_maps -= 1;
    }
}

impl GpioDevice for DummyDevice {
    type Map = DummyMap;
    type Error = DummyError;

    fn map(&mut self) -> Result<DummyMap, DummyError> {
        let mut state = self.state.borrow_mut();
        if state.refuse_open {
            return Err(DummyError::OpenRefused);
        }
        state.live_maps += 1;
        log::debug!("dummy: register page mapped");
        Ok(DummyMap {
            state: Rc::clone(&self.state),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpiomem_core::gpio::PULL_SETTLE_US;
    use gpiomem_core::regs::{fsel_field, pin_mask};
    use gpiomem_core::{Edge, Error, Gpio, Mode, Pull};

    const PULLS: [Pull; 3] = [Pull::Floating, Pull::Down, Pull::Up];
    const EDGES: [Edge; 4] = [Edge::NONE, Edge::RISING, Edge::FALLING, Edge::BOTH];

    fn open_gpio() -> (Gpio<DummyDevice>, DummyDevice) {
        let device = DummyDevice::new();
        let mut gpio = Gpio::new(device.clone());
        gpio.open().unwrap();
        (gpio, device)
    }

    fn pin(n: u8) -> Pin {
        Pin::new(n).unwrap()
    }

    #[test]
    fn test_invalid_pins_touch_nothing() {
        let (mut gpio, device) = open_gpio();
        for index in 0..REGISTER_COUNT {
            device.poke(index, 0xA5A5_0000 | index as u32);
        }
        let before = device.registers();

        for n in (0..Pin::MIN).chain(Pin::MAX + 1..=u8::MAX) {
            for mode in [Mode::Input, Mode::Output] {
                assert_eq!(
                    gpio.set_pin_mode(n, mode, Pull::Up, Edge::BOTH),
                    Err(Error::InvalidPin(n))
                );
            }
            assert_eq!(gpio.set_pin(n, true), Err(Error::InvalidPin(n)));
            assert_eq!(gpio.get_pin(n), Err(Error::InvalidPin(n)));
            assert_eq!(gpio.get_pin_edge_detected(n), Err(Error::InvalidPin(n)));
        }

        assert!(device.accesses().is_empty());
        assert_eq!(device.registers(), before);
    }

    #[test]
    fn test_unknown_edge_bits_touch_nothing() {
        let (mut gpio, device) = open_gpio();
        let edge = Edge::from_bits_retain(0x84);

        for mode in [Mode::Input, Mode::Output] {
            assert_eq!(
                gpio.set_pin_mode(17, mode, Pull::Up, edge),
                Err(Error::InvalidEdge(0x84))
            );
        }
        let edge = Edge::RISING | Edge::from_bits_retain(0x40);
        assert_eq!(
            gpio.set_pin_mode(17, Mode::Input, Pull::Up, edge),
            Err(Error::InvalidEdge(0x41))
        );

        assert!(device.accesses().is_empty());
        assert_eq!(device.registers(), vec![0; REGISTER_COUNT]);
    }

    #[test]
    fn test_every_pin_and_configuration() {
        let (mut gpio, device) = open_gpio();

        for p in Pin::all() {
            let n = p.number();
            let (offset, shift) = fsel_field(p);
            assert_eq!(offset, (n / 10) as usize);
            assert_eq!(shift, (n % 10) as u32 * 3);
            let mask = 1u32 << (n & 31);

            for pull in PULLS {
                for edge in EDGES {
                    // Other pins' fields and bits must survive
                    device.poke(offset, 0x3FFF_FFFF);
                    device.poke(regs::GPREN0, 0x5555_5555);
                    device.poke(regs::GPFEN0, 0xAAAA_AAAA);

                    gpio.set_pin_mode(n, Mode::Input, pull, edge).unwrap();
                    assert_eq!(device.register(offset), 0x3FFF_FFFF & !(7 << shift));
                    let ren = device.register(regs::GPREN0);
                    let fen = device.register(regs::GPFEN0);
                    assert_eq!(ren & mask != 0, edge.contains(Edge::RISING));
                    assert_eq!(fen & mask != 0, edge.contains(Edge::FALLING));
                    assert_eq!(ren & !mask, 0x5555_5555 & !mask);
                    assert_eq!(fen & !mask, 0xAAAA_AAAA & !mask);

                    gpio.set_pin_mode(n, Mode::Output, pull, edge).unwrap();
                    assert_eq!(
                        device.register(offset),
                        (0x3FFF_FFFF & !(7 << shift)) | (1 << shift)
                    );

                    device.clear_accesses();
                    gpio.set_pin(n, true).unwrap();
                    assert_eq!(
                        device.accesses(),
                        vec![Access::Write {
                            index: regs::GPSET0,
                            value: mask
                        }]
                    );
                    assert!(gpio.get_pin(n).unwrap());

                    device.clear_accesses();
                    gpio.set_pin(n, false).unwrap();
                    assert_eq!(
                        device.accesses(),
                        vec![Access::Write {
                            index: regs::GPCLR0,
                            value: mask
                        }]
                    );
                    assert!(!gpio.get_pin(n).unwrap());
                }
            }
        }
    }

    #[test]
    fn test_output_ignores_pull_and_edge() {
        let (mut gpio, device) = open_gpio();
        gpio.set_pin_mode(22, Mode::Output, Pull::Up, Edge::BOTH).unwrap();

        let (offset, shift) = fsel_field(pin(22));
        assert_eq!(
            device.accesses(),
            vec![
                Access::Read { index: offset, value: 0 },
                Access::Write {
                    index: offset,
                    value: 1 << shift
                },
            ]
        );
    }

    #[test]
    fn test_pull_handshake_sequence() {
        for (pull, code) in [(Pull::Floating, 0), (Pull::Down, 1), (Pull::Up, 2)] {
            let (mut gpio, device) = open_gpio();
            gpio.set_pin_mode(4, Mode::Input, pull, Edge::NONE).unwrap();

            let accesses = device.accesses();
            // FSEL read-modify-write comes first
            assert_eq!(accesses[0], Access::Read { index: 0, value: 0 });
            assert_eq!(accesses[1], Access::Write { index: 0, value: 0 });
            assert_eq!(
                &accesses[2..8],
                &[
                    Access::Write {
                        index: regs::GPPUD,
                        value: code
                    },
                    Access::Delay { us: PULL_SETTLE_US },
                    Access::Write {
                        index: regs::GPPUDCLK0,
                        value: 1 << 4
                    },
                    Access::Delay { us: PULL_SETTLE_US },
                    Access::Write {
                        index: regs::GPPUD,
                        value: 0
                    },
                    Access::Write {
                        index: regs::GPPUDCLK0,
                        value: 0
                    },
                ]
            );
            // Edge enables follow, outside the handshake
            assert!(accesses[8..]
                .iter()
                .all(|a| matches!(a, Access::Read { index, .. } | Access::Write { index, .. }
                    if *index == regs::GPREN0 || *index == regs::GPFEN0)));
            assert_eq!(device.register(regs::GPPUD), 0);
            assert_eq!(device.register(regs::GPPUDCLK0), 0);
        }
    }

    #[test]
    fn test_pin17_rising_pull_up() {
        let (mut gpio, device) = open_gpio();
        device.poke(regs::GPREN0, 0x0000_1004);
        device.poke(regs::GPFEN0, 0xFFFF_FFFF);

        gpio.set_pin_mode(17, Mode::Input, Pull::Up, Edge::RISING).unwrap();

        assert_eq!(device.register(regs::GPREN0), 0x0000_1004 | 1 << 17);
        assert_eq!(device.register(regs::GPFEN0), !(1u32 << 17));
        assert!(device.accesses().contains(&Access::Write {
            index: regs::GPPUDCLK0,
            value: 1 << 17
        }));
    }

    #[test]
    fn test_edge_detected_is_consumed() {
        let (mut gpio, device) = open_gpio();
        gpio.set_pin_mode(17, Mode::Input, Pull::Up, Edge::BOTH).unwrap();
        device.trigger_edge(pin(17));
        device.trigger_edge(pin(5));
        device.clear_accesses();

        assert!(gpio.get_pin_edge_detected(17).unwrap());
        assert_eq!(
            device.accesses()[1],
            Access::Write {
                index: regs::GPEDS0,
                value: pin_mask(pin(17))
            }
        );

        device.clear_accesses();
        assert!(!gpio.get_pin_edge_detected(17).unwrap());
        // No write when nothing is latched
        assert_eq!(device.accesses().len(), 1);

        // Another pin's latched event is left alone
        assert_eq!(device.register(regs::GPEDS0), 1 << 5);
        assert!(gpio.get_pin_edge_detected(5).unwrap());
    }

    #[test]
    fn test_falling_edge_latched_from_level_change() {
        let (mut gpio, device) = open_gpio();
        gpio.set_pin_mode(27, Mode::Input, Pull::Up, Edge::FALLING).unwrap();

        device.set_level(pin(27), true);
        assert!(gpio.get_pin(27).unwrap());
        assert!(!gpio.get_pin_edge_detected(27).unwrap());

        device.set_level(pin(27), false);
        assert!(!gpio.get_pin(27).unwrap());
        assert!(gpio.get_pin_edge_detected(27).unwrap());
        assert!(!gpio.get_pin_edge_detected(27).unwrap());
    }

    #[test]
    fn test_reopen_round_trip() {
        let (mut gpio, device) = open_gpio();

        gpio.set_pin_mode(12, Mode::Input, Pull::Down, Edge::BOTH).unwrap();
        let first = device.accesses();
        let regs_first = device.registers();

        gpio.close();
        assert!(!gpio.is_open());
        assert!(!device.is_mapped());
        assert_eq!(
            gpio.set_pin_mode(12, Mode::Input, Pull::Down, Edge::BOTH),
            Err(Error::NotOpen)
        );
        assert_eq!(gpio.set_pin(12, true), Err(Error::NotOpen));

        // Start from the same register state as the first run
        for index in 0..REGISTER_COUNT {
            device.poke(index, 0);
        }
        device.clear_accesses();

        gpio.open().unwrap();
        assert!(gpio.is_open());
        assert!(device.is_mapped());
        gpio.set_pin_mode(12, Mode::Input, Pull::Down, Edge::BOTH).unwrap();

        assert_eq!(device.accesses(), first);
        assert_eq!(device.registers(), regs_first);
    }

    #[test]
    fn test_close_twice_and_drop() {
        let device = DummyDevice::new();
        {
            let mut gpio = Gpio::new(device.clone());
            gpio.close();
            gpio.open().unwrap();
            assert!(device.is_mapped());
            gpio.close();
            gpio.close();
            assert!(!device.is_mapped());
            gpio.open().unwrap();
        }
        assert!(!device.is_mapped());
    }

    #[test]
    fn test_open_twice_keeps_one_mapping() {
        let (mut gpio, device) = open_gpio();
        gpio.open().unwrap();
        assert!(gpio.is_open());
        assert_eq!(device.state.borrow().live_maps, 1);
    }

    #[test]
    fn test_open_failure_leaves_closed() {
        let device = DummyDevice::new();
        device.set_refuse_open(true);
        let mut gpio = Gpio::new(device.clone());

        assert_eq!(gpio.open(), Err(DummyError::OpenRefused));
        assert!(!gpio.is_open());
        assert!(!device.is_mapped());

        // No retries: a fresh call is needed once the device is available
        device.set_refuse_open(false);
        assert!(!gpio.is_open());
        gpio.open().unwrap();
        assert!(gpio.is_open());
    }
}
