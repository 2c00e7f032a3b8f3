//! Pin configuration and level commands

use crate::backends::PinControl;
use gpiomem_core::{Edge, Level, Mode, Pull};
use std::thread;
use std::time::Duration;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Configure a pin
pub fn cmd_mode(
    gpio: &mut dyn PinControl,
    pin: u8,
    mode: Mode,
    pull: Pull,
    edge: Edge,
) -> CmdResult {
    gpio.set_pin_mode(pin, mode, pull, edge)?;
    match mode {
        Mode::Output => println!("GPIO{}: {}", pin, mode),
        Mode::Input => println!("GPIO{}: {} pull={} edge={}", pin, mode, pull, edge),
    }
    Ok(())
}

/// Configure a pin as output and drive it to `level`
pub fn cmd_write(gpio: &mut dyn PinControl, pin: u8, level: Level) -> CmdResult {
    gpio.set_pin_mode(pin, Mode::Output, Pull::Floating, Edge::NONE)?;
    gpio.set_pin(pin, level.into())?;
    log::info!("GPIO{} driven {}", pin, level);
    Ok(())
}

/// Print a pin's level
pub fn cmd_read(gpio: &dyn PinControl, pin: u8) -> CmdResult {
    let level = Level::from(gpio.get_pin(pin)?);
    println!("{}", level);
    Ok(())
}

/// Toggle an output `count` times, leaving it low
pub fn cmd_blink(gpio: &mut dyn PinControl, pin: u8, period_ms: u64, count: u64) -> CmdResult {
    gpio.set_pin_mode(pin, Mode::Output, Pull::Floating, Edge::NONE)?;
    let half_period = Duration::from_millis(period_ms / 2);

    log::info!("Blinking GPIO{} {} times ({} ms period)", pin, count, period_ms);
    for _ in 0..count {
        gpio.set_pin(pin, true)?;
        thread::sleep(half_period);
        gpio.set_pin(pin, false)?;
        thread::sleep(half_period);
    }
    Ok(())
}
