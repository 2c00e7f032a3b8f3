//! Edge polling command
//!
//! The hardware latches edges in GPEDS0; there is no interrupt delivery, so
//! the watcher polls and consumes the latch at a fixed interval.

use crate::backends::PinControl;
use gpiomem_core::{Edge, Level, Mode, Pull};
use std::thread;
use std::time::Duration;

/// Configure `pin` as an input and poll its edge latch
///
/// Calls `on_edge` with the running edge count and the level sampled right
/// after the edge was consumed. Returns after `count` edges, or never if
/// `count` is `None`.
pub fn watch_edges<F>(
    gpio: &mut dyn PinControl,
    pin: u8,
    pull: Pull,
    edge: Edge,
    interval: Duration,
    count: Option<u64>,
    mut on_edge: F,
) -> Result<u64, Box<dyn std::error::Error>>
where
    F: FnMut(u64, Level),
{
    if edge == Edge::NONE {
        return Err("watching with edge detection disabled would never report anything".into());
    }

    gpio.set_pin_mode(pin, Mode::Input, pull, edge)?;
    // Drop anything latched before we started watching
    gpio.get_pin_edge_detected(pin)?;

    let mut seen = 0u64;
    loop {
        if count.is_some_and(|limit| seen >= limit) {
            return Ok(seen);
        }
        if gpio.get_pin_edge_detected(pin)? {
            seen += 1;
            on_edge(seen, Level::from(gpio.get_pin(pin)?));
            continue;
        }
        thread::sleep(interval);
    }
}

/// Print edges on a pin as they are detected
pub fn cmd_watch(
    gpio: &mut dyn PinControl,
    pin: u8,
    pull: Pull,
    edge: Edge,
    interval_ms: u64,
    count: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    log::info!(
        "Watching GPIO{} for {} edges (pull {}, polling every {} ms)",
        pin,
        edge,
        pull,
        interval_ms
    );
    let seen = watch_edges(
        gpio,
        pin,
        pull,
        edge,
        Duration::from_millis(interval_ms),
        count,
        |n, level| println!("GPIO{} edge #{}: now {}", pin, n, level),
    )?;
    log::debug!("Saw {} edges", seen);
    Ok(())
}
