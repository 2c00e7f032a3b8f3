//! CLI command implementations
//!
//! Commands take a [`PinControl`](crate::backends::PinControl) so they run
//! unchanged against /dev/gpiomem and the dummy register block.

mod list;
pub mod pin;
pub mod watch;

pub use list::list_backends;
