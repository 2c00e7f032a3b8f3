//! Backend registration and dispatch
//!
//! This module opens a register mapper by backend name and hides the
//! concrete device type behind [`PinControl`], so the commands work the same
//! against real hardware and the in-memory register block.

use gpiomem_core::{Edge, Gpio, GpioDevice, Mode, Pull};
use thiserror::Error;

/// Errors from backend selection
#[derive(Debug, Error)]
pub enum BackendError {
    /// No backend with this name is compiled in
    #[error("Unknown backend: {0}")]
    UnknownBackend(String),

    /// Malformed option string
    #[error("Invalid parameter format: '{0}' (expected key=value)")]
    InvalidParameter(String),
}

/// Information about a backend
pub struct BackendInfo {
    /// Primary name (used for matching)
    pub name: &'static str,
    /// Alternative names/aliases
    pub aliases: &'static [&'static str],
    /// Short description
    pub description: &'static str,
}

/// Get information about all available backends (enabled at compile time)
#[allow(unused_mut, clippy::vec_init_then_push)]
pub fn available_backends() -> Vec<BackendInfo> {
    let mut backends = Vec::new();

    #[cfg(feature = "linux")]
    backends.push(BackendInfo {
        name: "gpiomem",
        aliases: &["linux"],
        description: "BCM283x registers via /dev/gpiomem (dev=<path>,offset=<bytes>)",
    });

    #[cfg(feature = "dummy")]
    backends.push(BackendInfo {
        name: "dummy",
        aliases: &[],
        description: "In-memory register block for testing",
    });

    backends
}

/// Generate help text for the backend argument
pub fn backend_help() -> String {
    format!("Backend to use [available: {}]", backend_names_short())
}

/// Generate a short list of backend names for CLI help
pub fn backend_names_short() -> String {
    let backends = available_backends();
    let names: Vec<&str> = backends.iter().map(|b| b.name).collect();
    names.join(", ")
}

/// Parsed backend parameters
#[derive(Debug)]
pub struct BackendParams {
    /// Backend name as given
    pub name: String,
    /// Key-value parameters, in the order given
    pub params: Vec<(String, String)>,
}

impl BackendParams {
    /// Parameters as borrowed pairs, the form the backend crates take
    pub fn options(&self) -> Vec<(&str, &str)> {
        self.params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }
}

/// Parse a backend string into name and parameters
///
/// Format: "name" or "name:key1=value1,key2=value2"
pub fn parse_backend_params(s: &str) -> Result<BackendParams, BackendError> {
    let (name, opts_str) = s.split_once(':').unwrap_or((s, ""));

    let mut params = Vec::new();
    if !opts_str.is_empty() {
        for opt in opts_str.split(',') {
            if let Some((key, value)) = opt.split_once('=') {
                params.push((key.to_string(), value.to_string()));
            } else {
                return Err(BackendError::InvalidParameter(opt.to_string()));
            }
        }
    }

    Ok(BackendParams {
        name: name.to_string(),
        params,
    })
}

/// Object-safe view of an open register mapper
pub trait PinControl {
    /// See [`Gpio::set_pin_mode`]
    fn set_pin_mode(&mut self, pin: u8, mode: Mode, pull: Pull, edge: Edge)
        -> gpiomem_core::Result<()>;
    /// See [`Gpio::set_pin`]
    fn set_pin(&self, pin: u8, high: bool) -> gpiomem_core::Result<()>;
    /// See [`Gpio::get_pin`]
    fn get_pin(&self, pin: u8) -> gpiomem_core::Result<bool>;
    /// See [`Gpio::get_pin_edge_detected`]
    fn get_pin_edge_detected(&self, pin: u8) -> gpiomem_core::Result<bool>;
}

impl<D: GpioDevice> PinControl for Gpio<D> {
    fn set_pin_mode(
        &mut self,
        pin: u8,
        mode: Mode,
        pull: Pull,
        edge: Edge,
    ) -> gpiomem_core::Result<()> {
        Gpio::set_pin_mode(self, pin, mode, pull, edge)
    }

    fn set_pin(&self, pin: u8, high: bool) -> gpiomem_core::Result<()> {
        Gpio::set_pin(self, pin, high)
    }

    fn get_pin(&self, pin: u8) -> gpiomem_core::Result<bool> {
        Gpio::get_pin(self, pin)
    }

    fn get_pin_edge_detected(&self, pin: u8) -> gpiomem_core::Result<bool> {
        Gpio::get_pin_edge_detected(self, pin)
    }
}

/// Open a backend and map its register page
///
/// # Arguments
/// * `backend` - Backend specification (e.g., "dummy" or "gpiomem:dev=/dev/gpiomem")
pub fn open_backend(backend: &str) -> Result<Box<dyn PinControl>, Box<dyn std::error::Error>> {
    let params = parse_backend_params(backend)?;

    match params.name.as_str() {
        #[cfg(feature = "linux")]
        "gpiomem" | "linux" => {
            let gpio = gpiomem_linux::open_gpiomem(&params.options())?;
            Ok(Box::new(gpio))
        }

        #[cfg(feature = "dummy")]
        "dummy" => open_dummy(&params),

        _ => Err(BackendError::UnknownBackend(params.name).into()),
    }
}

#[cfg(feature = "dummy")]
fn open_dummy(params: &BackendParams) -> Result<Box<dyn PinControl>, Box<dyn std::error::Error>> {
    for (key, value) in &params.params {
        log::warn!("dummy: Unknown option: {}={}", key, value);
    }
    let mut gpio = Gpio::new(gpiomem_dummy::DummyDevice::new());
    gpio.open()?;
    Ok(Box::new(gpio))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_backend_params() {
        let params = parse_backend_params("gpiomem:dev=/dev/gpiomem,offset=0").unwrap();
        assert_eq!(params.name, "gpiomem");
        assert_eq!(
            params.options(),
            vec![("dev", "/dev/gpiomem"), ("offset", "0")]
        );

        let params = parse_backend_params("dummy").unwrap();
        assert_eq!(params.name, "dummy");
        assert!(params.params.is_empty());
    }

    #[test]
    fn test_parse_backend_params_rejects_bare_option() {
        let err = parse_backend_params("gpiomem:dev").unwrap_err();
        assert!(matches!(err, BackendError::InvalidParameter(ref opt) if opt == "dev"));
    }

    #[test]
    fn test_unknown_backend() {
        assert!(open_backend("ch341a").is_err());
    }

    #[cfg(feature = "dummy")]
    #[test]
    fn test_open_dummy() {
        let mut gpio = open_backend("dummy").unwrap();
        gpio.set_pin_mode(18, Mode::Output, Pull::Floating, Edge::NONE).unwrap();
        gpio.set_pin(18, true).unwrap();
        assert!(gpio.get_pin(18).unwrap());
    }
}
