//! Memory mapping of the GPIO register page
//!
//! `/dev/gpiomem` is a restricted character device that exposes only the
//! GPIO controller's register page, so unlike `/dev/mem` it can be opened
//! by any member of the `gpio` group without root.
//!
//! # Safety
//!
//! The mapping aliases live hardware registers. Every access goes through
//! volatile 32-bit loads and stores on word-aligned addresses inside the
//! mapped page.

use crate::error::{GpioMemError, Result};
use gpiomem_core::regs::BLOCK_SIZE;
use gpiomem_core::RegisterMap;

/// A mapped GPIO register page
///
/// The device file stays open for as long as the mapping exists. Dropping
/// the map unmaps the page first and then closes the file.
#[cfg(target_os = "linux")]
pub struct GpioMemMap {
    /// Start of the mapped page
    ptr: *mut u32,
    /// Open device handle, closed after the page is unmapped
    _file: std::fs::File,
    /// Device path (for logging)
    path: String,
}

#[cfg(target_os = "linux")]
impl GpioMemMap {
    /// Open `path` and map `BLOCK_SIZE` bytes at `offset`
    ///
    /// If the mapping fails the device handle is closed before the error is
    /// returned.
    pub fn new(path: &str, offset: u64) -> Result<Self> {
        use std::fs::OpenOptions;
        use std::os::unix::fs::OpenOptionsExt;
        use std::os::unix::io::AsRawFd;

        // O_SYNC for uncached access to the registers
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_SYNC | libc::O_CLOEXEC)
            .open(path)
            .map_err(|source| GpioMemError::OpenFailed {
                path: path.to_string(),
                source,
            })?;

        let ptr = unsafe {
            libc::mmap(
                std::ptr::null_mut(),
                BLOCK_SIZE,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_SHARED,
                file.as_raw_fd(),
                offset as libc::off_t,
            )
        };

        if ptr == libc::MAP_FAILED {
            let source = std::io::Error::last_os_error();
            drop(file);
            return Err(GpioMemError::MapFailed {
                path: path.to_string(),
                offset,
                size: BLOCK_SIZE,
                source,
            });
        }

        log::info!("{} open, registers mapped at {:p}", path, ptr);

        Ok(Self {
            ptr: ptr as *mut u32,
            _file: file,
            path: path.to_string(),
        })
    }

    /// Device path this page was mapped from
    pub fn path(&self) -> &str {
        &self.path
    }
}

#[cfg(target_os = "linux")]
impl RegisterMap for GpioMemMap {
    #[inline]
    fn read(&self, index: usize) -> u32 {
        debug_assert!(index < gpiomem_core::regs::REGISTER_COUNT);
        unsafe { core::ptr::read_volatile(self.ptr.add(index)) }
    }

    #[inline]
    fn write(&self, index: usize, value: u32) {
        debug_assert!(index < gpiomem_core::regs::REGISTER_COUNT);
        unsafe { core::ptr::write_volatile(self.ptr.add(index), value) }
    }

    fn delay_us(&self, us: u32) {
        std::thread::sleep(std::time::Duration::from_micros(us as u64));
    }
}

#[cfg(target_os = "linux")]
impl Drop for GpioMemMap {
    fn drop(&mut self) {
        log::info!("Unmapping {}", self.path);
        unsafe {
            libc::munmap(self.ptr as *mut libc::c_void, BLOCK_SIZE);
        }
        log::debug!("Closing {}", self.path);
    }
}

// Owned mapping, safe to move between threads. Not Sync: read-modify-write
// sequences on shared registers are not atomic.
#[cfg(target_os = "linux")]
unsafe impl Send for GpioMemMap {}

// Stub for non-Linux platforms
#[cfg(not(target_os = "linux"))]
pub struct GpioMemMap {
    _private: (),
}

#[cfg(not(target_os = "linux"))]
impl GpioMemMap {
    pub fn new(_path: &str, _offset: u64) -> Result<Self> {
        Err(GpioMemError::NotSupported)
    }

    pub fn path(&self) -> &str {
        ""
    }
}

#[cfg(not(target_os = "linux"))]
impl RegisterMap for GpioMemMap {
    fn read(&self, _index: usize) -> u32 {
        0
    }
    fn write(&self, _index: usize, _value: u32) {}
    fn delay_us(&self, _us: u32) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_device() {
        let err = GpioMemMap::new("/nonexistent/gpiomem", 0).err().unwrap();
        assert!(matches!(
            err,
            GpioMemError::OpenFailed { .. } | GpioMemError::NotSupported
        ));
    }

    #[test]
    #[ignore] // Requires a Raspberry Pi with /dev/gpiomem access
    fn test_map_gpiomem() {
        let map = GpioMemMap::new("/dev/gpiomem", 0).unwrap();
        // GPPUDCLK0 reads back as zero outside the handshake
        assert_eq!(map.read(gpiomem_core::regs::GPPUDCLK0), 0);
    }
}
