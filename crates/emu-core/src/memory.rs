//! Flat 64 KiB address space.
//!
//! The space starts out unpopulated: reads return 0 and writes are
//! dropped until an image is loaded. Loading always replaces the whole
//! image, zero-filling whatever the payload does not cover.

use std::fs;
use std::io;
use std::path::Path;

use log::trace;

use crate::Bus;

/// Number of addressable bytes.
pub const MEMORY_SIZE: usize = 0x1_0000;

/// Flat 64 KiB memory image with optional access tracing.
#[derive(Debug, Clone, Default)]
pub struct AddressSpace {
    data: Option<Box<[u8]>>,
    trace: bool,
}

impl AddressSpace {
    /// Create an unpopulated address space.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an address space filled with zeroes.
    #[must_use]
    pub fn zeroed() -> Self {
        Self {
            data: Some(vec![0; MEMORY_SIZE].into_boxed_slice()),
            trace: false,
        }
    }

    /// Replace the contents with `bytes` loaded at address 0.
    pub fn load(&mut self, bytes: &[u8]) {
        self.load_at(bytes, 0);
    }

    /// Replace the contents with `bytes` loaded at `offset`.
    ///
    /// Anything that would land past the end of the space is dropped.
    pub fn load_at(&mut self, bytes: &[u8], offset: usize) {
        let mut data = vec![0; MEMORY_SIZE].into_boxed_slice();
        if offset < MEMORY_SIZE {
            let count = bytes.len().min(MEMORY_SIZE - offset);
            data[offset..offset + count].copy_from_slice(&bytes[..count]);
        }
        self.data = Some(data);
    }

    /// Replace the contents with a binary image read from `path`.
    ///
    /// On error the previous contents are left untouched.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> io::Result<()> {
        self.load_file_at(path, 0)
    }

    /// Replace the contents with a binary image read from `path`, placed
    /// at `offset`.
    pub fn load_file_at(&mut self, path: impl AsRef<Path>, offset: usize) -> io::Result<()> {
        let bytes = fs::read(path)?;
        self.load_at(&bytes, offset);
        Ok(())
    }

    /// Drop the contents, returning to the unpopulated state.
    pub fn unload(&mut self) {
        self.data = None;
    }

    /// Whether an image is currently present.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.data.is_some()
    }

    /// Enable or disable access tracing.
    pub fn set_trace(&mut self, enabled: bool) {
        self.trace = enabled;
    }

    #[must_use]
    pub fn trace_enabled(&self) -> bool {
        self.trace
    }

    /// Read a byte without tracing.
    #[must_use]
    pub fn peek(&self, address: u16) -> u8 {
        self.data.as_ref().map_or(0, |data| data[usize::from(address)])
    }

    /// The raw image, if loaded.
    #[must_use]
    pub fn as_slice(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    fn poke(&mut self, address: u16, value: u8) {
        if let Some(data) = self.data.as_mut() {
            data[usize::from(address)] = value;
        }
    }
}

impl Bus for AddressSpace {
    fn read(&mut self, address: u16) -> u8 {
        let value = self.peek(address);
        if self.trace {
            trace!("read byte ({value:02X}) from addr: ${address:04X}");
        }
        value
    }

    fn write(&mut self, address: u16, value: u8) {
        self.poke(address, value);
        if self.trace {
            trace!("wrote byte ({value:02X}) to addr: ${address:04X}");
        }
    }

    fn read_word(&mut self, address: u16) -> u16 {
        let value = u16::from_le_bytes([
            self.peek(address),
            self.peek(address.wrapping_add(1)),
        ]);
        if self.trace {
            trace!("read word ({value:04X}) from addr: ${address:04X}");
        }
        value
    }

    fn write_word(&mut self, address: u16, value: u16) {
        let [low, high] = value.to_le_bytes();
        self.poke(address, low);
        self.poke(address.wrapping_add(1), high);
        if self.trace {
            trace!("wrote word ({value:04X}) to addr: ${address:04X}");
        }
    }
}
