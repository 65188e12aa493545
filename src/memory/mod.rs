//! Cross-platform memory operations
//!
//! This module provides platform-agnostic abstractions for reading another
//! process's memory, with implementations for Windows and Linux, plus the
//! `Watcher` dual buffer that every tracked game value is stored in.

#[cfg(target_os = "windows")]
mod windows;

#[cfg(target_os = "linux")]
mod linux;

mod pointer;
mod process;
mod traits;
mod watcher;

pub use pointer::Pointer;
pub use process::{find_process, find_process_by_names, is_process_running, ProcessInfo, SystemProcessFinder};
pub use traits::{MockMemoryReader, MockProcessFinder, ProcessFinder};
pub use watcher::Watcher;

#[cfg(target_os = "windows")]
pub use windows::WindowsMemoryReader;

#[cfg(target_os = "linux")]
pub use linux::LinuxMemoryReader;

use std::sync::Arc;

/// Platform-agnostic memory reading trait
pub trait MemoryReader: Send + Sync {
    /// Read raw bytes from memory
    fn read_bytes(&self, address: usize, size: usize) -> Option<Vec<u8>>;

    /// Whether the target process is still running
    fn is_alive(&self) -> bool {
        true
    }

    /// Read a u8 value
    fn read_u8(&self, address: usize) -> Option<u8> {
        self.read_bytes(address, 1).map(|b| b[0])
    }

    /// Read a u32 value (little-endian)
    fn read_u32(&self, address: usize) -> Option<u32> {
        self.read_bytes(address, 4)
            .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Read a u64 value (little-endian)
    fn read_u64(&self, address: usize) -> Option<u64> {
        self.read_bytes(address, 8).map(|b| {
            u64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]])
        })
    }

    /// Read a pointer of the given width
    fn read_ptr(&self, address: usize, is_64_bit: bool) -> Option<usize> {
        if is_64_bit {
            self.read_u64(address).map(|v| v as usize)
        } else {
            self.read_u32(address).map(|v| v as usize)
        }
    }

    /// Read a boolean (non-zero = true)
    fn read_bool(&self, address: usize) -> Option<bool> {
        self.read_u8(address).map(|v| v != 0)
    }
}

/// Context for a connected process
pub struct ProcessContext {
    /// Memory reader for this process
    pub reader: Arc<dyn MemoryReader>,
    /// Base address of the main module
    pub base_address: usize,
    /// Size of the main module
    pub module_size: usize,
    /// Process ID
    pub process_id: u32,
    /// Executable name the process was found under
    pub process_name: String,
    /// Whether this is a 64-bit process
    pub is_64_bit: bool,
}

impl ProcessContext {
    /// Create a new process context
    pub fn new(reader: Arc<dyn MemoryReader>, info: &ProcessInfo) -> Self {
        Self {
            reader,
            base_address: info.base_address,
            module_size: info.module_size,
            process_id: info.pid,
            process_name: info.name.clone(),
            is_64_bit: info.is_64_bit,
        }
    }

    /// Create a new process context from a boxed reader
    pub fn from_boxed(reader: Box<dyn MemoryReader>, info: &ProcessInfo) -> Self {
        Self::new(Arc::from(reader), info)
    }

    /// Get the memory reader
    pub fn reader(&self) -> &dyn MemoryReader {
        self.reader.as_ref()
    }

    /// Whether the attached process is still running
    pub fn is_alive(&self) -> bool {
        self.reader.is_alive()
    }

    /// Resolve a module-relative pointer chain in this process
    pub fn resolve(&self, pointer: &Pointer) -> Option<usize> {
        pointer.resolve(self.reader(), self.base_address, self.is_64_bit)
    }
}
