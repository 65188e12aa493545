//! Traits for process discovery, plus in-memory doubles
//!
//! These allow for dependency injection, enabling mock implementations
//! for testing without requiring actual running processes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use super::{MemoryReader, ProcessInfo};

/// Trait for finding and attaching to processes
pub trait ProcessFinder: Send + Sync {
    /// Find a process by name from a list of target names
    fn find_process(&self, target_names: &[&str]) -> Option<ProcessInfo>;

    /// Open a process and create a memory reader
    fn open_process(&self, info: &ProcessInfo) -> Option<Box<dyn MemoryReader>>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Mock memory reader that returns data from a pre-configured memory map
///
/// Clones share the same memory and liveness, so a test can keep one handle
/// to poke "game memory" while the autosplitter reads through another.
#[derive(Clone)]
pub struct MockMemoryReader {
    /// Memory contents: address -> bytes
    memory: Arc<RwLock<HashMap<usize, Vec<u8>>>>,
    /// Whether the process is "running"
    alive: Arc<AtomicBool>,
}

impl Default for MockMemoryReader {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMemoryReader {
    /// Create a new mock memory reader
    pub fn new() -> Self {
        Self {
            memory: Arc::new(RwLock::new(HashMap::new())),
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Write bytes to mock memory
    pub fn write_bytes(&mut self, address: usize, data: &[u8]) {
        self.memory.write().insert(address, data.to_vec());
    }

    /// Write a u8 to mock memory
    pub fn write_u8(&mut self, address: usize, value: u8) {
        self.write_bytes(address, &[value]);
    }

    /// Write a u32 to mock memory
    pub fn write_u32(&mut self, address: usize, value: u32) {
        self.write_bytes(address, &value.to_le_bytes());
    }

    /// Write a u64 to mock memory
    pub fn write_u64(&mut self, address: usize, value: u64) {
        self.write_bytes(address, &value.to_le_bytes());
    }

    /// Write a boolean to mock memory
    pub fn write_bool(&mut self, address: usize, value: bool) {
        self.write_u8(address, value as u8);
    }

    /// Remove whatever is stored at an address, making it unreadable
    pub fn unmap(&mut self, address: usize) {
        self.memory.write().remove(&address);
    }

    /// Simulate process exit
    pub fn kill(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}

impl MemoryReader for MockMemoryReader {
    fn read_bytes(&self, address: usize, size: usize) -> Option<Vec<u8>> {
        if !self.is_alive() {
            return None;
        }

        let memory = self.memory.read();

        // Check for exact match first
        if let Some(data) = memory.get(&address) {
            if data.len() >= size {
                return Some(data[..size].to_vec());
            }
        }

        // Check if the address falls within any stored block
        for (&block_start, block_data) in memory.iter() {
            if address >= block_start && address < block_start + block_data.len() {
                let offset = address - block_start;
                if offset + size <= block_data.len() {
                    return Some(block_data[offset..offset + size].to_vec());
                }
            }
        }

        None
    }

    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }
}

/// Mock process finder for testing
///
/// Clones share the same process list.
#[derive(Clone, Default)]
pub struct MockProcessFinder {
    processes: Arc<RwLock<Vec<(ProcessInfo, MockMemoryReader)>>>,
}

impl MockProcessFinder {
    /// Create a new mock process finder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mock process backed by the given memory
    pub fn add_process(&self, info: ProcessInfo, reader: MockMemoryReader) {
        self.processes.write().push((info, reader));
    }

    /// Remove a mock process; its reader reports the process dead
    pub fn remove_process(&self, pid: u32) {
        let mut processes = self.processes.write();
        for (info, reader) in processes.iter() {
            if info.pid == pid {
                reader.kill();
            }
        }
        processes.retain(|(info, _)| info.pid != pid);
    }
}

impl ProcessFinder for MockProcessFinder {
    fn find_process(&self, target_names: &[&str]) -> Option<ProcessInfo> {
        let processes = self.processes.read();
        processes
            .iter()
            .find(|(info, _)| {
                target_names
                    .iter()
                    .any(|target| info.name.eq_ignore_ascii_case(target))
            })
            .map(|(info, _)| info.clone())
    }

    fn open_process(&self, info: &ProcessInfo) -> Option<Box<dyn MemoryReader>> {
        self.processes
            .read()
            .iter()
            .find(|(candidate, _)| candidate.pid == info.pid)
            .map(|(_, reader)| Box::new(reader.clone()) as Box<dyn MemoryReader>)
    }
}
