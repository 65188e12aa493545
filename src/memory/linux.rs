//! Linux memory reader implementation

#![cfg(target_os = "linux")]

use super::MemoryReader;

/// Linux-specific memory reader using process_vm_readv
pub struct LinuxMemoryReader {
    pid: i32,
}

impl LinuxMemoryReader {
    /// Create a new Linux memory reader for the given process ID
    pub fn new(pid: i32) -> Self {
        Self { pid }
    }

    /// Get the process ID
    pub fn pid(&self) -> i32 {
        self.pid
    }
}

impl MemoryReader for LinuxMemoryReader {
    fn read_bytes(&self, address: usize, size: usize) -> Option<Vec<u8>> {
        let mut buffer = vec![0u8; size];

        let local_iov = libc::iovec {
            iov_base: buffer.as_mut_ptr() as *mut _,
            iov_len: size,
        };

        let remote_iov = libc::iovec {
            iov_base: address as *mut _,
            iov_len: size,
        };

        let result = unsafe { libc::process_vm_readv(self.pid, &local_iov, 1, &remote_iov, 1, 0) };

        if result == size as isize {
            Some(buffer)
        } else {
            None
        }
    }

    fn is_alive(&self) -> bool {
        super::is_process_running(self.pid as u32)
    }
}
