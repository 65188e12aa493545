//! Windows memory reader implementation

#![cfg(target_os = "windows")]

use super::MemoryReader;
use windows::Win32::Foundation::{CloseHandle, HANDLE};
use windows::Win32::System::Diagnostics::Debug::ReadProcessMemory;
use windows::Win32::System::Threading::{
    GetExitCodeProcess, OpenProcess, PROCESS_QUERY_INFORMATION, PROCESS_VM_READ,
};

/// STILL_ACTIVE (STATUS_PENDING)
const STILL_ACTIVE: u32 = 259;

/// Check whether the process behind a handle has exited
pub(super) fn is_handle_running(handle: HANDLE) -> bool {
    if handle.is_invalid() {
        return false;
    }

    let mut exit_code = 0u32;
    unsafe { GetExitCodeProcess(handle, &mut exit_code).is_ok() && exit_code == STILL_ACTIVE }
}

/// Windows-specific memory reader using ReadProcessMemory
///
/// Owns the process handle and closes it on drop.
pub struct WindowsMemoryReader {
    handle: HANDLE,
}

impl WindowsMemoryReader {
    /// Open a process for reading
    pub fn open(pid: u32) -> Option<Self> {
        match unsafe { OpenProcess(PROCESS_VM_READ | PROCESS_QUERY_INFORMATION, false, pid) } {
            Ok(handle) => Some(Self { handle }),
            Err(e) => {
                log::warn!("OpenProcess failed for PID {}: {}", pid, e);
                None
            }
        }
    }

    /// Get the underlying handle
    pub fn handle(&self) -> HANDLE {
        self.handle
    }
}

impl MemoryReader for WindowsMemoryReader {
    fn read_bytes(&self, address: usize, size: usize) -> Option<Vec<u8>> {
        let mut buffer = vec![0u8; size];
        let mut bytes_read = 0usize;

        let result = unsafe {
            ReadProcessMemory(
                self.handle,
                address as *const _,
                buffer.as_mut_ptr() as *mut _,
                size,
                Some(&mut bytes_read as *mut usize),
            )
        };

        if result.is_ok() && bytes_read == size {
            Some(buffer)
        } else {
            None
        }
    }

    fn is_alive(&self) -> bool {
        is_handle_running(self.handle)
    }
}

impl Drop for WindowsMemoryReader {
    fn drop(&mut self) {
        unsafe {
            let _ = CloseHandle(self.handle);
        }
    }
}

// Note: HANDLE is not Send/Sync by default, but the handle is only used for
// read-only queries and is owned by this reader
unsafe impl Send for WindowsMemoryReader {}
unsafe impl Sync for WindowsMemoryReader {}
