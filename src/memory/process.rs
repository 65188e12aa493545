//! Process finding and module information

use super::{MemoryReader, ProcessFinder};

/// Information about a running process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInfo {
    /// Process ID
    pub pid: u32,
    /// Process name
    pub name: String,
    /// Base address of the main module
    pub base_address: usize,
    /// Size of the main module
    pub module_size: usize,
    /// Whether the process is 64-bit
    pub is_64_bit: bool,
}

/// Find a process by name
///
/// Returns process info if found, None otherwise
#[cfg(target_os = "windows")]
pub fn find_process(process_name: &str) -> Option<ProcessInfo> {
    use windows::Win32::Foundation::CloseHandle;
    use windows::Win32::System::Diagnostics::ToolHelp::{
        CreateToolhelp32Snapshot, Process32FirstW, Process32NextW, PROCESSENTRY32W,
        TH32CS_SNAPPROCESS,
    };

    unsafe {
        let snapshot = CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0).ok()?;

        let mut entry = PROCESSENTRY32W {
            dwSize: std::mem::size_of::<PROCESSENTRY32W>() as u32,
            ..Default::default()
        };

        let mut found = None;
        if Process32FirstW(snapshot, &mut entry).is_ok() {
            loop {
                let name = wide_to_string(&entry.szExeFile);
                if name.eq_ignore_ascii_case(process_name) {
                    found = Some((entry.th32ProcessID, name));
                    break;
                }

                if Process32NextW(snapshot, &mut entry).is_err() {
                    break;
                }
            }
        }

        let _ = CloseHandle(snapshot);

        let (pid, name) = found?;
        let (base_address, module_size) = get_module_base_and_size(pid, &name)?;
        Some(ProcessInfo {
            pid,
            name,
            base_address,
            module_size,
            is_64_bit: check_is_64_bit(pid),
        })
    }
}

/// Find a process by name (Linux implementation)
#[cfg(target_os = "linux")]
pub fn find_process(process_name: &str) -> Option<ProcessInfo> {
    use std::fs;
    use std::path::Path;

    for entry in fs::read_dir("/proc").ok()?.flatten() {
        let path = entry.path();

        let Some(pid) = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.parse::<u32>().ok())
        else {
            continue;
        };

        let Ok(comm) = fs::read_to_string(path.join("comm")) else {
            continue;
        };
        let comm = comm.trim();

        // Wine/Proton processes carry the Windows executable in cmdline
        let exe_name = fs::read_to_string(path.join("cmdline"))
            .ok()
            .and_then(|s| s.split('\0').next().map(|s| s.replace('\\', "/")))
            .and_then(|s| Path::new(&s).file_name().map(|n| n.to_string_lossy().to_string()))
            .unwrap_or_else(|| comm.to_string());

        if comm.eq_ignore_ascii_case(process_name) || exe_name.eq_ignore_ascii_case(process_name) {
            if let Some((base, size)) = get_module_base_from_maps(pid, &exe_name) {
                return Some(ProcessInfo {
                    pid,
                    name: exe_name.clone(),
                    base_address: base,
                    module_size: size,
                    is_64_bit: image_is_64_bit(&exe_name, is_elf_64_bit(pid)),
                });
            }
        }
    }

    None
}

#[cfg(not(any(target_os = "windows", target_os = "linux")))]
pub fn find_process(_process_name: &str) -> Option<ProcessInfo> {
    None
}

#[cfg(target_os = "windows")]
fn wide_to_string(buffer: &[u16]) -> String {
    let len = buffer.iter().position(|&c| c == 0).unwrap_or(buffer.len());
    String::from_utf16_lossy(&buffer[..len])
}

/// Get the main module's base and size
#[cfg(target_os = "windows")]
fn get_module_base_and_size(pid: u32, module_name: &str) -> Option<(usize, usize)> {
    use windows::Win32::Foundation::CloseHandle;
    use windows::Win32::System::Diagnostics::ToolHelp::{
        CreateToolhelp32Snapshot, Module32FirstW, Module32NextW, MODULEENTRY32W,
        TH32CS_SNAPMODULE, TH32CS_SNAPMODULE32,
    };

    unsafe {
        let snapshot = CreateToolhelp32Snapshot(TH32CS_SNAPMODULE | TH32CS_SNAPMODULE32, pid).ok()?;

        let mut entry = MODULEENTRY32W {
            dwSize: std::mem::size_of::<MODULEENTRY32W>() as u32,
            ..Default::default()
        };

        let mut result = None;
        if Module32FirstW(snapshot, &mut entry).is_ok() {
            loop {
                let name = wide_to_string(&entry.szModule);
                if name.eq_ignore_ascii_case(module_name) {
                    result = Some((entry.modBaseAddr as usize, entry.modBaseSize as usize));
                    break;
                }

                if Module32NextW(snapshot, &mut entry).is_err() {
                    break;
                }
            }
        }

        let _ = CloseHandle(snapshot);
        result
    }
}

/// Check if a process is 64-bit (Windows)
#[cfg(target_os = "windows")]
fn check_is_64_bit(pid: u32) -> bool {
    use windows::Win32::Foundation::{CloseHandle, BOOL};
    use windows::Win32::System::Threading::{
        IsWow64Process, OpenProcess, PROCESS_QUERY_LIMITED_INFORMATION,
    };

    unsafe {
        if let Ok(handle) = OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, false, pid) {
            let mut is_wow64 = BOOL(0);
            let queried = IsWow64Process(handle, &mut is_wow64).is_ok();
            let _ = CloseHandle(handle);
            if queried {
                // WOW64 means a 32-bit process on 64-bit Windows
                return !is_wow64.as_bool() && std::mem::size_of::<usize>() == 8;
            }
        }
    }

    std::mem::size_of::<usize>() == 8
}

/// Parse /proc/[pid]/maps to get the main module's base address and size
#[cfg(target_os = "linux")]
fn get_module_base_from_maps(pid: u32, module_name: &str) -> Option<(usize, usize)> {
    let maps = std::fs::read_to_string(format!("/proc/{}/maps", pid)).ok()?;

    let mut first: Option<(usize, usize)> = None;
    let mut module: Option<(usize, usize)> = None;

    for line in maps.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 2 || !parts[1].starts_with('r') {
            continue;
        }

        let Some((start, end)) = parts[0].split_once('-') else {
            continue;
        };
        let (Ok(start), Ok(end)) = (
            usize::from_str_radix(start, 16),
            usize::from_str_radix(end, 16),
        ) else {
            continue;
        };

        if first.is_none() {
            first = Some((start, end));
        }

        let mapped_name = parts
            .get(5)
            .map(|p| p.rsplit(['/', '\\']).next().unwrap_or(*p))
            .unwrap_or("");
        if mapped_name.eq_ignore_ascii_case(module_name) {
            module = Some(match module {
                Some((base, _)) => (base, end),
                None => (start, end),
            });
        }
    }

    let (base, end) = module.or(first)?;
    Some((base, end - base))
}

/// Read the ELF class of the process image
#[cfg(target_os = "linux")]
fn is_elf_64_bit(pid: u32) -> Option<bool> {
    use std::io::Read;

    let mut header = [0u8; 5];
    std::fs::File::open(format!("/proc/{}/exe", pid))
        .ok()?
        .read_exact(&mut header)
        .ok()?;

    if &header[..4] != b"\x7fELF" {
        return None;
    }
    Some(header[4] == 2)
}

/// Bitness of the matched image.
///
/// A Windows executable hosted by Wine reports the ELF class of the Wine
/// loader, not its own. Every supported build is a 32-bit executable.
#[cfg(any(target_os = "linux", test))]
fn image_is_64_bit(exe_name: &str, elf_64_bit: Option<bool>) -> bool {
    if exe_name.to_ascii_lowercase().ends_with(".exe") {
        return false;
    }
    elf_64_bit.unwrap_or(std::mem::size_of::<usize>() == 8)
}

/// Check if a process is still running by its PID
#[cfg(target_os = "windows")]
pub fn is_process_running(pid: u32) -> bool {
    use windows::Win32::Foundation::CloseHandle;
    use windows::Win32::System::Threading::{OpenProcess, PROCESS_QUERY_LIMITED_INFORMATION};

    unsafe {
        if let Ok(handle) = OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, false, pid) {
            let result = super::windows::is_handle_running(handle);
            let _ = CloseHandle(handle);
            return result;
        }
    }

    false
}

/// Check if a process is still running by its PID (Linux)
#[cfg(target_os = "linux")]
pub fn is_process_running(pid: u32) -> bool {
    std::path::Path::new(&format!("/proc/{}", pid)).exists()
}

#[cfg(not(any(target_os = "windows", target_os = "linux")))]
pub fn is_process_running(_pid: u32) -> bool {
    false
}

/// Find a process by any of the given names
pub fn find_process_by_names(process_names: &[&str]) -> Option<ProcessInfo> {
    process_names.iter().find_map(|name| find_process(name))
}

/// Process finder backed by the operating system
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProcessFinder;

impl ProcessFinder for SystemProcessFinder {
    fn find_process(&self, target_names: &[&str]) -> Option<ProcessInfo> {
        find_process_by_names(target_names)
    }

    #[cfg(target_os = "windows")]
    fn open_process(&self, info: &ProcessInfo) -> Option<Box<dyn MemoryReader>> {
        super::WindowsMemoryReader::open(info.pid)
            .map(|reader| Box::new(reader) as Box<dyn MemoryReader>)
    }

    #[cfg(target_os = "linux")]
    fn open_process(&self, info: &ProcessInfo) -> Option<Box<dyn MemoryReader>> {
        Some(Box::new(super::LinuxMemoryReader::new(info.pid as i32)))
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux")))]
    fn open_process(&self, _info: &ProcessInfo) -> Option<Box<dyn MemoryReader>> {
        None
    }
}
