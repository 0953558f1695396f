use serde::Serialize;

use crate::error::Result;
use crate::memory::ReadMemory;

/// Target executable of the shipped offset table.
pub const DEFAULT_PROCESS_NAME: &str = "MonsterHunterWorld.exe";

/// Identity of an attached process instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessInfo {
    pub pid: u32,
    pub name: String,
    pub base_address: u64,
    pub module_size: u32,
}

/// An attached process whose memory can be read.
pub trait ProcessMemory: ReadMemory + Send {
    fn info(&self) -> &ProcessInfo;

    /// Cheap liveness probe: the process is alive if the first byte of
    /// its main module is still readable.
    fn is_alive(&self) -> bool {
        self.read_bytes(self.base_address(), 1).is_ok()
    }
}

/// Attaches to a process by executable name.
pub trait ProcessProvider: Send + Sync {
    type Process: ProcessMemory;

    fn attach(&self, executable: &str) -> Result<Self::Process>;
}

/// Provider backed by the operating system's process list.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessProvider;

#[cfg(target_os = "windows")]
impl ProcessProvider for SystemProcessProvider {
    type Process = ProcessHandle;

    fn attach(&self, executable: &str) -> Result<ProcessHandle> {
        ProcessHandle::find_and_open(executable)
    }
}

#[cfg(not(target_os = "windows"))]
impl ProcessProvider for SystemProcessProvider {
    type Process = UnsupportedProcess;

    fn attach(&self, executable: &str) -> Result<UnsupportedProcess> {
        Err(crate::error::Error::Unsupported(format!(
            "attaching to {} requires Windows",
            executable
        )))
    }
}

/// Placeholder process type for platforms without a reader backend.
///
/// It can never be constructed; `SystemProcessProvider::attach` always fails.
#[cfg(not(target_os = "windows"))]
#[derive(Debug)]
pub enum UnsupportedProcess {}

#[cfg(not(target_os = "windows"))]
impl ReadMemory for UnsupportedProcess {
    fn read_bytes(&self, _address: u64, _size: usize) -> Result<Vec<u8>> {
        match *self {}
    }

    fn base_address(&self) -> u64 {
        match *self {}
    }
}

#[cfg(not(target_os = "windows"))]
impl ProcessMemory for UnsupportedProcess {
    fn info(&self) -> &ProcessInfo {
        match *self {}
    }
}

#[cfg(target_os = "windows")]
pub use windows_impl::ProcessHandle;

#[cfg(target_os = "windows")]
mod windows_impl {
    use std::ffi::c_void;
    use std::mem;

    use tracing::debug;
    use windows::Win32::Foundation::{CloseHandle, HANDLE};
    use windows::Win32::System::Diagnostics::Debug::ReadProcessMemory;
    use windows::Win32::System::Diagnostics::ToolHelp::{
        CreateToolhelp32Snapshot, MODULEENTRY32W, Module32FirstW, PROCESSENTRY32W,
        Process32FirstW, Process32NextW, TH32CS_SNAPMODULE, TH32CS_SNAPMODULE32,
        TH32CS_SNAPPROCESS,
    };
    use windows::Win32::System::Threading::{
        OpenProcess, PROCESS_QUERY_LIMITED_INFORMATION, PROCESS_VM_READ,
    };

    use super::{ProcessInfo, ProcessMemory};
    use crate::error::{Error, Result};
    use crate::memory::ReadMemory;

    /// Read-only handle to a running process.
    ///
    /// The handle is closed on drop.
    pub struct ProcessHandle {
        handle: HANDLE,
        info: ProcessInfo,
    }

    // SAFETY: a process HANDLE is an opaque kernel object reference that may be
    // used from any thread; ReadProcessMemory does not mutate it.
    unsafe impl Send for ProcessHandle {}
    // SAFETY: see above, all access through &self is read-only.
    unsafe impl Sync for ProcessHandle {}

    impl ProcessHandle {
        /// Find the first process whose executable matches `name` and open it.
        pub fn find_and_open(name: &str) -> Result<Self> {
            let pid = find_process_id(name)?;
            Self::open(pid, name)
        }

        /// Open a process by id with read-only memory rights.
        pub fn open(pid: u32, name: &str) -> Result<Self> {
            // SAFETY: OpenProcess has no memory-safety preconditions.
            let handle =
                unsafe { OpenProcess(PROCESS_VM_READ | PROCESS_QUERY_LIMITED_INFORMATION, false, pid) }
                    .map_err(|e| Error::ProcessOpenFailed(format!("pid {}: {}", pid, e)))?;

            let (base_address, module_size) = match main_module(pid) {
                Ok(module) => module,
                Err(e) => {
                    // SAFETY: handle was returned by OpenProcess above and is not used again.
                    unsafe {
                        let _ = CloseHandle(handle);
                    }
                    return Err(e);
                }
            };

            debug!("Opened pid {} (base: {:#x})", pid, base_address);

            Ok(Self {
                handle,
                info: ProcessInfo {
                    pid,
                    name: name.to_string(),
                    base_address,
                    module_size,
                },
            })
        }
    }

    impl ReadMemory for ProcessHandle {
        fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>> {
            if size == 0 {
                return Ok(Vec::new());
            }
            let mut buffer = vec![0u8; size];
            let mut bytes_read = 0usize;
            // SAFETY: buffer is a live allocation of exactly `size` bytes; the source
            // address belongs to the target process and is validated by the kernel.
            unsafe {
                ReadProcessMemory(
                    self.handle,
                    address as *const c_void,
                    buffer.as_mut_ptr().cast(),
                    size,
                    Some(&mut bytes_read),
                )
            }
            .map_err(|e| Error::read_failed(address, e.to_string()))?;

            if bytes_read != size {
                return Err(Error::read_failed(
                    address,
                    format!("partial read: {} of {} bytes", bytes_read, size),
                ));
            }
            Ok(buffer)
        }

        fn base_address(&self) -> u64 {
            self.info.base_address
        }
    }

    impl ProcessMemory for ProcessHandle {
        fn info(&self) -> &ProcessInfo {
            &self.info
        }
    }

    impl Drop for ProcessHandle {
        fn drop(&mut self) {
            // SAFETY: the handle is owned by this struct and closed exactly once.
            unsafe {
                let _ = CloseHandle(self.handle);
            }
        }
    }

    fn wide_to_string(wide: &[u16]) -> String {
        let end = wide.iter().position(|&c| c == 0).unwrap_or(wide.len());
        String::from_utf16_lossy(&wide[..end])
    }

    fn find_process_id(name: &str) -> Result<u32> {
        // SAFETY: snapshot creation has no preconditions; the handle is closed below.
        let snapshot = unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0) }
            .map_err(|e| Error::ProcessNotFound(format!("{}: {}", name, e)))?;

        let mut entry = PROCESSENTRY32W {
            dwSize: mem::size_of::<PROCESSENTRY32W>() as u32,
            ..Default::default()
        };

        let mut found = None;
        // SAFETY: entry is initialized with the correct dwSize.
        let mut next = unsafe { Process32FirstW(snapshot, &mut entry) };
        while next.is_ok() {
            if wide_to_string(&entry.szExeFile).eq_ignore_ascii_case(name) {
                found = Some(entry.th32ProcessID);
                break;
            }
            // SAFETY: as above.
            next = unsafe { Process32NextW(snapshot, &mut entry) };
        }

        // SAFETY: snapshot handle is owned here and not used afterwards.
        unsafe {
            let _ = CloseHandle(snapshot);
        }

        found.ok_or_else(|| Error::ProcessNotFound(name.to_string()))
    }

    fn main_module(pid: u32) -> Result<(u64, u32)> {
        // SAFETY: snapshot creation has no preconditions; the handle is closed below.
        let snapshot =
            unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPMODULE | TH32CS_SNAPMODULE32, pid) }
                .map_err(|e| Error::ProcessOpenFailed(format!("module snapshot: {}", e)))?;

        let mut entry = MODULEENTRY32W {
            dwSize: mem::size_of::<MODULEENTRY32W>() as u32,
            ..Default::default()
        };

        // The first module of a snapshot is the executable image.
        // SAFETY: entry is initialized with the correct dwSize.
        let result = unsafe { Module32FirstW(snapshot, &mut entry) }
            .map(|_| (entry.modBaseAddr as u64, entry.modBaseSize))
            .map_err(|e| Error::ProcessOpenFailed(format!("main module: {}", e)));

        // SAFETY: snapshot handle is owned here and not used afterwards.
        unsafe {
            let _ = CloseHandle(snapshot);
        }

        result
    }
}
