//! Read-only process handle with RAII semantics

use crate::core::types::{Address, MemoryError, MemoryResult, ModuleRecord, ProcessId};
use crate::process::system::ProcessAccessor;
use crate::windows::bindings::{kernel32, psapi};
use crate::windows::types::Handle;
use crate::windows::utils::{ErrorCode, WinError};
use std::fmt;
use std::path::PathBuf;
use tracing::trace;

/// Access rights for process handles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessAccess {
    value: u32,
}

impl ProcessAccess {
    /// Query information access
    pub const QUERY_INFORMATION: Self = Self { value: 0x0400 };
    /// Read memory access
    pub const VM_READ: Self = Self { value: 0x0010 };

    /// Combine access rights
    pub fn combine(rights: &[Self]) -> Self {
        Self {
            value: rights.iter().fold(0, |acc, right| acc | right.value),
        }
    }

    /// Get raw value
    pub fn value(&self) -> u32 {
        self.value
    }
}

/// Open handle to another process
///
/// The handle is closed by [`ProcessAccessor::close`] or on drop, whichever
/// comes first.
pub struct ProcessHandle {
    handle: Handle,
    pid: ProcessId,
    access: ProcessAccess,
}

impl ProcessHandle {
    /// Open a process with specified access rights
    pub fn open(pid: ProcessId, access: ProcessAccess) -> MemoryResult<Self> {
        let raw_handle = kernel32::open_process(pid, access.value())?;
        trace!(pid, access = access.value(), "opened process handle");
        Ok(ProcessHandle {
            handle: Handle::new(raw_handle),
            pid,
            access,
        })
    }

    /// Open a process for module queries and memory reads
    pub fn open_for_read(pid: ProcessId) -> MemoryResult<Self> {
        Self::open(
            pid,
            ProcessAccess::combine(&[ProcessAccess::QUERY_INFORMATION, ProcessAccess::VM_READ]),
        )
    }

    /// Check if handle is still held
    pub fn is_valid(&self) -> bool {
        !self.handle.is_null()
    }

    fn ensure_open(&self) -> MemoryResult<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(MemoryError::Revoked)
        }
    }

    fn module_error(&self, code: ErrorCode, context: &str) -> MemoryError {
        match code {
            ErrorCode::AccessDenied => MemoryError::access_denied(
                self.pid,
                format!("{} refused module access", context),
            ),
            other => WinError::with_code(other, context).to_memory_error(),
        }
    }
}

impl ProcessAccessor for ProcessHandle {
    fn pid(&self) -> ProcessId {
        self.pid
    }

    fn is_open(&self) -> bool {
        self.is_valid()
    }

    fn modules(&self) -> MemoryResult<Vec<ModuleRecord>> {
        self.ensure_open()?;
        let raw = self.handle.raw();

        let modules = unsafe { psapi::enum_process_modules(raw) }
            .map_err(|code| self.module_error(code, "EnumProcessModulesEx"))?;

        let mut records = Vec::with_capacity(modules.len());
        for module in modules {
            // Modules unloaded since the enumeration are skipped.
            let name = match unsafe { psapi::get_module_base_name(raw, module) } {
                Ok(name) => name,
                Err(_) => continue,
            };
            let info = match unsafe { psapi::get_module_information(raw, module) } {
                Ok(info) => info,
                Err(_) => continue,
            };
            let mut record = ModuleRecord::new(
                name,
                Address::new(info.lpBaseOfDll as usize),
                info.SizeOfImage as usize,
            );
            if let Ok(path) = unsafe { psapi::get_module_file_name(raw, module) } {
                record = record.with_path(PathBuf::from(path));
            }
            records.push(record);
        }
        Ok(records)
    }

    fn read_into(&self, address: Address, buffer: &mut [u8]) -> MemoryResult<usize> {
        self.ensure_open()?;
        unsafe { kernel32::read_process_memory(self.handle.raw(), address.as_usize(), buffer) }
            .map_err(|code| match code {
                ErrorCode::AccessDenied => {
                    MemoryError::access_denied(self.pid, "handle lacks read rights")
                }
                _ => MemoryError::access_violation(address, buffer.len()),
            })
    }

    fn close(&mut self) -> MemoryResult<()> {
        if self.is_valid() {
            trace!(pid = self.pid, "closing process handle");
        }
        self.handle.close()
    }
}

impl fmt::Debug for ProcessHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessHandle")
            .field("pid", &self.pid)
            .field("valid", &self.is_valid())
            .field("access", &format!("0x{:X}", self.access.value()))
            .finish()
    }
}

impl fmt::Display for ProcessHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ProcessHandle(pid={}, valid={})",
            self.pid,
            self.is_valid()
        )
    }
}
