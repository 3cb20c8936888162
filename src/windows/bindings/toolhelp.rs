//! Tool Help snapshot of running processes

use crate::core::types::{MemoryError, MemoryResult, ProcessDescriptor};
use crate::windows::types::Handle;
use crate::windows::utils::{wide_to_string, ErrorCode, WinError};
use std::mem;
use winapi::shared::minwindef::{DWORD, FALSE};
use winapi::um::tlhelp32::{
    CreateToolhelp32Snapshot, Process32FirstW, Process32NextW, PROCESSENTRY32W, TH32CS_SNAPPROCESS,
};

/// Point-in-time list of processes, iterated in snapshot order
pub struct ProcessSnapshot {
    handle: Handle,
    started: bool,
    done: bool,
}

impl ProcessSnapshot {
    /// Capture the current process list
    pub fn capture() -> MemoryResult<Self> {
        let raw = unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0) };
        let handle = Handle::new(raw);
        if handle.is_null() {
            return Err(WinError::new("CreateToolhelp32Snapshot").to_memory_error());
        }
        Ok(ProcessSnapshot {
            handle,
            started: false,
            done: false,
        })
    }

    fn next_entry(&mut self) -> Option<MemoryResult<PROCESSENTRY32W>> {
        let mut entry: PROCESSENTRY32W = unsafe { mem::zeroed() };
        entry.dwSize = mem::size_of::<PROCESSENTRY32W>() as DWORD;

        let result = unsafe {
            if self.started {
                Process32NextW(self.handle.raw(), &mut entry)
            } else {
                Process32FirstW(self.handle.raw(), &mut entry)
            }
        };
        self.started = true;

        if result != FALSE {
            return Some(Ok(entry));
        }
        self.done = true;
        match ErrorCode::last_error() {
            ErrorCode::NoMoreFiles => None,
            code => Some(Err(MemoryError::WindowsApi(format!(
                "Process32NextW: {}",
                code
            )))),
        }
    }
}

impl Iterator for ProcessSnapshot {
    type Item = MemoryResult<ProcessDescriptor>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        self.next_entry().map(|entry| {
            entry.map(|entry| {
                ProcessDescriptor::new(wide_to_string(&entry.szExeFile), entry.th32ProcessID)
            })
        })
    }
}
