//! Kernel32.dll bindings for process and memory operations

use crate::core::types::{MemoryError, MemoryResult};
use crate::windows::utils::{open_process_error, ErrorCode};
use winapi::shared::basetsd::SIZE_T;
use winapi::shared::minwindef::{FALSE, LPCVOID, LPVOID};
use winapi::um::handleapi::CloseHandle;
use winapi::um::memoryapi::ReadProcessMemory;
use winapi::um::processthreadsapi::OpenProcess;
use winapi::um::winnt::HANDLE;

/// Safe wrapper for OpenProcess
pub fn open_process(pid: u32, desired_access: u32) -> MemoryResult<HANDLE> {
    unsafe {
        let handle = OpenProcess(desired_access, FALSE, pid);
        if handle.is_null() {
            Err(open_process_error(pid, ErrorCode::last_error()))
        } else {
            Ok(handle)
        }
    }
}

/// Safe wrapper for CloseHandle
///
/// # Safety
/// The handle must be a valid Windows handle that is not closed elsewhere
pub unsafe fn close_handle(handle: HANDLE) -> MemoryResult<()> {
    if handle.is_null() {
        return Ok(());
    }

    if CloseHandle(handle) == FALSE {
        Err(MemoryError::WindowsApi(format!(
            "CloseHandle: {}",
            ErrorCode::last_error()
        )))
    } else {
        Ok(())
    }
}

/// Wrapper for ReadProcessMemory that keeps partial copies
///
/// Returns the number of bytes copied, even when the call failed part way
/// through. Fails with the Windows error code only when nothing was copied.
///
/// # Safety
/// The handle must be a valid process handle opened with `PROCESS_VM_READ`
pub unsafe fn read_process_memory(
    handle: HANDLE,
    address: usize,
    buffer: &mut [u8],
) -> Result<usize, ErrorCode> {
    let mut bytes_read: SIZE_T = 0;

    let result = ReadProcessMemory(
        handle,
        address as LPCVOID,
        buffer.as_mut_ptr() as LPVOID,
        buffer.len(),
        &mut bytes_read,
    );

    if result != FALSE || bytes_read > 0 {
        Ok(bytes_read)
    } else {
        Err(ErrorCode::last_error())
    }
}
