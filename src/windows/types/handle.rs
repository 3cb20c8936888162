//! Owned HANDLE wrapper with idempotent close

use crate::core::types::MemoryResult;
use crate::windows::bindings::kernel32;
use std::ptr;
use winapi::um::handleapi::INVALID_HANDLE_VALUE;
use winapi::um::winnt::HANDLE;

/// Owned Windows HANDLE, closed exactly once
pub struct Handle {
    handle: HANDLE,
}

impl Handle {
    /// Take ownership of a raw handle
    ///
    /// `INVALID_HANDLE_VALUE` is normalized to null so it is never closed.
    pub fn new(handle: HANDLE) -> Self {
        if handle == INVALID_HANDLE_VALUE {
            return Handle::null();
        }
        Handle { handle }
    }

    /// Create a null handle
    pub fn null() -> Self {
        Handle {
            handle: ptr::null_mut(),
        }
    }

    /// Check if handle is null (never opened, or already closed)
    pub fn is_null(&self) -> bool {
        self.handle.is_null()
    }

    /// Get the raw handle
    pub fn raw(&self) -> HANDLE {
        self.handle
    }

    /// Close the handle; later calls are no-ops
    pub fn close(&mut self) -> MemoryResult<()> {
        let handle = std::mem::replace(&mut self.handle, ptr::null_mut());
        if handle.is_null() {
            return Ok(());
        }
        unsafe { kernel32::close_handle(handle) }
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        // Ignore errors on cleanup
        let _ = self.close();
    }
}
