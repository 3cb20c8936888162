//! Seams between session orchestration and the operating system
//!
//! [`ProcessSystem`] covers the machine-wide queries (snapshot, open) and
//! [`ProcessAccessor`] covers everything done through one open handle. The
//! Windows implementations live in [`crate::windows::NativeSystem`] and
//! [`crate::process::ProcessHandle`].

use crate::core::types::{Address, MemoryResult, ModuleRecord, ProcessDescriptor, ProcessId};

/// Machine-wide process facilities
pub trait ProcessSystem {
    /// Takes a fresh snapshot of running processes
    fn list_processes(&self) -> MemoryResult<Vec<ProcessDescriptor>>;

    /// Opens a read-only accessor for `pid`
    ///
    /// Fails with `AccessDenied` when the OS refuses the rights and with
    /// `ProcessExited` when the pid no longer exists.
    fn open(&self, pid: ProcessId) -> MemoryResult<Box<dyn ProcessAccessor>>;
}

/// Read-only operations bound to one open process handle
pub trait ProcessAccessor {
    /// Process the handle was opened for
    fn pid(&self) -> ProcessId;

    /// Whether the native handle is still held
    fn is_open(&self) -> bool;

    /// Snapshot of the modules currently loaded in the process
    fn modules(&self) -> MemoryResult<Vec<ModuleRecord>>;

    /// Copies up to `buffer.len()` bytes starting at `address`
    ///
    /// Returns the number of bytes actually copied, which is smaller than the
    /// buffer when the range runs into unreadable memory. Fails with
    /// `AccessViolation` when nothing could be copied.
    fn read_into(&self, address: Address, buffer: &mut [u8]) -> MemoryResult<usize>;

    /// Releases the native handle. Calling it again is a no-op.
    fn close(&mut self) -> MemoryResult<()>;
}
