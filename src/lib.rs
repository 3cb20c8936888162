//! procpeek: scoped, read-only access to the memory of another process
//!
//! A session finds a running process by executable name, opens it with
//! query and read rights only, and hands a [`Capability`] to a callback.
//! Through the capability the callback can resolve module base addresses and
//! copy bytes out of the target. When the callback returns, fails or panics,
//! the capability is revoked and the handle is closed.

pub mod config;
pub mod core;
pub mod memory;
pub mod process;
pub mod session;
#[cfg(windows)]
pub mod windows;

pub use crate::core::types::{
    Address, ErrorKind, MemoryError, MemoryResult, ModuleRecord, ProcessDescriptor, ProcessId,
};
pub use crate::core::VERSION;
pub use memory::MemoryBuffer;
pub use session::{for_each_match, Capability, ScopedSession, SessionOptions, SessionState};

#[cfg(windows)]
pub use session::{list_running_process_names, with_each_process, with_process, with_process_config};
