//! Native implementation of the process system seam

use crate::config::Config;
use crate::core::types::{MemoryResult, ProcessDescriptor, ProcessId};
use crate::process::{ProcessAccessor, ProcessHandle, ProcessSystem};
use crate::windows::bindings::ProcessSnapshot;
use crate::windows::privilege::ensure_debug_privilege;
use tracing::trace;

/// Live Windows processes, enumerated through Tool Help and opened read-only
#[derive(Debug, Clone, Copy)]
pub struct NativeSystem {
    enable_debug_privilege: bool,
}

impl NativeSystem {
    /// Native system that attempts SeDebugPrivilege before opening processes
    pub fn new() -> Self {
        NativeSystem {
            enable_debug_privilege: true,
        }
    }

    /// Native system configured from the session settings
    pub fn from_config(config: &Config) -> Self {
        NativeSystem {
            enable_debug_privilege: config.session.enable_debug_privilege,
        }
    }
}

impl Default for NativeSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessSystem for NativeSystem {
    fn list_processes(&self) -> MemoryResult<Vec<ProcessDescriptor>> {
        let processes = ProcessSnapshot::capture()?.collect::<MemoryResult<Vec<_>>>()?;
        trace!(count = processes.len(), "captured process snapshot");
        Ok(processes)
    }

    fn open(&self, pid: ProcessId) -> MemoryResult<Box<dyn ProcessAccessor>> {
        if self.enable_debug_privilege {
            ensure_debug_privilege();
        }
        Ok(Box::new(ProcessHandle::open_for_read(pid)?))
    }
}
