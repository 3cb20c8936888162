//! Revocable capability handed to session callbacks

use crate::core::types::{Address, MemoryError, MemoryResult, ModuleRecord, ProcessId};
use crate::memory::{MemoryBuffer, MemoryReader};
use crate::process::{ModuleResolver, ProcessAccessor};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

enum CapabilityState {
    Active {
        accessor: Box<dyn ProcessAccessor>,
        max_read_size: usize,
    },
    Revoked,
}

/// Module resolution and memory reads bound to one open process
///
/// Clones share the same state slot. Once the owning session tears down, the
/// slot is switched to revoked and every operation on every clone fails with
/// [`MemoryError::Revoked`]. The type is `!Send`, so it cannot leave the
/// thread that ran the session.
#[derive(Clone)]
pub struct Capability {
    pid: ProcessId,
    state: Rc<RefCell<CapabilityState>>,
}

impl Capability {
    pub(crate) fn bind(accessor: Box<dyn ProcessAccessor>, max_read_size: usize) -> Self {
        Capability {
            pid: accessor.pid(),
            state: Rc::new(RefCell::new(CapabilityState::Active {
                accessor,
                max_read_size,
            })),
        }
    }

    /// Process this capability was issued for
    pub fn pid(&self) -> ProcessId {
        self.pid
    }

    /// Whether the owning session has ended
    pub fn is_revoked(&self) -> bool {
        matches!(*self.state.borrow(), CapabilityState::Revoked)
    }

    /// Base virtual address of a loaded module, matched by file name ignoring case
    pub fn resolve_module_base(&self, module_name: &str) -> MemoryResult<Address> {
        self.with_accessor(|accessor, _| ModuleResolver::new(accessor).resolve_base(module_name))
    }

    /// Full record of a loaded module, matched like [`Self::resolve_module_base`]
    pub fn find_module(&self, module_name: &str) -> MemoryResult<ModuleRecord> {
        self.with_accessor(|accessor, _| ModuleResolver::new(accessor).find(module_name))
    }

    /// All modules currently loaded in the process
    pub fn modules(&self) -> MemoryResult<Vec<ModuleRecord>> {
        self.with_accessor(|accessor, _| ModuleResolver::new(accessor).enumerate())
    }

    /// Copy exactly `length` bytes starting at `address`
    pub fn read_memory(&self, address: Address, length: usize) -> MemoryResult<MemoryBuffer> {
        self.with_accessor(|accessor, max_read_size| {
            MemoryReader::new(accessor)
                .with_max_read_size(max_read_size)
                .read(address, length)
        })
    }

    fn with_accessor<T>(
        &self,
        op: impl FnOnce(&dyn ProcessAccessor, usize) -> MemoryResult<T>,
    ) -> MemoryResult<T> {
        let state = self.state.try_borrow().map_err(|_| MemoryError::Revoked)?;
        match &*state {
            CapabilityState::Active {
                accessor,
                max_read_size,
            } => op(accessor.as_ref(), *max_read_size),
            CapabilityState::Revoked => Err(MemoryError::Revoked),
        }
    }

    /// Switch every clone to revoked and hand back the accessor for closing
    ///
    /// Returns `None` if the capability was already revoked.
    pub(crate) fn revoke(&self) -> Option<Box<dyn ProcessAccessor>> {
        match self.state.replace(CapabilityState::Revoked) {
            CapabilityState::Active { accessor, .. } => Some(accessor),
            CapabilityState::Revoked => None,
        }
    }
}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capability")
            .field("pid", &self.pid)
            .field("revoked", &self.is_revoked())
            .finish()
    }
}
