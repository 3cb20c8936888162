//! Module base resolution over an open process

use crate::core::types::{
    bare_file_name, Address, ErrorKind, MemoryError, MemoryResult, ModuleRecord,
};
use crate::process::system::ProcessAccessor;
use tracing::{debug, warn};

/// A failed module enumeration is retried once before giving up
pub const MODULE_ENUMERATION_ATTEMPTS: u32 = 2;

/// Resolves loaded modules of the process behind an accessor
pub struct ModuleResolver<'a> {
    accessor: &'a dyn ProcessAccessor,
}

impl<'a> ModuleResolver<'a> {
    /// Create a resolver bound to an open accessor
    pub fn new(accessor: &'a dyn ProcessAccessor) -> Self {
        ModuleResolver { accessor }
    }

    /// Enumerate loaded modules, retrying one transient failure
    pub fn enumerate(&self) -> MemoryResult<Vec<ModuleRecord>> {
        let mut attempt = 1;
        loop {
            match self.accessor.modules() {
                Ok(modules) => {
                    debug!(
                        pid = self.accessor.pid(),
                        count = modules.len(),
                        "enumerated modules"
                    );
                    return Ok(modules);
                }
                Err(err) if !is_transient(&err) => return Err(err),
                Err(err) if attempt < MODULE_ENUMERATION_ATTEMPTS => {
                    warn!(
                        pid = self.accessor.pid(),
                        attempt,
                        error = %err,
                        "module enumeration failed, retrying"
                    );
                    attempt += 1;
                }
                Err(err) => {
                    return Err(MemoryError::EnumerationFailed {
                        attempts: attempt,
                        reason: err.to_string(),
                    })
                }
            }
        }
    }

    /// Find the first module whose bare file name matches, ignoring case
    pub fn find(&self, module_name: &str) -> MemoryResult<ModuleRecord> {
        let wanted = normalize_module_name(module_name)?;
        self.enumerate()?
            .into_iter()
            .find(|module| module.file_name().to_lowercase() == wanted)
            .ok_or_else(|| MemoryError::ModuleNotFound(module_name.to_string()))
    }

    /// Base virtual address of the named module
    pub fn resolve_base(&self, module_name: &str) -> MemoryResult<Address> {
        let module = self.find(module_name)?;
        debug!(
            pid = self.accessor.pid(),
            module = %module.name,
            base = %module.base_address,
            "resolved module base"
        );
        Ok(module.base_address)
    }
}

/// Validates a module query and reduces it to a lowercase bare file name
fn normalize_module_name(module_name: &str) -> MemoryResult<String> {
    let bare = bare_file_name(module_name.trim());
    if bare.is_empty() {
        return Err(MemoryError::invalid_argument(
            "module name must be a non-empty string",
        ));
    }
    Ok(bare.to_lowercase())
}

fn is_transient(err: &MemoryError) -> bool {
    !matches!(
        err.kind(),
        ErrorKind::AccessDenied | ErrorKind::Revoked | ErrorKind::InvalidArgument
    )
}
