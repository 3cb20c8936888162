//! Process and module descriptor types

use super::{Address, ProcessId};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One entry of a running-process snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessDescriptor {
    pub name: String,
    pub pid: ProcessId,
}

impl ProcessDescriptor {
    /// Creates a new descriptor
    pub fn new(name: impl Into<String>, pid: ProcessId) -> Self {
        ProcessDescriptor {
            name: name.into(),
            pid,
        }
    }
}

/// A module loaded into a foreign process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRecord {
    pub name: String,
    pub path: Option<PathBuf>,
    pub base_address: Address,
    pub size: usize,
}

impl ModuleRecord {
    /// Creates a new record without a path
    pub fn new(name: impl Into<String>, base_address: Address, size: usize) -> Self {
        ModuleRecord {
            name: name.into(),
            path: None,
            base_address,
            size,
        }
    }

    /// Attaches the full image path
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Bare file name of the module, extension included
    ///
    /// Falls back to the last path component of `name` when the loader reported
    /// a full path as the module name.
    pub fn file_name(&self) -> &str {
        bare_file_name(&self.name)
    }
}

/// Strips any directory components, accepting both `\` and `/` separators
pub fn bare_file_name(name: &str) -> &str {
    let trimmed = name.trim_end_matches(['\\', '/']);
    trimmed
        .rsplit(['\\', '/'])
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or(trimmed)
}
