//! Process lookup by executable name over a snapshot

use crate::core::types::{MemoryError, MemoryResult, ProcessDescriptor};
use crate::process::system::ProcessSystem;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How a requested name is compared with executable names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameMatch {
    /// Byte-for-byte comparison
    #[default]
    Exact,
    /// Comparison ignoring ASCII and Unicode case
    IgnoreCase,
}

impl NameMatch {
    /// Checks if `candidate` matches `wanted` under this policy
    pub fn matches(&self, candidate: &str, wanted: &str) -> bool {
        match self {
            NameMatch::Exact => candidate == wanted,
            NameMatch::IgnoreCase => candidate.to_lowercase() == wanted.to_lowercase(),
        }
    }
}

/// What to do when several running processes share the requested name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Take the first match in snapshot order
    #[default]
    First,
    /// Fail with `AmbiguousProcess`
    Reject,
}

/// Resolves process names against fresh snapshots of a [`ProcessSystem`]
pub struct ProcessEnumerator<'a> {
    system: &'a dyn ProcessSystem,
    name_match: NameMatch,
    duplicates: DuplicatePolicy,
}

impl<'a> ProcessEnumerator<'a> {
    /// Create an enumerator with the default matching policies
    pub fn new(system: &'a dyn ProcessSystem) -> Self {
        ProcessEnumerator {
            system,
            name_match: NameMatch::default(),
            duplicates: DuplicatePolicy::default(),
        }
    }

    /// Set the name comparison policy
    pub fn with_name_match(mut self, name_match: NameMatch) -> Self {
        self.name_match = name_match;
        self
    }

    /// Set the duplicate-name policy
    pub fn with_duplicates(mut self, duplicates: DuplicatePolicy) -> Self {
        self.duplicates = duplicates;
        self
    }

    /// Fresh snapshot of all running processes
    pub fn list_processes(&self) -> MemoryResult<Vec<ProcessDescriptor>> {
        self.system.list_processes()
    }

    /// Names of all running processes, in snapshot order
    pub fn list_names(&self) -> MemoryResult<Vec<String>> {
        Ok(self
            .list_processes()?
            .into_iter()
            .map(|process| process.name)
            .collect())
    }

    /// Every process whose name matches, in snapshot order
    pub fn find_all_by_name(&self, name: &str) -> MemoryResult<Vec<ProcessDescriptor>> {
        validate_process_name(name)?;
        let matches: Vec<ProcessDescriptor> = self
            .list_processes()?
            .into_iter()
            .filter(|process| self.name_match.matches(&process.name, name))
            .collect();
        debug!(name, count = matches.len(), "matched processes by name");
        Ok(matches)
    }

    /// The single process selected for `name` under the duplicate policy
    pub fn find_by_name(&self, name: &str) -> MemoryResult<ProcessDescriptor> {
        let mut matches = self.find_all_by_name(name)?;
        match (matches.len(), self.duplicates) {
            (0, _) => Err(MemoryError::ProcessNotFound(name.to_string())),
            (1, _) | (_, DuplicatePolicy::First) => Ok(matches.swap_remove(0)),
            (count, DuplicatePolicy::Reject) => Err(MemoryError::AmbiguousProcess {
                name: name.to_string(),
                count,
            }),
        }
    }
}

/// Rejects blank process names before any OS interaction
pub fn validate_process_name(name: &str) -> MemoryResult<()> {
    if name.trim().is_empty() {
        return Err(MemoryError::invalid_argument(
            "process name must be a non-empty string",
        ));
    }
    Ok(())
}
