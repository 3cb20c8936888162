//! Default configuration values

use crate::memory::DEFAULT_MAX_READ_SIZE;
use crate::process::{DuplicatePolicy, NameMatch};

/// Default values applied to every missing configuration field
pub struct ConfigDefaults;

impl ConfigDefaults {
    pub const NAME_MATCH: NameMatch = NameMatch::Exact;
    pub const ON_DUPLICATE: DuplicatePolicy = DuplicatePolicy::First;
    pub const ENABLE_DEBUG_PRIVILEGE: bool = true;
    pub const MAX_READ_SIZE: usize = DEFAULT_MAX_READ_SIZE;
    /// Upper bound accepted by the validator (256 MiB)
    pub const MAX_READ_SIZE_LIMIT: usize = crate::memory::MAX_READ_SIZE_LIMIT;
    pub const LOG_LEVEL: &'static str = "info";
    pub const CONFIG_FILE: &'static str = "procpeek.toml";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_defaults() {
        assert_eq!(ConfigDefaults::NAME_MATCH, NameMatch::Exact);
        assert_eq!(ConfigDefaults::ON_DUPLICATE, DuplicatePolicy::First);
        assert!(ConfigDefaults::ENABLE_DEBUG_PRIVILEGE);
    }

    #[test]
    fn test_memory_defaults() {
        assert_eq!(ConfigDefaults::MAX_READ_SIZE, 10485760);
        assert!(ConfigDefaults::MAX_READ_SIZE <= ConfigDefaults::MAX_READ_SIZE_LIMIT);
    }

    #[test]
    fn test_logging_defaults() {
        assert_eq!(ConfigDefaults::LOG_LEVEL, "info");
    }
}
