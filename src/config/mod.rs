//! Configuration module
//!
//! Provides configuration loading, validation, and default settings. The
//! session entry points never read a file on their own; callers load a
//! [`Config`] (usually through [`load_config`]) and pass it in.

mod defaults;
mod loader;
mod validator;

pub use defaults::ConfigDefaults;
pub use loader::{load_config, Config, ConfigError, ConfigLoader, LoggingConfig, MemoryConfig, SessionConfig};
pub use validator::{validate_config, ConfigValidator};
