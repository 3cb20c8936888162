//! Scoped, revocable access to a running process
//!
//! [`ScopedSession`] resolves a process by name, opens a read-only handle,
//! hands the callback a [`Capability`], and revokes that capability and
//! closes the handle on every exit path. The free functions in this module
//! run sessions against the native Windows process facilities.

mod capability;
mod scoped;

pub use capability::Capability;
pub use scoped::{for_each_match, ScopedSession, SessionOptions, SessionState};

#[cfg(windows)]
mod native {
    use super::{for_each_match, Capability, ScopedSession, SessionOptions};
    use crate::config::Config;
    use crate::core::types::{MemoryError, MemoryResult};
    use crate::process::ProcessEnumerator;
    use crate::windows::NativeSystem;
    use std::ops::ControlFlow;

    /// Run `callback` against the first process named `name`, with default settings
    ///
    /// ```no_run
    /// use procpeek::{with_process, MemoryResult};
    ///
    /// let base = with_process("notepad.exe", |process| -> MemoryResult<_> {
    ///     process.resolve_module_base("ntdll.dll")
    /// })?;
    /// println!("ntdll.dll is mapped at {}", base);
    /// # Ok::<(), procpeek::MemoryError>(())
    /// ```
    pub fn with_process<F, R, E>(name: &str, callback: F) -> Result<R, E>
    where
        F: FnOnce(&Capability) -> Result<R, E>,
        E: From<MemoryError>,
    {
        with_process_config(name, &Config::default(), callback)
    }

    /// Like [`with_process`], with explicit settings
    pub fn with_process_config<F, R, E>(name: &str, config: &Config, callback: F) -> Result<R, E>
    where
        F: FnOnce(&Capability) -> Result<R, E>,
        E: From<MemoryError>,
    {
        let system = NativeSystem::from_config(config);
        ScopedSession::new(&system, SessionOptions::from(config)).run(name, callback)
    }

    /// Visit every process named `name`, each in its own session
    pub fn with_each_process<F, R, E>(name: &str, config: &Config, callback: F) -> Result<Option<R>, E>
    where
        F: FnMut(&Capability) -> Result<ControlFlow<R>, E>,
        E: From<MemoryError>,
    {
        let system = NativeSystem::from_config(config);
        for_each_match(&system, &SessionOptions::from(config), name, callback)
    }

    /// Names of all running processes
    pub fn list_running_process_names() -> MemoryResult<Vec<String>> {
        ProcessEnumerator::new(&NativeSystem::new()).list_names()
    }
}

#[cfg(windows)]
pub use native::{list_running_process_names, with_each_process, with_process, with_process_config};
