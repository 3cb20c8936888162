//! Scoped acquisition of a process with guaranteed release

use crate::config::Config;
use crate::core::types::{ErrorKind, MemoryError, MemoryResult, ProcessDescriptor};
use crate::memory::{DEFAULT_MAX_READ_SIZE, MAX_READ_SIZE_LIMIT};
use crate::process::{
    validate_process_name, DuplicatePolicy, NameMatch, ProcessEnumerator, ProcessSystem,
};
use crate::session::capability::Capability;
use std::fmt;
use std::ops::ControlFlow;
use tracing::{debug, info, warn};

/// Lifecycle of one scoped session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Resolving,
    Opening,
    Active,
    Revoking,
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Idle => "idle",
            SessionState::Resolving => "resolving",
            SessionState::Opening => "opening",
            SessionState::Active => "active",
            SessionState::Revoking => "revoking",
            SessionState::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Policies applied by a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub name_match: NameMatch,
    pub on_duplicate: DuplicatePolicy,
    pub max_read_size: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        SessionOptions {
            name_match: NameMatch::default(),
            on_duplicate: DuplicatePolicy::default(),
            max_read_size: DEFAULT_MAX_READ_SIZE,
        }
    }
}

impl SessionOptions {
    /// Rejects a read limit outside `1..=MAX_READ_SIZE_LIMIT`
    pub fn validate(&self) -> MemoryResult<()> {
        if self.max_read_size == 0 || self.max_read_size > MAX_READ_SIZE_LIMIT {
            return Err(MemoryError::invalid_argument(format!(
                "max read size {} must be between 1 and {} bytes",
                self.max_read_size, MAX_READ_SIZE_LIMIT
            )));
        }
        Ok(())
    }
}

impl From<&Config> for SessionOptions {
    fn from(config: &Config) -> Self {
        SessionOptions {
            name_match: config.session.name_match,
            on_duplicate: config.session.on_duplicate,
            max_read_size: config.memory.max_read_size,
        }
    }
}

/// One resolve → open → call back → revoke → close cycle
///
/// A session runs at most once. After it reaches [`SessionState::Closed`],
/// further calls to [`ScopedSession::run`] fail with `SessionClosed`.
pub struct ScopedSession<'a> {
    system: &'a dyn ProcessSystem,
    options: SessionOptions,
    state: SessionState,
}

impl<'a> ScopedSession<'a> {
    /// Create an idle session over `system`
    pub fn new(system: &'a dyn ProcessSystem, options: SessionOptions) -> Self {
        ScopedSession {
            system,
            options,
            state: SessionState::Idle,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Resolve `name`, open it, and run `callback` with a capability
    ///
    /// The capability is revoked and the handle closed before this returns,
    /// whether the callback succeeds, fails, or panics. Callback errors are
    /// returned only after teardown has finished.
    pub fn run<F, R, E>(&mut self, name: &str, callback: F) -> Result<R, E>
    where
        F: FnOnce(&Capability) -> Result<R, E>,
        E: From<MemoryError>,
    {
        if self.state != SessionState::Idle {
            return Err(MemoryError::SessionClosed.into());
        }
        if let Err(err) = self
            .options
            .validate()
            .and_then(|()| validate_process_name(name))
        {
            self.transition(SessionState::Closed);
            return Err(err.into());
        }

        let descriptor = self.resolve(name)?;
        let capability = self.open(&descriptor)?;
        self.invoke(capability, callback)
    }

    fn resolve(&mut self, name: &str) -> MemoryResult<ProcessDescriptor> {
        self.transition(SessionState::Resolving);
        let found = ProcessEnumerator::new(self.system)
            .with_name_match(self.options.name_match)
            .with_duplicates(self.options.on_duplicate)
            .find_by_name(name);
        if found.is_err() {
            self.transition(SessionState::Closed);
        }
        found
    }

    fn open(&mut self, descriptor: &ProcessDescriptor) -> MemoryResult<Capability> {
        self.transition(SessionState::Opening);
        match self.system.open(descriptor.pid) {
            Ok(accessor) => {
                let capability = Capability::bind(accessor, self.options.max_read_size);
                self.transition(SessionState::Active);
                info!(
                    process = %descriptor.name,
                    pid = descriptor.pid,
                    "process session active"
                );
                Ok(capability)
            }
            Err(err) => {
                debug!(pid = descriptor.pid, error = %err, "failed to open process");
                self.transition(SessionState::Closed);
                Err(err)
            }
        }
    }

    fn invoke<F, R, E>(&mut self, capability: Capability, callback: F) -> Result<R, E>
    where
        F: FnOnce(&Capability) -> Result<R, E>,
    {
        let mut teardown = Teardown {
            state: &mut self.state,
            capability: &capability,
            finished: false,
        };
        let outcome = callback(&capability);
        teardown.finish();
        outcome
    }

    fn transition(&mut self, next: SessionState) {
        debug!(from = %self.state, to = %next, "session state");
        self.state = next;
    }
}

/// Revokes the capability and closes its handle when the callback is done
///
/// Runs from `Drop` as well, so an unwinding callback still releases the handle.
struct Teardown<'s> {
    state: &'s mut SessionState,
    capability: &'s Capability,
    finished: bool,
}

impl Teardown<'_> {
    fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;

        debug!(from = %self.state, to = %SessionState::Revoking, "session state");
        *self.state = SessionState::Revoking;
        if let Some(mut accessor) = self.capability.revoke() {
            if let Err(err) = accessor.close() {
                warn!(pid = accessor.pid(), error = %err, "failed to close process handle");
            }
        }
        debug!(from = %self.state, to = %SessionState::Closed, "session state");
        *self.state = SessionState::Closed;
        info!(pid = self.capability.pid(), "process session closed");
    }
}

impl Drop for Teardown<'_> {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Run `callback` in a fresh session for every process matching `name`
///
/// Matches are visited in snapshot order, each with its own capability that is
/// revoked before the next one is opened. Returning `ControlFlow::Break` stops
/// the walk. Processes that cannot be opened because access is denied or they
/// already exited are skipped. Yields `Ok(None)` when every match was visited
/// and `ProcessNotFound` when nothing matched.
pub fn for_each_match<F, R, E>(
    system: &dyn ProcessSystem,
    options: &SessionOptions,
    name: &str,
    mut callback: F,
) -> Result<Option<R>, E>
where
    F: FnMut(&Capability) -> Result<ControlFlow<R>, E>,
    E: From<MemoryError>,
{
    options.validate()?;
    let matches = ProcessEnumerator::new(system)
        .with_name_match(options.name_match)
        .find_all_by_name(name)?;
    if matches.is_empty() {
        return Err(MemoryError::ProcessNotFound(name.to_string()).into());
    }

    for descriptor in &matches {
        let mut session = ScopedSession::new(system, options.clone());
        let capability = match session.open(descriptor) {
            Ok(capability) => capability,
            Err(err) if is_skippable(&err) => {
                debug!(pid = descriptor.pid, error = %err, "skipping process");
                continue;
            }
            Err(err) => return Err(err.into()),
        };
        if let ControlFlow::Break(value) = session.invoke(capability, &mut callback)? {
            return Ok(Some(value));
        }
    }
    Ok(None)
}

fn is_skippable(err: &MemoryError) -> bool {
    matches!(err.kind(), ErrorKind::AccessDenied | ErrorKind::NotFound)
}
