//! Process lookup, handles, and module resolution
//!
//! The OS-independent pieces (name matching, module resolution) work against
//! the [`ProcessSystem`] and [`ProcessAccessor`] traits. [`ProcessHandle`] is
//! the Windows accessor.

pub mod enumerator;
#[cfg(windows)]
pub mod handle;
pub mod modules;
pub mod system;

pub use enumerator::{validate_process_name, DuplicatePolicy, NameMatch, ProcessEnumerator};
#[cfg(windows)]
pub use handle::{ProcessAccess, ProcessHandle};
pub use modules::{ModuleResolver, MODULE_ENUMERATION_ATTEMPTS};
pub use system::{ProcessAccessor, ProcessSystem};
