//! Windows API layer
//!
//! Safe wrappers around the Windows process and module APIs. All unsafe FFI
//! calls are contained within this module.

pub mod bindings;
pub mod privilege;
pub mod system;
pub mod types;
pub mod utils;

pub use system::NativeSystem;
pub use types::Handle;
pub use utils::{ErrorCode, WinError};
