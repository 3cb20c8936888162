//! Windows API bindings
//!
//! Thin FFI wrappers over the system libraries. Everything here reports raw
//! Windows error codes or `MemoryError::WindowsApi`; classification into the
//! process error taxonomy happens one layer up.

pub mod kernel32;
pub mod psapi;
pub mod toolhelp;

pub use toolhelp::ProcessSnapshot;
