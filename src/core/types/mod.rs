//! Core type definitions
//!
//! Address wrapper, process and module descriptors, and the error taxonomy
//! shared by every layer of the crate.

mod address;
mod error;
mod process_info;

pub use address::{parse_length, Address};
pub use error::{ErrorKind, MemoryError, MemoryResult};
pub use process_info::{bare_file_name, ModuleRecord, ProcessDescriptor};

pub type ProcessId = u32;
