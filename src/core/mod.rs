//! Core module containing fundamental types shared across the crate

pub mod types;

pub use types::{
    Address, ErrorKind, MemoryError, MemoryResult, ModuleRecord, ProcessDescriptor, ProcessId,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(not(target_pointer_width = "64"))]
compile_error!("procpeek requires a 64-bit target");
