//! Reading raw bytes out of another process

pub mod buffer;
pub mod reader;

pub use buffer::MemoryBuffer;
pub use reader::{MemoryReader, DEFAULT_MAX_READ_SIZE, MAX_READ_SIZE_LIMIT};
