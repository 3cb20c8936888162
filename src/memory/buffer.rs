//! Owned byte buffer returned by foreign memory reads

use crate::core::types::Address;
use std::fmt;
use std::ops::Deref;

/// Bytes copied out of another process, exactly as they were stored there
#[derive(Clone, PartialEq, Eq)]
pub struct MemoryBuffer {
    address: Address,
    data: Vec<u8>,
}

impl MemoryBuffer {
    pub(crate) fn new(address: Address, data: Vec<u8>) -> Self {
        MemoryBuffer { address, data }
    }

    /// Foreign address the bytes were copied from
    pub fn address(&self) -> Address {
        self.address
    }

    /// Number of bytes in the buffer
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false for buffers produced by a successful read
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Borrow the raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Take ownership of the raw bytes
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Interpret the first `N` bytes as a fixed-size array
    pub fn to_array<const N: usize>(&self) -> Option<[u8; N]> {
        self.data.get(..N)?.try_into().ok()
    }

    /// Lowercase hex rendering of the bytes
    pub fn to_hex(&self) -> String {
        hex::encode(&self.data)
    }
}

impl Deref for MemoryBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}

impl AsRef<[u8]> for MemoryBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl From<MemoryBuffer> for Vec<u8> {
    fn from(buffer: MemoryBuffer) -> Self {
        buffer.data
    }
}

impl fmt::Debug for MemoryBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryBuffer")
            .field("address", &format_args!("{}", self.address))
            .field("len", &self.data.len())
            .finish()
    }
}
