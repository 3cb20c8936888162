//! Foreign virtual address wrapper with hex parsing and validation

use super::error::{MemoryError, MemoryResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A word-sized virtual address inside another process
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(pub usize);

impl Address {
    /// Creates a new address from a usize value
    pub const fn new(value: usize) -> Self {
        Address(value)
    }

    /// Creates a null address (0x0)
    pub const fn null() -> Self {
        Address(0)
    }

    /// Checks if the address is null
    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// Returns the raw usize value
    pub const fn as_usize(&self) -> usize {
        self.0
    }

    /// Adds a byte offset, failing instead of wrapping past the end of the address space
    pub fn checked_add(&self, offset: usize) -> MemoryResult<Self> {
        self.0.checked_add(offset).map(Address).ok_or_else(|| {
            MemoryError::invalid_argument(format!(
                "offset 0x{:X} from {} overflows the address space",
                offset, self
            ))
        })
    }

    /// Returns the exclusive end of a `length`-byte range starting here
    pub fn range_end(&self, length: usize) -> MemoryResult<Self> {
        self.checked_add(length)
    }
}

impl FromStr for Address {
    type Err = MemoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(MemoryError::invalid_argument("address is empty"));
        }
        if s.starts_with('-') {
            return Err(MemoryError::invalid_argument(format!(
                "address cannot be negative: {}",
                s
            )));
        }

        let value = if let Some(hex) = strip_hex_prefix(s) {
            usize::from_str_radix(hex, 16)
        } else if s.chars().any(|c| c.is_ascii_alphabetic()) {
            usize::from_str_radix(s, 16)
        } else {
            s.parse::<usize>()
        };

        value
            .map(Address::new)
            .map_err(|_| MemoryError::invalid_argument(format!("not a valid address: {}", s)))
    }
}

/// Digits after a `0x`, `0X` or `$` prefix
fn strip_hex_prefix(s: &str) -> Option<&str> {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .or_else(|| s.strip_prefix('$'))
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016X}", self.0)
    }
}

impl From<usize> for Address {
    fn from(value: usize) -> Self {
        Address::new(value)
    }
}

/// Parses a byte count given as decimal or `0x` / `$` prefixed hex text
pub fn parse_length(s: &str) -> MemoryResult<usize> {
    let s = s.trim();
    if s.starts_with('-') {
        return Err(MemoryError::invalid_argument(format!(
            "length cannot be negative: {}",
            s
        )));
    }
    let parsed = match strip_hex_prefix(s) {
        Some(hex) => usize::from_str_radix(hex, 16),
        None => s.parse::<usize>(),
    };
    match parsed {
        Ok(0) => Err(MemoryError::invalid_argument("length must be greater than zero")),
        Ok(length) => Ok(length),
        Err(_) => Err(MemoryError::invalid_argument(format!(
            "not a valid length: {}",
            s
        ))),
    }
}
