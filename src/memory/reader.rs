//! Bounded cross-process reads with strict length semantics

use crate::core::types::{Address, MemoryError, MemoryResult};
use crate::memory::buffer::MemoryBuffer;
use crate::process::system::ProcessAccessor;
use tracing::debug;

/// Largest single read accepted unless configured otherwise (10 MiB)
pub const DEFAULT_MAX_READ_SIZE: usize = 10 * 1024 * 1024;

/// Hard ceiling on any configured read size (256 MiB)
pub const MAX_READ_SIZE_LIMIT: usize = 256 * 1024 * 1024;

/// Copies byte ranges out of the process behind an accessor
pub struct MemoryReader<'a> {
    accessor: &'a dyn ProcessAccessor,
    max_read_size: usize,
}

impl<'a> MemoryReader<'a> {
    /// Create a reader with the default size limit
    pub fn new(accessor: &'a dyn ProcessAccessor) -> Self {
        MemoryReader {
            accessor,
            max_read_size: DEFAULT_MAX_READ_SIZE,
        }
    }

    /// Override the largest accepted read, capped at [`MAX_READ_SIZE_LIMIT`]
    pub fn with_max_read_size(mut self, max_read_size: usize) -> Self {
        self.max_read_size = max_read_size.min(MAX_READ_SIZE_LIMIT);
        self
    }

    /// Check a request without touching the target process
    pub fn validate(&self, address: Address, length: usize) -> MemoryResult<()> {
        if length == 0 {
            return Err(MemoryError::invalid_argument(
                "length must be greater than zero",
            ));
        }
        if length > self.max_read_size {
            return Err(MemoryError::invalid_argument(format!(
                "length {} exceeds the maximum read size of {} bytes",
                length, self.max_read_size
            )));
        }
        address.range_end(length)?;
        Ok(())
    }

    /// Read exactly `length` bytes starting at `address`
    ///
    /// Never truncates or pads: a short copy is `PartialRead` and an
    /// unreadable start is `AccessViolation`.
    pub fn read(&self, address: Address, length: usize) -> MemoryResult<MemoryBuffer> {
        self.validate(address, length)?;

        let mut data = vec![0u8; length];
        let copied = self.accessor.read_into(address, &mut data)?;
        debug!(
            pid = self.accessor.pid(),
            %address,
            requested = length,
            copied,
            "read process memory"
        );

        match copied {
            0 => Err(MemoryError::access_violation(address, length)),
            n if n < length => Err(MemoryError::partial_read(address, length, n)),
            _ => Ok(MemoryBuffer::new(address, data)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{ErrorKind, ModuleRecord, ProcessId};
    use proptest::prelude::*;
    use std::cell::Cell;

    /// One readable window of bytes in an otherwise unmapped address space
    struct Window {
        base: usize,
        bytes: Vec<u8>,
        reads: Cell<usize>,
    }

    impl Window {
        fn new(base: usize, len: usize) -> Self {
            Window {
                base,
                bytes: (0..len).map(|i| (i % 251) as u8).collect(),
                reads: Cell::new(0),
            }
        }
    }

    impl ProcessAccessor for Window {
        fn pid(&self) -> ProcessId {
            99
        }

        fn is_open(&self) -> bool {
            true
        }

        fn modules(&self) -> MemoryResult<Vec<ModuleRecord>> {
            Ok(Vec::new())
        }

        fn read_into(&self, address: Address, buffer: &mut [u8]) -> MemoryResult<usize> {
            self.reads.set(self.reads.get() + 1);
            let start = address.as_usize();
            let end = self.base + self.bytes.len();
            if start < self.base || start >= end {
                return Err(MemoryError::access_violation(address, buffer.len()));
            }
            let available = (end - start).min(buffer.len());
            let offset = start - self.base;
            buffer[..available].copy_from_slice(&self.bytes[offset..offset + available]);
            Ok(available)
        }

        fn close(&mut self) -> MemoryResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_read_exact_bytes() {
        let window = Window::new(0x1000, 64);
        let buffer = MemoryReader::new(&window)
            .read(Address::new(0x1004), 4)
            .unwrap();
        assert_eq!(buffer.as_bytes(), &[4, 5, 6, 7]);
        assert_eq!(buffer.address(), Address::new(0x1004));
    }

    #[test]
    fn test_zero_length_rejected_before_os_call() {
        let window = Window::new(0x1000, 64);
        let err = MemoryReader::new(&window)
            .read(Address::new(0x1000), 0)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(window.reads.get(), 0);
    }

    #[test]
    fn test_oversized_read_rejected() {
        let window = Window::new(0x1000, 64);
        let reader = MemoryReader::new(&window).with_max_read_size(32);
        assert!(reader.read(Address::new(0x1000), 32).is_ok());
        let err = reader.read(Address::new(0x1000), 33).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(window.reads.get(), 1);
    }

    #[test]
    fn test_unbounded_limit_is_capped() {
        let window = Window::new(0x1000, 64);
        let reader = MemoryReader::new(&window).with_max_read_size(usize::MAX);
        let err = reader.read(Address::new(0x10), usize::MAX - 0x10).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        let err = reader
            .read(Address::new(0x1000), MAX_READ_SIZE_LIMIT + 1)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(window.reads.get(), 0);
    }

    #[test]
    fn test_wrapping_range_rejected() {
        let window = Window::new(0x1000, 64);
        let err = MemoryReader::new(&window)
            .read(Address::new(usize::MAX - 1), 4)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(window.reads.get(), 0);
    }

    #[test]
    fn test_straddling_read_is_partial() {
        let window = Window::new(0x1000, 64);
        let err = MemoryReader::new(&window)
            .read(Address::new(0x1000 + 60), 8)
            .unwrap_err();
        match err {
            MemoryError::PartialRead {
                requested, copied, ..
            } => {
                assert_eq!(requested, 8);
                assert_eq!(copied, 4);
            }
            other => panic!("Expected PartialRead, got {other:?}"),
        }
    }

    #[test]
    fn test_unmapped_read_is_access_violation() {
        let window = Window::new(0x1000, 64);
        let err = MemoryReader::new(&window)
            .read(Address::new(0x10), 4)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AccessViolation);
    }

    proptest! {
        #[test]
        fn prop_reads_inside_window_return_exact_bytes(offset in 0usize..256, len in 1usize..256) {
            let window = Window::new(0x4000, 512);
            let buffer = MemoryReader::new(&window)
                .read(Address::new(0x4000 + offset), len)
                .unwrap();
            prop_assert_eq!(buffer.len(), len);
            prop_assert_eq!(buffer.as_bytes(), &window.bytes[offset..offset + len]);
        }

        #[test]
        fn prop_reads_past_window_never_truncate(offset in 0usize..512, len in 1usize..1024) {
            prop_assume!(offset + len > 512);
            let window = Window::new(0x4000, 512);
            let err = MemoryReader::new(&window)
                .read(Address::new(0x4000 + offset), len)
                .unwrap_err();
            prop_assert_eq!(err.kind(), ErrorKind::PartialRead);
        }
    }
}
