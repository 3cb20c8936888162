//! Error types for scoped process access

use std::fmt;
use thiserror::Error;

/// Main error type for process and memory operations
#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Process not found: {0}")]
    ProcessNotFound(String),

    #[error("Process {pid} exited before it could be opened")]
    ProcessExited { pid: u32 },

    #[error("Process name {name} is ambiguous: {count} processes match")]
    AmbiguousProcess { name: String, count: usize },

    #[error("Access denied to process {pid}: {reason}")]
    AccessDenied { pid: u32, reason: String },

    #[error("Module not found: {0}")]
    ModuleNotFound(String),

    #[error("Module enumeration failed after {attempts} attempts: {reason}")]
    EnumerationFailed { attempts: u32, reason: String },

    #[error("Partial read at {address}: requested {requested} bytes, copied {copied}")]
    PartialRead {
        address: String,
        requested: usize,
        copied: usize,
    },

    #[error("Access violation reading {length} bytes at {address}")]
    AccessViolation { address: String, length: usize },

    #[error("Capability has been revoked")]
    Revoked,

    #[error("Session is closed and cannot be reused")]
    SessionClosed,

    #[error("Windows API: {0}")]
    WindowsApi(String),
}

/// Result type alias for process and memory operations
pub type MemoryResult<T> = Result<T, MemoryError>;

/// Coarse classification of a [`MemoryError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    AccessDenied,
    ModuleNotFound,
    EnumerationFailed,
    PartialRead,
    AccessViolation,
    Revoked,
    Platform,
}

impl MemoryError {
    /// Classifies the error
    ///
    /// `ProcessNotFound` and `ProcessExited` share the `NotFound` kind but stay
    /// distinct variants so callers can tell a lookup miss from the exit race.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MemoryError::InvalidArgument(_)
            | MemoryError::AmbiguousProcess { .. }
            | MemoryError::SessionClosed => ErrorKind::InvalidArgument,
            MemoryError::ProcessNotFound(_) | MemoryError::ProcessExited { .. } => {
                ErrorKind::NotFound
            }
            MemoryError::AccessDenied { .. } => ErrorKind::AccessDenied,
            MemoryError::ModuleNotFound(_) => ErrorKind::ModuleNotFound,
            MemoryError::EnumerationFailed { .. } => ErrorKind::EnumerationFailed,
            MemoryError::PartialRead { .. } => ErrorKind::PartialRead,
            MemoryError::AccessViolation { .. } => ErrorKind::AccessViolation,
            MemoryError::Revoked => ErrorKind::Revoked,
            MemoryError::WindowsApi(_) => ErrorKind::Platform,
        }
    }

    /// Creates an invalid argument error
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        MemoryError::InvalidArgument(reason.into())
    }

    /// Creates an access denied error for a process
    pub fn access_denied(pid: u32, reason: impl Into<String>) -> Self {
        MemoryError::AccessDenied {
            pid,
            reason: reason.into(),
        }
    }

    /// Creates a partial read error
    pub fn partial_read(address: impl fmt::Display, requested: usize, copied: usize) -> Self {
        MemoryError::PartialRead {
            address: address.to_string(),
            requested,
            copied,
        }
    }

    /// Creates an access violation error
    pub fn access_violation(address: impl fmt::Display, length: usize) -> Self {
        MemoryError::AccessViolation {
            address: address.to_string(),
            length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MemoryError::InvalidArgument("length must be greater than zero".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid argument: length must be greater than zero"
        );

        let err = MemoryError::access_denied(1234, "OpenProcess refused");
        assert_eq!(
            err.to_string(),
            "Access denied to process 1234: OpenProcess refused"
        );

        let err = MemoryError::partial_read("0x1000", 8, 3);
        assert_eq!(
            err.to_string(),
            "Partial read at 0x1000: requested 8 bytes, copied 3"
        );

        let err = MemoryError::ProcessExited { pid: 77 };
        assert_eq!(
            err.to_string(),
            "Process 77 exited before it could be opened"
        );
    }

    #[test]
    fn test_error_kinds() {
        let cases: Vec<(MemoryError, ErrorKind)> = vec![
            (
                MemoryError::invalid_argument("empty"),
                ErrorKind::InvalidArgument,
            ),
            (
                MemoryError::ProcessNotFound("a.exe".to_string()),
                ErrorKind::NotFound,
            ),
            (MemoryError::ProcessExited { pid: 5 }, ErrorKind::NotFound),
            (
                MemoryError::access_denied(5, "denied"),
                ErrorKind::AccessDenied,
            ),
            (
                MemoryError::ModuleNotFound("x.dll".to_string()),
                ErrorKind::ModuleNotFound,
            ),
            (
                MemoryError::EnumerationFailed {
                    attempts: 2,
                    reason: "partial copy".to_string(),
                },
                ErrorKind::EnumerationFailed,
            ),
            (
                MemoryError::partial_read("0x10", 4, 2),
                ErrorKind::PartialRead,
            ),
            (
                MemoryError::access_violation("0x10", 4),
                ErrorKind::AccessViolation,
            ),
            (MemoryError::Revoked, ErrorKind::Revoked),
            (MemoryError::SessionClosed, ErrorKind::InvalidArgument),
            (
                MemoryError::WindowsApi("CloseHandle".to_string()),
                ErrorKind::Platform,
            ),
        ];

        for (error, kind) in cases {
            assert_eq!(error.kind(), kind, "{error}");
        }
    }

    #[test]
    fn test_exit_race_is_distinct_from_lookup_miss() {
        let missing = MemoryError::ProcessNotFound("game.exe".to_string());
        let exited = MemoryError::ProcessExited { pid: 42 };
        assert_eq!(missing.kind(), exited.kind());
        assert!(matches!(exited, MemoryError::ProcessExited { pid: 42 }));
        assert!(!matches!(missing, MemoryError::ProcessExited { .. }));
    }
}
