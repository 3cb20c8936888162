//! SeDebugPrivilege handling
//!
//! Opening processes owned by other users or services usually needs
//! SeDebugPrivilege. Enabling it is best-effort: without it, sessions still
//! work against processes the caller already has rights to.

use crate::core::types::{MemoryError, MemoryResult};
use crate::windows::types::Handle;
use crate::windows::utils::{string_to_wide, ErrorCode, WinError};
use std::ptr;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};
use winapi::shared::minwindef::{DWORD, FALSE};
use winapi::um::processthreadsapi::{GetCurrentProcess, OpenProcessToken};
use winapi::um::securitybaseapi::AdjustTokenPrivileges;
use winapi::um::winbase::LookupPrivilegeValueW;
use winapi::um::winnt::{
    HANDLE, LUID, LUID_AND_ATTRIBUTES, SE_PRIVILEGE_ENABLED, TOKEN_ADJUST_PRIVILEGES,
    TOKEN_PRIVILEGES, TOKEN_QUERY,
};

static DEBUG_PRIVILEGE_ATTEMPTED: AtomicBool = AtomicBool::new(false);
static DEBUG_PRIVILEGE_ENABLED: AtomicBool = AtomicBool::new(false);

/// Whether an earlier call managed to enable SeDebugPrivilege
pub fn has_debug_privilege() -> bool {
    DEBUG_PRIVILEGE_ENABLED.load(Ordering::Relaxed)
}

/// Enable SeDebugPrivilege on the current process token
///
/// Fails with `AccessDenied` when the token does not hold the privilege at
/// all, which is the normal case for non-elevated callers.
pub fn enable_debug_privilege() -> MemoryResult<()> {
    let pid = std::process::id();
    let mut raw: HANDLE = ptr::null_mut();

    let opened = unsafe {
        OpenProcessToken(
            GetCurrentProcess(),
            TOKEN_ADJUST_PRIVILEGES | TOKEN_QUERY,
            &mut raw,
        )
    };
    if opened == FALSE {
        return Err(WinError::new("OpenProcessToken").to_memory_error());
    }
    let _token = Handle::new(raw);

    let mut luid = LUID {
        LowPart: 0,
        HighPart: 0,
    };
    let privilege_name = string_to_wide("SeDebugPrivilege");
    if unsafe { LookupPrivilegeValueW(ptr::null(), privilege_name.as_ptr(), &mut luid) } == FALSE {
        return Err(WinError::new("LookupPrivilegeValueW").to_memory_error());
    }

    let mut privileges = TOKEN_PRIVILEGES {
        PrivilegeCount: 1,
        Privileges: [LUID_AND_ATTRIBUTES {
            Luid: luid,
            Attributes: SE_PRIVILEGE_ENABLED,
        }],
    };

    let adjusted = unsafe {
        AdjustTokenPrivileges(
            raw,
            FALSE,
            &mut privileges,
            std::mem::size_of::<TOKEN_PRIVILEGES>() as DWORD,
            ptr::null_mut(),
            ptr::null_mut(),
        )
    };
    if adjusted == FALSE {
        return Err(WinError::new("AdjustTokenPrivileges").to_memory_error());
    }
    // AdjustTokenPrivileges succeeds even when nothing was assigned.
    if ErrorCode::last_error() == ErrorCode::NotAllAssigned {
        return Err(MemoryError::access_denied(
            pid,
            "token does not hold SeDebugPrivilege",
        ));
    }

    DEBUG_PRIVILEGE_ENABLED.store(true, Ordering::Relaxed);
    Ok(())
}

/// Try once per process to enable SeDebugPrivilege, logging the outcome
pub fn ensure_debug_privilege() {
    if DEBUG_PRIVILEGE_ATTEMPTED.swap(true, Ordering::AcqRel) {
        return;
    }
    match enable_debug_privilege() {
        Ok(()) => debug!("SeDebugPrivilege enabled"),
        Err(err) => warn!(error = %err, "could not enable SeDebugPrivilege, continuing without it"),
    }
}
