//! PSAPI.dll bindings for module enumeration

use crate::windows::utils::{wide_to_string, ErrorCode};
use std::mem;
use std::ptr;
use winapi::shared::minwindef::{DWORD, FALSE, HMODULE, MAX_PATH};
use winapi::um::psapi::{
    EnumProcessModulesEx, GetModuleBaseNameW, GetModuleFileNameExW, GetModuleInformation,
    LIST_MODULES_ALL, MODULEINFO,
};
use winapi::um::winnt::HANDLE;

/// Initial module slot count; grown when the process has more
const INITIAL_MODULE_SLOTS: usize = 256;

/// Upper bound on module slots so a racing loader cannot grow the buffer forever
const MAX_MODULE_SLOTS: usize = 16 * 1024;

/// Long enough for `\\?\` prefixed paths
const MAX_LONG_PATH: usize = 32 * 1024;

/// Wrapper for EnumProcessModulesEx covering 32 and 64 bit modules
///
/// # Safety
/// The handle must be a valid process handle opened with
/// `PROCESS_QUERY_INFORMATION | PROCESS_VM_READ`
pub unsafe fn enum_process_modules(handle: HANDLE) -> Result<Vec<HMODULE>, ErrorCode> {
    let mut modules: Vec<HMODULE> = vec![ptr::null_mut(); INITIAL_MODULE_SLOTS];

    loop {
        let capacity = (modules.len() * mem::size_of::<HMODULE>()) as DWORD;
        let mut bytes_needed: DWORD = 0;

        let result = EnumProcessModulesEx(
            handle,
            modules.as_mut_ptr(),
            capacity,
            &mut bytes_needed,
            LIST_MODULES_ALL,
        );
        if result == FALSE {
            return Err(ErrorCode::last_error());
        }

        let count = bytes_needed as usize / mem::size_of::<HMODULE>();
        if count <= modules.len() {
            modules.truncate(count);
            return Ok(modules);
        }
        if count > MAX_MODULE_SLOTS {
            return Err(ErrorCode::InsufficientBuffer);
        }
        // Leave headroom for modules loaded between the two calls.
        modules.resize(count + 32, ptr::null_mut());
    }
}

/// Wrapper for GetModuleInformation
///
/// # Safety
/// The handle must be a valid process handle and module must come from it
pub unsafe fn get_module_information(
    handle: HANDLE,
    module: HMODULE,
) -> Result<MODULEINFO, ErrorCode> {
    let mut info = MODULEINFO {
        lpBaseOfDll: ptr::null_mut(),
        SizeOfImage: 0,
        EntryPoint: ptr::null_mut(),
    };

    let result = GetModuleInformation(
        handle,
        module,
        &mut info,
        mem::size_of::<MODULEINFO>() as DWORD,
    );

    if result == FALSE {
        Err(ErrorCode::last_error())
    } else {
        Ok(info)
    }
}

/// Wrapper for GetModuleBaseNameW
///
/// # Safety
/// The handle must be a valid process handle and module must come from it
pub unsafe fn get_module_base_name(handle: HANDLE, module: HMODULE) -> Result<String, ErrorCode> {
    let mut buffer = vec![0u16; MAX_PATH];
    let length = GetModuleBaseNameW(handle, module, buffer.as_mut_ptr(), buffer.len() as DWORD);

    if length == 0 {
        return Err(ErrorCode::last_error());
    }

    buffer.truncate(length as usize);
    Ok(wide_to_string(&buffer))
}

/// Wrapper for GetModuleFileNameExW
///
/// # Safety
/// The handle must be a valid process handle and module must come from it
pub unsafe fn get_module_file_name(handle: HANDLE, module: HMODULE) -> Result<String, ErrorCode> {
    let mut buffer = vec![0u16; MAX_LONG_PATH];
    let length = GetModuleFileNameExW(handle, module, buffer.as_mut_ptr(), buffer.len() as DWORD);

    if length == 0 {
        return Err(ErrorCode::last_error());
    }

    buffer.truncate(length as usize);
    Ok(wide_to_string(&buffer))
}
