//! C ABI over the process-wide state.
//!
//! Every function returns a status code: zero or positive on success, one of
//! the negative [`Status`] values on failure.

use crate::error::{Status, StringError};
use crate::features::Feature;
use crate::global::{cpu_info, initialize};
use crate::strings::FixedString;
use core::ffi::{CStr, c_char};

/// Probe the processor. Safe to call more than once.
#[unsafe(no_mangle)]
pub extern "C" fn cpuinfo_initialize() -> i32 {
    match initialize() {
        Ok(_) => Status::SUCCESS.code(),
        Err(err) => err.status().code(),
    }
}

/// Copy the NUL-terminated vendor string into `dest`, which holds `size` bytes.
///
/// # Safety
/// `dest` must be null or valid for writes of `size` bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn cpuinfo_get_vendor_string(dest: *mut c_char, size: usize) -> i32 {
    unsafe { copy_out(cpu_info().vendor_string(), dest, size) }
}

/// Copy the NUL-terminated brand string into `dest`, which holds `size` bytes.
///
/// # Safety
/// `dest` must be null or valid for writes of `size` bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn cpuinfo_get_brand_string(dest: *mut c_char, size: usize) -> i32 {
    unsafe { copy_out(cpu_info().brand_string(), dest, size) }
}

/// `1` if the named feature is supported, `0` if not.
///
/// Unknown names yield [`Status::INVALID`], a null `name` [`Status::NULLPARAM`].
///
/// # Safety
/// `name` must be null or point to a NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn cpuinfo_has_feature(name: *const c_char) -> i32 {
    if name.is_null() {
        return StringError::InvalidArgument.status().code();
    }

    let name = unsafe { CStr::from_ptr(name) };
    let Some(feature) = name.to_str().ok().and_then(Feature::from_name) else {
        return Status::INVALID.code();
    };
    i32::from(cpu_info().has(feature))
}

unsafe fn copy_out<const N: usize>(src: &FixedString<N>, dest: *mut c_char, size: usize) -> i32 {
    if dest.is_null() {
        return StringError::InvalidArgument.status().code();
    }

    let dest = unsafe { core::slice::from_raw_parts_mut(dest.cast::<u8>(), size) };
    match src.copy_to(dest) {
        Ok(len) => i32::try_from(len).unwrap_or(i32::MAX),
        Err(err) => err.status().code(),
    }
}
