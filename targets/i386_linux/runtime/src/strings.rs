use core::ffi::{c_char, c_int, CStr};

/// Borrows the bytes of a NUL-terminated string, without the terminator.
///
/// # Safety
///
/// `ptr` must be null or point to a NUL-terminated byte sequence that stays
/// alive and unmodified for `'a`.
pub unsafe fn c_string_bytes<'a>(ptr: *const c_char) -> Option<&'a [u8]> {
    if ptr.is_null() {
        return None;
    }
    Some(CStr::from_ptr(ptr).to_bytes())
}

/// Byte-wise equality of two C strings. Two nulls compare equal; a null
/// never equals a real string.
///
/// # Safety
///
/// Both pointers must satisfy the contract of [`c_string_bytes`].
pub unsafe fn strings_equal(a: *const c_char, b: *const c_char) -> bool {
    if a == b {
        return true;
    }
    match (c_string_bytes(a), c_string_bytes(b)) {
        (Some(lhs), Some(rhs)) => lhs == rhs,
        _ => false,
    }
}

/// # Safety
///
/// `a` and `b` must each be null or point to a NUL-terminated byte string.
#[no_mangle]
pub unsafe extern "C" fn _StringEqual(a: *const c_char, b: *const c_char) -> c_int {
    trace_call!("_StringEqual({:p}, {:p})", a, b);
    c_int::from(strings_equal(a, b))
}
