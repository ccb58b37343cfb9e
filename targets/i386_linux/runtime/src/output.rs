use core::ffi::{c_char, c_int};
use std::io::{self, Write};

use crate::strings::c_string_bytes;

pub fn write_int<W: Write>(out: &mut W, value: c_int) -> io::Result<()> {
    write!(out, "{}", value)
}

pub fn write_bool<W: Write>(out: &mut W, value: c_int) -> io::Result<()> {
    out.write_all(if value != 0 { b"true" } else { b"false" })
}

/// # Safety
///
/// `ptr` must be null or point to a NUL-terminated byte string. A null
/// pointer writes nothing.
pub unsafe fn write_c_string<W: Write>(out: &mut W, ptr: *const c_char) -> io::Result<()> {
    match c_string_bytes(ptr) {
        Some(bytes) => out.write_all(bytes),
        None => Ok(()),
    }
}

#[no_mangle]
pub extern "C" fn _PrintInt(a: c_int) {
    trace_call!("_PrintInt({})", a);
    let mut buf = Vec::with_capacity(11);
    if write_int(&mut buf, a).is_ok() {
        crate::stdout_write(&buf);
    }
}

/// # Safety
///
/// `a` must be null or point to a NUL-terminated byte string, such as a
/// string literal from the program's data section or a `_ReadLine` result.
#[no_mangle]
pub unsafe extern "C" fn _PrintString(a: *const c_char) {
    trace_call!("_PrintString({:p})", a);
    let mut buf = Vec::new();
    if write_c_string(&mut buf, a).is_ok() {
        crate::stdout_write(&buf);
    }
}

#[no_mangle]
pub extern "C" fn _PrintBool(x: c_int) {
    trace_call!("_PrintBool({})", x);
    let mut buf = Vec::with_capacity(5);
    if write_bool(&mut buf, x).is_ok() {
        crate::stdout_write(&buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::ptr::null;

    #[test]
    fn ints_print_like_printf_d() {
        let mut out = Vec::new();
        for value in [0, 42, -7, c_int::MAX, c_int::MIN] {
            write_int(&mut out, value).unwrap();
            out.push(b' ');
        }
        assert_eq!(out, b"0 42 -7 2147483647 -2147483648 ");
    }

    #[test]
    fn any_nonzero_is_true() {
        let mut out = Vec::new();
        write_bool(&mut out, 0).unwrap();
        write_bool(&mut out, 1).unwrap();
        write_bool(&mut out, -3).unwrap();
        assert_eq!(out, b"falsetruetrue");
    }

    #[test]
    fn strings_stop_at_nul() {
        let literal = b"Hello\0ignored\0";
        let mut out = Vec::new();
        unsafe {
            write_c_string(&mut out, literal.as_ptr() as *const c_char).unwrap();
            write_c_string(&mut out, null()).unwrap();
        }
        assert_eq!(out, b"Hello");
    }
}
