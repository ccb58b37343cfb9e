use core::ffi::c_char;
use std::io::{self, Write};
use thiserror::Error;

use crate::strings::c_string_bytes;

pub const RUNTIME_ERROR_PREFIX: &str = "Decaf runtime error: ";

/// Failures the generated code checks for at run time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("Decaf runtime error: Array subscript out of bounds")]
    ArrayIndexOutOfBound,

    #[error("Decaf runtime error: Cannot create negative-sized array")]
    NegativeArraySize,

    #[error("Decaf runtime error: {from} cannot be cast to {to}")]
    ClassCast { from: String, to: String },
}

impl RuntimeError {
    /// Writes the message the way the program prints it: one line on stdout.
    pub fn report<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", self)?;
        out.flush()
    }

    fn report_and_halt(&self) -> ! {
        let stdout = io::stdout();
        let _ = self.report(&mut stdout.lock());
        crate::process::halt()
    }
}

fn class_name(ptr: *const c_char) -> String {
    // SAFETY: class names come from the vtable string pool.
    match unsafe { c_string_bytes(ptr) } {
        Some(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        None => String::from("null"),
    }
}

#[no_mangle]
pub extern "C" fn _ArrayIndexOutOfBound() -> ! {
    trace_call!("_ArrayIndexOutOfBound()");
    RuntimeError::ArrayIndexOutOfBound.report_and_halt()
}

#[no_mangle]
pub extern "C" fn _NegativeArraySize() -> ! {
    trace_call!("_NegativeArraySize()");
    RuntimeError::NegativeArraySize.report_and_halt()
}

/// # Safety
///
/// `from` and `to` must be null or point to NUL-terminated class names.
#[no_mangle]
pub unsafe extern "C" fn _ClassCastError(from: *const c_char, to: *const c_char) -> ! {
    trace_call!("_ClassCastError({:p}, {:p})", from, to);
    RuntimeError::ClassCast {
        from: class_name(from),
        to: class_name(to),
    }
    .report_and_halt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::ptr::null;

    #[test]
    fn messages_match_generated_code() {
        let mut out = Vec::new();
        RuntimeError::ArrayIndexOutOfBound.report(&mut out).unwrap();
        RuntimeError::NegativeArraySize.report(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Decaf runtime error: Array subscript out of bounds\n\
             Decaf runtime error: Cannot create negative-sized array\n"
        );
    }

    #[test]
    fn class_cast_names_both_classes() {
        let err = RuntimeError::ClassCast {
            from: class_name(b"Animal\0".as_ptr() as *const c_char),
            to: class_name(null()),
        };
        assert_eq!(err.to_string(), "Decaf runtime error: Animal cannot be cast to null");
        assert!(err.to_string().starts_with(RUNTIME_ERROR_PREFIX));
    }
}
