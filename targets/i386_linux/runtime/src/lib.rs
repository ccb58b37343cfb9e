//! Runtime support library for compiled Decaf programs.
//!
//! The Decaf backend emits calls to a small set of intrinsics (`_PrintInt`,
//! `_Alloc`, `_ReadLine`, ...) by their C symbol names. This crate exports
//! each of them with the C ABI so the generated assembly links straight
//! against `libdecaf_runtime.a`.
#![allow(non_snake_case)]

use std::io::{self, Write};

macro_rules! trace_call {
    ($($arg:tt)*) => {{
        #[cfg(feature = "debug")]
        {
            eprintln!("[decaf-runtime] {}", format_args!($($arg)*));
        }
    }};
}

mod errors;
mod input;
mod intrinsics;
mod memory;
mod output;
mod process;
mod strings;
#[cfg(feature = "telemetry")]
mod telemetry;

pub use errors::{RuntimeError, _ArrayIndexOutOfBound, _ClassCastError, _NegativeArraySize, RUNTIME_ERROR_PREFIX};
pub use input::{_ReadInteger, _ReadLine, read_integer_from, read_line_from, READ_LINE_LEN};
pub use intrinsics::{Intrinsic, ReturnKind, INTRINSICS};
pub use memory::{_Alloc, arena_alloc, ARENA_CHUNK_SIZE};
pub use output::{_PrintBool, _PrintInt, _PrintString, write_bool, write_int, write_c_string};
pub use process::_Halt;
pub use strings::{_StringEqual, c_string_bytes, strings_equal};
#[cfg(feature = "telemetry")]
pub use telemetry::{RuntimeCounters, _RuntimeCounters, _RuntimeTelemetryDump};

/// Writes `bytes` to the process stdout and flushes immediately.
///
/// The runtime is linked under a C `main`, so std never gets a chance to
/// flush its buffered stdout at exit.
fn stdout_write(bytes: &[u8]) {
    if bytes.is_empty() {
        return;
    }

    let stdout = io::stdout();
    let mut lock = stdout.lock();
    let _ = lock.write_all(bytes);
    let _ = lock.flush();
}
