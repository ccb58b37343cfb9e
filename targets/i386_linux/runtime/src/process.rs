use std::io::{self, Write};

/// Exit status of a halted Decaf program.
pub(crate) const HALT_EXIT_CODE: i32 = 1;

pub(crate) fn halt() -> ! {
    let _ = io::stdout().flush();

    #[cfg(feature = "telemetry")]
    crate::telemetry::dump_stderr();

    std::process::exit(HALT_EXIT_CODE)
}

#[no_mangle]
pub extern "C" fn _Halt() -> ! {
    trace_call!("_Halt()");
    halt()
}
