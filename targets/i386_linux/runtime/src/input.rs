//! Console input intrinsics.
//!
//! Both readers go through std's shared stdin buffer, so whatever
//! `_ReadInteger` leaves behind on a line is what the next `_ReadLine`
//! sees, exactly as with `scanf` followed by `fgets`.

use core::ffi::{c_char, c_int};
use core::ptr::null;
use std::io::{self, BufRead};

use crate::memory::arena_alloc;

/// Size of the buffer `_ReadLine` hands out, terminator included.
pub const READ_LINE_LEN: usize = 1024;

fn peek<R: BufRead>(input: &mut R) -> io::Result<Option<u8>> {
    Ok(input.fill_buf()?.first().copied())
}

fn skip_whitespace<R: BufRead>(input: &mut R) -> io::Result<()> {
    while let Some(byte) = peek(input)? {
        if !byte.is_ascii_whitespace() {
            break;
        }
        input.consume(1);
    }
    Ok(())
}

/// Parses one decimal integer the way `scanf("%d")` does: leading
/// whitespace is skipped, an optional sign is accepted, and reading stops
/// at the first non-digit, which stays in the stream.
///
/// Yields 0 when no digits are found. Values outside `c_int` saturate.
pub fn read_integer_from<R: BufRead>(input: &mut R) -> io::Result<c_int> {
    const LIMIT: i64 = c_int::MAX as i64 + 1;

    skip_whitespace(input)?;

    let mut negative = false;
    if let Some(sign @ (b'+' | b'-')) = peek(input)? {
        negative = sign == b'-';
        input.consume(1);
    }

    let mut magnitude: i64 = 0;
    let mut seen_digit = false;
    while let Some(byte) = peek(input)? {
        if !byte.is_ascii_digit() {
            break;
        }
        magnitude = (magnitude * 10 + i64::from(byte - b'0')).min(LIMIT);
        seen_digit = true;
        input.consume(1);
    }

    if !seen_digit {
        return Ok(0);
    }

    let signed = if negative { -magnitude } else { magnitude };
    Ok(signed.clamp(i64::from(c_int::MIN), i64::from(c_int::MAX)) as c_int)
}

/// Reads one line into `dest` with `fgets` semantics: at most
/// `dest.len() - 1` bytes, stopping after a newline, always terminated
/// with a NUL. Returns the number of bytes stored, or `None` at end of
/// input when nothing was read.
///
/// With the `trim-read-line` feature the trailing line break is dropped.
pub fn read_line_from<R: BufRead>(input: &mut R, dest: &mut [u8]) -> io::Result<Option<usize>> {
    let Some(limit) = dest.len().checked_sub(1) else {
        return Ok(None);
    };

    let mut len = 0;
    while len < limit {
        let available = input.fill_buf()?;
        if available.is_empty() {
            break;
        }

        let window = &available[..available.len().min(limit - len)];
        let (count, found_newline) = match window.iter().position(|b| *b == b'\n') {
            Some(idx) => (idx + 1, true),
            None => (window.len(), false),
        };

        dest[len..len + count].copy_from_slice(&window[..count]);
        input.consume(count);
        len += count;

        if found_newline {
            break;
        }
    }

    if len == 0 {
        return Ok(None);
    }

    #[cfg(feature = "trim-read-line")]
    {
        if dest[len - 1] == b'\n' {
            len -= 1;
            if len > 0 && dest[len - 1] == b'\r' {
                len -= 1;
            }
        }
    }

    dest[len] = 0;
    Ok(Some(len))
}

#[no_mangle]
pub extern "C" fn _ReadInteger() -> c_int {
    trace_call!("_ReadInteger()");
    let stdin = io::stdin();
    let mut lock = stdin.lock();
    read_integer_from(&mut lock).unwrap_or(0)
}

/// Reads a line into a fresh arena buffer that is never released, or
/// returns null at end of input. The buffer is leaked either way.
pub(crate) fn read_leaked_line<R: BufRead>(input: &mut R) -> *const c_char {
    let Some(buffer) = arena_alloc(READ_LINE_LEN) else {
        eprintln!("decaf-runtime: _ReadLine could not allocate its buffer");
        std::process::abort();
    };

    #[cfg(feature = "telemetry")]
    crate::telemetry::record_leaked_buffer(READ_LINE_LEN);

    // SAFETY: the arena returned READ_LINE_LEN fresh bytes nobody else holds.
    let dest = unsafe { core::slice::from_raw_parts_mut(buffer.as_ptr(), READ_LINE_LEN) };
    match read_line_from(input, dest) {
        Ok(Some(_)) => {
            #[cfg(feature = "telemetry")]
            crate::telemetry::record_line_read();
            buffer.as_ptr() as *const c_char
        }
        Ok(None) | Err(_) => null(),
    }
}

/// Every call leaks its buffer; Decaf strings are never freed.
#[no_mangle]
pub extern "C" fn _ReadLine() -> *const c_char {
    trace_call!("_ReadLine()");
    let stdin = io::stdin();
    let mut lock = stdin.lock();
    read_leaked_line(&mut lock)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn line(input: &mut Cursor<&[u8]>) -> Option<Vec<u8>> {
        let mut buf = [0xffu8; 16];
        read_line_from(input, &mut buf).unwrap().map(|len| {
            assert_eq!(buf[len], 0);
            buf[..len].to_vec()
        })
    }

    #[test]
    fn integers_skip_leading_whitespace() {
        let mut input = Cursor::new(&b"  \n\t 42 -17 +5"[..]);
        assert_eq!(read_integer_from(&mut input).unwrap(), 42);
        assert_eq!(read_integer_from(&mut input).unwrap(), -17);
        assert_eq!(read_integer_from(&mut input).unwrap(), 5);
    }

    #[test]
    fn integer_without_digits_is_zero() {
        let mut input = Cursor::new(&b"abc"[..]);
        assert_eq!(read_integer_from(&mut input).unwrap(), 0);
        let mut empty = Cursor::new(&b""[..]);
        assert_eq!(read_integer_from(&mut empty).unwrap(), 0);
    }

    #[test]
    fn integer_overflow_saturates() {
        let mut input = Cursor::new(&b"99999999999 -99999999999 -2147483648"[..]);
        assert_eq!(read_integer_from(&mut input).unwrap(), c_int::MAX);
        assert_eq!(read_integer_from(&mut input).unwrap(), c_int::MIN);
        assert_eq!(read_integer_from(&mut input).unwrap(), c_int::MIN);
    }

    #[test]
    fn integer_leaves_rest_of_line() {
        let mut input = Cursor::new(&b"12 apples\nnext\n"[..]);
        assert_eq!(read_integer_from(&mut input).unwrap(), 12);
        #[cfg(not(feature = "trim-read-line"))]
        assert_eq!(line(&mut input).unwrap(), b" apples\n");
        #[cfg(feature = "trim-read-line")]
        assert_eq!(line(&mut input).unwrap(), b" apples");
    }

    #[cfg(not(feature = "trim-read-line"))]
    #[test]
    fn lines_keep_newline_like_fgets() {
        let mut input = Cursor::new(&b"first\nsecond"[..]);
        assert_eq!(line(&mut input).unwrap(), b"first\n");
        assert_eq!(line(&mut input).unwrap(), b"second");
        assert_eq!(line(&mut input), None);
    }

    #[cfg(feature = "trim-read-line")]
    #[test]
    fn lines_drop_line_breaks() {
        let mut input = Cursor::new(&b"first\r\nsecond\n\n"[..]);
        assert_eq!(line(&mut input).unwrap(), b"first");
        assert_eq!(line(&mut input).unwrap(), b"second");
        assert_eq!(line(&mut input).unwrap(), b"");
        assert_eq!(line(&mut input), None);
    }

    #[test]
    fn long_lines_are_split_at_capacity() {
        let mut input = Cursor::new(&b"abcdefghijklmnopqrstuvwxyz"[..]);
        assert_eq!(line(&mut input).unwrap(), b"abcdefghijklmno");
        assert_eq!(line(&mut input).unwrap(), b"pqrstuvwxyz");
        assert_eq!(line(&mut input), None);
    }

    #[test]
    fn leaked_line_is_null_at_end_of_input() {
        let mut input = Cursor::new(&b""[..]);
        assert!(read_leaked_line(&mut input).is_null());
    }

    #[test]
    fn empty_destination_reads_nothing() {
        let mut input = Cursor::new(&b"data\n"[..]);
        assert_eq!(read_line_from(&mut input, &mut []).unwrap(), None);
        assert_eq!(input.position(), 0);
    }
}
