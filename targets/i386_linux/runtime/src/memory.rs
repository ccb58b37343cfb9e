//! Bump arena behind `_Alloc`.
//!
//! Decaf has no way to release memory, so the allocator never frees.
//! Small requests are carved out of zeroed chunks; large ones get a zeroed
//! block of their own. Every pointer handed out is 8-byte aligned.

use core::ffi::{c_int, c_void};
use core::ptr::{null_mut, NonNull};
use std::alloc::{alloc_zeroed, Layout};
use std::sync::Mutex;

pub const ARENA_CHUNK_SIZE: usize = 64 * 1024;
const LARGE_BLOCK_THRESHOLD: usize = ARENA_CHUNK_SIZE / 4;
const ALIGNMENT: usize = 8;

struct Arena {
    cursor: *mut u8,
    remaining: usize,
}

// The raw cursor only ever points into chunks owned by the arena itself.
unsafe impl Send for Arena {}

static ARENA: Mutex<Arena> = Mutex::new(Arena {
    cursor: null_mut(),
    remaining: 0,
});

#[inline(always)]
fn align_up_8(value: usize) -> Option<usize> {
    value.checked_add(ALIGNMENT - 1).map(|v| v & !(ALIGNMENT - 1))
}

fn fresh_block(size: usize) -> Option<NonNull<u8>> {
    let layout = Layout::from_size_align(size, ALIGNMENT).ok()?;
    // SAFETY: `size` is never zero here.
    NonNull::new(unsafe { alloc_zeroed(layout) })
}

/// Hands out `size` zeroed bytes that live for the rest of the process.
///
/// A zero-byte request still returns a unique, valid pointer. `None` means
/// the global allocator refused the request.
pub fn arena_alloc(size: usize) -> Option<NonNull<u8>> {
    let needed = align_up_8(size.max(1))?;

    if needed > LARGE_BLOCK_THRESHOLD {
        let block = fresh_block(needed)?;
        #[cfg(feature = "telemetry")]
        crate::telemetry::record_large_block();
        #[cfg(feature = "telemetry")]
        crate::telemetry::record_alloc(size);
        return Some(block);
    }

    let mut arena = ARENA.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

    if arena.remaining < needed {
        let chunk = fresh_block(ARENA_CHUNK_SIZE)?;
        arena.cursor = chunk.as_ptr();
        arena.remaining = ARENA_CHUNK_SIZE;
        #[cfg(feature = "telemetry")]
        crate::telemetry::record_chunk();
    }

    let user_ptr = arena.cursor;
    // SAFETY: `needed <= remaining`, so the bump stays inside the chunk.
    arena.cursor = unsafe { arena.cursor.add(needed) };
    arena.remaining -= needed;

    #[cfg(feature = "telemetry")]
    crate::telemetry::record_alloc(size);

    NonNull::new(user_ptr)
}

fn allocation_failed(size: c_int) -> ! {
    eprintln!("decaf-runtime: _Alloc({}) failed", size);
    std::process::abort()
}

#[no_mangle]
pub extern "C" fn _Alloc(sz: c_int) -> *mut c_void {
    trace_call!("_Alloc({})", sz);
    let Ok(size) = usize::try_from(sz) else {
        allocation_failed(sz);
    };

    match arena_alloc(size) {
        Some(ptr) => ptr.as_ptr().cast(),
        None => allocation_failed(sz),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn allocations_are_aligned_and_zeroed() {
        for size in [1usize, 3, 8, 13, 100] {
            let ptr = arena_alloc(size).unwrap();
            assert_eq!(ptr.as_ptr() as usize % ALIGNMENT, 0);
            let bytes = unsafe { core::slice::from_raw_parts(ptr.as_ptr(), size) };
            assert!(bytes.iter().all(|b| *b == 0));
        }
    }

    #[test]
    fn zero_sized_requests_get_distinct_pointers() {
        let a = _Alloc(0);
        let b = _Alloc(0);
        assert!(!a.is_null());
        assert!(!b.is_null());
        assert_ne!(a, b);
    }

    #[test]
    fn allocations_do_not_overlap() {
        let first = _Alloc(12) as *mut u8;
        let second = _Alloc(12) as *mut u8;
        unsafe {
            core::ptr::write_bytes(first, 0xaa, 12);
            core::ptr::write_bytes(second, 0x55, 12);
            assert!(core::slice::from_raw_parts(first, 12).iter().all(|b| *b == 0xaa));
        }
    }

    #[test]
    fn large_requests_bypass_the_chunk() {
        let size = ARENA_CHUNK_SIZE * 2;
        let ptr = arena_alloc(size).unwrap();
        unsafe {
            *ptr.as_ptr().add(size - 1) = 7;
            assert_eq!(*ptr.as_ptr().add(size - 1), 7);
        }
    }

    #[test]
    fn chunk_rollover_keeps_serving() {
        let mut last = null_mut();
        for _ in 0..(ARENA_CHUNK_SIZE / 1024 + 4) {
            let ptr = arena_alloc(1024).unwrap().as_ptr();
            assert_ne!(ptr, last);
            last = ptr;
        }
    }

    #[test]
    fn concurrent_callers_get_disjoint_blocks() {
        let handles: Vec<_> = (0..4)
            .map(|_| thread::spawn(|| (0..256).map(|_| _Alloc(16) as usize).collect::<Vec<_>>()))
            .collect();

        let mut all: Vec<usize> = handles.into_iter().flat_map(|h| h.join().unwrap()).collect();
        let total = all.len();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), total);
    }
}
