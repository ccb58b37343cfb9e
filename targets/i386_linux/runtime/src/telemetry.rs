use core::sync::atomic::{AtomicU64, Ordering};
use std::io::{self, Write};

#[repr(C)]
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub struct RuntimeCounters {
    pub allocations: u64,
    pub bytes_requested: u64,
    pub chunks: u64,
    pub large_blocks: u64,
    pub lines_read: u64,
    pub bytes_leaked_by_read_line: u64,
}

static ALLOCATIONS: AtomicU64 = AtomicU64::new(0);
static BYTES_REQUESTED: AtomicU64 = AtomicU64::new(0);
static CHUNKS: AtomicU64 = AtomicU64::new(0);
static LARGE_BLOCKS: AtomicU64 = AtomicU64::new(0);
static LINES_READ: AtomicU64 = AtomicU64::new(0);
static BYTES_LEAKED: AtomicU64 = AtomicU64::new(0);

pub fn record_alloc(size: usize) {
    ALLOCATIONS.fetch_add(1, Ordering::Relaxed);
    BYTES_REQUESTED.fetch_add(size as u64, Ordering::Relaxed);
}

pub fn record_chunk() {
    CHUNKS.fetch_add(1, Ordering::Relaxed);
}

pub fn record_large_block() {
    LARGE_BLOCKS.fetch_add(1, Ordering::Relaxed);
}

pub fn record_leaked_buffer(buffer_len: usize) {
    BYTES_LEAKED.fetch_add(buffer_len as u64, Ordering::Relaxed);
}

pub fn record_line_read() {
    LINES_READ.fetch_add(1, Ordering::Relaxed);
}

pub fn counters_snapshot() -> RuntimeCounters {
    RuntimeCounters {
        allocations: ALLOCATIONS.load(Ordering::Relaxed),
        bytes_requested: BYTES_REQUESTED.load(Ordering::Relaxed),
        chunks: CHUNKS.load(Ordering::Relaxed),
        large_blocks: LARGE_BLOCKS.load(Ordering::Relaxed),
        lines_read: LINES_READ.load(Ordering::Relaxed),
        bytes_leaked_by_read_line: BYTES_LEAKED.load(Ordering::Relaxed),
    }
}

fn write_summary<W: Write>(out: &mut W, counters: &RuntimeCounters) -> io::Result<()> {
    writeln!(
        out,
        "[decaf-runtime] allocations={} bytes={} chunks={} large={} lines={} leaked={}",
        counters.allocations,
        counters.bytes_requested,
        counters.chunks,
        counters.large_blocks,
        counters.lines_read,
        counters.bytes_leaked_by_read_line,
    )
}

pub fn dump_stderr() {
    let counters = counters_snapshot();
    let _ = write_summary(&mut io::stderr().lock(), &counters);
}

/// # Safety
///
/// `out` must be null or valid for a write of one `RuntimeCounters`.
#[no_mangle]
pub unsafe extern "C" fn _RuntimeCounters(out: *mut RuntimeCounters) -> i32 {
    if out.is_null() {
        return -1;
    }
    *out = counters_snapshot();
    0
}

#[no_mangle]
pub extern "C" fn _RuntimeTelemetryDump() {
    dump_stderr();
}
