//! Checks a compiled Decaf object file against the runtime's intrinsic table.

use decaf_runtime::{Intrinsic, INTRINSICS};
use memmap2::Mmap;
use object::{Architecture, BinaryFormat, Object, ObjectSymbol};
use std::fs::File;
use std::path::Path;

use crate::error::{Result, ToolError};

/// Undefined symbols the system linker resolves from libc or the toolchain.
/// glibc's `_IO_*` internals are matched by prefix in [`classify`].
const SYSTEM_SYMBOLS: &[&str] = &[
    "_GLOBAL_OFFSET_TABLE_",
    "_DYNAMIC",
    "__stack_chk_fail",
    "__stack_chk_fail_local",
    "__x86.get_pc_thunk.bx",
    "abort",
    "exit",
    "fgets",
    "free",
    "malloc",
    "memcpy",
    "memset",
    "printf",
    "putchar",
    "puts",
    "scanf",
    "strcmp",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolClass {
    Intrinsic(&'static Intrinsic),
    System,
    Unresolved,
    Other,
}

pub fn classify(name: &str) -> SymbolClass {
    if let Some(intrinsic) = Intrinsic::lookup(name) {
        SymbolClass::Intrinsic(intrinsic)
    } else if SYSTEM_SYMBOLS.contains(&name) || name.starts_with("_IO_") {
        SymbolClass::System
    } else if Intrinsic::looks_like_intrinsic(name) {
        SymbolClass::Unresolved
    } else {
        SymbolClass::Other
    }
}

#[derive(Debug, Default)]
pub struct ObjectReport {
    pub architecture: Option<Architecture>,
    pub intrinsics: Vec<&'static Intrinsic>,
    pub system: Vec<String>,
    pub unresolved: Vec<String>,
    pub other: Vec<String>,
}

impl ObjectReport {
    pub fn is_linkable(&self) -> bool {
        self.unresolved.is_empty()
    }

    /// Intrinsics the runtime exports that this object never calls.
    pub fn unused_intrinsics(&self) -> impl Iterator<Item = &'static Intrinsic> + '_ {
        INTRINSICS.iter().filter(move |intrinsic| !self.intrinsics.iter().any(|used| used.name == intrinsic.name))
    }
}

/// Mach-O prefixes every C symbol with an extra underscore.
fn c_symbol_name(format: BinaryFormat, raw: &str) -> &str {
    match format {
        BinaryFormat::MachO => raw.strip_prefix('_').unwrap_or(raw),
        _ => raw,
    }
}

pub fn check_bytes(data: &[u8]) -> std::result::Result<ObjectReport, object::Error> {
    let file = object::File::parse(data)?;
    let format = file.format();
    let mut report = ObjectReport {
        architecture: Some(file.architecture()),
        ..ObjectReport::default()
    };

    for symbol in file.symbols().filter(|symbol| symbol.is_undefined()) {
        let raw = symbol.name()?;
        if raw.is_empty() {
            continue;
        }
        let name = c_symbol_name(format, raw);

        match classify(name) {
            SymbolClass::Intrinsic(intrinsic) => {
                if !report.intrinsics.iter().any(|seen| seen.name == intrinsic.name) {
                    report.intrinsics.push(intrinsic);
                }
            }
            SymbolClass::System => report.system.push(name.to_string()),
            SymbolClass::Unresolved => report.unresolved.push(name.to_string()),
            SymbolClass::Other => report.other.push(name.to_string()),
        }
    }

    log::debug!(
        "{} intrinsic(s), {} system, {} unresolved, {} other",
        report.intrinsics.len(),
        report.system.len(),
        report.unresolved.len(),
        report.other.len()
    );

    Ok(report)
}

pub fn check_file(path: &Path) -> Result<ObjectReport> {
    let file = File::open(path).map_err(|e| ToolError::io(path, e))?;
    // SAFETY: the mapping is read-only and dropped before this function returns.
    let mmap = unsafe { Mmap::map(&file) }.map_err(|e| ToolError::io(path, e))?;

    log::info!("checking '{}' ({} bytes)", path.display(), mmap.len());

    check_bytes(&mmap).map_err(|source| ToolError::Object {
        path: path.to_path_buf(),
        source,
    })
}

/// Architecture the runtime archive was built for, from a rustc target
/// triple or, when empty, the host.
pub fn runtime_architecture(target: &str) -> Option<Architecture> {
    let arch = match target.split('-').next() {
        Some(arch) if !arch.is_empty() => arch,
        _ => std::env::consts::ARCH,
    };

    match arch {
        "x86" | "i386" | "i586" | "i686" => Some(Architecture::I386),
        "x86_64" => Some(Architecture::X86_64),
        "aarch64" => Some(Architecture::Aarch64),
        "arm" | "armv7" => Some(Architecture::Arm),
        "riscv64gc" | "riscv64" => Some(Architecture::Riscv64),
        _ => None,
    }
}
