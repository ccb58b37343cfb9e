/// What an intrinsic hands back to the generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnKind {
    Void,
    Int,
    Pointer,
    Never,
}

impl ReturnKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ReturnKind::Void => "void",
            ReturnKind::Int => "int",
            ReturnKind::Pointer => "pointer",
            ReturnKind::Never => "never",
        }
    }
}

/// A built-in procedure the Decaf backend calls like a system call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Intrinsic {
    pub name: &'static str,
    pub arity: usize,
    pub returns: ReturnKind,
    pub summary: &'static str,
}

impl Intrinsic {
    pub fn lookup(name: &str) -> Option<&'static Intrinsic> {
        INTRINSICS.iter().find(|intrinsic| intrinsic.name == name)
    }

    /// Whether `name` has the shape the backend uses for intrinsic labels:
    /// a leading underscore followed by an upper-case letter.
    pub fn looks_like_intrinsic(name: &str) -> bool {
        let mut chars = name.chars();
        chars.next() == Some('_') && chars.next().is_some_and(|c| c.is_ascii_uppercase())
    }
}

pub static INTRINSICS: &[Intrinsic] = &[
    Intrinsic {
        name: "_Alloc",
        arity: 1,
        returns: ReturnKind::Pointer,
        summary: "allocate zeroed memory, abort on failure",
    },
    Intrinsic {
        name: "_ReadLine",
        arity: 0,
        returns: ReturnKind::Pointer,
        summary: "read a line from stdin, NULL at end of input",
    },
    Intrinsic {
        name: "_ReadInteger",
        arity: 0,
        returns: ReturnKind::Int,
        summary: "read a 32-bit decimal integer from stdin",
    },
    Intrinsic {
        name: "_StringEqual",
        arity: 2,
        returns: ReturnKind::Int,
        summary: "1 if both strings hold the same bytes, else 0",
    },
    Intrinsic {
        name: "_PrintInt",
        arity: 1,
        returns: ReturnKind::Void,
        summary: "print an integer to stdout",
    },
    Intrinsic {
        name: "_PrintString",
        arity: 1,
        returns: ReturnKind::Void,
        summary: "print a string to stdout",
    },
    Intrinsic {
        name: "_PrintBool",
        arity: 1,
        returns: ReturnKind::Void,
        summary: "print true or false to stdout",
    },
    Intrinsic {
        name: "_Halt",
        arity: 0,
        returns: ReturnKind::Never,
        summary: "exit the program with status 1",
    },
    Intrinsic {
        name: "_ArrayIndexOutOfBound",
        arity: 0,
        returns: ReturnKind::Never,
        summary: "report an out-of-bounds subscript and halt",
    },
    Intrinsic {
        name: "_NegativeArraySize",
        arity: 0,
        returns: ReturnKind::Never,
        summary: "report a negative array length and halt",
    },
    Intrinsic {
        name: "_ClassCastError",
        arity: 2,
        returns: ReturnKind::Never,
        summary: "report a failed class cast and halt",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_finds_core_intrinsics() {
        for name in ["_PrintInt", "_PrintString", "_PrintBool", "_Alloc", "_ReadInteger", "_Halt", "_StringEqual", "_ReadLine"] {
            assert!(Intrinsic::lookup(name).is_some(), "missing {}", name);
        }
        assert_eq!(Intrinsic::lookup("_StringEqual").map(|i| i.arity), Some(2));
        assert!(Intrinsic::lookup("_PrintFloat").is_none());
    }

    #[test]
    fn names_are_unique() {
        for (idx, intrinsic) in INTRINSICS.iter().enumerate() {
            assert!(INTRINSICS[idx + 1..].iter().all(|other| other.name != intrinsic.name));
        }
    }

    #[test]
    fn intrinsic_shape() {
        assert!(Intrinsic::looks_like_intrinsic("_PrintFloat"));
        assert!(!Intrinsic::looks_like_intrinsic("_start"));
        assert!(!Intrinsic::looks_like_intrinsic("printf"));
        assert!(!Intrinsic::looks_like_intrinsic("_"));
    }
}
