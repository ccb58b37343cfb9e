//! Errors raised by the `decaf-rt` host tool.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("failed to access '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse object file '{}': {source}", .path.display())]
    Object {
        path: PathBuf,
        #[source]
        source: object::Error,
    },

    #[error("symbols not provided by the runtime: {}", .names.join(", "))]
    UnresolvedSymbols { names: Vec<String> },

    #[error("runtime archive '{}' does not exist (set --runtime or DECAF_RUNTIME_LIB)", .0.display())]
    MissingRuntime(PathBuf),

    #[error("failed to launch linker '{program}': {source}")]
    LinkerLaunch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("linker '{program}' exited with {status}")]
    LinkerFailed { program: String, status: ExitStatus },
}

impl ToolError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ToolError::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, ToolError>;
