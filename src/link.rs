//! Links compiler output against the runtime archive with the system C driver.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Result, ToolError};

/// Native libraries a Rust `staticlib` built against std pulls in.
const RUNTIME_SYSTEM_LIBS: &[&str] = &["-lpthread", "-ldl", "-lm"];

#[derive(Debug, Clone)]
pub struct LinkJob {
    pub cc: String,
    pub runtime: PathBuf,
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
    pub m32: bool,
}

impl LinkJob {
    pub fn command(&self) -> Command {
        let mut command = Command::new(&self.cc);
        if self.m32 {
            command.arg("-m32");
        }
        command.arg("-o").arg(&self.output);
        command.args(&self.inputs);
        // The archive must follow the objects that reference its symbols.
        command.arg(&self.runtime);
        command.args(RUNTIME_SYSTEM_LIBS);
        command
    }

    pub fn run(&self) -> Result<()> {
        if !self.runtime.exists() {
            return Err(ToolError::MissingRuntime(self.runtime.clone()));
        }
        for input in &self.inputs {
            if !input.exists() {
                return Err(ToolError::io(
                    input,
                    std::io::Error::new(std::io::ErrorKind::NotFound, "input not found"),
                ));
            }
        }

        let mut command = self.command();
        log::info!("running {:?}", command_line(&command));

        let status = command.status().map_err(|source| ToolError::LinkerLaunch {
            program: self.cc.clone(),
            source,
        })?;

        if !status.success() {
            return Err(ToolError::LinkerFailed {
                program: self.cc.clone(),
                status,
            });
        }

        log::info!("wrote '{}'", self.output.display());
        Ok(())
    }
}

pub fn command_line(command: &Command) -> Vec<OsString> {
    std::iter::once(command.get_program().to_os_string())
        .chain(command.get_args().map(|arg| arg.to_os_string()))
        .collect()
}

/// Path of the runtime archive baked in by the build script.
pub fn default_runtime_archive() -> &'static Path {
    Path::new(env!("DECAF_RUNTIME_LIB"))
}
