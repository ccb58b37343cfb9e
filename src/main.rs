//! `decaf-rt`: host tooling around the Decaf runtime library.

mod error;
mod link;
mod object_check;

use clap::{Parser, Subcommand};
use decaf_runtime::INTRINSICS;
use error::{Result, ToolError};
use link::{default_runtime_archive, LinkJob};
use object_check::{check_file, runtime_architecture};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "decaf-rt")]
#[command(about = "Decaf runtime library tooling")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the intrinsics the runtime exports
    Intrinsics,

    /// Check that an object file only calls intrinsics the runtime provides
    Check {
        /// Object file produced from the compiler's assembly
        object: PathBuf,
    },

    /// Link generated assembly or objects against the runtime
    Link {
        /// Output executable
        #[arg(short, long)]
        output: PathBuf,

        /// Assembly or object files to link
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// C compiler driver used to assemble and link
        #[arg(long, env = "DECAF_CC", default_value = "cc")]
        cc: String,

        /// Runtime archive to link against
        #[arg(long, env = "DECAF_RUNTIME_LIB")]
        runtime: Option<PathBuf>,

        /// Produce a 32-bit (i386) executable
        #[arg(long)]
        m32: bool,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Intrinsics => {
            print_intrinsics();
            Ok(())
        }
        Commands::Check { object } => check_command(&object),
        Commands::Link {
            output,
            inputs,
            cc,
            runtime,
            m32,
        } => LinkJob {
            cc,
            runtime: runtime.unwrap_or_else(|| default_runtime_archive().to_path_buf()),
            inputs,
            output,
            m32,
        }
        .run(),
    };

    if let Err(e) = outcome {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn print_intrinsics() {
    println!("{:<24} {:>5}  {:<8} summary", "symbol", "arity", "returns");
    for intrinsic in INTRINSICS {
        println!(
            "{:<24} {:>5}  {:<8} {}",
            intrinsic.name,
            intrinsic.arity,
            intrinsic.returns.as_str(),
            intrinsic.summary
        );
    }
}

fn check_command(object: &std::path::Path) -> Result<()> {
    let report = check_file(object)?;

    let expected = runtime_architecture(env!("DECAF_RUNTIME_TARGET"));
    if let (Some(found), Some(expected)) = (report.architecture, expected) {
        if found != expected {
            log::warn!("object targets {:?} but the runtime archive was built for {:?}", found, expected);
        }
    }

    for intrinsic in &report.intrinsics {
        println!("intrinsic  {}", intrinsic.name);
    }
    for name in &report.system {
        println!("system     {}", name);
    }
    for name in &report.other {
        println!("external   {}", name);
    }
    for intrinsic in report.unused_intrinsics() {
        log::debug!("unused intrinsic {}", intrinsic.name);
    }

    if report.is_linkable() {
        Ok(())
    } else {
        Err(ToolError::UnresolvedSymbols { names: report.unresolved })
    }
}
