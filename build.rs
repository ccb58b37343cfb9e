use std::env;
use std::path::PathBuf;
use std::process::Command;

fn main() {
    // Rebuild the runtime archive whenever its sources change.
    println!("cargo:rerun-if-changed=targets/i386_linux/runtime/Cargo.toml");
    println!("cargo:rerun-if-changed=targets/i386_linux/runtime/src");
    println!("cargo:rerun-if-env-changed=RUSTFLAGS");
    println!("cargo:rerun-if-env-changed=DECAF_RUNTIME_TARGET");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set"));
    let cargo = env::var("CARGO").unwrap_or_else(|_| "cargo".to_string());
    let profile = env::var("PROFILE").expect("PROFILE not set");
    let runtime_target = env::var("DECAF_RUNTIME_TARGET").ok().filter(|t| !t.trim().is_empty());

    let mut rustflags = env::var("RUSTFLAGS").unwrap_or_default();
    if !rustflags.contains("panic=abort") {
        if !rustflags.trim().is_empty() {
            rustflags.push(' ');
        }
        rustflags.push_str("-C panic=abort");
    }

    let mut command = Command::new(&cargo);
    let runtime_target_dir = manifest_dir.join("target").join("runtime-build");

    command
        .current_dir(&manifest_dir)
        .env("RUSTFLAGS", rustflags)
        .env("CARGO_TARGET_DIR", &runtime_target_dir)
        .env_remove("CARGO_MAKEFLAGS")
        .env_remove("MAKEFLAGS")
        .env_remove("CARGO_ENCODED_RUSTFLAGS")
        .args(["build", "-p", "decaf-runtime", "--lib"]);

    let mut features = Vec::new();
    if env::var("CARGO_FEATURE_TELEMETRY").is_ok() {
        features.push("telemetry");
    }
    if env::var("CARGO_FEATURE_DEBUG").is_ok() {
        features.push("debug");
    }
    if env::var("CARGO_FEATURE_TRIM_READ_LINE").is_ok() {
        features.push("trim-read-line");
    }

    if !features.is_empty() {
        command.args(["--features", &features.join(",")]);
    }

    if let Some(target) = &runtime_target {
        command.args(["--target", target]);
    }

    match profile.as_str() {
        "release" => {
            command.arg("--release");
        }
        "debug" => { /* dev profile, no extra flag needed */ }
        other => {
            command.args(["--profile", other]);
        }
    }

    let status = command.status().expect("Failed to invoke cargo build for decaf-runtime");

    if !status.success() {
        panic!("Building decaf-runtime failed with status {}", status);
    }

    let mut lib_dir = runtime_target_dir;
    if let Some(target) = &runtime_target {
        lib_dir.push(target);
    }
    let lib_path = lib_dir.join(profile.as_str()).join("libdecaf_runtime.a");

    if !lib_path.exists() {
        panic!("Expected runtime static library at {}, but it was not found", lib_path.display());
    }

    let lib_path = lib_path.canonicalize().unwrap_or_else(|_| lib_path.clone());

    println!("cargo:rustc-env=DECAF_RUNTIME_LIB={}", lib_path.display());
    println!("cargo:rustc-env=DECAF_RUNTIME_TARGET={}", runtime_target.unwrap_or_default());
}
