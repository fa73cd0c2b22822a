//! Build script that records build metadata for `bake _bake version`.
//!
//! The values are exposed to the crate as `BAKE_BUILD_*` environment variables
//! read with `env!()` at compile time.

use std::env;
use std::process::Command;

fn rustc_version() -> String {
    let rustc = env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
    Command::new(rustc)
        .arg("--version")
        .output()
        .ok()
        .filter(|out| out.status.success())
        .map(|out| String::from_utf8_lossy(&out.stdout).trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn main() {
    let target = env::var("TARGET").unwrap_or_else(|_| "unknown".to_string());
    let profile = env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());

    println!("cargo:rustc-env=BAKE_BUILD_TARGET={}", target);
    println!("cargo:rustc-env=BAKE_BUILD_PROFILE={}", profile);
    println!("cargo:rustc-env=BAKE_BUILD_RUSTC={}", rustc_version());

    // Only the script itself influences the recorded values
    println!("cargo:rerun-if-changed=build.rs");
}
