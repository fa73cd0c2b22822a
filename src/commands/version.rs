//! `bake _bake version`

use std::path::PathBuf;

use anyhow::Result;

use crate::toolchain::GoToolchain;
use crate::VERSION;

/// Build metadata recorded by the build script
pub fn build_info() -> Vec<(&'static str, &'static str)> {
    vec![
        ("target", env!("BAKE_BUILD_TARGET")),
        ("profile", env!("BAKE_BUILD_PROFILE")),
        ("rustc", env!("BAKE_BUILD_RUSTC")),
    ]
}

/// Options for the version command
#[derive(Debug, Clone)]
pub struct VersionOptions {
    /// Directory `go version` runs in
    pub dir: PathBuf,
}

/// Execute the version command
pub fn execute_version(options: VersionOptions, go: &GoToolchain) -> Result<()> {
    println!("bake version {}", VERSION);
    for (key, value) in build_info() {
        println!("{:>14} {}", key, value);
    }
    match go.version(&options.dir) {
        Ok(version) => println!("{}", version),
        Err(e) => tracing::debug!("go version unavailable: {}", e),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_info_is_recorded() {
        let info = build_info();
        assert_eq!(info.len(), 3);
        assert!(info.iter().all(|(_, value)| !value.is_empty()));
    }
}
