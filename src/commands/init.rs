//! `bake _bake init`
//!
//! Scaffolds a bake directory: Go module, workspace, runtime libraries and an
//! initial generated file with no commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use console::style;

use crate::generate::Generator;
use crate::toolchain::RUNTIME_LIBRARIES;
use crate::tree::CommandTree;

/// Module name given to a new bake directory
pub const MODULE_NAME: &str = "bake";

/// Options for the init command
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Directory to create
    pub dir: PathBuf,
}

/// Execute the init command
///
/// Toolchain failures are reported and skipped; only writing the generated
/// file is fatal.
pub fn execute_init(options: InitOptions, generator: &Generator) -> Result<()> {
    let dir = &options.dir;
    println!(
        "{} Initializing bake project in {}",
        style("→").cyan(),
        dir.display()
    );
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;

    let go = generator.toolchain();
    let steps = [
        ("go mod init", go.mod_init(dir, MODULE_NAME)),
        ("go work init", go.work_init(dir)),
        ("go work use", go.work_use(dir)),
    ];
    for (step, result) in steps {
        if let Err(e) = result {
            tracing::warn!("{} failed: {}", step, e);
        }
    }
    for library in RUNTIME_LIBRARIES {
        if let Err(e) = go.get_update(dir, &[*library]) {
            tracing::warn!("go get {} failed: {}", library, e);
        }
    }

    generator
        .write(dir, &CommandTree::new())
        .context("failed to generate file")?;
    println!(
        "{} Wrote {}",
        style("✓").green(),
        dir.join(&generator.config().generated_file).display()
    );
    Ok(())
}
