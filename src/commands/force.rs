//! `bake _bake force`
//!
//! Invalidates the staleness gate by touching the module descriptor.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use console::style;
use filetime::FileTime;

/// Options for the force command
#[derive(Debug, Clone)]
pub struct ForceOptions {
    pub dir: PathBuf,
    /// File whose modification time is bumped
    pub marker: String,
}

/// Execute the force command
pub fn execute_force(options: ForceOptions) -> Result<()> {
    println!("{} Invalidating bake cache...", style("→").cyan());
    let path = options.dir.join(&options.marker);
    touch(&path).with_context(|| format!("failed to invalidate cache: {}", path.display()))?;
    println!("{} Touched {}", style("✓").green(), path.display());
    Ok(())
}

/// Set a file's modification time to now, creating it if missing
pub fn touch(path: &Path) -> std::io::Result<()> {
    OpenOptions::new().create(true).append(true).open(path)?;
    filetime::set_file_mtime(path, FileTime::now())
}
