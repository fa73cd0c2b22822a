//! Working directory discovery
//!
//! For each conventional name in order: a child directory of the current
//! directory, the current directory itself, then the nearest ancestor that
//! contains a directory with that name.

use std::path::{Path, PathBuf};

/// Locate the bake directory starting from `cwd`
pub fn find_bake_dir(cwd: &Path, names: &[String]) -> Option<PathBuf> {
    for name in names {
        let child = cwd.join(name);
        if child.is_dir() {
            tracing::debug!("Found {} in working directory", child.display());
            return Some(child);
        }

        if cwd.file_name().is_some_and(|base| base == name.as_str()) {
            tracing::debug!("Working directory {} is a bake directory", cwd.display());
            return Some(cwd.to_path_buf());
        }

        if let Some(found) = cwd
            .ancestors()
            .skip(1)
            .map(|ancestor| ancestor.join(name))
            .find(|candidate| candidate.is_dir())
        {
            tracing::debug!("Found {} upwards", found.display());
            return Some(found);
        }
    }
    tracing::debug!("No bake directory found from {}", cwd.display());
    None
}

/// Whether every marker file exists in `dir`
pub fn has_required_files(dir: &Path, markers: &[String]) -> bool {
    for marker in markers {
        let path = dir.join(marker);
        if !path.exists() {
            tracing::debug!("Missing file {}", path.display());
            return false;
        }
    }
    true
}
