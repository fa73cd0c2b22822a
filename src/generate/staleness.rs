//! Staleness gate
//!
//! Compares modification times of the source set against generated targets.
//! Only the top level of the working directory is considered.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use glob::Pattern;
use walkdir::WalkDir;

use crate::error::Result;

/// Outcome of a staleness check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Staleness {
    /// Whether the targets need to be rebuilt
    pub modified: bool,
    /// Sources newer than the oldest target, or every source when a target
    /// is missing
    pub newer: Vec<PathBuf>,
}

fn modified_at(path: &Path) -> Result<Option<SystemTime>> {
    match fs::metadata(path) {
        Ok(meta) => Ok(Some(meta.modified()?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn timestamp(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).to_rfc3339()
}

/// Files directly inside `dir` matching any of the glob `patterns`
pub fn source_files(dir: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let patterns = patterns
        .iter()
        .map(|p| Pattern::new(p))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if patterns.iter().any(|p| p.matches(&name)) {
            files.push(entry.path().to_path_buf());
        }
    }
    Ok(files)
}

/// Check whether any of `targets` (file names in `dir`) is missing or older
/// than a file matched by `sources`
pub fn check(dir: &Path, targets: &[&str], sources: &[String]) -> Result<Staleness> {
    let files = source_files(dir, sources)?;

    let mut oldest: Option<SystemTime> = None;
    for target in targets {
        let path = dir.join(target);
        match modified_at(&path)? {
            Some(time) => {
                tracing::debug!("{} modified at {}", path.display(), timestamp(time));
                oldest = Some(oldest.map_or(time, |o| o.min(time)));
            }
            None => {
                tracing::debug!("{} does not exist", path.display());
                return Ok(Staleness {
                    modified: true,
                    newer: files,
                });
            }
        }
    }
    let Some(oldest) = oldest else {
        return Ok(Staleness {
            modified: false,
            newer: Vec::new(),
        });
    };

    let mut newer = Vec::new();
    for file in files {
        // Targets can match the source patterns themselves
        if targets.iter().any(|t| dir.join(t) == file) {
            continue;
        }
        if let Some(time) = modified_at(&file)? {
            if time > oldest {
                tracing::debug!("{} is newer ({})", file.display(), timestamp(time));
                newer.push(file);
            }
        }
    }
    Ok(Staleness {
        modified: !newer.is_empty(),
        newer,
    })
}
