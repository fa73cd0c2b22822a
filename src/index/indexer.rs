//! Directory indexing
//!
//! Drives loader, scanner, matcher and extractor over a bake directory. Each
//! stage pulls from the previous one, and the first error ends the run.

use std::path::Path;

use crate::error::Result;
use crate::extract::{entry_point, EntryPoint};
use crate::scan::{candidates, FunctionInfo};
use crate::source::SourceFiles;
use crate::tree::CommandTree;

/// Indexes the Go sources of one bake directory
#[derive(Debug, Clone)]
pub struct Indexer<'a> {
    dir: &'a Path,
}

impl<'a> Indexer<'a> {
    pub fn new(dir: &'a Path) -> Self {
        Self { dir }
    }

    /// Every exported function, entry point or not
    pub fn list_functions(&self) -> Result<Vec<FunctionInfo>> {
        let mut functions = Vec::new();
        for unit in SourceFiles::open(self.dir)? {
            let unit = unit?;
            functions.extend(candidates(&unit).map(|c| c.describe()));
        }
        Ok(functions)
    }

    /// Entry points in file order
    pub fn entry_points(&self) -> Result<Vec<EntryPoint>> {
        let mut found = Vec::new();
        for unit in SourceFiles::open(self.dir)? {
            let unit = unit?;
            for candidate in candidates(&unit) {
                if let Some(entry) = entry_point(&candidate)? {
                    tracing::debug!(
                        "{}: {} -> '{}' ({} options)",
                        unit.path().display(),
                        entry.function_name,
                        entry.command_path,
                        entry.options.len()
                    );
                    found.push(entry);
                }
            }
        }
        Ok(found)
    }

    /// Build the command tree for the directory
    pub fn load_tree(&self) -> Result<CommandTree> {
        let mut tree = CommandTree::new();
        for entry in self.entry_points()? {
            tree.insert(entry)?;
        }
        Ok(tree)
    }
}
