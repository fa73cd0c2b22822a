//! Source loading
//!
//! Lists the Go files of a bake directory and parses each one with
//! tree-sitter. Files are parsed lazily, one per call to `next()`, and the
//! first parse failure ends the sequence.

pub mod render;

use std::fs;
use std::path::{Path, PathBuf};

use tree_sitter::{Node, Parser, Tree};
use walkdir::WalkDir;

use crate::error::{BakeError, Result};

/// Marker that identifies outputs of a previous generation run
pub const GENERATED_MARKER: &str = "generated";

/// One parsed Go file: the source text and its syntax tree
pub struct SourceUnit {
    path: PathBuf,
    source: String,
    tree: Tree,
}

impl std::fmt::Debug for SourceUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceUnit")
            .field("path", &self.path)
            .field("bytes", &self.source.len())
            .finish()
    }
}

impl SourceUnit {
    /// Parse a Go source held in memory
    pub fn parse(path: impl Into<PathBuf>, source: impl Into<String>) -> Result<Self> {
        let mut parser = go_parser()?;
        parse_with(&mut parser, path.into(), source.into())
    }

    /// Path the unit was read from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Root `source_file` node
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Source text covered by a node of this unit
    pub fn text(&self, node: Node<'_>) -> &str {
        &self.source[node.byte_range()]
    }
}

/// Create a tree-sitter parser loaded with the Go grammar
fn go_parser() -> Result<Parser> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_go::LANGUAGE.into())
        .map_err(|e| BakeError::Language(e.to_string()))?;
    Ok(parser)
}

fn parse_with(parser: &mut Parser, path: PathBuf, source: String) -> Result<SourceUnit> {
    let tree = match parser.parse(&source, None) {
        Some(tree) => tree,
        None => {
            return Err(BakeError::Parse {
                path,
                line: 0,
                column: 0,
            })
        }
    };

    if let Some(node) = first_error(tree.root_node()) {
        let position = node.start_position();
        return Err(BakeError::Parse {
            path,
            line: position.row + 1,
            column: position.column + 1,
        });
    }

    Ok(SourceUnit { path, source, tree })
}

/// Locate the first ERROR or MISSING node in document order
fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

/// Whether a file name belongs to the scanned source set
fn is_source_file(name: &str) -> bool {
    name.ends_with(".go") && !name.ends_with("_test.go")
}

/// Lazy sequence of parsed source units for one directory
///
/// Listing happens when the sequence is opened; reading and parsing happen
/// per item. After an error the sequence is exhausted.
pub struct SourceFiles {
    parser: Parser,
    pending: std::vec::IntoIter<PathBuf>,
    failed: bool,
}

impl SourceFiles {
    /// List the Go files directly inside `dir`, skipping generated files
    pub fn open(dir: &Path) -> Result<Self> {
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
            if !is_source_file(&name) {
                continue;
            }
            if name.contains(GENERATED_MARKER) {
                tracing::debug!("Skipping generated file {}", entry.path().display());
                continue;
            }
            files.push(entry.path().to_path_buf());
        }
        tracing::debug!("Found {} source files in {}", files.len(), dir.display());

        Ok(Self {
            parser: go_parser()?,
            pending: files.into_iter(),
            failed: false,
        })
    }
}

impl Iterator for SourceFiles {
    type Item = Result<SourceUnit>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let path = self.pending.next()?;
        tracing::debug!("Parsing {}", path.display());

        let result = fs::read_to_string(&path)
            .map_err(BakeError::from)
            .and_then(|source| parse_with(&mut self.parser, path, source));
        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }
}
