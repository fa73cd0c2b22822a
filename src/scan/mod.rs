//! Entry-point scanning
//!
//! Yields every exported top-level function of a source unit together with
//! its doc comment and printed signature. Which of them are real entry points
//! is decided by [`signature::match_signature`].

pub mod signature;

use std::path::PathBuf;

use serde::Serialize;
use tree_sitter::Node;

use crate::source::render::{named_children, render_signature};
use crate::source::SourceUnit;

pub use signature::{match_signature, Signature, COMMAND_CALLBACK_TYPE, CONFIG_HANDLE_TYPE};

/// An exported top-level function
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    /// Function declaration node
    pub node: Node<'a>,
    /// Unit that owns the node
    pub unit: &'a SourceUnit,
}

impl<'a> Candidate<'a> {
    /// Function identifier
    pub fn name(&self) -> &'a str {
        self.node
            .child_by_field_name("name")
            .map(|name| self.unit.text(name))
            .unwrap_or_default()
    }

    /// Doc comment text, comment markers stripped and trimmed
    pub fn doc(&self) -> String {
        doc_comment(self.node, self.unit)
    }

    /// Printed function type
    pub fn signature(&self) -> String {
        render_signature(self.node, self.unit)
    }

    /// Owned summary used by listings
    pub fn describe(&self) -> FunctionInfo {
        FunctionInfo {
            file: self.unit.path().to_path_buf(),
            name: self.name().to_string(),
            signature: self.signature(),
            doc: self.doc(),
        }
    }
}

/// Listing row for an exported function
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionInfo {
    pub file: PathBuf,
    pub name: String,
    #[serde(rename = "type")]
    pub signature: String,
    pub doc: String,
}

/// Go's exported-identifier rule: the first character is upper case
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// Pull iterator over the exported functions of one unit
pub struct Candidates<'a> {
    unit: &'a SourceUnit,
    decls: std::vec::IntoIter<Node<'a>>,
}

/// Scan a unit for exported top-level functions
pub fn candidates(unit: &SourceUnit) -> Candidates<'_> {
    Candidates {
        unit,
        decls: named_children(unit.root()).into_iter(),
    }
}

impl<'a> Iterator for Candidates<'a> {
    type Item = Candidate<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        for node in self.decls.by_ref() {
            if node.kind() != "function_declaration" {
                continue;
            }
            let candidate = Candidate {
                node,
                unit: self.unit,
            };
            if is_exported(candidate.name()) {
                return Some(candidate);
            }
        }
        None
    }
}

/// Collect the comment group that ends on the line right above `decl`
fn doc_comment(decl: Node<'_>, unit: &SourceUnit) -> String {
    let mut comments = Vec::new();
    let mut next_row = decl.start_position().row;
    let mut current = decl.prev_named_sibling();

    while let Some(node) = current {
        if node.kind() != "comment" || node.end_position().row + 1 != next_row {
            break;
        }
        // A comment trailing code on the same line is not part of the doc
        let before = node.prev_named_sibling();
        if let Some(before) = before {
            if before.kind() != "comment" && before.end_position().row == node.start_position().row {
                break;
            }
        }
        comments.push(node);
        next_row = node.start_position().row;
        current = before;
    }

    let lines: Vec<String> = comments
        .iter()
        .rev()
        .flat_map(|node| comment_lines(unit.text(*node)))
        .collect();
    lines.join("\n").trim().to_string()
}

fn comment_lines(raw: &str) -> Vec<String> {
    if let Some(rest) = raw.strip_prefix("//") {
        if rest.starts_with("go:") {
            return Vec::new();
        }
        let line = rest.strip_prefix(' ').unwrap_or(rest);
        return vec![line.trim_end().to_string()];
    }

    let inner = raw
        .strip_prefix("/*")
        .and_then(|r| r.strip_suffix("*/"))
        .unwrap_or(raw);
    inner.lines().map(|l| l.trim_end().to_string()).collect()
}
