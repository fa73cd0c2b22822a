//! Argument resolution against the command tree

use crate::extract::EntryPoint;
use crate::tree::{CommandNode, CommandTree};

/// What the leading arguments name
#[derive(Debug)]
pub enum Resolution<'a> {
    /// A bound command; `depth` arguments make up its path
    Command {
        node: &'a CommandNode,
        entry: &'a EntryPoint,
        depth: usize,
    },
    /// An intermediate node without an entry point
    Group { node: &'a CommandNode, path: String },
    /// The first argument names no command
    Unknown { name: String },
    /// No positional arguments
    Empty,
}

/// Resolve the longest prefix of `args` that names a node
///
/// Resolution stops at the first option-like argument.
pub fn resolve<'a>(tree: &'a CommandTree, args: &[String]) -> Resolution<'a> {
    let mut node = &tree.root;
    let mut path: Vec<&str> = Vec::new();

    for arg in args {
        if arg.starts_with('-') {
            break;
        }
        match node.child(arg) {
            Some(child) => {
                node = child;
                path.push(arg);
            }
            None => break,
        }
    }

    if path.is_empty() {
        return match args.first() {
            Some(first) if !first.starts_with('-') => Resolution::Unknown {
                name: first.clone(),
            },
            _ => Resolution::Empty,
        };
    }

    match &node.entry_point {
        Some(entry) => Resolution::Command {
            node,
            entry,
            depth: path.len(),
        },
        None => Resolution::Group {
            node,
            path: path.join(":"),
        },
    }
}
