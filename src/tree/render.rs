//! Command tree rendering
//!
//! Turns the tree into the Go statements inserted into the generated
//! artifact, and into the plain-text listing shown by the host CLI.

use std::collections::HashSet;

use crate::extract::kebab_to_camel;
use crate::source::render::{quote, text_literal};

use super::{CommandNode, CommandTree};

/// Identifiers declared or referenced by the template around the rendered
/// tree, including the predeclared ones a command variable would shadow
const TEMPLATE_IDENTIFIERS: &[&str] = &[
    "opt", "ctx", "cancel", "done", "remaining", "err", "args", "TM", "Logger", "main", "program",
    "errors", "fmt", "io", "log", "os", "getoptions", "dag", "nil", "true", "false", "bool",
    "int", "string",
];

/// Hands out unique Go identifiers for command variables
struct Identifiers {
    taken: HashSet<String>,
}

impl Identifiers {
    fn new() -> Self {
        Self {
            taken: TEMPLATE_IDENTIFIERS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Allocate `name` and `nameFn`, suffixing `_2`, `_3`, ... on collision
    fn allocate(&mut self, segment: &str) -> String {
        let base = go_identifier(segment);
        let mut candidate = base.clone();
        let mut n = 1;
        while self.taken.contains(&candidate) || self.taken.contains(&format!("{}Fn", candidate)) {
            n += 1;
            candidate = format!("{}_{}", base, n);
        }
        self.taken.insert(format!("{}Fn", candidate));
        self.taken.insert(candidate.clone());
        candidate
    }
}

fn go_identifier(segment: &str) -> String {
    let mut ident: String = kebab_to_camel(segment)
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if !ident.starts_with(|c: char| c.is_alphabetic() || c == '_') {
        ident.insert(0, '_');
    }
    ident
}

/// Go statements that build the command tree under the `opt` handle
pub fn render_tree(tree: &CommandTree) -> String {
    let mut out = String::new();
    let mut idents = Identifiers::new();
    render_children(&tree.root, "opt", "", &mut idents, &mut out);
    out
}

fn render_children(
    node: &CommandNode,
    receiver: &str,
    prefix: &str,
    idents: &mut Identifiers,
    out: &mut String,
) {
    for (name, child) in &node.children {
        let path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{}:{}", prefix, name)
        };
        let var = idents.allocate(name);
        out.push_str(&format!(
            "\t{} := {}.NewCommand({}, {})\n",
            var,
            receiver,
            quote(name),
            text_literal(&child.description)
        ));

        if let Some(entry) = &child.entry_point {
            for option in &entry.options {
                out.push_str(&format!("\t// {}\n", option.go_call(&var)));
            }
            out.push_str(&format!("\t{}Fn := {}({})\n", var, entry.function_name, var));
            out.push_str(&format!("\t{}.SetCommandFn({}Fn)\n", var, var));
            out.push_str(&format!("\tTM.Add({}, {}Fn)\n", quote(&path), var));
            out.push('\n');
        }

        render_children(child, &var, &path, idents, out);
    }
}

/// Indented text listing of the tree
///
/// With `with_options` each bound command is followed by its options.
pub fn listing(tree: &CommandTree, with_options: bool) -> String {
    listing_from(&tree.root, 0, with_options)
}

/// Listing of the subtree below `node`, starting at `depth`
pub fn listing_from(node: &CommandNode, depth: usize, with_options: bool) -> String {
    let mut out = String::new();
    write_listing(node, depth, with_options, &mut out);
    out
}

fn write_listing(node: &CommandNode, depth: usize, with_options: bool, out: &mut String) {
    let width = node.children.keys().map(|k| k.len()).max().unwrap_or(0);
    for (name, child) in &node.children {
        let indent = "  ".repeat(depth);
        let summary = child.description.lines().next().unwrap_or_default();
        if summary.is_empty() {
            out.push_str(&format!("{}{}\n", indent, name));
        } else {
            out.push_str(&format!("{}{:<width$}  {}\n", indent, name, summary, width = width));
        }
        if with_options {
            if let Some(entry) = &child.entry_point {
                for option in &entry.options {
                    out.push_str(&format!("{}    {}\n", indent, option));
                }
            }
        }
        write_listing(child, depth + 1, with_options, out);
    }
}
