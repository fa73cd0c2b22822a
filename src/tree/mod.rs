//! Command tree
//!
//! Entry points are inserted under their colon-delimited command path. The
//! tree owns every node; nodes carry no parent links, so callers that need a
//! node's full path pass it down while walking.

pub mod render;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{BakeError, Result};
use crate::extract::{kebab_to_camel, EntryPoint};

pub use render::{listing, listing_from, render_tree};

/// Go keywords; a segment whose identifier form is one of these cannot be
/// used as a command name
pub const RESERVED_WORDS: [&str; 25] = [
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

/// Whether a path segment collides with a reserved word
pub fn is_reserved(segment: &str) -> bool {
    RESERVED_WORDS.contains(&kebab_to_camel(segment).as_str())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CommandNode {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_point: Option<EntryPoint>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<String, CommandNode>,
}

impl CommandNode {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn is_bound(&self) -> bool {
        self.entry_point.is_some()
    }

    pub fn child(&self, segment: &str) -> Option<&CommandNode> {
        self.children.get(segment)
    }
}

/// Tree of commands rooted at an unnamed node
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CommandTree {
    pub root: CommandNode,
}

impl CommandTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    /// Insert an entry point under its command path
    ///
    /// Every segment is validated before any node is created, so a rejected
    /// entry point leaves the tree untouched.
    pub fn insert(&mut self, entry: EntryPoint) -> Result<()> {
        let path = entry.command_path.clone();
        let segments: Vec<&str> = path.split(':').collect();

        for segment in &segments {
            if segment.is_empty() {
                return Err(BakeError::EmptySegment { path: path.clone() });
            }
            if is_reserved(segment) {
                return Err(BakeError::ReservedWord {
                    segment: segment.to_string(),
                    path: path.clone(),
                });
            }
        }
        if let Some(existing) = self.find(&path).and_then(|node| node.entry_point.as_ref()) {
            return Err(BakeError::DuplicateCommand {
                path: path.clone(),
                existing: existing.function_name.clone(),
                function: entry.function_name,
            });
        }

        let mut node = &mut self.root;
        for segment in &segments {
            node = node
                .children
                .entry(segment.to_string())
                .or_insert_with(|| CommandNode::new(segment));
        }
        tracing::debug!("Bound {} to '{}'", entry.function_name, path);
        node.description = entry.description.clone();
        node.entry_point = Some(entry);
        Ok(())
    }

    /// Look up a node by its colon-delimited path
    pub fn find(&self, path: &str) -> Option<&CommandNode> {
        self.find_segments(path.split(':'))
    }

    /// Look up a node by its path segments; no segments means the root
    pub fn find_segments<'s>(&self, segments: impl IntoIterator<Item = &'s str>) -> Option<&CommandNode> {
        segments
            .into_iter()
            .try_fold(&self.root, |node, segment| node.child(segment))
    }

    /// Every node below the root in pre-order, with its full path
    pub fn walk(&self) -> Vec<(String, &CommandNode)> {
        let mut nodes = Vec::new();
        collect(&self.root, "", &mut nodes);
        nodes
    }

    /// Bound entry points in path order
    pub fn entry_points(&self) -> Vec<&EntryPoint> {
        self.walk()
            .into_iter()
            .filter_map(|(_, node)| node.entry_point.as_ref())
            .collect()
    }
}

fn collect<'a>(node: &'a CommandNode, prefix: &str, out: &mut Vec<(String, &'a CommandNode)>) {
    for (name, child) in &node.children {
        let path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{}:{}", prefix, name)
        };
        out.push((path.clone(), child));
        collect(child, &path, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(path: &str, function: &str) -> EntryPoint {
        EntryPoint {
            command_path: path.to_string(),
            description: format!("{} description", function),
            function_name: function.to_string(),
            file: "tasks.go".into(),
            options: vec![],
        }
    }

    #[test]
    fn test_insert_creates_intermediate_nodes() {
        let mut tree = CommandTree::new();
        tree.insert(entry("deploy:app", "DeployApp")).unwrap();

        let deploy = tree.find("deploy").unwrap();
        assert!(!deploy.is_bound());
        assert_eq!(deploy.description, "");
        let app = tree.find("deploy:app").unwrap();
        assert_eq!(app.name, "app");
        assert_eq!(app.entry_point.as_ref().unwrap().function_name, "DeployApp");
    }

    #[test]
    fn test_binding_an_intermediate_node() {
        let mut tree = CommandTree::new();
        tree.insert(entry("deploy:app", "DeployApp")).unwrap();
        tree.insert(entry("deploy", "Deploy")).unwrap();

        let deploy = tree.find("deploy").unwrap();
        assert!(deploy.is_bound());
        assert_eq!(deploy.description, "Deploy description");
        assert_eq!(deploy.children.len(), 1);
    }

    #[test]
    fn test_duplicate_path_is_rejected() {
        let mut tree = CommandTree::new();
        tree.insert(entry("build", "Build")).unwrap();
        let err = tree.insert(entry("build", "BuildAll")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "command 'build' is defined by both Build and BuildAll"
        );
    }

    #[test]
    fn test_reserved_segment_leaves_tree_untouched() {
        let mut tree = CommandTree::new();
        let err = tree.insert(entry("release:go:now", "ReleaseGo")).unwrap_err();
        assert!(matches!(
            err,
            BakeError::ReservedWord { ref segment, ref path } if segment == "go" && path == "release:go:now"
        ));
        assert!(tree.is_empty());
    }

    #[test]
    fn test_empty_segment_is_rejected() {
        let mut tree = CommandTree::new();
        assert!(matches!(
            tree.insert(entry("deploy::app", "DeployApp")),
            Err(BakeError::EmptySegment { .. })
        ));
        assert!(tree.is_empty());
    }

    #[test]
    fn test_is_reserved_uses_identifier_form() {
        assert!(is_reserved("func"));
        assert!(is_reserved("Type"));
        assert!(!is_reserved("fall-through"));
        assert!(!is_reserved("goto-prod"));
        assert!(!is_reserved("deploy"));
    }

    #[test]
    fn test_walk_is_preorder_with_paths() {
        let mut tree = CommandTree::new();
        tree.insert(entry("b", "B")).unwrap();
        tree.insert(entry("a:y", "AY")).unwrap();
        tree.insert(entry("a:x", "AX")).unwrap();

        let paths: Vec<String> = tree.walk().into_iter().map(|(p, _)| p).collect();
        assert_eq!(paths, vec!["a", "a:x", "a:y", "b"]);
        assert_eq!(tree.entry_points().len(), 3);
        assert!(tree.find_segments(Vec::<&str>::new()).is_some());
        assert!(tree.find("a:z").is_none());
    }
}
