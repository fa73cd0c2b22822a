//! `bake _bake tree`

use std::path::PathBuf;

use anyhow::Result;

use crate::index::Indexer;
use crate::tree::listing;

/// Options for the tree command
#[derive(Debug, Clone)]
pub struct TreeOptions {
    pub dir: PathBuf,
    /// Emit JSON instead of text
    pub json: bool,
}

/// Print the command tree with the options of every bound command
pub fn execute_tree(options: TreeOptions) -> Result<()> {
    let tree = Indexer::new(&options.dir).load_tree()?;
    if options.json {
        println!("{}", serde_json::to_string_pretty(&tree)?);
    } else {
        print!("{}", listing(&tree, true));
    }
    Ok(())
}
