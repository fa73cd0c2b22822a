#![forbid(unsafe_code)]

//! # bake
//!
//! Go Build + Something like Make = Bake.
//!
//! Scans a directory of Go task files for functions shaped like
//!
//! ```go
//! func Name(opt *getoptions.GetOpt) getoptions.CommandFn
//! ```
//!
//! reconstructs the options each one declares, arranges them into a command
//! tree and generates the `go-getoptions` wiring that turns the directory
//! into a CLI.
//!
//! ## Example
//!
//! ```rust,no_run
//! use bake::{BakeConfig, Generator, GoToolchain, Indexer};
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = BakeConfig::default();
//!     let dir = Path::new("bakefiles");
//!     let tree = Indexer::new(dir).load_tree()?;
//!
//!     let generator = Generator::new(config.clone(), GoToolchain::system(&config.go_program))?;
//!     generator.generate(dir, &tree)?;
//!     generator.build(dir)?;
//!     Ok(())
//! }
//! ```

pub mod commands;
pub mod config;
pub mod discover;
pub mod dispatch;
pub mod error;
pub mod extract;
pub mod generate;
pub mod index;
pub mod scan;
pub mod source;
pub mod toolchain;
pub mod trace;
pub mod tree;

// Re-exports
pub use config::BakeConfig;
pub use discover::{find_bake_dir, has_required_files};
pub use dispatch::{resolve, Resolution};
pub use error::{BakeError, Result};
pub use extract::{
    camel_to_kebab, entry_point, extract_options, kebab_to_camel, EntryPoint, Modifier,
    ModifierKind, OptionDefault, OptionKind, OptionSpec,
};
pub use generate::{Generator, Staleness};
pub use index::Indexer;
pub use scan::{candidates, match_signature, Candidate, FunctionInfo, Signature};
pub use source::{SourceFiles, SourceUnit};
pub use toolchain::{CommandRunner, GoToolchain, Invocation, SystemRunner};
pub use tree::{CommandNode, CommandTree};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
