//! CLI command implementations
//!
//! The maintenance commands live under the hidden `_bake` group; everything
//! else is dispatched to the task binary by [`run`].

pub mod force;
pub mod init;
pub mod list_fns;
pub mod run;
pub mod tree;
pub mod version;

pub use force::{execute_force, ForceOptions};
pub use init::{execute_init, InitOptions};
pub use list_fns::{execute_list_fns, ListFnsOptions};
pub use run::{execute_help, execute_run, RunOptions};
pub use tree::{execute_tree, TreeOptions};
pub use version::{execute_version, VersionOptions};
