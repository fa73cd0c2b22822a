//! Configuration
//!
//! Project conventions (directory names, marker files, artifact names, the
//! Go toolchain binary). Every field has a default so an absent or partial
//! `.bake.config.json` behaves like the stock layout.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file, looked up in the current working directory
pub const DEFAULT_CONFIG_FILE: &str = ".bake.config.json";

fn default_dir_names() -> Vec<String> {
    vec!["bakefiles".to_string(), "bake".to_string()]
}

fn default_generated_file() -> String {
    "generated_bake.go".to_string()
}

fn default_binary_name() -> String {
    "bake".to_string()
}

fn default_marker_files() -> Vec<String> {
    vec![
        "go.mod".to_string(),
        "go.sum".to_string(),
        "go.work".to_string(),
    ]
}

fn default_source_patterns() -> Vec<String> {
    vec![
        "*.go".to_string(),
        "go.mod".to_string(),
        "go.sum".to_string(),
    ]
}

fn default_go_program() -> String {
    "go".to_string()
}

fn default_trace_env() -> String {
    "BAKE_TRACE".to_string()
}

/// Bake configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BakeConfig {
    /// Working directory names, searched in order
    #[serde(default = "default_dir_names")]
    pub dir_names: Vec<String>,

    /// Name of the generated Go source file
    #[serde(default = "default_generated_file")]
    pub generated_file: String,

    /// Name of the compiled task binary
    #[serde(default = "default_binary_name")]
    pub binary_name: String,

    /// Files that must exist before the directory is scanned
    #[serde(default = "default_marker_files")]
    pub marker_files: Vec<String>,

    /// Glob patterns whose modification times gate regeneration
    #[serde(default = "default_source_patterns")]
    pub source_patterns: Vec<String>,

    /// Go toolchain executable
    #[serde(default = "default_go_program")]
    pub go_program: String,

    /// Environment variable that turns on debug tracing
    #[serde(default = "default_trace_env")]
    pub trace_env: String,
}

impl Default for BakeConfig {
    fn default() -> Self {
        Self {
            dir_names: default_dir_names(),
            generated_file: default_generated_file(),
            binary_name: default_binary_name(),
            marker_files: default_marker_files(),
            source_patterns: default_source_patterns(),
            go_program: default_go_program(),
            trace_env: default_trace_env(),
        }
    }
}

impl BakeConfig {
    /// Load config from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save config to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load `path` if it exists, defaults otherwise
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Whether the debug trace toggle is set in the environment
    pub fn trace_enabled(&self) -> bool {
        std::env::var_os(&self.trace_env).is_some_and(|v| !v.is_empty())
    }
}
