//! Error types
//!
//! Every pipeline stage returns [`Result`]. Expected non-matches (functions
//! with the wrong signature, unknown modifier calls, generated files) are not
//! errors and never reach this type.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while scanning, extracting, building the command tree or
/// generating the wiring code.
#[derive(Debug, Error)]
pub enum BakeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to list directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("failed to load Go grammar: {0}")]
    Language(String),

    #[error("failed to parse file {}: syntax error at {line}:{column}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        column: usize,
    },

    #[error("{function}: {method} call is missing the {argument} argument")]
    MissingArgument {
        function: String,
        method: String,
        argument: &'static str,
    },

    #[error("command name '{segment}' in '{path}' is a reserved Go keyword")]
    ReservedWord { segment: String, path: String },

    #[error("command path '{path}' contains an empty segment")]
    EmptySegment { path: String },

    #[error("command '{path}' is defined by both {existing} and {function}")]
    DuplicateCommand {
        path: String,
        existing: String,
        function: String,
    },

    #[error("failed to parse template: {0}")]
    TemplateParse(#[from] Box<handlebars::TemplateError>),

    #[error("failed to render template: {0}")]
    TemplateRender(#[from] handlebars::RenderError),

    #[error("`{command}` failed: {detail}")]
    Toolchain { command: String, detail: String },
}

pub type Result<T> = std::result::Result<T, BakeError>;
