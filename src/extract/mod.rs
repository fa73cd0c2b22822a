//! Option extraction
//!
//! Reconstructs the option schema an entry point declares. Only the
//! statements before the function's first `return` are configuration; the
//! returned closure is the command's runtime body.
//!
//! ```go
//! func Asciidoc(opt *getoptions.GetOpt) getoptions.CommandFn {
//!     opt.String("lang", "en", opt.ValidValues("en", "es"))
//!     opt.StringVar(&output, "output", "out.html")
//!     return func(ctx context.Context, opt *getoptions.GetOpt, args []string) error {
//! ```

pub mod naming;
pub mod option;

use std::path::PathBuf;

use console::style;
use serde::Serialize;
use tree_sitter::Node;

use crate::error::{BakeError, Result};
use crate::scan::{match_signature, Candidate, Signature};
use crate::source::render::{literal_text, named_children};
use crate::source::SourceUnit;

pub use naming::{camel_to_kebab, derive_command_name, kebab_to_camel};
pub use option::{
    Binding, Modifier, ModifierKind, OptionDefault, OptionKind, OptionSpec, COLLECTION_MAX,
    COLLECTION_MIN,
};

/// An entry point ready for command-tree insertion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryPoint {
    /// Colon-delimited command path
    pub command_path: String,
    pub description: String,
    /// Go function that builds the command
    pub function_name: String,
    pub file: PathBuf,
    pub options: Vec<OptionSpec>,
}

/// A call made through the configuration handle
#[derive(Debug)]
enum Call<'a> {
    Option {
        kind: OptionKind,
        binding: Binding,
        method: &'a str,
        args: Vec<Node<'a>>,
    },
    Modifier {
        kind: ModifierKind,
        args: Vec<Node<'a>>,
    },
    /// Known getoptions modifier that has no static equivalent
    Unsupported { method: &'a str },
    Unrecognized { method: &'a str },
}

/// Classify a `call_expression` whose receiver is the `handle` identifier
///
/// Returns `None` when the call is made on anything else.
fn parse_call<'a>(call: Node<'a>, handle: &str, unit: &'a SourceUnit) -> Option<Call<'a>> {
    if call.kind() != "call_expression" {
        return None;
    }
    let function = call.child_by_field_name("function")?;
    if function.kind() != "selector_expression" {
        return None;
    }
    let operand = function.child_by_field_name("operand")?;
    if operand.kind() != "identifier" || unit.text(operand) != handle {
        return None;
    }
    let method = unit.text(function.child_by_field_name("field")?);
    let args = call
        .child_by_field_name("arguments")
        .map(named_children)
        .unwrap_or_default();

    if let Some((kind, binding)) = OptionKind::from_method(method) {
        return Some(Call::Option {
            kind,
            binding,
            method,
            args,
        });
    }
    if let Some(kind) = ModifierKind::from_method(method) {
        return Some(Call::Modifier { kind, args });
    }
    if method == "SetCalled" {
        return Some(Call::Unsupported { method });
    }
    Some(Call::Unrecognized { method })
}

/// Statements of a function body in source order
fn body_statements(body: Node<'_>) -> Vec<Node<'_>> {
    named_children(body)
        .into_iter()
        .flat_map(|node| {
            if node.kind() == "statement_list" {
                named_children(node)
            } else {
                vec![node]
            }
        })
        .collect()
}

/// Default argument text: string literals unquoted, identifiers and other
/// basic literals as written, anything else empty
fn default_text(node: Node<'_>, unit: &SourceUnit) -> String {
    match node.kind() {
        "interpreted_string_literal" | "raw_string_literal" | "rune_literal" | "int_literal"
        | "float_literal" | "imaginary_literal" | "identifier" | "true" | "false" | "nil"
        | "iota" => literal_text(node, unit),
        _ => String::new(),
    }
}

/// Extract the option list declared by an accepted entry point
pub fn extract_options(candidate: &Candidate<'_>, signature: &Signature) -> Result<Vec<OptionSpec>> {
    let unit = candidate.unit;
    let handle = signature.config_param.as_str();
    let Some(body) = candidate.node.child_by_field_name("body") else {
        return Ok(Vec::new());
    };

    let mut options = Vec::new();
    for statement in body_statements(body) {
        if statement.kind() == "return_statement" {
            break;
        }
        if statement.kind() != "expression_statement" {
            continue;
        }
        let Some(expression) = named_children(statement).into_iter().next() else {
            continue;
        };

        match parse_call(expression, handle, unit) {
            Some(Call::Option {
                kind,
                binding,
                method,
                args,
            }) => {
                let option = build_option(candidate.name(), kind, binding, method, &args, handle, unit)?;
                tracing::debug!("{}: option {}", candidate.name(), option);
                options.push(option);
            }
            Some(Call::Modifier { kind, .. }) => {
                tracing::debug!(
                    "{}: ignoring top-level {} call",
                    candidate.name(),
                    kind.go_method()
                );
            }
            Some(Call::Unsupported { method }) | Some(Call::Unrecognized { method }) => {
                tracing::debug!("{}: ignoring {}.{}", candidate.name(), handle, method);
            }
            None => {}
        }
    }
    Ok(options)
}

fn build_option(
    function: &str,
    kind: OptionKind,
    binding: Binding,
    method: &str,
    args: &[Node<'_>],
    handle: &str,
    unit: &SourceUnit,
) -> Result<OptionSpec> {
    let missing = |argument| BakeError::MissingArgument {
        function: function.to_string(),
        method: method.to_string(),
        argument,
    };

    let offset = binding.offset();
    let name = args.get(offset).ok_or_else(|| missing("name"))?;
    let default = args.get(offset + 1).ok_or_else(|| missing("default"))?;

    // Collections take `min, max` where scalars take a default
    let first_modifier = offset + if kind.is_collection() { 3 } else { 2 };
    let modifiers = args
        .iter()
        .skip(first_modifier)
        .filter_map(|arg| parse_modifier(*arg, handle, unit))
        .collect();

    Ok(OptionSpec::new(
        kind,
        literal_text(*name, unit),
        default_text(*default, unit),
        modifiers,
    ))
}

fn parse_modifier(arg: Node<'_>, handle: &str, unit: &SourceUnit) -> Option<Modifier> {
    match parse_call(arg, handle, unit)? {
        Call::Modifier { kind, args } => {
            let mut values: Vec<String> = args.iter().map(|a| literal_text(*a, unit)).collect();
            if kind.is_single_valued() {
                if values.is_empty() {
                    return None;
                }
                values.truncate(1);
            }
            Some(Modifier { kind, values })
        }
        Call::Unsupported { method } => {
            eprintln!(
                "{} bake: {} is not implemented",
                style("WARNING:").yellow(),
                method
            );
            None
        }
        Call::Option { .. } | Call::Unrecognized { .. } => None,
    }
}

/// Turn a candidate into an entry point
///
/// `Ok(None)` means the candidate does not have the entry-point signature.
pub fn entry_point(candidate: &Candidate<'_>) -> Result<Option<EntryPoint>> {
    let Some(signature) = match_signature(candidate) else {
        return Ok(None);
    };
    let options = extract_options(candidate, &signature)?;
    let (command_path, description) = derive_command_name(candidate.name(), &candidate.doc());

    Ok(Some(EntryPoint {
        command_path,
        description,
        function_name: candidate.name().to_string(),
        file: candidate.unit.path().to_path_buf(),
        options,
    }))
}
