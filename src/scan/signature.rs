//! Entry-point signature matching
//!
//! An entry point has exactly the shape
//!
//! ```go
//! func Name(opt *getoptions.GetOpt) getoptions.CommandFn
//! ```
//!
//! Types are compared by their printed form, so an aliased import of
//! `getoptions` is not recognised.

use crate::source::render::{named_children, render_type};

use super::Candidate;

/// Printed type of the configuration handle parameter
pub const CONFIG_HANDLE_TYPE: &str = "*getoptions.GetOpt";

/// Printed type of the command callback result
pub const COMMAND_CALLBACK_TYPE: &str = "getoptions.CommandFn";

/// Accepted entry-point signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// Identifier of the configuration handle parameter
    pub config_param: String,
}

/// Check a candidate against the entry-point shape
///
/// Returns `None` for any mismatch; most exported functions are not entry
/// points, so this is not an error.
pub fn match_signature(candidate: &Candidate<'_>) -> Option<Signature> {
    let unit = candidate.unit;
    let params = named_children(candidate.node.child_by_field_name("parameters")?);
    let [param] = params.as_slice() else {
        return None;
    };
    if param.kind() != "parameter_declaration" {
        return None;
    }
    if render_type(param.child_by_field_name("type")?, unit) != CONFIG_HANDLE_TYPE {
        return None;
    }
    let config_param = unit.text(param.child_by_field_name("name")?).to_string();

    let result = candidate.node.child_by_field_name("result")?;
    let result_type = if result.kind() == "parameter_list" {
        let results = named_children(result);
        let [single] = results.as_slice() else {
            return None;
        };
        render_type(single.child_by_field_name("type")?, unit)
    } else {
        render_type(result, unit)
    };
    if result_type != COMMAND_CALLBACK_TYPE {
        return None;
    }

    tracing::debug!(
        "{} matches the entry-point signature (handle '{}')",
        candidate.name(),
        config_param
    );
    Some(Signature { config_param })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::candidates;
    use crate::source::SourceUnit;

    fn matched(source: &str) -> Vec<(String, Option<Signature>)> {
        let unit = SourceUnit::parse("tasks.go", source).unwrap();
        candidates(&unit)
            .map(|c| (c.name().to_string(), match_signature(&c)))
            .collect()
    }

    #[test]
    fn test_accepts_entry_point_shape() {
        let found = matched(
            "package main\n\nfunc Build(cfg *getoptions.GetOpt) getoptions.CommandFn { return nil }\n",
        );
        assert_eq!(
            found,
            vec![(
                "Build".to_string(),
                Some(Signature {
                    config_param: "cfg".to_string()
                })
            )]
        );
    }

    #[test]
    fn test_accepts_parenthesized_result() {
        let found = matched(
            "package main\n\nfunc Build(opt *getoptions.GetOpt) (getoptions.CommandFn) { return nil }\n",
        );
        assert!(found[0].1.is_some());
    }

    #[test]
    fn test_rejects_other_shapes() {
        let source = r#"package main

func NoParams() getoptions.CommandFn { return nil }
func TwoParams(opt *getoptions.GetOpt, x int) getoptions.CommandFn { return nil }
func NotPointer(opt getoptions.GetOpt) getoptions.CommandFn { return nil }
func NoResult(opt *getoptions.GetOpt) {}
func TwoResults(opt *getoptions.GetOpt) (getoptions.CommandFn, error) { return nil, nil }
func WrongResult(opt *getoptions.GetOpt) error { return nil }
func Aliased(opt *g.GetOpt) g.CommandFn { return nil }
func Unnamed(*getoptions.GetOpt) getoptions.CommandFn { return nil }
"#;
        for (name, signature) in matched(source) {
            assert!(signature.is_none(), "{} should not match", name);
        }
    }
}
