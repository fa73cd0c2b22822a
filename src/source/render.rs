//! Go syntax rendering
//!
//! Prints type expressions and signatures in gofmt's canonical spacing so
//! they can be compared against fixed literals, and converts between Go
//! literals and plain strings.

use tree_sitter::Node;

use super::SourceUnit;

/// Named children of a node, comments excluded
pub fn named_children<'a>(node: Node<'a>) -> Vec<Node<'a>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Render a type expression the way `go/printer` would
pub fn render_type(node: Node<'_>, unit: &SourceUnit) -> String {
    let field = |name: &str| {
        node.child_by_field_name(name)
            .map(|child| render_type(child, unit))
            .unwrap_or_default()
    };

    match node.kind() {
        "pointer_type" => match named_children(node).first() {
            Some(inner) => format!("*{}", render_type(*inner, unit)),
            None => collapse_whitespace(unit.text(node)),
        },
        "qualified_type" => format!("{}.{}", field("package"), field("name")),
        "slice_type" => format!("[]{}", field("element")),
        "array_type" => {
            let length = node
                .child_by_field_name("length")
                .map(|n| collapse_whitespace(unit.text(n)))
                .unwrap_or_default();
            format!("[{}]{}", length, field("element"))
        }
        "map_type" => format!("map[{}]{}", field("key"), field("value")),
        "parenthesized_type" => match named_children(node).first() {
            Some(inner) => format!("({})", render_type(*inner, unit)),
            None => collapse_whitespace(unit.text(node)),
        },
        "function_type" => {
            let mut out = String::from("func");
            if let Some(params) = node.child_by_field_name("parameters") {
                out.push_str(&render_parameters(params, unit));
            }
            if let Some(result) = node.child_by_field_name("result") {
                out.push(' ');
                out.push_str(&render_result(result, unit));
            }
            out
        }
        _ => collapse_whitespace(unit.text(node)),
    }
}

/// Render a `parameter_list` including its parentheses
pub fn render_parameters(list: Node<'_>, unit: &SourceUnit) -> String {
    let params: Vec<String> = named_children(list)
        .into_iter()
        .map(|param| render_parameter(param, unit))
        .collect();
    format!("({})", params.join(", "))
}

fn render_parameter(param: Node<'_>, unit: &SourceUnit) -> String {
    let mut cursor = param.walk();
    let names: Vec<&str> = param
        .children_by_field_name("name", &mut cursor)
        .map(|name| unit.text(name))
        .collect();
    let ty = param
        .child_by_field_name("type")
        .map(|ty| render_type(ty, unit))
        .unwrap_or_default();
    let ty = if param.kind() == "variadic_parameter_declaration" {
        format!("...{}", ty)
    } else {
        ty
    };

    if names.is_empty() {
        ty
    } else {
        format!("{} {}", names.join(", "), ty)
    }
}

/// Render a function result, either a bare type or a parameter list
pub fn render_result(result: Node<'_>, unit: &SourceUnit) -> String {
    if result.kind() == "parameter_list" {
        render_parameters(result, unit)
    } else {
        render_type(result, unit)
    }
}

/// Render the type of a function declaration, e.g. `func(opt *getoptions.GetOpt) getoptions.CommandFn`
pub fn render_signature(decl: Node<'_>, unit: &SourceUnit) -> String {
    let mut out = String::from("func");
    if let Some(type_params) = decl.child_by_field_name("type_parameters") {
        out.push_str(&collapse_whitespace(unit.text(type_params)));
    }
    match decl.child_by_field_name("parameters") {
        Some(params) => out.push_str(&render_parameters(params, unit)),
        None => out.push_str("()"),
    }
    if let Some(result) = decl.child_by_field_name("result") {
        out.push(' ');
        out.push_str(&render_result(result, unit));
    }
    out
}

/// Text of a literal argument: string literals are unquoted, anything else
/// is returned as written
pub fn literal_text(node: Node<'_>, unit: &SourceUnit) -> String {
    let raw = unit.text(node);
    match node.kind() {
        "interpreted_string_literal" | "raw_string_literal" | "rune_literal" => {
            unquote(raw).unwrap_or_else(|| raw.to_string())
        }
        _ => raw.to_string(),
    }
}

/// Interpret a Go string, raw string or rune literal
pub fn unquote(literal: &str) -> Option<String> {
    if literal.len() < 2 {
        return None;
    }
    let quote = literal.chars().next()?;
    if !literal.ends_with(quote) {
        return None;
    }
    let body = &literal[1..literal.len() - 1];

    match quote {
        '`' => {
            if body.contains('`') {
                return None;
            }
            Some(body.replace('\r', ""))
        }
        '"' | '\'' => {
            let value = unescape(body, quote)?;
            if quote == '\'' && value.chars().count() != 1 {
                return None;
            }
            Some(value)
        }
        _ => None,
    }
}

fn unescape(body: &str, quote: char) -> Option<String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        if c == quote || c == '\n' {
            return None;
        }
        if c != '\\' {
            out.push(c);
            continue;
        }
        let escaped = chars.next()?;
        match escaped {
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0C}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\u{0B}'),
            '\\' => out.push('\\'),
            '\'' | '"' if escaped == quote => out.push(escaped),
            'x' => out.push(hex_escape(&mut chars, 2)?),
            'u' => out.push(hex_escape(&mut chars, 4)?),
            'U' => out.push(hex_escape(&mut chars, 8)?),
            '0'..='7' => {
                let mut value = escaped.to_digit(8)?;
                for _ in 0..2 {
                    value = value * 8 + chars.next()?.to_digit(8)?;
                }
                if value > 255 {
                    return None;
                }
                out.push(char::from_u32(value)?);
            }
            _ => return None,
        }
    }
    Some(out)
}

fn hex_escape(chars: &mut std::str::Chars<'_>, digits: usize) -> Option<char> {
    let mut value = 0u32;
    for _ in 0..digits {
        value = value * 16 + chars.next()?.to_digit(16)?;
    }
    char::from_u32(value)
}

/// Quote a string as a Go interpreted string literal
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c == '\u{7F}' => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Go literal for free text: a raw string when possible, quoted otherwise
pub fn text_literal(value: &str) -> String {
    if value.contains('`') || value.contains('\r') {
        quote(value)
    } else {
        format!("`{}`", value)
    }
}
