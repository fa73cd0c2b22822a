//! Command name derivation
//!
//! A function documented as `// deploy:app - Deploys the application` is
//! registered as `deploy:app` with that description. Any other function is
//! registered under the kebab-case form of its identifier, without a
//! description.

use std::sync::LazyLock;

use regex::Regex;

/// Doc text that starts with a command name followed by ` -`
static DESCRIPTION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?-u:\w)\S+ -").unwrap());

/// `AbCdEf` -> `ab-cd-ef`; a dash goes before every upper-case letter that
/// follows a non-upper-case one
pub fn camel_to_kebab(camel: &str) -> String {
    let mut out = String::with_capacity(camel.len() + 4);
    let mut prev_upper = true;
    for (i, ch) in camel.chars().enumerate() {
        let upper = ch.is_uppercase();
        if upper && i > 0 && !prev_upper {
            out.push('-');
        }
        out.extend(ch.to_lowercase());
        prev_upper = upper;
    }
    out
}

/// `ab-cd-ef` -> `abCdEf`; everything else is lower-cased
pub fn kebab_to_camel(kebab: &str) -> String {
    let mut out = String::with_capacity(kebab.len());
    let mut upper_next = false;
    for ch in kebab.chars() {
        if ch == '-' {
            upper_next = true;
            continue;
        }
        if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.extend(ch.to_lowercase());
        }
    }
    out
}

/// Command path and description for an entry point
pub fn derive_command_name(function_name: &str, doc: &str) -> (String, String) {
    let doc = doc.trim();
    if DESCRIPTION_PATTERN.is_match(doc) {
        let name = doc.split(' ').next().unwrap_or_default();
        let description = doc
            .strip_prefix(name)
            .and_then(|rest| rest.strip_prefix(" -"))
            .unwrap_or_default()
            .trim();
        return (name.to_string(), description.to_string());
    }
    (camel_to_kebab(function_name), String::new())
}
