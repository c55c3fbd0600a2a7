//! Placeholder interpolation for prompt templates.
//!
//! Templates reference variables with `{{name}}` tokens. Matching is literal:
//! `{{ name }}` (with spaces) is a different token from `{{name}}`.

use serde_json::{Map, Value};

/// Caller-supplied values for one rendering, keyed by variable name.
///
/// Insertion order is preserved, so object values serialize with their keys
/// in the order the caller supplied them.
pub type VariableBag = Map<String, Value>;

/// Substitute `{{key}}` tokens with values from `variables`.
///
/// Only keys present in the bag are replaced; unknown placeholders are left
/// in the output as written. The template is scanned once from left to right
/// and substituted text is never rescanned, so a value containing `{{other}}`
/// comes through verbatim.
pub fn interpolate(template: &str, variables: &VariableBag) -> String {
    if variables.is_empty() {
        return template.to_string();
    }

    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        output.push_str(&rest[..start]);

        let after_open = &rest[start + 2..];
        let Some(end) = after_open.find("}}") else {
            rest = &rest[start..];
            break;
        };

        match variables.get(&after_open[..end]) {
            Some(value) => {
                output.push_str(&render_value(value));
                rest = &after_open[end + 2..];
            }
            None => {
                // Emit one brace and resume, so `{{{x}}}` still finds `{{x}}`
                output.push('{');
                rest = &rest[start + 1..];
            }
        }
    }

    output.push_str(rest);
    output
}

/// Distinct placeholder names in order of first appearance.
///
/// A name is the literal text between `{{` and the next `}}`, the same token
/// `interpolate` looks up, so `{{icp name}}` yields `icp name`. Empty tokens
/// and tokens containing a brace are skipped.
pub fn placeholders(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        let after_open = &rest[start + 2..];
        let Some(end) = after_open.find("}}") else {
            break;
        };

        let name = &after_open[..end];
        if name.is_empty() || name.contains(['{', '}']) {
            rest = &rest[start + 1..];
            continue;
        }

        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
        rest = &after_open[end + 2..];
    }

    names
}

/// String form of a variable value as it appears in a rendered prompt
fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(render_value)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
        Value::Bool(_) | Value::Number(_) => value.to_string(),
    }
}
