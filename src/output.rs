//! Output formatting
//!
//! Domain-agnostic rendering of API payloads. The formatter never validates
//! or reorders what the API returned; `serde_json`'s `preserve_order` keeps
//! object keys in response order all the way through.

use clap::ValueEnum;
use serde_json::{Map, Value};
use std::io::Write;

/// Indentation guide for one tree level
const TREE_INDENT: &str = "│   ";

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// One `name` per line, in API order.
    Names,
    /// Flattened `key.sub[index]=value` lines.
    Dot,
    /// Pretty-printed JSON.
    Json,
    /// YAML document.
    Yaml,
    /// Indented `key: value` tree.
    Tree,
}

/// Render `value` as output lines.
///
/// A `null` payload (empty response body) renders as nothing. Modes that
/// cannot represent the payload fall back to pretty JSON.
pub fn render(value: &Value, mode: OutputMode) -> Vec<String> {
    if value.is_null() {
        return Vec::new();
    }

    match mode {
        OutputMode::Names => match names(value) {
            Some(names) => names,
            None => {
                tracing::debug!("payload has no name fields, rendering as JSON");
                json_lines(value)
            }
        },
        OutputMode::Dot => flatten(value)
            .into_iter()
            .map(|(key, leaf)| {
                // a bare scalar payload has no path
                if key.is_empty() {
                    leaf
                } else {
                    format!("{}={}", key, leaf)
                }
            })
            .collect(),
        OutputMode::Json => json_lines(value),
        OutputMode::Yaml => match serde_yaml::to_string(value) {
            Ok(doc) => doc.lines().map(str::to_string).collect(),
            Err(e) => {
                tracing::warn!("YAML rendering failed ({}), rendering as JSON", e);
                json_lines(value)
            }
        },
        OutputMode::Tree => {
            let mut lines = Vec::new();
            tree(value, "", &mut lines);
            lines
        }
    }
}

/// Write rendered lines, one per line.
pub fn write_lines<W: Write>(writer: &mut W, lines: &[String]) -> std::io::Result<()> {
    for line in lines {
        writeln!(writer, "{}", line)?;
    }
    Ok(())
}

fn json_lines(value: &Value) -> Vec<String> {
    // Serializing a Value cannot fail: all keys are strings.
    let pretty = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    pretty.lines().map(str::to_string).collect()
}

/// Names of a list of objects, if every element carries a string `name`.
fn names(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|item| item.get("name").and_then(Value::as_str).map(str::to_string))
        .collect()
}

/// Text of a scalar leaf. Strings are emitted raw, everything else as JSON.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Flatten nested objects and arrays into `(path, leaf)` pairs, pre-order,
/// keys in input order. Empty containers produce nothing.
pub fn flatten(value: &Value) -> Vec<(String, String)> {
    let mut out = Vec::new();
    flatten_into(value, String::new(), &mut out);
    out
}

fn flatten_into(value: &Value, prefix: String, out: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten_into(child, path, out);
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                flatten_into(child, format!("{}[{}]", prefix, i), out);
            }
        }
        leaf => out.push((prefix, scalar_text(leaf))),
    }
}

fn tree(value: &Value, indent: &str, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            let nested = format!("{}{}", indent, TREE_INDENT);
            for (key, child) in map {
                match child {
                    Value::Object(_) | Value::Array(_) => {
                        out.push(format!("{}{}:", indent, key));
                        tree(child, &nested, out);
                    }
                    leaf => out.push(format!("{}{}: {}", indent, key, scalar_text(leaf))),
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                match item {
                    Value::Object(_) | Value::Array(_) => tree(item, indent, out),
                    leaf => out.push(format!("{}- {}", indent, scalar_text(leaf))),
                }
            }
        }
        leaf => out.push(format!("{}{}", indent, scalar_text(leaf))),
    }
}

/// Extract a value using a dot-notation path. Numeric parts index arrays.
pub fn extract_path<'a>(item: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(item, |current, part| match part.parse::<usize>() {
        Ok(idx) if current.is_array() => current.get(idx),
        _ => current.get(part),
    })
}

/// Keep only the given dot-paths of an object, or of each object in a list.
/// Missing paths map to `null`.
pub fn filter_fields(value: &Value, fields: &[&str]) -> Value {
    let pick = |item: &Value| {
        let mut map = Map::new();
        for field in fields {
            let picked = extract_path(item, field).cloned().unwrap_or(Value::Null);
            map.insert((*field).to_string(), picked);
        }
        Value::Object(map)
    };

    match value {
        Value::Array(items) => Value::Array(items.iter().map(pick).collect()),
        Value::Object(_) => pick(value),
        other => other.clone(),
    }
}
