//! Typed deserialization of payload documents.
//!
//! Records derive [`serde::Deserialize`]; this module runs them through
//! `serde_path_to_error` and turns the first failure into a
//! [`ValidationError`] naming the offending field.

use std::fmt::Write;

use serde::de::DeserializeOwned;
use serde_json::Value;
use serde_path_to_error::{Path, Segment};

use crate::error::{ErrorCode, Result, ValidationError, describe};

/// Deserializes a document whose root must be an object.
pub(crate) fn decode<T: DeserializeOwned>(payload: &Value) -> Result<T> {
    if !payload.is_object() {
        return Err(ValidationError::mismatch(ROOT, "object", payload));
    }
    serde_path_to_error::deserialize(payload)
        .map_err(|err| to_validation_error(err.path(), &err.inner().to_string(), payload))
}

const ROOT: &str = "(root)";

fn to_validation_error(path: &Path, message: &str, payload: &Value) -> ValidationError {
    let at = render(path);

    if let Some(field) = quoted(message, "missing field ") {
        return ValidationError::missing(join(&at, field), "value");
    }
    if let Some(field) = quoted(message, "duplicate field ") {
        return ValidationError::invalid(
            ErrorCode::E101,
            join(&at, field),
            "single key",
            "duplicate key",
        );
    }

    let found = locate(path, payload);
    let at = if at.is_empty() { ROOT.to_string() } else { at };

    // Edge relations are the only closed string set in either payload.
    if quoted(message, "unknown variant ").is_some() {
        let actual = found.map_or_else(|| "missing".to_string(), describe);
        return ValidationError::invalid(ErrorCode::E104, at, "edge type", actual);
    }

    let expected = message
        .split_once(", expected ")
        .map_or("valid value", |(_, expected)| expected);
    match found {
        Some(value) => ValidationError::mismatch(at, type_name(expected), value),
        None => ValidationError::invalid(ErrorCode::E101, at, type_name(expected), "missing"),
    }
}

/// Renders a path as `vpcs[0].subnets[1].name`. The root renders empty.
fn render(path: &Path) -> String {
    let mut rendered = String::new();
    for segment in path.iter() {
        match segment {
            Segment::Seq { index } => {
                let _ = write!(rendered, "[{index}]");
            }
            Segment::Map { key } => {
                if !rendered.is_empty() {
                    rendered.push('.');
                }
                rendered.push_str(key);
            }
            _ => {}
        }
    }
    rendered
}

fn join(path: &str, field: &str) -> String {
    if path.is_empty() {
        field.to_string()
    } else {
        format!("{path}.{field}")
    }
}

/// Returns the first backquoted word after `prefix`.
fn quoted<'m>(message: &'m str, prefix: &str) -> Option<&'m str> {
    let rest = message.strip_prefix(prefix)?.strip_prefix('`')?;
    rest.split_once('`').map(|(word, _)| word)
}

fn locate<'v>(path: &Path, payload: &'v Value) -> Option<&'v Value> {
    path.iter().try_fold(payload, |value, segment| match segment {
        Segment::Seq { index } => value.get(*index),
        Segment::Map { key } => value.get(key.as_str()),
        _ => Some(value),
    })
}

/// Maps serde's expectation wording onto JSON type names.
fn type_name(expected: &str) -> &str {
    match expected {
        "a string" => "string",
        "a boolean" => "boolean",
        "a sequence" => "array",
        "a map" => "object",
        "i64" | "u64" | "i32" | "u32" | "usize" => "integer",
        other if other.starts_with("struct ") => "object",
        other => other,
    }
}
