use serde_json::Value;
use thiserror::Error;

use crate::error::ErrorCode;

/// A malformed or missing field in an input payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}: expected {expected}, found {actual}")]
pub struct ValidationError {
    code: ErrorCode,
    path: String,
    expected: String,
    actual: String,
}

impl ValidationError {
    /// A required field is absent.
    pub fn missing(path: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::E100,
            path: path.into(),
            expected: expected.into(),
            actual: "missing".to_string(),
        }
    }

    /// A field holds a value of the wrong type.
    pub fn mismatch(path: impl Into<String>, expected: impl Into<String>, actual: &Value) -> Self {
        Self {
            code: ErrorCode::E101,
            path: path.into(),
            expected: expected.into(),
            actual: describe(actual),
        }
    }

    /// A field is well-typed but its value is not acceptable.
    pub fn invalid(
        code: ErrorCode,
        path: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            code,
            path: path.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Two resources share the same id.
    pub fn duplicate_id(path: impl Into<String>, id: &str) -> Self {
        Self::invalid(ErrorCode::E103, path, "unique id", format!("string {id:?}"))
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Returns the dotted path of the offending field, e.g. `vpcs[0].subnets[1].name`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn expected(&self) -> &str {
        &self.expected
    }

    pub fn actual(&self) -> &str {
        &self.actual
    }
}

const MAX_RENDERED_LEN: usize = 40;

/// Renders a JSON value as a short human-readable description.
pub(crate) fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {b}"),
        Value::Number(n) => format!("number {n}"),
        Value::String(s) if s.chars().count() > MAX_RENDERED_LEN => {
            let truncated: String = s.chars().take(MAX_RENDERED_LEN).collect();
            format!("string {truncated:?}...")
        }
        Value::String(s) => format!("string {s:?}"),
        Value::Array(items) => format!("array of {} items", items.len()),
        Value::Object(_) => "object".to_string(),
    }
}
