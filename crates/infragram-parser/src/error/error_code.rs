//! Error codes for the Infragram diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E1xx` - Payload validation errors
//! - `E2xx` - Reference errors raised while building the graph
//! - `E3xx` - Classification errors raised while generating a diagram
//! - `E4xx` - Export and I/O errors

use std::fmt;

/// Error codes for categorizing failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Validation Errors (E1xx)
    // =========================================================================
    /// Missing required field.
    ///
    /// A field every record of this kind must carry was not present.
    E100,

    /// Wrong field type.
    ///
    /// A field was present but holds a value of the wrong JSON type.
    E101,

    /// Malformed document.
    ///
    /// The input is not valid JSON, or its root is not an object.
    E102,

    /// Duplicate resource id.
    ///
    /// Two resources share the same id.
    E103,

    /// Unknown edge type.
    ///
    /// An edge declares a relation outside the fixed relation set.
    E104,

    // =========================================================================
    // Reference Errors (E2xx)
    // =========================================================================
    /// Invalid reference.
    ///
    /// A resource refers to an id that does not exist, or has not been
    /// created yet.
    E200,

    // =========================================================================
    // Classification Errors (E3xx)
    // =========================================================================
    /// Unknown node category.
    ///
    /// A graph node declares a category outside the fixed category set.
    E300,

    // =========================================================================
    // Export Errors (E4xx)
    // =========================================================================
    /// Diagram export failure.
    ///
    /// The diagram document could not be written.
    E400,

    /// I/O failure.
    ///
    /// An input or output file could not be read or written.
    E401,
}

impl ErrorCode {
    /// Returns the error code as a string (e.g., "E100").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            ErrorCode::E104 => "E104",
            ErrorCode::E200 => "E200",
            ErrorCode::E300 => "E300",
            ErrorCode::E400 => "E400",
            ErrorCode::E401 => "E401",
        }
    }

    /// Returns a short description of the error.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "missing required field",
            ErrorCode::E101 => "wrong field type",
            ErrorCode::E102 => "malformed document",
            ErrorCode::E103 => "duplicate resource id",
            ErrorCode::E104 => "unknown edge type",
            ErrorCode::E200 => "invalid reference",
            ErrorCode::E300 => "unknown node category",
            ErrorCode::E400 => "diagram export failure",
            ErrorCode::E401 => "i/o failure",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E100.to_string(), "E100");
        assert_eq!(ErrorCode::E200.to_string(), "E200");
        assert_eq!(ErrorCode::E300.to_string(), "E300");
        assert_eq!(ErrorCode::E401.to_string(), "E401");
    }

    #[test]
    fn test_error_code_description() {
        assert_eq!(ErrorCode::E100.description(), "missing required field");
        assert_eq!(ErrorCode::E200.description(), "invalid reference");
        assert_eq!(ErrorCode::E300.description(), "unknown node category");
    }
}
