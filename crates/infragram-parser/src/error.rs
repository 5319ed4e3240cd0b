//! Error types for payload validation.
//!
//! Every failure is reported as a [`ValidationError`] carrying the field path,
//! the expected type and a short rendering of the value that was found. The
//! [`ErrorCode`] enum also names the failure categories raised further down the
//! pipeline so that every condition has one stable, searchable code.
//!
//! # Example
//!
//! ```
//! # use infragram_parser::error::{ErrorCode, ValidationError};
//! let err = ValidationError::missing("vpcs[0].cidr_block", "string");
//!
//! assert_eq!(err.code(), ErrorCode::E100);
//! assert_eq!(err.actual(), "missing");
//! assert_eq!(err.to_string(), "vpcs[0].cidr_block: expected string, found missing");
//! ```

mod error_code;
mod validation_error;

pub use error_code::ErrorCode;
pub use validation_error::ValidationError;
pub(crate) use validation_error::describe;

/// A type alias for `Result<T, ValidationError>`.
pub type Result<T> = std::result::Result<T, ValidationError>;
