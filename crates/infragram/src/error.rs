//! Error types for Infragram operations.
//!
//! This module provides the main error type [`InfragramError`]. Every
//! variant is unrecoverable for the current call: a failed build or generation
//! returns no partial graph and no partial diagram.

use std::io;

use thiserror::Error;

use infragram_core::graph::NodeKind;
use infragram_parser::error::{ErrorCode, ValidationError};

/// The main error type for Infragram operations.
#[derive(Debug, Error)]
pub enum InfragramError {
    /// A payload field is missing or has the wrong type.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A resource refers to an id that does not exist (or does not exist yet).
    #[error("Invalid reference: {category} `{id}` does not exist")]
    InvalidReference { id: String, category: NodeKind },

    /// A graph node declares a category outside the fixed category set.
    #[error("Unknown category `{category}` for node `{node_id}`")]
    UnknownCategory { node_id: String, category: String },

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid style configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Export error: {0}")]
    Export(#[from] crate::export::Error),
}

impl InfragramError {
    /// Creates an [`InfragramError::InvalidReference`].
    pub fn invalid_reference(id: impl Into<String>, category: NodeKind) -> Self {
        Self::InvalidReference {
            id: id.into(),
            category,
        }
    }

    /// Returns the stable diagnostic code of this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation(err) => err.code(),
            Self::Json(_) => ErrorCode::E102,
            Self::InvalidReference { .. } => ErrorCode::E200,
            Self::UnknownCategory { .. } => ErrorCode::E300,
            Self::Export(_) | Self::Config(_) => ErrorCode::E400,
            Self::Io(_) => ErrorCode::E401,
        }
    }
}
