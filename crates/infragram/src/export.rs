//! Export of generated diagrams.
//!
//! This module provides the [`Exporter`] trait, the final stage of the
//! Infragram pipeline.
//!
//! ```text
//! Graph payload
//!     ↓ classify + convert
//! Containers / Shapes / Connectors
//!     ↓ layout
//! Positioned Diagram
//!     ↓ export (this module)
//! Output document
//! ```
//!
//! # Available Backends
//!
//! - [`drawio`]: uncompressed draw.io XML via [`drawio::DrawioExporter`]

pub mod drawio;

use thiserror::Error;

use crate::diagram::Diagram;

/// Abstraction for diagram export backends.
pub trait Exporter {
    /// Writes one complete document for `diagram`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Write`] if the document cannot be serialized, or
    /// [`Error::Io`] if writing the output fails.
    fn export_diagram(&mut self, diagram: &Diagram) -> Result<(), Error>;
}

/// Errors that can occur during diagram export.
///
/// Converted into [`InfragramError::Export`] at the crate boundary.
///
/// [`InfragramError::Export`]: crate::InfragramError::Export
#[derive(Debug, Error)]
pub enum Error {
    /// The markup writer rejected an event.
    #[error("Write error: {0}")]
    Write(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
