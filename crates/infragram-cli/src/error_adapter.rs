//! Error adapter for converting InfragramError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI. Every error is
//! reported with its stable code (`E1xx` validation, `E2xx` reference,
//! `E3xx` classification, `E4xx` export and I/O).

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use infragram::{InfragramError, graph::NodeKind};

/// Adapter presenting an [`InfragramError`] as a miette diagnostic.
pub struct ErrorAdapter<'a>(pub &'a InfragramError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.0.code()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self.0 {
            InfragramError::Validation(err) => {
                format!("{} at `{}`", err.code().description(), err.path())
            }
            InfragramError::InvalidReference { category, .. } => {
                format!("add the {category} to the snapshot or remove the reference")
            }
            InfragramError::UnknownCategory { .. } => {
                let known: Vec<_> = NodeKind::ALL.iter().map(|kind| kind.as_str()).collect();
                format!("supported categories: {}", known.join(", "))
            }
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// Convert an [`InfragramError`] into a list of reportable errors.
///
/// Payload errors carry no source spans, so this always yields a single
/// entry; the list keeps the rendering loop in `main` uniform.
pub fn to_reportables(err: &InfragramError) -> Vec<ErrorAdapter<'_>> {
    vec![ErrorAdapter(err)]
}
