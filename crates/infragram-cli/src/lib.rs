//! CLI logic for the Infragram diagram tool.
//!
//! Reads a resource snapshot (or a serialized resource graph) from a JSON
//! file and writes the rendered draw.io document.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, InputKind};

use std::fs;

use log::info;
use serde_json::Value;

use infragram::{Infragram, InfragramError};

/// Run the Infragram CLI application
///
/// This function processes the input file through the Infragram pipeline
/// and writes the resulting draw.io document to the output file.
///
/// # Errors
///
/// Returns `InfragramError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed JSON and payload validation errors
/// - Dangling resource references
/// - Unknown node categories
/// - Export errors
pub fn run(args: &Args) -> Result<(), InfragramError> {
    info!(
        input_path = args.input,
        output_path = args.output,
        input_kind:? = args.input_kind;
        "Processing snapshot"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;
    let input: Value = serde_json::from_str(&source)?;

    let infragram = Infragram::new(app_config);
    let graph = match args.input_kind {
        InputKind::Resources => {
            let graph = infragram.build_graph(&input)?.to_json()?;
            if let Some(path) = &args.graph_out {
                fs::write(path, serde_json::to_string_pretty(&graph)?)?;
                info!(graph_file = path; "Graph payload written");
            }
            graph
        }
        InputKind::Graph => input,
    };

    let xml = infragram.render_drawio(&graph)?;
    fs::write(&args.output, xml)?;

    info!(output_file = args.output; "draw.io document exported successfully");

    Ok(())
}
