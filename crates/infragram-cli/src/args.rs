//! Command-line argument definitions for the Infragram CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, the kind of input
//! document, configuration file selection, and logging verbosity.

use clap::{Parser, ValueEnum};

/// Kind of JSON document passed as input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum InputKind {
    /// A flat resource snapshot, built into a graph before rendering.
    #[default]
    Resources,
    /// A previously serialized resource graph.
    Graph,
}

/// Command-line arguments for the Infragram diagram tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input JSON file
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output draw.io file
    #[arg(short, long, default_value = "out.drawio")]
    pub output: String,

    /// Kind of input document
    #[arg(long, value_enum, default_value_t = InputKind::Resources)]
    pub input_kind: InputKind,

    /// Also write the intermediate graph JSON to this path
    #[arg(long)]
    pub graph_out: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
