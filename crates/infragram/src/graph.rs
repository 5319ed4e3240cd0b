//! Resource graph construction and serialization.
//!
//! [`GraphBuilder`] turns validated resource collections into a
//! [`ResourceGraph`]; the graph serializes to, and reloads from, a graph
//! payload.

mod builder;
mod resource_graph;

pub use infragram_core::graph::{Attributes, Edge, EdgeKind, Group, Metadata, Node, NodeKind};

pub use builder::{GraphBuilder, SkipNotice};
pub use resource_graph::ResourceGraph;
