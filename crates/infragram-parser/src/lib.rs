//! Infragram payload parser.
//!
//! This crate validates the two JSON documents that flow through the
//! Infragram pipeline:
//!
//! - **Resource payloads** ([`parse_resources`]): flat cloud resource
//!   collections, turned into typed records with every subnetwork tagged by
//!   its parent network.
//! - **Graph payloads** ([`validate_graph_payload`]): serialized resource
//!   graphs, shape-checked before diagram generation.
//!
//! Both documents deserialize into derived record types and report the first
//! malformed field as an [`error::ValidationError`].

mod decode;
pub mod error;
pub mod graph_payload;
mod nullable;
pub mod resources;

pub use graph_payload::{GraphPayload, PayloadGroup, PayloadNode, validate_graph_payload};
pub use nullable::Nullable;
pub use resources::{ParsedResources, parse_resources};
