//! Converters from graph nodes and relations to diagram primitives.
//!
//! Each converter dispatches on the closed [`NodeKind`] set with a single
//! `match`; there is no per-category converter type.
//!
//! [`NodeKind`]: infragram_core::graph::NodeKind

mod connector;
mod container;
mod shape;
mod style;

pub use connector::{ConnectorConverter, GenerationContext, traffic_label};
pub use container::{ContainerConverter, container_id, container_label};
pub use shape::{ShapeConverter, shape_id, shape_label};
pub use style::StyleSheet;
