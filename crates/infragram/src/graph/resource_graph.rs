use indexmap::IndexMap;
use log::debug;
use serde::Serialize;
use serde_json::Value;

use infragram_core::graph::{Edge, Group, Metadata, Node, NodeKind};
use infragram_parser::{GraphPayload, error::ValidationError, validate_graph_payload};

use crate::error::InfragramError;

/// In-memory resource graph.
///
/// Nodes and groups are keyed by id. Edge insertion order is meaningful: it
/// determines the order in which diagram connectors are emitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceGraph {
    nodes: IndexMap<String, Node>,
    edges: Vec<Edge>,
    groups: IndexMap<String, Group>,
}

#[derive(Serialize)]
struct GraphDocumentRef<'a> {
    metadata: Metadata,
    nodes: Vec<&'a Node>,
    edges: &'a [Edge],
    groups: Vec<&'a Group>,
}

impl ResourceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a node. Returns `false`, leaving the graph unchanged, when a
    /// node with the same id already exists.
    pub fn add_node(&mut self, node: Node) -> bool {
        if self.nodes.contains_key(node.id()) {
            return false;
        }
        self.nodes.insert(node.id().to_string(), node);
        true
    }

    /// Appends an edge. Both endpoints must already be nodes of the graph.
    pub fn add_edge(&mut self, edge: Edge) {
        debug_assert!(
            self.contains(edge.source()),
            "edge source `{}` is not a node",
            edge.source()
        );
        debug_assert!(
            self.contains(edge.target()),
            "edge target `{}` is not a node",
            edge.target()
        );
        self.edges.push(edge);
    }

    pub fn add_group(&mut self, group: Group) {
        self.groups.insert(group.id().to_string(), group);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Returns the nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn group(&self, id: &str) -> Option<&Group> {
        self.groups.get(id)
    }

    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Returns every id referenced by an edge or a group member that is not a
    /// node of this graph, in first-seen order.
    pub fn dangling_references(&self) -> Vec<&str> {
        let mut dangling: Vec<&str> = Vec::new();
        let referenced = self
            .edges
            .iter()
            .flat_map(|edge| [edge.source(), edge.target()])
            .chain(
                self.groups
                    .values()
                    .flat_map(|group| group.members().iter().map(String::as_str)),
            );
        for id in referenced {
            if !self.contains(id) && !dangling.contains(&id) {
                dangling.push(id);
            }
        }
        dangling
    }

    /// Builds the metadata block for the current contents.
    pub fn metadata(&self, created_at: impl Into<String>) -> Metadata {
        Metadata {
            created_at: created_at.into(),
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            group_count: self.group_count(),
        }
    }

    /// Serializes the graph to a graph payload stamped with the current time.
    pub fn to_json(&self) -> Result<Value, InfragramError> {
        self.to_json_at(chrono::Utc::now().to_rfc3339())
    }

    /// Serializes the graph to a graph payload with an explicit timestamp.
    pub fn to_json_at(&self, created_at: impl Into<String>) -> Result<Value, InfragramError> {
        let document = GraphDocumentRef {
            metadata: self.metadata(created_at),
            nodes: self.nodes.values().collect(),
            edges: &self.edges,
            groups: self.groups.values().collect(),
        };
        Ok(serde_json::to_value(document)?)
    }

    /// Reconstructs a graph from a graph payload.
    ///
    /// The metadata block is informational and not checked against the
    /// contents.
    ///
    /// # Errors
    ///
    /// Returns [`InfragramError::Validation`] when the payload does not have
    /// the graph shape or repeats a node id, and
    /// [`InfragramError::UnknownCategory`] for a node outside the category set.
    pub fn from_json(payload: &Value) -> Result<Self, InfragramError> {
        Self::from_payload(validate_graph_payload(payload)?)
    }

    /// Classifies the nodes of a shape-checked graph payload.
    ///
    /// Categories are matched case-insensitively; see
    /// [`NodeKind::from_category`].
    pub fn from_payload(payload: GraphPayload) -> Result<Self, InfragramError> {
        let mut graph = Self::new();
        for (index, node) in payload.nodes.into_iter().enumerate() {
            let Some(kind) = NodeKind::from_category(&node.category) else {
                return Err(InfragramError::UnknownCategory {
                    category: node.category.to_lowercase(),
                    node_id: node.id,
                });
            };
            let path = format!("nodes[{index}].id");
            let id = node.id.clone();
            if !graph.add_node(Node::new(node.id, kind, node.name, node.attributes)) {
                return Err(ValidationError::duplicate_id(path, &id).into());
            }
        }
        graph.edges = payload.edges;
        for group in payload.groups {
            graph.add_group(Group::network(group.id, group.name, group.members, group.attributes));
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            groups = graph.group_count();
            "Graph deserialized"
        );
        Ok(graph)
    }
}
