//! Graph payload validation.
//!
//! The graph payload is the serialized resource graph consumed by diagram
//! generation and by graph reconstruction. Only the shape of nodes and edges
//! is checked here: node categories are kept as declared strings and
//! classified later, and cross-resource rules are the responsibility of the
//! graph producer.

use infragram_core::graph::{Attributes, Edge, Metadata};
use log::debug;
use serde::Deserialize;
use serde_json::Value;

use crate::{decode::decode, error::Result};

/// A node whose category has not been classified yet.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PayloadNode {
    pub id: String,
    #[serde(rename = "type")]
    pub category: String,
    pub name: String,
    #[serde(default)]
    pub attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PayloadGroup {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub attributes: Attributes,
}

/// A shape-checked graph payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GraphPayload {
    #[serde(default)]
    pub metadata: Option<Metadata>,
    pub nodes: Vec<PayloadNode>,
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub groups: Vec<PayloadGroup>,
}

/// Checks that a graph payload carries well-formed `nodes` and `edges` lists.
///
/// `groups` and `metadata` are optional. Edges accept `type` as an alias of
/// `edge_type`.
pub fn validate_graph_payload(payload: &Value) -> Result<GraphPayload> {
    let graph: GraphPayload = decode(payload)?;

    debug!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        groups = graph.groups.len();
        "Graph payload validated"
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use infragram_core::graph::EdgeKind;

    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_validate_minimal_payload() {
        let payload = json!({
            "nodes": [
                {"id": "vpc-1", "type": "vpc", "name": "main", "attributes": {"cidr_block": "10.0.0.0/16"}},
                {"id": "i-1", "type": "EC2", "name": "web"}
            ],
            "edges": [
                {"source": "vpc-1", "target": "i-1", "edge_type": "contains", "attributes": {}}
            ]
        });

        let graph = validate_graph_payload(&payload).unwrap();

        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.nodes[1].category, "EC2");
        assert_eq!(graph.nodes[1].name, "web");
        assert!(graph.nodes[1].attributes.is_empty());
        assert_eq!(graph.edges[0].kind(), EdgeKind::Contains);
        assert!(graph.groups.is_empty());
        assert!(graph.metadata.is_none());
    }

    #[test]
    fn test_missing_nodes() {
        let err = validate_graph_payload(&json!({"edges": []})).unwrap_err();

        assert_eq!(err.code(), ErrorCode::E100);
        assert_eq!(err.path(), "nodes");
    }

    #[test]
    fn test_edges_must_be_list() {
        let err = validate_graph_payload(&json!({"nodes": [], "edges": {}})).unwrap_err();

        assert_eq!(err.code(), ErrorCode::E101);
        assert_eq!(err.path(), "edges");
        assert_eq!(err.expected(), "array");
        assert_eq!(err.actual(), "object");
    }

    #[test]
    fn test_node_id_must_be_string() {
        let payload = json!({"nodes": [{"id": 7, "type": "ec2", "name": "web"}], "edges": []});
        let err = validate_graph_payload(&payload).unwrap_err();

        assert_eq!(err.code(), ErrorCode::E101);
        assert_eq!(err.path(), "nodes[0].id");
        assert_eq!(err.expected(), "string");
        assert_eq!(err.actual(), "number 7");
    }

    #[test]
    fn test_node_name_is_required() {
        let payload = json!({
            "nodes": [
                {"id": "vpc-1", "type": "vpc", "name": "main"},
                {"id": "i-1", "type": "ec2"}
            ],
            "edges": []
        });

        let err = validate_graph_payload(&payload).unwrap_err();
        assert_eq!(err.code(), ErrorCode::E100);
        assert_eq!(err.path(), "nodes[1].name");
    }

    #[test]
    fn test_category_must_be_string() {
        let payload = json!({"nodes": [{"id": "i-1", "type": 3, "name": "web"}], "edges": []});

        let err = validate_graph_payload(&payload).unwrap_err();
        assert_eq!(err.code(), ErrorCode::E101);
        assert_eq!(err.path(), "nodes[0].type");
    }

    #[test]
    fn test_edge_type_alias() {
        let payload = json!({
            "nodes": [],
            "edges": [{"source": "sg-a", "target": "sg-b", "type": "allows_traffic"}]
        });

        let graph = validate_graph_payload(&payload).unwrap();
        assert_eq!(graph.edges[0].kind(), EdgeKind::AllowsTraffic);
    }

    #[test]
    fn test_unknown_edge_type() {
        let payload = json!({
            "nodes": [],
            "edges": [{"source": "a", "target": "b", "edge_type": "links"}]
        });

        let err = validate_graph_payload(&payload).unwrap_err();
        assert_eq!(err.code(), ErrorCode::E104);
        assert_eq!(err.path(), "edges[0].edge_type");
        assert_eq!(err.actual(), "string \"links\"");
    }

    #[test]
    fn test_missing_edge_type() {
        let payload = json!({"nodes": [], "edges": [{"source": "a", "target": "b"}]});

        let err = validate_graph_payload(&payload).unwrap_err();
        assert_eq!(err.code(), ErrorCode::E100);
        assert_eq!(err.path(), "edges[0].edge_type");
    }

    #[test]
    fn test_groups_and_metadata() {
        let payload = json!({
            "metadata": {"created_at": "2024-01-01T00:00:00Z", "node_count": 1, "edge_count": 0, "group_count": 1},
            "nodes": [{"id": "vpc-1", "type": "vpc", "name": "main"}],
            "edges": [],
            "groups": [{"id": "vpc-1", "type": "vpc", "name": "main", "members": [], "attributes": {}}]
        });

        let graph = validate_graph_payload(&payload).unwrap();
        let metadata = graph.metadata.unwrap();
        assert_eq!(metadata.created_at, "2024-01-01T00:00:00Z");
        assert_eq!(metadata.node_count, 1);
        assert_eq!(metadata.group_count, 1);
        assert_eq!(graph.groups[0].id, "vpc-1");
    }
}
