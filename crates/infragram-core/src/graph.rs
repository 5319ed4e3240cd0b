//! Resource graph model.
//!
//! A resource graph is made of typed [`Node`]s, directed typed [`Edge`]s and
//! one [`Group`] per network. The serialized form of these types is the graph
//! payload exchanged between graph construction and diagram generation:
//!
//! ```json
//! {"id": "i-1", "type": "ec2", "name": "web", "attributes": {"state": "running"}}
//! {"source": "vpc-1", "target": "i-1", "edge_type": "contains", "attributes": {}}
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Category-specific key/value attributes of a node, edge or group.
///
/// Insertion order is preserved and `null` values are kept distinct from
/// absent keys.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// The closed set of resource categories a node can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    #[serde(rename = "ec2")]
    Instance,
    #[serde(rename = "vpc")]
    Network,
    #[serde(rename = "subnet")]
    Subnetwork,
    #[serde(rename = "security_group", alias = "securitygroup")]
    Policy,
    #[serde(rename = "internet_gateway")]
    InternetGateway,
    #[serde(rename = "nat_gateway")]
    NatGateway,
    #[serde(rename = "route_table")]
    RouteTable,
    #[serde(rename = "load_balancer")]
    LoadBalancer,
    #[serde(rename = "rds")]
    Database,
}

impl NodeKind {
    /// All categories, in resource dependency order.
    pub const ALL: [NodeKind; 9] = [
        NodeKind::Network,
        NodeKind::Subnetwork,
        NodeKind::Instance,
        NodeKind::Policy,
        NodeKind::InternetGateway,
        NodeKind::NatGateway,
        NodeKind::RouteTable,
        NodeKind::LoadBalancer,
        NodeKind::Database,
    ];

    /// Returns the category string used in the graph payload.
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Instance => "ec2",
            NodeKind::Network => "vpc",
            NodeKind::Subnetwork => "subnet",
            NodeKind::Policy => "security_group",
            NodeKind::InternetGateway => "internet_gateway",
            NodeKind::NatGateway => "nat_gateway",
            NodeKind::RouteTable => "route_table",
            NodeKind::LoadBalancer => "load_balancer",
            NodeKind::Database => "rds",
        }
    }

    /// Matches a declared category string against the fixed category set.
    ///
    /// Matching is case-insensitive. `securitygroup` is accepted as an alias
    /// of `security_group`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use infragram_core::graph::NodeKind;
    /// assert_eq!(NodeKind::from_category("EC2"), Some(NodeKind::Instance));
    /// assert_eq!(NodeKind::from_category("SecurityGroup"), Some(NodeKind::Policy));
    /// assert_eq!(NodeKind::from_category("lambda"), None);
    /// ```
    pub fn from_category(category: &str) -> Option<Self> {
        let lowered = category.to_ascii_lowercase();
        if lowered == "securitygroup" {
            return Some(NodeKind::Policy);
        }
        Self::ALL.into_iter().find(|kind| kind.as_str() == lowered)
    }

    /// Returns `true` for categories drawn as nested containers.
    pub fn is_container(self) -> bool {
        matches!(self, NodeKind::Network | NodeKind::Subnetwork)
    }

    /// Returns `true` for categories drawn as leaf icons inside a subnetwork.
    pub fn is_leaf(self) -> bool {
        matches!(
            self,
            NodeKind::Instance | NodeKind::NatGateway | NodeKind::Database
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Instance => "instance",
            NodeKind::Network => "network",
            NodeKind::Subnetwork => "subnetwork",
            NodeKind::Policy => "policy",
            NodeKind::InternetGateway => "internet gateway",
            NodeKind::NatGateway => "NAT gateway",
            NodeKind::RouteTable => "route table",
            NodeKind::LoadBalancer => "load balancer",
            NodeKind::Database => "database",
        };
        f.write_str(name)
    }
}

/// The closed set of relation types between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Contains,
    Hosts,
    Uses,
    AllowsTraffic,
    Attaches,
    RoutesTo,
    Associates,
    DistributesTo,
    ResidesIn,
    PeersWith,
}

impl EdgeKind {
    pub const ALL: [EdgeKind; 10] = [
        EdgeKind::Contains,
        EdgeKind::Hosts,
        EdgeKind::Uses,
        EdgeKind::AllowsTraffic,
        EdgeKind::Attaches,
        EdgeKind::RoutesTo,
        EdgeKind::Associates,
        EdgeKind::DistributesTo,
        EdgeKind::ResidesIn,
        EdgeKind::PeersWith,
    ];

    /// Returns the relation string used in the graph payload.
    pub fn as_str(self) -> &'static str {
        match self {
            EdgeKind::Contains => "contains",
            EdgeKind::Hosts => "hosts",
            EdgeKind::Uses => "uses",
            EdgeKind::AllowsTraffic => "allows_traffic",
            EdgeKind::Attaches => "attaches",
            EdgeKind::RoutesTo => "routes_to",
            EdgeKind::Associates => "associates",
            EdgeKind::DistributesTo => "distributes_to",
            EdgeKind::ResidesIn => "resides_in",
            EdgeKind::PeersWith => "peers_with",
        }
    }

    /// Parses a payload relation string. Matching is exact.
    pub fn from_wire(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed graph vertex representing one cloud resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    id: String,
    #[serde(rename = "type")]
    kind: NodeKind,
    name: String,
    #[serde(default)]
    attributes: Attributes,
}

impl Node {
    pub fn new(
        id: impl Into<String>,
        kind: NodeKind,
        name: impl Into<String>,
        attributes: Attributes,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            name: name.into(),
            attributes,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Returns a string attribute, or `None` when absent, null or not a string.
    pub fn attribute_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(|value| value.as_str())
    }
}

/// A typed directed relation between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    source: String,
    target: String,
    #[serde(rename = "edge_type", alias = "type")]
    kind: EdgeKind,
    #[serde(default)]
    attributes: Attributes,
}

impl Edge {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        kind: EdgeKind,
        attributes: Attributes,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind,
            attributes,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn kind(&self) -> EdgeKind {
        self.kind
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

/// A named collection of node ids sharing one top-level network.
///
/// The group id equals the id of its owning network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    id: String,
    #[serde(rename = "type")]
    kind: NodeKind,
    name: String,
    #[serde(default)]
    members: Vec<String>,
    #[serde(default)]
    attributes: Attributes,
}

impl Group {
    /// Creates a network group.
    pub fn network(
        id: impl Into<String>,
        name: impl Into<String>,
        members: Vec<String>,
        attributes: Attributes,
    ) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Network,
            name: name.into(),
            members,
            attributes,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

/// Summary block written at the head of a serialized graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub created_at: String,
    pub node_count: usize,
    pub edge_count: usize,
    pub group_count: usize,
}
