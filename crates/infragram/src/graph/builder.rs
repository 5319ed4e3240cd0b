use std::{fmt, net::Ipv4Addr};

use log::{debug, info, trace, warn};
use serde_json::{Value, json};

use infragram_core::graph::{Attributes, Edge, EdgeKind, Group, Node, NodeKind};
use infragram_parser::{ParsedResources, error::ValidationError, resources::Rule};

use super::ResourceGraph;
use crate::error::InfragramError;

/// A non-fatal condition met while deriving edges.
///
/// The affected relation is left out of the graph; the build continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipNotice {
    /// A route whose destination is not an IPv4 CIDR block.
    NonIpv4Route {
        route_table: String,
        destination: String,
    },
    /// A route whose target is not a node of the graph.
    UnresolvedRouteTarget { route_table: String, target: String },
    /// A peering connection that is not active.
    InactivePeering { peering: String, status: String },
    /// A peering connection naming a network that is not in the graph.
    UnresolvedPeering { peering: String, network: String },
}

impl fmt::Display for SkipNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonIpv4Route {
                route_table,
                destination,
            } => write!(
                f,
                "route `{destination}` of `{route_table}` skipped: not an IPv4 destination"
            ),
            Self::UnresolvedRouteTarget {
                route_table,
                target,
            } => write!(
                f,
                "route of `{route_table}` to `{target}` skipped: target not found"
            ),
            Self::InactivePeering { peering, status } => {
                write!(f, "peering `{peering}` skipped: status is `{status}`")
            }
            Self::UnresolvedPeering { peering, network } => {
                write!(f, "peering `{peering}` skipped: network `{network}` not found")
            }
        }
    }
}

/// Derives a [`ResourceGraph`] from validated resource collections.
///
/// Nodes are created in dependency order (networks and subnetworks first),
/// then edges are derived by a fixed sequence of rules, then one group is
/// synthesized per network. Any dangling reference aborts the build.
///
/// # Examples
///
/// ```
/// # use infragram::graph::GraphBuilder;
/// let payload = serde_json::json!({
///     "ec2_instances": [],
///     "vpcs": [{"vpc_id": "vpc-1", "name": "main", "cidr_block": "10.0.0.0/16", "subnets": []}],
///     "security_groups": []
/// });
///
/// let parsed = infragram_parser::parse_resources(&payload).unwrap();
/// let graph = GraphBuilder::new().build(&parsed).unwrap();
/// assert_eq!(graph.group_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct GraphBuilder;

impl GraphBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Builds the graph, logging every skip notice at `warn`.
    pub fn build(&self, resources: &ParsedResources) -> Result<ResourceGraph, InfragramError> {
        let (graph, notices) = self.build_with_notices(resources)?;
        for notice in &notices {
            warn!(notice:% = notice; "Relation skipped");
        }
        Ok(graph)
    }

    /// Builds the graph and returns the skip notices alongside it.
    pub fn build_with_notices(
        &self,
        resources: &ParsedResources,
    ) -> Result<(ResourceGraph, Vec<SkipNotice>), InfragramError> {
        info!("Building resource graph");

        let mut state = BuildState::default();
        state.add_nodes(resources)?;
        debug!(nodes = state.graph.node_count(); "Nodes created");

        state.network_edges(resources);
        state.policy_edges(resources)?;
        state.traffic_edges(resources)?;
        state.gateway_edges(resources)?;
        state.route_table_edges(resources)?;
        state.load_balancer_edges(resources)?;
        state.database_edges(resources)?;
        state.peering_edges(resources);
        debug!(edges = state.graph.edge_count(); "Edges derived");

        state.network_groups(resources);

        info!(
            nodes = state.graph.node_count(),
            edges = state.graph.edge_count(),
            groups = state.graph.group_count(),
            skipped = state.notices.len();
            "Resource graph built"
        );
        Ok((state.graph, state.notices))
    }
}

#[derive(Default)]
struct BuildState {
    graph: ResourceGraph,
    notices: Vec<SkipNotice>,
}

fn attributes(value: Value) -> Attributes {
    match value {
        Value::Object(map) => map,
        _ => Attributes::new(),
    }
}

fn name_or_id(name: &str, id: &str) -> String {
    if name.is_empty() { id } else { name }.to_string()
}

/// Returns the name segment of a load balancer ARN
/// (`.../loadbalancer/app/<name>/<hash>`).
fn name_from_arn(arn: &str) -> &str {
    let mut segments = arn.rsplit('/');
    segments.next();
    segments.next().unwrap_or(arn)
}

/// Returns `true` for an IPv4 address or CIDR block.
fn is_ipv4_cidr(value: &str) -> bool {
    let (address, prefix) = match value.split_once('/') {
        Some((address, prefix)) => (address, Some(prefix)),
        None => (value, None),
    };
    address.parse::<Ipv4Addr>().is_ok()
        && prefix.is_none_or(|prefix| prefix.parse::<u8>().is_ok_and(|bits| bits <= 32))
}

/// Rule targets that are address ranges or prefix lists never produce edges.
fn is_address_target(target: &str) -> bool {
    target.contains('/')
        || target.contains(':')
        || target.parse::<Ipv4Addr>().is_ok()
        || target.starts_with("pl-")
}

impl BuildState {
    fn insert(&mut self, node: Node, path: String) -> Result<(), InfragramError> {
        trace!(id = node.id(), kind:% = node.kind(); "Adding node");
        let id = node.id().to_string();
        if !self.graph.add_node(node) {
            return Err(ValidationError::duplicate_id(path, &id).into());
        }
        Ok(())
    }

    /// Fails unless `id` is a node of the given category.
    fn require(&self, id: &str, category: NodeKind) -> Result<(), InfragramError> {
        match self.graph.node(id) {
            Some(node) if node.kind() == category => Ok(()),
            _ => Err(InfragramError::invalid_reference(id, category)),
        }
    }

    fn edge(&mut self, source: &str, target: &str, kind: EdgeKind, attrs: Attributes) {
        trace!(source, target, kind:%; "Adding edge");
        self.graph.add_edge(Edge::new(source, target, kind, attrs));
    }

    fn add_nodes(&mut self, resources: &ParsedResources) -> Result<(), InfragramError> {
        for (index, network) in resources.vpcs.iter().enumerate() {
            let node = Node::new(
                &network.vpc_id,
                NodeKind::Network,
                name_or_id(&network.name, &network.vpc_id),
                attributes(json!({"cidr_block": network.cidr_block})),
            );
            self.insert(node, format!("vpcs[{index}].vpc_id"))?;
        }

        for (position, network) in resources.vpcs.iter().enumerate() {
            for (index, subnet) in network.subnets.iter().enumerate() {
                let node = Node::new(
                    &subnet.subnet_id,
                    NodeKind::Subnetwork,
                    name_or_id(&subnet.name, &subnet.subnet_id),
                    attributes(json!({
                        "cidr_block": subnet.cidr_block,
                        "availability_zone": subnet.availability_zone,
                        "vpc_id": network.vpc_id,
                    })),
                );
                self.insert(node, format!("vpcs[{position}].subnets[{index}].subnet_id"))?;
            }
        }

        for (index, instance) in resources.ec2_instances.iter().enumerate() {
            self.require(&instance.vpc_id, NodeKind::Network)?;
            self.require(&instance.subnet_id, NodeKind::Subnetwork)?;
            let node = Node::new(
                &instance.instance_id,
                NodeKind::Instance,
                name_or_id(&instance.name, &instance.instance_id),
                attributes(json!({
                    "state": instance.state,
                    "private_ip": instance.private_ip,
                    "public_ip": instance.public_ip.to_value(),
                })),
            );
            self.insert(node, format!("ec2_instances[{index}].instance_id"))?;
        }

        for (index, policy) in resources.security_groups.iter().enumerate() {
            self.require(&policy.vpc_id, NodeKind::Network)?;
            let node = Node::new(
                &policy.group_id,
                NodeKind::Policy,
                name_or_id(&policy.name, &policy.group_id),
                attributes(json!({
                    "description": policy.description,
                    "vpc_id": policy.vpc_id,
                })),
            );
            self.insert(node, format!("security_groups[{index}].group_id"))?;
        }

        for (index, gateway) in resources.internet_gateways.iter().enumerate() {
            if let Some(vpc_id) = gateway.vpc_id.as_option() {
                self.require(vpc_id, NodeKind::Network)?;
            }
            let node = Node::new(
                &gateway.gateway_id,
                NodeKind::InternetGateway,
                name_or_id(&gateway.name, &gateway.gateway_id),
                attributes(json!({
                    "state": gateway.state,
                    "vpc_id": gateway.vpc_id.to_value(),
                })),
            );
            self.insert(node, format!("internet_gateways[{index}].gateway_id"))?;
        }

        for (index, gateway) in resources.nat_gateways.iter().enumerate() {
            self.require(&gateway.vpc_id, NodeKind::Network)?;
            self.require(&gateway.subnet_id, NodeKind::Subnetwork)?;
            let node = Node::new(
                &gateway.gateway_id,
                NodeKind::NatGateway,
                name_or_id(&gateway.name, &gateway.gateway_id),
                attributes(json!({
                    "state": gateway.state,
                    "vpc_id": gateway.vpc_id,
                    "subnet_id": gateway.subnet_id,
                    "public_ip": gateway.public_ip.to_value(),
                })),
            );
            self.insert(node, format!("nat_gateways[{index}].gateway_id"))?;
        }

        for (index, table) in resources.route_tables.iter().enumerate() {
            self.require(&table.vpc_id, NodeKind::Network)?;
            let node = Node::new(
                &table.route_table_id,
                NodeKind::RouteTable,
                name_or_id(&table.name, &table.route_table_id),
                attributes(json!({
                    "vpc_id": table.vpc_id,
                    "is_main": table.is_main,
                    "routes": table.routes,
                    "subnet_associations": table.subnet_associations,
                })),
            );
            self.insert(node, format!("route_tables[{index}].route_table_id"))?;
        }

        for (index, balancer) in resources.load_balancers.iter().enumerate() {
            self.require(&balancer.vpc_id, NodeKind::Network)?;
            let name = if balancer.name.is_empty() {
                name_from_arn(&balancer.load_balancer_arn).to_string()
            } else {
                balancer.name.clone()
            };
            let node = Node::new(
                &balancer.load_balancer_arn,
                NodeKind::LoadBalancer,
                name,
                attributes(json!({
                    "load_balancer_type": balancer.load_balancer_type,
                    "scheme": balancer.scheme,
                    "vpc_id": balancer.vpc_id,
                    "subnet_ids": balancer.subnet_ids,
                    "security_groups": balancer.security_groups,
                    "state": balancer.state,
                    "dns_name": balancer.dns_name,
                })),
            );
            self.insert(node, format!("load_balancers[{index}].load_balancer_arn"))?;
        }

        for (index, database) in resources.rds_instances.iter().enumerate() {
            self.require(&database.vpc_id, NodeKind::Network)?;
            let node = Node::new(
                &database.db_instance_identifier,
                NodeKind::Database,
                name_or_id(&database.name, &database.db_instance_identifier),
                attributes(json!({
                    "db_instance_arn": database.db_instance_arn.to_value(),
                    "engine": database.engine,
                    "engine_version": database.engine_version.to_value(),
                    "db_instance_class": database.db_instance_class.to_value(),
                    "vpc_id": database.vpc_id,
                    "subnet_group_name": database.subnet_group_name.to_value(),
                    "subnet_ids": database.subnet_ids,
                    "security_groups": database.security_groups,
                    "availability_zone": database.availability_zone.to_value(),
                    "multi_az": database.multi_az.to_value(),
                    "publicly_accessible": database.publicly_accessible.to_value(),
                    "endpoint": database.endpoint.to_value(),
                    "port": database.port.to_value(),
                    "status": database.status.to_value(),
                })),
            );
            self.insert(node, format!("rds_instances[{index}].db_instance_identifier"))?;
        }

        Ok(())
    }

    /// Network containment and subnetwork hosting. Subnetworks hang off the
    /// network that declares them; instance endpoints were checked when the
    /// instance nodes were created.
    fn network_edges(&mut self, resources: &ParsedResources) {
        for network in &resources.vpcs {
            for subnet in &network.subnets {
                let attrs = Attributes::new();
                self.edge(&network.vpc_id, &subnet.subnet_id, EdgeKind::Contains, attrs);
            }
        }
        for instance in &resources.ec2_instances {
            self.edge(
                &instance.vpc_id,
                &instance.instance_id,
                EdgeKind::Contains,
                Attributes::new(),
            );
        }
        for instance in &resources.ec2_instances {
            self.edge(
                &instance.subnet_id,
                &instance.instance_id,
                EdgeKind::Hosts,
                Attributes::new(),
            );
        }
    }

    fn policy_edges(&mut self, resources: &ParsedResources) -> Result<(), InfragramError> {
        for instance in &resources.ec2_instances {
            for policy_id in &instance.security_groups {
                self.require(policy_id, NodeKind::Policy)?;
                self.edge(&instance.instance_id, policy_id, EdgeKind::Uses, Attributes::new());
            }
        }
        Ok(())
    }

    /// Policy rules that name another policy become traffic edges. Inbound
    /// rules run from the referenced policy to the owner, outbound rules from
    /// the owner to the referenced policy.
    fn traffic_edges(&mut self, resources: &ParsedResources) -> Result<(), InfragramError> {
        for policy in &resources.security_groups {
            for rule in &policy.inbound_rules {
                if let Some(target) = self.rule_policy(rule)? {
                    let attrs = traffic(rule, "inbound");
                    self.edge(&target, &policy.group_id, EdgeKind::AllowsTraffic, attrs);
                }
            }
            for rule in &policy.outbound_rules {
                if let Some(target) = self.rule_policy(rule)? {
                    let attrs = traffic(rule, "outbound");
                    self.edge(&policy.group_id, &target, EdgeKind::AllowsTraffic, attrs);
                }
            }
        }
        Ok(())
    }

    fn rule_policy(&self, rule: &Rule) -> Result<Option<String>, InfragramError> {
        if rule.target.is_empty() || is_address_target(&rule.target) {
            return Ok(None);
        }
        self.require(&rule.target, NodeKind::Policy)?;
        Ok(Some(rule.target.clone()))
    }

    fn gateway_edges(&mut self, resources: &ParsedResources) -> Result<(), InfragramError> {
        for gateway in &resources.internet_gateways {
            if let Some(vpc_id) = gateway.vpc_id.as_option() {
                self.require(vpc_id, NodeKind::Network)?;
                self.edge(vpc_id, &gateway.gateway_id, EdgeKind::Attaches, Attributes::new());
            }
        }
        for gateway in &resources.nat_gateways {
            self.require(&gateway.subnet_id, NodeKind::Subnetwork)?;
            self.edge(&gateway.subnet_id, &gateway.gateway_id, EdgeKind::Hosts, Attributes::new());
        }
        Ok(())
    }

    fn route_table_edges(&mut self, resources: &ParsedResources) -> Result<(), InfragramError> {
        for table in &resources.route_tables {
            for subnet_id in &table.subnet_associations {
                self.require(subnet_id, NodeKind::Subnetwork)?;
                self.edge(
                    &table.route_table_id,
                    subnet_id,
                    EdgeKind::Associates,
                    Attributes::new(),
                );
            }

            for route in &table.routes {
                let target = match route.target_id.as_option() {
                    Some(target) if route.target_type != "local" && !target.is_empty() => target,
                    _ => continue,
                };
                if !is_ipv4_cidr(&route.destination) {
                    self.notices.push(SkipNotice::NonIpv4Route {
                        route_table: table.route_table_id.clone(),
                        destination: route.destination.clone(),
                    });
                    continue;
                }
                if !self.graph.contains(target) {
                    self.notices.push(SkipNotice::UnresolvedRouteTarget {
                        route_table: table.route_table_id.clone(),
                        target: target.clone(),
                    });
                    continue;
                }
                self.edge(
                    &table.route_table_id,
                    target,
                    EdgeKind::RoutesTo,
                    attributes(json!({
                        "destination": route.destination,
                        "target_type": route.target_type,
                    })),
                );
            }
        }
        Ok(())
    }

    fn load_balancer_edges(&mut self, resources: &ParsedResources) -> Result<(), InfragramError> {
        for balancer in &resources.load_balancers {
            for subnet_id in &balancer.subnet_ids {
                self.require(subnet_id, NodeKind::Subnetwork)?;
                self.edge(
                    &balancer.load_balancer_arn,
                    subnet_id,
                    EdgeKind::DistributesTo,
                    Attributes::new(),
                );
            }
            for policy_id in &balancer.security_groups {
                self.require(policy_id, NodeKind::Policy)?;
                self.edge(
                    &balancer.load_balancer_arn,
                    policy_id,
                    EdgeKind::Uses,
                    Attributes::new(),
                );
            }
        }
        Ok(())
    }

    /// A database is drawn in its first subnetwork only.
    fn database_edges(&mut self, resources: &ParsedResources) -> Result<(), InfragramError> {
        for database in &resources.rds_instances {
            if let Some(subnet_id) = database.subnet_ids.first() {
                self.require(subnet_id, NodeKind::Subnetwork)?;
                self.edge(
                    &database.db_instance_identifier,
                    subnet_id,
                    EdgeKind::ResidesIn,
                    Attributes::new(),
                );
            }
            for policy_id in &database.security_groups {
                self.require(policy_id, NodeKind::Policy)?;
                self.edge(
                    &database.db_instance_identifier,
                    policy_id,
                    EdgeKind::Uses,
                    Attributes::new(),
                );
            }
        }
        Ok(())
    }

    fn peering_edges(&mut self, resources: &ParsedResources) {
        for peering in &resources.vpc_peering_connections {
            let missing = [&peering.requester_vpc_id, &peering.accepter_vpc_id]
                .into_iter()
                .find(|id| self.require(id, NodeKind::Network).is_err());
            if let Some(network) = missing {
                self.notices.push(SkipNotice::UnresolvedPeering {
                    peering: peering.peering_connection_id.clone(),
                    network: network.to_string(),
                });
                continue;
            }
            if peering.status != "active" {
                self.notices.push(SkipNotice::InactivePeering {
                    peering: peering.peering_connection_id.clone(),
                    status: peering.status.clone(),
                });
                continue;
            }
            let name = peering.name.as_option().cloned().unwrap_or_default();
            self.edge(
                &peering.requester_vpc_id,
                &peering.accepter_vpc_id,
                EdgeKind::PeersWith,
                attributes(json!({
                    "peering_connection_id": peering.peering_connection_id,
                    "name": name,
                    "status": peering.status,
                })),
            );
        }
    }

    /// One group per network: its declared subnetworks, then the instances
    /// naming that network id.
    fn network_groups(&mut self, resources: &ParsedResources) {
        for network in &resources.vpcs {
            let members: Vec<String> = network
                .subnets
                .iter()
                .map(|subnet| subnet.subnet_id.clone())
                .chain(
                    resources
                        .ec2_instances
                        .iter()
                        .filter(|instance| instance.vpc_id == network.vpc_id)
                        .map(|instance| instance.instance_id.clone()),
                )
                .collect();
            trace!(network = network.vpc_id.as_str(), members = members.len(); "Group synthesized");

            self.graph.add_group(Group::network(
                &network.vpc_id,
                name_or_id(&network.name, &network.vpc_id),
                members,
                attributes(json!({
                    "vpc_id": network.vpc_id,
                    "cidr_block": network.cidr_block,
                })),
            ));
        }
    }
}

fn traffic(rule: &Rule, direction: &str) -> Attributes {
    attributes(json!({
        "protocol": rule.protocol,
        "from_port": rule.from_port.to_value(),
        "to_port": rule.to_port.to_value(),
        "direction": direction,
    }))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use infragram_parser::parse_resources;

    use super::*;

    fn payload() -> Value {
        json!({
            "ec2_instances": [
                {"instance_id": "i-1", "name": "web", "state": "running", "vpc_id": "vpc-1",
                 "subnet_id": "subnet-1", "security_groups": ["sg-web"], "private_ip": "10.0.1.10",
                 "public_ip": "54.0.0.1"},
                {"instance_id": "i-2", "name": "", "state": "running", "vpc_id": "vpc-1",
                 "subnet_id": "subnet-2", "security_groups": ["sg-db"], "private_ip": "10.0.2.10"}
            ],
            "vpcs": [
                {"vpc_id": "vpc-1", "name": "main", "cidr_block": "10.0.0.0/16", "subnets": [
                    {"subnet_id": "subnet-1", "name": "public", "cidr_block": "10.0.1.0/24", "availability_zone": "a"},
                    {"subnet_id": "subnet-2", "name": "private", "cidr_block": "10.0.2.0/24", "availability_zone": "b"}
                ]},
                {"vpc_id": "vpc-2", "name": "", "cidr_block": "10.1.0.0/16", "subnets": []}
            ],
            "security_groups": [
                {"group_id": "sg-web", "name": "web", "vpc_id": "vpc-1", "description": "",
                 "inbound_rules": [{"protocol": "tcp", "from_port": 443, "to_port": 443, "target": "0.0.0.0/0"}],
                 "outbound_rules": [{"protocol": "tcp", "from_port": 5432, "to_port": 5432, "target": "sg-db"}]},
                {"group_id": "sg-db", "name": "db", "vpc_id": "vpc-1", "description": "",
                 "inbound_rules": [
                    {"protocol": "tcp", "from_port": 5432, "to_port": 5432, "target": "sg-web"},
                    {"protocol": "tcp", "from_port": 5432, "to_port": 5432, "target": "pl-123"}
                 ],
                 "outbound_rules": []}
            ],
            "internet_gateways": [{"gateway_id": "igw-1", "name": "", "state": "available", "vpc_id": "vpc-1"}],
            "nat_gateways": [{"gateway_id": "nat-1", "name": "nat", "state": "available", "vpc_id": "vpc-1",
                              "subnet_id": "subnet-1", "public_ip": "54.0.0.2"}],
            "route_tables": [{"route_table_id": "rtb-1", "name": "public", "vpc_id": "vpc-1", "is_main": false,
                "routes": [
                    {"destination": "10.0.0.0/16", "target_type": "local", "target_id": "local"},
                    {"destination": "0.0.0.0/0", "target_type": "gateway", "target_id": "igw-1"},
                    {"destination": "::/0", "target_type": "gateway", "target_id": "igw-1"},
                    {"destination": "10.2.0.0/16", "target_type": "transit_gateway", "target_id": "tgw-9"}
                ],
                "subnet_associations": ["subnet-1"]}],
            "load_balancers": [{"load_balancer_arn": "arn:aws:elasticloadbalancing:us-east-1:1:loadbalancer/app/front/abc",
                "name": "", "load_balancer_type": "application", "scheme": "internet-facing", "vpc_id": "vpc-1",
                "subnet_ids": ["subnet-1", "subnet-2"], "security_groups": ["sg-web"], "state": "active", "dns_name": "x"}],
            "rds_instances": [{"db_instance_identifier": "db-1", "name": "orders", "engine": "postgres", "vpc_id": "vpc-1",
                "subnet_ids": ["subnet-2", "subnet-1"], "security_groups": ["sg-db"], "multi_az": true}],
            "vpc_peering_connections": [
                {"peering_connection_id": "pcx-1", "requester_vpc_id": "vpc-1", "accepter_vpc_id": "vpc-2", "status": "active"},
                {"peering_connection_id": "pcx-2", "requester_vpc_id": "vpc-1", "accepter_vpc_id": "vpc-2", "status": "pending-acceptance"},
                {"peering_connection_id": "pcx-3", "requester_vpc_id": "vpc-1", "accepter_vpc_id": "vpc-9", "status": "active"}
            ]
        })
    }

    fn build(payload: &Value) -> Result<(ResourceGraph, Vec<SkipNotice>), InfragramError> {
        let parsed = parse_resources(payload).unwrap();
        GraphBuilder::new().build_with_notices(&parsed)
    }

    fn edges_of(graph: &ResourceGraph, kind: EdgeKind) -> Vec<(&str, &str)> {
        graph
            .edges()
            .iter()
            .filter(|edge| edge.kind() == kind)
            .map(|edge| (edge.source(), edge.target()))
            .collect()
    }

    #[test]
    fn test_node_creation_order_and_names() {
        let (graph, _) = build(&payload()).unwrap();

        let ids: Vec<_> = graph.nodes().map(Node::id).collect();
        assert_eq!(
            ids[..5],
            ["vpc-1", "vpc-2", "subnet-1", "subnet-2", "i-1"]
        );
        assert_eq!(graph.node("vpc-2").unwrap().name(), "vpc-2");
        assert_eq!(graph.node("i-2").unwrap().name(), "i-2");
        assert_eq!(graph.node("igw-1").unwrap().name(), "igw-1");
        assert_eq!(
            graph
                .node("arn:aws:elasticloadbalancing:us-east-1:1:loadbalancer/app/front/abc")
                .unwrap()
                .name(),
            "front"
        );
    }

    #[test]
    fn test_node_attributes() {
        let (graph, _) = build(&payload()).unwrap();

        let instance = graph.node("i-2").unwrap();
        assert_eq!(instance.attributes()["public_ip"], Value::Null);
        assert_eq!(instance.attribute_str("private_ip"), Some("10.0.2.10"));

        let subnet = graph.node("subnet-1").unwrap();
        assert_eq!(subnet.attribute_str("vpc_id"), Some("vpc-1"));

        let database = graph.node("db-1").unwrap();
        assert_eq!(database.attributes()["multi_az"], json!(true));
        assert_eq!(database.attributes()["endpoint"], Value::Null);
    }

    #[test]
    fn test_containment_edges_come_first() {
        let (graph, _) = build(&payload()).unwrap();

        let first: Vec<_> = graph
            .edges()
            .iter()
            .take(4)
            .map(|edge| (edge.kind(), edge.source(), edge.target()))
            .collect();
        assert_eq!(
            first,
            [
                (EdgeKind::Contains, "vpc-1", "subnet-1"),
                (EdgeKind::Contains, "vpc-1", "subnet-2"),
                (EdgeKind::Contains, "vpc-1", "i-1"),
                (EdgeKind::Contains, "vpc-1", "i-2"),
            ]
        );
        assert_eq!(
            edges_of(&graph, EdgeKind::Hosts),
            [("subnet-1", "i-1"), ("subnet-2", "i-2"), ("subnet-1", "nat-1")]
        );
    }

    #[test]
    fn test_traffic_edge_direction() {
        let (graph, _) = build(&payload()).unwrap();

        let traffic: Vec<_> = graph
            .edges()
            .iter()
            .filter(|edge| edge.kind() == EdgeKind::AllowsTraffic)
            .collect();
        assert_eq!(traffic.len(), 2);

        assert_eq!((traffic[0].source(), traffic[0].target()), ("sg-web", "sg-db"));
        assert_eq!(traffic[0].attributes()["direction"], json!("outbound"));
        assert_eq!(traffic[0].attributes()["from_port"], json!(5432));

        assert_eq!((traffic[1].source(), traffic[1].target()), ("sg-web", "sg-db"));
        assert_eq!(traffic[1].attributes()["direction"], json!("inbound"));
    }

    #[test]
    fn test_routes_and_skip_notices() {
        let (graph, notices) = build(&payload()).unwrap();

        assert_eq!(edges_of(&graph, EdgeKind::Associates), [("rtb-1", "subnet-1")]);
        assert_eq!(edges_of(&graph, EdgeKind::RoutesTo), [("rtb-1", "igw-1")]);

        let route = graph
            .edges()
            .iter()
            .find(|edge| edge.kind() == EdgeKind::RoutesTo)
            .unwrap();
        assert_eq!(
            route.attributes(),
            &attributes(json!({"destination": "0.0.0.0/0", "target_type": "gateway"}))
        );

        assert_eq!(
            notices,
            [
                SkipNotice::NonIpv4Route {
                    route_table: "rtb-1".to_string(),
                    destination: "::/0".to_string(),
                },
                SkipNotice::UnresolvedRouteTarget {
                    route_table: "rtb-1".to_string(),
                    target: "tgw-9".to_string(),
                },
                SkipNotice::InactivePeering {
                    peering: "pcx-2".to_string(),
                    status: "pending-acceptance".to_string(),
                },
                SkipNotice::UnresolvedPeering {
                    peering: "pcx-3".to_string(),
                    network: "vpc-9".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_peering_edge_attributes() {
        let (graph, _) = build(&payload()).unwrap();

        let peering: Vec<_> = graph
            .edges()
            .iter()
            .filter(|edge| edge.kind() == EdgeKind::PeersWith)
            .collect();
        assert_eq!(peering.len(), 1);
        assert_eq!(peering[0].attributes()["peering_connection_id"], json!("pcx-1"));
        assert_eq!(peering[0].attributes()["name"], json!(""));
        assert_eq!(peering[0].attributes()["status"], json!("active"));
    }

    #[test]
    fn test_balancer_and_database_edges() {
        let (graph, _) = build(&payload()).unwrap();

        assert_eq!(edges_of(&graph, EdgeKind::DistributesTo).len(), 2);
        assert_eq!(edges_of(&graph, EdgeKind::ResidesIn), [("db-1", "subnet-2")]);
        assert_eq!(edges_of(&graph, EdgeKind::Attaches), [("vpc-1", "igw-1")]);
    }

    #[test]
    fn test_groups() {
        let (graph, _) = build(&payload()).unwrap();

        let group = graph.group("vpc-1").unwrap();
        assert_eq!(group.members(), ["subnet-1", "subnet-2", "i-1", "i-2"]);
        assert_eq!(
            group.attributes(),
            &attributes(json!({"vpc_id": "vpc-1", "cidr_block": "10.0.0.0/16"}))
        );
        assert!(graph.group("vpc-2").unwrap().members().is_empty());
        assert!(graph.dangling_references().is_empty());
    }

    #[test]
    fn test_missing_subnetwork_is_fatal() {
        let mut payload = payload();
        payload["ec2_instances"][0]["subnet_id"] = json!("subnet-x");

        match build(&payload) {
            Err(InfragramError::InvalidReference { id, category }) => {
                assert_eq!(id, "subnet-x");
                assert_eq!(category, NodeKind::Subnetwork);
            }
            other => panic!("expected invalid reference, got {other:?}"),
        }
    }

    fn assert_invalid_reference(payload: &Value, expected_id: &str, expected: NodeKind) {
        match build(payload) {
            Err(InfragramError::InvalidReference { id, category }) => {
                assert_eq!(id, expected_id);
                assert_eq!(category, expected);
            }
            other => panic!("expected invalid reference to {expected_id}, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_network_is_fatal() {
        let collections = [
            "security_groups",
            "load_balancers",
            "route_tables",
            "nat_gateways",
            "rds_instances",
        ];

        for collection in collections {
            let mut payload = payload();
            payload[collection][0]["vpc_id"] = json!("vpc-gone");
            assert_invalid_reference(&payload, "vpc-gone", NodeKind::Network);
        }
    }

    #[test]
    fn test_dangling_database_policy_is_fatal() {
        let mut payload = payload();
        payload["rds_instances"][0]["security_groups"] = json!(["sg-db", "sg-gone"]);

        assert_invalid_reference(&payload, "sg-gone", NodeKind::Policy);
    }

    #[test]
    fn test_dangling_balancer_subnetwork_is_fatal() {
        let mut payload = payload();
        payload["load_balancers"][0]["subnet_ids"] = json!(["subnet-1", "subnet-gone"]);

        assert_invalid_reference(&payload, "subnet-gone", NodeKind::Subnetwork);
    }

    #[test]
    fn test_missing_gateway_route_target_is_a_notice() {
        let mut payload = payload();
        payload["route_tables"][0]["routes"] = json!([
            {"destination": "0.0.0.0/0", "target_type": "gateway", "target_id": "igw-gone"}
        ]);

        let (graph, notices) = build(&payload).unwrap();

        assert!(edges_of(&graph, EdgeKind::RoutesTo).is_empty());
        assert!(notices.contains(&SkipNotice::UnresolvedRouteTarget {
            route_table: "rtb-1".to_string(),
            target: "igw-gone".to_string(),
        }));
        assert!(graph.dangling_references().is_empty());
    }

    #[test]
    fn test_subnetwork_edges_follow_declaring_network() {
        let mut parsed = parse_resources(&payload()).unwrap();
        parsed.vpcs[0].subnets[0].vpc_id = "vpc-gone".to_string();

        let (graph, _) = GraphBuilder::new().build_with_notices(&parsed).unwrap();

        let contains = edges_of(&graph, EdgeKind::Contains);
        assert_eq!(contains[..2], [("vpc-1", "subnet-1"), ("vpc-1", "subnet-2")]);
        assert!(graph.group("vpc-1").unwrap().members().contains(&"subnet-1".to_string()));
        assert!(graph.dangling_references().is_empty());
    }

    #[test]
    fn test_missing_policy_in_rule_is_fatal() {
        let mut payload = payload();
        payload["security_groups"][1]["inbound_rules"][0]["target"] = json!("sg-gone");

        let err = build(&payload).unwrap_err();
        assert!(matches!(
            err,
            InfragramError::InvalidReference { ref id, category: NodeKind::Policy }
                if id == "sg-gone"
        ));
    }

    #[test]
    fn test_duplicate_id_is_fatal() {
        let mut payload = payload();
        payload["ec2_instances"][1]["instance_id"] = json!("i-1");

        let err = build(&payload).unwrap_err();
        match err {
            InfragramError::Validation(err) => {
                assert_eq!(err.path(), "ec2_instances[1].instance_id")
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_helpers() {
        assert!(is_ipv4_cidr("10.0.0.0/16"));
        assert!(is_ipv4_cidr("0.0.0.0/0"));
        assert!(is_ipv4_cidr("192.168.1.1"));
        assert!(!is_ipv4_cidr("::/0"));
        assert!(!is_ipv4_cidr("10.0.0.0/33"));
        assert!(!is_ipv4_cidr("pl-123"));

        assert!(is_address_target("0.0.0.0/0"));
        assert!(is_address_target("2001:db8::/32"));
        assert!(is_address_target("pl-123"));
        assert!(!is_address_target("sg-123"));

        assert_eq!(
            name_from_arn("arn:aws:elasticloadbalancing:r:1:loadbalancer/net/edge/123"),
            "edge"
        );
        assert_eq!(name_from_arn("plain"), "plain");
    }
}
