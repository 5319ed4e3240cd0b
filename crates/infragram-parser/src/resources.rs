//! Resource payload validation and normalization.
//!
//! A resource payload is the flat snapshot produced by the collection layer:
//! one JSON object holding a list per resource class. [`parse_resources`]
//! checks every required field once and turns the payload into typed records.
//! Every subnetwork carries its parent network id, and
//! [`ParsedResources::subnets`] walks them across all networks.
//!
//! Reserializing a [`ParsedResources`] with `serde_json` reproduces a payload
//! that parses back to an identical value.

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{decode::decode, error::Result, nullable::Nullable};

/// A compute instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    pub instance_id: String,
    pub name: String,
    pub state: String,
    pub vpc_id: String,
    pub subnet_id: String,
    pub security_groups: Vec<String>,
    pub private_ip: String,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub public_ip: Nullable<String>,
}

/// A network with its nested subnetworks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub vpc_id: String,
    pub name: String,
    pub cidr_block: String,
    pub subnets: Vec<Subnet>,
}

/// A subnetwork. `vpc_id` is injected from the enclosing network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subnet {
    pub subnet_id: String,
    pub name: String,
    pub cidr_block: String,
    pub availability_zone: String,
    #[serde(skip)]
    pub vpc_id: String,
}

/// A security policy with its traffic rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub group_id: String,
    pub name: String,
    pub vpc_id: String,
    pub description: String,
    pub inbound_rules: Vec<Rule>,
    pub outbound_rules: Vec<Rule>,
}

/// One traffic rule of a policy.
///
/// `target` is either an address range, a prefix list id or another policy id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub protocol: String,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub from_port: Nullable<i64>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub to_port: Nullable<i64>,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternetGateway {
    pub gateway_id: String,
    pub name: String,
    pub state: String,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub vpc_id: Nullable<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NatGateway {
    pub gateway_id: String,
    pub name: String,
    pub state: String,
    pub vpc_id: String,
    pub subnet_id: String,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub public_ip: Nullable<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteTable {
    pub route_table_id: String,
    pub name: String,
    pub vpc_id: String,
    pub is_main: bool,
    pub routes: Vec<Route>,
    pub subnet_associations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub destination: String,
    pub target_type: String,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub target_id: Nullable<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadBalancer {
    pub load_balancer_arn: String,
    pub name: String,
    pub load_balancer_type: String,
    pub scheme: String,
    pub vpc_id: String,
    pub subnet_ids: Vec<String>,
    pub security_groups: Vec<String>,
    pub state: String,
    pub dns_name: String,
}

/// A managed database instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Database {
    pub db_instance_identifier: String,
    pub name: String,
    pub engine: String,
    pub vpc_id: String,
    pub subnet_ids: Vec<String>,
    pub security_groups: Vec<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub db_instance_arn: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub engine_version: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub db_instance_class: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub subnet_group_name: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub multi_az: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub availability_zone: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub publicly_accessible: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub endpoint: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub port: Nullable<i64>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub status: Nullable<String>,
}

/// A peering link between two networks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeeringConnection {
    pub peering_connection_id: String,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub name: Nullable<String>,
    pub requester_vpc_id: String,
    pub accepter_vpc_id: String,
    pub status: String,
}

/// A validated resource payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedResources {
    pub ec2_instances: Vec<Instance>,
    pub vpcs: Vec<Network>,
    pub security_groups: Vec<Policy>,
    #[serde(default)]
    pub internet_gateways: Vec<InternetGateway>,
    #[serde(default)]
    pub nat_gateways: Vec<NatGateway>,
    #[serde(default)]
    pub route_tables: Vec<RouteTable>,
    #[serde(default)]
    pub load_balancers: Vec<LoadBalancer>,
    #[serde(default)]
    pub rds_instances: Vec<Database>,
    #[serde(default)]
    pub vpc_peering_connections: Vec<PeeringConnection>,
}

impl ParsedResources {
    /// All subnetworks of all networks, in declaration order.
    pub fn subnets(&self) -> impl Iterator<Item = &Subnet> {
        self.vpcs.iter().flat_map(|network| network.subnets.iter())
    }
}

/// Validates a resource payload.
///
/// Fails on the first missing or wrong-typed field; no partial result is
/// returned.
///
/// # Examples
///
/// ```
/// # use infragram_parser::parse_resources;
/// let payload = serde_json::json!({
///     "ec2_instances": [],
///     "vpcs": [{
///         "vpc_id": "vpc-1",
///         "name": "main",
///         "cidr_block": "10.0.0.0/16",
///         "subnets": [{
///             "subnet_id": "subnet-1",
///             "name": "public",
///             "cidr_block": "10.0.1.0/24",
///             "availability_zone": "us-east-1a"
///         }]
///     }],
///     "security_groups": []
/// });
///
/// let parsed = parse_resources(&payload).unwrap();
/// let subnets: Vec<_> = parsed.subnets().collect();
/// assert_eq!(subnets.len(), 1);
/// assert_eq!(subnets[0].vpc_id, "vpc-1");
/// ```
pub fn parse_resources(payload: &Value) -> Result<ParsedResources> {
    let mut parsed: ParsedResources = decode(payload)?;

    for network in &mut parsed.vpcs {
        for subnet in &mut network.subnets {
            subnet.vpc_id.clone_from(&network.vpc_id);
        }
    }

    debug!(
        instances = parsed.ec2_instances.len(),
        networks = parsed.vpcs.len(),
        subnetworks = parsed.subnets().count(),
        policies = parsed.security_groups.len();
        "Resource payload validated"
    );
    Ok(parsed)
}
