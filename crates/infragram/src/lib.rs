//! Infragram - cloud resource snapshots to architecture diagrams.
//!
//! Validation, graph construction, layout, and draw.io export for snapshots
//! of networks, subnetworks, instances, security policies, gateways, route
//! tables, load balancers, databases and peering links.
//!
//! ```text
//! resource payload ─ parse ─ build ─▶ ResourceGraph ─ to_json ─▶ graph payload
//! graph payload ─ classify ─ convert ─ layout ─ export ─▶ .drawio document
//! ```

pub mod config;
pub mod convert;
pub mod diagram;
pub mod export;
pub mod graph;
pub mod layout;

mod error;

pub use infragram_core::{color, geometry};

pub use error::InfragramError;

use log::{debug, info, trace};
use serde_json::Value;

use config::AppConfig;
use diagram::DiagramGenerator;
use graph::{GraphBuilder, ResourceGraph};

/// Entry point for building graphs and rendering diagrams.
///
/// # Examples
///
/// ```
/// use infragram::{Infragram, config::AppConfig};
///
/// let resources = serde_json::json!({
///     "ec2_instances": [],
///     "vpcs": [{"vpc_id": "vpc-1", "name": "main", "cidr_block": "10.0.0.0/16", "subnets": []}],
///     "security_groups": []
/// });
///
/// let infragram = Infragram::new(AppConfig::default());
/// let xml = infragram.render_resources(&resources).unwrap();
/// assert!(xml.contains("container-vpc-1"));
/// ```
#[derive(Debug, Default)]
pub struct Infragram {
    config: AppConfig,
}

impl Infragram {
    /// Create a new instance with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Validates a resource payload and builds its resource graph.
    ///
    /// Skip notices are logged at `warn`; use [`GraphBuilder`] directly to
    /// collect them.
    ///
    /// # Errors
    ///
    /// Returns [`InfragramError::Validation`] for malformed input and
    /// [`InfragramError::InvalidReference`] for dangling resource ids.
    pub fn build_graph(&self, resources: &Value) -> Result<ResourceGraph, InfragramError> {
        info!("Parsing resources");
        let parsed = infragram_parser::parse_resources(resources)?;
        debug!(
            instances = parsed.ec2_instances.len(),
            networks = parsed.vpcs.len(),
            subnetworks = parsed.subnets().count(),
            policies = parsed.security_groups.len();
            "Resources parsed"
        );

        GraphBuilder::new().build(&parsed)
    }

    /// Renders a graph payload as a draw.io document.
    ///
    /// # Errors
    ///
    /// Returns [`InfragramError::Validation`] for a malformed payload,
    /// [`InfragramError::UnknownCategory`] for an unclassifiable node, and
    /// [`InfragramError::Config`] for invalid style overrides.
    pub fn render_drawio(&self, graph: &Value) -> Result<String, InfragramError> {
        let generator = DiagramGenerator::new(self.config.clone())?;
        let xml = generator.render_drawio(graph)?;
        info!(bytes = xml.len(); "draw.io document rendered");
        Ok(xml)
    }

    /// Runs the whole pipeline: parse, build, serialize, and render.
    pub fn render_resources(&self, resources: &Value) -> Result<String, InfragramError> {
        let graph = self.build_graph(resources)?.to_json()?;
        trace!(graph:% = graph; "Graph payload");
        self.render_drawio(&graph)
    }
}
