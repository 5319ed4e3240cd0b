//! Diagram generation from a graph payload.
//!
//! [`DiagramGenerator`] runs a fixed sequence of stages, each fatal on error:
//!
//! 1. validate the payload shape,
//! 2. classify every node into a [`NodeKind`] (both through
//!    [`ResourceGraph::from_json`]),
//! 3. derive membership maps from the edge list,
//! 4. build containers (networks, then subnetworks),
//! 5. build leaf shapes,
//! 6. run the layout engine,
//! 7. build traffic connectors,
//! 8. emit the document.
//!
//! All state lives in locals of one call, so one generator can serve any
//! number of runs.

use indexmap::IndexMap;
use log::{debug, info, trace};
use serde_json::Value;

pub use infragram_core::diagram::{Connector, Container, Shape};
use infragram_core::graph::{Edge, EdgeKind, Node, NodeKind};

use crate::{
    config::AppConfig,
    convert::{
        ConnectorConverter, ContainerConverter, GenerationContext, ShapeConverter, StyleSheet,
        container_id, shape_id,
    },
    error::InfragramError,
    export::{Exporter, drawio::DrawioExporter},
    graph::ResourceGraph,
    layout::LayoutEngine,
};

/// A laid-out diagram ready for export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagram {
    containers: Vec<Container>,
    shapes: Vec<Shape>,
    connectors: Vec<Connector>,
}

impl Diagram {
    pub fn new(containers: Vec<Container>, shapes: Vec<Shape>, connectors: Vec<Connector>) -> Self {
        Self {
            containers,
            shapes,
            connectors,
        }
    }

    pub fn containers(&self) -> &[Container] {
        &self.containers
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }
}

/// Membership derived from the edge list of one payload.
#[derive(Debug, Default)]
struct Relations {
    /// Policy id to the instances that use it.
    policy_instances: IndexMap<String, Vec<String>>,
    /// Subnetwork id to its network id.
    subnetwork_parent: IndexMap<String, String>,
    /// Leaf id to its subnetwork id.
    leaf_parent: IndexMap<String, String>,
}

impl Relations {
    fn derive(graph: &ResourceGraph) -> Self {
        let kind_of = |id: &str| graph.node(id).map(Node::kind);
        let mut relations = Self::default();

        for edge in graph.edges() {
            let (Some(source), Some(target)) = (kind_of(edge.source()), kind_of(edge.target()))
            else {
                trace!(
                    source = edge.source(),
                    target = edge.target();
                    "Edge with unknown endpoint ignored"
                );
                continue;
            };

            match (edge.kind(), source, target) {
                (EdgeKind::Uses, NodeKind::Instance, NodeKind::Policy) => {
                    let instances = relations
                        .policy_instances
                        .entry(edge.target().to_string())
                        .or_default();
                    if !instances.iter().any(|id| id == edge.source()) {
                        instances.push(edge.source().to_string());
                    }
                }
                (EdgeKind::Contains, NodeKind::Network, NodeKind::Subnetwork) => {
                    relations
                        .subnetwork_parent
                        .entry(edge.target().to_string())
                        .or_insert_with(|| edge.source().to_string());
                }
                (EdgeKind::Hosts, NodeKind::Subnetwork, target) if target.is_leaf() => {
                    relations
                        .leaf_parent
                        .entry(edge.target().to_string())
                        .or_insert_with(|| edge.source().to_string());
                }
                (EdgeKind::ResidesIn, source, NodeKind::Subnetwork) if source.is_leaf() => {
                    relations
                        .leaf_parent
                        .entry(edge.source().to_string())
                        .or_insert_with(|| edge.target().to_string());
                }
                _ => {}
            }
        }

        relations
    }

    fn instances_of(&self, policy: &str) -> &[String] {
        self.policy_instances
            .get(policy)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Turns graph payloads into laid-out diagrams and draw.io documents.
#[derive(Debug, Clone)]
pub struct DiagramGenerator {
    config: AppConfig,
    styles: StyleSheet,
}

impl DiagramGenerator {
    /// Creates a generator.
    ///
    /// # Errors
    ///
    /// Returns [`InfragramError::Config`] when a configured stroke color is
    /// not a valid CSS color.
    pub fn new(config: AppConfig) -> Result<Self, InfragramError> {
        let styles = StyleSheet::from_config(config.style()).map_err(InfragramError::Config)?;
        Ok(Self { config, styles })
    }

    /// Runs every stage up to, and including, connector construction.
    pub fn generate(&self, payload: &Value) -> Result<Diagram, InfragramError> {
        info!("Generating diagram");

        let graph = ResourceGraph::from_json(payload)?;
        debug!(nodes = graph.node_count(); "Nodes classified");
        let relations = Relations::derive(&graph);
        debug!(
            policies = relations.policy_instances.len(),
            subnetworks = relations.subnetwork_parent.len(),
            leaves = relations.leaf_parent.len();
            "Relation maps derived"
        );

        let mut containers = self.build_containers(&graph, &relations);
        let mut shapes = self.build_shapes(&graph, &relations);

        LayoutEngine::new(self.config.layout()).layout(&mut containers, &mut shapes);

        let connectors = self.build_connectors(graph.edges(), &relations);

        info!(
            containers = containers.len(),
            shapes = shapes.len(),
            connectors = connectors.len();
            "Diagram generated"
        );
        Ok(Diagram::new(containers, shapes, connectors))
    }

    /// Generates a diagram and emits it as a draw.io document.
    pub fn render_drawio(&self, payload: &Value) -> Result<String, InfragramError> {
        let diagram = self.generate(payload)?;

        let mut exporter = DrawioExporter::new(Vec::new(), self.config.style());
        exporter.export_diagram(&diagram)?;
        String::from_utf8(exporter.into_inner())
            .map_err(|err| crate::export::Error::Write(err.to_string()).into())
    }

    fn build_containers(&self, graph: &ResourceGraph, relations: &Relations) -> Vec<Container> {
        let converter = ContainerConverter::new(&self.styles, self.config.layout());
        let subnetworks = || graph.nodes().filter(|node| node.kind() == NodeKind::Subnetwork);

        let networks = graph
            .nodes()
            .filter(|node| node.kind() == NodeKind::Network)
            .map(|network| {
                let children = subnetworks()
                    .filter(|subnetwork| {
                        relations.subnetwork_parent.get(subnetwork.id()).map(String::as_str)
                            == Some(network.id())
                    })
                    .map(|subnetwork| container_id(subnetwork.id()))
                    .collect();
                converter.convert(network, None, children)
            });

        let nested = subnetworks().map(|subnetwork| {
            let parent = relations
                .subnetwork_parent
                .get(subnetwork.id())
                .map(|network| container_id(network.as_str()));
            let children = graph
                .nodes()
                .filter(|node| node.kind().is_leaf())
                .filter(|leaf| {
                    let parent = relations.leaf_parent.get(leaf.id()).map(String::as_str);
                    parent == Some(subnetwork.id())
                })
                .map(|leaf| shape_id(leaf.id()))
                .collect();
            converter.convert(subnetwork, parent.as_deref(), children)
        });

        networks.chain(nested).collect()
    }

    fn build_shapes(&self, graph: &ResourceGraph, relations: &Relations) -> Vec<Shape> {
        let converter = ShapeConverter::new(&self.styles, self.config.layout().icon_size());
        graph
            .nodes()
            .filter(|node| node.kind().is_leaf())
            .map(|leaf| {
                let parent = relations
                    .leaf_parent
                    .get(leaf.id())
                    .map(|subnetwork| container_id(subnetwork.as_str()));
                converter.convert(leaf, parent.as_deref())
            })
            .collect()
    }

    fn build_connectors(&self, edges: &[Edge], relations: &Relations) -> Vec<Connector> {
        let converter = ConnectorConverter::new(&self.styles);
        let mut context = GenerationContext::new();

        edges
            .iter()
            .filter(|edge| edge.kind() == EdgeKind::AllowsTraffic)
            .flat_map(|edge| {
                converter.convert(
                    &mut context,
                    edge,
                    relations.instances_of(edge.source()),
                    relations.instances_of(edge.target()),
                )
            })
            .collect()
    }
}
