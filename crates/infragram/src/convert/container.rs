use infragram_core::{
    diagram::Container,
    geometry::Size,
    graph::{Node, NodeKind},
};

use super::StyleSheet;
use crate::config::LayoutConfig;

/// Returns the diagram id of the container drawn for a node.
pub fn container_id(node_id: &str) -> String {
    format!("container-{node_id}")
}

/// Builds network and subnetwork boxes.
///
/// Containers start at their category's floor size; the layout engine grows
/// them to fit their children.
#[derive(Debug)]
pub struct ContainerConverter<'a> {
    styles: &'a StyleSheet,
    network_size: Size,
    subnetwork_size: Size,
}

impl<'a> ContainerConverter<'a> {
    pub fn new(styles: &'a StyleSheet, layout: &LayoutConfig) -> Self {
        let (network_width, network_height) = layout.network_min_size();
        let (subnetwork_width, subnetwork_height) = layout.subnetwork_min_size();
        Self {
            styles,
            network_size: Size::new(network_width, network_height),
            subnetwork_size: Size::new(subnetwork_width, subnetwork_height),
        }
    }

    /// Converts a network or subnetwork node. `children` are diagram ids in
    /// placement order.
    pub fn convert(&self, node: &Node, parent: Option<&str>, children: Vec<String>) -> Container {
        let size = match node.kind() {
            NodeKind::Subnetwork => self.subnetwork_size,
            _ => self.network_size,
        };
        let container = Container::new(
            container_id(node.id()),
            node.id(),
            node.kind(),
            container_label(node),
            self.styles.container(node.kind()),
            size,
        )
        .with_children(children);
        match parent {
            Some(parent) => container.with_parent(parent),
            None => container,
        }
    }
}

/// Returns `name` and CIDR block on two lines, or whichever one is set.
pub fn container_label(node: &Node) -> String {
    let cidr = node.attribute_str("cidr_block").unwrap_or_default();
    match (node.name(), cidr) {
        (name, "") => name.to_string(),
        ("", cidr) => cidr.to_string(),
        (name, cidr) => format!("{name}\n{cidr}"),
    }
}
