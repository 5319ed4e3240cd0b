use infragram_core::{
    diagram::Shape,
    geometry::Size,
    graph::{Node, NodeKind},
};

use super::StyleSheet;

/// Returns the diagram id of the shape drawn for a node.
pub fn shape_id(node_id: &str) -> String {
    format!("shape-{node_id}")
}

/// Builds leaf icon shapes.
#[derive(Debug)]
pub struct ShapeConverter<'a> {
    styles: &'a StyleSheet,
    icon_size: f32,
}

impl<'a> ShapeConverter<'a> {
    pub fn new(styles: &'a StyleSheet, icon_size: f32) -> Self {
        Self { styles, icon_size }
    }

    /// Converts a leaf node into a square icon at the origin, nested in
    /// `parent` when given.
    pub fn convert(&self, node: &Node, parent: Option<&str>) -> Shape {
        let shape = Shape::new(
            shape_id(node.id()),
            node.id(),
            node.kind(),
            shape_label(node),
            self.styles.shape(node.kind()),
            Size::square(self.icon_size),
        );
        match parent {
            Some(parent) => shape.with_parent(parent),
            None => shape,
        }
    }
}

/// Returns the multi-line label of a leaf icon.
pub fn shape_label(node: &Node) -> String {
    let attribute = |key| node.attribute_str(key).filter(|value| !value.is_empty());
    let name = Some(node.name()).filter(|name| !name.is_empty());

    let (parts, fallback): (Vec<String>, &str) = match node.kind() {
        NodeKind::NatGateway => (
            [name, attribute("public_ip")]
                .into_iter()
                .flatten()
                .map(str::to_string)
                .collect(),
            "NAT Gateway",
        ),
        NodeKind::Database => {
            let mut parts: Vec<String> = name.map(str::to_string).into_iter().collect();
            if let Some(engine) = attribute("engine") {
                parts.push(format!("({})", engine_label(engine)));
            }
            if node.attributes().get("multi_az").and_then(|value| value.as_bool()) == Some(true) {
                parts.push("[Multi-AZ]".to_string());
            }
            (parts, "RDS")
        }
        _ => {
            let mut parts: Vec<String> = [name, attribute("private_ip")]
                .into_iter()
                .flatten()
                .map(str::to_string)
                .collect();
            if let Some(public_ip) = attribute("public_ip") {
                parts.push(format!("(Public: {public_ip})"));
            }
            (parts, "")
        }
    };

    if parts.is_empty() {
        fallback.to_string()
    } else {
        parts.join("\n")
    }
}

/// Maps an engine identifier to its product family name.
fn engine_label(engine: &str) -> String {
    const FAMILIES: [(&str, &str); 6] = [
        ("mysql", "MySQL"),
        ("postgres", "PostgreSQL"),
        ("mariadb", "MariaDB"),
        ("oracle", "Oracle"),
        ("sqlserver", "SQL Server"),
        ("aurora", "Aurora"),
    ];
    FAMILIES
        .iter()
        .find(|(pattern, _)| engine.contains(pattern))
        .map_or_else(|| engine.to_uppercase(), |(_, label)| label.to_string())
}
