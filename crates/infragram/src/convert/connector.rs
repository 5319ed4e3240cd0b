use serde_json::Value;

use infragram_core::{
    diagram::Connector,
    graph::{Attributes, Edge},
};

use super::{StyleSheet, shape_id};

/// Per-generation mutable state.
///
/// Connector ids are numbered from one within a single generation run. A
/// fresh context is created for every run, so independent runs never share
/// the counter.
#[derive(Debug, Default)]
pub struct GenerationContext {
    connectors_issued: usize,
}

impl GenerationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next connector id (`connector-1`, `connector-2`, ...).
    pub fn next_connector_id(&mut self) -> String {
        self.connectors_issued += 1;
        format!("connector-{}", self.connectors_issued)
    }

    pub fn connectors_issued(&self) -> usize {
        self.connectors_issued
    }
}

/// Fans traffic edges out into instance-to-instance arrows.
#[derive(Debug)]
pub struct ConnectorConverter<'a> {
    styles: &'a StyleSheet,
}

impl<'a> ConnectorConverter<'a> {
    pub fn new(styles: &'a StyleSheet) -> Self {
        Self { styles }
    }

    /// Emits one connector per (source instance, target instance) pair.
    ///
    /// Returns nothing when either side has no instances.
    pub fn convert(
        &self,
        context: &mut GenerationContext,
        edge: &Edge,
        sources: &[String],
        targets: &[String],
    ) -> Vec<Connector> {
        let label = traffic_label(edge.attributes());
        let style = self.styles.connector();

        let mut connectors = Vec::with_capacity(sources.len() * targets.len());
        for source in sources {
            for target in targets {
                connectors.push(Connector::new(
                    context.next_connector_id(),
                    shape_id(source),
                    shape_id(target),
                    label.as_str(),
                    style.as_str(),
                ));
            }
        }
        connectors
    }
}

/// Returns `protocol`, or `protocol:port` when the edge carries a port.
///
/// An explicit `port` attribute wins; otherwise the rule's port range is
/// used, rendered `from-to` when the bounds differ.
pub fn traffic_label(attributes: &Attributes) -> String {
    let protocol = attributes
        .get("protocol")
        .and_then(Value::as_str)
        .filter(|protocol| !protocol.is_empty())
        .unwrap_or("TCP");

    let port = port_text(attributes.get("port")).or_else(|| {
        let from = port_text(attributes.get("from_port"));
        let to = port_text(attributes.get("to_port"));
        match (from, to) {
            (Some(from), Some(to)) if from != to => Some(format!("{from}-{to}")),
            (Some(from), _) => Some(from),
            (None, to) => to,
        }
    });

    match port {
        Some(port) => format!("{protocol}:{port}"),
        None => protocol.to_string(),
    }
}

fn port_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
