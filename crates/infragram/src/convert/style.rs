use infragram_core::graph::NodeKind;

use crate::config::StyleConfig;

const NETWORK_STROKE: &str = "#248814";
const SUBNETWORK_STROKE: &str = "#147EBA";
const CONNECTOR_STROKE: &str = "#000000";

/// Resolved draw.io style strings for every drawn category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSheet {
    network_stroke: String,
    subnetwork_stroke: String,
    connector_stroke: String,
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self {
            network_stroke: NETWORK_STROKE.to_string(),
            subnetwork_stroke: SUBNETWORK_STROKE.to_string(),
            connector_stroke: CONNECTOR_STROKE.to_string(),
        }
    }
}

impl StyleSheet {
    /// Applies the stroke overrides of a [`StyleConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error message when a configured color cannot be parsed.
    pub fn from_config(config: &StyleConfig) -> Result<Self, String> {
        let defaults = Self::default();
        Ok(Self {
            network_stroke: config
                .network_stroke()?
                .map_or(defaults.network_stroke, |color| color.to_hex()),
            subnetwork_stroke: config
                .subnetwork_stroke()?
                .map_or(defaults.subnetwork_stroke, |color| color.to_hex()),
            connector_stroke: config
                .connector_stroke()?
                .map_or(defaults.connector_stroke, |color| color.to_hex()),
        })
    }

    /// Group style of a network or subnetwork box.
    pub fn container(&self, kind: NodeKind) -> String {
        let (icon, stroke) = match kind {
            NodeKind::Subnetwork => ("group_subnet", &self.subnetwork_stroke),
            _ => ("group_vpc", &self.network_stroke),
        };
        format!(
            "shape=mxgraph.aws4.group;grIcon=mxgraph.aws4.{icon};strokeColor={stroke};fillColor=none;verticalAlign=top;"
        )
    }

    /// Resource icon style of a leaf shape.
    pub fn shape(&self, kind: NodeKind) -> String {
        let (icon, fill) = match kind {
            NodeKind::NatGateway => ("nat_gateway", "#8C4FFF"),
            NodeKind::Database => ("rds", "#C925D1"),
            _ => ("ec2", "#ED7100"),
        };
        format!(
            "shape=mxgraph.aws4.resourceIcon;resIcon=mxgraph.aws4.{icon};strokeColor=#ffffff;fillColor={fill};verticalLabelPosition=bottom;verticalAlign=top;"
        )
    }

    /// Bold arrow style of a traffic connector.
    pub fn connector(&self) -> String {
        format!(
            "edgeStyle=orthogonalEdgeStyle;strokeWidth=2;strokeColor={};endArrow=classic;html=1;",
            self.connector_stroke
        )
    }
}
