//! Configuration types for Infragram diagram generation.
//!
//! This module provides configuration structures that control how diagrams
//! are laid out and styled. All types implement [`serde::Deserialize`] so they
//! can be loaded from a TOML file; every missing field falls back to its
//! default.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level application configuration combining layout and style settings.
//! - [`LayoutConfig`] - Grid spacing, column counts, padding and minimum container sizes.
//! - [`StyleConfig`] - Document naming and stroke color overrides.
//!
//! # Example
//!
//! ```
//! # use infragram::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().network_spacing(), 150.0);
//! assert!(config.style().network_stroke().is_ok());
//! ```

use serde::Deserialize;

use infragram_core::color::Color;

/// Top-level application configuration combining layout and style settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified layout and style configurations.
    pub fn new(layout: LayoutConfig, style: StyleConfig) -> Self {
        Self { layout, style }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Grid layout configuration.
///
/// Spacings are lower-bounded by the tier minimums
/// ([`MIN_NETWORK_SPACING`], [`MIN_SUBNETWORK_SPACING`],
/// [`MIN_INSTANCE_SPACING`]): a smaller configured value is raised to the
/// minimum when read.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    origin_x: f32,
    origin_y: f32,
    network_spacing: f32,
    subnetwork_spacing: f32,
    instance_spacing: f32,
    subnetwork_columns: usize,
    instance_columns: usize,
    container_padding: f32,
    label_height: f32,
    icon_size: f32,
    network_min_width: f32,
    network_min_height: f32,
    subnetwork_min_width: f32,
    subnetwork_min_height: f32,
}

/// Minimum gap between two networks.
pub const MIN_NETWORK_SPACING: f32 = 150.0;
/// Minimum gap between two subnetworks of the same network.
pub const MIN_SUBNETWORK_SPACING: f32 = 120.0;
/// Minimum gap between two icons of the same subnetwork.
pub const MIN_INSTANCE_SPACING: f32 = 100.0;

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            origin_x: 40.0,
            origin_y: 40.0,
            network_spacing: MIN_NETWORK_SPACING,
            subnetwork_spacing: MIN_SUBNETWORK_SPACING,
            instance_spacing: MIN_INSTANCE_SPACING,
            subnetwork_columns: 2,
            instance_columns: 3,
            container_padding: 40.0,
            label_height: 30.0,
            icon_size: 78.0,
            network_min_width: 800.0,
            network_min_height: 600.0,
            subnetwork_min_width: 360.0,
            subnetwork_min_height: 300.0,
        }
    }
}

impl LayoutConfig {
    /// Sets the spacing between networks.
    pub fn with_network_spacing(mut self, spacing: f32) -> Self {
        self.network_spacing = spacing;
        self
    }

    /// Sets the spacing between subnetworks inside a network.
    pub fn with_subnetwork_spacing(mut self, spacing: f32) -> Self {
        self.subnetwork_spacing = spacing;
        self
    }

    /// Sets the spacing between icons inside a subnetwork.
    pub fn with_instance_spacing(mut self, spacing: f32) -> Self {
        self.instance_spacing = spacing;
        self
    }

    /// Sets the column counts of the subnetwork and icon grids.
    pub fn with_columns(mut self, subnetwork_columns: usize, instance_columns: usize) -> Self {
        self.subnetwork_columns = subnetwork_columns;
        self.instance_columns = instance_columns;
        self
    }

    /// Sets the inner padding of containers.
    pub fn with_container_padding(mut self, padding: f32) -> Self {
        self.container_padding = padding;
        self
    }

    /// Returns the position of the first top-level cell.
    pub fn origin(&self) -> (f32, f32) {
        (self.origin_x, self.origin_y)
    }

    pub fn network_spacing(&self) -> f32 {
        self.network_spacing.max(MIN_NETWORK_SPACING)
    }

    pub fn subnetwork_spacing(&self) -> f32 {
        self.subnetwork_spacing.max(MIN_SUBNETWORK_SPACING)
    }

    pub fn instance_spacing(&self) -> f32 {
        self.instance_spacing.max(MIN_INSTANCE_SPACING)
    }

    /// Column count of the subnetwork grid, at least one.
    pub fn subnetwork_columns(&self) -> usize {
        self.subnetwork_columns.max(1)
    }

    /// Column count of the icon grid, at least one.
    pub fn instance_columns(&self) -> usize {
        self.instance_columns.max(1)
    }

    pub fn container_padding(&self) -> f32 {
        self.container_padding.max(0.0)
    }

    pub fn label_height(&self) -> f32 {
        self.label_height.max(0.0)
    }

    pub fn icon_size(&self) -> f32 {
        self.icon_size
    }

    /// Size of a network container without children.
    pub fn network_min_size(&self) -> (f32, f32) {
        (self.network_min_width, self.network_min_height)
    }

    /// Size of a subnetwork container without children.
    pub fn subnetwork_min_size(&self) -> (f32, f32) {
        (self.subnetwork_min_width, self.subnetwork_min_height)
    }
}

/// Visual styling and document configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Name of the diagram page.
    diagram_name: String,

    /// Value of the `host` attribute of the document root.
    host: String,

    /// Stroke color overrides, as CSS color strings.
    network_stroke: Option<String>,
    subnetwork_stroke: Option<String>,
    connector_stroke: Option<String>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            diagram_name: "AWS Architecture".to_string(),
            host: "app.diagrams.net".to_string(),
            network_stroke: None,
            subnetwork_stroke: None,
            connector_stroke: None,
        }
    }
}

impl StyleConfig {
    pub fn with_diagram_name(mut self, name: impl Into<String>) -> Self {
        self.diagram_name = name.into();
        self
    }

    pub fn with_network_stroke(mut self, color: impl Into<String>) -> Self {
        self.network_stroke = Some(color.into());
        self
    }

    pub fn with_subnetwork_stroke(mut self, color: impl Into<String>) -> Self {
        self.subnetwork_stroke = Some(color.into());
        self
    }

    pub fn with_connector_stroke(mut self, color: impl Into<String>) -> Self {
        self.connector_stroke = Some(color.into());
        self
    }

    pub fn diagram_name(&self) -> &str {
        &self.diagram_name
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the parsed network stroke [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn network_stroke(&self) -> Result<Option<Color>, String> {
        parse_color(self.network_stroke.as_deref(), "network_stroke")
    }

    /// Returns the parsed subnetwork stroke [`Color`], or `None` if no color is configured.
    pub fn subnetwork_stroke(&self) -> Result<Option<Color>, String> {
        parse_color(self.subnetwork_stroke.as_deref(), "subnetwork_stroke")
    }

    /// Returns the parsed connector stroke [`Color`], or `None` if no color is configured.
    pub fn connector_stroke(&self) -> Result<Option<Color>, String> {
        parse_color(self.connector_stroke.as_deref(), "connector_stroke")
    }
}

fn parse_color(value: Option<&str>, field: &str) -> Result<Option<Color>, String> {
    value
        .map(Color::new)
        .transpose()
        .map_err(|err| format!("Invalid {field} in config: {err}"))
}
