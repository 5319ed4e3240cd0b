//! Diagram primitives.
//!
//! [`Container`]s, [`Shape`]s and [`Connector`]s are derived from a resource
//! graph on every generation run and discarded after export. Positions are
//! relative to the parent container, or absolute for top-level cells.

use crate::{
    geometry::{Bounds, Point, Size},
    graph::NodeKind,
};

/// A leaf icon representing one resource.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    id: String,
    node_id: String,
    kind: NodeKind,
    label: String,
    style: String,
    parent: Option<String>,
    position: Point,
    size: Size,
}

impl Shape {
    /// Creates a shape at the origin. The layout engine assigns its position.
    pub fn new(
        id: impl Into<String>,
        node_id: impl Into<String>,
        kind: NodeKind,
        label: impl Into<String>,
        style: impl Into<String>,
        size: Size,
    ) -> Self {
        Self {
            id: id.into(),
            node_id: node_id.into(),
            kind,
            label: label.into(),
            style: style.into(),
            parent: None,
            position: Point::default(),
            size,
        }
    }

    /// Sets the id of the container this shape is nested in.
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn style(&self) -> &str {
        &self.style
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn bounds(&self) -> Bounds {
        self.position.to_bounds(self.size)
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }
}

/// A box representing a network or subnetwork.
///
/// The size is recomputed by the layout engine from its children.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    id: String,
    node_id: String,
    kind: NodeKind,
    label: String,
    style: String,
    parent: Option<String>,
    children: Vec<String>,
    position: Point,
    size: Size,
}

impl Container {
    pub fn new(
        id: impl Into<String>,
        node_id: impl Into<String>,
        kind: NodeKind,
        label: impl Into<String>,
        style: impl Into<String>,
        size: Size,
    ) -> Self {
        Self {
            id: id.into(),
            node_id: node_id.into(),
            kind,
            label: label.into(),
            style: style.into(),
            parent: None,
            children: Vec::new(),
            position: Point::default(),
            size,
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Sets the ordered list of child cell ids.
    pub fn with_children(mut self, children: Vec<String>) -> Self {
        self.children = children;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn style(&self) -> &str {
        &self.style
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn children(&self) -> &[String] {
        &self.children
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn bounds(&self) -> Bounds {
        self.position.to_bounds(self.size)
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }
}

/// A directed arrow between two cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connector {
    id: String,
    source: String,
    target: String,
    label: String,
    style: String,
}

impl Connector {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        label: impl Into<String>,
        style: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            label: label.into(),
            style: style.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn style(&self) -> &str {
        &self.style
    }
}
