//! Grid layout of nested containers and leaf icons.
//!
//! Layout runs bottom-up. Icons are placed on a grid inside their
//! subnetwork, subnetworks on a grid inside their network, and each
//! container is resized to fit its grid. Top-level cells are then placed
//! left to right from the origin.
//!
//! Positions of nested cells are relative to their parent container. The
//! engine is deterministic: placement follows the order of the container
//! and shape slices and of each container's child list.

use std::collections::HashMap;

use log::{debug, trace};

use infragram_core::{
    diagram::{Container, Shape},
    geometry::{Point, Size},
    graph::NodeKind,
};

use crate::config::LayoutConfig;

/// One grid tier: column count and the gap between neighbouring cells.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Tier {
    columns: usize,
    gap: f32,
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Container(usize),
    Shape(usize),
}

/// Computes positions and container sizes.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    origin: Point,
    network_spacing: f32,
    subnetworks: Tier,
    instances: Tier,
    padding: f32,
    label_height: f32,
    network_min_size: Size,
    subnetwork_min_size: Size,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(&LayoutConfig::default())
    }
}

impl LayoutEngine {
    pub fn new(config: &LayoutConfig) -> Self {
        let (origin_x, origin_y) = config.origin();
        let (network_width, network_height) = config.network_min_size();
        let (subnetwork_width, subnetwork_height) = config.subnetwork_min_size();
        Self {
            origin: Point::new(origin_x, origin_y),
            network_spacing: config.network_spacing(),
            subnetworks: Tier {
                columns: config.subnetwork_columns(),
                gap: config.subnetwork_spacing(),
            },
            instances: Tier {
                columns: config.instance_columns(),
                gap: config.instance_spacing(),
            },
            padding: config.container_padding(),
            label_height: config.label_height(),
            network_min_size: Size::new(network_width, network_height),
            subnetwork_min_size: Size::new(subnetwork_width, subnetwork_height),
        }
    }

    /// Sets the position of the first top-level cell.
    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    /// Lays out every container and shape in place.
    ///
    /// Child ids that name no container or shape are ignored.
    pub fn layout(&self, containers: &mut [Container], shapes: &mut [Shape]) {
        let slots: HashMap<String, Slot> = containers
            .iter()
            .enumerate()
            .map(|(index, container)| (container.id().to_string(), Slot::Container(index)))
            .chain(
                shapes
                    .iter()
                    .enumerate()
                    .map(|(index, shape)| (shape.id().to_string(), Slot::Shape(index))),
            )
            .collect();

        for index in innermost_first(containers) {
            let children: Vec<Slot> = containers[index]
                .children()
                .iter()
                .filter_map(|child| slots.get(child).copied())
                .collect();
            let sizes: Vec<Size> = children
                .iter()
                .map(|slot| match *slot {
                    Slot::Container(child) => containers[child].size(),
                    Slot::Shape(child) => shapes[child].size(),
                })
                .collect();

            let (tier, floor) = match containers[index].kind() {
                NodeKind::Subnetwork => (self.instances, self.subnetwork_min_size),
                _ => (self.subnetworks, self.network_min_size),
            };
            let (positions, size) = self.arrange(&sizes, tier);

            for (slot, position) in children.iter().zip(positions) {
                match *slot {
                    Slot::Container(child) => containers[child].set_position(position),
                    Slot::Shape(child) => shapes[child].set_position(position),
                }
            }
            let size = size.unwrap_or(floor);
            trace!(
                container = containers[index].id(),
                children = children.len(),
                width = size.width(),
                height = size.height();
                "Container sized"
            );
            containers[index].set_size(size);
        }

        let mut x = self.origin.x();
        let top_level_containers = containers
            .iter_mut()
            .filter(|container| container.parent().is_none());
        for container in top_level_containers {
            container.set_position(self.origin.with_x(x));
            x += container.size().width() + self.network_spacing;
        }
        for shape in shapes.iter_mut().filter(|shape| shape.parent().is_none()) {
            shape.set_position(self.origin.with_x(x));
            x += shape.size().width() + self.network_spacing;
        }

        debug!(containers = containers.len(), shapes = shapes.len(); "Layout complete");
    }

    /// Places `sizes` on the tier's grid and returns the parent-local
    /// positions together with the fitted parent size, or `None` for the
    /// size when there is nothing to place.
    ///
    /// Columns advance by the cell's own width plus the gap; rows advance by
    /// the tallest cell of the row plus the gap.
    fn arrange(&self, sizes: &[Size], tier: Tier) -> (Vec<Point>, Option<Size>) {
        if sizes.is_empty() {
            return (Vec::new(), None);
        }

        let start = Point::new(self.padding, self.label_height + self.padding);
        let mut positions = Vec::with_capacity(sizes.len());
        let mut cursor = start;
        let mut row_height: f32 = 0.0;
        for (index, size) in sizes.iter().enumerate() {
            positions.push(cursor);
            row_height = row_height.max(size.height());
            if (index + 1) % tier.columns == 0 {
                cursor = Point::new(start.x(), cursor.y() + row_height + tier.gap);
                row_height = 0.0;
            } else {
                cursor = cursor.with_x(cursor.x() + size.width() + tier.gap);
            }
        }

        let largest = sizes.iter().fold(Size::default(), |acc, size| acc.max(*size));
        let columns = sizes.len().min(tier.columns);
        let rows = sizes.len().div_ceil(tier.columns);
        let width = columns as f32 * largest.width()
            + (columns - 1) as f32 * tier.gap
            + 2.0 * self.padding;
        let height = rows as f32 * largest.height()
            + (rows - 1) as f32 * tier.gap
            + self.label_height
            + 2.0 * self.padding;

        (positions, Some(Size::new(width, height)))
    }
}

/// Returns container indices ordered deepest first, keeping slice order
/// among containers of the same depth.
fn innermost_first(containers: &[Container]) -> Vec<usize> {
    let parents: HashMap<&str, Option<&str>> = containers
        .iter()
        .map(|container| (container.id(), container.parent()))
        .collect();
    let depth = |container: &Container| {
        let mut depth = 0;
        let mut current = container.parent();
        while let Some(parent) = current {
            depth += 1;
            if depth > containers.len() {
                break;
            }
            current = parents.get(parent).copied().flatten();
        }
        depth
    };

    let mut order: Vec<usize> = (0..containers.len()).collect();
    order.sort_by_key(|&index| std::cmp::Reverse(depth(&containers[index])));
    order
}
