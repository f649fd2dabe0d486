//! Layered (Sugiyama) layout.
//!
//! Positions nodes in layers along the edge direction using the
//! `rust-sugiyama` crate. The result is a list of [`NodePosition`] records
//! holding node centers, ready for [`Graph::set_node_positions`].
//!
//! `rust-sugiyama` works in `f64` with top-left vertex coordinates; both are
//! converted here so callers stay in the crate's `f32` center coordinates.
//!
//! Requires the `layout` feature to be enabled.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::debug;

use crate::entity::NodeId;
use crate::graph::Graph;
use crate::positions::NodePosition;

/// Layout direction for the Sugiyama algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum Direction {
    /// Layers flow top to bottom (default).
    #[default]
    TopToBottom,
    /// Layers flow left to right.
    LeftToRight,
}

/// Configuration for the Sugiyama layout algorithm.
#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
pub struct SugiyamaConfig {
    /// Minimum spacing between vertices (0.0 keeps the `rust-sugiyama`
    /// default of 10.0).
    pub vertex_spacing: f64,
    /// Minimum edge length between layers (0 keeps the `rust-sugiyama`
    /// default of 1).
    pub minimum_length: u32,
    pub dummy_vertices: bool,
    pub direction: Direction,
}

impl SugiyamaConfig {
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_vertex_spacing(mut self, spacing: f64) -> Self {
        self.vertex_spacing = spacing;
        self
    }

    fn to_sugiyama(self) -> rust_sugiyama::configure::Config {
        let mut config = rust_sugiyama::configure::Config {
            dummy_vertices: self.dummy_vertices,
            ..Default::default()
        };
        if self.vertex_spacing > 0.0 {
            config.vertex_spacing = self.vertex_spacing;
        }
        if self.minimum_length > 0 {
            config.minimum_length = self.minimum_length;
        }
        config
    }
}

/// Compute layered node centers.
///
/// `edges` are `(start, end)` node id pairs and `sizes` are `(id, (width,
/// height))` pairs. Every sized node gets exactly one position; edges that
/// mention an unsized node are ignored, as are repeated sizes for an id
/// (the first one wins).
pub fn sugiyama_layout(
    edges: &[(NodeId, NodeId)],
    sizes: &[(NodeId, (f64, f64))],
    config: &SugiyamaConfig,
) -> Vec<NodePosition> {
    if sizes.is_empty() {
        return Vec::new();
    }
    let horizontal = config.direction == Direction::LeftToRight;

    // Dense index <-> node id; the index is what rust-sugiyama sees
    let mut vertices: IndexMap<NodeId, (f64, f64)> = IndexMap::with_capacity(sizes.len());
    for &(id, size) in sizes {
        vertices.entry(id).or_insert(size);
    }

    // Layers are spaced along the vertex height, so swap axes for LTR
    let sg_vertices: Vec<(u32, (f64, f64))> = vertices
        .values()
        .enumerate()
        .map(|(idx, &(w, h))| (idx as u32, if horizontal { (h, w) } else { (w, h) }))
        .collect();

    let sg_edges: Vec<(u32, u32)> = edges
        .iter()
        .filter_map(|&(start, end)| {
            let from = vertices.get_index_of(&start)?;
            let to = vertices.get_index_of(&end)?;
            Some((from as u32, to as u32))
        })
        .collect();

    let subgraphs =
        rust_sugiyama::from_vertices_and_edges(&sg_vertices, &sg_edges, &config.to_sugiyama());

    let mut positions = Vec::with_capacity(vertices.len());
    for (layout, _width, _height) in &subgraphs {
        for &(idx, (x, y)) in layout {
            let Some((&id, &(w, h))) = vertices.get_index(idx) else {
                continue;
            };
            let (left, top) = if horizontal { (y, x) } else { (x, y) };
            positions.push(NodePosition::new(
                id,
                (left + w / 2.0) as f32,
                (top + h / 2.0) as f32,
            ));
        }
    }

    debug!(
        nodes = vertices.len(),
        edges = sg_edges.len(),
        subgraphs = subgraphs.len(),
        "layered layout"
    );
    positions
}

impl Graph {
    /// Layered positions for every node, sized by its bordered circle.
    ///
    /// Self-loops are ignored and parallel edges count once. Apply the result
    /// with [`set_node_positions`](Graph::set_node_positions).
    pub fn layered_positions(&self, config: &SugiyamaConfig) -> Vec<NodePosition> {
        let mut seen = HashSet::new();
        let edges: Vec<(NodeId, NodeId)> = self
            .edges
            .values()
            .filter(|e| !e.is_self_loop())
            .map(|e| (e.start(), e.end()))
            .filter(|pair| seen.insert(*pair))
            .collect();

        let sizes: Vec<(NodeId, (f64, f64))> = self
            .nodes
            .values()
            .map(|node| {
                let node = node.borrow();
                let diameter = f64::from(node.bordered_radius() * 2.0);
                (node.id(), (diameter, diameter))
            })
            .collect();

        sugiyama_layout(&edges, &sizes, config)
    }
}
