//! Position exchange with external layout collaborators.
//!
//! A layout engine reads the current positions, computes new ones and writes
//! them back. Node positions are mutated in place; edge offsets go through
//! copy-on-write like every other edge update. Offsets written here are
//! overwritten by the next structural mutation, which recomputes them.

use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entity::{EdgeId, NodeId, Position};
use crate::graph::Graph;
use crate::topology::EdgeOffset;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodePosition {
    pub id: NodeId,
    #[serde(default)]
    pub x: Option<f32>,
    #[serde(default)]
    pub y: Option<f32>,
}

impl NodePosition {
    pub fn new(id: NodeId, x: f32, y: f32) -> Self {
        Self {
            id,
            x: Some(x),
            y: Some(y),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgePosition {
    pub id: EdgeId,
    pub offset: EdgeOffset,
}

impl Graph {
    /// One record per node, in registry order.
    pub fn node_positions(&self) -> Vec<NodePosition> {
        self.nodes
            .values()
            .map(|node| {
                let node = node.borrow();
                NodePosition {
                    id: node.id(),
                    x: node.position.x,
                    y: node.position.y,
                }
            })
            .collect()
    }

    /// Overwrite node positions. Unknown ids are ignored.
    pub fn set_node_positions(&mut self, positions: &[NodePosition]) {
        let mut applied = 0;
        for p in positions {
            if let Some(node) = self.nodes.get(&p.id) {
                node.borrow_mut().position = Position { x: p.x, y: p.y };
                applied += 1;
            }
        }
        debug!(requested = positions.len(), applied, "node positions set");
    }

    /// One record per edge, in registry order.
    pub fn edge_positions(&self) -> Vec<EdgePosition> {
        self.edges
            .values()
            .map(|edge| EdgePosition {
                id: edge.id(),
                offset: edge.offset,
            })
            .collect()
    }

    /// Overwrite edge offsets until the next structural mutation. Unknown
    /// ids are ignored.
    pub fn set_edge_positions(&mut self, positions: &[EdgePosition]) {
        let mut applied = 0;
        for p in positions {
            if let Some(edge) = self.edges.get_mut(&p.id) {
                Rc::make_mut(edge).offset = p.offset;
                applied += 1;
            }
        }
        debug!(requested = positions.len(), applied, "edge positions set");
    }

    /// Translate the given nodes by `(dx, dy)`.
    ///
    /// Nodes without a resolved position stay where they are.
    pub fn move_nodes(&mut self, ids: &[NodeId], dx: f32, dy: f32) {
        for id in ids {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            let mut node = node.borrow_mut();
            if let Some((x, y)) = node.center() {
                node.position = Position::new(x + dx, y + dy);
            }
        }
    }
}
