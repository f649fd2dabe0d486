//! Parallel-edge offsets.
//!
//! Edges are grouped by their unordered endpoint pair, so `A -> B` and
//! `B -> A` are siblings. A lone edge stays straight; `k` siblings are spread
//! symmetrically around zero in input order, `spacing` apart. Self-loops are
//! grouped per node and numbered `0, 1, 2, ...` so each one can be drawn one
//! ring further out.
//!
//! Lateral offsets are expressed in the canonical frame of the pair (from the
//! lower node id to the higher one), which is what makes two opposite-sign
//! offsets land on opposite sides regardless of each edge's own direction.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::entity::NodeId;

/// Displacement assigned to an edge so its parallel siblings stay apart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeOffset {
    /// Sideways bow of the edge midpoint, in graph units.
    Lateral(f32),
    /// Ring index of a self-loop on its node.
    Loop(u32),
}

impl Default for EdgeOffset {
    fn default() -> Self {
        EdgeOffset::Lateral(0.0)
    }
}

impl EdgeOffset {
    pub fn is_straight(&self) -> bool {
        matches!(self, EdgeOffset::Lateral(o) if *o == 0.0)
    }
}

/// Unordered endpoint pair used as the grouping key.
fn pair_key(start: NodeId, end: NodeId) -> (NodeId, NodeId) {
    if start <= end {
        (start, end)
    } else {
        (end, start)
    }
}

/// Compute the offset of every edge, given its `(start, end)` endpoints.
///
/// The result is aligned with the input order and depends only on that
/// order, so recomputing over an unchanged edge list is stable.
pub fn compute_offsets<I>(endpoints: I, spacing: f32) -> Vec<EdgeOffset>
where
    I: IntoIterator<Item = (NodeId, NodeId)>,
{
    let mut groups: HashMap<(NodeId, NodeId), Vec<usize>> = HashMap::new();
    let mut count = 0;
    for (index, (start, end)) in endpoints.into_iter().enumerate() {
        groups.entry(pair_key(start, end)).or_default().push(index);
        count = index + 1;
    }

    let mut offsets = vec![EdgeOffset::default(); count];
    for ((a, b), members) in groups {
        if a == b {
            for (ring, &index) in members.iter().enumerate() {
                offsets[index] = EdgeOffset::Loop(ring as u32);
            }
        } else if members.len() > 1 {
            let center = (members.len() - 1) as f32 / 2.0;
            for (slot, &index) in members.iter().enumerate() {
                offsets[index] = EdgeOffset::Lateral((slot as f32 - center) * spacing);
            }
        }
    }
    offsets
}
