use std::collections::HashSet;
use std::hash::Hash;

use slint::{Model, VecModel};
use tracing::trace;

use crate::entity::{EdgeId, NodeId};
use crate::graph::Graph;
use crate::path::Point;

/// A set of selected ids of one entity kind.
#[derive(Debug, Clone)]
pub struct SelectionSet<Id = NodeId> {
    selected: HashSet<Id>,
}

impl<Id> Default for SelectionSet<Id> {
    fn default() -> Self {
        Self {
            selected: HashSet::new(),
        }
    }
}

impl<Id: Copy + Eq + Hash + Ord> SelectionSet<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain click selects only `id`; shift-click toggles it.
    pub fn handle_interaction(&mut self, id: Id, shift_held: bool) {
        if shift_held {
            if !self.selected.remove(&id) {
                self.selected.insert(id);
            }
        } else {
            if self.selected.len() == 1 && self.selected.contains(&id) {
                return;
            }
            self.selected.clear();
            self.selected.insert(id);
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn replace<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = Id>,
    {
        self.selected.clear();
        self.selected.extend(ids);
    }

    pub fn contains(&self, id: Id) -> bool {
        self.selected.contains(&id)
    }

    pub fn iter(&self) -> std::collections::hash_set::Iter<'_, Id> {
        self.selected.iter()
    }

    /// Selected ids in ascending order.
    pub fn sorted(&self) -> Vec<Id> {
        let mut ids: Vec<Id> = self.selected.iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&Id) -> bool,
    {
        self.selected.retain(keep);
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

/// What a click landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Node(NodeId),
    Edge(EdgeId),
}

/// Selected nodes and edges.
///
/// Ids rather than entity references are stored, so a `join` that replaces
/// payloads leaves the selection intact. After `hide`, call
/// [`retain_live`](Selection::retain_live) to forget removed ids.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    nodes: SelectionSet<NodeId>,
    edges: SelectionSet<EdgeId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &SelectionSet<NodeId> {
        &self.nodes
    }

    pub fn edges(&self) -> &SelectionSet<EdgeId> {
        &self.edges
    }

    /// A plain click on a node drops every selected edge.
    pub fn handle_node_interaction(&mut self, id: NodeId, shift_held: bool) {
        if !shift_held {
            self.edges.clear();
        }
        self.nodes.handle_interaction(id, shift_held);
    }

    /// A plain click on an edge drops every selected node.
    pub fn handle_edge_interaction(&mut self, id: EdgeId, shift_held: bool) {
        if !shift_held {
            self.nodes.clear();
        }
        self.edges.handle_interaction(id, shift_held);
    }

    /// Resolve a click at `point` against `graph` and update the selection.
    ///
    /// Nodes are tested before edges. A click on empty space clears the
    /// selection unless shift is held.
    pub fn select_at(&mut self, graph: &Graph, point: Point, shift_held: bool) -> Option<Hit> {
        let hit = match graph.nearest_node(point) {
            Some(node) => Some(Hit::Node(node.borrow().id())),
            None => graph.nearest_edge(point).map(|edge| Hit::Edge(edge.id())),
        };

        match hit {
            Some(Hit::Node(id)) => self.handle_node_interaction(id, shift_held),
            Some(Hit::Edge(id)) => self.handle_edge_interaction(id, shift_held),
            None if !shift_held => self.clear(),
            None => {}
        }
        trace!(?hit, nodes = self.nodes.len(), edges = self.edges.len(), "select");
        hit
    }

    /// Replace the selected nodes, e.g. with the result of a box selection.
    pub fn replace_nodes<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = NodeId>,
    {
        self.nodes.replace(ids);
    }

    pub fn replace_edges<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = EdgeId>,
    {
        self.edges.replace(ids);
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains(id)
    }

    pub fn contains_edge(&self, id: EdgeId) -> bool {
        self.edges.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Forget ids that are no longer registered in `graph`.
    pub fn retain_live(&mut self, graph: &Graph) {
        self.nodes.retain(|&id| graph.contains_node(id));
        self.edges.retain(|&id| graph.contains_edge(id));
    }

    /// Sync the selected node ids to a Slint VecModel, in ascending order
    pub fn sync_nodes_to_model(&self, model: &VecModel<NodeId>) {
        sync_to_model(&self.nodes, model);
    }

    /// Sync the selected node ids from any Slint Model (e.g. after box selection)
    pub fn sync_nodes_from_model(&mut self, model: &dyn Model<Data = NodeId>) {
        sync_from_model(&mut self.nodes, model);
    }

    pub fn sync_edges_to_model(&self, model: &VecModel<EdgeId>) {
        sync_to_model(&self.edges, model);
    }

    pub fn sync_edges_from_model(&mut self, model: &dyn Model<Data = EdgeId>) {
        sync_from_model(&mut self.edges, model);
    }
}

fn sync_to_model<Id>(set: &SelectionSet<Id>, model: &VecModel<Id>)
where
    Id: Copy + Eq + Hash + Ord + 'static,
{
    model.set_vec(set.sorted());
}

fn sync_from_model<Id>(set: &mut SelectionSet<Id>, model: &dyn Model<Data = Id>)
where
    Id: Copy + Eq + Hash + Ord,
{
    set.replace((0..model.row_count()).filter_map(|i| model.row_data(i)));
}
