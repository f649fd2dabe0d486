//! The graph registry.
//!
//! [`Graph`] owns every node and edge, keyed by id in insertion order. It is
//! the only place that creates, connects, disconnects and removes entities,
//! which is how it keeps two invariants:
//!
//! - every registered edge has both endpoints registered and is connected;
//! - removing a node removes all of its edges in the same call.
//!
//! Dangling references in the input are never errors. An edge whose
//! endpoints are not both present is dropped (and logged at `debug` level);
//! unknown ids passed to `hide` are ignored.
//!
//! After every structural mutation the parallel-edge offsets are recomputed
//! and the active style is re-applied over the complete node and edge set,
//! since both depend on global state rather than on the delta.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::entity::{Edge, EdgeData, EdgeId, EdgeRef, GraphData, Node, NodeData, NodeId, NodeRef};
use crate::options::GraphOptions;
use crate::style::{ImageLoader, NoopImageLoader, Style, StylePipeline};
use crate::topology::compute_offsets;

pub struct Graph {
    pub(crate) nodes: IndexMap<NodeId, NodeRef>,
    pub(crate) edges: IndexMap<EdgeId, EdgeRef>,
    pub(crate) options: GraphOptions,
    style: StylePipeline,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new(GraphOptions::default())
    }
}

impl std::fmt::Debug for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("nodes", &self.nodes.keys().collect::<Vec<_>>())
            .field("edges", &self.edges.keys().collect::<Vec<_>>())
            .field("styled", &self.style.has_style())
            .finish()
    }
}

impl Graph {
    pub fn new(options: GraphOptions) -> Self {
        Self::with_image_loader(options, Rc::new(NoopImageLoader))
    }

    /// Create a graph that hands style image URLs to `loader`.
    pub fn with_image_loader(options: GraphOptions, loader: Rc<dyn ImageLoader>) -> Self {
        let style = StylePipeline::new(
            loader,
            options.node_defaults.clone(),
            options.edge_defaults.clone(),
        );
        Self {
            nodes: IndexMap::new(),
            edges: IndexMap::new(),
            options,
            style,
        }
    }

    pub fn options(&self) -> &GraphOptions {
        &self.options
    }

    // ========================================================================
    // Structural mutations
    // ========================================================================

    /// Replace the whole graph with `data`. Any active style is dropped.
    pub fn setup(&mut self, data: &GraphData) {
        for edge in self.edges.values_mut() {
            Rc::make_mut(edge).disconnect();
        }
        self.edges.clear();
        self.nodes.clear();
        self.style.clear();

        let (nodes, edges) = last_wins(data);
        for node in nodes.values() {
            self.insert_node(node);
        }
        for edge in edges.values() {
            self.insert_edge(edge);
        }

        debug!(
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            "graph setup"
        );
        self.refresh();
    }

    /// Upsert `data` into the graph.
    ///
    /// Existing nodes keep their identity and only get a new payload. Existing
    /// edges with unchanged endpoints likewise; an edge whose endpoints changed
    /// is removed and re-created under the same id when both new endpoints
    /// exist, and stays removed otherwise.
    pub fn join(&mut self, data: &GraphData) {
        let (nodes, edges) = last_wins(data);
        for node in nodes.values() {
            match self.nodes.get(&node.id) {
                Some(existing) => existing.borrow_mut().payload = node.payload.clone(),
                None => self.insert_node(node),
            }
        }

        for edge in edges.values() {
            let current = self.edges.get(&edge.id).map(|e| (e.start(), e.end()));
            match current {
                Some(endpoints) if endpoints == (edge.start, edge.end) => {
                    if let Some(existing) = self.edges.get_mut(&edge.id) {
                        if existing.payload != edge.payload {
                            Rc::make_mut(existing).payload = edge.payload.clone();
                        }
                    }
                }
                Some(_) => {
                    self.remove_edge(edge.id);
                    self.insert_edge(edge);
                }
                None => {
                    self.insert_edge(edge);
                }
            }
        }

        debug!(
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            "graph join"
        );
        self.refresh();
    }

    /// Remove nodes (with their incident edges) and edges by id.
    pub fn hide(&mut self, node_ids: &[NodeId], edge_ids: &[EdgeId]) {
        for id in node_ids {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            let incident = node.borrow().incident_edges().to_vec();
            for edge_id in incident {
                self.remove_edge(edge_id);
            }
            self.nodes.shift_remove(id);
        }
        for &id in edge_ids {
            self.remove_edge(id);
        }

        debug!(
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            "graph hide"
        );
        self.refresh();
    }

    fn insert_node(&mut self, data: &NodeData) {
        let node = Node::from_data(data, &self.options.node_defaults);
        self.nodes.insert(data.id, Rc::new(RefCell::new(node)));
    }

    /// Insert and connect an edge. Returns `false` when an endpoint is missing.
    fn insert_edge(&mut self, data: &EdgeData) -> bool {
        let from = self.nodes.get(&data.start).cloned();
        let to = self.nodes.get(&data.end).cloned();
        let (Some(from), Some(to)) = (from, to) else {
            debug!(
                edge = data.id,
                start = data.start,
                end = data.end,
                "dropping edge with missing endpoint"
            );
            self.remove_edge(data.id);
            return false;
        };

        self.remove_edge(data.id);
        let mut edge = Edge::from_data(data, &self.options.edge_defaults);
        edge.connect(&from, &to);
        self.edges.insert(data.id, Rc::new(edge));
        true
    }

    /// Disconnect and unregister an edge. Unknown ids are ignored.
    fn remove_edge(&mut self, id: EdgeId) -> bool {
        match self.edges.shift_remove(&id) {
            Some(mut edge) => {
                Rc::make_mut(&mut edge).disconnect();
                true
            }
            None => false,
        }
    }

    /// Recompute derived state over the whole graph.
    fn refresh(&mut self) {
        self.apply_offsets();
        self.style.reapply(&self.nodes, &mut self.edges);
    }

    fn apply_offsets(&mut self) {
        let offsets = compute_offsets(
            self.edges.values().map(|e| (e.start(), e.end())),
            self.options.edge_spacing,
        );
        let mut replaced = 0;
        for (edge, offset) in self.edges.values_mut().zip(offsets) {
            if edge.offset != offset {
                let mut next = Edge::clone(edge);
                next.offset = offset;
                *edge = Rc::new(next);
                replaced += 1;
            }
        }
        trace!(edges = self.edges.len(), replaced, "offsets applied");
    }

    // ========================================================================
    // Styling
    // ========================================================================

    /// Activate `style` and apply it to every node and edge.
    pub fn set_style(&mut self, style: Style) {
        self.style.set_style(style, &self.nodes, &mut self.edges);
    }

    /// Drop the active style and reset all properties to the defaults.
    pub fn set_default_style(&mut self) {
        self.style.set_default_style(&self.nodes, &mut self.edges);
    }

    pub fn has_style(&self) -> bool {
        self.style.has_style()
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn node(&self, id: NodeId) -> Option<NodeRef> {
        self.nodes.get(&id).cloned()
    }

    pub fn edge(&self, id: EdgeId) -> Option<EdgeRef> {
        self.edges.get(&id).cloned()
    }

    pub fn nodes(&self) -> Vec<NodeRef> {
        self.nodes.values().cloned().collect()
    }

    pub fn nodes_where<P>(&self, mut predicate: P) -> Vec<NodeRef>
    where
        P: FnMut(&Node) -> bool,
    {
        self.nodes
            .values()
            .filter(|n| {
                let node: &Node = &n.borrow();
                predicate(node)
            })
            .cloned()
            .collect()
    }

    pub fn edges(&self) -> Vec<EdgeRef> {
        self.edges.values().cloned().collect()
    }

    pub fn edges_where<P>(&self, mut predicate: P) -> Vec<EdgeRef>
    where
        P: FnMut(&Edge) -> bool,
    {
        self.edges
            .values()
            .filter(|e| {
                let edge: &Edge = e;
                predicate(edge)
            })
            .cloned()
            .collect()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges.keys().copied()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn contains_edge(&self, id: EdgeId) -> bool {
        self.edges.contains_key(&id)
    }

    /// Coarse equality: same node ids and same edge ids. Payloads, positions
    /// and styles are not compared.
    pub fn is_equal(&self, other: &Graph) -> bool {
        if self.node_count() != other.node_count() || self.edge_count() != other.edge_count() {
            return false;
        }
        let nodes: HashSet<NodeId> = other.node_ids().collect();
        let edges: HashSet<EdgeId> = other.edge_ids().collect();
        self.node_ids().all(|id| nodes.contains(&id))
            && self.edge_ids().all(|id| edges.contains(&id))
    }
}

/// Collapse repeated ids in a batch. The last record wins; the id keeps the
/// position of its first occurrence.
fn last_wins(data: &GraphData) -> (IndexMap<NodeId, &NodeData>, IndexMap<EdgeId, &EdgeData>) {
    let nodes = data.nodes.iter().map(|n| (n.id, n)).collect();
    let edges = data.edges.iter().map(|e| (e.id, e)).collect();
    (nodes, edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EdgeState;
    use crate::topology::EdgeOffset;
    use serde_json::json;

    fn data(nodes: &[NodeId], edges: &[(EdgeId, NodeId, NodeId)]) -> GraphData {
        GraphData::new(
            nodes.iter().map(|&id| NodeData::new(id)).collect(),
            edges
                .iter()
                .map(|&(id, start, end)| EdgeData::new(id, start, end))
                .collect(),
        )
    }

    fn graph(nodes: &[NodeId], edges: &[(EdgeId, NodeId, NodeId)]) -> Graph {
        let mut g = Graph::default();
        g.setup(&data(nodes, edges));
        g
    }

    fn incident(g: &Graph, id: NodeId) -> Vec<EdgeId> {
        let mut ids = g.node(id).unwrap().borrow().incident_edges().to_vec();
        ids.sort();
        ids
    }

    // ========================================================================
    // setup()
    // ========================================================================

    #[test]
    fn test_setup_inserts_nodes_and_edges() {
        let g = graph(&[1, 2, 3], &[(10, 1, 2), (11, 2, 3)]);
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.edge(10).unwrap().state(), EdgeState::Connected);
        assert_eq!(incident(&g, 2), vec![10, 11]);
    }

    #[test]
    fn test_setup_drops_edges_with_missing_endpoints() {
        let g = graph(&[1, 2], &[(10, 1, 2), (11, 2, 9), (12, 8, 1)]);
        assert_eq!(g.edge_ids().collect::<Vec<_>>(), vec![10]);
        assert_eq!(incident(&g, 1), vec![10]);
    }

    #[test]
    fn test_setup_replaces_previous_state() {
        let mut g = graph(&[1, 2], &[(10, 1, 2)]);
        g.setup(&data(&[5], &[]));
        assert_eq!(g.node_ids().collect::<Vec<_>>(), vec![5]);
        assert_eq!(g.edge_count(), 0);
        assert!(g.node(1).is_none());
    }

    #[test]
    fn test_setup_discards_style() {
        let mut g = graph(&[1], &[]);
        g.set_style(Style::new().with_node_style(|_| Default::default()));
        assert!(g.has_style());
        g.setup(&data(&[1], &[]));
        assert!(!g.has_style());
    }

    #[test]
    fn test_setup_preserves_input_order() {
        let g = graph(&[3, 1, 2], &[(20, 2, 3), (10, 1, 2)]);
        assert_eq!(g.node_ids().collect::<Vec<_>>(), vec![3, 1, 2]);
        assert_eq!(g.edge_ids().collect::<Vec<_>>(), vec![20, 10]);
    }

    #[test]
    fn test_setup_duplicate_edge_id_last_wins() {
        let g = graph(&[1, 2, 3], &[(10, 1, 2), (10, 2, 3)]);
        assert_eq!(g.edge_count(), 1);
        let e = g.edge(10).unwrap();
        assert_eq!((e.start(), e.end()), (2, 3));
        assert!(incident(&g, 1).is_empty());
    }

    #[test]
    fn test_setup_duplicate_node_id_last_wins() {
        let mut g = Graph::default();
        let mut d = data(&[1, 2], &[]);
        d.nodes.push(NodeData::new(1).with("v", 2));
        d.edges.push(EdgeData::new(10, 1, 2));
        g.setup(&d);
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.node(1).unwrap().borrow().payload["v"], json!(2));
        assert_eq!(g.edge_count(), 1);
    }

    // ========================================================================
    // join()
    // ========================================================================

    #[test]
    fn test_join_replaces_node_payload_in_place() {
        let mut g = Graph::default();
        g.setup(&GraphData::new(vec![NodeData::new(1).with("label", "old")], vec![]));
        let held = g.node(1).unwrap();

        g.join(&GraphData::new(vec![NodeData::new(1).with("label", "new")], vec![]));

        assert!(Rc::ptr_eq(&held, &g.node(1).unwrap()));
        assert_eq!(held.borrow().payload["label"], json!("new"));
    }

    #[test]
    fn test_join_does_not_move_existing_node() {
        let mut g = Graph::default();
        g.setup(&GraphData::new(vec![NodeData::new(1).at(5.0, 5.0)], vec![]));
        g.join(&GraphData::new(vec![NodeData::new(1).at(50.0, 50.0)], vec![]));
        assert_eq!(g.node(1).unwrap().borrow().center(), Some((5.0, 5.0)));
    }

    #[test]
    fn test_join_inserts_new_nodes_and_edges() {
        let mut g = graph(&[1, 2], &[(10, 1, 2)]);
        g.join(&data(&[3], &[(11, 2, 3)]));
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 2);
        assert_eq!(incident(&g, 3), vec![11]);
    }

    #[test]
    fn test_join_edge_same_endpoints_updates_payload() {
        let mut g = graph(&[1, 2], &[(10, 1, 2)]);
        g.join(&GraphData::new(vec![], vec![EdgeData::new(10, 1, 2).with("w", 3)]));
        assert_eq!(g.edge(10).unwrap().payload["w"], json!(3));
        assert_eq!(incident(&g, 1), vec![10]);
    }

    #[test]
    fn test_join_edge_reconnects_to_new_endpoints() {
        let mut g = graph(&[1, 2, 3], &[(10, 1, 2)]);
        g.join(&data(&[], &[(10, 1, 3)]));

        let e = g.edge(10).unwrap();
        assert_eq!((e.start(), e.end()), (1, 3));
        assert_eq!(e.state(), EdgeState::Connected);
        assert!(incident(&g, 2).is_empty());
        assert_eq!(incident(&g, 3), vec![10]);
    }

    #[test]
    fn test_join_edge_to_missing_node_is_dropped() {
        let mut g = graph(&[1, 2], &[(10, 1, 2)]);
        g.join(&data(&[], &[(10, 1, 3)]));
        assert!(g.edge(10).is_none());
        assert!(incident(&g, 1).is_empty());
        assert!(incident(&g, 2).is_empty());
    }

    #[test]
    fn test_join_new_edge_may_use_node_from_same_batch() {
        let mut g = graph(&[1], &[]);
        g.join(&data(&[2], &[(10, 1, 2)]));
        assert!(g.contains_edge(10));
    }

    #[test]
    fn test_join_identical_snapshot_is_idempotent() {
        let snapshot = GraphData::new(
            vec![NodeData::new(1).with("a", 1), NodeData::new(2)],
            vec![EdgeData::new(10, 1, 2).with("b", 2)],
        );
        let mut g = Graph::default();
        g.setup(&snapshot);
        let before = g.edge(10).unwrap();

        g.join(&snapshot);

        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.node(1).unwrap().borrow().payload["a"], json!(1));
        assert!(Rc::ptr_eq(&before, &g.edge(10).unwrap()));
    }

    // ========================================================================
    // hide()
    // ========================================================================

    #[test]
    fn test_hide_node_cascades_to_incident_edges() {
        let mut g = graph(&[1, 2, 3], &[(10, 1, 2), (11, 2, 3), (12, 3, 1), (13, 2, 2)]);
        g.hide(&[2], &[]);
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_ids().collect::<Vec<_>>(), vec![12]);
        assert_eq!(incident(&g, 1), vec![12]);
    }

    #[test]
    fn test_hide_edge() {
        let mut g = graph(&[1, 2], &[(10, 1, 2), (11, 1, 2)]);
        g.hide(&[], &[10]);
        assert_eq!(g.edge_ids().collect::<Vec<_>>(), vec![11]);
        assert_eq!(incident(&g, 2), vec![11]);
    }

    #[test]
    fn test_hide_unknown_ids_is_noop() {
        let mut g = graph(&[1, 2], &[(10, 1, 2)]);
        g.hide(&[99], &[98]);
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn test_hidden_edge_held_elsewhere_keeps_old_value() {
        let mut g = graph(&[1, 2], &[(10, 1, 2)]);
        let held = g.edge(10).unwrap();
        g.hide(&[], &[10]);
        assert_eq!(held.id(), 10);
        assert!(incident(&g, 1).is_empty());
    }

    #[test]
    fn test_hide_node_and_its_edge_together() {
        let mut g = graph(&[1, 2], &[(10, 1, 2)]);
        g.hide(&[1], &[10]);
        assert_eq!(g.node_count(), 1);
        assert_eq!(g.edge_count(), 0);
    }

    // ========================================================================
    // Offsets after mutations
    // ========================================================================

    #[test]
    fn test_offsets_follow_structure() {
        let mut g = graph(&[1, 2], &[(10, 1, 2)]);
        assert_eq!(g.edge(10).unwrap().offset, EdgeOffset::Lateral(0.0));

        g.join(&data(&[], &[(11, 2, 1)]));
        assert_eq!(g.edge(10).unwrap().offset, EdgeOffset::Lateral(-10.0));
        assert_eq!(g.edge(11).unwrap().offset, EdgeOffset::Lateral(10.0));

        g.hide(&[], &[11]);
        assert_eq!(g.edge(10).unwrap().offset, EdgeOffset::Lateral(0.0));
    }

    #[test]
    fn test_offset_update_copies_edge() {
        let mut g = graph(&[1, 2], &[(10, 1, 2)]);
        let held = g.edge(10).unwrap();
        g.join(&data(&[], &[(11, 1, 2)]));
        assert_eq!(held.offset, EdgeOffset::Lateral(0.0));
        assert_ne!(g.edge(10).unwrap().offset, held.offset);
    }

    #[test]
    fn test_unchanged_offsets_keep_edge_identity() {
        let mut g = graph(&[1, 2, 3], &[(10, 1, 2)]);
        let held = g.edge(10).unwrap();
        g.join(&data(&[4], &[]));
        assert!(Rc::ptr_eq(&held, &g.edge(10).unwrap()));
    }

    // ========================================================================
    // Styling after mutations
    // ========================================================================

    #[test]
    fn test_style_reapplied_to_joined_nodes() {
        let mut g = graph(&[1], &[]);
        g.set_style(Style::new().with_node_style(|n| crate::style::NodeProperties {
            radius: n.id() as f32,
            ..Default::default()
        }));
        g.join(&data(&[7], &[]));
        assert_eq!(g.node(7).unwrap().borrow().properties.radius, 7.0);
    }

    #[test]
    fn test_set_default_style_resets_properties() {
        let mut g = graph(&[1], &[]);
        g.set_style(Style::new().with_node_style(|_| crate::style::NodeProperties {
            radius: 99.0,
            ..Default::default()
        }));
        g.set_default_style();
        assert!(!g.has_style());
        assert_eq!(g.node(1).unwrap().borrow().properties.radius, 10.0);
    }

    // ========================================================================
    // Accessors and equality
    // ========================================================================

    #[test]
    fn test_lookup_missing_returns_none() {
        let g = graph(&[1], &[]);
        assert!(g.node(2).is_none());
        assert!(g.edge(1).is_none());
    }

    #[test]
    fn test_filtered_accessors() {
        let mut g = Graph::default();
        g.setup(&GraphData::new(
            vec![
                NodeData::new(1).with("group", "x"),
                NodeData::new(2).with("group", "y"),
                NodeData::new(3).with("group", "x"),
            ],
            vec![EdgeData::new(10, 1, 2), EdgeData::new(11, 3, 3)],
        ));

        let xs: Vec<NodeId> = g
            .nodes_where(|n| n.payload["group"] == "x")
            .iter()
            .map(|n| n.borrow().id())
            .collect();
        assert_eq!(xs, vec![1, 3]);

        let loops: Vec<EdgeId> = g.edges_where(Edge::is_self_loop).iter().map(|e| e.id()).collect();
        assert_eq!(loops, vec![11]);
        assert_eq!(g.nodes().len(), 3);
        assert_eq!(g.edges().len(), 2);
    }

    #[test]
    fn test_is_equal_compares_ids_only() {
        let a = graph(&[1, 2], &[(10, 1, 2)]);
        let mut b = Graph::default();
        b.setup(&GraphData::new(
            vec![NodeData::new(2).with("x", 1), NodeData::new(1)],
            vec![EdgeData::new(10, 2, 1)],
        ));
        assert!(a.is_equal(&b));
        assert!(b.is_equal(&a));
    }

    #[test]
    fn test_is_equal_detects_differences() {
        let a = graph(&[1, 2], &[(10, 1, 2)]);
        assert!(!a.is_equal(&graph(&[1, 2], &[])));
        assert!(!a.is_equal(&graph(&[1, 3], &[(10, 1, 3)])));
        assert!(!a.is_equal(&graph(&[1, 2], &[(11, 1, 2)])));
    }
}
