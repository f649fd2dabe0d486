//! Common test utilities for integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use slint_network_graph::{
    EdgeData, EdgeId, EdgeState, Graph, GraphData, ImageLoader, NodeData, NodeId,
};

/// Records image load requests and can complete them on demand.
#[derive(Default)]
pub struct RecordingImageLoader {
    /// Each batch of URLs passed to `load`
    pub batches: RefCell<Vec<Vec<String>>>,
    pending: RefCell<Vec<Box<dyn FnOnce()>>>,
}

impl RecordingImageLoader {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Every URL requested so far, in request order.
    pub fn urls(&self) -> Vec<String> {
        self.batches.borrow().iter().flatten().cloned().collect()
    }

    /// Run the completion callbacks of all outstanding batches.
    pub fn complete_all(&self) -> usize {
        let pending: Vec<_> = self.pending.borrow_mut().drain(..).collect();
        let count = pending.len();
        for on_loaded in pending {
            on_loaded();
        }
        count
    }
}

impl ImageLoader for RecordingImageLoader {
    fn load(&self, urls: Vec<String>, on_loaded: Box<dyn FnOnce()>) {
        self.batches.borrow_mut().push(urls);
        self.pending.borrow_mut().push(on_loaded);
    }
}

/// Graph data from bare ids and `(id, start, end)` triples.
pub fn data(nodes: &[NodeId], edges: &[(EdgeId, NodeId, NodeId)]) -> GraphData {
    GraphData::new(
        nodes.iter().map(|&id| NodeData::new(id)).collect(),
        edges
            .iter()
            .map(|&(id, start, end)| EdgeData::new(id, start, end))
            .collect(),
    )
}

/// Nodes laid out on a row, 100 units apart.
pub fn positioned(nodes: &[NodeId], edges: &[(EdgeId, NodeId, NodeId)]) -> GraphData {
    let mut data = data(nodes, edges);
    for (i, node) in data.nodes.iter_mut().enumerate() {
        node.x = Some(i as f32 * 100.0);
        node.y = Some(0.0);
    }
    data
}

pub fn graph(nodes: &[NodeId], edges: &[(EdgeId, NodeId, NodeId)]) -> Graph {
    let mut graph = Graph::default();
    graph.setup(&data(nodes, edges));
    graph
}

/// Sorted ids of the edges registered on a node.
pub fn incident(graph: &Graph, id: NodeId) -> Vec<EdgeId> {
    let node = graph.node(id).expect("node is registered");
    let mut ids = node.borrow().incident_edges().to_vec();
    ids.sort_unstable();
    ids
}

/// Check that every edge is connected to the registered endpoint nodes, that
/// those nodes list it,
/// and every incident id on a node refers to a registered edge.
pub fn assert_consistent(graph: &Graph) {
    for edge in graph.edges() {
        assert!(
            graph.contains_node(edge.start()) && graph.contains_node(edge.end()),
            "edge {} references a missing node",
            edge.id()
        );
        assert_eq!(edge.state(), EdgeState::Connected, "edge {} is disconnected", edge.id());
        let from = edge.from_node().expect("start node is alive");
        let to = edge.to_node().expect("end node is alive");
        assert!(
            Rc::ptr_eq(&from, &graph.node(edge.start()).expect("start is registered")),
            "edge {} points at a stale start node",
            edge.id()
        );
        assert!(
            Rc::ptr_eq(&to, &graph.node(edge.end()).expect("end is registered")),
            "edge {} points at a stale end node",
            edge.id()
        );
        assert!(incident(graph, edge.start()).contains(&edge.id()));
        assert!(incident(graph, edge.end()).contains(&edge.id()));
    }
    for node in graph.nodes() {
        for id in node.borrow().incident_edges() {
            assert!(graph.contains_edge(*id), "node lists unknown edge {id}");
        }
    }
}
