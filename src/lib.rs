//! # Slint Network Graph
//!
//! An in-memory graph model for network visualizations rendered with Slint.
//! It keeps nodes and edges consistent across incremental updates and
//! computes everything a renderer needs: parallel-edge offsets, styles,
//! bounding boxes, hit-testing and edge paths.
//!
//! ## Features
//!
//! - **Consistent updates** - `setup`, `join` and `hide` never leave an edge
//!   pointing at a missing node; bad references are dropped, not reported
//! - **Stable identity** - joined nodes are updated in place, so held
//!   references observe new payloads
//! - **Parallel edges** - edges between the same pair of nodes are fanned out
//!   symmetrically, self-loops are stacked in rings
//! - **Styling** - pure style functions map entities to visual properties;
//!   referenced images are handed to an injected [`ImageLoader`]
//! - **Hit-testing** - top-most node and nearest edge at a point, box selection
//!
//! ## Quick Start
//!
//! ```ignore
//! use slint_network_graph::{EdgeData, Graph, GraphData, GraphOptions, NodeData};
//!
//! let mut graph = Graph::new(GraphOptions::default());
//! graph.setup(&GraphData::new(
//!     vec![NodeData::new(1).at(0.0, 0.0), NodeData::new(2).at(120.0, 0.0)],
//!     vec![EdgeData::new(10, 1, 2), EdgeData::new(11, 2, 1)],
//! ));
//!
//! // Later snapshots are merged in
//! graph.join(&GraphData::from_json(&snapshot)?);
//!
//! // Removing a node removes its edges too
//! graph.hide(&[1], &[]);
//!
//! let hit = graph.nearest_node((118.0, 2.0));
//! ```
//!
//! ## Rust Helpers
//!
//! - [`bounding_box`], [`topmost_node_at`], [`nearest_edge_at`] - hit-testing
//!   over any [`NodeGeometry`] / [`EdgeGeometry`]
//! - [`compute_offsets`] - parallel-edge offsets for a list of endpoints
//! - [`Selection`] - node and edge selection state with Slint model sync
//! - [`EdgePathModel`] - SVG path commands for every drawable edge
//! - `sugiyama_layout` - layered layout (feature `layout`)

pub mod entity;
pub mod error;
pub mod path;
pub mod options;
pub mod topology;
pub mod style;
pub mod graph;
pub mod positions;
pub mod selection;
pub mod edge_paths;
#[cfg(feature = "layout")]
pub mod layout;

pub use entity::{
    Edge, EdgeData, EdgeId, EdgeRef, EdgeState, GraphData, Node, NodeData, NodeId, NodeRef,
    Payload, Position,
};
pub use error::{Error, Result};
pub use path::{distance_to_bezier, distance_to_segment, CubicBezier, EdgeCurve, Point};
pub use options::{GraphOptions, DEFAULT_MIN_EDGE_DISTANCE};
pub use topology::{compute_offsets, EdgeOffset};
pub use style::{
    EdgeProperties, EdgeStyleFn, ImageLoader, NodeProperties, NodeStyleFn, NoopImageLoader, Style,
    StylePipeline,
};
pub use graph::Graph;
pub use hit_test::{
    bounding_box, nearest_edge_at, nodes_in_box, topmost_node_at, BoundingBox, EdgeGeometry,
    NodeGeometry, SimpleEdgeGeometry, SimpleNodeGeometry,
};
pub use positions::{EdgePosition, NodePosition};
pub use selection::{Hit, Selection, SelectionSet};
pub use edge_paths::{EdgePath, EdgePathModel};
#[cfg(feature = "layout")]
pub use layout::{sugiyama_layout, Direction, SugiyamaConfig};
