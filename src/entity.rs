//! Node and edge entities and the raw data they are built from.
//!
//! Nodes are shared as [`NodeRef`] (`Rc<RefCell<Node>>`): a join that replaces
//! a node's payload mutates it in place, so every holder sees the update.
//! Edges are shared as [`EdgeRef`] (`Rc<Edge>`) and are never mutated while
//! shared; updates go through `Rc::make_mut`, leaving previously handed-out
//! references on the old value.
//!
//! An edge reaches its endpoint nodes through weak references. Only the
//! [`Graph`](crate::Graph) connects and disconnects edges; connecting also
//! records the edge id on both endpoints, which is what cascade removal walks.
//! A copy of a registered edge shares those weak references but can not
//! change them.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::options::GraphOptions;
use crate::path::{EdgeCurve, Point};
use crate::style::{EdgeProperties, NodeProperties};
use crate::topology::EdgeOffset;

pub type NodeId = i32;
pub type EdgeId = i32;

/// Opaque caller data carried by nodes and edges.
pub type Payload = Map<String, Value>;

pub type NodeRef = Rc<RefCell<Node>>;
pub type EdgeRef = Rc<Edge>;

// ============================================================================
// Raw input
// ============================================================================

/// Raw node record: `{ "id": 1, "x": 0.0, "y": 0.0, ...payload }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    pub id: NodeId,
    /// Initial x coordinate, applied only when the node is created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    /// Initial y coordinate, applied only when the node is created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    #[serde(flatten)]
    pub payload: Payload,
}

impl NodeData {
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            x: None,
            y: None,
            payload: Payload::new(),
        }
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.payload.insert(key.to_owned(), value.into());
        self
    }
}

/// Raw edge record: `{ "id": 10, "start": 1, "end": 2, ...payload }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeData {
    pub id: EdgeId,
    pub start: NodeId,
    pub end: NodeId,
    #[serde(flatten)]
    pub payload: Payload,
}

impl EdgeData {
    pub fn new(id: EdgeId, start: NodeId, end: NodeId) -> Self {
        Self {
            id,
            start,
            end,
            payload: Payload::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.payload.insert(key.to_owned(), value.into());
        self
    }
}

/// A batch of nodes and edges passed to `setup` or `join`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphData {
    pub nodes: Vec<NodeData>,
    pub edges: Vec<EdgeData>,
}

impl GraphData {
    pub fn new(nodes: Vec<NodeData>, edges: Vec<EdgeData>) -> Self {
        Self { nodes, edges }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(Error::Data)
    }
}

// ============================================================================
// Node
// ============================================================================

/// Position record shared with layout collaborators. A coordinate pair is
/// resolved only when both components are set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: Option<f32>,
    pub y: Option<f32>,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
        }
    }

    pub fn resolved(&self) -> Option<Point> {
        Some((self.x?, self.y?))
    }
}

#[derive(Debug)]
pub struct Node {
    id: NodeId,
    pub payload: Payload,
    pub position: Position,
    pub properties: NodeProperties,
    incident: Vec<EdgeId>,
}

impl Node {
    pub fn from_data(data: &NodeData, defaults: &NodeProperties) -> Self {
        Self {
            id: data.id,
            payload: data.payload.clone(),
            position: Position {
                x: data.x,
                y: data.y,
            },
            properties: defaults.clone(),
            incident: Vec::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Ids of the edges currently connected to this node.
    pub fn incident_edges(&self) -> &[EdgeId] {
        &self.incident
    }

    pub fn center(&self) -> Option<Point> {
        self.position.resolved()
    }

    /// Visual radius including the border stroke.
    pub fn bordered_radius(&self) -> f32 {
        self.properties.radius + self.properties.border_width
    }

    pub fn contains_point(&self, point: Point) -> bool {
        let Some((cx, cy)) = self.center() else {
            return false;
        };
        let dx = point.0 - cx;
        let dy = point.1 - cy;
        let r = self.bordered_radius();
        dx * dx + dy * dy <= r * r
    }
}

// ============================================================================
// Edge
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeState {
    Connected,
    Disconnected,
}

/// Non-owning link from an edge to its endpoint nodes.
#[derive(Debug, Clone)]
struct Endpoints {
    from: Weak<RefCell<Node>>,
    to: Weak<RefCell<Node>>,
}

#[derive(Debug, Clone)]
pub struct Edge {
    id: EdgeId,
    start: NodeId,
    end: NodeId,
    pub payload: Payload,
    pub offset: EdgeOffset,
    pub properties: EdgeProperties,
    endpoints: Option<Endpoints>,
}

impl Edge {
    pub fn from_data(data: &EdgeData, defaults: &EdgeProperties) -> Self {
        Self {
            id: data.id,
            start: data.start,
            end: data.end,
            payload: data.payload.clone(),
            offset: EdgeOffset::default(),
            properties: defaults.clone(),
            endpoints: None,
        }
    }

    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn start(&self) -> NodeId {
        self.start
    }

    pub fn end(&self) -> NodeId {
        self.end
    }

    pub fn is_self_loop(&self) -> bool {
        self.start == self.end
    }

    pub fn state(&self) -> EdgeState {
        if self.endpoints.is_some() {
            EdgeState::Connected
        } else {
            EdgeState::Disconnected
        }
    }

    /// Attach to the endpoint nodes and register with both of them.
    ///
    /// `from` and `to` must be the nodes with ids `start` and `end`, and must
    /// not be borrowed elsewhere. A connected edge is disconnected first.
    pub(crate) fn connect(&mut self, from: &NodeRef, to: &NodeRef) {
        self.disconnect();
        from.borrow_mut().incident.push(self.id);
        if !Rc::ptr_eq(from, to) {
            to.borrow_mut().incident.push(self.id);
        }
        self.endpoints = Some(Endpoints {
            from: Rc::downgrade(from),
            to: Rc::downgrade(to),
        });
    }

    /// Detach from the endpoint nodes. No-op when already disconnected.
    pub(crate) fn disconnect(&mut self) {
        let Some(endpoints) = self.endpoints.take() else {
            return;
        };
        for node in [endpoints.from, endpoints.to] {
            if let Some(node) = node.upgrade() {
                node.borrow_mut().incident.retain(|&id| id != self.id);
            }
        }
    }

    pub fn from_node(&self) -> Option<NodeRef> {
        self.endpoints.as_ref()?.from.upgrade()
    }

    pub fn to_node(&self) -> Option<NodeRef> {
        self.endpoints.as_ref()?.to.upgrade()
    }

    /// Drawn shape, or `None` while an endpoint has no resolved position.
    pub fn curve(&self, options: &GraphOptions) -> Option<EdgeCurve> {
        let from = self.from_node()?;
        let from = from.borrow();
        let from_center = from.center()?;

        match self.offset {
            EdgeOffset::Loop(index) => {
                let radius = options.loop_radius + index as f32 * options.loop_spacing;
                Some(EdgeCurve::self_loop(
                    from_center,
                    from.bordered_radius(),
                    radius,
                ))
            }
            EdgeOffset::Lateral(offset) => {
                let to_center = if self.is_self_loop() {
                    from_center
                } else {
                    self.to_node()?.borrow().center()?
                };
                Some(EdgeCurve::lateral(
                    from_center,
                    to_center,
                    offset,
                    self.start > self.end,
                ))
            }
        }
    }

    /// Distance from `point` to the drawn edge.
    pub fn distance_to_point(&self, point: Point, options: &GraphOptions) -> Option<f32> {
        self.curve(options)
            .map(|curve| curve.distance_to(point, options.hit_samples))
    }
}
