//! Visual properties, styles and the image-loading seam.
//!
//! A [`Style`] is a pair of optional pure functions mapping a node or an edge
//! to its visual properties. [`StylePipeline`] runs the active style over the
//! whole graph, stores the results on the entities and hands every image URL
//! the node style references to the injected [`ImageLoader`]. Loading is
//! fire-and-forget: nothing here waits for it or re-renders when it ends.

use std::rc::Rc;

use indexmap::{IndexMap, IndexSet};
use slint::Color;
use tracing::trace;

use crate::entity::{Edge, EdgeId, EdgeRef, Node, NodeId, NodeRef};

/// How a node is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeProperties {
    pub radius: f32,
    pub border_width: f32,
    pub color: Color,
    pub border_color: Color,
    pub label: Option<String>,
    /// Image shown inside the node.
    pub image: Option<String>,
    /// Image shown while the node is selected.
    pub selected_image: Option<String>,
}

impl Default for NodeProperties {
    fn default() -> Self {
        Self {
            radius: 10.0,
            border_width: 1.0,
            color: Color::from_rgb_u8(151, 194, 252),
            border_color: Color::from_rgb_u8(43, 124, 233),
            label: None,
            image: None,
            selected_image: None,
        }
    }
}

/// How an edge is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeProperties {
    pub width: f32,
    pub color: Color,
    pub label: Option<String>,
}

impl Default for EdgeProperties {
    fn default() -> Self {
        Self {
            width: 1.0,
            color: Color::from_rgb_u8(132, 132, 132),
            label: None,
        }
    }
}

pub type NodeStyleFn = Rc<dyn Fn(&Node) -> NodeProperties>;
pub type EdgeStyleFn = Rc<dyn Fn(&Edge) -> EdgeProperties>;

/// Caller-supplied styling functions. Either may be absent, in which case
/// that entity kind keeps its current properties.
#[derive(Clone, Default)]
pub struct Style {
    node: Option<NodeStyleFn>,
    edge: Option<EdgeStyleFn>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node_style<F>(mut self, f: F) -> Self
    where
        F: Fn(&Node) -> NodeProperties + 'static,
    {
        self.node = Some(Rc::new(f));
        self
    }

    pub fn with_edge_style<F>(mut self, f: F) -> Self
    where
        F: Fn(&Edge) -> EdgeProperties + 'static,
    {
        self.edge = Some(Rc::new(f));
        self
    }
}

impl std::fmt::Debug for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Style")
            .field("node", &self.node.is_some())
            .field("edge", &self.edge.is_some())
            .finish()
    }
}

/// Loads images referenced by node styles.
///
/// `load` must not block; `on_loaded` is called once the batch is available.
pub trait ImageLoader {
    fn load(&self, urls: Vec<String>, on_loaded: Box<dyn FnOnce()>);
}

/// Loader that fetches nothing and reports completion immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopImageLoader;

impl ImageLoader for NoopImageLoader {
    fn load(&self, _urls: Vec<String>, on_loaded: Box<dyn FnOnce()>) {
        on_loaded();
    }
}

/// Applies the active [`Style`] to nodes and edges.
pub struct StylePipeline {
    style: Option<Style>,
    loader: Rc<dyn ImageLoader>,
    node_defaults: NodeProperties,
    edge_defaults: EdgeProperties,
}

impl StylePipeline {
    pub fn new(
        loader: Rc<dyn ImageLoader>,
        node_defaults: NodeProperties,
        edge_defaults: EdgeProperties,
    ) -> Self {
        Self {
            style: None,
            loader,
            node_defaults,
            edge_defaults,
        }
    }

    pub fn has_style(&self) -> bool {
        self.style.is_some()
    }

    /// Forget the active style without touching entity properties.
    pub fn clear(&mut self) {
        self.style = None;
    }

    pub fn set_style(
        &mut self,
        style: Style,
        nodes: &IndexMap<NodeId, NodeRef>,
        edges: &mut IndexMap<EdgeId, EdgeRef>,
    ) {
        self.style = Some(style);
        self.reapply(nodes, edges);
    }

    /// Clear the active style and reset every entity to the defaults.
    pub fn set_default_style(
        &mut self,
        nodes: &IndexMap<NodeId, NodeRef>,
        edges: &mut IndexMap<EdgeId, EdgeRef>,
    ) {
        self.style = None;
        for node in nodes.values() {
            node.borrow_mut().properties = self.node_defaults.clone();
        }
        for edge in edges.values_mut() {
            if edge.properties != self.edge_defaults {
                Rc::make_mut(edge).properties = self.edge_defaults.clone();
            }
        }
    }

    /// Run the active style, if any, over every node and edge.
    pub fn reapply(
        &mut self,
        nodes: &IndexMap<NodeId, NodeRef>,
        edges: &mut IndexMap<EdgeId, EdgeRef>,
    ) {
        let Some(style) = &self.style else {
            return;
        };

        let mut images = IndexSet::new();
        if let Some(node_style) = &style.node {
            for node in nodes.values() {
                let properties = node_style(&*node.borrow());
                images.extend(properties.image.iter().cloned());
                images.extend(properties.selected_image.iter().cloned());
                node.borrow_mut().properties = properties;
            }
        }
        if let Some(edge_style) = &style.edge {
            for edge in edges.values_mut() {
                let properties = edge_style(&**edge);
                if edge.properties != properties {
                    Rc::make_mut(edge).properties = properties;
                }
            }
        }
        trace!(
            nodes = nodes.len(),
            edges = edges.len(),
            images = images.len(),
            "style applied"
        );

        if !images.is_empty() {
            self.loader
                .load(images.into_iter().collect(), Box::new(|| {}));
        }
    }
}
