//! Edge paths for rendering.
//!
//! [`EdgePathModel`] turns every drawable edge of a [`Graph`] into SVG path
//! commands plus the stroke color and width from its properties. The result
//! can be read directly or mirrored into a Slint `VecModel`.
//!
//! # Example
//!
//! ```ignore
//! use slint_network_graph::{EdgePathModel, Graph};
//!
//! let mut paths = EdgePathModel::new();
//!
//! // Bind once - syncs on every update
//! let model = Rc::new(VecModel::<EdgeShape>::default());
//! paths.bind_model(model.clone(), |id, commands, color, width| EdgeShape {
//!     id,
//!     commands,
//!     color,
//!     width,
//! });
//! window.set_edges(ModelRc::from(model));
//!
//! // After any change to the graph or node positions
//! paths.update(&graph);
//! ```

use std::rc::Rc;

use slint::{Color, Model, ModelRc, SharedString, VecModel};
use tracing::trace;

use crate::entity::EdgeId;
use crate::graph::Graph;

/// Drawable form of one edge.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgePath {
    pub id: EdgeId,
    pub commands: String,
    pub color: Color,
    pub width: f32,
}

/// Internal trait for auto-syncing to Slint models.
trait ModelSyncer {
    fn sync(&self, paths: &[EdgePath]);
}

/// Concrete implementation of ModelSyncer for a specific row type.
struct ConcreteModelSyncer<P, F> {
    model: Rc<VecModel<P>>,
    constructor: F,
}

impl<P, F> ModelSyncer for ConcreteModelSyncer<P, F>
where
    P: Clone + 'static,
    F: Fn(EdgeId, SharedString, Color, f32) -> P,
{
    fn sync(&self, paths: &[EdgePath]) {
        sync_rows(&self.model, paths, &self.constructor);
    }
}

/// Update rows in place, append new ones and drop the excess.
fn sync_rows<P, F>(model: &VecModel<P>, paths: &[EdgePath], constructor: &F)
where
    P: Clone + 'static,
    F: Fn(EdgeId, SharedString, Color, f32) -> P,
{
    for (i, path) in paths.iter().enumerate() {
        let item = constructor(
            path.id,
            SharedString::from(path.commands.as_str()),
            path.color,
            path.width,
        );
        if i < model.row_count() {
            model.set_row_data(i, item);
        } else {
            model.push(item);
        }
    }
    while model.row_count() > paths.len() {
        model.remove(model.row_count() - 1);
    }
}

/// Computed edge paths, optionally mirrored into a bound Slint model.
#[derive(Default)]
pub struct EdgePathModel {
    paths: Vec<EdgePath>,
    syncer: Option<Box<dyn ModelSyncer>>,
}

impl EdgePathModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind to a Slint model for automatic synchronization.
    ///
    /// After binding, every call to [`update`](Self::update) rewrites the
    /// model. `constructor` builds a row from `(id, commands, color, width)`.
    pub fn bind_model<P, F>(&mut self, model: Rc<VecModel<P>>, constructor: F)
    where
        P: Clone + 'static,
        F: Fn(EdgeId, SharedString, Color, f32) -> P + 'static,
    {
        self.syncer = Some(Box::new(ConcreteModelSyncer { model, constructor }));
    }

    /// Recompute every path from the current graph.
    ///
    /// Edges whose endpoints have no resolved position are left out.
    pub fn update(&mut self, graph: &Graph) {
        let options = graph.options();
        self.paths = graph
            .edges()
            .iter()
            .filter_map(|edge| {
                let curve = edge.curve(options)?;
                Some(EdgePath {
                    id: edge.id(),
                    commands: curve.to_path_commands(),
                    color: edge.properties.color,
                    width: edge.properties.width,
                })
            })
            .collect();
        trace!(edges = graph.edge_count(), paths = self.paths.len(), "edge paths updated");

        if let Some(syncer) = &self.syncer {
            syncer.sync(&self.paths);
        }
    }

    pub fn paths(&self) -> &[EdgePath] {
        &self.paths
    }

    pub fn find(&self, id: EdgeId) -> Option<&EdgePath> {
        self.paths.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Build a fresh Slint model from the current paths.
    pub fn create_model<P, F>(&self, constructor: F) -> ModelRc<P>
    where
        P: Clone + 'static,
        F: Fn(EdgeId, SharedString, Color, f32) -> P,
    {
        let model: Rc<VecModel<P>> = Rc::new(VecModel::default());
        sync_rows(&model, &self.paths, &constructor);
        ModelRc::from(model)
    }
}
