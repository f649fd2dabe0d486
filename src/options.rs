//! Graph configuration.
//!
//! [`GraphOptions`] carries the tunables for edge geometry and hit-testing
//! together with the default visual properties assigned to entities when no
//! style is active. The numeric fields can be loaded from JSON; the default
//! property records are set in code.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::style::{EdgeProperties, NodeProperties};

/// Default threshold used by [`Graph::nearest_edge`](crate::Graph::nearest_edge).
pub const DEFAULT_MIN_EDGE_DISTANCE: f32 = 3.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphOptions {
    /// Maximum distance at which an edge still counts as hit.
    pub min_edge_distance: f32,
    /// Lateral distance between neighbouring parallel edges.
    pub edge_spacing: f32,
    /// Radius of the innermost self-loop.
    pub loop_radius: f32,
    /// Radius increase for each further self-loop on the same node.
    pub loop_spacing: f32,
    /// Curve subdivisions used when measuring point-to-edge distance.
    pub hit_samples: usize,
    #[serde(skip)]
    pub node_defaults: NodeProperties,
    #[serde(skip)]
    pub edge_defaults: EdgeProperties,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            min_edge_distance: DEFAULT_MIN_EDGE_DISTANCE,
            edge_spacing: 20.0,
            loop_radius: 12.0,
            loop_spacing: 6.0,
            hit_samples: 20,
            node_defaults: NodeProperties::default(),
            edge_defaults: EdgeProperties::default(),
        }
    }
}

impl GraphOptions {
    /// Decode options from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json).map_err(Error::Options)?;
        options.validate()?;
        Ok(options)
    }

    pub fn with_node_defaults(mut self, defaults: NodeProperties) -> Self {
        self.node_defaults = defaults;
        self
    }

    pub fn with_edge_defaults(mut self, defaults: EdgeProperties) -> Self {
        self.edge_defaults = defaults;
        self
    }

    /// Check that every numeric option is usable.
    pub fn validate(&self) -> Result<()> {
        non_negative("min_edge_distance", self.min_edge_distance)?;
        non_negative("edge_spacing", self.edge_spacing)?;
        non_negative("loop_spacing", self.loop_spacing)?;
        if !(self.loop_radius.is_finite() && self.loop_radius > 0.0) {
            return Err(Error::InvalidOption {
                name: "loop_radius",
                value: self.loop_radius,
            });
        }
        Ok(())
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidOption { name, value })
    }
}
