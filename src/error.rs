//! Error type for the fallible edges of the crate.
//!
//! Graph mutations and queries never fail: dangling references are dropped
//! and lookups return `None`. Only JSON decoding and option validation
//! produce errors.

use thiserror::Error;

/// Errors produced while decoding input data or options.
#[derive(Debug, Error)]
pub enum Error {
    /// Graph data (`{ nodes, edges }`) could not be decoded.
    #[error("invalid graph data: {0}")]
    Data(#[source] serde_json::Error),
    /// Graph options could not be decoded.
    #[error("invalid graph options: {0}")]
    Options(#[source] serde_json::Error),
    /// An option value is outside its accepted range.
    #[error("option `{name}` has invalid value {value}")]
    InvalidOption { name: &'static str, value: f32 },
}

pub type Result<T> = std::result::Result<T, Error>;
