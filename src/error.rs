//! Error types for the layout engine.
//!
//! Geometry itself is total once an element has been laid out; the only
//! recoverable failures are querying state that was never established and
//! loading a bad metrics configuration.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    /// The stem end row was read before anything assigned it.
    ///
    /// A stem end is established either by the element's own layout pass
    /// (default stem length) or by an enclosing chord/beam group.
    #[error("stem end is not set; lay the element out or assign a stem end row first")]
    StemEndUnset,

    /// A metrics value failed validation.
    #[error("invalid metrics value for '{field}': {value} ({reason})")]
    InvalidMetrics {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// The metrics configuration document could not be parsed.
    #[error("metrics configuration error: {0}")]
    Config(#[from] serde_json::Error),

    /// The metrics configuration file could not be read.
    #[error("failed to read metrics file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
