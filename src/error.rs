//! Error types.

use thiserror::Error;

/// Errors surfaced at the public index boundary.
///
/// Only precondition violations reach the caller; transient placement failures inside the engines
/// are retried internally and never escape.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A k-d tree was asked to insert before its bounding extent was configured.
    #[error("bounding extent must be set before inserting points")]
    ExtentNotSet,

    /// A k-d tree's bounding extent was reconfigured after insertion had begun.
    #[error("bounding extent cannot change once points have been inserted")]
    ExtentLocked,

    /// A point's dimensionality disagrees with the configured extent.
    #[error("point has {point} dimensions but the extent has {extent}")]
    DimensionMismatch {
        /// Dimensionality of the offending point.
        point: usize,
        /// Dimensionality of the configured extent.
        extent: usize,
    },
}

/// Convenience alias for results with crate [`Error`]s.
pub type Result<T> = std::result::Result<T, Error>;
