//! Error taxonomy for the SDK.
//!
//! Two layers, matching the component boundaries: [`StoreError`] at the
//! store seam (persistence failures are fatal for the request and never
//! retried here), and [`TopologyError`] at the component surface.
//! "No matching edge/path" is deliberately NOT an error for updates or
//! lookups — updates report zero affected keys and lookups return empty
//! results, because a partially-connected topology is an expected state.
//! The `strict_no_match` setting upgrades update no-ops to [`TopologyError::NotFound`].

use thiserror::Error;

/// Failure at the persistence seam.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying store could not be reached or refused the operation.
    #[error("topology store unavailable: {0}")]
    Unavailable(String),
}

/// Component-surface errors.
#[derive(Debug, Error)]
pub enum TopologyError {
    /// Malformed input (non-numeric latency, malformed key). Rejected before
    /// any mutation is attempted.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No matching record. Only raised when `strict_no_match` is enabled,
    /// or when a required argument references a missing entity.
    #[error("not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, TopologyError>;
