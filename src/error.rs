//! Error taxonomy for climatology retrieval and region aggregation.

use thiserror::Error;

/// Failure to obtain or score the climate statistics for a single point.
///
/// A point evaluation either fully succeeds or fails with one of these;
/// no partial result is ever produced. Failures are not retried here;
/// retry policy, if any, belongs to the caller.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("climatology request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("climatology provider returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("{0}")]
    MissingData(String),

    #[error("month must be between 1 and 12, got {0}")]
    InvalidMonth(u32),
}

/// Failure of a whole region evaluation.
#[derive(Error, Debug)]
pub enum AggregationError {
    /// The caller's polygon cannot be sampled. Raised before any
    /// evaluation is attempted.
    #[error("invalid polygon: {0}")]
    InvalidPolygon(String),

    /// Every sampled point failed to evaluate, leaving nothing to
    /// aggregate. Individual sample failures below this threshold are
    /// absorbed and only reduce the evaluated count.
    #[error("every sampled point failed to evaluate")]
    AllSamplesFailed,
}
