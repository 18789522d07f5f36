//! Metrics sources.
//!
//! The `MetricsSource` trait lets the scheduler work with the real HTTP
//! endpoint or with a scripted source in tests, the same way the rest of the
//! crate never depends on how a snapshot was obtained.

mod demo;
mod http;
pub mod mock;
pub mod parser;

pub use demo::DemoSource;
pub use http::HttpSource;
pub use parser::{ParseError, parse_exposition};

use crate::storage::Labels;

/// A single `(name, labels, value)` sample reported by the endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub name: String,
    pub labels: Labels,
    pub value: f64,
}

impl Observation {
    pub fn new(name: impl Into<String>, labels: Labels, value: f64) -> Self {
        Self {
            name: name.into(),
            labels,
            value,
        }
    }
}

/// Everything one poll returned.
pub type Snapshot = Vec<Observation>;

/// Recoverable fetch failures. Retried on the next tick.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SourceError {
    /// Transport-level failure (connect, timeout, body read).
    #[error("request failed: {0}")]
    Http(String),
    /// The endpoint answered with a non-success status.
    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },
    /// The body was not valid exposition text.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Produces one snapshot per call.
///
/// Implementations are shared with fetch worker threads, hence `Send + Sync`.
pub trait MetricsSource: Send + Sync {
    /// Fetches the current values of all metrics.
    fn fetch(&self) -> Result<Snapshot, SourceError>;

    /// Short human-readable description of where data comes from.
    fn describe(&self) -> String;
}
