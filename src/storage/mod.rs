//! In-memory series storage.
//!
//! - `signature`: canonical identity of a series
//! - `series`: bounded per-series sample window
//! - `store`: all series keyed by signature, advanced once per poll

mod series;
pub mod signature;
mod store;

pub use series::{MetricSeries, Sample};
pub use signature::{Labels, signature};
pub use store::{SeriesStore, UpdateStats};
