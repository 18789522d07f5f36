//! Store of all series seen since startup.

use std::collections::BTreeMap;

use crate::source::{Observation, Snapshot};

use super::series::MetricSeries;
use super::signature::signature;

/// Counters describing what a single [`SeriesStore::update`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateStats {
    /// Distinct signatures present in the snapshot.
    pub observed: usize,
    /// Series created by this update.
    pub created: usize,
    /// Series that received a missing sample.
    pub missing: usize,
}

/// Owns every [`MetricSeries`], keyed by signature.
///
/// Each call to [`update`](Self::update) advances every series by exactly one
/// sample, so all histories stay aligned at their newest end.
#[derive(Debug, Clone)]
pub struct SeriesStore {
    series: BTreeMap<String, MetricSeries>,
    capacity: usize,
}

impl SeriesStore {
    /// Creates an empty store keeping at most `capacity` samples per series.
    pub fn new(capacity: usize) -> Self {
        Self {
            series: BTreeMap::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn get(&self, signature: &str) -> Option<&MetricSeries> {
        self.series.get(signature)
    }

    /// Series in ascending signature order.
    pub fn series(&self) -> impl Iterator<Item = &MetricSeries> {
        self.series.values()
    }

    /// Signature/series pairs in ascending signature order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetricSeries)> {
        self.series.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Merges one poll cycle into the store.
    ///
    /// Duplicate signatures within a snapshot collapse to the last one so the
    /// cycle still contributes a single sample per series.
    pub fn update(&mut self, snapshot: Snapshot) -> UpdateStats {
        let mut current: BTreeMap<String, Observation> = BTreeMap::new();
        for obs in snapshot {
            current.insert(signature(&obs.name, &obs.labels), obs);
        }

        let mut stats = UpdateStats {
            observed: current.len(),
            ..UpdateStats::default()
        };

        for series in self.series.iter_mut().filter_map(|(sig, series)| {
            (!current.contains_key(sig)).then_some(series)
        }) {
            series.push(None);
            stats.missing += 1;
        }

        for (sig, obs) in current {
            match self.series.get_mut(&sig) {
                Some(series) => series.push(Some(obs.value)),
                None => {
                    let series =
                        MetricSeries::new(obs.name, obs.labels, Some(obs.value), self.capacity);
                    self.series.insert(sig, series);
                    stats.created += 1;
                }
            }
        }

        stats
    }
}
