//! Per-identity sample history.

use std::collections::VecDeque;

use super::signature::{Labels, label_text};

/// One observation for one poll cycle. `None` marks "not reported this cycle".
pub type Sample = Option<f64>;

/// A metric identity together with its bounded sample window.
///
/// The window is a FIFO: pushing beyond `capacity` drops the oldest sample.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSeries {
    name: String,
    labels: Labels,
    samples: VecDeque<Sample>,
    capacity: usize,
}

impl MetricSeries {
    /// Creates a series holding exactly one sample.
    pub fn new(name: String, labels: Labels, first: Sample, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut samples = VecDeque::with_capacity(capacity);
        samples.push_back(first);
        Self {
            name,
            labels,
            samples,
            capacity,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    /// Copies the window into a contiguous vector, oldest first.
    pub fn to_vec(&self) -> Vec<Sample> {
        self.samples.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// `name` or `name{k=v,...}` depending on whether labels are requested.
    pub fn display_name(&self, with_labels: bool) -> String {
        if with_labels && !self.labels.is_empty() {
            format!("{}{{{}}}", self.name, label_text(&self.labels))
        } else {
            self.name.clone()
        }
    }

    /// Appends a sample, evicting the oldest one when the window is full.
    pub(crate) fn push(&mut self, sample: Sample) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }
}
