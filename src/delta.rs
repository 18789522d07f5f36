//! Delta projection of a sample window.
//!
//! Display-only: the stored samples are never touched. A delta involving a
//! missing sample is itself missing.

use std::fmt;

use crate::storage::Sample;

/// How values are shown in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, clap::ValueEnum)]
pub enum DeltaMode {
    /// Absolute values.
    #[default]
    Off,
    /// Each historical cell shows the change into the next cell; the newest
    /// cell stays absolute.
    Next,
    /// Like `next`, but the newest cell shows the change across the visible
    /// history window.
    View,
}

impl DeltaMode {
    /// Cycles off -> next -> view -> off.
    pub fn next_mode(self) -> Self {
        match self {
            DeltaMode::Off => DeltaMode::Next,
            DeltaMode::Next => DeltaMode::View,
            DeltaMode::View => DeltaMode::Off,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DeltaMode::Off => "off",
            DeltaMode::Next => "next",
            DeltaMode::View => "view",
        }
    }
}

impl fmt::Display for DeltaMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Difference of two samples, missing if either side is missing.
pub fn diff(newer: Sample, older: Sample) -> Sample {
    Some(newer? - older?)
}

/// Projects `samples` (oldest first) into display values under `mode`.
///
/// The output always has the same length as the input.
pub fn project(samples: &[Sample], mode: DeltaMode) -> Vec<Sample> {
    if mode == DeltaMode::Off || samples.is_empty() {
        return samples.to_vec();
    }

    let last = samples.len() - 1;
    let mut out: Vec<Sample> = samples
        .windows(2)
        .map(|pair| diff(pair[1], pair[0]))
        .collect();

    let current = match mode {
        DeltaMode::View => window_change(&samples[..last]),
        _ => samples[last],
    };
    out.push(current);
    out
}

/// Change between the earliest and latest present samples of `history`.
/// Missing when fewer than two distinct present samples exist.
fn window_change(history: &[Sample]) -> Sample {
    let first = history.iter().position(Option::is_some)?;
    let last = history.iter().rposition(Option::is_some)?;
    if first == last {
        return None;
    }
    diff(history[last], history[first])
}
