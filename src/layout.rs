//! Column-fit layout of the series table.
//!
//! The table has one name column followed by value columns ordered oldest to
//! newest. When the terminal is too narrow, the oldest columns are dropped
//! first; at least the newest column is always shown.

use std::time::Duration;

use crate::delta::{DeltaMode, project};
use crate::fmt::{column_header, display_width, format_sample};
use crate::storage::MetricSeries;

/// Header of the name column.
pub const NAME_HEADER: &str = "Metric";

/// Whether label pairs are appended to the name cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelMode {
    #[default]
    Hidden,
    Shown,
}

impl LabelMode {
    pub fn from_flag(show: bool) -> Self {
        if show { LabelMode::Shown } else { LabelMode::Hidden }
    }

    pub fn toggle(self) -> Self {
        match self {
            LabelMode::Hidden => LabelMode::Shown,
            LabelMode::Shown => LabelMode::Hidden,
        }
    }

    pub fn is_shown(self) -> bool {
        self == LabelMode::Shown
    }
}

/// Everything besides the series that shapes the table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    /// History capacity: the maximum number of value columns.
    pub history: usize,
    /// Poll interval, used for the age labels of value columns.
    pub interval: Duration,
    /// Width available to the table, in terminal columns.
    pub width: u16,
    pub label_mode: LabelMode,
    pub delta_mode: DeltaMode,
}

/// One table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRow {
    pub signature: String,
    /// Name cell followed by the selected value cells.
    pub cells: Vec<String>,
}

/// Final table handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    /// Name header followed by the selected value headers.
    pub headers: Vec<String>,
    pub rows: Vec<GridRow>,
    /// Content width of every selected column, name column first.
    pub widths: Vec<u16>,
    /// Number of value columns before fitting to the width.
    pub candidate_columns: usize,
    pub delta_mode: DeltaMode,
}

impl Grid {
    /// Number of value columns that survived the fit.
    pub fn value_columns(&self) -> usize {
        self.headers.len() - 1
    }
}

/// Result of a layout pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layout {
    /// No series matched: there is nothing to display.
    Empty,
    Grid(Grid),
}

struct Candidate<'a> {
    signature: &'a str,
    name: String,
    values: Vec<String>,
}

/// Builds the table for `series`, which must already be filtered and in the
/// desired row order.
pub fn build<'a, I>(series: I, opts: &LayoutOptions) -> Layout
where
    I: IntoIterator<Item = (&'a str, &'a MetricSeries)>,
{
    let series: Vec<(&str, &MetricSeries)> = series.into_iter().collect();
    if series.is_empty() {
        return Layout::Empty;
    }

    let longest = series.iter().map(|(_, s)| s.len()).max().unwrap_or(0);
    let columns = opts.history.min(longest).max(1);

    let headers: Vec<String> = (0..columns)
        .map(|j| column_header(columns - 1 - j, opts.interval))
        .collect();

    // Every cell is rendered once, at full precision, for measurement.
    let candidates: Vec<Candidate> = series
        .iter()
        .map(|(sig, s)| {
            let projected = project(&s.to_vec(), opts.delta_mode);
            let len = projected.len();
            let values = (0..columns)
                .map(|j| {
                    let offset = columns - 1 - j;
                    if offset < len {
                        format_sample(projected[len - 1 - offset])
                    } else {
                        String::new()
                    }
                })
                .collect();
            Candidate {
                signature: sig,
                name: s.display_name(opts.label_mode.is_shown()),
                values,
            }
        })
        .collect();

    let name_width = candidates
        .iter()
        .map(|c| display_width(&c.name))
        .fold(display_width(NAME_HEADER), u16::max);
    let value_widths: Vec<u16> = (0..columns)
        .map(|j| {
            candidates
                .iter()
                .map(|c| display_width(&c.values[j]))
                .fold(display_width(&headers[j]), u16::max)
        })
        .collect();

    let kept = fit_columns(name_width, &value_widths, opts.width);
    let start = columns - kept;

    let mut grid_headers = Vec::with_capacity(kept + 1);
    grid_headers.push(NAME_HEADER.to_string());
    grid_headers.extend(headers[start..].iter().cloned());

    let mut widths = Vec::with_capacity(kept + 1);
    widths.push(name_width);
    widths.extend_from_slice(&value_widths[start..]);

    let rows = candidates
        .into_iter()
        .map(|c| {
            let mut cells = Vec::with_capacity(kept + 1);
            cells.push(c.name);
            cells.extend(c.values.into_iter().skip(start));
            GridRow {
                signature: c.signature.to_string(),
                cells,
            }
        })
        .collect();

    Layout::Grid(Grid {
        headers: grid_headers,
        rows,
        widths,
        candidate_columns: columns,
        delta_mode: opts.delta_mode,
    })
}

/// Number of trailing value columns that fit into `available`.
///
/// The name column costs its width plus one border unit; each value column
/// costs its width plus one. Columns are taken newest first until the next
/// one would overflow. At least one column is kept whenever any exist.
pub fn fit_columns(name_width: u16, value_widths: &[u16], available: u16) -> usize {
    let available = u32::from(available);
    let mut used = u32::from(name_width) + 1;
    let mut kept = 0;
    for width in value_widths.iter().rev() {
        let next = used + u32::from(*width) + 1;
        if next > available {
            break;
        }
        used = next;
        kept += 1;
    }
    kept.max(1).min(value_widths.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Observation;
    use crate::storage::{Labels, SeriesStore};

    fn opts(history: usize, width: u16) -> LayoutOptions {
        LayoutOptions {
            history,
            interval: Duration::from_secs(5),
            width,
            label_mode: LabelMode::Hidden,
            delta_mode: DeltaMode::Off,
        }
    }

    fn feed(store: &mut SeriesStore, name: &str, values: &[f64]) {
        for v in values {
            store.update(vec![Observation::new(name, Labels::new(), *v)]);
        }
    }

    fn grid(layout: Layout) -> Grid {
        match layout {
            Layout::Grid(g) => g,
            Layout::Empty => panic!("expected a grid"),
        }
    }

    #[test]
    fn test_empty_input_is_explicit() {
        let store = SeriesStore::new(3);
        assert_eq!(build(store.iter(), &opts(3, 80)), Layout::Empty);
    }

    #[test]
    fn test_headers_and_cells() {
        let mut store = SeriesStore::new(3);
        feed(&mut store, "requests_total", &[100.0, 140.0, 190.0]);

        let g = grid(build(store.iter(), &opts(3, 200)));
        assert_eq!(g.headers, vec!["Metric", "-10s", "-5s", "Curr"]);
        assert_eq!(g.rows[0].cells, vec!["requests_total", "100", "140", "190"]);
        assert_eq!(g.rows[0].signature, "requests_total{}");
        assert_eq!(g.widths, vec![14, 4, 3, 4]);
    }

    #[test]
    fn test_end_to_end_next_mode() {
        let mut store = SeriesStore::new(3);
        feed(&mut store, "requests_total", &[100.0, 140.0, 190.0]);

        let mut o = opts(3, 200);
        o.delta_mode = DeltaMode::Next;
        let g = grid(build(store.iter(), &o));
        assert_eq!(&g.rows[0].cells[1..], &["40", "50", "190"]);
        assert_eq!(g.delta_mode, DeltaMode::Next);
    }

    #[test]
    fn test_short_history_is_right_aligned() {
        let mut store = SeriesStore::new(4);
        feed(&mut store, "old", &[1.0, 2.0, 3.0]);
        store.update(vec![
            Observation::new("old", Labels::new(), 4.0),
            Observation::new("young", Labels::new(), 9.0),
        ]);

        let g = grid(build(store.iter(), &opts(4, 200)));
        assert_eq!(g.candidate_columns, 4);
        assert_eq!(g.rows[0].cells, vec!["old", "1", "2", "3", "4"]);
        assert_eq!(g.rows[1].cells, vec!["young", "", "", "", "9"]);
    }

    #[test]
    fn test_missing_uses_placeholder() {
        let mut store = SeriesStore::new(3);
        feed(&mut store, "a", &[1.0]);
        store.update(Vec::new());
        feed(&mut store, "a", &[0.0]);

        let g = grid(build(store.iter(), &opts(3, 200)));
        assert_eq!(g.rows[0].cells, vec!["a", "1", ".", "0"]);
    }

    #[test]
    fn test_columns_capped_by_history_and_longest_series() {
        let mut store = SeriesStore::new(10);
        feed(&mut store, "a", &[1.0, 2.0]);
        let g = grid(build(store.iter(), &opts(10, 200)));
        assert_eq!(g.candidate_columns, 2);
        assert_eq!(g.headers, vec!["Metric", "-5s", "Curr"]);
    }

    #[test]
    fn test_label_mode_in_name_cell() {
        let mut store = SeriesStore::new(2);
        let mut labels = Labels::new();
        labels.insert("method".into(), "get".into());
        labels.insert("code".into(), "200".into());
        store.update(vec![Observation::new("http", labels, 1.0)]);

        let mut o = opts(2, 200);
        o.label_mode = LabelMode::Shown;
        let g = grid(build(store.iter(), &o));
        assert_eq!(g.rows[0].cells[0], "http{code=200,method=get}");
    }

    #[test]
    fn test_narrow_width_keeps_newest_suffix() {
        let mut store = SeriesStore::new(5);
        feed(&mut store, "m", &[1.0, 2.0, 3.0, 4.0, 5.0]);

        // name 6 + 1, then "Curr"(4)+1, "-5s"(3)+1, "-10s"(4)+1 ...
        let g = grid(build(store.iter(), &opts(5, 7 + 5 + 4)));
        assert_eq!(g.headers, vec!["Metric", "-5s", "Curr"]);
        assert_eq!(g.rows[0].cells, vec!["m", "4", "5"]);
        assert_eq!(g.candidate_columns, 5);
        assert_eq!(g.value_columns(), 2);
    }

    #[test]
    fn test_at_least_one_column_when_nothing_fits() {
        let mut store = SeriesStore::new(3);
        feed(&mut store, "a_really_long_metric_name", &[1.0, 2.0, 3.0]);
        let g = grid(build(store.iter(), &opts(3, 5)));
        assert_eq!(g.headers, vec!["Metric", "Curr"]);
        assert_eq!(g.rows[0].cells, vec!["a_really_long_metric_name", "3"]);
    }

    #[test]
    fn test_shrinking_width_is_monotonic_suffix() {
        let mut store = SeriesStore::new(8);
        feed(
            &mut store,
            "latency",
            &[1.0, 22.5, 333.25, 4.0, 5555.0, 6.5, 77.0, 8.0],
        );

        let full = grid(build(store.iter(), &opts(8, 500)));
        let full_headers = full.headers[1..].to_vec();

        let mut previous = usize::MAX;
        for width in (0..=120u16).rev() {
            let g = grid(build(store.iter(), &opts(8, width)));
            let n = g.value_columns();
            assert!(n >= 1);
            assert!(n <= previous, "width {} grew columns", width);
            previous = n;

            let suffix = &full_headers[full_headers.len() - n..];
            assert_eq!(&g.headers[1..], suffix);
            for row in &g.rows {
                assert_eq!(row.cells.len(), n + 1);
            }
        }
    }

    #[test]
    fn test_layout_is_idempotent() {
        let mut store = SeriesStore::new(4);
        feed(&mut store, "a", &[1.0, 2.0, 3.0]);
        feed(&mut store, "b", &[7.0]);
        let o = opts(4, 40);
        assert_eq!(build(store.iter(), &o), build(store.iter(), &o));
    }

    #[test]
    fn test_width_never_narrower_than_header() {
        let mut store = SeriesStore::new(3);
        feed(&mut store, "x", &[1.0, 1.0, 1.0]);
        let g = grid(build(store.iter(), &opts(3, 200)));
        assert_eq!(g.widths, vec![6, 4, 3, 4]);
    }

    #[test]
    fn test_fit_columns() {
        assert_eq!(fit_columns(10, &[3, 3, 3], 100), 3);
        // 10+1 = 11; +4 = 15; +4 = 19; +4 = 23
        assert_eq!(fit_columns(10, &[3, 3, 3], 22), 2);
        assert_eq!(fit_columns(10, &[3, 3, 3], 15), 1);
        assert_eq!(fit_columns(10, &[3, 3, 3], 0), 1);
        assert_eq!(fit_columns(10, &[], 100), 0);
        // Stops at the first overflow even if an older column would fit.
        assert_eq!(fit_columns(1, &[1, 50, 1], 10), 1);
    }
}
