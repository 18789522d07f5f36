//! Bottom status line: last error or key hints, plus fetch counters.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::fmt::format_interval;
use crate::layout::Layout as TableLayout;
use crate::scheduler::PollScheduler;
use crate::tui::style::Styles;

const HINTS: &[(&str, &str)] = &[
    ("q", "quit"),
    ("p", "pause"),
    ("d", "deltas"),
    ("l", "labels"),
    ("?", "help"),
];

pub fn render_status(frame: &mut Frame, area: Rect, sched: &PollScheduler, layout: &TableLayout) {
    let chunks = Layout::horizontal([Constraint::Min(20), Constraint::Length(44)]).split(area);

    let left = match sched.last_error() {
        Some(err) => Line::from(vec![
            Span::styled(" error: ", Styles::error()),
            Span::styled(err.to_string(), Styles::error()),
            Span::styled(
                format!(" (retry in {})", format_interval(sched.interval())),
                Styles::dim(),
            ),
        ]),
        None => Line::from(
            HINTS
                .iter()
                .flat_map(|(key, what)| {
                    [
                        Span::styled(format!(" {}", key), Styles::help_key()),
                        Span::styled(format!(" {}", what), Styles::help()),
                    ]
                })
                .collect::<Vec<_>>(),
        ),
    };
    frame.render_widget(Paragraph::new(left), chunks[0]);

    let columns = match layout {
        TableLayout::Grid(g) => format!("cols {}/{}", g.value_columns(), g.candidate_columns),
        TableLayout::Empty => "cols 0/0".to_string(),
    };
    let counters = sched.counters();
    let right = format!(
        "series {}/{}  {}  ok {} err {} drop {} ",
        sched.visible_count(),
        sched.store().len(),
        columns,
        counters.succeeded,
        counters.failed,
        counters.discarded,
    );
    frame.render_widget(
        Paragraph::new(right)
            .alignment(Alignment::Right)
            .style(Styles::dim()),
        chunks[1],
    );
}
