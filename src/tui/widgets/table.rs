//! Series table widget.
//! Thin TUI wrapper over [`crate::layout::build`].

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};

use crate::delta::DeltaMode;
use crate::fmt::MISSING_GLYPH;
use crate::layout::{Grid, Layout};
use crate::scheduler::{ConnectionState, PollScheduler};
use crate::tui::style::Styles;

/// Rows taken by the block borders and the column header.
const TABLE_CHROME: u16 = 3;

/// Width to hand to the layout engine for a table drawn into `area`.
///
/// The block borders take two columns; the layout already charges one unit
/// per column, which covers the spacing between columns plus one border.
pub fn layout_width(area: Rect) -> u16 {
    area.width.saturating_sub(1)
}

pub fn render_table(
    frame: &mut Frame,
    area: Rect,
    layout: &Layout,
    sched: &PollScheduler,
) {
    frame.render_widget(Clear, area);

    let grid = match layout {
        Layout::Grid(grid) => grid,
        Layout::Empty => {
            let label = if sched.counters().succeeded == 0 {
                match sched.connection_state() {
                    ConnectionState::ErrorRetrying => "Endpoint unreachable, retrying...",
                    _ => "Waiting for the first scrape...",
                }
            } else if sched.store().is_empty() {
                "The endpoint reported no metrics"
            } else {
                "No metrics match the current filter"
            };
            let msg = Paragraph::new(label)
                .style(Styles::dim())
                .block(title_block(" Metrics "));
            frame.render_widget(msg, area);
            return;
        }
    };

    let body = usize::from(area.height.saturating_sub(TABLE_CHROME));
    let total = grid.rows.len();
    let first = sched.scroll().min(total);
    let last = (first + body).min(total);

    let header = Row::new(grid.headers.iter().enumerate().map(|(i, h)| {
        let line = Line::from(Span::styled(h.clone(), Styles::table_header()));
        Cell::from(if i == 0 { line } else { line.alignment(Alignment::Right) })
    }));

    let current = grid.headers.len() - 1;
    let rows: Vec<Row> = grid.rows[first..last]
        .iter()
        .map(|row| {
            Row::new(row.cells.iter().enumerate().map(|(i, text)| {
                if i == 0 {
                    return Cell::from(text.clone());
                }
                let style = cell_style(grid, text, i == current);
                Cell::from(Line::from(Span::styled(text.clone(), style)).alignment(Alignment::Right))
            }))
        })
        .collect();

    let widths: Vec<Constraint> = grid.widths.iter().map(|&w| Constraint::Length(w)).collect();

    let title = if total > body && body > 0 {
        format!(" Metrics {}-{} of {} ", first + 1, last, total)
    } else {
        format!(" Metrics ({}) ", total)
    };
    let table = Table::new(rows, widths)
        .header(header)
        .block(title_block(&title))
        .column_spacing(1);
    frame.render_widget(table, area);
}

fn cell_style(grid: &Grid, text: &str, is_current: bool) -> ratatui::style::Style {
    if text == MISSING_GLYPH {
        return Styles::dim();
    }
    match grid.delta_mode {
        DeltaMode::Off if is_current => Styles::current(),
        DeltaMode::Off => Styles::default(),
        DeltaMode::Next if is_current => Styles::current(),
        _ => Styles::delta(),
    }
}

fn title_block(title: &str) -> Block<'static> {
    Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(Styles::border())
        .style(Styles::default())
}
