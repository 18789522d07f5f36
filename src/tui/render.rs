//! Main rendering logic for TUI.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::scheduler::PollScheduler;

use super::widgets::{layout_width, render_header, render_help, render_status, render_table};

/// Main render function.
pub fn render(frame: &mut Frame, sched: &PollScheduler, endpoint: &str) {
    let area = frame.area();

    let chunks = Layout::vertical([
        Constraint::Length(1), // Header
        Constraint::Min(3),    // Table
        Constraint::Length(1), // Status
    ])
    .split(area);

    let table = sched.layout(layout_width(chunks[1]));

    render_header(frame, chunks[0], sched, endpoint);
    render_table(frame, chunks[1], &table, sched);
    render_status(frame, chunks[2], sched, &table);

    // Help popup (rendered last to overlay everything)
    if sched.show_help() {
        render_help(frame, area);
    }
}
