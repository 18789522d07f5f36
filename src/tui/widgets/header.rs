//! Header bar showing endpoint, connection state and view modes.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::fmt::format_interval;
use crate::scheduler::{ConnectionState, PollScheduler};
use crate::tui::style::Styles;

/// Renders the header bar.
pub fn render_header(frame: &mut Frame, area: Rect, sched: &PollScheduler, endpoint: &str) {
    let chunks = Layout::horizontal([
        Constraint::Min(20),    // Endpoint
        Constraint::Length(44), // State/modes/time
    ])
    .split(area);

    let mut left = vec![
        Span::styled(" promtab ", Styles::header()),
        Span::styled(endpoint.to_string(), Styles::header()),
    ];
    if let Some(filter) = sched.filter().summary() {
        left.push(Span::styled(format!("  filter {}", filter), Styles::header()));
    }
    let left = Line::from(left);
    frame.render_widget(Paragraph::new(left).style(Styles::header()), chunks[0]);

    let state_style = match sched.connection_state() {
        ConnectionState::Connected => Styles::connected(),
        ConnectionState::Connecting => Styles::connecting(),
        ConnectionState::ErrorRetrying => Styles::error(),
    };
    let mode = if sched.is_paused() {
        Span::styled(" PAUSED ", Styles::paused())
    } else {
        Span::styled(" LIVE ", Styles::header())
    };
    let updated = sched
        .last_update()
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string());

    let right = Line::from(vec![
        Span::styled(format!("{} ", sched.connection_state().name()), state_style),
        mode,
        Span::styled(
            format!(
                " {} Δ:{} {} ",
                format_interval(sched.interval()),
                sched.delta_mode(),
                updated
            ),
            Styles::header(),
        ),
    ]);
    let right = Paragraph::new(right)
        .alignment(Alignment::Right)
        .style(Styles::header());
    frame.render_widget(right, chunks[1]);
}
