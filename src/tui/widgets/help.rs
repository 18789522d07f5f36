//! Help popup widget.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::tui::style::Styles;

const KEYS: &[(&str, &str)] = &[
    ("p, Space", "pause / resume polling"),
    ("d", "cycle deltas: off -> next -> view"),
    ("l", "show / hide labels"),
    ("j/k, ↑/↓", "scroll one row"),
    ("PgUp/PgDn", "scroll one page"),
    ("g/G, Home/End", "jump to top / bottom"),
    ("?, h, F1", "toggle this help"),
    ("q, Ctrl-C", "quit"),
];

/// Renders the help popup centered on screen.
pub fn render_help(frame: &mut Frame, area: Rect) {
    let popup_area = popup_area(area);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Styles::border());
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let paragraph = Paragraph::new(help_lines())
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(Color::White));
    frame.render_widget(paragraph, inner);
}

/// 60% of the width clamped to 40..=72, never wider than `area`; centered.
fn popup_area(area: Rect) -> Rect {
    // Widened to u32: `width * 60` overflows u16 on very wide terminals.
    let wanted = (u32::from(area.width) * 60 / 100).clamp(40, 72) as u16;
    let popup_width = wanted.min(area.width);
    let popup_height = 20.min(area.height);

    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    Rect::new(area.x + popup_x, area.y + popup_y, popup_width, popup_height)
}

fn help_lines() -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled("Keys", Styles::section_header()))];
    for (key, what) in KEYS {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<15}", key), Styles::help_key()),
            Span::raw(*what),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Columns", Styles::section_header())));
    lines.push(Line::from(
        "  Curr is the newest poll; -Ns is N seconds older.",
    ));
    lines.push(Line::from(
        "  Older columns are dropped first when the terminal is narrow.",
    ));
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled(".", Styles::dim()),
        Span::raw(" means the series was absent from that poll."),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Deltas", Styles::section_header())));
    lines.push(Line::from(
        "  next: each older cell shows the change into the next poll.",
    ));
    lines.push(Line::from(
        "  view: as next, Curr shows the change across the history.",
    ));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_popup_area_on_wide_terminal() {
        let area = Rect::new(0, 0, 4000, 10);
        let popup = popup_area(area);
        assert_eq!(popup.width, 72);
        assert_eq!(popup.height, 10);
        assert_eq!(popup.x, (4000 - 72) / 2);

        let widest = popup_area(Rect::new(0, 0, u16::MAX, 1));
        assert_eq!(widest.width, 72);
    }

    #[test]
    fn test_popup_area_on_small_terminal() {
        let popup = popup_area(Rect::new(0, 0, 30, 10));
        assert_eq!(popup.width, 30);
        assert_eq!(popup.height, 10);
        assert_eq!((popup.x, popup.y), (0, 0));

        let popup = popup_area(Rect::new(0, 0, 100, 40));
        assert_eq!(popup.width, 60);
        assert_eq!(popup.y, 10);
    }
}
