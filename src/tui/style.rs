//! Color scheme and styles.

use ratatui::style::{Color, Modifier, Style};

/// Color palette.
pub struct Theme;

impl Theme {
    pub const BG: Color = Color::Reset;
    pub const HEADER_BG: Color = Color::Blue;

    pub const FG: Color = Color::White;
    pub const FG_DIM: Color = Color::DarkGray;
    pub const HEADER_FG: Color = Color::White;

    // Connection state
    pub const OK: Color = Color::Green;
    pub const WARN: Color = Color::Yellow;
    pub const ERROR: Color = Color::Red;

    pub const BORDER: Color = Color::Cyan;
    pub const DELTA: Color = Color::Cyan;
    pub const KEY: Color = Color::Yellow;
}

/// Pre-defined styles.
pub struct Styles;

impl Styles {
    /// Default text style.
    pub fn default() -> Style {
        Style::default().fg(Theme::FG).bg(Theme::BG)
    }

    /// Header bar style.
    pub fn header() -> Style {
        Style::default()
            .fg(Theme::HEADER_FG)
            .bg(Theme::HEADER_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Table column header style.
    pub fn table_header() -> Style {
        Style::default()
            .fg(Theme::HEADER_FG)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    }

    pub fn connected() -> Style {
        Style::default().fg(Theme::OK).add_modifier(Modifier::BOLD)
    }

    pub fn connecting() -> Style {
        Style::default().fg(Theme::WARN).add_modifier(Modifier::BOLD)
    }

    pub fn error() -> Style {
        Style::default().fg(Theme::ERROR).add_modifier(Modifier::BOLD)
    }

    /// Paused indicator.
    pub fn paused() -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(Theme::WARN)
            .add_modifier(Modifier::BOLD)
    }

    /// Dimmed text style.
    pub fn dim() -> Style {
        Style::default().fg(Theme::FG_DIM)
    }

    /// Historical cells in delta modes.
    pub fn delta() -> Style {
        Style::default().fg(Theme::DELTA)
    }

    /// Newest value column.
    pub fn current() -> Style {
        Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD)
    }

    pub fn border() -> Style {
        Style::default().fg(Theme::BORDER)
    }

    /// Section header style for popups.
    pub fn section_header() -> Style {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }

    /// Highlighted keys in help text.
    pub fn help_key() -> Style {
        Style::default().fg(Theme::KEY).add_modifier(Modifier::BOLD)
    }

    pub fn help() -> Style {
        Style::default().fg(Theme::FG_DIM)
    }
}
