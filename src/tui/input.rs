//! Input handling and keybindings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::scheduler::Command;

/// Maps a key press to a scheduler command.
///
/// `page` is the number of body rows on screen, used by PageUp/PageDown.
/// While the help popup is open, only keys that close it or quit are
/// accepted.
pub fn handle_key(key: KeyEvent, help_visible: bool, page: usize) -> Option<Command> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Command::Quit);
    }

    if help_visible {
        return match key.code {
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::F(1) => {
                Some(Command::ToggleHelp)
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => Some(Command::Quit),
            _ => None,
        };
    }

    let page = page.max(1);
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(Command::Quit),
        KeyCode::Char('p') | KeyCode::Char(' ') => Some(Command::TogglePause),
        KeyCode::Char('d') => Some(Command::CycleDelta),
        KeyCode::Char('l') => Some(Command::ToggleLabels),
        KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::F(1) => Some(Command::ToggleHelp),

        KeyCode::Up | KeyCode::Char('k') => Some(Command::ScrollUp(1)),
        KeyCode::Down | KeyCode::Char('j') => Some(Command::ScrollDown(1)),
        KeyCode::PageUp => Some(Command::ScrollUp(page)),
        KeyCode::PageDown => Some(Command::ScrollDown(page)),
        KeyCode::Home | KeyCode::Char('g') => Some(Command::ScrollHome),
        KeyCode::End | KeyCode::Char('G') => Some(Command::ScrollEnd),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_basic_bindings() {
        assert_eq!(handle_key(key(KeyCode::Char('q')), false, 10), Some(Command::Quit));
        assert_eq!(
            handle_key(key(KeyCode::Char('p')), false, 10),
            Some(Command::TogglePause)
        );
        assert_eq!(
            handle_key(key(KeyCode::Char('d')), false, 10),
            Some(Command::CycleDelta)
        );
        assert_eq!(
            handle_key(key(KeyCode::Char('l')), false, 10),
            Some(Command::ToggleLabels)
        );
        assert_eq!(handle_key(key(KeyCode::Char('x')), false, 10), None);
    }

    #[test]
    fn test_ctrl_c_always_quits() {
        let ctrl_c = KeyEvent {
            modifiers: KeyModifiers::CONTROL,
            ..key(KeyCode::Char('c'))
        };
        assert_eq!(handle_key(ctrl_c, false, 10), Some(Command::Quit));
        assert_eq!(handle_key(ctrl_c, true, 10), Some(Command::Quit));
    }

    #[test]
    fn test_paging_uses_page_size() {
        assert_eq!(
            handle_key(key(KeyCode::PageDown), false, 17),
            Some(Command::ScrollDown(17))
        );
        assert_eq!(
            handle_key(key(KeyCode::PageUp), false, 0),
            Some(Command::ScrollUp(1))
        );
        assert_eq!(handle_key(key(KeyCode::End), false, 5), Some(Command::ScrollEnd));
    }

    #[test]
    fn test_help_popup_swallows_keys() {
        assert_eq!(handle_key(key(KeyCode::Char('d')), true, 10), None);
        assert_eq!(
            handle_key(key(KeyCode::Esc), true, 10),
            Some(Command::ToggleHelp)
        );
        assert_eq!(handle_key(key(KeyCode::Char('q')), true, 10), Some(Command::Quit));
    }
}
