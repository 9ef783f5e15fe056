use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Quit,
    Cancel,
    NextSection,
    Submit,
    Backspace,
    Up,
    Down,
    Left,
    Right,
    Input(char),
    None,
}

/// Maps a key press. While `typing`, printable keys are always input.
pub fn map_key(key: KeyEvent, typing: bool) -> AppAction {
    if key.kind == KeyEventKind::Release {
        return AppAction::None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if let KeyCode::Char('c') = key.code {
            return AppAction::Quit;
        }
        return AppAction::None;
    }

    match key.code {
        KeyCode::Char('q') if !typing => AppAction::Quit,
        KeyCode::Esc => AppAction::Cancel,
        KeyCode::Tab => AppAction::NextSection,
        KeyCode::Enter => AppAction::Submit,
        KeyCode::Backspace => AppAction::Backspace,
        KeyCode::Up => AppAction::Up,
        KeyCode::Down => AppAction::Down,
        KeyCode::Left => AppAction::Left,
        KeyCode::Right => AppAction::Right,
        KeyCode::Char(ch) => AppAction::Input(ch),
        _ => AppAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn q_quits_only_outside_text_input() {
        assert_eq!(map_key(key(KeyCode::Char('q')), false), AppAction::Quit);
        assert_eq!(map_key(key(KeyCode::Char('q')), true), AppAction::Input('q'));
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), true),
            AppAction::Quit
        );
    }
}
