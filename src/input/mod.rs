use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::core::Command;

/// `multiline` is set while the text area has focus, where Enter inserts a line break.
pub fn map_key_event(key: KeyEvent, multiline: bool) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let mods = key.modifiers;
    match (key.code, mods) {
        (KeyCode::Char('q'), KeyModifiers::CONTROL)
        | (KeyCode::Char('Q'), KeyModifiers::CONTROL)
        | (KeyCode::Char('c'), KeyModifiers::CONTROL)
        | (KeyCode::Char('C'), KeyModifiers::CONTROL) => Some(Command::Quit),
        (KeyCode::Char('r'), KeyModifiers::CONTROL)
        | (KeyCode::Char('R'), KeyModifiers::CONTROL) => Some(Command::Run),
        (KeyCode::F(2), KeyModifiers::NONE) => Some(Command::Run),
        (KeyCode::Char('l'), KeyModifiers::CONTROL)
        | (KeyCode::Char('L'), KeyModifiers::CONTROL) => Some(Command::Refresh),
        (KeyCode::F(5), KeyModifiers::NONE) => Some(Command::Refresh),
        (KeyCode::Tab, _) => Some(Command::FocusNext),
        (KeyCode::BackTab, _) => Some(Command::FocusPrev),
        (KeyCode::Esc, _) => Some(Command::Dismiss),
        (KeyCode::Enter, _) if multiline => Some(Command::NewLine),
        (KeyCode::Enter, _) => Some(Command::Confirm),
        (KeyCode::Left, _) => Some(Command::Left),
        (KeyCode::Right, _) => Some(Command::Right),
        (KeyCode::Up, _) => Some(Command::Up),
        (KeyCode::Down, _) => Some(Command::Down),
        (KeyCode::Backspace, _) => Some(Command::Backspace),
        (KeyCode::Char(c), KeyModifiers::NONE) => Some(Command::Insert(c)),
        (KeyCode::Char(c), KeyModifiers::SHIFT) => Some(Command::Insert(c)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

    use super::map_key_event;
    use crate::core::Command;

    fn press(code: KeyCode, mods: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, mods)
    }

    #[test]
    fn enter_depends_on_focus() {
        let enter = press(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(map_key_event(enter, true), Some(Command::NewLine));
        assert_eq!(map_key_event(enter, false), Some(Command::Confirm));
    }

    #[test]
    fn control_keys_win_over_text() {
        assert_eq!(
            map_key_event(press(KeyCode::Char('c'), KeyModifiers::CONTROL), true),
            Some(Command::Quit)
        );
        assert_eq!(
            map_key_event(press(KeyCode::Char('r'), KeyModifiers::CONTROL), false),
            Some(Command::Run)
        );
        assert_eq!(
            map_key_event(press(KeyCode::Char('R'), KeyModifiers::SHIFT), false),
            Some(Command::Insert('R'))
        );
    }

    #[test]
    fn releases_are_ignored() {
        let mut key = press(KeyCode::Char('a'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        assert_eq!(map_key_event(key, true), None);
    }
}
