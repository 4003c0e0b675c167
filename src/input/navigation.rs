//! Keyboard vocabulary for the picker list.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Navigation action a key press maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    /// Previous visible row
    Up,
    /// Next visible row
    Down,
    /// Collapse the current folder, or move to its parent
    Left,
    /// Expand the current folder, or move to its first child
    Right,
    /// First row
    Home,
    /// Last row
    End,
    PageUp,
    PageDown,
    /// Select the current row, confirming leaves
    Enter,
}

impl NavAction {
    /// Map a key event to an action
    ///
    /// Only unmodified keys (Shift allowed) are navigation keys. Everything
    /// else, Esc included, is left to the host.
    pub fn from_key(event: &KeyEvent) -> Option<Self> {
        if !(event.modifiers - KeyModifiers::SHIFT).is_empty() {
            return None;
        }

        match event.code {
            KeyCode::Up => Some(NavAction::Up),
            KeyCode::Down => Some(NavAction::Down),
            KeyCode::Left => Some(NavAction::Left),
            KeyCode::Right => Some(NavAction::Right),
            KeyCode::Home => Some(NavAction::Home),
            KeyCode::End => Some(NavAction::End),
            KeyCode::PageUp => Some(NavAction::PageUp),
            KeyCode::PageDown => Some(NavAction::PageDown),
            KeyCode::Enter => Some(NavAction::Enter),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_arrow_keys() {
        assert_eq!(NavAction::from_key(&key(KeyCode::Up)), Some(NavAction::Up));
        assert_eq!(NavAction::from_key(&key(KeyCode::Down)), Some(NavAction::Down));
        assert_eq!(NavAction::from_key(&key(KeyCode::Left)), Some(NavAction::Left));
        assert_eq!(NavAction::from_key(&key(KeyCode::Right)), Some(NavAction::Right));
    }

    #[test]
    fn test_page_and_jump_keys() {
        assert_eq!(NavAction::from_key(&key(KeyCode::Home)), Some(NavAction::Home));
        assert_eq!(NavAction::from_key(&key(KeyCode::End)), Some(NavAction::End));
        assert_eq!(NavAction::from_key(&key(KeyCode::PageUp)), Some(NavAction::PageUp));
        assert_eq!(
            NavAction::from_key(&key(KeyCode::PageDown)),
            Some(NavAction::PageDown)
        );
        assert_eq!(NavAction::from_key(&key(KeyCode::Enter)), Some(NavAction::Enter));
    }

    #[test]
    fn test_unhandled_keys() {
        assert_eq!(NavAction::from_key(&key(KeyCode::Esc)), None);
        assert_eq!(NavAction::from_key(&key(KeyCode::Char('a'))), None);
        assert_eq!(
            NavAction::from_key(&KeyEvent::new(KeyCode::Up, KeyModifiers::CONTROL)),
            None
        );
        assert_eq!(
            NavAction::from_key(&KeyEvent::new(KeyCode::Down, KeyModifiers::SHIFT)),
            Some(NavAction::Down)
        );
    }
}
