use crate::autocomplete::Session;

/// Host-neutral key press
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Enter,
    Tab,
    Escape,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Backspace,
    Delete,
    Char(char),
}

/// What a key means while a session is open
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyCommand {
    Commit,
    SelectNext,
    SelectPrevious,
    Cancel,
}

/// Whether the autocomplete consumed an input
///
/// `NotHandled` tells the host to apply its default editing behaviour.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HandleValue {
    Handled,
    NotHandled,
}

/// Map a key to an autocomplete command, `None` while no session is open
pub fn key_binding(key: Key, session: &Session) -> Option<KeyCommand> {
    if !session.is_open() {
        return None;
    }
    match key {
        Key::Enter | Key::Tab => Some(KeyCommand::Commit),
        Key::ArrowDown => Some(KeyCommand::SelectNext),
        Key::ArrowUp => Some(KeyCommand::SelectPrevious),
        Key::Escape => Some(KeyCommand::Cancel),
        _ => None,
    }
}
