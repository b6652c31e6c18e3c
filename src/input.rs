//! keyboard commands.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};


/// something the user asked the dashboard to do.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Command {
    Quit,
    /// shorten the refresh interval.
    Faster,
    /// lengthen the refresh interval.
    Slower,
    ToggleColor,
    /// scroll the task list by some number of rows. negative values scroll up.
    Scroll(isize),
    /// scroll back to the top of the task list.
    ScrollTop,
}

// === impl Command ===

impl Command {
    /// rows scrolled by the page up and page down keys.
    pub const PAGE: isize = 10;

    /// returns the command bound to a key, if any.
    pub fn from_key(key: KeyEvent) -> Option<Self> {
        let KeyEvent {
            code,
            modifiers,
            kind,
            ..
        } = key;

        if kind == KeyEventKind::Release {
            return None;
        }

        // raw mode swallows the interrupt signal, so ctrl-c is handled as a key.
        if modifiers.contains(KeyModifiers::CONTROL) {
            return matches!(code, KeyCode::Char('c' | 'C')).then_some(Self::Quit);
        }

        let command = match code {
            KeyCode::Char('q' | 'Q') => Self::Quit,
            KeyCode::Char('+' | '=') => Self::Faster,
            KeyCode::Char('-' | '_') => Self::Slower,
            KeyCode::Char('c' | 'C') => Self::ToggleColor,
            KeyCode::Up => Self::Scroll(-1),
            KeyCode::Down => Self::Scroll(1),
            KeyCode::PageUp => Self::Scroll(-Self::PAGE),
            KeyCode::PageDown => Self::Scroll(Self::PAGE),
            KeyCode::Home => Self::ScrollTop,
            _ => return None,
        };

        Some(command)
    }
}
