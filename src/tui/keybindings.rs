//! Keybinding definitions
//!
//! Maps key presses to actions and lists them for the help overlay.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::Tab;

/// Something the user asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextTab,
    PrevTab,
    GoTo(Tab),
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    Top,
    PrevMonth,
    NextMonth,
    CurrentMonth,
    NextReport,
    ToggleHelp,
    /// Esc: close the help overlay, or quit when nothing is open
    Back,
}

/// A keybinding as shown in the help overlay
#[derive(Debug, Clone)]
pub struct Keybinding {
    pub keys: &'static str,
    pub description: &'static str,
}

/// All keybindings
pub static KEYBINDINGS: &[Keybinding] = &[
    Keybinding { keys: "←/→, Tab", description: "Previous / next tab" },
    Keybinding { keys: "1-9, 0", description: "Jump to a tab" },
    Keybinding { keys: "↑/↓, j/k", description: "Scroll" },
    Keybinding { keys: "PgUp/PgDn", description: "Scroll a page" },
    Keybinding { keys: "g", description: "Back to the top" },
    Keybinding { keys: "[ / ]", description: "Previous / next month" },
    Keybinding { keys: "t", description: "Current month" },
    Keybinding { keys: "r", description: "Next report (Reports tab)" },
    Keybinding { keys: "?", description: "Show / hide help" },
    Keybinding { keys: "q, Esc", description: "Quit" },
];

/// Action bound to a key press, if any
pub fn action_for(key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(Action::Quit),
        KeyCode::Esc => Some(Action::Back),
        KeyCode::Right | KeyCode::Tab | KeyCode::Char('l') => Some(Action::NextTab),
        KeyCode::Left | KeyCode::BackTab | KeyCode::Char('h') => Some(Action::PrevTab),
        KeyCode::Char(c) if c.is_ascii_digit() => c.to_digit(10).and_then(Tab::from_digit).map(Action::GoTo),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::ScrollUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::ScrollDown),
        KeyCode::PageUp => Some(Action::PageUp),
        KeyCode::PageDown => Some(Action::PageDown),
        KeyCode::Home | KeyCode::Char('g') => Some(Action::Top),
        KeyCode::Char('[') => Some(Action::PrevMonth),
        KeyCode::Char(']') => Some(Action::NextMonth),
        KeyCode::Char('t') => Some(Action::CurrentMonth),
        KeyCode::Char('r') => Some(Action::NextReport),
        KeyCode::Char('?') => Some(Action::ToggleHelp),
        _ => None,
    }
}
