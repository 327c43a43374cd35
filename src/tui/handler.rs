//! Event handler for the TUI
//!
//! Turns events into actions and applies them to the application state.

use super::app::App;
use super::event::Event;
use super::keybindings::{action_for, Action};

const PAGE: usize = 10;

/// Handle an incoming event
pub fn handle_event(app: &mut App, event: Event) {
    match event {
        Event::Key(key) => {
            if let Some(action) = action_for(key) {
                apply(app, action);
            }
        }
        Event::Resize(_, _) | Event::Tick => {}
    }
}

/// Apply one action to the state
pub fn apply(app: &mut App, action: Action) {
    // Any key dismisses the previous message
    app.clear_status();

    if app.show_help {
        match action {
            Action::Quit => app.quit(),
            _ => app.show_help = false,
        }
        return;
    }

    match action {
        Action::Quit | Action::Back => app.quit(),
        Action::NextTab => app.switch_tab(app.active_tab.next()),
        Action::PrevTab => app.switch_tab(app.active_tab.prev()),
        Action::GoTo(tab) => app.switch_tab(tab),
        Action::ScrollUp => app.scroll_up(1),
        Action::ScrollDown => app.scroll_down(1),
        Action::PageUp => app.scroll_up(PAGE),
        Action::PageDown => app.scroll_down(PAGE),
        Action::Top => app.scroll = 0,
        Action::PrevMonth => app.prev_month(),
        Action::NextMonth => app.next_month(),
        Action::CurrentMonth => app.current_month(),
        Action::NextReport => {
            app.report = app.report.next();
            app.scroll = 0;
            app.set_status(app.report.title());
        }
        Action::ToggleHelp => app.show_help = true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LibroPaths;
    use crate::config::settings::Settings;
    use crate::models::YearMonth;
    use crate::storage::Storage;
    use crate::tui::app::{ReportKind, Tab};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, LibroPaths, Storage, Settings) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LibroPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths.clone()).unwrap();
        (temp_dir, paths, storage, Settings::default())
    }

    #[test]
    fn test_tab_and_month_navigation() {
        let (_dir, paths, storage, settings) = fixture();
        let today = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let mut app = App::new(&storage, &settings, &paths, today);

        apply(&mut app, Action::PrevTab);
        assert_eq!(app.active_tab, Tab::Settings);
        apply(&mut app, Action::GoTo(Tab::Budget));
        assert_eq!(app.active_tab, Tab::Budget);

        apply(&mut app, Action::PrevMonth);
        assert_eq!(app.month, YearMonth::new(2024, 12).unwrap());
        apply(&mut app, Action::CurrentMonth);
        assert_eq!(app.month, YearMonth::new(2025, 1).unwrap());
    }

    #[test]
    fn test_scroll_resets_on_tab_switch() {
        let (_dir, paths, storage, settings) = fixture();
        let mut app = App::new(&storage, &settings, &paths, NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());

        apply(&mut app, Action::PageDown);
        apply(&mut app, Action::ScrollUp);
        assert_eq!(app.scroll, 9);
        apply(&mut app, Action::NextTab);
        assert_eq!(app.scroll, 0);
        apply(&mut app, Action::ScrollUp);
        assert_eq!(app.scroll, 0);
    }

    #[test]
    fn test_help_swallows_next_key() {
        let (_dir, paths, storage, settings) = fixture();
        let mut app = App::new(&storage, &settings, &paths, NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());

        apply(&mut app, Action::ToggleHelp);
        assert!(app.show_help);
        apply(&mut app, Action::Back);
        assert!(!app.show_help);
        assert!(!app.should_quit);

        apply(&mut app, Action::NextReport);
        assert_eq!(app.report, ReportKind::BalanceSheet);
        apply(&mut app, Action::Back);
        assert!(app.should_quit);
    }
}
