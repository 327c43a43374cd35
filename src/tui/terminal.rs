//! Terminal setup and teardown
//!
//! This module handles initializing and restoring the terminal state,
//! including setting up the panic hook to restore the terminal on crash.

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::panic;

use crate::config::paths::LibroPaths;
use crate::config::settings::Settings;
use crate::storage::Storage;

use super::app::App;
use super::event::EventHandler;
use super::handler::handle_event;

/// Type alias for our terminal
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode
pub fn init_terminal() -> Result<Tui> {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Restore terminal before printing panic info
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

/// Restore the terminal to its original state
pub fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Run the TUI application
pub fn run_tui(storage: &Storage, settings: &Settings, paths: &LibroPaths) -> Result<()> {
    let mut terminal = init_terminal()?;
    let today = chrono::Local::now().date_naive();
    let mut app = App::new(storage, settings, paths, today);
    let events = EventHandler::default();

    let result = (|| -> Result<()> {
        while !app.should_quit {
            terminal.draw(|frame| super::views::render(frame, &app))?;
            match events.next() {
                Ok(event) => handle_event(&mut app, event),
                // The reader thread is gone; nothing more will arrive
                Err(_) => break,
            }
        }
        Ok(())
    })();

    restore_terminal()?;
    result
}
