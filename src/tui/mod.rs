//! Terminal User Interface module
//!
//! A tabbed, read-only view over the books built with ratatui. Tabs are
//! switched from the keyboard; every view reads the services on each draw.

pub mod app;
pub mod event;
pub mod handler;
pub mod keybindings;
pub mod layout;
pub mod terminal;
pub mod views;

pub use app::{App, Tab};
pub use terminal::run_tui;
