//! Help overlay listing every key binding

use ratatui::{
    layout::Constraint,
    style::{Color, Modifier, Style},
    widgets::{Cell, Clear, Row, Table},
    Frame,
};

use crate::tui::keybindings::KEYBINDINGS;
use crate::tui::layout::centered_rect;

use super::titled_block;

pub fn render(frame: &mut Frame) {
    let area = centered_rect(60, 70, frame.area());
    frame.render_widget(Clear, area);

    let rows = KEYBINDINGS.iter().map(|binding| {
        Row::new(vec![
            Cell::from(binding.keys).style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Cell::from(binding.description),
        ])
    });

    let table = Table::new(rows, [Constraint::Length(14), Constraint::Min(20)])
        .block(titled_block("Help (any key to close)"));
    frame.render_widget(table, area);
}
