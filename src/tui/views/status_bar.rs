//! Status bar view
//!
//! Shows the selected month, today's date, the last status message and key
//! hints.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::app::App;

const HINTS: &str = " q:Quit  ?:Help  ←/→:Tabs  [ ]:Month ";

/// Render the status bar
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(" Month: ", Style::default().fg(Color::White)),
        Span::styled(
            app.month.to_string(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" │ "),
        Span::styled(format!("Today: {}", app.today), Style::default().fg(Color::White)),
    ];

    if let Some(ref message) = app.status_message {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(message.clone(), Style::default().fg(Color::Yellow)));
    }

    let left_len: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let padding_len = (area.width as usize)
        .saturating_sub(left_len)
        .saturating_sub(HINTS.chars().count());
    spans.push(Span::raw(" ".repeat(padding_len.max(1))));
    spans.push(Span::styled(HINTS, Style::default().fg(Color::White)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
