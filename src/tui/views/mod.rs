//! TUI Views module
//!
//! One view per tab, plus the tab bar, the status bar and the help overlay.

pub mod budget;
pub mod cashflow;
pub mod dashboard;
pub mod education;
pub mod help;
pub mod inventory;
pub mod journal;
pub mod partners;
pub mod reports;
pub mod settings;
pub mod status_bar;
pub mod taxes;

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Row, Tabs, Wrap},
    Frame,
};

use crate::error::LibroError;
use crate::models::Money;

use super::app::{App, Tab};
use super::layout::AppLayout;

/// Render the entire application
pub fn render(frame: &mut Frame, app: &App) {
    let layout = AppLayout::new(frame.area());

    render_tabs(frame, app, layout.tabs);

    match app.active_tab {
        Tab::Dashboard => dashboard::render(frame, app, layout.main),
        Tab::Journal => journal::render(frame, app, layout.main),
        Tab::CashFlow => cashflow::render(frame, app, layout.main),
        Tab::Budget => budget::render(frame, app, layout.main),
        Tab::Partners => partners::render(frame, app, layout.main),
        Tab::Taxes => taxes::render(frame, app, layout.main),
        Tab::Inventory => inventory::render(frame, app, layout.main),
        Tab::Reports => reports::render(frame, app, layout.main),
        Tab::Education => education::render(frame, app, layout.main),
        Tab::Settings => settings::render(frame, app, layout.main),
    }

    status_bar::render(frame, app, layout.status_bar);

    if app.show_help {
        help::render(frame);
    }
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<String> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| format!("{} {}", (i + 1) % 10, tab.title()))
        .collect();

    let name = if app.settings.business_name.is_empty() {
        "Libro"
    } else {
        app.settings.business_name.as_str()
    };

    let tabs = Tabs::new(titles)
        .select(app.active_tab.index())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", name))
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        )
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .divider("│");

    frame.render_widget(tabs, area);
}

/// Bordered block with a bold title
pub(crate) fn titled_block(title: impl Into<String>) -> Block<'static> {
    Block::default()
        .title(format!(" {} ", title.into()))
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
}

/// Bold yellow header row
pub(crate) fn header_row(cells: &[&'static str]) -> Row<'static> {
    Row::new(cells.to_vec())
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .height(1)
}

/// Red for negative amounts, green for positive
pub(crate) fn money_style(amount: Money) -> Style {
    if amount.is_negative() {
        Style::default().fg(Color::Red)
    } else if amount.is_positive() {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    }
}

/// Lines of a paragraph, skipping the scrolled-away ones
pub(crate) fn render_text(frame: &mut Frame, area: Rect, title: impl Into<String>, lines: Vec<Line<'static>>, scroll: usize) {
    let paragraph = Paragraph::new(lines)
        .block(titled_block(title))
        .scroll((scroll.min(u16::MAX as usize) as u16, 0));
    frame.render_widget(paragraph, area);
}

/// Shown in place of a view whose data could not be read
pub(crate) fn render_error(frame: &mut Frame, area: Rect, title: &str, error: &LibroError) {
    let paragraph = Paragraph::new(format!("Could not load data: {}", error))
        .style(Style::default().fg(Color::Red))
        .block(titled_block(title))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

/// Drop the first `scroll` rows, keeping at least the last one
pub(crate) fn scrolled<T>(rows: Vec<T>, scroll: usize) -> impl Iterator<Item = T> {
    let skip = scroll.min(rows.len().saturating_sub(1));
    rows.into_iter().skip(skip)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LibroPaths;
    use crate::config::settings::Settings;
    use crate::models::Money;
    use crate::services::JournalService;
    use crate::storage::{initialize_storage, Storage};
    use chrono::NaiveDate;
    use ratatui::{backend::TestBackend, Terminal};
    use tempfile::TempDir;

    #[test]
    fn test_scrolled_keeps_last_row() {
        assert_eq!(scrolled(vec![1, 2, 3], 1).collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(scrolled(vec![1, 2, 3], 10).collect::<Vec<_>>(), vec![3]);
        assert!(scrolled(Vec::<i32>::new(), 2).next().is_none());
    }

    #[test]
    fn test_every_tab_renders() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LibroPaths::with_base_dir(temp_dir.path().to_path_buf());
        initialize_storage(&paths).unwrap();
        let storage = Storage::open(paths.clone()).unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 3, 20).unwrap();
        JournalService::new(&storage)
            .add_simple(today, "Opening capital", Money::from_units(1000), "acc_bank", "acc_capital")
            .unwrap();
        let settings = Settings::default();
        let mut app = App::new(&storage, &settings, &paths, today);

        let mut terminal = Terminal::new(TestBackend::new(160, 40)).unwrap();
        for tab in Tab::ALL {
            app.switch_tab(tab);
            terminal.draw(|frame| render(frame, &app)).unwrap();
            let buffer = terminal.backend().buffer().clone();
            let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
            assert!(text.contains(tab.title()), "{} tab missing its title", tab.title());
        }

        app.show_help = true;
        terminal.draw(|frame| render(frame, &app)).unwrap();
    }
}
