//! Journal view: the month's entries, one row per entry

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Style},
    widgets::{Row, Table},
    Frame,
};

use crate::display::format::truncate;
use crate::models::account::find_account;
use crate::models::{JournalEntry, Posting};
use crate::services::{JournalFilter, JournalService};
use crate::tui::app::App;

use super::{header_row, render_error, scrolled, titled_block};

fn accounts(parts: &[Posting]) -> String {
    let names: Vec<&str> = parts
        .iter()
        .map(|p| find_account(&p.account_id).map(|a| a.name).unwrap_or(p.account_id.as_str()))
        .collect();
    names.join(", ")
}

fn entry_row(entry: &JournalEntry) -> Row<'static> {
    let style = if entry.is_consistent() {
        Style::default()
    } else {
        Style::default().fg(Color::Red)
    };
    Row::new(vec![
        entry.date.format("%Y-%m-%d").to_string(),
        truncate(&entry.description, 30),
        truncate(&accounts(&entry.debit_postings()), 24),
        truncate(&accounts(&entry.credit_postings()), 24),
        format!("{:>12}", entry.amount),
    ])
    .style(style)
}

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let filter = JournalFilter {
        from: Some(app.month.first_day()),
        to: Some(app.month.last_day()),
        ..Default::default()
    };
    let entries = match JournalService::new(app.storage).list(&filter) {
        Ok(entries) => entries,
        Err(e) => return render_error(frame, area, "Journal", &e),
    };

    let title = format!("Journal - {} ({} entries)", app.month, entries.len());
    let rows: Vec<Row> = entries.iter().map(entry_row).collect();
    let widths = [
        Constraint::Length(10),
        Constraint::Min(20),
        Constraint::Length(24),
        Constraint::Length(24),
        Constraint::Length(12),
    ];
    let table = Table::new(scrolled(rows, app.scroll), widths)
        .header(header_row(&["Date", "Description", "Debit", "Credit", "Amount"]))
        .block(titled_block(title))
        .column_spacing(2);
    frame.render_widget(table, area);
}
