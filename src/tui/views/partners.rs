//! Partners view: current-account position of every client and supplier

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Style},
    widgets::{Row, Table},
    Frame,
};

use crate::display::format::{blank_if_zero, truncate};
use crate::services::PartnerService;
use crate::tui::app::App;

use super::{header_row, render_error, scrolled, titled_block};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let overview = match PartnerService::new(app.storage).summaries(app.today) {
        Ok(overview) => overview,
        Err(e) => return render_error(frame, area, "Partners", &e),
    };

    let rows: Vec<Row> = overview
        .partners
        .iter()
        .map(|summary| {
            let style = if summary.overdue_count > 0 || summary.over_limit {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            let flags = match (summary.over_limit, summary.overdue_count) {
                (true, 0) => "over limit".to_string(),
                (true, n) => format!("over limit, {} overdue", n),
                (false, 0) => String::new(),
                (false, n) => format!("{} overdue", n),
            };
            Row::new(vec![
                truncate(&summary.partner.name, 28),
                summary.partner.kind.to_string(),
                format!("{:>12}", summary.balance),
                format!("{:>12}", blank_if_zero(summary.overdue)),
                flags,
            ])
            .style(style)
        })
        .collect();

    let title = format!(
        "Partners - receivable {}, payable {}",
        overview.receivables, overview.payables
    );
    let widths = [
        Constraint::Min(20),
        Constraint::Length(9),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(24),
    ];
    let table = Table::new(scrolled(rows, app.scroll), widths)
        .header(header_row(&["Name", "Kind", "Balance", "Overdue", ""]))
        .block(titled_block(title))
        .column_spacing(2);
    frame.render_widget(table, area);
}
