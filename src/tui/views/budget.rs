//! Budget view: budget vs actual per expense account for the month

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Row, Table},
    Frame,
};

use crate::display::format::{format_bar, truncate};
use crate::models::BudgetStatus;
use crate::services::BudgetService;
use crate::tui::app::App;

use super::{header_row, render_error, scrolled, titled_block};

fn status_color(status: BudgetStatus) -> Color {
    match status {
        BudgetStatus::Green => Color::Green,
        BudgetStatus::Yellow => Color::Yellow,
        BudgetStatus::Red => Color::Red,
    }
}

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let report = match BudgetService::new(app.storage).report(app.month) {
        Ok(report) => report,
        Err(e) => return render_error(frame, area, "Budget", &e),
    };

    let mut rows: Vec<Row> = report
        .rows
        .iter()
        .map(|row| {
            let pct = row.percentage.unwrap_or(0.0);
            Row::new(vec![
                truncate(&row.account_name, 26),
                format!("{:>12}", row.budgeted),
                format!("{:>12}", row.actual),
                format!("{:>12}", row.remaining()),
                row.percentage.map(|p| format!("{:>5.0}%", p)).unwrap_or_else(|| "    -".into()),
                format_bar(pct.min(100.0), 100.0, 20),
            ])
            .style(Style::default().fg(status_color(row.status)))
        })
        .collect();

    if !report.rows.is_empty() {
        rows.push(
            Row::new(vec![
                "TOTAL".to_string(),
                format!("{:>12}", report.total_budgeted),
                format!("{:>12}", report.total_actual),
                format!("{:>12}", report.total_budgeted - report.total_actual),
                report
                    .total_percentage()
                    .map(|p| format!("{:>5.0}%", p))
                    .unwrap_or_default(),
                String::new(),
            ])
            .style(Style::default().add_modifier(Modifier::BOLD)),
        );
    }

    let title = if report.rows.is_empty() {
        format!("Budget - {} (no budget set; use 'libro budget set')", app.month)
    } else {
        format!("Budget - {}", app.month)
    };
    let widths = [
        Constraint::Min(20),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(6),
        Constraint::Length(20),
    ];
    let table = Table::new(scrolled(rows, app.scroll), widths)
        .header(header_row(&["Category", "Budgeted", "Actual", "Remaining", "Used", ""]))
        .block(titled_block(title))
        .column_spacing(2);
    frame.render_widget(table, area);
}
