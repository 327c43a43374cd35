//! Taxes view
//!
//! VAT position of the month on top, the obligations calendar below.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Row, Table},
    Frame,
};

use crate::models::TaxObligation;
use crate::services::{ObligationFilter, TaxService};
use crate::tui::app::App;
use crate::tui::layout::MainPanelLayout;

use super::{header_row, money_style, render_error, scrolled, titled_block};

fn obligation_row(obligation: &TaxObligation, app: &App) -> Row<'static> {
    let (state, style) = if obligation.is_paid() {
        let paid = obligation
            .paid_date
            .map(|d| format!("paid {}", d))
            .unwrap_or_else(|| "paid".to_string());
        (paid, Style::default().fg(Color::DarkGray))
    } else if obligation.is_overdue(app.today) {
        ("OVERDUE".to_string(), Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
    } else if obligation.is_upcoming(app.today, app.settings.upcoming_days) {
        ("due soon".to_string(), Style::default().fg(Color::Yellow))
    } else {
        ("pending".to_string(), Style::default())
    };
    Row::new(vec![
        obligation.tax_code.clone(),
        obligation.period.to_string(),
        obligation.due_date.format("%Y-%m-%d").to_string(),
        format!("{:>12}", obligation.amount),
        state,
    ])
    .style(style)
}

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let service = TaxService::new(app.storage);
    let position = match service.vat_position(app.month) {
        Ok(p) => p,
        Err(e) => return render_error(frame, area, "Taxes", &e),
    };
    let mut obligations = service.list(&ObligationFilter::default()).unwrap_or_default();
    obligations.sort_by_key(|o| o.due_date);

    let layout = MainPanelLayout::new(area, 4);
    let net = position.net();
    let header = Paragraph::new(vec![
        Line::from(format!(
            "Debit VAT (sales) {}    Credit VAT (purchases) {}",
            position.debit_vat, position.credit_vat
        )),
        Line::from(vec![
            Span::raw(if net.is_negative() { "Balance in favour  " } else { "VAT to pay  " }),
            Span::styled(format!("{}", net.abs()), money_style(-net).add_modifier(Modifier::BOLD)),
        ]),
    ])
    .block(titled_block(format!("Taxes - VAT {}", app.month)));
    frame.render_widget(header, layout.header);

    let rows: Vec<Row> = obligations.iter().map(|o| obligation_row(o, app)).collect();
    let widths = [
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(10),
        Constraint::Length(12),
        Constraint::Min(10),
    ];
    let table = Table::new(scrolled(rows, app.scroll), widths)
        .header(header_row(&["Tax", "Period", "Due", "Amount", "Status"]))
        .block(titled_block("Obligations"))
        .column_spacing(2);
    frame.render_widget(table, layout.content);
}
