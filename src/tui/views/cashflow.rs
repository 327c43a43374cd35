//! Cash-flow view
//!
//! Pending items ahead of today with the projected liquid balance after
//! each one. Items still pending but already past their date are listed
//! first.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Row, Table},
    Frame,
};

use crate::display::format::truncate;
use crate::models::{CashFlowItem, FlowKind, Money};
use crate::services::CashFlowService;
use crate::tui::app::App;
use crate::tui::layout::MainPanelLayout;

use super::{header_row, money_style, render_error, scrolled, titled_block};

fn item_cells(item: &CashFlowItem) -> Vec<String> {
    let sign = match item.kind {
        FlowKind::Income => "+",
        FlowKind::Expense => "-",
    };
    vec![
        item.date.format("%Y-%m-%d").to_string(),
        truncate(&item.description, 32),
        truncate(&item.category, 14),
        format!("{}{:>11}", sign, item.amount),
    ]
}

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let service = CashFlowService::new(app.storage);
    let projection = match service.projection(app.today) {
        Ok(p) => p,
        Err(e) => return render_error(frame, area, "Cash Flow", &e),
    };
    let overdue = service.overdue(app.today).unwrap_or_default();

    let layout = MainPanelLayout::new(area, 4);
    let header = Paragraph::new(vec![
        Line::from(vec![
            Span::raw("Liquid balance today  "),
            Span::styled(format!("{}", projection.start_balance), money_style(projection.start_balance)),
            Span::raw("    Projected  "),
            Span::styled(
                format!("{}", projection.final_balance),
                money_style(projection.final_balance).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(format!(
            "Pending income {}    Pending expenses {}",
            projection.pending_income, projection.pending_expense
        )),
    ])
    .block(titled_block(format!("Cash Flow - from {}", projection.today)));
    frame.render_widget(header, layout.header);

    let mut rows: Vec<Row> = overdue
        .iter()
        .map(|item| {
            let mut cells = item_cells(item);
            cells.push("overdue".to_string());
            Row::new(cells).style(Style::default().fg(Color::Yellow))
        })
        .collect();
    rows.extend(projection.points.iter().map(|point| {
        let mut cells = item_cells(&point.item);
        cells.push(format!("{:>12}", point.balance));
        let style = if point.balance < Money::zero() {
            Style::default().fg(Color::Red)
        } else {
            Style::default()
        };
        Row::new(cells).style(style)
    }));

    let widths = [
        Constraint::Length(10),
        Constraint::Min(20),
        Constraint::Length(14),
        Constraint::Length(13),
        Constraint::Length(13),
    ];
    let table = Table::new(scrolled(rows, app.scroll), widths)
        .header(header_row(&["Date", "Description", "Category", "Amount", "Balance"]))
        .block(titled_block("Pending items"))
        .column_spacing(2);
    frame.render_widget(table, layout.content);
}
