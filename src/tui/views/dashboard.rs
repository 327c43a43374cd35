//! Dashboard view
//!
//! Month result, liquidity, open balances and alerts, with a six-month
//! income/expense trend.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Paragraph},
    Frame,
};

use crate::models::Money;
use crate::services::{DashboardService, DashboardSummary, MonthTotals};
use crate::tui::app::App;

use super::{money_style, render_error, titled_block};

const TREND_MONTHS: usize = 6;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let service = DashboardService::new(app.storage);
    let summary = match service.summary(app.month, app.today, app.settings.upcoming_days) {
        Ok(summary) => summary,
        Err(e) => return render_error(frame, area, "Dashboard", &e),
    };
    let trend = service.trend(app.month, TREND_MONTHS).unwrap_or_default();

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let summary_widget = Paragraph::new(summary_lines(&summary))
        .block(titled_block(format!("Dashboard - {}", app.month)));
    frame.render_widget(summary_widget, chunks[0]);

    render_trend(frame, &trend, chunks[1]);
}

fn amount_line(label: &str, amount: Money, style: Style) -> Line<'static> {
    Line::from(vec![
        Span::raw(format!("{:<24}", label)),
        Span::styled(format!("{:>16}", amount), style),
    ])
}

fn summary_lines(summary: &DashboardSummary) -> Vec<Line<'static>> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = vec![
        amount_line("Income", summary.totals.income, Style::default().fg(Color::Green)),
        amount_line("Expenses", summary.totals.expense, Style::default().fg(Color::Red)),
        amount_line("Result", summary.totals.balance(), money_style(summary.totals.balance()).add_modifier(Modifier::BOLD)),
        Line::from(""),
        amount_line("Cash and bank", summary.liquid_balance, bold),
        amount_line("Pending income", summary.pending_income, Style::default()),
        amount_line("Pending expenses", summary.pending_expense, Style::default()),
        amount_line("Receivables", summary.receivables, Style::default()),
        amount_line("Payables", summary.payables, Style::default()),
        amount_line(
            &format!("Taxes due soon ({})", summary.upcoming_tax_count),
            summary.upcoming_taxes,
            Style::default(),
        ),
        Line::from(""),
    ];

    let warn = Style::default().fg(Color::Yellow);
    if summary.overdue_movements > 0 {
        lines.push(Line::styled(format!("! {} overdue partner movement(s)", summary.overdue_movements), warn));
    }
    if summary.overdue_tax_count > 0 {
        lines.push(Line::styled(format!("! {} overdue tax obligation(s)", summary.overdue_tax_count), warn));
    }
    if summary.low_stock_count > 0 {
        lines.push(Line::styled(format!("! {} product(s) low on stock", summary.low_stock_count), warn));
    }
    lines.push(Line::styled(
        format!("{} journal entries", summary.entry_count),
        Style::default().fg(Color::DarkGray),
    ));
    lines
}

fn render_trend(frame: &mut Frame, trend: &[MonthTotals], area: Rect) {
    let groups: Vec<BarGroup> = trend
        .iter()
        .map(|t| {
            let label = format!("{:02}/{}", t.month.month(), t.month.year() % 100);
            BarGroup::default().label(Line::from(label)).bars(&[
                Bar::default()
                    .value(t.income.cents().max(0) as u64 / 100)
                    .style(Style::default().fg(Color::Green))
                    .text_value(String::new()),
                Bar::default()
                    .value(t.expense.cents().max(0) as u64 / 100)
                    .style(Style::default().fg(Color::Red))
                    .text_value(String::new()),
            ])
        })
        .collect();

    let mut chart = BarChart::default()
        .block(titled_block("Income / Expenses"))
        .bar_width(3)
        .bar_gap(0)
        .group_gap(2);
    for group in groups {
        chart = chart.data(group);
    }
    frame.render_widget(chart, area);
}
