//! Reports view
//!
//! The selected statement for the month, rendered as the same text the
//! `libro report` commands print. `r` cycles through the statements.

use ratatui::{layout::Rect, text::Line, Frame};

use crate::error::LibroResult;
use crate::reports::{BalanceSheetReport, BudgetOverviewReport, IncomeStatementReport, TrialBalanceReport};
use crate::tui::app::{App, ReportKind};

use super::{render_error, render_text};

fn report_text(app: &App) -> LibroResult<String> {
    let month_end = app.month.last_day();
    Ok(match app.report {
        ReportKind::IncomeStatement => {
            IncomeStatementReport::generate(app.storage, app.month.first_day(), month_end)?.format_terminal()
        }
        ReportKind::BalanceSheet => BalanceSheetReport::generate(app.storage, month_end)?.format_terminal(),
        ReportKind::TrialBalance => TrialBalanceReport::generate(app.storage, Some(month_end))?.format_terminal(),
        ReportKind::BudgetOverview => BudgetOverviewReport::generate(app.storage, app.month)?.format_terminal(),
    })
}

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!("Reports - {} - {} (r: next report)", app.report.title(), app.month);
    match report_text(app) {
        Ok(text) => {
            let lines: Vec<Line<'static>> = text.lines().map(|l| Line::from(l.to_string())).collect();
            render_text(frame, area, title, lines, app.scroll);
        }
        Err(e) => render_error(frame, area, "Reports", &e),
    }
}
