//! Education view: how double-entry works, illustrated with this chart

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    Frame,
};

use crate::models::account::chart_of_accounts;
use crate::models::{AccountType, NormalSide};
use crate::tui::app::App;

use super::render_text;

const BASICS: &[&str] = &[
    "Every operation is recorded as a journal entry with at least one debit",
    "and one credit. The debits and the credits of an entry always add up to",
    "the same amount, so the books as a whole stay balanced:",
    "",
    "    Assets = Liabilities + Equity + (Income - Expenses)",
    "",
    "Whether a debit increases or decreases an account depends on its type:",
];

const EXAMPLES: &[(&str, &str, &str)] = &[
    ("Sale collected in cash", "Caja", "Ventas"),
    ("Rent paid from the bank", "Alquileres", "Banco"),
    ("Supplier invoice received", "Mercaderías", "Proveedores"),
    ("Customer pays an invoice", "Banco", "Deudores por ventas"),
    ("Owner contributes capital", "Banco", "Capital"),
];

fn heading(text: &str) -> Line<'static> {
    Line::styled(
        text.to_string(),
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    )
}

fn lines() -> Vec<Line<'static>> {
    let mut lines = vec![heading("Double-entry bookkeeping"), Line::from("")];
    lines.extend(BASICS.iter().map(|l| Line::from(*l)));
    lines.push(Line::from(""));

    for account_type in AccountType::all() {
        let (up, down) = match account_type.normal_side() {
            NormalSide::Debit => ("debit", "credit"),
            NormalSide::Credit => ("credit", "debit"),
        };
        let examples: Vec<&str> = chart_of_accounts()
            .iter()
            .filter(|a| a.account_type == account_type)
            .take(3)
            .map(|a| a.name)
            .collect();
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<11}", account_type.to_string()), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!("grows with a {}, shrinks with a {}", up, down)),
            Span::styled(format!("   e.g. {}", examples.join(", ")), Style::default().fg(Color::DarkGray)),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(heading("Common entries"));
    lines.push(Line::from(""));
    lines.push(Line::styled(
        format!("  {:<30} {:<22} {}", "Operation", "Debit", "Credit"),
        Style::default().fg(Color::Cyan),
    ));
    for (operation, debit, credit) in EXAMPLES {
        lines.push(Line::from(format!("  {:<30} {:<22} {}", operation, debit, credit)));
    }

    lines.push(Line::from(""));
    lines.push(heading("Cash flow is not profit"));
    lines.push(Line::from(""));
    lines.push(Line::from(
        "  An invoice issued today is income this month even if it is collected",
    ));
    lines.push(Line::from(
        "  next month. The Cash Flow tab tracks the money; the income statement",
    ));
    lines.push(Line::from("  tracks the result."));
    lines
}

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    render_text(frame, area, "Education", lines(), app.scroll);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::account::resolve_account;

    #[test]
    fn test_examples_use_chart_names() {
        for (_, debit, credit) in EXAMPLES {
            assert!(resolve_account(debit).is_some(), "{} not in chart", debit);
            assert!(resolve_account(credit).is_some(), "{} not in chart", credit);
        }
        assert!(lines().len() > BASICS.len());
    }
}
