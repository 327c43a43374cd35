//! Dashboard display formatting

use crate::services::{DashboardSummary, MonthTotals};

use super::format::{format_bar, format_money_colored};

pub fn format_dashboard(summary: &DashboardSummary, business_name: &str) -> String {
    let mut output = String::new();
    let title = if business_name.is_empty() { "Libro" } else { business_name };
    output.push_str(&format!("{} - {}\n", title, summary.totals.month));
    output.push_str(&"=".repeat(48));
    output.push('\n');

    output.push_str(&format!("{:<26}{:>22}\n", "Income", summary.totals.income));
    output.push_str(&format!("{:<26}{:>22}\n", "Expenses", summary.totals.expense));
    output.push_str(&format!(
        "{:<26}{:>22}\n",
        "Result",
        format_money_colored(summary.totals.balance())
    ));
    output.push('\n');
    output.push_str(&format!("{:<26}{:>22}\n", "Cash and bank", summary.liquid_balance));
    output.push_str(&format!("{:<26}{:>22}\n", "Pending income", summary.pending_income));
    output.push_str(&format!("{:<26}{:>22}\n", "Pending expenses", summary.pending_expense));
    output.push_str(&format!("{:<26}{:>22}\n", "Receivables", summary.receivables));
    output.push_str(&format!("{:<26}{:>22}\n", "Payables", summary.payables));
    output.push_str(&format!(
        "{:<26}{:>22}\n",
        format!("Taxes due soon ({})", summary.upcoming_tax_count),
        summary.upcoming_taxes
    ));

    let mut alerts = Vec::new();
    if summary.overdue_movements > 0 {
        alerts.push(format!("{} overdue partner movement(s)", summary.overdue_movements));
    }
    if summary.overdue_tax_count > 0 {
        alerts.push(format!("{} overdue tax obligation(s)", summary.overdue_tax_count));
    }
    if summary.low_stock_count > 0 {
        alerts.push(format!("{} product(s) at or below minimum stock", summary.low_stock_count));
    }
    if !alerts.is_empty() {
        output.push('\n');
        for alert in alerts {
            output.push_str(&format!("! {}\n", alert));
        }
    }
    output.push_str(&format!("\n{} journal entries\n", summary.entry_count));
    output
}

/// Income and expense bars per month
pub fn format_trend(trend: &[MonthTotals]) -> String {
    let max = trend
        .iter()
        .map(|t| t.income.max(t.expense).as_decimal())
        .fold(0.0, f64::max);
    let mut output = String::new();
    for totals in trend {
        output.push_str(&format!(
            "{}  in  {} {:>12}\n         out {} {:>12}\n",
            totals.month,
            format_bar(totals.income.as_decimal(), max, 20),
            totals.income,
            format_bar(totals.expense.as_decimal(), max, 20),
            totals.expense
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, YearMonth};

    fn totals(month: u32, income: i64, expense: i64) -> MonthTotals {
        MonthTotals {
            month: YearMonth::new(2025, month).unwrap(),
            income: Money::from_units(income),
            expense: Money::from_units(expense),
        }
    }

    #[test]
    fn test_dashboard_alerts() {
        let summary = DashboardSummary {
            totals: totals(4, 1000, 400),
            liquid_balance: Money::from_units(2500),
            pending_income: Money::zero(),
            pending_expense: Money::zero(),
            receivables: Money::zero(),
            payables: Money::zero(),
            overdue_movements: 0,
            upcoming_taxes: Money::zero(),
            upcoming_tax_count: 0,
            overdue_tax_count: 1,
            low_stock_count: 0,
            entry_count: 3,
        };
        let text = format_dashboard(&summary, "Café Sur");
        assert!(text.starts_with("Café Sur - 2025-04"));
        assert!(text.contains("1 overdue tax obligation(s)"));
        assert!(!text.contains("partner movement"));
    }

    #[test]
    fn test_trend_scales_to_largest() {
        let text = format_trend(&[totals(1, 100, 50), totals(2, 200, 0)]);
        assert_eq!(text.lines().count(), 4);
        assert!(text.contains(&"█".repeat(20)));
    }
}
