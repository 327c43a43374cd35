//! Cash-flow display formatting

use crate::models::{CashFlowItem, FlowKind};
use crate::services::Projection;

use super::format::truncate;

pub fn format_cash_flow_list(items: &[CashFlowItem]) -> String {
    if items.is_empty() {
        return "No cash-flow items found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<10}  {:<10}  {:<8}  {:<9}  {:<28}  {:<14}  {:>12}\n",
        "Date", "ID", "Kind", "Status", "Description", "Category", "Amount"
    ));
    output.push_str(&"-".repeat(104));
    output.push('\n');

    for item in items {
        let recurring = if item.is_recurring { " ↻" } else { "" };
        output.push_str(&format!(
            "{:<10}  {:<10}  {:<8}  {:<9}  {:<28}  {:<14}  {:>12}{}\n",
            item.date,
            item.id,
            item.kind,
            item.status,
            truncate(&item.description, 28),
            truncate(&item.category, 14),
            item.amount,
            recurring
        ));
    }
    output
}

/// Running projection of the liquid balance
pub fn format_projection(projection: &Projection) -> String {
    let mut output = String::new();
    output.push_str(&format!("Cash projection from {}\n", projection.today));
    output.push_str(&"=".repeat(72));
    output.push('\n');
    output.push_str(&format!("{:<48} {:>10} {:>12}\n", "Starting liquid balance", "", projection.start_balance));

    if projection.points.is_empty() {
        output.push_str("No pending items ahead.\n");
    }

    for point in &projection.points {
        let sign = match point.item.kind {
            FlowKind::Income => '+',
            FlowKind::Expense => '-',
        };
        output.push_str(&format!(
            "{:<10}  {:<36} {}{:>9} {:>12}\n",
            point.item.date,
            truncate(&point.item.description, 36),
            sign,
            point.item.amount,
            point.balance
        ));
    }

    output.push_str(&"-".repeat(72));
    output.push('\n');
    output.push_str(&format!("Pending income:   {}\n", projection.pending_income));
    output.push_str(&format!("Pending expenses: {}\n", projection.pending_expense));
    output.push_str(&format!("Projected balance: {}\n", projection.final_balance));
    if projection.final_balance.is_negative() {
        output.push_str("Warning: the projected balance goes negative.\n");
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use crate::services::ProjectionPoint;
    use chrono::NaiveDate;

    #[test]
    fn test_projection_warns_when_negative() {
        let today = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        let rent = CashFlowItem::new(FlowKind::Expense, "Rent", Money::from_units(800), today);
        let projection = Projection {
            today,
            start_balance: Money::from_units(500),
            points: vec![ProjectionPoint {
                item: rent,
                balance: Money::from_units(-300),
            }],
            final_balance: Money::from_units(-300),
            pending_income: Money::zero(),
            pending_expense: Money::from_units(800),
        };
        let text = format_projection(&projection);
        assert!(text.contains("Rent"));
        assert!(text.contains("goes negative"));
    }
}
