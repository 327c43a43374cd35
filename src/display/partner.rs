//! Partner display formatting

use chrono::NaiveDate;

use crate::models::{Partner, PartnerMovement};
use crate::services::{PartnerOverview, StatementLine};

use super::format::{blank_if_zero, truncate};

pub fn format_partner_overview(overview: &PartnerOverview) -> String {
    if overview.partners.is_empty() {
        return "No partners found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<10}  {:<28}  {:<8}  {:>12}  {:>12}  {}\n",
        "ID", "Name", "Kind", "Balance", "Overdue", "Flags"
    ));
    output.push_str(&"-".repeat(88));
    output.push('\n');

    for summary in &overview.partners {
        let mut flags = Vec::new();
        if summary.overdue_count > 0 {
            flags.push(format!("{} overdue", summary.overdue_count));
        }
        if summary.over_limit {
            flags.push("over limit".to_string());
        }
        output.push_str(&format!(
            "{:<10}  {:<28}  {:<8}  {:>12}  {:>12}  {}\n",
            summary.partner.id,
            truncate(&summary.partner.name, 28),
            summary.partner.kind,
            summary.balance,
            blank_if_zero(summary.overdue),
            flags.join(", ")
        ));
    }

    output.push_str(&"-".repeat(88));
    output.push('\n');
    output.push_str(&format!("Receivables: {}\n", overview.receivables));
    output.push_str(&format!("Payables:    {}\n", overview.payables));
    output
}

pub fn format_partner_details(partner: &Partner) -> String {
    let or_dash = |s: &str| if s.is_empty() { "-".to_string() } else { s.to_string() };
    let mut output = String::new();
    output.push_str(&format!("Partner:     {}\n", partner.name));
    output.push_str(&format!("ID:          {}\n", partner.id.as_uuid()));
    output.push_str(&format!("Kind:        {}\n", partner.kind));
    output.push_str(&format!("Tax ID:      {}\n", or_dash(&partner.tax_id)));
    output.push_str(&format!("Email:       {}\n", or_dash(&partner.email)));
    output.push_str(&format!("Phone:       {}\n", or_dash(&partner.phone)));
    output.push_str(&format!("Credit days: {}\n", partner.credit_days));
    output.push_str(&format!(
        "Credit limit: {}\n",
        partner
            .credit_limit
            .map(|l| l.to_string())
            .unwrap_or_else(|| "none".into())
    ));
    if !partner.notes.is_empty() {
        output.push_str(&format!("Notes:       {}\n", partner.notes));
    }
    output
}

/// Movement list with due dates; overdue ones are marked
pub fn format_movements(movements: &[PartnerMovement], today: NaiveDate) -> String {
    if movements.is_empty() {
        return "No movements found.\n".to_string();
    }
    let mut output = String::new();
    output.push_str(&format!(
        "{:<10}  {:<10}  {:<11}  {:<12}  {:<10}  {:>12}  {}\n",
        "Date", "ID", "Kind", "Reference", "Due", "Amount", "Status"
    ));
    for m in movements {
        let status = if m.is_overdue(today) {
            format!("{} ({}d overdue)", m.status, m.days_overdue(today))
        } else {
            m.status.to_string()
        };
        output.push_str(&format!(
            "{:<10}  {:<10}  {:<11}  {:<12}  {:<10}  {:>12}  {}\n",
            m.date,
            m.id,
            m.kind,
            truncate(&m.reference, 12),
            m.due_date.map(|d| d.to_string()).unwrap_or_default(),
            m.amount,
            status
        ));
    }
    output
}

/// Current-account statement with running balance
pub fn format_statement(partner: &Partner, lines: &[StatementLine]) -> String {
    let mut output = String::new();
    output.push_str(&format!("Statement: {}\n", partner));
    output.push_str(&"=".repeat(78));
    output.push('\n');
    if lines.is_empty() {
        output.push_str("No movements.\n");
        return output;
    }
    output.push_str(&format!(
        "{:<10}  {:<11}  {:<24}  {:>12}  {:>12}\n",
        "Date", "Kind", "Reference", "Amount", "Balance"
    ));
    for line in lines {
        let m = &line.movement;
        let label = if m.reference.is_empty() { &m.description } else { &m.reference };
        output.push_str(&format!(
            "{:<10}  {:<11}  {:<24}  {:>12}  {:>12}\n",
            m.date,
            m.kind,
            truncate(label, 24),
            m.signed_amount(),
            line.balance
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, MovementKind, PartnerKind};
    use crate::services::PartnerSummary;

    #[test]
    fn test_overview_flags() {
        let partner = Partner::new("Acme", PartnerKind::Client);
        let overview = PartnerOverview {
            partners: vec![PartnerSummary {
                partner,
                balance: Money::from_units(900),
                overdue: Money::from_units(400),
                overdue_count: 2,
                over_limit: true,
            }],
            receivables: Money::from_units(900),
            payables: Money::zero(),
            overdue_count: 2,
        };
        let text = format_partner_overview(&overview);
        assert!(text.contains("2 overdue, over limit"));
        assert!(text.contains("Receivables: $900.00"));
    }

    #[test]
    fn test_movements_mark_overdue() {
        let partner = Partner::new("Acme", PartnerKind::Client);
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let invoice = PartnerMovement::new(partner.id, MovementKind::Invoice, date, Money::from_units(50))
            .with_terms(30)
            .unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 2, 10).unwrap();
        let text = format_movements(&[invoice], today);
        assert!(text.contains("10d overdue"));
    }
}
