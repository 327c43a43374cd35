//! Tax display formatting

use chrono::NaiveDate;

use crate::models::{TaxConfig, TaxObligation};
use crate::services::VatPosition;

pub fn format_tax_configs(configs: &[TaxConfig]) -> String {
    if configs.is_empty() {
        return "No taxes configured.\n".to_string();
    }
    let mut output = String::new();
    output.push_str(&format!(
        "{:<8}  {:<30}  {:>7}  {:<14}  {:>7}\n",
        "Code", "Name", "Rate", "Jurisdiction", "Due day"
    ));
    for config in configs {
        output.push_str(&format!(
            "{:<8}  {:<30}  {:>6.2}%  {:<14}  {:>7}\n",
            config.code,
            config.name,
            config.rate_percent(),
            config.jurisdiction,
            config.due_day
        ));
    }
    output
}

pub fn format_obligations(obligations: &[TaxObligation], today: NaiveDate) -> String {
    if obligations.is_empty() {
        return "No tax obligations found.\n".to_string();
    }
    let mut output = String::new();
    output.push_str(&format!(
        "{:<10}  {:<8}  {:<8}  {:<10}  {:>12}  {}\n",
        "ID", "Tax", "Period", "Due", "Amount", "Status"
    ));
    for o in obligations {
        let status = if o.is_overdue(today) {
            format!("{} (overdue)", o.status)
        } else if let Some(paid) = o.paid_date {
            format!("{} {}", o.status, paid)
        } else {
            o.status.to_string()
        };
        output.push_str(&format!(
            "{:<10}  {:<8}  {:<8}  {:<10}  {:>12}  {}\n",
            o.id, o.tax_code, o.period, o.due_date, o.amount, status
        ));
    }
    let open: crate::models::Money = obligations.iter().filter(|o| !o.is_paid()).map(|o| o.amount).sum();
    output.push_str(&format!("\nOpen total: {}\n", open));
    output
}

pub fn format_vat_position(position: &VatPosition) -> String {
    let net = position.net();
    let verdict = if net.is_negative() {
        format!("VAT credit carried forward: {}", net.abs())
    } else {
        format!("VAT to pay: {}", net)
    };
    format!(
        "VAT position {}\n  Charged on sales:    {:>12}\n  Paid on purchases:   {:>12}\n  {}\n",
        position.month, position.debit_vat, position.credit_vat, verdict
    )
}
