//! Journal and chart-of-accounts display formatting

use crate::models::account::{chart_of_accounts, find_account};
use crate::models::{AccountType, JournalEntry, Side};
use crate::services::InvalidEntry;

use super::format::truncate;

fn account_label(id: &str) -> String {
    find_account(id)
        .map(|a| a.name.to_string())
        .unwrap_or_else(|| format!("? {}", id))
}

/// The chart of accounts grouped by type
pub fn format_chart() -> String {
    let mut output = String::new();
    for account_type in AccountType::all() {
        output.push_str(&format!("{}\n", account_type));
        for account in chart_of_accounts()
            .iter()
            .filter(|a| a.account_type == account_type)
        {
            output.push_str(&format!(
                "  {:<22} {:<30} {}\n",
                account.id, account.name, account.description
            ));
        }
        output.push('\n');
    }
    output
}

/// Short "debit / credit" label of an entry
fn accounts_summary(entry: &JournalEntry) -> String {
    if entry.is_compound() {
        let debits = entry.debit_postings().len();
        let credits = entry.credit_postings().len();
        return format!("compound {}D/{}C", debits, credits);
    }
    match (&entry.debit_account, &entry.credit_account) {
        (Some(d), Some(c)) => format!("{} / {}", account_label(d), account_label(c)),
        _ => "-".to_string(),
    }
}

/// Register-style list of entries
pub fn format_entry_list(entries: &[JournalEntry]) -> String {
    if entries.is_empty() {
        return "No journal entries found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<10}  {:<10}  {:<28}  {:<36}  {:>12}\n",
        "Date", "ID", "Description", "Accounts", "Amount"
    ));
    output.push_str(&"-".repeat(104));
    output.push('\n');

    for entry in entries {
        let flag = if entry.is_consistent() { ' ' } else { '!' };
        output.push_str(&format!(
            "{:<10}  {:<10}  {:<28}  {:<36}  {:>12}{}\n",
            entry.date,
            entry.id,
            truncate(&entry.description, 28),
            truncate(&accounts_summary(entry), 36),
            entry.amount,
            flag
        ));
    }

    output
}

/// Every posting of one entry
pub fn format_entry_details(entry: &JournalEntry) -> String {
    let mut output = String::new();
    output.push_str(&format!("Entry:       {}\n", entry.id.as_uuid()));
    output.push_str(&format!("Date:        {}\n", entry.date));
    output.push_str(&format!("Description: {}\n", entry.description));
    output.push_str(&format!("Amount:      {}\n", entry.amount));
    output.push('\n');

    output.push_str(&format!("{:<40} {:>12} {:>12}\n", "Account", "Debit", "Credit"));
    for (side, posting) in entry.postings_with_side() {
        let label = format!("{} ({})", account_label(&posting.account_id), posting.account_id);
        let (debit, credit) = match side {
            Side::Debit => (posting.amount.to_string(), String::new()),
            Side::Credit => (String::new(), posting.amount.to_string()),
        };
        output.push_str(&format!("{:<40} {:>12} {:>12}\n", truncate(&label, 40), debit, credit));
    }

    let check = entry.balance_check();
    if !check.is_balanced() {
        output.push_str(&format!("\nUnbalanced by {}\n", check.difference()));
    }
    output
}

/// Findings of `journal verify`
pub fn format_invalid_entries(invalid: &[InvalidEntry]) -> String {
    if invalid.is_empty() {
        return "All journal entries balance and use known accounts.\n".to_string();
    }
    let mut output = format!("{} entr{} need attention:\n", invalid.len(), if invalid.len() == 1 { "y" } else { "ies" });
    for item in invalid {
        output.push_str(&format!(
            "  {}  {}  {}  (debits {}, credits {})\n",
            item.entry.id,
            item.entry.date,
            truncate(&item.entry.description, 30),
            item.check.debits,
            item.check.credits
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, Posting};
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
    }

    #[test]
    fn test_chart_lists_every_type() {
        let chart = format_chart();
        assert!(chart.contains("acc_cash"));
        assert!(chart.contains("acc_other_expense"));
    }

    #[test]
    fn test_entry_list_labels() {
        let simple = JournalEntry::simple(date(), "Rent", Money::from_units(500), "acc_rent", "acc_bank");
        let compound = JournalEntry::compound(
            date(),
            "Invoice",
            vec![Posting::new("acc_receivables", Money::from_units(121))],
            vec![
                Posting::new("acc_sales", Money::from_units(100)),
                Posting::new("acc_vat_payable", Money::from_units(21)),
            ],
        );
        let text = format_entry_list(&[simple, compound]);
        assert!(text.contains("Alquileres / Banco"));
        assert!(text.contains("compound 1D/2C"));
        assert_eq!(format_entry_list(&[]), "No journal entries found.\n");
    }

    #[test]
    fn test_details_flags_unbalanced() {
        let entry = JournalEntry::compound(
            date(),
            "Broken",
            vec![Posting::new("acc_cash", Money::from_units(10))],
            vec![Posting::new("acc_sales", Money::from_units(9))],
        );
        let text = format_entry_details(&entry);
        assert!(text.contains("Unbalanced by $1.00"));
    }
}
