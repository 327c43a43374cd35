//! Trial Balance Report
//!
//! Debit and credit totals of every account that has postings, and the check
//! that both columns agree.

use chrono::NaiveDate;
use std::io::Write;

use crate::error::LibroResult;
use crate::models::account::chart_of_accounts;
use crate::models::{AccountType, Money};
use crate::services::JournalService;
use crate::storage::Storage;

use super::export_err;
use crate::display::format::truncate;

/// One account line
#[derive(Debug, Clone)]
pub struct TrialBalanceRow {
    pub account_id: String,
    pub account_name: String,
    pub account_type: AccountType,
    pub debits: Money,
    pub credits: Money,
    /// Balance on the account's normal side
    pub balance: Money,
}

/// Trial balance as of a date
#[derive(Debug, Clone)]
pub struct TrialBalanceReport {
    pub as_of: Option<NaiveDate>,
    pub rows: Vec<TrialBalanceRow>,
    pub total_debits: Money,
    pub total_credits: Money,
}

impl TrialBalanceReport {
    /// Build from every entry dated on or before `as_of`
    pub fn generate(storage: &Storage, as_of: Option<NaiveDate>) -> LibroResult<Self> {
        let totals = JournalService::new(storage).totals(None, as_of)?;

        // Chart order; accounts without movement are left out
        let rows: Vec<TrialBalanceRow> = chart_of_accounts()
            .iter()
            .filter_map(|account| {
                let t = totals.get(account.id)?;
                Some(TrialBalanceRow {
                    account_id: account.id.to_string(),
                    account_name: account.name.to_string(),
                    account_type: account.account_type,
                    debits: t.debits,
                    credits: t.credits,
                    balance: t.balance(account.account_type),
                })
            })
            .collect();

        Ok(Self {
            as_of,
            total_debits: rows.iter().map(|r| r.debits).sum(),
            total_credits: rows.iter().map(|r| r.credits).sum(),
            rows,
        })
    }

    pub fn is_balanced(&self) -> bool {
        self.total_debits == self.total_credits
    }

    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        let title = match self.as_of {
            Some(date) => format!("Trial Balance as of {}", date),
            None => "Trial Balance".to_string(),
        };
        output.push_str(&title);
        output.push('\n');
        output.push_str(&"=".repeat(78));
        output.push('\n');

        output.push_str(&format!(
            "{:<18} {:<26} {:>10} {:>10} {:>10}\n",
            "Account", "Name", "Debits", "Credits", "Balance"
        ));
        output.push_str(&"-".repeat(78));
        output.push('\n');

        for row in &self.rows {
            output.push_str(&format!(
                "{:<18} {:<26} {:>10} {:>10} {:>10}\n",
                row.account_id,
                truncate(&row.account_name, 26),
                row.debits,
                row.credits,
                row.balance
            ));
        }

        output.push_str(&"-".repeat(78));
        output.push('\n');
        output.push_str(&format!(
            "{:<45} {:>10} {:>10}\n",
            "TOTAL", self.total_debits, self.total_credits
        ));

        if self.is_balanced() {
            output.push_str("\nDebits and credits agree.\n");
        } else {
            output.push_str(&format!(
                "\nOUT OF BALANCE by {}\n",
                (self.total_debits - self.total_credits).abs()
            ));
        }

        output
    }

    pub fn export_csv<W: Write>(&self, writer: &mut W) -> LibroResult<()> {
        writeln!(writer, "Account,Name,Type,Debits,Credits,Balance").map_err(export_err)?;
        for row in &self.rows {
            writeln!(
                writer,
                "{},\"{}\",{},{:.2},{:.2},{:.2}",
                row.account_id,
                row.account_name.replace('"', "\"\""),
                row.account_type,
                row.debits.as_decimal(),
                row.credits.as_decimal(),
                row.balance.as_decimal()
            )
            .map_err(export_err)?;
        }
        writeln!(
            writer,
            "TOTAL,,,{:.2},{:.2},",
            self.total_debits.as_decimal(),
            self.total_credits.as_decimal()
        )
        .map_err(export_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LibroPaths;
    use tempfile::TempDir;

    #[test]
    fn test_trial_balance_totals() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::open(LibroPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        let journal = JournalService::new(&storage);
        let day = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        journal
            .add_simple(day, "Capital", Money::from_units(1000), "acc_bank", "acc_capital")
            .unwrap();
        journal
            .add_simple(day, "Rent", Money::from_units(200), "acc_rent", "acc_bank")
            .unwrap();

        let report = TrialBalanceReport::generate(&storage, None).unwrap();
        assert!(report.is_balanced());
        assert_eq!(report.total_debits, Money::from_units(1200));
        assert_eq!(report.rows.len(), 3);
        assert_eq!(report.rows[0].account_id, "acc_bank");
        assert_eq!(report.rows[0].balance, Money::from_units(800));

        let text = report.format_terminal();
        assert!(text.contains("Debits and credits agree"));

        let mut csv = Vec::new();
        report.export_csv(&mut csv).unwrap();
        let csv = String::from_utf8(csv).unwrap();
        assert!(csv.starts_with("Account,Name,Type"));
        assert!(csv.contains("TOTAL,,,1200.00,1200.00,"));
    }
}
