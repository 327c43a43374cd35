//! Account Register Report
//!
//! Every posting to one account with its running balance.

use chrono::NaiveDate;
use std::io::Write;

use crate::error::{LibroError, LibroResult};
use crate::models::account::resolve_account;
use crate::models::{Account, Money};
use crate::services::journal::LedgerLine;
use crate::services::JournalService;
use crate::storage::Storage;

use super::export_err;
use crate::display::format::truncate;

#[derive(Debug, Clone)]
pub struct AccountRegisterReport {
    pub account: Account,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub lines: Vec<LedgerLine>,
}

impl AccountRegisterReport {
    pub fn generate(
        storage: &Storage,
        account: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> LibroResult<Self> {
        let resolved = *resolve_account(account).ok_or_else(|| LibroError::account_not_found(account))?;
        let lines = JournalService::new(storage).ledger(resolved.id, from, to)?;
        Ok(Self {
            account: resolved,
            from,
            to,
            lines,
        })
    }

    pub fn total_debits(&self) -> Money {
        self.lines.iter().map(|l| l.debit).sum()
    }

    pub fn total_credits(&self) -> Money {
        self.lines.iter().map(|l| l.credit).sum()
    }

    pub fn closing_balance(&self) -> Option<Money> {
        self.lines.last().map(|l| l.balance)
    }

    pub fn format_terminal(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!("Register: {}\n", self.account));
        output.push_str(&"=".repeat(80));
        output.push('\n');
        output.push_str(&format!(
            "{:<10}  {:<10}  {:<24} {:>10} {:>10} {:>10}\n",
            "Date", "Entry", "Description", "Debit", "Credit", "Balance"
        ));
        output.push_str(&"-".repeat(80));
        output.push('\n');

        if self.lines.is_empty() {
            output.push_str("No postings in this range.\n");
            return output;
        }

        for line in &self.lines {
            let blank_if_zero = |m: Money| if m.is_zero() { String::new() } else { m.to_string() };
            output.push_str(&format!(
                "{:<10}  {:<10}  {:<24} {:>10} {:>10} {:>10}\n",
                line.date,
                line.entry_id,
                truncate(&line.description, 24),
                blank_if_zero(line.debit),
                blank_if_zero(line.credit),
                line.balance
            ));
        }

        output.push_str(&"-".repeat(80));
        output.push('\n');
        output.push_str(&format!(
            "{:<48} {:>10} {:>10} {:>10}\n",
            "TOTAL",
            self.total_debits(),
            self.total_credits(),
            self.closing_balance().unwrap_or_default()
        ));
        output
    }

    pub fn export_csv<W: Write>(&self, writer: &mut W) -> LibroResult<()> {
        writeln!(writer, "Date,Entry,Description,Debit,Credit,Balance").map_err(export_err)?;
        for line in &self.lines {
            writeln!(
                writer,
                "{},{},\"{}\",{:.2},{:.2},{:.2}",
                line.date,
                line.entry_id.as_uuid(),
                line.description.replace('"', "\"\""),
                line.debit.as_decimal(),
                line.credit.as_decimal(),
                line.balance.as_decimal()
            )
            .map_err(export_err)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LibroPaths;
    use tempfile::TempDir;

    #[test]
    fn test_register_for_bank() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::open(LibroPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        let journal = JournalService::new(&storage);
        let d = |day| NaiveDate::from_ymd_opt(2025, 8, day).unwrap();
        journal
            .add_simple(d(1), "Capital", Money::from_units(900), "acc_bank", "acc_capital")
            .unwrap();
        journal
            .add_simple(d(2), "Fees", Money::from_units(9), "acc_bank_fees", "acc_bank")
            .unwrap();

        let report = AccountRegisterReport::generate(&storage, "Banco", None, None).unwrap();
        assert_eq!(report.account.id, "acc_bank");
        assert_eq!(report.lines.len(), 2);
        assert_eq!(report.closing_balance(), Some(Money::from_units(891)));
        assert!(report.format_terminal().contains("Fees"));

        assert!(AccountRegisterReport::generate(&storage, "nope", None, None).is_err());
    }
}
