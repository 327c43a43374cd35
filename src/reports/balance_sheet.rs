//! Balance Sheet Report
//!
//! Assets, liabilities and equity as of a date. Income and expense accounts
//! are not closed, so their net result is shown as a line of equity.

use chrono::NaiveDate;
use std::io::Write;

use crate::error::LibroResult;
use crate::models::account::chart_of_accounts;
use crate::models::{AccountType, Money};
use crate::services::JournalService;
use crate::storage::Storage;

use super::export_err;
use super::income_statement::StatementLine;
use crate::display::format::truncate;

/// A group of accounts of one type
#[derive(Debug, Clone)]
pub struct BalanceSection {
    pub account_type: AccountType,
    pub lines: Vec<StatementLine>,
    pub total: Money,
}

impl BalanceSection {
    fn new(account_type: AccountType, lines: Vec<StatementLine>) -> Self {
        let total = lines.iter().map(|l| l.amount).sum();
        Self {
            account_type,
            lines,
            total,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BalanceSheetReport {
    pub as_of: NaiveDate,
    pub assets: BalanceSection,
    pub liabilities: BalanceSection,
    pub equity: BalanceSection,
    /// Income minus expense of every unclosed period up to `as_of`
    pub period_result: Money,
}

impl BalanceSheetReport {
    pub fn generate(storage: &Storage, as_of: NaiveDate) -> LibroResult<Self> {
        let totals = JournalService::new(storage).totals(None, Some(as_of))?;

        let balance_of = |id: &str, account_type: AccountType| {
            totals
                .get(id)
                .map(|t| t.balance(account_type))
                .unwrap_or_default()
        };

        let section = |account_type: AccountType| {
            let lines = chart_of_accounts()
                .iter()
                .filter(|a| a.account_type == account_type)
                .filter_map(|a| {
                    let amount = balance_of(a.id, a.account_type);
                    (!amount.is_zero()).then(|| StatementLine {
                        account_id: a.id.to_string(),
                        account_name: a.name.to_string(),
                        amount,
                    })
                })
                .collect();
            BalanceSection::new(account_type, lines)
        };

        let sum_of = |account_type: AccountType| -> Money {
            chart_of_accounts()
                .iter()
                .filter(|a| a.account_type == account_type)
                .map(|a| balance_of(a.id, a.account_type))
                .sum()
        };
        let period_result = sum_of(AccountType::Income) - sum_of(AccountType::Expense);

        Ok(Self {
            as_of,
            assets: section(AccountType::Asset),
            liabilities: section(AccountType::Liability),
            equity: section(AccountType::Equity),
            period_result,
        })
    }

    /// Equity accounts plus the unclosed result
    pub fn total_equity(&self) -> Money {
        self.equity.total + self.period_result
    }

    pub fn total_liabilities_and_equity(&self) -> Money {
        self.liabilities.total + self.total_equity()
    }

    /// A = L + E
    pub fn is_balanced(&self) -> bool {
        self.assets.total == self.total_liabilities_and_equity()
    }

    pub fn format_terminal(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!("Balance Sheet as of {}\n", self.as_of));
        output.push_str(&"=".repeat(60));
        output.push('\n');

        for section in [&self.assets, &self.liabilities, &self.equity] {
            output.push_str(&format!(
                "\n{}\n",
                section.account_type.to_string().to_uppercase()
            ));
            for line in &section.lines {
                output.push_str(&format!(
                    "  {:<40} {:>15}\n",
                    truncate(&line.account_name, 40),
                    line.amount
                ));
            }
            if section.account_type == AccountType::Equity {
                output.push_str(&format!(
                    "  {:<40} {:>15}\n",
                    "Result of the period", self.period_result
                ));
            }
        }

        output.push_str(&"-".repeat(60));
        output.push('\n');
        output.push_str(&format!("{:<42} {:>15}\n", "Total assets", self.assets.total));
        output.push_str(&format!(
            "{:<42} {:>15}\n",
            "Total liabilities + equity",
            self.total_liabilities_and_equity()
        ));
        if !self.is_balanced() {
            output.push_str("\nWARNING: assets do not equal liabilities + equity\n");
        }
        output
    }

    pub fn export_csv<W: Write>(&self, writer: &mut W) -> LibroResult<()> {
        writeln!(writer, "Section,Account,Name,Amount").map_err(export_err)?;
        for section in [&self.assets, &self.liabilities, &self.equity] {
            for line in &section.lines {
                writeln!(
                    writer,
                    "{},{},\"{}\",{:.2}",
                    section.account_type,
                    line.account_id,
                    line.account_name.replace('"', "\"\""),
                    line.amount.as_decimal()
                )
                .map_err(export_err)?;
            }
        }
        writeln!(writer, "Equity,,Result of the period,{:.2}", self.period_result.as_decimal())
            .map_err(export_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LibroPaths;
    use crate::models::Posting;
    use tempfile::TempDir;

    #[test]
    fn test_assets_equal_liabilities_plus_equity() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::open(LibroPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        let journal = JournalService::new(&storage);
        let d = |day| NaiveDate::from_ymd_opt(2025, 3, day).unwrap();
        let units = Money::from_units;

        journal
            .add_compound(
                d(1),
                "Opening balance",
                vec![
                    Posting::new("acc_cash", units(200)),
                    Posting::new("acc_bank", units(800)),
                ],
                vec![
                    Posting::new("acc_capital", units(700)),
                    Posting::new("acc_loans", units(300)),
                ],
            )
            .unwrap();
        journal
            .add_simple(d(5), "Sale", units(500), "acc_bank", "acc_sales")
            .unwrap();
        journal
            .add_simple(d(6), "Rent", units(100), "acc_rent", "acc_cash")
            .unwrap();

        let report = BalanceSheetReport::generate(&storage, d(31)).unwrap();
        assert_eq!(report.assets.total, units(1400));
        assert_eq!(report.liabilities.total, units(300));
        assert_eq!(report.period_result, units(400));
        assert_eq!(report.total_equity(), units(1100));
        assert!(report.is_balanced());

        // Before the sale and the rent
        let early = BalanceSheetReport::generate(&storage, d(2)).unwrap();
        assert_eq!(early.assets.total, units(1000));
        assert!(early.is_balanced());
    }
}
