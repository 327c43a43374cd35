//! Income Statement Report
//!
//! Income and expense accounts over a date range and the resulting net
//! result.

use chrono::NaiveDate;
use std::io::Write;

use crate::error::LibroResult;
use crate::models::account::chart_of_accounts;
use crate::models::{AccountType, Money};
use crate::services::JournalService;
use crate::storage::Storage;

use super::export_err;
use crate::display::format::truncate;

/// One account and its movement in the range
#[derive(Debug, Clone)]
pub struct StatementLine {
    pub account_id: String,
    pub account_name: String,
    pub amount: Money,
}

/// Income statement for `[from, to]`
#[derive(Debug, Clone)]
pub struct IncomeStatementReport {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub income: Vec<StatementLine>,
    pub expenses: Vec<StatementLine>,
    pub total_income: Money,
    pub total_expenses: Money,
}

impl IncomeStatementReport {
    pub fn generate(storage: &Storage, from: NaiveDate, to: NaiveDate) -> LibroResult<Self> {
        let totals = JournalService::new(storage).totals(Some(from), Some(to))?;

        let lines_of = |account_type: AccountType| -> Vec<StatementLine> {
            chart_of_accounts()
                .iter()
                .filter(|a| a.account_type == account_type)
                .filter_map(|a| {
                    let amount = totals.get(a.id)?.balance(a.account_type);
                    (!amount.is_zero()).then(|| StatementLine {
                        account_id: a.id.to_string(),
                        account_name: a.name.to_string(),
                        amount,
                    })
                })
                .collect()
        };

        let income = lines_of(AccountType::Income);
        let expenses = lines_of(AccountType::Expense);

        Ok(Self {
            from,
            to,
            total_income: income.iter().map(|l| l.amount).sum(),
            total_expenses: expenses.iter().map(|l| l.amount).sum(),
            income,
            expenses,
        })
    }

    pub fn net_result(&self) -> Money {
        self.total_income - self.total_expenses
    }

    /// Net result as a percentage of income
    pub fn margin_percent(&self) -> Option<f64> {
        self.net_result().percent_of(self.total_income)
    }

    pub fn format_terminal(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!("Income Statement {} to {}\n", self.from, self.to));
        output.push_str(&"=".repeat(60));
        output.push('\n');

        let mut section = |title: &str, lines: &[StatementLine], total: Money| {
            output.push_str(&format!("\n{}\n", title));
            for line in lines {
                output.push_str(&format!(
                    "  {:<40} {:>15}\n",
                    truncate(&line.account_name, 40),
                    line.amount
                ));
            }
            output.push_str(&format!("  {:<40} {:>15}\n", "Total", total));
        };
        section("INCOME", &self.income, self.total_income);
        section("EXPENSES", &self.expenses, self.total_expenses);

        output.push_str(&"-".repeat(60));
        output.push('\n');
        output.push_str(&format!("{:<42} {:>15}\n", "NET RESULT", self.net_result()));
        if let Some(margin) = self.margin_percent() {
            output.push_str(&format!("{:<42} {:>14.1}%\n", "Margin", margin));
        }
        output
    }

    pub fn export_csv<W: Write>(&self, writer: &mut W) -> LibroResult<()> {
        writeln!(writer, "Section,Account,Name,Amount").map_err(export_err)?;
        for (section, lines) in [("Income", &self.income), ("Expense", &self.expenses)] {
            for line in lines {
                writeln!(
                    writer,
                    "{},{},\"{}\",{:.2}",
                    section,
                    line.account_id,
                    line.account_name.replace('"', "\"\""),
                    line.amount.as_decimal()
                )
                .map_err(export_err)?;
            }
        }
        writeln!(writer, "Net,,,{:.2}", self.net_result().as_decimal()).map_err(export_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LibroPaths;
    use tempfile::TempDir;

    #[test]
    fn test_net_result_in_range() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::open(LibroPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        let journal = JournalService::new(&storage);
        let d = |m, day| NaiveDate::from_ymd_opt(2025, m, day).unwrap();

        journal
            .add_simple(d(1, 5), "Sale", Money::from_units(1000), "acc_bank", "acc_sales")
            .unwrap();
        journal
            .add_simple(d(1, 9), "Rent", Money::from_units(300), "acc_rent", "acc_bank")
            .unwrap();
        journal
            .add_simple(d(2, 9), "Rent", Money::from_units(300), "acc_rent", "acc_bank")
            .unwrap();

        let report = IncomeStatementReport::generate(&storage, d(1, 1), d(1, 31)).unwrap();
        assert_eq!(report.total_income, Money::from_units(1000));
        assert_eq!(report.total_expenses, Money::from_units(300));
        assert_eq!(report.net_result(), Money::from_units(700));
        assert_eq!(report.margin_percent(), Some(70.0));
        assert!(report.format_terminal().contains("NET RESULT"));
    }
}
