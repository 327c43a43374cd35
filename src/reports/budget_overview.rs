//! Budget Overview Report
//!
//! Budget vs actual spending for one month, rendered for the terminal.

use std::io::Write;

use crate::error::LibroResult;
use crate::models::YearMonth;
use crate::services::budget::BudgetReport;
use crate::services::BudgetService;
use crate::storage::Storage;

use super::export_err;
use crate::display::format::truncate;

#[derive(Debug, Clone)]
pub struct BudgetOverviewReport {
    pub report: BudgetReport,
}

impl BudgetOverviewReport {
    pub fn generate(storage: &Storage, month: YearMonth) -> LibroResult<Self> {
        Ok(Self {
            report: BudgetService::new(storage).report(month)?,
        })
    }

    pub fn format_terminal(&self) -> String {
        let report = &self.report;
        let mut output = String::new();
        output.push_str(&format!("Budget Overview - {}\n", report.month));
        output.push_str(&"=".repeat(76));
        output.push('\n');

        if report.rows.is_empty() {
            output.push_str("No budget set for this month.\n");
            return output;
        }

        output.push_str(&format!(
            "{:<28} {:>12} {:>12} {:>12} {:>7}\n",
            "Category", "Budgeted", "Actual", "Remaining", "Used"
        ));
        output.push_str(&"-".repeat(76));
        output.push('\n');

        for row in &report.rows {
            let used = match row.percentage {
                Some(p) => format!("{:.0}%", p),
                None => "-".to_string(),
            };
            output.push_str(&format!(
                "{:<28} {:>12} {:>12} {:>12} {:>7} {}\n",
                truncate(&row.account_name, 28),
                row.budgeted,
                row.actual,
                row.remaining(),
                used,
                row.status
            ));
        }

        output.push_str(&"-".repeat(76));
        output.push('\n');
        output.push_str(&format!(
            "{:<28} {:>12} {:>12} {:>12}\n",
            "TOTAL",
            report.total_budgeted,
            report.total_actual,
            report.total_budgeted - report.total_actual
        ));

        let over = report.over_budget().count();
        if over > 0 {
            output.push_str(&format!("\n{} categor{} over budget\n", over, if over == 1 { "y" } else { "ies" }));
        }
        output
    }

    pub fn export_csv<W: Write>(&self, writer: &mut W) -> LibroResult<()> {
        writeln!(writer, "Account,Name,Budgeted,Actual,Percentage,Status").map_err(export_err)?;
        for row in &self.report.rows {
            writeln!(
                writer,
                "{},\"{}\",{:.2},{:.2},{},{}",
                row.account_id,
                row.account_name.replace('"', "\"\""),
                row.budgeted.as_decimal(),
                row.actual.as_decimal(),
                row.percentage.map(|p| format!("{:.1}", p)).unwrap_or_default(),
                row.status
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
    use crate::models::Money;
    use tempfile::TempDir;

    #[test]
    fn test_empty_month() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::open(LibroPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        let month = YearMonth::new(2025, 1).unwrap();

        let report = BudgetOverviewReport::generate(&storage, month).unwrap();
        assert!(report.format_terminal().contains("No budget set"));

        BudgetService::new(&storage)
            .set_category(month, "acc_rent", Money::from_units(100))
            .unwrap();
        let report = BudgetOverviewReport::generate(&storage, month).unwrap();
        let text = report.format_terminal();
        assert!(text.contains("Alquileres"));
        assert!(text.contains("OK"));
    }
}
