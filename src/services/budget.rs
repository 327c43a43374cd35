//! Budget service
//!
//! Monthly spending limits per expense account, compared against what the
//! journal actually posted to those accounts.

use crate::audit::EntityType;
use crate::error::{LibroError, LibroResult};
use crate::models::account::resolve_account;
use crate::models::{AccountType, BudgetStatus, Money, MonthlyBudget, Side, YearMonth};
use crate::storage::Storage;

/// Budget vs actual for one expense account
#[derive(Debug, Clone)]
pub struct BudgetReportRow {
    pub account_id: String,
    pub account_name: String,
    pub budgeted: Money,
    pub actual: Money,
    /// `None` when nothing was budgeted
    pub percentage: Option<f64>,
    pub status: BudgetStatus,
}

impl BudgetReportRow {
    pub fn remaining(&self) -> Money {
        self.budgeted - self.actual
    }
}

/// Budget vs actual for a whole month
#[derive(Debug, Clone)]
pub struct BudgetReport {
    pub month: YearMonth,
    pub rows: Vec<BudgetReportRow>,
    pub total_budgeted: Money,
    pub total_actual: Money,
}

impl BudgetReport {
    pub fn total_percentage(&self) -> Option<f64> {
        self.total_actual.percent_of(self.total_budgeted)
    }

    pub fn over_budget(&self) -> impl Iterator<Item = &BudgetReportRow> {
        self.rows.iter().filter(|r| r.status == BudgetStatus::Red)
    }
}

/// Service for monthly budgets
pub struct BudgetService<'a> {
    storage: &'a Storage,
}

impl<'a> BudgetService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Set the budgeted amount of an expense account for a month
    pub fn set_category(
        &self,
        month: YearMonth,
        account: &str,
        budgeted: Money,
    ) -> LibroResult<MonthlyBudget> {
        let account = resolve_account(account).ok_or_else(|| LibroError::account_not_found(account))?;
        if account.account_type != AccountType::Expense {
            return Err(LibroError::Validation(format!(
                "{} is not an expense account",
                account
            )));
        }
        if budgeted.is_negative() {
            return Err(LibroError::Validation(
                "Budgeted amount cannot be negative".into(),
            ));
        }

        let existing = self.storage.budgets.get(month)?;
        let mut budget = existing.clone().unwrap_or_else(|| MonthlyBudget::new(month));
        budget.set_line(account.id, budgeted);

        self.storage.budgets.upsert(budget.clone())?;
        self.storage.budgets.save()?;

        match existing {
            Some(before) => self.storage.log_update(
                EntityType::MonthlyBudget,
                month.to_string(),
                None,
                &before,
                &budget,
            )?,
            None => self.storage.log_create(
                EntityType::MonthlyBudget,
                month.to_string(),
                None,
                &budget,
            )?,
        }

        tracing::info!(%month, account = account.id, %budgeted, "budget line set");
        Ok(budget)
    }

    /// Drop an account from a month's budget
    pub fn remove_category(&self, month: YearMonth, account: &str) -> LibroResult<MonthlyBudget> {
        let account_id = resolve_account(account)
            .map(|a| a.id.to_string())
            .unwrap_or_else(|| account.to_string());

        let before = self.storage.budgets.get(month)?.ok_or_else(|| LibroError::NotFound {
            entity_type: "Budget",
            identifier: month.to_string(),
        })?;

        let mut budget = before.clone();
        if !budget.remove_line(&account_id) {
            return Err(LibroError::NotFound {
                entity_type: "Budget line",
                identifier: format!("{} {}", month, account_id),
            });
        }

        self.storage.budgets.upsert(budget.clone())?;
        self.storage.budgets.save()?;
        self.storage.log_update(
            EntityType::MonthlyBudget,
            month.to_string(),
            None,
            &before,
            &budget,
        )?;
        Ok(budget)
    }

    pub fn get(&self, month: YearMonth) -> LibroResult<Option<MonthlyBudget>> {
        self.storage.budgets.get(month)
    }

    pub fn list(&self) -> LibroResult<Vec<MonthlyBudget>> {
        self.storage.budgets.get_all()
    }

    /// Copy every line of `from` into `to`, overwriting lines for the same account
    pub fn copy_month(&self, from: YearMonth, to: YearMonth) -> LibroResult<MonthlyBudget> {
        if from == to {
            return Err(LibroError::Validation(
                "Source and target months are the same".into(),
            ));
        }
        let source = self.storage.budgets.get(from)?.ok_or_else(|| LibroError::NotFound {
            entity_type: "Budget",
            identifier: from.to_string(),
        })?;

        let existing = self.storage.budgets.get(to)?;
        let mut target = existing.clone().unwrap_or_else(|| MonthlyBudget::new(to));
        for line in &source.categories {
            target.set_line(&line.account_id, line.budgeted);
        }

        self.storage.budgets.upsert(target.clone())?;
        self.storage.budgets.save()?;

        match existing {
            Some(before) => self.storage.log_update(
                EntityType::MonthlyBudget,
                to.to_string(),
                None,
                &before,
                &target,
            )?,
            None => {
                self.storage
                    .log_create(EntityType::MonthlyBudget, to.to_string(), None, &target)?
            }
        }

        tracing::info!(%from, %to, lines = source.categories.len(), "budget copied");
        Ok(target)
    }

    /// Actual spending per budgeted account; an empty report when the month has no budget
    pub fn report(&self, month: YearMonth) -> LibroResult<BudgetReport> {
        let budget = self
            .storage
            .budgets
            .get(month)?
            .unwrap_or_else(|| MonthlyBudget::new(month));

        let entries = self
            .storage
            .journal
            .get_by_date_range(month.first_day(), month.last_day())?;

        let mut rows: Vec<BudgetReportRow> = budget
            .categories
            .iter()
            .map(|line| {
                let actual: Money = entries
                    .iter()
                    .map(|e| e.amount_on(&line.account_id, Side::Debit))
                    .sum();
                let percentage = actual.percent_of(line.budgeted);
                BudgetReportRow {
                    account_name: resolve_account(&line.account_id)
                        .map(|a| a.name.to_string())
                        .unwrap_or_else(|| line.account_id.clone()),
                    account_id: line.account_id.clone(),
                    budgeted: line.budgeted,
                    actual,
                    percentage,
                    status: BudgetStatus::classify(percentage, actual),
                }
            })
            .collect();

        // Unbudgeted spending sorts first, then by percentage descending
        rows.sort_by(|a, b| {
            let key = |r: &BudgetReportRow| match r.percentage {
                Some(p) => p,
                None if r.actual.is_positive() => f64::INFINITY,
                None => 0.0,
            };
            key(b).total_cmp(&key(a))
        });

        Ok(BudgetReport {
            month,
            total_budgeted: rows.iter().map(|r| r.budgeted).sum(),
            total_actual: rows.iter().map(|r| r.actual).sum(),
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LibroPaths;
    use crate::services::JournalService;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LibroPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    fn march() -> YearMonth {
        YearMonth::new(2025, 3).unwrap()
    }

    fn units(n: i64) -> Money {
        Money::from_units(n)
    }

    #[test]
    fn test_set_category_rules() {
        let (_temp, storage) = create_test_storage();
        let service = BudgetService::new(&storage);

        let not_expense = service.set_category(march(), "acc_sales", units(10));
        assert!(not_expense.unwrap_err().is_validation());

        let negative = service.set_category(march(), "acc_rent", units(-1));
        assert!(negative.unwrap_err().is_validation());

        service.set_category(march(), "acc_rent", units(500)).unwrap();
        let budget = service.set_category(march(), "Alquileres", units(600)).unwrap();
        assert_eq!(budget.categories.len(), 1);
        assert_eq!(budget.total(), units(600));
    }

    #[test]
    fn test_report_statuses_and_order() {
        let (_temp, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        service.set_category(march(), "acc_rent", units(1000)).unwrap();
        service.set_category(march(), "acc_marketing", units(100)).unwrap();
        service.set_category(march(), "acc_utilities", units(200)).unwrap();
        service.set_category(march(), "acc_supplies", Money::zero()).unwrap();

        let journal = JournalService::new(&storage);
        let day = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        journal.add_simple(day, "Rent", units(500), "acc_rent", "acc_bank").unwrap();
        journal.add_simple(day, "Ads", units(150), "acc_marketing", "acc_bank").unwrap();
        journal.add_simple(day, "Power", units(180), "acc_utilities", "acc_bank").unwrap();
        journal.add_simple(day, "Paper", units(5), "acc_supplies", "acc_cash").unwrap();
        // Outside the month
        journal
            .add_simple(NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(), "Rent", units(500), "acc_rent", "acc_bank")
            .unwrap();

        let report = service.report(march()).unwrap();
        let ids: Vec<_> = report.rows.iter().map(|r| r.account_id.as_str()).collect();
        assert_eq!(ids, vec!["acc_supplies", "acc_marketing", "acc_utilities", "acc_rent"]);

        assert_eq!(report.rows[0].status, BudgetStatus::Red);
        assert_eq!(report.rows[1].status, BudgetStatus::Red);
        assert_eq!(report.rows[2].status, BudgetStatus::Yellow);
        assert_eq!(report.rows[3].status, BudgetStatus::Green);
        assert_eq!(report.rows[3].actual, units(500));
        assert_eq!(report.total_actual, units(835));
        assert_eq!(report.over_budget().count(), 2);
    }

    #[test]
    fn test_copy_and_remove() {
        let (_temp, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        service.set_category(march(), "acc_rent", units(1000)).unwrap();

        let april = march().next();
        let copied = service.copy_month(march(), april).unwrap();
        assert_eq!(copied.budgeted_for("acc_rent"), Some(units(1000)));

        let removed = service.remove_category(april, "acc_rent").unwrap();
        assert!(removed.categories.is_empty());
        assert!(service.remove_category(april, "acc_rent").is_err());
        assert_eq!(service.list().unwrap().len(), 2);
    }
}
