//! Dashboard service
//!
//! One-screen summary of a month: results from the journal, liquid funds,
//! pending cash flow, partner balances, upcoming taxes and stock alerts.

use chrono::NaiveDate;

use crate::error::LibroResult;
use crate::models::account::account_type_of;
use crate::models::{AccountType, JournalEntry, Money, Side, YearMonth};
use crate::storage::Storage;

use super::{CashFlowService, InventoryService, JournalService, PartnerService, TaxService};

/// Income and expense of one month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthTotals {
    pub month: YearMonth,
    pub income: Money,
    pub expense: Money,
}

impl MonthTotals {
    pub fn balance(&self) -> Money {
        self.income - self.expense
    }
}

/// Everything the dashboard shows
#[derive(Debug, Clone)]
pub struct DashboardSummary {
    pub totals: MonthTotals,
    pub liquid_balance: Money,
    pub pending_income: Money,
    pub pending_expense: Money,
    pub receivables: Money,
    pub payables: Money,
    pub overdue_movements: usize,
    pub upcoming_taxes: Money,
    pub upcoming_tax_count: usize,
    pub overdue_tax_count: usize,
    pub low_stock_count: usize,
    pub entry_count: usize,
}

/// Service for the dashboard
pub struct DashboardService<'a> {
    storage: &'a Storage,
}

impl<'a> DashboardService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Income and expense posted in `month`
    pub fn month_totals(&self, month: YearMonth) -> LibroResult<MonthTotals> {
        let entries = self
            .storage
            .journal
            .get_by_date_range(month.first_day(), month.last_day())?;
        Ok(totals_of(month, &entries))
    }

    /// Summary of `month`; point-in-time figures are taken as of `today`
    pub fn summary(
        &self,
        month: YearMonth,
        today: NaiveDate,
        upcoming_days: i64,
    ) -> LibroResult<DashboardSummary> {
        let totals = self.month_totals(month)?;
        let liquid_balance = JournalService::new(self.storage).liquid_balance(today)?;
        let (pending_income, pending_expense) = CashFlowService::new(self.storage).pending_totals()?;
        let partners = PartnerService::new(self.storage).summaries(today)?;

        let taxes = TaxService::new(self.storage);
        let upcoming = taxes.upcoming(today, upcoming_days)?;
        let overdue_taxes = taxes.overdue(today)?;

        let low_stock_count = InventoryService::new(self.storage).low_stock()?.len();

        Ok(DashboardSummary {
            totals,
            liquid_balance,
            pending_income,
            pending_expense,
            receivables: partners.receivables,
            payables: partners.payables,
            overdue_movements: partners.overdue_count,
            upcoming_taxes: upcoming.iter().map(|o| o.amount).sum(),
            upcoming_tax_count: upcoming.len(),
            overdue_tax_count: overdue_taxes.len(),
            low_stock_count,
            entry_count: self.storage.journal.count()?,
        })
    }

    /// Totals of the `months` months ending with `end`, oldest first
    pub fn trend(&self, end: YearMonth, months: usize) -> LibroResult<Vec<MonthTotals>> {
        let mut periods = Vec::with_capacity(months);
        let mut month = end;
        for _ in 0..months {
            periods.push(month);
            month = month.prev();
        }
        periods.reverse();

        let Some(first) = periods.first() else {
            return Ok(Vec::new());
        };
        let entries = self
            .storage
            .journal
            .get_by_date_range(first.first_day(), end.last_day())?;

        Ok(periods
            .into_iter()
            .map(|m| {
                let in_month: Vec<JournalEntry> = entries
                    .iter()
                    .filter(|e| m.contains(e.date))
                    .cloned()
                    .collect();
                totals_of(m, &in_month)
            })
            .collect())
    }
}

/// Credits to income accounts and debits to expense accounts
fn totals_of(month: YearMonth, entries: &[JournalEntry]) -> MonthTotals {
    let mut income = Money::zero();
    let mut expense = Money::zero();
    for entry in entries {
        for (side, posting) in entry.postings_with_side() {
            match (account_type_of(&posting.account_id), side) {
                (Some(AccountType::Income), Side::Credit) => income += posting.amount,
                (Some(AccountType::Expense), Side::Debit) => expense += posting.amount,
                _ => {}
            }
        }
    }
    MonthTotals {
        month,
        income,
        expense,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LibroPaths;
    use crate::models::{FlowKind, Posting};
    use crate::services::partner::{NewMovement, PartnerDetails};
    use crate::models::{MovementKind, PartnerKind};
    use crate::storage::initialize_storage;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LibroPaths::with_base_dir(temp_dir.path().to_path_buf());
        initialize_storage(&paths).unwrap();
        let storage = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    fn d(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, month, day).unwrap()
    }

    fn units(n: i64) -> Money {
        Money::from_units(n)
    }

    #[test]
    fn test_single_sale_month() {
        let (_temp, storage) = create_test_storage();
        JournalService::new(&storage)
            .add_simple(d(4, 2), "Sale", units(1000), "acc_bank", "acc_sales")
            .unwrap();

        let dashboard = DashboardService::new(&storage);
        let totals = dashboard.month_totals(YearMonth::of(d(4, 2))).unwrap();
        assert_eq!(totals.income, units(1000));
        assert_eq!(totals.expense, Money::zero());
        assert_eq!(totals.balance(), units(1000));
    }

    #[test]
    fn test_compound_entries_count_per_posting() {
        let (_temp, storage) = create_test_storage();
        JournalService::new(&storage)
            .add_compound(
                d(4, 3),
                "Mixed",
                vec![
                    Posting::new("acc_rent", units(300)),
                    Posting::new("acc_utilities", units(100)),
                    Posting::new("acc_bank", units(50)),
                ],
                vec![
                    Posting::new("acc_cash", units(400)),
                    Posting::new("acc_services", units(50)),
                ],
            )
            .unwrap();

        let totals = DashboardService::new(&storage)
            .month_totals(YearMonth::of(d(4, 3)))
            .unwrap();
        assert_eq!(totals.income, units(50));
        assert_eq!(totals.expense, units(400));
    }

    #[test]
    fn test_summary_collects_every_area() {
        let (_temp, storage) = create_test_storage();
        JournalService::new(&storage)
            .add_simple(d(4, 1), "Capital", units(5000), "acc_bank", "acc_capital")
            .unwrap();
        CashFlowService::new(&storage)
            .add(FlowKind::Expense, "Rent", units(300), d(4, 30), None, false)
            .unwrap();
        let partners = PartnerService::new(&storage);
        let client = partners
            .create("ACME", PartnerKind::Client, PartnerDetails::default())
            .unwrap();
        partners
            .record_movement(
                client.id,
                NewMovement {
                    kind: MovementKind::Invoice,
                    date: d(3, 1),
                    amount: units(700),
                    due_date: Some(d(3, 31)),
                    reference: "A-1".into(),
                    description: String::new(),
                },
            )
            .unwrap();
        TaxService::new(&storage)
            .add_obligation("IVA", YearMonth::of(d(3, 1)), units(210), None, None)
            .unwrap();

        let summary = DashboardService::new(&storage)
            .summary(YearMonth::of(d(4, 1)), d(4, 10), 30)
            .unwrap();
        assert_eq!(summary.liquid_balance, units(5000));
        assert_eq!(summary.pending_expense, units(300));
        assert_eq!(summary.receivables, units(700));
        assert_eq!(summary.overdue_movements, 1);
        assert_eq!(summary.upcoming_tax_count, 1);
        assert_eq!(summary.upcoming_taxes, units(210));
        assert_eq!(summary.entry_count, 1);
    }

    #[test]
    fn test_trend_is_oldest_first() {
        let (_temp, storage) = create_test_storage();
        let journal = JournalService::new(&storage);
        journal
            .add_simple(d(2, 1), "Sale", units(100), "acc_cash", "acc_sales")
            .unwrap();
        journal
            .add_simple(d(4, 1), "Rent", units(40), "acc_rent", "acc_cash")
            .unwrap();

        let trend = DashboardService::new(&storage)
            .trend(YearMonth::of(d(4, 1)), 3)
            .unwrap();
        assert_eq!(trend.len(), 3);
        assert_eq!(trend[0].month, YearMonth::of(d(2, 1)));
        assert_eq!(trend[0].income, units(100));
        assert_eq!(trend[1].income, Money::zero());
        assert_eq!(trend[2].expense, units(40));
    }
}
