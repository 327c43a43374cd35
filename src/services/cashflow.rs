//! Cash-flow service
//!
//! Planned incomes and expenses, and the projection of the liquid balance
//! over the pending ones.

use chrono::{NaiveDate, Utc};

use crate::audit::EntityType;
use crate::error::{LibroError, LibroResult};
use crate::models::{CashFlowId, CashFlowItem, FlowKind, FlowStatus, Money};
use crate::storage::Storage;

use super::journal::JournalService;

/// Options for filtering cash-flow items
#[derive(Debug, Clone, Default)]
pub struct CashFlowFilter {
    pub kind: Option<FlowKind>,
    pub status: Option<FlowStatus>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Field changes for [`CashFlowService::update`]
#[derive(Debug, Clone, Default)]
pub struct CashFlowUpdate {
    pub description: Option<String>,
    pub amount: Option<Money>,
    pub date: Option<NaiveDate>,
    pub category: Option<String>,
    pub is_recurring: Option<bool>,
}

/// One row of the projection
#[derive(Debug, Clone)]
pub struct ProjectionPoint {
    pub item: CashFlowItem,
    /// Estimated liquid balance once this item settles
    pub balance: Money,
}

/// Projected liquid balance over the pending items
#[derive(Debug, Clone)]
pub struct Projection {
    pub today: NaiveDate,
    pub start_balance: Money,
    pub points: Vec<ProjectionPoint>,
    pub final_balance: Money,
    pub pending_income: Money,
    pub pending_expense: Money,
}

/// Service for planned cash movements
pub struct CashFlowService<'a> {
    storage: &'a Storage,
}

impl<'a> CashFlowService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn add(
        &self,
        kind: FlowKind,
        description: &str,
        amount: Money,
        date: NaiveDate,
        category: Option<&str>,
        is_recurring: bool,
    ) -> LibroResult<CashFlowItem> {
        let mut item = CashFlowItem::new(kind, description.trim(), amount, date);
        item.category = category.map(|c| c.trim().to_string()).unwrap_or_default();
        item.is_recurring = is_recurring;

        item.validate().map_err(LibroError::Validation)?;

        self.storage.cash_flow.upsert(item.clone())?;
        self.storage.cash_flow.save()?;

        self.storage.log_create(
            EntityType::CashFlowItem,
            item.id.to_string(),
            Some(item.description.clone()),
            &item,
        )?;

        tracing::info!(id = %item.id, kind = %item.kind, amount = %item.amount, "cash-flow item added");
        Ok(item)
    }

    pub fn get(&self, id: CashFlowId) -> LibroResult<Option<CashFlowItem>> {
        self.storage.cash_flow.get(id)
    }

    pub fn find(&self, identifier: &str) -> LibroResult<CashFlowItem> {
        self.storage
            .cash_flow
            .find(identifier)?
            .ok_or_else(|| LibroError::cash_flow_not_found(identifier))
    }

    /// Items in date order
    pub fn list(&self, filter: &CashFlowFilter) -> LibroResult<Vec<CashFlowItem>> {
        Ok(self
            .storage
            .cash_flow
            .get_all()?
            .into_iter()
            .filter(|i| filter.kind.map_or(true, |k| i.kind == k))
            .filter(|i| filter.status.map_or(true, |s| i.status == s))
            .filter(|i| filter.from.map_or(true, |f| i.date >= f))
            .filter(|i| filter.to.map_or(true, |t| i.date <= t))
            .collect())
    }

    pub fn update(&self, id: CashFlowId, changes: CashFlowUpdate) -> LibroResult<CashFlowItem> {
        let mut item = self.require(id)?;
        let before = item.clone();

        if let Some(description) = changes.description {
            item.description = description.trim().to_string();
        }
        if let Some(amount) = changes.amount {
            item.amount = amount;
        }
        if let Some(date) = changes.date {
            item.date = date;
        }
        if let Some(category) = changes.category {
            item.category = category.trim().to_string();
        }
        if let Some(recurring) = changes.is_recurring {
            item.is_recurring = recurring;
        }
        item.updated_at = Utc::now();

        item.validate().map_err(LibroError::Validation)?;
        self.save_update(&before, &item)?;
        Ok(item)
    }

    /// Flip pending/realized
    pub fn toggle_status(&self, id: CashFlowId) -> LibroResult<CashFlowItem> {
        let mut item = self.require(id)?;
        let before = item.clone();
        item.toggle_status();

        self.save_update(&before, &item)?;
        tracing::debug!(id = %item.id, status = %item.status, "cash-flow status toggled");
        Ok(item)
    }

    pub fn delete(&self, id: CashFlowId) -> LibroResult<CashFlowItem> {
        let item = self.require(id)?;

        self.storage.cash_flow.delete(id)?;
        self.storage.cash_flow.save()?;

        self.storage.log_delete(
            EntityType::CashFlowItem,
            item.id.to_string(),
            Some(item.description.clone()),
            &item,
        )?;
        Ok(item)
    }

    /// Project the liquid balance forward over pending items dated today or later
    pub fn projection(&self, today: NaiveDate) -> LibroResult<Projection> {
        let start_balance = JournalService::new(self.storage).liquid_balance(today)?;

        // get_all is already in stable date order
        let upcoming = self
            .storage
            .cash_flow
            .get_all()?
            .into_iter()
            .filter(|i| i.is_pending() && i.date >= today);

        let mut balance = start_balance;
        let mut pending_income = Money::zero();
        let mut pending_expense = Money::zero();
        let mut points = Vec::new();

        for item in upcoming {
            match item.kind {
                FlowKind::Income => pending_income += item.amount,
                FlowKind::Expense => pending_expense += item.amount,
            }
            balance += item.signed_amount();
            points.push(ProjectionPoint { item, balance });
        }

        Ok(Projection {
            today,
            start_balance,
            points,
            final_balance: balance,
            pending_income,
            pending_expense,
        })
    }

    /// Pending items dated before today
    pub fn overdue(&self, today: NaiveDate) -> LibroResult<Vec<CashFlowItem>> {
        Ok(self
            .storage
            .cash_flow
            .get_all()?
            .into_iter()
            .filter(|i| i.is_pending() && i.date < today)
            .collect())
    }

    /// Totals of pending incomes and expenses, regardless of date
    pub fn pending_totals(&self) -> LibroResult<(Money, Money)> {
        let mut income = Money::zero();
        let mut expense = Money::zero();
        for item in self.storage.cash_flow.get_all()? {
            if !item.is_pending() {
                continue;
            }
            match item.kind {
                FlowKind::Income => income += item.amount,
                FlowKind::Expense => expense += item.amount,
            }
        }
        Ok((income, expense))
    }

    fn require(&self, id: CashFlowId) -> LibroResult<CashFlowItem> {
        self.storage
            .cash_flow
            .get(id)?
            .ok_or_else(|| LibroError::cash_flow_not_found(id.to_string()))
    }

    fn save_update(&self, before: &CashFlowItem, after: &CashFlowItem) -> LibroResult<()> {
        self.storage.cash_flow.upsert(after.clone())?;
        self.storage.cash_flow.save()?;
        self.storage.log_update(
            EntityType::CashFlowItem,
            after.id.to_string(),
            Some(after.description.clone()),
            before,
            after,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LibroPaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LibroPaths::with_base_dir(temp_dir.path().to_path_buf());
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
    fn test_add_validates() {
        let (_temp, storage) = create_test_storage();
        let service = CashFlowService::new(&storage);

        assert!(service
            .add(FlowKind::Income, "", units(10), d(1, 1), None, false)
            .is_err());
        assert!(service
            .add(FlowKind::Income, "Invoice", Money::zero(), d(1, 1), None, false)
            .is_err());

        let item = service
            .add(FlowKind::Income, "Invoice", units(10), d(1, 1), Some("sales"), true)
            .unwrap();
        assert_eq!(item.category, "sales");
        assert!(item.is_pending());
    }

    #[test]
    fn test_toggle_keeps_amount_and_date() {
        let (_temp, storage) = create_test_storage();
        let service = CashFlowService::new(&storage);
        let item = service
            .add(FlowKind::Expense, "Rent", units(300), d(3, 1), None, false)
            .unwrap();

        let toggled = service.toggle_status(item.id).unwrap();
        assert_eq!(toggled.status, FlowStatus::Realized);
        assert_eq!(toggled.amount, item.amount);
        assert_eq!(toggled.date, item.date);

        let back = service.toggle_status(item.id).unwrap();
        assert_eq!(back.status, FlowStatus::Pending);
    }

    #[test]
    fn test_projection() {
        let (_temp, storage) = create_test_storage();
        JournalService::new(&storage)
            .add_simple(d(1, 1), "Capital", units(1000), "acc_bank", "acc_capital")
            .unwrap();

        let service = CashFlowService::new(&storage);
        // Inserted out of order on purpose
        service
            .add(FlowKind::Expense, "Rent", units(400), d(2, 10), None, false)
            .unwrap();
        service
            .add(FlowKind::Income, "Invoice", units(250), d(2, 5), None, false)
            .unwrap();
        service
            .add(FlowKind::Income, "Old invoice", units(99), d(1, 5), None, false)
            .unwrap();
        let realized = service
            .add(FlowKind::Expense, "Paid", units(50), d(2, 7), None, false)
            .unwrap();
        service.toggle_status(realized.id).unwrap();

        let projection = service.projection(d(2, 1)).unwrap();
        assert_eq!(projection.start_balance, units(1000));
        assert_eq!(projection.points.len(), 2);
        assert_eq!(projection.points[0].item.description, "Invoice");
        assert_eq!(projection.points[0].balance, units(1250));
        assert_eq!(projection.points[1].balance, units(850));
        assert_eq!(projection.final_balance, units(850));
        assert_eq!(
            projection.final_balance,
            projection.start_balance + projection.pending_income - projection.pending_expense
        );

        let overdue = service.overdue(d(2, 1)).unwrap();
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].description, "Old invoice");
    }

    #[test]
    fn test_update_and_delete() {
        let (_temp, storage) = create_test_storage();
        let service = CashFlowService::new(&storage);
        let item = service
            .add(FlowKind::Expense, "Rent", units(300), d(3, 1), None, false)
            .unwrap();

        let updated = service
            .update(
                item.id,
                CashFlowUpdate {
                    amount: Some(units(350)),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.amount, units(350));
        assert_eq!(updated.description, "Rent");

        let bad = service.update(
            item.id,
            CashFlowUpdate {
                amount: Some(Money::zero()),
                ..Default::default()
            },
        );
        assert!(bad.is_err());

        service.delete(item.id).unwrap();
        assert!(service.get(item.id).unwrap().is_none());
    }

    #[test]
    fn test_filter() {
        let (_temp, storage) = create_test_storage();
        let service = CashFlowService::new(&storage);
        service
            .add(FlowKind::Expense, "Rent", units(300), d(3, 1), None, false)
            .unwrap();
        service
            .add(FlowKind::Income, "Invoice", units(100), d(3, 2), None, false)
            .unwrap();

        let incomes = service
            .list(&CashFlowFilter {
                kind: Some(FlowKind::Income),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(incomes.len(), 1);
        assert_eq!(service.pending_totals().unwrap(), (units(100), units(300)));
    }
}
