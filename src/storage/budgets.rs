//! Budget repository for JSON storage
//!
//! One [`MonthlyBudget`] per month, stored in budgets.json

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::LibroError;
use crate::models::{MonthlyBudget, YearMonth};

use super::file_io::{read_json, write_json_atomic};
use super::{read_lock_err, write_lock_err};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct BudgetData {
    #[serde(default)]
    pub budgets: Vec<MonthlyBudget>,
}

/// Repository for monthly budgets, keyed by month
pub struct BudgetRepository {
    path: PathBuf,
    data: RwLock<BTreeMap<YearMonth, MonthlyBudget>>,
}

impl BudgetRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), LibroError> {
        let file_data: BudgetData = read_json(&self.path)?;
        self.replace_all(file_data.budgets)
    }

    pub fn save(&self) -> Result<(), LibroError> {
        let budgets = self.get_all()?;
        write_json_atomic(&self.path, &BudgetData { budgets })
    }

    pub fn get(&self, month: YearMonth) -> Result<Option<MonthlyBudget>, LibroError> {
        let data = self.data.read().map_err(read_lock_err)?;
        Ok(data.get(&month).cloned())
    }

    /// All budgets, oldest month first
    pub fn get_all(&self) -> Result<Vec<MonthlyBudget>, LibroError> {
        let data = self.data.read().map_err(read_lock_err)?;
        Ok(data.values().cloned().collect())
    }

    /// Insert or replace the budget of its month
    pub fn upsert(&self, budget: MonthlyBudget) -> Result<(), LibroError> {
        let mut data = self.data.write().map_err(write_lock_err)?;
        data.insert(budget.month, budget);
        Ok(())
    }

    pub fn delete(&self, month: YearMonth) -> Result<bool, LibroError> {
        let mut data = self.data.write().map_err(write_lock_err)?;
        Ok(data.remove(&month).is_some())
    }

    /// Later duplicates of the same month win
    pub fn replace_all(&self, budgets: Vec<MonthlyBudget>) -> Result<(), LibroError> {
        let mut data = self.data.write().map_err(write_lock_err)?;
        data.clear();
        data.extend(budgets.into_iter().map(|b| (b.month, b)));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use tempfile::TempDir;

    #[test]
    fn test_upsert_replaces_same_month() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("budgets.json");
        let repo = BudgetRepository::new(path.clone());
        let may = YearMonth::new(2025, 5).unwrap();

        let mut first = MonthlyBudget::new(may);
        first.set_line("acc_rent", Money::from_units(100));
        repo.upsert(first).unwrap();

        let mut second = MonthlyBudget::new(may);
        second.set_line("acc_utilities", Money::from_units(50));
        repo.upsert(second).unwrap();
        repo.save().unwrap();

        let reloaded = BudgetRepository::new(path);
        reloaded.load().unwrap();
        let all = reloaded.get_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].budgeted_for("acc_utilities"), Some(Money::from_units(50)));
        assert_eq!(all[0].budgeted_for("acc_rent"), None);
    }

    #[test]
    fn test_months_are_ordered() {
        let temp_dir = TempDir::new().unwrap();
        let repo = BudgetRepository::new(temp_dir.path().join("budgets.json"));
        for m in [7, 2, 11] {
            repo.upsert(MonthlyBudget::new(YearMonth::new(2025, m).unwrap()))
                .unwrap();
        }
        let months: Vec<u32> = repo.get_all().unwrap().iter().map(|b| b.month.month()).collect();
        assert_eq!(months, vec![2, 7, 11]);
    }
}
