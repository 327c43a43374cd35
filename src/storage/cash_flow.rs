//! Cash-flow repository for JSON storage
//!
//! Manages loading and saving cash-flow items to cash_flow.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::LibroError;
use crate::models::{CashFlowId, CashFlowItem};

use super::file_io::{read_json, write_json_atomic};
use super::{read_lock_err, write_lock_err};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct CashFlowData {
    #[serde(default)]
    pub items: Vec<CashFlowItem>,
}

/// Repository for cash-flow item persistence
pub struct CashFlowRepository {
    path: PathBuf,
    data: RwLock<HashMap<CashFlowId, CashFlowItem>>,
}

impl CashFlowRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), LibroError> {
        let file_data: CashFlowData = read_json(&self.path)?;
        self.replace_all(file_data.items)
    }

    pub fn save(&self) -> Result<(), LibroError> {
        let items = self.get_all()?;
        write_json_atomic(&self.path, &CashFlowData { items })
    }

    pub fn get(&self, id: CashFlowId) -> Result<Option<CashFlowItem>, LibroError> {
        let data = self.data.read().map_err(read_lock_err)?;
        Ok(data.get(&id).cloned())
    }

    pub fn find(&self, identifier: &str) -> Result<Option<CashFlowItem>, LibroError> {
        let data = self.data.read().map_err(read_lock_err)?;
        Ok(data.values().find(|i| i.id.matches(identifier)).cloned())
    }

    /// All items by date; items on the same date keep their insertion order
    pub fn get_all(&self) -> Result<Vec<CashFlowItem>, LibroError> {
        let data = self.data.read().map_err(read_lock_err)?;
        let mut items: Vec<_> = data.values().cloned().collect();
        items.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));
        Ok(items)
    }

    pub fn upsert(&self, item: CashFlowItem) -> Result<(), LibroError> {
        let mut data = self.data.write().map_err(write_lock_err)?;
        data.insert(item.id, item);
        Ok(())
    }

    pub fn delete(&self, id: CashFlowId) -> Result<bool, LibroError> {
        let mut data = self.data.write().map_err(write_lock_err)?;
        Ok(data.remove(&id).is_some())
    }

    pub fn replace_all(&self, items: Vec<CashFlowItem>) -> Result<(), LibroError> {
        let mut data = self.data.write().map_err(write_lock_err)?;
        data.clear();
        data.extend(items.into_iter().map(|i| (i.id, i)));
        Ok(())
    }

    pub fn count(&self) -> Result<usize, LibroError> {
        let data = self.data.read().map_err(read_lock_err)?;
        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FlowKind, Money};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_round_trip_keeps_status() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cash_flow.json");
        let repo = CashFlowRepository::new(path.clone());

        let mut item = CashFlowItem::new(
            FlowKind::Income,
            "Client payment",
            Money::from_units(300),
            NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
        );
        item.toggle_status();
        repo.upsert(item.clone()).unwrap();
        repo.save().unwrap();

        let reloaded = CashFlowRepository::new(path);
        reloaded.load().unwrap();
        let loaded = reloaded.get(item.id).unwrap().unwrap();
        assert!(!loaded.is_pending());
        assert_eq!(loaded.amount, item.amount);
    }

    #[test]
    fn test_delete() {
        let temp_dir = TempDir::new().unwrap();
        let repo = CashFlowRepository::new(temp_dir.path().join("cash_flow.json"));
        let item = CashFlowItem::new(
            FlowKind::Expense,
            "Rent",
            Money::from_units(10),
            NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
        );
        repo.upsert(item.clone()).unwrap();
        assert!(repo.delete(item.id).unwrap());
        assert_eq!(repo.count().unwrap(), 0);
    }
}
