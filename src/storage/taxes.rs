//! Tax configuration and obligation repository
//!
//! Both collections live in taxes.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::LibroError;
use crate::models::{TaxConfig, TaxObligation, TaxObligationId};

use super::file_io::{read_json, write_json_atomic};
use super::{read_lock_err, write_lock_err};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct TaxData {
    #[serde(default)]
    pub configs: Vec<TaxConfig>,
    #[serde(default)]
    pub obligations: Vec<TaxObligation>,
}

/// Repository for tax configs (keyed by code) and obligations
pub struct TaxRepository {
    path: PathBuf,
    configs: RwLock<Vec<TaxConfig>>,
    obligations: RwLock<HashMap<TaxObligationId, TaxObligation>>,
}

impl TaxRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            configs: RwLock::new(Vec::new()),
            obligations: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), LibroError> {
        let file_data: TaxData = read_json(&self.path)?;
        self.replace_all(file_data.configs, file_data.obligations)
    }

    pub fn save(&self) -> Result<(), LibroError> {
        let file_data = TaxData {
            configs: self.get_configs()?,
            obligations: self.get_all_obligations()?,
        };
        write_json_atomic(&self.path, &file_data)
    }

    /// Configs in table order
    pub fn get_configs(&self) -> Result<Vec<TaxConfig>, LibroError> {
        let configs = self.configs.read().map_err(read_lock_err)?;
        Ok(configs.clone())
    }

    /// Case-insensitive code lookup
    pub fn get_config(&self, code: &str) -> Result<Option<TaxConfig>, LibroError> {
        let configs = self.configs.read().map_err(read_lock_err)?;
        Ok(configs
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(code.trim()))
            .cloned())
    }

    /// Replace the config with the same code, or append it
    pub fn upsert_config(&self, config: TaxConfig) -> Result<(), LibroError> {
        let mut configs = self.configs.write().map_err(write_lock_err)?;
        match configs
            .iter_mut()
            .find(|c| c.code.eq_ignore_ascii_case(&config.code))
        {
            Some(existing) => *existing = config,
            None => configs.push(config),
        }
        Ok(())
    }

    pub fn get_obligation(&self, id: TaxObligationId) -> Result<Option<TaxObligation>, LibroError> {
        let obligations = self.obligations.read().map_err(read_lock_err)?;
        Ok(obligations.get(&id).cloned())
    }

    pub fn find_obligation(&self, identifier: &str) -> Result<Option<TaxObligation>, LibroError> {
        let obligations = self.obligations.read().map_err(read_lock_err)?;
        Ok(obligations
            .values()
            .find(|o| o.id.matches(identifier))
            .cloned())
    }

    /// All obligations by due date
    pub fn get_all_obligations(&self) -> Result<Vec<TaxObligation>, LibroError> {
        let obligations = self.obligations.read().map_err(read_lock_err)?;
        let mut list: Vec<_> = obligations.values().cloned().collect();
        list.sort_by(|a, b| {
            a.due_date
                .cmp(&b.due_date)
                .then(a.tax_code.cmp(&b.tax_code))
                .then(a.created_at.cmp(&b.created_at))
        });
        Ok(list)
    }

    pub fn upsert_obligation(&self, obligation: TaxObligation) -> Result<(), LibroError> {
        let mut obligations = self.obligations.write().map_err(write_lock_err)?;
        obligations.insert(obligation.id, obligation);
        Ok(())
    }

    pub fn delete_obligation(&self, id: TaxObligationId) -> Result<bool, LibroError> {
        let mut obligations = self.obligations.write().map_err(write_lock_err)?;
        Ok(obligations.remove(&id).is_some())
    }

    pub fn replace_all(
        &self,
        configs: Vec<TaxConfig>,
        obligations: Vec<TaxObligation>,
    ) -> Result<(), LibroError> {
        let mut config_list = self.configs.write().map_err(write_lock_err)?;
        let mut obligation_map = self.obligations.write().map_err(write_lock_err)?;
        *config_list = configs;
        obligation_map.clear();
        obligation_map.extend(obligations.into_iter().map(|o| (o.id, o)));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{default_tax_configs, Money, YearMonth};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_upsert_config_by_code() {
        let temp_dir = TempDir::new().unwrap();
        let repo = TaxRepository::new(temp_dir.path().join("taxes.json"));
        repo.replace_all(default_tax_configs(), Vec::new()).unwrap();

        let mut iibb = repo.get_config("iibb").unwrap().unwrap();
        iibb.rate_bps = 500;
        repo.upsert_config(iibb).unwrap();

        assert_eq!(repo.get_configs().unwrap().len(), default_tax_configs().len());
        assert_eq!(repo.get_config("IIBB").unwrap().unwrap().rate_bps, 500);
    }

    #[test]
    fn test_obligations_round_trip_sorted() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("taxes.json");
        let repo = TaxRepository::new(path.clone());
        let period = YearMonth::new(2025, 1).unwrap();

        let late = TaxObligation::new(
            "IVA",
            period,
            NaiveDate::from_ymd_opt(2025, 2, 20).unwrap(),
            Money::from_units(10),
        );
        let early = TaxObligation::new(
            "IIBB",
            period,
            NaiveDate::from_ymd_opt(2025, 2, 15).unwrap(),
            Money::from_units(5),
        );
        repo.upsert_obligation(late).unwrap();
        repo.upsert_obligation(early.clone()).unwrap();
        repo.save().unwrap();

        let reloaded = TaxRepository::new(path);
        reloaded.load().unwrap();
        assert_eq!(reloaded.get_all_obligations().unwrap()[0].id, early.id);
    }
}
