//! Tax service
//!
//! The tax table, the obligations owed for each period, and the monthly VAT
//! position computed from the journal.

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::error::{LibroError, LibroResult};
use crate::models::account::{VAT_CREDIT, VAT_PAYABLE};
use crate::models::{Money, ObligationStatus, Side, TaxConfig, TaxObligation, TaxObligationId, YearMonth};
use crate::storage::Storage;

/// Field changes for [`TaxService::set_config`]
#[derive(Debug, Clone, Default)]
pub struct TaxConfigUpdate {
    pub name: Option<String>,
    pub rate_bps: Option<u32>,
    pub jurisdiction: Option<String>,
    pub due_day: Option<u32>,
}

/// Options for filtering obligations
#[derive(Debug, Clone, Default)]
pub struct ObligationFilter {
    pub tax_code: Option<String>,
    pub period: Option<YearMonth>,
    pub status: Option<ObligationStatus>,
}

/// VAT charged vs VAT paid for one month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VatPosition {
    pub month: YearMonth,
    /// Credits posted to the VAT payable account
    pub debit_vat: Money,
    /// Debits posted to the VAT credit account
    pub credit_vat: Money,
}

impl VatPosition {
    /// Positive when VAT is owed, negative when there is a credit balance
    pub fn net(&self) -> Money {
        self.debit_vat - self.credit_vat
    }
}

/// Service for taxes
pub struct TaxService<'a> {
    storage: &'a Storage,
}

impl<'a> TaxService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn configs(&self) -> LibroResult<Vec<TaxConfig>> {
        self.storage.taxes.get_configs()
    }

    pub fn config(&self, code: &str) -> LibroResult<TaxConfig> {
        self.storage
            .taxes
            .get_config(code)?
            .ok_or_else(|| LibroError::tax_not_found(code))
    }

    /// Edit a tax, or add it when the code is new (a name is then required)
    pub fn set_config(&self, code: &str, changes: TaxConfigUpdate) -> LibroResult<TaxConfig> {
        let code = code.trim().to_uppercase();
        let existing = self.storage.taxes.get_config(&code)?;

        let mut config = match &existing {
            Some(config) => config.clone(),
            None => {
                let name = changes.name.clone().ok_or_else(|| {
                    LibroError::Validation(format!("New tax {} needs a name", code))
                })?;
                TaxConfig::new(&code, name.trim(), 0, "", 20)
            }
        };

        if let Some(name) = changes.name {
            config.name = name.trim().to_string();
        }
        if let Some(rate) = changes.rate_bps {
            config.rate_bps = rate;
        }
        if let Some(jurisdiction) = changes.jurisdiction {
            config.jurisdiction = jurisdiction.trim().to_string();
        }
        if let Some(day) = changes.due_day {
            config.due_day = day;
        }
        config.validate().map_err(LibroError::Validation)?;

        self.storage.taxes.upsert_config(config.clone())?;
        self.storage.taxes.save()?;

        match existing {
            Some(before) => self.storage.log_update(
                EntityType::TaxConfig,
                config.code.clone(),
                Some(config.name.clone()),
                &before,
                &config,
            )?,
            None => self.storage.log_create(
                EntityType::TaxConfig,
                config.code.clone(),
                Some(config.name.clone()),
                &config,
            )?,
        }

        tracing::info!(code = %config.code, rate_bps = config.rate_bps, "tax config saved");
        Ok(config)
    }

    /// Register an obligation; without a due date the tax's default applies
    pub fn add_obligation(
        &self,
        tax_code: &str,
        period: YearMonth,
        amount: Money,
        due_date: Option<NaiveDate>,
        notes: Option<&str>,
    ) -> LibroResult<TaxObligation> {
        let config = self.config(tax_code)?;
        if amount.is_negative() {
            return Err(LibroError::Validation(
                "Obligation amount cannot be negative".into(),
            ));
        }

        let due = due_date.unwrap_or_else(|| config.due_date_for(period));
        let mut obligation = TaxObligation::new(config.code.clone(), period, due, amount);
        obligation.notes = notes.map(|n| n.trim().to_string()).unwrap_or_default();

        self.storage.taxes.upsert_obligation(obligation.clone())?;
        self.storage.taxes.save()?;
        self.storage.log_create(
            EntityType::TaxObligation,
            obligation.id.to_string(),
            Some(format!("{} {}", obligation.tax_code, obligation.period)),
            &obligation,
        )?;

        tracing::info!(code = %obligation.tax_code, %period, %amount, %due, "tax obligation added");
        Ok(obligation)
    }

    pub fn find_obligation(&self, identifier: &str) -> LibroResult<TaxObligation> {
        self.storage
            .taxes
            .find_obligation(identifier)?
            .ok_or_else(|| LibroError::tax_not_found(identifier))
    }

    pub fn mark_paid(&self, id: TaxObligationId, date: NaiveDate) -> LibroResult<TaxObligation> {
        self.change(id, |o| o.mark_paid(date))
    }

    pub fn reopen(&self, id: TaxObligationId) -> LibroResult<TaxObligation> {
        self.change(id, TaxObligation::reopen)
    }

    fn change<F>(&self, id: TaxObligationId, apply: F) -> LibroResult<TaxObligation>
    where
        F: FnOnce(&mut TaxObligation),
    {
        let mut obligation = self.require(id)?;
        let before = obligation.clone();
        apply(&mut obligation);

        self.storage.taxes.upsert_obligation(obligation.clone())?;
        self.storage.taxes.save()?;
        self.storage.log_update(
            EntityType::TaxObligation,
            obligation.id.to_string(),
            Some(format!("{} {}", obligation.tax_code, obligation.period)),
            &before,
            &obligation,
        )?;
        Ok(obligation)
    }

    pub fn delete_obligation(&self, id: TaxObligationId) -> LibroResult<TaxObligation> {
        let obligation = self.require(id)?;
        self.storage.taxes.delete_obligation(id)?;
        self.storage.taxes.save()?;
        self.storage.log_delete(
            EntityType::TaxObligation,
            obligation.id.to_string(),
            Some(format!("{} {}", obligation.tax_code, obligation.period)),
            &obligation,
        )?;
        Ok(obligation)
    }

    /// Obligations by due date
    pub fn list(&self, filter: &ObligationFilter) -> LibroResult<Vec<TaxObligation>> {
        Ok(self
            .storage
            .taxes
            .get_all_obligations()?
            .into_iter()
            .filter(|o| {
                filter
                    .tax_code
                    .as_ref()
                    .map_or(true, |c| o.tax_code.eq_ignore_ascii_case(c))
            })
            .filter(|o| filter.period.map_or(true, |p| o.period == p))
            .filter(|o| filter.status.map_or(true, |s| o.status == s))
            .collect())
    }

    /// Pending obligations due within `days` of today
    pub fn upcoming(&self, today: NaiveDate, days: i64) -> LibroResult<Vec<TaxObligation>> {
        Ok(self
            .storage
            .taxes
            .get_all_obligations()?
            .into_iter()
            .filter(|o| o.is_upcoming(today, days))
            .collect())
    }

    pub fn overdue(&self, today: NaiveDate) -> LibroResult<Vec<TaxObligation>> {
        Ok(self
            .storage
            .taxes
            .get_all_obligations()?
            .into_iter()
            .filter(|o| o.is_overdue(today))
            .collect())
    }

    pub fn vat_position(&self, month: YearMonth) -> LibroResult<VatPosition> {
        let entries = self
            .storage
            .journal
            .get_by_date_range(month.first_day(), month.last_day())?;

        Ok(VatPosition {
            month,
            debit_vat: entries
                .iter()
                .map(|e| e.amount_on(VAT_PAYABLE, Side::Credit))
                .sum(),
            credit_vat: entries
                .iter()
                .map(|e| e.amount_on(VAT_CREDIT, Side::Debit))
                .sum(),
        })
    }

    fn require(&self, id: TaxObligationId) -> LibroResult<TaxObligation> {
        self.storage
            .taxes
            .get_obligation(id)?
            .ok_or_else(|| LibroError::tax_not_found(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LibroPaths;
    use crate::models::Posting;
    use crate::services::JournalService;
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

    fn june() -> YearMonth {
        YearMonth::new(2025, 6).unwrap()
    }

    #[test]
    fn test_default_due_date() {
        let (_temp, storage) = create_test_storage();
        let service = TaxService::new(&storage);

        let obligation = service
            .add_obligation("iva", june(), Money::from_units(100), None, None)
            .unwrap();
        assert_eq!(obligation.tax_code, "IVA");
        assert_eq!(obligation.due_date, d(7, 20));

        assert!(service
            .add_obligation("NOPE", june(), Money::from_units(1), None, None)
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_upcoming_overdue_and_payment() {
        let (_temp, storage) = create_test_storage();
        let service = TaxService::new(&storage);
        let late = service
            .add_obligation("IIBB", june(), Money::from_units(50), Some(d(7, 1)), None)
            .unwrap();
        service
            .add_obligation("IVA", june(), Money::from_units(100), None, None)
            .unwrap();

        let today = d(7, 5);
        assert_eq!(service.overdue(today).unwrap().len(), 1);
        assert_eq!(service.upcoming(today, 30).unwrap().len(), 1);
        assert!(service.upcoming(today, 10).unwrap().is_empty());

        let paid = service.mark_paid(late.id, today).unwrap();
        assert_eq!(paid.paid_date, Some(today));
        assert!(service.overdue(today).unwrap().is_empty());

        let reopened = service.reopen(late.id).unwrap();
        assert!(reopened.paid_date.is_none());

        let pending = service
            .list(&ObligationFilter {
                status: Some(ObligationStatus::Pending),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(pending.len(), 2);
    }

    #[test]
    fn test_set_config() {
        let (_temp, storage) = create_test_storage();
        let service = TaxService::new(&storage);

        let iva = service
            .set_config(
                "IVA",
                TaxConfigUpdate {
                    rate_bps: Some(1050),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(iva.rate_bps, 1050);

        assert!(service.set_config("TSH", TaxConfigUpdate::default()).is_err());
        let new = service
            .set_config(
                "tsh",
                TaxConfigUpdate {
                    name: Some("Tasa de seguridad e higiene".into()),
                    due_day: Some(31),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(new.code, "TSH");

        let bad_day = service.set_config(
            "TSH",
            TaxConfigUpdate {
                due_day: Some(0),
                ..Default::default()
            },
        );
        assert!(bad_day.is_err());
    }

    #[test]
    fn test_vat_position() {
        let (_temp, storage) = create_test_storage();
        let journal = JournalService::new(&storage);
        let units = Money::from_units;

        journal
            .add_compound(
                d(6, 3),
                "Sale with VAT",
                vec![Posting::new("acc_bank", units(1210))],
                vec![
                    Posting::new("acc_sales", units(1000)),
                    Posting::new("acc_vat_payable", units(210)),
                ],
            )
            .unwrap();
        journal
            .add_compound(
                d(6, 8),
                "Purchase with VAT",
                vec![
                    Posting::new("acc_supplies", units(400)),
                    Posting::new("acc_vat_credit", units(84)),
                ],
                vec![Posting::new("acc_bank", units(484))],
            )
            .unwrap();

        let position = TaxService::new(&storage).vat_position(june()).unwrap();
        assert_eq!(position.debit_vat, units(210));
        assert_eq!(position.credit_vat, units(84));
        assert_eq!(position.net(), units(126));
    }
}
