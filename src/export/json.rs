//! JSON Export functionality
//!
//! Exports every repository to one schema-versioned JSON document, and
//! restores such a document back into storage.

use std::collections::HashSet;
use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{LibroError, LibroResult};
use crate::models::account::find_account;
use crate::models::{
    CashFlowItem, JournalEntry, MonthlyBudget, Partner, PartnerMovement, Product, StockMovement,
    TaxConfig, TaxObligation,
};
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full database export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    #[serde(default)]
    pub journal: Vec<JournalEntry>,

    #[serde(default)]
    pub cash_flow: Vec<CashFlowItem>,

    #[serde(default)]
    pub budgets: Vec<MonthlyBudget>,

    #[serde(default)]
    pub partners: Vec<Partner>,

    #[serde(default)]
    pub partner_movements: Vec<PartnerMovement>,

    #[serde(default)]
    pub products: Vec<Product>,

    #[serde(default)]
    pub stock_movements: Vec<StockMovement>,

    #[serde(default)]
    pub tax_configs: Vec<TaxConfig>,

    #[serde(default)]
    pub tax_obligations: Vec<TaxObligation>,

    pub metadata: ExportMetadata,
}

/// Counts and date range, for reference only
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub entry_count: usize,
    pub cash_flow_count: usize,
    pub partner_count: usize,
    pub product_count: usize,
    pub obligation_count: usize,
    pub earliest_entry: Option<String>,
    pub latest_entry: Option<String>,
}

impl FullExport {
    /// Snapshot every repository
    pub fn from_storage(storage: &Storage) -> LibroResult<Self> {
        let journal = storage.journal.get_all()?;
        let cash_flow = storage.cash_flow.get_all()?;
        let budgets = storage.budgets.get_all()?;
        let partners = storage.partners.get_all()?;
        let partner_movements = storage.partners.get_all_movements()?;
        let products = storage.inventory.get_all()?;
        let stock_movements = storage.inventory.get_all_movements()?;
        let tax_configs = storage.taxes.get_configs()?;
        let tax_obligations = storage.taxes.get_all_obligations()?;

        let metadata = ExportMetadata {
            entry_count: journal.len(),
            cash_flow_count: cash_flow.len(),
            partner_count: partners.len(),
            product_count: products.len(),
            obligation_count: tax_obligations.len(),
            earliest_entry: journal.iter().map(|e| e.date).min().map(|d| d.to_string()),
            latest_entry: journal.iter().map(|e| e.date).max().map(|d| d.to_string()),
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            journal,
            cash_flow,
            budgets,
            partners,
            partner_movements,
            products,
            stock_movements,
            tax_configs,
            tax_obligations,
            metadata,
        })
    }

    /// Check the schema version and every cross reference
    pub fn validate(&self) -> Result<(), String> {
        let major = |v: &str| v.split('.').next().map(str::to_string);
        if major(&self.schema_version) != major(EXPORT_SCHEMA_VERSION) {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        for entry in &self.journal {
            for (_, posting) in entry.postings_with_side() {
                if find_account(&posting.account_id).is_none() {
                    return Err(format!(
                        "Entry {} references unknown account {}",
                        entry.id, posting.account_id
                    ));
                }
            }
        }

        let partner_ids: HashSet<_> = self.partners.iter().map(|p| p.id).collect();
        for movement in &self.partner_movements {
            if !partner_ids.contains(&movement.partner_id) {
                return Err(format!(
                    "Movement {} references unknown partner {}",
                    movement.id, movement.partner_id
                ));
            }
        }

        let product_ids: HashSet<_> = self.products.iter().map(|p| p.id).collect();
        for movement in &self.stock_movements {
            if !product_ids.contains(&movement.product_id) {
                return Err(format!(
                    "Stock movement {} references unknown product {}",
                    movement.id, movement.product_id
                ));
            }
        }

        let tax_codes: HashSet<_> = self.tax_configs.iter().map(|c| c.code.as_str()).collect();
        for obligation in &self.tax_obligations {
            if !tax_codes.contains(obligation.tax_code.as_str()) {
                return Err(format!(
                    "Obligation {} references unknown tax {}",
                    obligation.id, obligation.tax_code
                ));
            }
        }

        Ok(())
    }

    /// Replace the contents of storage with this export
    pub fn restore_into(self, storage: &Storage) -> LibroResult<()> {
        self.validate().map_err(LibroError::Import)?;

        storage.journal.replace_all(self.journal)?;
        storage.cash_flow.replace_all(self.cash_flow)?;
        storage.budgets.replace_all(self.budgets)?;
        storage.partners.replace_all(self.partners, self.partner_movements)?;
        storage.inventory.replace_all(self.products, self.stock_movements)?;
        storage.taxes.replace_all(self.tax_configs, self.tax_obligations)?;
        storage.save_all()?;

        tracing::info!(
            entries = self.metadata.entry_count,
            exported_at = %self.exported_at,
            "restored full export"
        );
        Ok(())
    }
}

/// Export the full database to JSON
pub fn export_full_json<W: Write>(storage: &Storage, writer: &mut W, pretty: bool) -> LibroResult<()> {
    let export = FullExport::from_storage(storage)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| LibroError::Export(e.to_string()))?;

    Ok(())
}

/// Parse and validate a JSON export
pub fn import_from_json(json_str: &str) -> LibroResult<FullExport> {
    let export: FullExport =
        serde_json::from_str(json_str).map_err(|e| LibroError::Import(e.to_string()))?;

    export.validate().map_err(LibroError::Import)?;

    Ok(export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LibroPaths;
    use crate::models::{Money, PartnerKind};
    use crate::services::{JournalService, NewMovement, PartnerDetails, PartnerService};
    use crate::storage::initialize_storage;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LibroPaths::with_base_dir(temp_dir.path().to_path_buf());
        initialize_storage(&paths).unwrap();
        let storage = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    fn seed(storage: &Storage) {
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        JournalService::new(storage)
            .add_simple(date, "Opening capital", Money::from_units(5000), "acc_bank", "acc_capital")
            .unwrap();
        let partners = PartnerService::new(storage);
        let client = partners
            .create("Acme", PartnerKind::Client, PartnerDetails::default())
            .unwrap();
        partners
            .record_movement(
                client.id,
                NewMovement {
                    kind: crate::models::MovementKind::Invoice,
                    date,
                    amount: Money::from_units(300),
                    due_date: None,
                    reference: "A-1".into(),
                    description: String::new(),
                },
            )
            .unwrap();
    }

    #[test]
    fn test_full_export() {
        let (_temp_dir, storage) = create_test_storage();
        seed(&storage);

        let export = FullExport::from_storage(&storage).unwrap();
        assert_eq!(export.schema_version, EXPORT_SCHEMA_VERSION);
        assert_eq!(export.journal.len(), 1);
        assert_eq!(export.partner_movements.len(), 1);
        assert!(!export.tax_configs.is_empty());
        assert_eq!(export.metadata.earliest_entry.as_deref(), Some("2025-03-10"));
        assert!(export.validate().is_ok());
    }

    #[test]
    fn test_json_roundtrip_restores() {
        let (_temp_dir, storage) = create_test_storage();
        seed(&storage);

        let mut json_output = Vec::new();
        export_full_json(&storage, &mut json_output, true).unwrap();
        let json_string = String::from_utf8(json_output).unwrap();

        let (_other_dir, target) = create_test_storage();
        import_from_json(&json_string).unwrap().restore_into(&target).unwrap();

        assert_eq!(target.journal.count().unwrap(), 1);
        assert_eq!(target.partners.get_all().unwrap()[0].name, "Acme");

        let reopened = Storage::open(target.paths().clone()).unwrap();
        assert_eq!(reopened.partners.get_all_movements().unwrap().len(), 1);
    }

    #[test]
    fn test_validate_catches_orphans() {
        let (_temp_dir, storage) = create_test_storage();
        seed(&storage);

        let mut export = FullExport::from_storage(&storage).unwrap();
        export.partners.clear();
        assert!(export.validate().unwrap_err().contains("unknown partner"));

        let mut export = FullExport::from_storage(&storage).unwrap();
        export.schema_version = "2.0.0".into();
        assert!(export.validate().is_err());
    }
}
