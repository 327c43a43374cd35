//! Legacy snapshot import
//!
//! Reads the single `AppState` JSON document written by the browser version
//! of the app (camelCase keys, floating amounts, string ids) and merges it
//! into the current data. Every record gets a fresh id; partner and product
//! references are remapped to the new ids. Missing fields and arrays fall
//! back to empty values.

use std::collections::HashMap;
use std::path::Path;

use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::audit::{AuditEntry, EntityType};
use crate::error::{LibroError, LibroResult};
use crate::models::account::find_account;
use crate::models::inventory::MAX_QUANTITY;
use crate::models::{
    CashFlowItem, FlowKind, FlowStatus, JournalEntry, Money, MonthlyBudget, MovementKind,
    MovementStatus, ObligationStatus, Partner, PartnerId, PartnerKind, PartnerMovement, Posting,
    Product, ProductId, StockMovement, StockMovementId, StockMovementKind, TaxConfig,
    TaxObligation, YearMonth,
};
use crate::storage::Storage;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegacyAppState {
    #[serde(alias = "journal", alias = "journalEntries")]
    pub entries: Vec<LegacyEntry>,
    #[serde(alias = "cashFlowItems")]
    pub cash_flow: Vec<LegacyCashFlow>,
    pub budgets: Vec<LegacyBudget>,
    pub partners: Vec<LegacyPartner>,
    #[serde(alias = "movements")]
    pub partner_movements: Vec<LegacyPartnerMovement>,
    pub tax_configs: Vec<LegacyTaxConfig>,
    pub tax_obligations: Vec<LegacyTaxObligation>,
    pub products: Vec<LegacyProduct>,
    pub stock_movements: Vec<LegacyStockMovement>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegacyPart {
    pub account_id: String,
    pub amount: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegacyEntry {
    pub id: String,
    pub date: String,
    pub description: String,
    pub amount: f64,
    pub debit_account: Option<String>,
    pub credit_account: Option<String>,
    pub debit_parts: Vec<LegacyPart>,
    pub credit_parts: Vec<LegacyPart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegacyCashFlow {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub amount: f64,
    pub date: String,
    pub category: String,
    pub is_recurring: bool,
    pub status: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegacyBudgetLine {
    pub account_id: String,
    pub budgeted: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegacyBudget {
    pub month: String,
    pub categories: Vec<LegacyBudgetLine>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegacyPartner {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(alias = "cuit")]
    pub tax_id: String,
    pub email: String,
    pub phone: String,
    pub credit_days: u32,
    pub credit_limit: Option<f64>,
    pub notes: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegacyPartnerMovement {
    pub partner_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub date: String,
    pub due_date: Option<String>,
    pub amount: f64,
    pub reference: String,
    pub description: String,
    pub status: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegacyTaxConfig {
    #[serde(alias = "id")]
    pub code: String,
    pub name: String,
    /// Percentage, e.g. `21` or `3.5`
    pub rate: f64,
    pub jurisdiction: String,
    pub due_day: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegacyTaxObligation {
    #[serde(alias = "taxId")]
    pub tax_code: String,
    pub period: String,
    pub due_date: String,
    pub amount: f64,
    pub status: String,
    pub paid_date: Option<String>,
    pub notes: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegacyProduct {
    pub id: String,
    #[serde(alias = "code")]
    pub sku: String,
    pub name: String,
    pub category: String,
    pub unit: String,
    pub cost: f64,
    pub price: f64,
    pub stock: f64,
    pub min_stock: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegacyStockMovement {
    pub product_id: String,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub qty_in: f64,
    pub qty_out: f64,
    pub unit_cost: Option<f64>,
    pub resulting_stock: f64,
    pub notes: String,
}

/// Counts and warnings of a completed import
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub entries: usize,
    pub cash_flow: usize,
    pub budgets: usize,
    pub partners: usize,
    pub movements: usize,
    pub tax_configs: usize,
    pub obligations: usize,
    pub products: usize,
    pub stock_movements: usize,
    /// Records skipped or imported with problems
    pub warnings: Vec<String>,
}

impl ImportResult {
    pub fn total(&self) -> usize {
        self.entries
            + self.cash_flow
            + self.budgets
            + self.partners
            + self.movements
            + self.tax_configs
            + self.obligations
            + self.products
            + self.stock_movements
    }
}

/// Service for importing legacy snapshots
pub struct ImportService<'a> {
    storage: &'a Storage,
}

impl<'a> ImportService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn import_file(&self, path: &Path) -> LibroResult<ImportResult> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| LibroError::Import(format!("Failed to read {}: {}", path.display(), e)))?;
        self.import_str(&contents)
    }

    pub fn import_str(&self, contents: &str) -> LibroResult<ImportResult> {
        let state: LegacyAppState = serde_json::from_str(contents)
            .map_err(|e| LibroError::Import(format!("Not a valid snapshot: {}", e)))?;
        self.import_state(state)
    }

    /// Merge a parsed snapshot into storage
    pub fn import_state(&self, state: LegacyAppState) -> LibroResult<ImportResult> {
        let mut result = ImportResult::default();
        let mut audit = Vec::new();

        self.import_entries(state.entries, &mut result, &mut audit)?;
        self.import_cash_flow(state.cash_flow, &mut result, &mut audit)?;
        self.import_budgets(state.budgets, &mut result, &mut audit)?;
        let partner_ids = self.import_partners(state.partners, &mut result, &mut audit)?;
        self.import_movements(state.partner_movements, &partner_ids, &mut result, &mut audit)?;
        self.import_taxes(state.tax_configs, state.tax_obligations, &mut result, &mut audit)?;
        let product_ids = self.import_products(state.products, &mut result, &mut audit)?;
        self.import_stock(state.stock_movements, &product_ids, &mut result, &mut audit)?;

        self.storage.save_all()?;
        self.storage.audit().log_batch(&audit)?;

        for warning in &result.warnings {
            tracing::warn!(%warning, "legacy import");
        }
        tracing::info!(records = result.total(), warnings = result.warnings.len(), "legacy snapshot imported");
        Ok(result)
    }

    fn import_entries(
        &self,
        entries: Vec<LegacyEntry>,
        result: &mut ImportResult,
        audit: &mut Vec<AuditEntry>,
    ) -> LibroResult<()> {
        for legacy in entries {
            let Some(date) = parse_date(&legacy.date) else {
                result
                    .warnings
                    .push(format!("entry {}: bad date '{}', skipped", legacy.id, legacy.date));
                continue;
            };
            let amount = money(legacy.amount);

            let entry = if !legacy.debit_parts.is_empty() || !legacy.credit_parts.is_empty() {
                let parts = |parts: Vec<LegacyPart>| -> Vec<Posting> {
                    parts
                        .into_iter()
                        .map(|p| Posting::new(p.account_id, money(p.amount)))
                        .collect()
                };
                let mut entry = JournalEntry::compound(
                    date,
                    legacy.description.clone(),
                    parts(legacy.debit_parts),
                    parts(legacy.credit_parts),
                );
                if !amount.is_zero() {
                    entry.amount = amount;
                }
                entry
            } else {
                let mut entry = JournalEntry::simple(
                    date,
                    legacy.description.clone(),
                    amount,
                    legacy.debit_account.clone().unwrap_or_default(),
                    legacy.credit_account.clone().unwrap_or_default(),
                );
                entry.debit_account = legacy.debit_account;
                entry.credit_account = legacy.credit_account;
                entry
            };

            if !entry.is_consistent() {
                let check = entry.balance_check();
                result.warnings.push(format!(
                    "entry '{}' ({}) is unbalanced: debits {}, credits {}",
                    entry.description, entry.date, check.debits, check.credits
                ));
            }
            for (_, posting) in entry.postings_with_side() {
                if find_account(&posting.account_id).is_none() {
                    result.warnings.push(format!(
                        "entry '{}' ({}) uses unknown account '{}'",
                        entry.description, entry.date, posting.account_id
                    ));
                }
            }

            audit.push(AuditEntry::create(
                EntityType::JournalEntry,
                entry.id.to_string(),
                Some(entry.description.clone()),
                &entry,
            ));
            self.storage.journal.upsert(entry)?;
            result.entries += 1;
        }
        Ok(())
    }

    fn import_cash_flow(
        &self,
        items: Vec<LegacyCashFlow>,
        result: &mut ImportResult,
        audit: &mut Vec<AuditEntry>,
    ) -> LibroResult<()> {
        for legacy in items {
            let (Some(kind), Some(date)) = (FlowKind::parse(&legacy.kind), parse_date(&legacy.date)) else {
                result
                    .warnings
                    .push(format!("cash-flow item '{}' skipped: bad type or date", legacy.description));
                continue;
            };
            let mut item = CashFlowItem::new(kind, legacy.description, money(legacy.amount), date);
            item.category = legacy.category;
            item.is_recurring = legacy.is_recurring;
            if legacy.status.eq_ignore_ascii_case("realized") {
                item.status = FlowStatus::Realized;
            }

            audit.push(AuditEntry::create(
                EntityType::CashFlowItem,
                item.id.to_string(),
                Some(item.description.clone()),
                &item,
            ));
            self.storage.cash_flow.upsert(item)?;
            result.cash_flow += 1;
        }
        Ok(())
    }

    fn import_budgets(
        &self,
        budgets: Vec<LegacyBudget>,
        result: &mut ImportResult,
        audit: &mut Vec<AuditEntry>,
    ) -> LibroResult<()> {
        for legacy in budgets {
            let Ok(month) = YearMonth::parse(&legacy.month) else {
                result
                    .warnings
                    .push(format!("budget '{}' skipped: bad month", legacy.month));
                continue;
            };
            let mut budget = self
                .storage
                .budgets
                .get(month)?
                .unwrap_or_else(|| MonthlyBudget::new(month));
            for line in legacy.categories {
                budget.set_line(&line.account_id, money(line.budgeted));
            }

            audit.push(AuditEntry::create(
                EntityType::MonthlyBudget,
                month.to_string(),
                None,
                &budget,
            ));
            self.storage.budgets.upsert(budget)?;
            result.budgets += 1;
        }
        Ok(())
    }

    fn import_partners(
        &self,
        partners: Vec<LegacyPartner>,
        result: &mut ImportResult,
        audit: &mut Vec<AuditEntry>,
    ) -> LibroResult<HashMap<String, PartnerId>> {
        let mut ids = HashMap::new();
        for legacy in partners {
            if let Some(existing) = self.storage.partners.get_by_name(&legacy.name)? {
                result.warnings.push(format!(
                    "partner {} already exists as {}, movements attached to it",
                    legacy.name.trim(),
                    existing.name
                ));
                ids.insert(legacy.id, existing.id);
                continue;
            }

            let kind = PartnerKind::parse(&legacy.kind).unwrap_or_default();
            let mut partner = Partner::new(legacy.name.trim(), kind);
            partner.tax_id = legacy.tax_id;
            partner.email = legacy.email;
            partner.phone = legacy.phone;
            partner.credit_days = legacy.credit_days;
            partner.credit_limit = legacy.credit_limit.map(money);
            partner.notes = legacy.notes;

            if let Err(e) = partner.validate() {
                result.warnings.push(format!("partner {} skipped: {}", legacy.id, e));
                continue;
            }

            ids.insert(legacy.id, partner.id);
            audit.push(AuditEntry::create(
                EntityType::Partner,
                partner.id.to_string(),
                Some(partner.name.clone()),
                &partner,
            ));
            self.storage.partners.upsert(partner)?;
            result.partners += 1;
        }
        Ok(ids)
    }

    fn import_movements(
        &self,
        movements: Vec<LegacyPartnerMovement>,
        partner_ids: &HashMap<String, PartnerId>,
        result: &mut ImportResult,
        audit: &mut Vec<AuditEntry>,
    ) -> LibroResult<()> {
        for legacy in movements {
            let Some(&partner_id) = partner_ids.get(&legacy.partner_id) else {
                result.warnings.push(format!(
                    "movement '{}' skipped: unknown partner {}",
                    legacy.reference, legacy.partner_id
                ));
                continue;
            };
            let (Some(kind), Some(date)) = (MovementKind::parse(&legacy.kind), parse_date(&legacy.date)) else {
                result
                    .warnings
                    .push(format!("movement '{}' skipped: bad type or date", legacy.reference));
                continue;
            };

            let mut movement = PartnerMovement::new(partner_id, kind, date, money(legacy.amount));
            movement.due_date = legacy.due_date.as_deref().and_then(parse_date);
            movement.reference = legacy.reference;
            movement.description = legacy.description;
            if let Some(status) = MovementStatus::parse(&legacy.status) {
                movement.status = status;
            }

            audit.push(AuditEntry::create(
                EntityType::PartnerMovement,
                movement.id.to_string(),
                None,
                &movement,
            ));
            self.storage.partners.upsert_movement(movement)?;
            result.movements += 1;
        }
        Ok(())
    }

    fn import_taxes(
        &self,
        configs: Vec<LegacyTaxConfig>,
        obligations: Vec<LegacyTaxObligation>,
        result: &mut ImportResult,
        audit: &mut Vec<AuditEntry>,
    ) -> LibroResult<()> {
        for legacy in configs {
            let config = TaxConfig::new(
                &legacy.code.trim().to_uppercase(),
                &legacy.name,
                (legacy.rate * 100.0).round().max(0.0) as u32,
                &legacy.jurisdiction,
                legacy.due_day.unwrap_or(20),
            );
            if let Err(e) = config.validate() {
                result.warnings.push(format!("tax {} skipped: {}", legacy.code, e));
                continue;
            }
            audit.push(AuditEntry::create(
                EntityType::TaxConfig,
                config.code.clone(),
                Some(config.name.clone()),
                &config,
            ));
            self.storage.taxes.upsert_config(config)?;
            result.tax_configs += 1;
        }

        for legacy in obligations {
            let (Ok(period), Some(due)) = (YearMonth::parse(&legacy.period), parse_date(&legacy.due_date)) else {
                result.warnings.push(format!(
                    "tax obligation {} {} skipped: bad period or due date",
                    legacy.tax_code, legacy.period
                ));
                continue;
            };
            let mut obligation =
                TaxObligation::new(legacy.tax_code.trim().to_uppercase(), period, due, money(legacy.amount));
            obligation.notes = legacy.notes;
            if legacy.status.eq_ignore_ascii_case("paid") {
                obligation.status = ObligationStatus::Paid;
                obligation.paid_date = legacy.paid_date.as_deref().and_then(parse_date);
            }
            if self.storage.taxes.get_config(&obligation.tax_code)?.is_none() {
                result.warnings.push(format!(
                    "tax obligation {} refers to unknown tax {}",
                    obligation.period, obligation.tax_code
                ));
            }

            audit.push(AuditEntry::create(
                EntityType::TaxObligation,
                obligation.id.to_string(),
                None,
                &obligation,
            ));
            self.storage.taxes.upsert_obligation(obligation)?;
            result.obligations += 1;
        }
        Ok(())
    }

    fn import_products(
        &self,
        products: Vec<LegacyProduct>,
        result: &mut ImportResult,
        audit: &mut Vec<AuditEntry>,
    ) -> LibroResult<HashMap<String, ProductId>> {
        let mut ids = HashMap::new();
        for legacy in products {
            if let Some(existing) = self.storage.inventory.get_by_sku(&legacy.sku)? {
                result
                    .warnings
                    .push(format!("product {} already exists, movements attached to it", legacy.sku));
                ids.insert(legacy.id, existing.id);
                continue;
            }

            let mut product = Product::new(legacy.sku.trim(), legacy.name.trim());
            product.category = legacy.category;
            if !legacy.unit.trim().is_empty() {
                product.unit = legacy.unit;
            }
            product.cost = money(legacy.cost);
            product.price = money(legacy.price);
            product.stock = legacy.stock.round() as i64;
            product.min_stock = legacy.min_stock.round() as i64;

            if let Err(e) = product.validate() {
                result.warnings.push(format!("product {} skipped: {}", legacy.id, e));
                continue;
            }

            ids.insert(legacy.id, product.id);
            audit.push(AuditEntry::create(
                EntityType::Product,
                product.id.to_string(),
                Some(product.sku.clone()),
                &product,
            ));
            self.storage.inventory.upsert(product)?;
            result.products += 1;
        }
        Ok(ids)
    }

    fn import_stock(
        &self,
        movements: Vec<LegacyStockMovement>,
        product_ids: &HashMap<String, ProductId>,
        result: &mut ImportResult,
        audit: &mut Vec<AuditEntry>,
    ) -> LibroResult<()> {
        for legacy in movements {
            let Some(&product_id) = product_ids.get(&legacy.product_id) else {
                result.warnings.push(format!(
                    "stock movement skipped: unknown product {}",
                    legacy.product_id
                ));
                continue;
            };
            let (Some(kind), Some(date)) = (StockMovementKind::parse(&legacy.kind), parse_date(&legacy.date)) else {
                result
                    .warnings
                    .push("stock movement skipped: bad type or date".to_string());
                continue;
            };

            let qty_in = legacy.qty_in.round() as i64;
            let qty_out = legacy.qty_out.round() as i64;
            let resulting_stock = legacy.resulting_stock.round() as i64;
            let in_range = |qty: i64| (0..=MAX_QUANTITY).contains(&qty);
            if !in_range(qty_in) || !in_range(qty_out) || !in_range(resulting_stock.abs()) {
                result.warnings.push(format!(
                    "stock movement skipped: quantity out of range for product {}",
                    legacy.product_id
                ));
                continue;
            }

            // The snapshot is kept as recorded; `inventory verify` reports drift
            let movement = StockMovement {
                id: StockMovementId::new(),
                product_id,
                date,
                kind,
                qty_in,
                qty_out,
                unit_cost: legacy.unit_cost.map(money),
                resulting_stock,
                notes: legacy.notes,
                created_at: Utc::now(),
            };

            audit.push(AuditEntry::create(
                EntityType::StockMovement,
                movement.id.to_string(),
                None,
                &movement,
            ));
            self.storage.inventory.upsert_movement(movement)?;
            result.stock_movements += 1;
        }
        Ok(())
    }
}

fn money(value: f64) -> Money {
    Money::from_decimal(value).unwrap_or_default()
}

/// `YYYY-MM-DD`, optionally followed by a time part
fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let day = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LibroPaths;
    use crate::services::{InventoryService, JournalService, PartnerService};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LibroPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    const SNAPSHOT: &str = r#"{
        "entries": [
            {"id": "e1", "date": "2025-01-05", "description": "Sale", "amount": 1000,
             "debitAccount": "acc_bank", "creditAccount": "acc_sales"},
            {"id": "e2", "date": "2025-01-01T10:00:00.000Z", "description": "Opening", "amount": 100.1,
             "debitParts": [{"accountId": "acc_cash", "amount": 100.1}],
             "creditParts": [{"accountId": "acc_capital", "amount": 100}]}
        ],
        "cashFlow": [
            {"id": "c1", "type": "expense", "description": "Rent", "amount": 300.5,
             "date": "2025-02-01", "status": "realized"}
        ],
        "partners": [{"id": "p1", "name": "ACME", "type": "client", "creditDays": 30}],
        "partnerMovements": [
            {"partnerId": "p1", "type": "invoice", "date": "2025-01-05", "amount": 1000},
            {"partnerId": "ghost", "type": "payment", "date": "2025-01-06", "amount": 5}
        ],
        "products": [{"id": "x9", "sku": "W-1", "name": "Widget", "cost": 2.5, "stock": 4}],
        "stockMovements": [
            {"productId": "x9", "type": "purchase", "date": "2025-01-02", "qtyIn": 4, "resultingStock": 4}
        ]
    }"#;

    #[test]
    fn test_import_snapshot() {
        let (_temp, storage) = create_test_storage();
        let result = ImportService::new(&storage).import_str(SNAPSHOT).unwrap();

        assert_eq!(result.entries, 2);
        assert_eq!(result.cash_flow, 1);
        assert_eq!(result.partners, 1);
        assert_eq!(result.movements, 1);
        assert_eq!(result.products, 1);
        assert_eq!(result.stock_movements, 1);
        // Unbalanced opening entry and the orphan movement
        assert_eq!(result.warnings.len(), 2);

        let invalid = JournalService::new(&storage).verify().unwrap();
        assert_eq!(invalid.len(), 1);
        assert_eq!(invalid[0].entry.description, "Opening");

        let partner = PartnerService::new(&storage).find("ACME").unwrap();
        assert_eq!(
            PartnerService::new(&storage).balance(partner.id).unwrap(),
            Money::from_units(1000)
        );

        let items = storage.cash_flow.get_all().unwrap();
        assert_eq!(items[0].amount, Money::from_cents(30050));
        assert_eq!(items[0].status, FlowStatus::Realized);

        assert!(InventoryService::new(&storage).verify().unwrap().is_empty());
        assert_eq!(storage.audit().entry_count().unwrap(), result.total());
    }

    #[test]
    fn test_duplicate_partner_names_merge() {
        let (_temp, storage) = create_test_storage();
        let partners = PartnerService::new(&storage);
        partners
            .create("Globex", PartnerKind::Supplier, Default::default())
            .unwrap();

        let snapshot = r#"{
            "partners": [
                {"id": "p1", "name": "Acme", "type": "client"},
                {"id": "p2", "name": "acme", "type": "supplier"},
                {"id": "p3", "name": " GLOBEX ", "type": "supplier"},
                {"id": "p4", "name": "Initech", "type": "client", "creditDays": 200000000}
            ],
            "partnerMovements": [
                {"partnerId": "p1", "type": "invoice", "date": "2025-01-05", "amount": 100},
                {"partnerId": "p2", "type": "invoice", "date": "2025-01-06", "amount": 50},
                {"partnerId": "p3", "type": "invoice", "date": "2025-01-07", "amount": 20}
            ]
        }"#;
        let result = ImportService::new(&storage).import_str(snapshot).unwrap();

        assert_eq!(result.partners, 1);
        assert_eq!(result.movements, 3);
        assert_eq!(result.warnings.len(), 3);
        assert!(result.warnings.iter().any(|w| w.contains("acme already exists as Acme")));
        assert!(result.warnings.iter().any(|w| w.contains("Credit days")));

        let names: Vec<String> = storage
            .partners
            .get_all()
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"Acme".to_string()));
        assert!(names.contains(&"Globex".to_string()));

        let acme = partners.find("ACME").unwrap();
        assert_eq!(acme.kind, PartnerKind::Client);
        assert_eq!(partners.balance(acme.id).unwrap(), Money::from_units(150));
        let globex = partners.find("globex").unwrap();
        assert_eq!(partners.balance(globex.id).unwrap(), Money::from_units(20));
    }

    #[test]
    fn test_stock_quantities_out_of_range_skipped() {
        let (_temp, storage) = create_test_storage();
        let snapshot = r#"{
            "products": [
                {"id": "x1", "sku": "W-1", "name": "Widget", "stock": 3},
                {"id": "x2", "sku": "G-1", "name": "Gadget", "stock": 1e19}
            ],
            "stockMovements": [
                {"productId": "x1", "type": "purchase", "date": "2025-01-02", "qtyIn": 3, "resultingStock": 3},
                {"productId": "x1", "type": "purchase", "date": "2025-01-03", "qtyIn": 1e19, "resultingStock": 1e19},
                {"productId": "x1", "type": "sale", "date": "2025-01-04", "qtyOut": -2, "resultingStock": 5}
            ]
        }"#;
        let result = ImportService::new(&storage).import_str(snapshot).unwrap();

        assert_eq!(result.products, 1);
        assert_eq!(result.stock_movements, 1);
        assert_eq!(result.warnings.len(), 3);
        assert!(InventoryService::new(&storage).verify().unwrap().is_empty());
    }

    #[test]
    fn test_missing_arrays_default_to_empty() {
        let (_temp, storage) = create_test_storage();
        let result = ImportService::new(&storage).import_str("{}").unwrap();
        assert_eq!(result.total(), 0);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_rejects_garbage() {
        let (_temp, storage) = create_test_storage();
        let err = ImportService::new(&storage).import_str("not json").unwrap_err();
        assert!(matches!(err, LibroError::Import(_)));
    }

    #[test]
    fn test_parse_date_variants() {
        assert_eq!(
            parse_date("2025-03-04T00:00:00Z"),
            NaiveDate::from_ymd_opt(2025, 3, 4)
        );
        assert_eq!(parse_date("04/03/2025"), None);
    }
}
