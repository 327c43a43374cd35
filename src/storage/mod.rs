//! Storage layer for Libro
//!
//! One JSON file per area under `data/`, each owned by a repository that
//! keeps its records in memory behind an `RwLock`. Services mutate a
//! repository and save it right away; every mutation is also appended to
//! the audit log through the `log_*` helpers.

pub mod budgets;
pub mod cash_flow;
pub mod file_io;
pub mod init;
pub mod inventory;
pub mod journal;
pub mod partners;
pub mod taxes;

pub use budgets::BudgetRepository;
pub use cash_flow::CashFlowRepository;
pub use file_io::{read_json, read_json_required, write_json_atomic, write_text_atomic};
pub use init::initialize_storage;
pub use inventory::InventoryRepository;
pub use journal::JournalRepository;
pub use partners::PartnerRepository;
pub use taxes::TaxRepository;

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::LibroPaths;
use crate::error::LibroError;

pub(crate) fn read_lock_err<E: std::fmt::Display>(e: E) -> LibroError {
    LibroError::Storage(format!("Failed to acquire read lock: {}", e))
}

pub(crate) fn write_lock_err<E: std::fmt::Display>(e: E) -> LibroError {
    LibroError::Storage(format!("Failed to acquire write lock: {}", e))
}

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: LibroPaths,
    audit: AuditLogger,
    pub journal: JournalRepository,
    pub cash_flow: CashFlowRepository,
    pub budgets: BudgetRepository,
    pub partners: PartnerRepository,
    pub inventory: InventoryRepository,
    pub taxes: TaxRepository,
}

impl Storage {
    /// Create the coordinator; repositories start empty until [`load_all`](Self::load_all)
    pub fn new(paths: LibroPaths) -> Result<Self, LibroError> {
        paths.ensure_directories()?;

        Ok(Self {
            audit: AuditLogger::new(paths.audit_log()),
            journal: JournalRepository::new(paths.journal_file()),
            cash_flow: CashFlowRepository::new(paths.cash_flow_file()),
            budgets: BudgetRepository::new(paths.budgets_file()),
            partners: PartnerRepository::new(paths.partners_file()),
            inventory: InventoryRepository::new(paths.inventory_file()),
            taxes: TaxRepository::new(paths.taxes_file()),
            paths,
        })
    }

    /// Create and load in one step
    pub fn open(paths: LibroPaths) -> Result<Self, LibroError> {
        let storage = Self::new(paths)?;
        storage.load_all()?;
        Ok(storage)
    }

    pub fn paths(&self) -> &LibroPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    pub fn load_all(&self) -> Result<(), LibroError> {
        self.journal.load()?;
        self.cash_flow.load()?;
        self.budgets.load()?;
        self.partners.load()?;
        self.inventory.load()?;
        self.taxes.load()?;
        tracing::debug!(base = %self.paths.base_dir().display(), "storage loaded");
        Ok(())
    }

    pub fn save_all(&self) -> Result<(), LibroError> {
        self.journal.save()?;
        self.cash_flow.save()?;
        self.budgets.save()?;
        self.partners.save()?;
        self.inventory.save()?;
        self.taxes.save()?;
        Ok(())
    }

    /// Data files that exist but do not parse as JSON
    pub fn corrupt_files(&self) -> Vec<std::path::PathBuf> {
        self.paths
            .data_files()
            .into_iter()
            .filter(|p| p.exists() && !file_io::json_file_valid(p))
            .collect()
    }

    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), LibroError> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> Result<(), LibroError> {
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
        ))
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), LibroError> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LibroPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(temp_dir.path().join("backups").exists());
        assert!(!storage.is_initialized());
        assert!(storage.corrupt_files().is_empty());
    }

    #[test]
    fn test_audit_helpers_append() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::new(LibroPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();

        storage
            .log_create(EntityType::Partner, "pt-1", None, &json!({"name": "A"}))
            .unwrap();
        storage
            .log_update(
                EntityType::Partner,
                "pt-1",
                None,
                &json!({"name": "A"}),
                &json!({"name": "B"}),
            )
            .unwrap();

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].operation, Operation::Update);
        assert!(entries[1].diff_summary.is_some());
    }

    #[test]
    fn test_corrupt_file_detected() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LibroPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths.clone()).unwrap();
        std::fs::write(paths.journal_file(), "garbage").unwrap();

        assert_eq!(storage.corrupt_files(), vec![paths.journal_file()]);
        assert!(storage.load_all().is_err());
    }
}
