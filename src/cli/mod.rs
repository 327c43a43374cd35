//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod args;
pub mod assistant;
pub mod audit;
pub mod auth;
pub mod backup;
pub mod budget;
pub mod cashflow;
pub mod dashboard;
pub mod export;
pub mod import;
pub mod inventory;
pub mod journal;
pub mod partner;
pub mod report;
pub mod tax;

pub use assistant::{handle_assistant_command, AssistantCommands};
pub use audit::handle_audit_command;
pub use auth::{handle_auth_command, AuthCommands};
pub use backup::{handle_backup_command, BackupCommands};
pub use budget::{handle_budget_command, BudgetCommands};
pub use cashflow::{handle_cashflow_command, CashFlowCommands};
pub use dashboard::handle_dashboard_command;
pub use export::{handle_export_command, ExportCommands};
pub use import::{handle_import_command, ImportFormat};
pub use inventory::{handle_inventory_command, InventoryCommands};
pub use journal::{handle_journal_command, JournalCommands};
pub use partner::{handle_partner_command, PartnerCommands};
pub use report::{handle_report_command, ReportCommands};
pub use tax::{handle_tax_command, TaxCommands};
