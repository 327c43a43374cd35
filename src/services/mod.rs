//! Service layer for Libro
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, computed balances, and cross-entity operations.
//! Every mutation saves its repository and writes an audit record.

pub mod budget;
pub mod cashflow;
pub mod dashboard;
pub mod import;
pub mod inventory;
pub mod journal;
pub mod partner;
pub mod tax;

pub use budget::{BudgetReport, BudgetReportRow, BudgetService};
pub use cashflow::{CashFlowFilter, CashFlowService, CashFlowUpdate, Projection, ProjectionPoint};
pub use dashboard::{DashboardService, DashboardSummary, MonthTotals};
pub use import::{ImportResult, ImportService};
pub use inventory::{InventoryService, NewStockMovement, ProductDetails, StockDrift, Valuation};
pub use journal::{AccountTotals, InvalidEntry, JournalFilter, JournalService, LedgerLine};
pub use partner::{
    NewMovement, PartnerDetails, PartnerOverview, PartnerService, PartnerSummary, StatementLine,
};
pub use tax::{ObligationFilter, TaxConfigUpdate, TaxService, VatPosition};
