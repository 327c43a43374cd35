//! Core data models for Libro
//!
//! This module contains the data structures of the bookkeeping domain:
//! the chart of accounts, journal entries, cash-flow items, budgets,
//! partners, inventory and taxes.

pub mod account;
pub mod budget;
pub mod cashflow;
pub mod ids;
pub mod inventory;
pub mod journal;
pub mod money;
pub mod partner;
pub mod period;
pub mod tax;

pub use account::{Account, AccountType, NormalSide};
pub use budget::{BudgetLine, BudgetStatus, MonthlyBudget};
pub use cashflow::{CashFlowItem, FlowKind, FlowStatus};
pub use ids::{
    CashFlowId, EntryId, MovementId, PartnerId, ProductId, StockMovementId, TaxObligationId,
};
pub use inventory::{Product, StockMovement, StockMovementKind};
pub use journal::{BalanceCheck, JournalEntry, Posting, Side};
pub use money::{Money, MoneyParseError};
pub use partner::{
    partner_balance, MovementKind, MovementStatus, Partner, PartnerKind, PartnerMovement,
};
pub use period::{PeriodParseError, YearMonth};
pub use tax::{default_tax_configs, ObligationStatus, TaxConfig, TaxObligation};
