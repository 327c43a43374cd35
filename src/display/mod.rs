//! Display formatting for terminal output
//!
//! Plain-text renderings of models and service results used by the CLI
//! handlers.

pub mod cashflow;
pub mod dashboard;
pub mod format;
pub mod inventory;
pub mod journal;
pub mod partner;
pub mod tax;

pub use cashflow::{format_cash_flow_list, format_projection};
pub use dashboard::{format_dashboard, format_trend};
pub use inventory::{
    format_drift, format_product_details, format_product_list, format_stock_movements,
    format_valuation,
};
pub use journal::{format_chart, format_entry_details, format_entry_list, format_invalid_entries};
pub use partner::{format_movements, format_partner_details, format_partner_overview, format_statement};
pub use tax::{format_obligations, format_tax_configs, format_vat_position};
