//! Reports module for Libro
//!
//! Financial statements built from the journal (trial balance, income
//! statement, balance sheet), an account register and the monthly budget
//! overview. Each report renders for the terminal and exports to CSV.

pub mod account_register;
pub mod balance_sheet;
pub mod budget_overview;
pub mod income_statement;
pub mod trial_balance;

pub use account_register::AccountRegisterReport;
pub use balance_sheet::{BalanceSection, BalanceSheetReport};
pub use budget_overview::BudgetOverviewReport;
pub use income_statement::{IncomeStatementReport, StatementLine};
pub use trial_balance::{TrialBalanceReport, TrialBalanceRow};

use crate::error::LibroError;

pub(crate) fn export_err(e: std::io::Error) -> LibroError {
    LibroError::Export(e.to_string())
}
