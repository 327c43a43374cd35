//! Libro - double-entry bookkeeping for small businesses
//!
//! This library provides the core of the `libro` command line and terminal
//! UI: a double-entry journal over a fixed chart of accounts, and everything
//! a small business builds on top of it (cash-flow projection, monthly
//! budgets, client and supplier accounts, tax obligations, inventory and the
//! financial statements).
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (money, accounts, journal entries, partners, ...)
//! - `storage`: JSON file storage layer
//! - `services`: Business logic layer
//! - `reports`: Financial statements with terminal and CSV output
//! - `audit`: Audit logging system
//! - `backup`: Automatic backup management
//! - `export`: Full JSON/YAML exports and CSV
//! - `assistant`: Hosted-model bookkeeping assistant
//! - `auth`: Supabase account sessions
//!
//! # Example
//!
//! ```rust,ignore
//! use libro::config::paths::LibroPaths;
//! use libro::services::JournalService;
//! use libro::storage::Storage;
//!
//! let storage = Storage::open(LibroPaths::new()?)?;
//! let journal = JournalService::new(&storage);
//! journal.add_simple(today, "Cash sale", Money::from_units(1000), "acc_cash", "acc_sales")?;
//! ```

pub mod assistant;
pub mod audit;
pub mod auth;
pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;
pub mod tui;

pub use error::{LibroError, LibroResult};
