//! Export module for Libro
//!
//! - CSV: the journal (one row per posting) and the cash-flow plan
//! - JSON: schema-versioned full export, restorable with `libro import`
//! - YAML: the same document in a human-readable form

pub mod csv;
pub mod json;
pub mod yaml;

pub use csv::{export_cash_flow_csv, export_journal_csv};
pub use json::{export_full_json, import_from_json, FullExport, EXPORT_SCHEMA_VERSION};
pub use yaml::{export_full_yaml, import_from_yaml};
