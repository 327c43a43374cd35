//! Backup system for Libro
//!
//! Rolling JSON archives of the data directory with daily/monthly retention
//! (30 daily and 12 monthly by default, see `BackupRetention`) and restore.
//!
//! - `BackupManager`: creates archives, lists them and prunes old ones
//! - `RestoreManager`: validates an archive and writes it back

mod manager;
mod restore;

pub use manager::{BackupArchive, BackupInfo, BackupManager};
pub use restore::{RestoreManager, RestoreResult, ValidationResult};
