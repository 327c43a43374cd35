//! Path management for Libro
//!
//! ## Path Resolution Order
//!
//! 1. `LIBRO_DATA_DIR` environment variable (if set)
//! 2. The platform configuration directory reported by `directories`
//!    (`~/.config/libro` on Linux, `~/Library/Application Support/libro` on
//!    macOS, `%APPDATA%\libro` on Windows)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::LibroError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "LIBRO_DATA_DIR";

/// Manages all paths used by Libro
#[derive(Debug, Clone)]
pub struct LibroPaths {
    /// Base directory for all Libro data
    base_dir: PathBuf,
}

impl LibroPaths {
    /// Create a new LibroPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, LibroError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create LibroPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    pub fn config_dir(&self) -> PathBuf {
        self.base_dir.clone()
    }

    /// Directory holding the entity files
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.base_dir.join("backups")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Persisted authentication session
    pub fn session_file(&self) -> PathBuf {
        self.base_dir.join("session.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Journal entries
    pub fn journal_file(&self) -> PathBuf {
        self.data_dir().join("journal.json")
    }

    /// Projected cash-flow items
    pub fn cash_flow_file(&self) -> PathBuf {
        self.data_dir().join("cash_flow.json")
    }

    /// Monthly budgets
    pub fn budgets_file(&self) -> PathBuf {
        self.data_dir().join("budgets.json")
    }

    /// Partners and their movements
    pub fn partners_file(&self) -> PathBuf {
        self.data_dir().join("partners.json")
    }

    /// Products and stock movements
    pub fn inventory_file(&self) -> PathBuf {
        self.data_dir().join("inventory.json")
    }

    /// Tax configurations and obligations
    pub fn taxes_file(&self) -> PathBuf {
        self.data_dir().join("taxes.json")
    }

    /// Every entity file, in backup order
    pub fn data_files(&self) -> Vec<PathBuf> {
        vec![
            self.journal_file(),
            self.cash_flow_file(),
            self.budgets_file(),
            self.partners_file(),
            self.inventory_file(),
            self.taxes_file(),
        ]
    }

    /// Ensure the base, data and backup directories exist
    pub fn ensure_directories(&self) -> Result<(), LibroError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| LibroError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| LibroError::Io(format!("Failed to create data directory: {}", e)))?;

        std::fs::create_dir_all(self.backup_dir())
            .map_err(|e| LibroError::Io(format!("Failed to create backup directory: {}", e)))?;

        Ok(())
    }

    /// Check if Libro has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, LibroError> {
    ProjectDirs::from("", "", "libro")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| LibroError::Config("Could not determine a home directory".into()))
}
