//! Backup restoration

use std::path::Path;

use chrono::{DateTime, Utc};

use crate::config::paths::LibroPaths;
use crate::error::{LibroError, LibroResult};
use crate::storage::{read_json_required, write_json_atomic};

use super::manager::{BackupArchive, ARCHIVE_SCHEMA_VERSION};

/// Writes archive contents back over the data directory
pub struct RestoreManager {
    paths: LibroPaths,
}

impl RestoreManager {
    pub fn new(paths: LibroPaths) -> Self {
        Self { paths }
    }

    fn load(&self, backup_path: &Path) -> LibroResult<BackupArchive> {
        let archive: BackupArchive = read_json_required(backup_path)?;
        if archive.schema_version > ARCHIVE_SCHEMA_VERSION {
            return Err(LibroError::Storage(format!(
                "Backup schema v{} is newer than supported v{}",
                archive.schema_version, ARCHIVE_SCHEMA_VERSION
            )));
        }
        Ok(archive)
    }

    /// Overwrite the data files present in the archive
    ///
    /// Files missing from the archive are left untouched.
    pub fn restore_from_file(&self, backup_path: &Path) -> LibroResult<RestoreResult> {
        let archive = self.load(backup_path)?;
        self.paths.ensure_directories()?;

        let mut restored = Vec::new();
        for path in self.paths.data_files() {
            let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                continue;
            };
            if let Some(contents) = archive.files.get(&name) {
                write_json_atomic(&path, contents)?;
                restored.push(name);
            }
        }

        tracing::info!(backup = %backup_path.display(), files = restored.len(), "backup restored");
        Ok(RestoreResult {
            backup_date: archive.created_at,
            restored,
        })
    }

    /// Parse a backup and report which data files it carries
    pub fn validate_backup(&self, backup_path: &Path) -> LibroResult<ValidationResult> {
        let archive = self.load(backup_path)?;
        let (present, missing): (Vec<String>, Vec<String>) = self
            .paths
            .data_files()
            .iter()
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .partition(|name| archive.files.contains_key(name));

        Ok(ValidationResult {
            schema_version: archive.schema_version,
            backup_date: archive.created_at,
            present,
            missing,
        })
    }
}

/// Result of a restore operation
#[derive(Debug)]
pub struct RestoreResult {
    pub backup_date: DateTime<Utc>,
    /// File names written back
    pub restored: Vec<String>,
}

impl RestoreResult {
    pub fn summary(&self) -> String {
        if self.restored.is_empty() {
            "Nothing to restore".to_string()
        } else {
            format!("Restored: {}", self.restored.join(", "))
        }
    }
}

/// Result of validating a backup
#[derive(Debug)]
pub struct ValidationResult {
    pub schema_version: u32,
    pub backup_date: DateTime<Utc>,
    pub present: Vec<String>,
    pub missing: Vec<String>,
}

impl ValidationResult {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn summary(&self) -> String {
        if self.is_complete() {
            format!("Complete backup (v{})", self.schema_version)
        } else {
            format!(
                "Partial backup (v{}): missing {}",
                self.schema_version,
                self.missing.join(", ")
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backup::manager::BackupManager;
    use crate::config::settings::BackupRetention;
    use std::fs;
    use tempfile::TempDir;

    fn env() -> (RestoreManager, BackupManager, LibroPaths, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LibroPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();
        let backups = BackupManager::new(paths.clone(), BackupRetention::default());
        (RestoreManager::new(paths.clone()), backups, paths, temp_dir)
    }

    #[test]
    fn test_restore_brings_back_deleted_file() {
        let (restore, backups, paths, _temp) = env();
        fs::write(paths.journal_file(), r#"{"entries":[]}"#).unwrap();
        let backup = backups.create_backup().unwrap();

        fs::remove_file(paths.journal_file()).unwrap();
        let result = restore.restore_from_file(&backup).unwrap();

        assert_eq!(result.restored, vec!["journal.json".to_string()]);
        assert!(paths.journal_file().exists());
        assert!(!paths.taxes_file().exists());
    }

    #[test]
    fn test_validate_reports_missing_files() {
        let (restore, backups, paths, _temp) = env();
        fs::write(paths.taxes_file(), r#"{"configs":[],"obligations":[]}"#).unwrap();
        let backup = backups.create_backup().unwrap();

        let result = restore.validate_backup(&backup).unwrap();
        assert!(!result.is_complete());
        assert_eq!(result.present, vec!["taxes.json".to_string()]);
        assert!(result.summary().contains("journal.json"));
    }

    #[test]
    fn test_newer_schema_is_rejected() {
        let (restore, _backups, paths, _temp) = env();
        let path = paths.backup_dir().join("backup-20250101-000000.json");
        fs::write(
            &path,
            r#"{"schema_version": 99, "created_at": "2025-01-01T00:00:00Z", "files": {}}"#,
        )
        .unwrap();

        assert!(restore.validate_backup(&path).is_err());
    }
}
