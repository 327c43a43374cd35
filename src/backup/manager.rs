//! Rolling backups of the data directory
//!
//! A backup is a single JSON archive holding every entity file under its
//! file name. Archives are named `backup-YYYYMMDD-HHMMSS-mmm.json`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::paths::LibroPaths;
use crate::config::settings::BackupRetention;
use crate::error::{LibroError, LibroResult};
use crate::storage::{read_json, write_json_atomic};

pub const ARCHIVE_SCHEMA_VERSION: u32 = 1;

/// Metadata about a backup on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupInfo {
    pub filename: String,
    pub path: PathBuf,
    pub created_at: DateTime<Utc>,
    pub size_bytes: u64,
    /// The oldest backup of its month; kept under the monthly quota
    pub is_monthly: bool,
}

/// Backup archive format
#[derive(Debug, Serialize, Deserialize)]
pub struct BackupArchive {
    pub schema_version: u32,
    pub created_at: DateTime<Utc>,
    /// File name (`journal.json`) to file contents
    pub files: BTreeMap<String, serde_json::Value>,
}

/// Creates backups and enforces the retention policy
pub struct BackupManager {
    paths: LibroPaths,
    retention: BackupRetention,
}

impl BackupManager {
    pub fn new(paths: LibroPaths, retention: BackupRetention) -> Self {
        Self { paths, retention }
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.paths.backup_dir()
    }

    /// Write a new archive and return its path
    pub fn create_backup(&self) -> LibroResult<PathBuf> {
        let now = Utc::now();
        let filename = format!(
            "backup-{}-{:03}.json",
            now.format("%Y%m%d-%H%M%S"),
            now.timestamp_subsec_millis()
        );
        let path = self.backup_dir().join(filename);

        write_json_atomic(&path, &self.snapshot(now)?)?;
        tracing::info!(path = %path.display(), "backup created");
        Ok(path)
    }

    fn snapshot(&self, created_at: DateTime<Utc>) -> LibroResult<BackupArchive> {
        let mut files = BTreeMap::new();
        for path in self.paths.data_files() {
            if !path.exists() {
                continue;
            }
            let value: serde_json::Value = read_json(&path)?;
            files.insert(file_name(&path)?, value);
        }
        Ok(BackupArchive {
            schema_version: ARCHIVE_SCHEMA_VERSION,
            created_at,
            files,
        })
    }

    /// Backups on disk, newest first
    pub fn list_backups(&self) -> LibroResult<Vec<BackupInfo>> {
        let dir = self.backup_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let read_dir = fs::read_dir(&dir)
            .map_err(|e| LibroError::Io(format!("Failed to read backup directory: {}", e)))?;

        let mut backups: Vec<BackupInfo> = read_dir
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| backup_info(&entry.path()))
            .collect();
        backups.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        // The oldest archive of each month is the monthly one
        let mut seen_months = std::collections::HashSet::new();
        for backup in backups.iter_mut().rev() {
            let key = (backup.created_at.year(), backup.created_at.month());
            backup.is_monthly = seen_months.insert(key);
        }

        Ok(backups)
    }

    /// Delete daily backups past `daily_count` and monthly ones past `monthly_count`
    pub fn enforce_retention(&self) -> LibroResult<Vec<PathBuf>> {
        let (monthly, daily): (Vec<_>, Vec<_>) =
            self.list_backups()?.into_iter().partition(|b| b.is_monthly);

        let expired = daily
            .into_iter()
            .skip(self.retention.daily_count as usize)
            .chain(monthly.into_iter().skip(self.retention.monthly_count as usize));

        let mut deleted = Vec::new();
        for backup in expired {
            fs::remove_file(&backup.path)
                .map_err(|e| LibroError::Io(format!("Failed to delete old backup: {}", e)))?;
            deleted.push(backup.path);
        }
        if !deleted.is_empty() {
            tracing::debug!(count = deleted.len(), "expired backups removed");
        }
        Ok(deleted)
    }

    pub fn create_backup_with_retention(&self) -> LibroResult<(PathBuf, Vec<PathBuf>)> {
        let path = self.create_backup()?;
        let deleted = self.enforce_retention()?;
        Ok((path, deleted))
    }

    /// A backup by file name, or by the newest one when `name` is `latest`
    pub fn get_backup(&self, name: &str) -> LibroResult<Option<BackupInfo>> {
        if name == "latest" {
            return Ok(self.list_backups()?.into_iter().next());
        }
        Ok(backup_info(&self.backup_dir().join(name)))
    }
}

fn file_name(path: &Path) -> LibroResult<String> {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| LibroError::Storage(format!("Bad data path: {}", path.display())))
}

fn backup_info(path: &Path) -> Option<BackupInfo> {
    let filename = path.file_name()?.to_string_lossy().into_owned();
    let stamp = filename.strip_prefix("backup-")?.strip_suffix(".json")?;
    let created_at = parse_backup_timestamp(stamp)?;
    let size_bytes = fs::metadata(path).ok()?.len();

    Some(BackupInfo {
        filename,
        path: path.to_path_buf(),
        created_at,
        size_bytes,
        is_monthly: false,
    })
}

/// Parse `YYYYMMDD-HHMMSS` with an optional `-mmm` millisecond suffix
fn parse_backup_timestamp(stamp: &str) -> Option<DateTime<Utc>> {
    let (seconds, millis) = match stamp.len() {
        15 => (stamp, 0),
        19 => (&stamp[..15], stamp[16..].parse::<i64>().ok()?),
        _ => return None,
    };
    let naive = NaiveDateTime::parse_from_str(seconds, "%Y%m%d-%H%M%S").ok()?;
    Some(naive.and_utc() + chrono::Duration::milliseconds(millis))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manager(daily: u32, monthly: u32) -> (BackupManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LibroPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();
        let retention = BackupRetention {
            daily_count: daily,
            monthly_count: monthly,
        };
        (BackupManager::new(paths, retention), temp_dir)
    }

    fn touch(dir: &Path, stamp: &str) {
        fs::write(dir.join(format!("backup-{}.json", stamp)), "{}").unwrap();
    }

    #[test]
    fn test_archive_contains_existing_files() {
        let (manager, temp) = manager(3, 2);
        fs::write(temp.path().join("data").join("journal.json"), r#"{"entries":[]}"#).unwrap();

        let path = manager.create_backup().unwrap();
        let archive: BackupArchive = load_archive(&path);

        assert_eq!(archive.schema_version, ARCHIVE_SCHEMA_VERSION);
        assert!(archive.files.contains_key("journal.json"));
        assert!(!archive.files.contains_key("taxes.json"));
    }

    fn load_archive(path: &Path) -> BackupArchive {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_list_newest_first_and_monthly_flag() {
        let (manager, _temp) = manager(30, 12);
        let dir = manager.backup_dir();
        touch(&dir, "20250301-100000");
        touch(&dir, "20250315-100000-250");
        touch(&dir, "20250402-090000");
        fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let backups = manager.list_backups().unwrap();
        assert_eq!(backups.len(), 3);
        assert_eq!(backups[0].filename, "backup-20250402-090000.json");
        assert!(backups[0].is_monthly);
        assert!(!backups[1].is_monthly);
        assert!(backups[2].is_monthly);
    }

    #[test]
    fn test_retention_policy() {
        let (manager, _temp) = manager(2, 1);
        let dir = manager.backup_dir();
        for day in 1..=5 {
            touch(&dir, &format!("202505{:02}-120000", day));
        }
        touch(&dir, "20250410-120000");

        // May: 1 monthly + 4 daily; April: 1 monthly
        let deleted = manager.enforce_retention().unwrap();
        assert_eq!(deleted.len(), 3);
        assert_eq!(manager.list_backups().unwrap().len(), 3);
    }

    #[test]
    fn test_latest_lookup() {
        let (manager, _temp) = manager(3, 2);
        assert!(manager.get_backup("latest").unwrap().is_none());

        let path = manager.create_backup().unwrap();
        assert_eq!(manager.get_backup("latest").unwrap().unwrap().path, path);
    }

    #[test]
    fn test_parse_backup_timestamp() {
        let ts = parse_backup_timestamp("20251127-143022").unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day()), (2025, 11, 27));

        let with_millis = parse_backup_timestamp("20251127-143022-456").unwrap();
        assert!(with_millis > ts);
        assert!(parse_backup_timestamp("2025-11-27").is_none());
    }
}
