//! Append-only JSONL audit log

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::error::{LibroError, LibroResult};

use super::entry::{AuditEntry, EntityType};

/// Selection applied when reading the log back
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    pub entity_type: Option<EntityType>,
    /// Matches the entity id or name, case-insensitive
    pub entity: Option<String>,
    pub since: Option<DateTime<Utc>>,
}

impl AuditFilter {
    fn accepts(&self, entry: &AuditEntry) -> bool {
        if let Some(kind) = self.entity_type {
            if entry.entity_type != kind {
                return false;
            }
        }
        if let Some(since) = self.since {
            if entry.timestamp < since {
                return false;
            }
        }
        if let Some(needle) = &self.entity {
            let needle = needle.to_lowercase();
            let in_id = entry.entity_id.to_lowercase().contains(&needle);
            let in_name = entry
                .entity_name
                .as_deref()
                .map(|n| n.to_lowercase().contains(&needle))
                .unwrap_or(false);
            if !in_id && !in_name {
                return false;
            }
        }
        true
    }
}

/// Writes one JSON object per line and flushes after every append
pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    pub fn log(&self, entry: &AuditEntry) -> LibroResult<()> {
        self.log_batch(std::slice::from_ref(entry))
    }

    /// Append several entries with a single open and flush
    pub fn log_batch(&self, entries: &[AuditEntry]) -> LibroResult<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| LibroError::Io(format!("Failed to open audit log: {}", e)))?;

        for entry in entries {
            let line = serde_json::to_string(entry)
                .map_err(|e| LibroError::Json(format!("Failed to serialize audit entry: {}", e)))?;
            writeln!(file, "{}", line)
                .map_err(|e| LibroError::Io(format!("Failed to write audit entry: {}", e)))?;
        }

        file.flush()
            .map_err(|e| LibroError::Io(format!("Failed to flush audit log: {}", e)))
    }

    /// All entries, oldest first
    pub fn read_all(&self) -> LibroResult<Vec<AuditEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| LibroError::Io(format!("Failed to open audit log: {}", e)))?;

        let mut entries = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| {
                LibroError::Io(format!("Failed to read audit log line {}: {}", index + 1, e))
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let entry: AuditEntry = serde_json::from_str(&line).map_err(|e| {
                LibroError::Json(format!("Bad audit entry at line {}: {}", index + 1, e))
            })?;
            entries.push(entry);
        }
        Ok(entries)
    }

    /// The last `limit` entries accepted by `filter`, oldest first
    pub fn read_filtered(&self, filter: &AuditFilter, limit: usize) -> LibroResult<Vec<AuditEntry>> {
        let matching: Vec<_> = self
            .read_all()?
            .into_iter()
            .filter(|e| filter.accepts(e))
            .collect();
        let start = matching.len().saturating_sub(limit);
        Ok(matching[start..].to_vec())
    }

    pub fn entry_count(&self) -> LibroResult<usize> {
        Ok(self.read_all()?.len())
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }
}
