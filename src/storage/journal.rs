//! Journal repository for JSON storage
//!
//! Manages loading and saving journal entries to journal.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::LibroError;
use crate::models::{EntryId, JournalEntry};

use super::file_io::{read_json, write_json_atomic};
use super::{read_lock_err, write_lock_err};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct JournalData {
    #[serde(default)]
    pub entries: Vec<JournalEntry>,
}

/// Repository for journal entry persistence
pub struct JournalRepository {
    path: PathBuf,
    data: RwLock<HashMap<EntryId, JournalEntry>>,
}

impl JournalRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load entries from disk
    pub fn load(&self) -> Result<(), LibroError> {
        let file_data: JournalData = read_json(&self.path)?;
        let mut data = self.data.write().map_err(write_lock_err)?;

        data.clear();
        for entry in file_data.entries {
            data.insert(entry.id, entry);
        }
        Ok(())
    }

    /// Save entries to disk, oldest first
    pub fn save(&self) -> Result<(), LibroError> {
        let entries = self.get_all()?;
        write_json_atomic(&self.path, &JournalData { entries })
    }

    pub fn get(&self, id: EntryId) -> Result<Option<JournalEntry>, LibroError> {
        let data = self.data.read().map_err(read_lock_err)?;
        Ok(data.get(&id).cloned())
    }

    /// Find by full id or short form
    pub fn find(&self, identifier: &str) -> Result<Option<JournalEntry>, LibroError> {
        let data = self.data.read().map_err(read_lock_err)?;
        Ok(data.values().find(|e| e.id.matches(identifier)).cloned())
    }

    /// All entries in chronological order (date, then creation time)
    pub fn get_all(&self) -> Result<Vec<JournalEntry>, LibroError> {
        let data = self.data.read().map_err(read_lock_err)?;
        let mut entries: Vec<_> = data.values().cloned().collect();
        entries.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));
        Ok(entries)
    }

    /// Entries dated within `[start, end]`
    pub fn get_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<JournalEntry>, LibroError> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|e| e.date >= start && e.date <= end)
            .collect())
    }

    pub fn upsert(&self, entry: JournalEntry) -> Result<(), LibroError> {
        let mut data = self.data.write().map_err(write_lock_err)?;
        data.insert(entry.id, entry);
        Ok(())
    }

    pub fn delete(&self, id: EntryId) -> Result<bool, LibroError> {
        let mut data = self.data.write().map_err(write_lock_err)?;
        Ok(data.remove(&id).is_some())
    }

    /// Replace the whole journal (restore/import)
    pub fn replace_all(&self, entries: Vec<JournalEntry>) -> Result<(), LibroError> {
        let mut data = self.data.write().map_err(write_lock_err)?;
        data.clear();
        for entry in entries {
            data.insert(entry.id, entry);
        }
        Ok(())
    }

    pub fn count(&self) -> Result<usize, LibroError> {
        let data = self.data.read().map_err(read_lock_err)?;
        Ok(data.len())
    }
}
