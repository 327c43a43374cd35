//! File I/O utilities with atomic writes
//!
//! Every repository file goes through [`write_json_atomic`], so a crash in
//! the middle of a save leaves the previous file in place.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::LibroError;

fn storage_err(action: &str, path: &Path, e: impl std::fmt::Display) -> LibroError {
    LibroError::Storage(format!("Failed to {} {}: {}", action, path.display(), e))
}

/// Read JSON from a file, returning a default value if file doesn't exist
pub fn read_json<T, P>(path: P) -> Result<T, LibroError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if !path.exists() {
        return Ok(T::default());
    }
    read_json_required(path)
}

/// Read JSON from a file, returning an error if file doesn't exist
pub fn read_json_required<T, P>(path: P) -> Result<T, LibroError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if !path.exists() {
        return Err(LibroError::Storage(format!(
            "File not found: {}",
            path.display()
        )));
    }

    let file = File::open(path).map_err(|e| storage_err("open", path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| storage_err("parse", path, e))
}

/// Write JSON to a file atomically (write to temp, then rename)
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), LibroError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    write_atomic(path, "json.tmp", |writer| {
        serde_json::to_writer_pretty(writer, data).map_err(|e| storage_err("serialize", path, e))
    })
}

/// Write arbitrary text atomically (CSV and YAML exports)
pub fn write_text_atomic<P: AsRef<Path>>(path: P, contents: &str) -> Result<(), LibroError> {
    let path = path.as_ref();
    write_atomic(path, "tmp", |writer| {
        writer
            .write_all(contents.as_bytes())
            .map_err(|e| storage_err("write", path, e))
    })
}

fn write_atomic<F>(path: &Path, temp_ext: &str, write: F) -> Result<(), LibroError>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<(), LibroError>,
{
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| storage_err("create directory", parent, e))?;
        }
    }

    // Temp file must live in the same directory for the rename to be atomic
    let temp_path = path.with_extension(temp_ext);
    let file = File::create(&temp_path).map_err(|e| storage_err("create", &temp_path, e))?;

    let mut writer = BufWriter::new(file);
    write(&mut writer)?;
    writer.flush().map_err(|e| storage_err("flush", &temp_path, e))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| storage_err("sync", &temp_path, e))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        storage_err("replace", path, e)
    })
}

/// Check if a JSON file exists and parses
pub fn json_file_valid<P: AsRef<Path>>(path: P) -> bool {
    match File::open(path.as_ref()) {
        Ok(file) => serde_json::from_reader::<_, serde_json::Value>(BufReader::new(file)).is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
    struct Ledger {
        name: String,
        entries: Vec<i64>,
    }

    fn sample() -> Ledger {
        Ledger {
            name: "main".to_string(),
            entries: vec![100, -50],
        }
    }

    #[test]
    fn test_read_missing_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let data: Ledger = read_json(temp_dir.path().join("missing.json")).unwrap();
        assert_eq!(data, Ledger::default());
        assert!(read_json_required::<Ledger, _>(temp_dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("ledger.json");

        write_json_atomic(&path, &sample()).unwrap();

        let loaded: Ledger = read_json(&path).unwrap();
        assert_eq!(loaded, sample());
        assert!(!temp_dir.path().join("nested").join("ledger.json.tmp").exists());
    }

    #[test]
    fn test_write_text() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.csv");

        write_text_atomic(&path, "a,b\n1,2\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a,b\n1,2\n");
        assert!(!temp_dir.path().join("out.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.json");
        fs::write(&path, "not json at all").unwrap();

        assert!(!json_file_valid(&path));
        assert!(read_json::<Ledger, _>(&path).is_err());
        assert!(!json_file_valid(temp_dir.path().join("missing.json")));
    }
}
