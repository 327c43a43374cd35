//! YAML Export functionality
//!
//! Exports the complete database to YAML format for human-readable backup.

use std::io::Write;

use crate::error::{LibroError, LibroResult};
use crate::export::json::FullExport;
use crate::storage::Storage;

fn export_err(e: impl std::fmt::Display) -> LibroError {
    LibroError::Export(e.to_string())
}

/// Export the full database to YAML format
pub fn export_full_yaml<W: Write>(storage: &Storage, writer: &mut W) -> LibroResult<()> {
    let export = FullExport::from_storage(storage)?;

    writeln!(writer, "# Libro full export").map_err(export_err)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(export_err)?;
    writeln!(writer, "# App Version: {}", export.app_version).map_err(export_err)?;
    writeln!(writer, "#").map_err(export_err)?;
    writeln!(writer, "# Contains every journal entry, partner and tax record.").map_err(export_err)?;
    writeln!(writer).map_err(export_err)?;

    serde_yaml::to_writer(writer, &export).map_err(export_err)?;

    Ok(())
}

/// Parse and validate a YAML export
pub fn import_from_yaml(yaml_str: &str) -> LibroResult<FullExport> {
    let export: FullExport =
        serde_yaml::from_str(yaml_str).map_err(|e| LibroError::Import(e.to_string()))?;

    export.validate().map_err(LibroError::Import)?;

    Ok(export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LibroPaths;
    use crate::models::Money;
    use crate::services::JournalService;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_yaml_export_and_back() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::open(LibroPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        JournalService::new(&storage)
            .add_simple(
                NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
                "Rent February",
                Money::from_units(700),
                "acc_rent",
                "acc_bank",
            )
            .unwrap();

        let mut yaml_output = Vec::new();
        export_full_yaml(&storage, &mut yaml_output).unwrap();
        let yaml_string = String::from_utf8(yaml_output).unwrap();

        assert!(yaml_string.starts_with("# Libro full export"));
        assert!(yaml_string.contains("Rent February"));

        // Comments are valid YAML, so the file parses as-is
        let imported = import_from_yaml(&yaml_string).unwrap();
        assert_eq!(imported.journal.len(), 1);
        assert_eq!(imported.journal[0].amount, Money::from_units(700));
    }
}
