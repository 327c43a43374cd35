//! CLI command handler for data import
//!
//! Accepts either a snapshot of the web application's state (merged into
//! the books) or a full export written by `libro export all` (replaces
//! the books).

use std::path::Path;

use clap::ValueEnum;

use crate::error::{LibroError, LibroResult};
use crate::export::{import_from_json, import_from_yaml, FullExport};
use crate::services::ImportService;
use crate::storage::Storage;

/// What kind of file is being imported
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ImportFormat {
    /// Snapshot of the web application's state (camelCase JSON)
    Snapshot,
    /// Full JSON export
    Json,
    /// Full YAML export
    Yaml,
}

/// Guess the format from the extension and, for JSON, the content
pub fn detect_format(path: &Path, contents: &str) -> ImportFormat {
    match path.extension().and_then(|e| e.to_str()).map(str::to_lowercase).as_deref() {
        Some("yaml") | Some("yml") => ImportFormat::Yaml,
        _ if contents.contains("\"schema_version\"") => ImportFormat::Json,
        _ => ImportFormat::Snapshot,
    }
}

/// Handle the import command
pub fn handle_import_command(
    storage: &Storage,
    file: &Path,
    format: Option<ImportFormat>,
    force: bool,
) -> LibroResult<()> {
    if !file.exists() {
        return Err(LibroError::Import(format!("File not found: {}", file.display())));
    }
    let contents = std::fs::read_to_string(file)
        .map_err(|e| LibroError::Import(format!("Failed to read file: {}", e)))?;

    match format.unwrap_or_else(|| detect_format(file, &contents)) {
        ImportFormat::Snapshot => {
            let result = ImportService::new(storage).import_str(&contents)?;

            println!("Import complete");
            println!("{}", "=".repeat(40));
            println!("  Journal entries:   {}", result.entries);
            println!("  Cash-flow items:   {}", result.cash_flow);
            println!("  Budgets:           {}", result.budgets);
            println!("  Partners:          {}", result.partners);
            println!("  Partner movements: {}", result.movements);
            println!("  Tax configs:       {}", result.tax_configs);
            println!("  Tax obligations:   {}", result.obligations);
            println!("  Products:          {}", result.products);
            println!("  Stock movements:   {}", result.stock_movements);

            if !result.warnings.is_empty() {
                println!();
                println!("{} warning(s):", result.warnings.len());
                for warning in result.warnings.iter().take(20) {
                    println!("  - {}", warning);
                }
                if result.warnings.len() > 20 {
                    println!("  ... and {} more", result.warnings.len() - 20);
                }
            }
        }

        format => {
            let export: FullExport = if format == ImportFormat::Yaml {
                import_from_yaml(&contents)?
            } else {
                import_from_json(&contents)?
            };

            if !force && storage.journal.count()? > 0 {
                return Err(LibroError::Validation(
                    "Restoring a full export replaces all existing data. Use --force to continue."
                        .into(),
                ));
            }

            let entries = export.journal.len();
            let exported_at = export.exported_at;
            export.restore_into(storage)?;
            println!("Restored {} journal entries from export of {}", entries, exported_at.format("%Y-%m-%d %H:%M"));
        }
    }

    Ok(())
}
