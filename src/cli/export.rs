//! CLI commands for data export

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use clap::{Subcommand, ValueEnum};

use crate::error::{LibroError, LibroResult};
use crate::export::{csv, json, yaml};
use crate::storage::Storage;

/// Full export format
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// Machine-readable, restorable with `libro import`
    Json,
    /// Human-readable
    Yaml,
}

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export all data to a file
    All {
        output: PathBuf,

        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Export the journal to CSV, one row per posting
    Journal {
        output: PathBuf,
    },

    /// Export the cash-flow plan to CSV
    CashFlow {
        output: PathBuf,
    },

    /// Show what a full export would contain
    Info,
}

fn create_output(path: &Path) -> LibroResult<BufWriter<File>> {
    let file = File::create(path).map_err(|e| {
        LibroError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    Ok(BufWriter::new(file))
}

/// Handle export commands
pub fn handle_export_command(storage: &Storage, cmd: ExportCommands) -> LibroResult<()> {
    match cmd {
        ExportCommands::All {
            output,
            format,
            pretty,
        } => {
            let mut writer = create_output(&output)?;
            match format {
                ExportFormat::Json => json::export_full_json(storage, &mut writer, pretty)?,
                ExportFormat::Yaml => yaml::export_full_yaml(storage, &mut writer)?,
            }
            println!("Full database exported to: {}", output.display());
        }

        ExportCommands::Journal { output } => {
            let rows = csv::export_journal_csv(storage, &mut create_output(&output)?)?;
            println!("Exported {} postings to: {}", rows, output.display());
        }

        ExportCommands::CashFlow { output } => {
            let count = csv::export_cash_flow_csv(storage, &mut create_output(&output)?)?;
            println!("Exported {} cash-flow items to: {}", count, output.display());
        }

        ExportCommands::Info => handle_export_info(storage)?,
    }

    Ok(())
}

fn handle_export_info(storage: &Storage) -> LibroResult<()> {
    let export = json::FullExport::from_storage(storage)?;

    println!("Export Information");
    println!("==================\n");

    println!("Schema Version: {}", export.schema_version);
    println!("App Version:    {}", export.app_version);
    println!();

    println!("Data Summary:");
    println!("  Journal entries:   {}", export.metadata.entry_count);
    println!("  Cash-flow items:   {}", export.metadata.cash_flow_count);
    println!("  Budgets:           {}", export.budgets.len());
    println!("  Partners:          {}", export.metadata.partner_count);
    println!("  Products:          {}", export.metadata.product_count);
    println!("  Tax obligations:   {}", export.metadata.obligation_count);
    println!();

    if let (Some(earliest), Some(latest)) = (&export.metadata.earliest_entry, &export.metadata.latest_entry) {
        println!("Journal Date Range: {} to {}", earliest, latest);
    }

    println!("\nExamples:");
    println!("  libro export all backup.json --pretty");
    println!("  libro export all books.yaml --format yaml");
    println!("  libro export journal journal.csv");

    Ok(())
}
