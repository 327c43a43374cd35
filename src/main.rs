use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use libro::cli::{
    handle_assistant_command, handle_audit_command, handle_auth_command, handle_backup_command,
    handle_budget_command, handle_cashflow_command, handle_dashboard_command, handle_export_command,
    handle_import_command, handle_inventory_command, handle_journal_command,
    handle_partner_command, handle_report_command, handle_tax_command, ImportFormat,
};
use libro::config::{paths::LibroPaths, settings::Settings};
use libro::storage::init::needs_initialization;
use libro::storage::{initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "libro",
    version,
    about = "Double-entry bookkeeping for small businesses",
    long_about = "Libro keeps a double-entry journal for a small business and builds \
                  cash-flow projections, budgets, partner accounts, tax obligations \
                  and financial statements from it, from the command line or a \
                  terminal UI."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and seed the default tax table
    Init,

    /// Show the current configuration, or change it
    Config {
        /// Business name shown on the dashboard
        #[arg(long)]
        business_name: Option<String>,
        /// Currency symbol
        #[arg(long)]
        currency: Option<String>,
        /// Days ahead that count as "due soon"
        #[arg(long)]
        upcoming_days: Option<i64>,
        /// Model used by the assistant
        #[arg(long)]
        assistant_model: Option<String>,
    },

    /// Month summary: totals, balances, what is due
    #[command(alias = "dash")]
    Dashboard {
        /// Month (YYYY-MM), defaults to the current one
        #[arg(short, long)]
        month: Option<String>,
        /// Also print the income/expense trend for this many months
        #[arg(long)]
        trend: Option<usize>,
    },

    /// Journal entries and the chart of accounts
    #[command(subcommand, alias = "j")]
    Journal(libro::cli::JournalCommands),

    /// Expected incomes and expenses
    #[command(subcommand, alias = "cf")]
    Cashflow(libro::cli::CashFlowCommands),

    /// Monthly budgets per expense account
    #[command(subcommand)]
    Budget(libro::cli::BudgetCommands),

    /// Clients, suppliers and their current accounts
    #[command(subcommand)]
    Partner(libro::cli::PartnerCommands),

    /// Products and stock movements
    #[command(subcommand, alias = "inv")]
    Inventory(libro::cli::InventoryCommands),

    /// Tax table and obligations
    #[command(subcommand)]
    Tax(libro::cli::TaxCommands),

    /// Financial statements
    #[command(subcommand)]
    Report(libro::cli::ReportCommands),

    /// Ask the assistant, or read entries from text and images
    #[command(subcommand, alias = "ai")]
    Assistant(libro::cli::AssistantCommands),

    /// Account sign-up, sign-in and sign-out
    #[command(subcommand)]
    Auth(libro::cli::AuthCommands),

    /// Export data
    #[command(subcommand)]
    Export(libro::cli::ExportCommands),

    /// Import a legacy snapshot or a full export
    Import {
        /// File to import
        file: PathBuf,
        /// Format, detected from the file when omitted
        #[arg(short, long, value_enum)]
        format: Option<ImportFormat>,
        /// Replace existing data when importing a full export
        #[arg(long)]
        force: bool,
    },

    /// Backups
    #[command(subcommand)]
    Backup(libro::cli::BackupCommands),

    /// Show the audit log
    Audit {
        /// Only entries for this entity type (entry, cashflow, partner, ...)
        #[arg(short = 't', long)]
        entity_type: Option<String>,
        /// Only entries for this entity id
        #[arg(short, long)]
        entity: Option<String>,
        /// Only the last N days
        #[arg(short, long)]
        days: Option<i64>,
        /// Maximum number of entries
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },

    /// Launch the interactive TUI
    #[command(alias = "ui")]
    Tui,
}

fn main() -> Result<()> {
    libro::logging::init_tracing();
    let cli = Cli::parse();

    let paths = LibroPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing Libro at: {}", paths.base_dir().display());
            initialize_storage(&paths)?;
            settings.setup_completed = true;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("The default tax table (IVA, IIBB, GAN, MONO, CS) has been created.");
            println!("Run 'libro journal accounts' to see the chart of accounts.");
        }
        Some(Commands::Config {
            business_name,
            currency,
            upcoming_days,
            assistant_model,
        }) => {
            let changing = business_name.is_some()
                || currency.is_some()
                || upcoming_days.is_some()
                || assistant_model.is_some();
            if let Some(name) = business_name {
                settings.business_name = name;
            }
            if let Some(symbol) = currency {
                settings.currency_symbol = symbol;
            }
            if let Some(days) = upcoming_days {
                if days < 0 {
                    anyhow::bail!("--upcoming-days cannot be negative");
                }
                settings.upcoming_days = days;
            }
            if let Some(model) = assistant_model {
                settings.assistant.model = model;
            }
            if changing {
                settings.save(&paths)?;
                println!("Settings saved.");
                println!();
            }
            print_config(&paths, &settings);
        }
        Some(Commands::Dashboard { month, trend }) => {
            let storage = open_books(&paths)?;
            handle_dashboard_command(&storage, &settings, month.as_deref(), trend)?;
        }
        Some(Commands::Journal(cmd)) => handle_journal_command(&open_books(&paths)?, cmd)?,
        Some(Commands::Cashflow(cmd)) => handle_cashflow_command(&open_books(&paths)?, cmd)?,
        Some(Commands::Budget(cmd)) => handle_budget_command(&open_books(&paths)?, cmd)?,
        Some(Commands::Partner(cmd)) => handle_partner_command(&open_books(&paths)?, cmd)?,
        Some(Commands::Inventory(cmd)) => handle_inventory_command(&open_books(&paths)?, cmd)?,
        Some(Commands::Tax(cmd)) => handle_tax_command(&open_books(&paths)?, &settings, cmd)?,
        Some(Commands::Report(cmd)) => handle_report_command(&open_books(&paths)?, cmd)?,
        Some(Commands::Assistant(cmd)) => {
            handle_assistant_command(&open_books(&paths)?, &settings, cmd)?;
        }
        Some(Commands::Auth(cmd)) => handle_auth_command(&paths, &settings, cmd)?,
        Some(Commands::Export(cmd)) => handle_export_command(&open_books(&paths)?, cmd)?,
        Some(Commands::Import { file, format, force }) => {
            handle_import_command(&open_books(&paths)?, &file, format, force)?;
        }
        Some(Commands::Backup(cmd)) => handle_backup_command(&paths, &settings, cmd)?,
        Some(Commands::Audit {
            entity_type,
            entity,
            days,
            limit,
        }) => {
            let storage = open_books(&paths)?;
            handle_audit_command(&storage, entity_type.as_deref(), entity, days, limit)?;
        }
        Some(Commands::Tui) => {
            let storage = open_books(&paths)?;
            libro::tui::run_tui(&storage, &settings, &paths)?;
        }
        None => {
            println!("Libro - double-entry bookkeeping for small businesses");
            println!();
            println!("Run 'libro --help' for usage information.");
            println!("Run 'libro dashboard' for this month's summary.");
            println!("Run 'libro tui' to launch the interactive interface.");
        }
    }

    Ok(())
}

/// Open storage, seeding the tax table on first use
fn open_books(paths: &LibroPaths) -> Result<Storage> {
    if needs_initialization(paths) {
        initialize_storage(paths)?;
    }
    Ok(Storage::open(paths.clone())?)
}

fn print_config(paths: &LibroPaths, settings: &Settings) {
    println!("Libro Configuration");
    println!("===================");
    println!("Config directory: {}", paths.config_dir().display());
    println!("Data directory:   {}", paths.data_dir().display());
    println!("Backup directory: {}", paths.backup_dir().display());
    println!("Audit log:        {}", paths.audit_log().display());
    println!();
    println!("Settings:");
    println!("  Business name:    {}", settings.business_name);
    println!("  Currency symbol:  {}", settings.currency_symbol);
    println!("  Date format:      {}", settings.date_format);
    println!("  Due-soon window:  {} days", settings.upcoming_days);
    println!(
        "  Backups kept:     {} daily, {} monthly",
        settings.backup_retention.daily_count, settings.backup_retention.monthly_count
    );
    println!("  Assistant model:  {}", settings.assistant.model);
    println!(
        "  Supabase:         {}",
        if settings.supabase_url().is_some() && settings.supabase_anon_key().is_some() {
            "configured"
        } else {
            "not configured"
        }
    );
}
