//! Journal CLI commands

use clap::Subcommand;

use crate::display::{format_chart, format_entry_details, format_entry_list, format_invalid_entries};
use crate::error::LibroResult;
use crate::reports::AccountRegisterReport;
use crate::services::{JournalFilter, JournalService};
use crate::storage::Storage;

use super::args::{parse_date_or_today, parse_money, parse_optional_date, parse_postings};

/// Journal subcommands
#[derive(Subcommand)]
pub enum JournalCommands {
    /// Record a two-account entry
    Add {
        /// What happened
        description: String,
        /// Amount (e.g., "1250.50")
        amount: String,
        /// Account debited (code or name)
        #[arg(short, long)]
        debit: String,
        /// Account credited (code or name)
        #[arg(short, long)]
        credit: String,
        /// Entry date (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Record a multi-line entry; repeat --debit/--credit as ACCOUNT=AMOUNT
    Compound {
        description: String,
        #[arg(short, long = "debit", required = true)]
        debits: Vec<String>,
        #[arg(short, long = "credit", required = true)]
        credits: Vec<String>,
        #[arg(long)]
        date: Option<String>,
    },
    /// List entries
    List {
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
        /// Only entries touching this account
        #[arg(short, long)]
        account: Option<String>,
        /// Search the description
        #[arg(short, long)]
        search: Option<String>,
        /// Show only the newest N entries
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Show every line of an entry
    Show {
        /// Entry ID or prefix
        id: String,
    },
    /// Delete an entry
    Delete {
        id: String,
    },
    /// Postings and running balance of one account
    Ledger {
        account: String,
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
    },
    /// Find unbalanced entries or unknown accounts
    Verify,
    /// Print the chart of accounts
    Accounts,
}

/// Handle a journal command
pub fn handle_journal_command(storage: &Storage, cmd: JournalCommands) -> LibroResult<()> {
    let service = JournalService::new(storage);

    match cmd {
        JournalCommands::Add {
            description,
            amount,
            debit,
            credit,
            date,
        } => {
            let date = parse_date_or_today(date.as_deref())?;
            let entry = service.add_simple(date, &description, parse_money(&amount)?, &debit, &credit)?;
            println!("Recorded entry {}: {}", entry.id, entry);
        }

        JournalCommands::Compound {
            description,
            debits,
            credits,
            date,
        } => {
            let date = parse_date_or_today(date.as_deref())?;
            let entry = service.add_compound(
                date,
                &description,
                parse_postings(&debits)?,
                parse_postings(&credits)?,
            )?;
            println!("Recorded compound entry {}", entry.id);
            print!("{}", format_entry_details(&entry));
        }

        JournalCommands::List {
            from,
            to,
            account,
            search,
            limit,
        } => {
            let filter = JournalFilter {
                from: parse_optional_date(from.as_deref())?,
                to: parse_optional_date(to.as_deref())?,
                account,
                text: search,
                limit,
            };
            let entries = service.list(&filter)?;
            print!("{}", format_entry_list(&entries));
            if !entries.is_empty() {
                println!("{} entr{}", entries.len(), if entries.len() == 1 { "y" } else { "ies" });
            }
        }

        JournalCommands::Show { id } => {
            let entry = service.find(&id)?;
            print!("{}", format_entry_details(&entry));
        }

        JournalCommands::Delete { id } => {
            let entry = service.find(&id)?;
            let deleted = service.delete(entry.id)?;
            println!("Deleted entry {}: {}", deleted.id, deleted);
        }

        JournalCommands::Ledger { account, from, to } => {
            let report = AccountRegisterReport::generate(
                storage,
                &account,
                parse_optional_date(from.as_deref())?,
                parse_optional_date(to.as_deref())?,
            )?;
            print!("{}", report.format_terminal());
        }

        JournalCommands::Verify => {
            print!("{}", format_invalid_entries(&service.verify()?));
        }

        JournalCommands::Accounts => {
            print!("{}", format_chart());
        }
    }

    Ok(())
}
