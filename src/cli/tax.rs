//! Tax CLI commands
//!
//! Tax rates, the obligations calendar and the monthly VAT position.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_obligations, format_tax_configs, format_vat_position};
use crate::error::LibroResult;
use crate::models::ObligationStatus;
use crate::services::{ObligationFilter, TaxConfigUpdate, TaxService};
use crate::storage::Storage;

use super::args::{
    parse_date_or_today, parse_money, parse_month, parse_month_or_current, parse_optional_date,
    parse_rate_bps, today,
};

/// Tax subcommands
#[derive(Subcommand)]
pub enum TaxCommands {
    /// Show configured taxes
    Configs,
    /// Change a tax's rate, name, jurisdiction or due day
    Set {
        /// Tax code (e.g., IVA)
        code: String,
        #[arg(long)]
        name: Option<String>,
        /// Rate in percent (e.g., 21 or 10.5)
        #[arg(long)]
        rate: Option<String>,
        #[arg(long)]
        jurisdiction: Option<String>,
        /// Day of the following month the tax falls due
        #[arg(long)]
        due_day: Option<u32>,
    },
    /// Register an obligation for a period
    Add {
        code: String,
        /// Period (YYYY-MM)
        period: String,
        amount: String,
        /// Due date (default: the tax's due day of the next month)
        #[arg(long)]
        due: Option<String>,
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// List obligations
    List {
        #[arg(short, long)]
        code: Option<String>,
        #[arg(short, long)]
        period: Option<String>,
        #[arg(long, conflicts_with = "paid")]
        pending: bool,
        #[arg(long)]
        paid: bool,
    },
    /// Mark an obligation as paid
    Pay {
        /// Obligation ID or prefix
        id: String,
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Return a paid obligation to pending
    Reopen {
        id: String,
    },
    /// Delete an obligation
    Delete {
        id: String,
    },
    /// Obligations due soon, plus overdue ones
    Upcoming {
        /// Window in days (default from settings)
        #[arg(short, long)]
        days: Option<i64>,
    },
    /// VAT debit, credit and net position for a month
    Vat {
        month: Option<String>,
    },
}

/// Handle a tax command
pub fn handle_tax_command(storage: &Storage, settings: &Settings, cmd: TaxCommands) -> LibroResult<()> {
    let service = TaxService::new(storage);

    match cmd {
        TaxCommands::Configs => {
            print!("{}", format_tax_configs(&service.configs()?));
        }

        TaxCommands::Set {
            code,
            name,
            rate,
            jurisdiction,
            due_day,
        } => {
            let changes = TaxConfigUpdate {
                name,
                rate_bps: rate.as_deref().map(parse_rate_bps).transpose()?,
                jurisdiction,
                due_day,
            };
            let config = service.set_config(&code, changes)?;
            println!(
                "{} ({}) set to {:.2}%, due day {}",
                config.code,
                config.name,
                config.rate_percent(),
                config.due_day
            );
        }

        TaxCommands::Add {
            code,
            period,
            amount,
            due,
            notes,
        } => {
            let obligation = service.add_obligation(
                &code,
                parse_month(&period)?,
                parse_money(&amount)?,
                parse_optional_date(due.as_deref())?,
                notes.as_deref(),
            )?;
            println!(
                "Added {} {} for {}: {} due {}",
                obligation.tax_code, obligation.id, obligation.period, obligation.amount, obligation.due_date
            );
        }

        TaxCommands::List {
            code,
            period,
            pending,
            paid,
        } => {
            let status = match (pending, paid) {
                (true, _) => Some(ObligationStatus::Pending),
                (_, true) => Some(ObligationStatus::Paid),
                _ => None,
            };
            let filter = ObligationFilter {
                tax_code: code,
                period: period.as_deref().map(parse_month).transpose()?,
                status,
            };
            print!("{}", format_obligations(&service.list(&filter)?, today()));
        }

        TaxCommands::Pay { id, date } => {
            let obligation = service.find_obligation(&id)?;
            let paid = service.mark_paid(obligation.id, parse_date_or_today(date.as_deref())?)?;
            println!("{} {} marked paid", paid.tax_code, paid.period);
        }

        TaxCommands::Reopen { id } => {
            let obligation = service.find_obligation(&id)?;
            let reopened = service.reopen(obligation.id)?;
            println!("{} {} is pending again", reopened.tax_code, reopened.period);
        }

        TaxCommands::Delete { id } => {
            let obligation = service.find_obligation(&id)?;
            let deleted = service.delete_obligation(obligation.id)?;
            println!("Deleted {} {}", deleted.tax_code, deleted.period);
        }

        TaxCommands::Upcoming { days } => {
            let days = days.unwrap_or(settings.upcoming_days);
            let today = today();
            let overdue = service.overdue(today)?;
            if !overdue.is_empty() {
                println!("Overdue");
                print!("{}", format_obligations(&overdue, today));
                println!();
            }
            println!("Due in the next {} days", days);
            print!("{}", format_obligations(&service.upcoming(today, days)?, today));
        }

        TaxCommands::Vat { month } => {
            let month = parse_month_or_current(month.as_deref())?;
            print!("{}", format_vat_position(&service.vat_position(month)?));
        }
    }

    Ok(())
}
