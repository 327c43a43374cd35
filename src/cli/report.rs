//! CLI commands for reports
//!
//! Financial statements and registers, printed to the terminal or written
//! to a CSV file with `--output`.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::error::{LibroError, LibroResult};
use crate::reports::{
    AccountRegisterReport, BalanceSheetReport, BudgetOverviewReport, IncomeStatementReport,
    TrialBalanceReport,
};
use crate::storage::Storage;

use super::args::{parse_date, parse_date_or_today, parse_month_or_current, parse_optional_date};

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Debit and credit totals of every account
    #[command(alias = "trial")]
    TrialBalance {
        /// Only entries up to this date (YYYY-MM-DD)
        #[arg(long)]
        as_of: Option<String>,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Income and expenses over a period
    #[command(alias = "pnl")]
    Income {
        /// Month to report on (YYYY-MM, default current)
        #[arg(short, long, conflicts_with_all = ["from", "to"])]
        month: Option<String>,

        #[arg(long, requires = "to")]
        from: Option<String>,

        #[arg(long, requires = "from")]
        to: Option<String>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Assets, liabilities and equity at a date
    BalanceSheet {
        #[arg(long)]
        as_of: Option<String>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Postings and running balance of one account
    Register {
        /// Account code or name
        account: String,

        #[arg(long)]
        from: Option<String>,

        #[arg(long)]
        to: Option<String>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Budget vs actual for a month
    Budget {
        #[arg(short, long)]
        month: Option<String>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn create_output(path: &Path) -> LibroResult<BufWriter<File>> {
    let file = File::create(path).map_err(|e| {
        LibroError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    Ok(BufWriter::new(file))
}

/// Handle a report command
pub fn handle_report_command(storage: &Storage, cmd: ReportCommands) -> LibroResult<()> {
    match cmd {
        ReportCommands::TrialBalance { as_of, output } => {
            let report = TrialBalanceReport::generate(storage, parse_optional_date(as_of.as_deref())?)?;
            match output {
                Some(path) => {
                    report.export_csv(&mut create_output(&path)?)?;
                    println!("Trial balance exported to: {}", path.display());
                }
                None => print!("{}", report.format_terminal()),
            }
        }

        ReportCommands::Income {
            month,
            from,
            to,
            output,
        } => {
            let (from, to) = match (from, to) {
                (Some(from), Some(to)) => (parse_date(&from)?, parse_date(&to)?),
                _ => {
                    let month = parse_month_or_current(month.as_deref())?;
                    (month.first_day(), month.last_day())
                }
            };
            let report = IncomeStatementReport::generate(storage, from, to)?;
            match output {
                Some(path) => {
                    report.export_csv(&mut create_output(&path)?)?;
                    println!("Income statement exported to: {}", path.display());
                }
                None => print!("{}", report.format_terminal()),
            }
        }

        ReportCommands::BalanceSheet { as_of, output } => {
            let report = BalanceSheetReport::generate(storage, parse_date_or_today(as_of.as_deref())?)?;
            match output {
                Some(path) => {
                    report.export_csv(&mut create_output(&path)?)?;
                    println!("Balance sheet exported to: {}", path.display());
                }
                None => print!("{}", report.format_terminal()),
            }
        }

        ReportCommands::Register {
            account,
            from,
            to,
            output,
        } => {
            let report = AccountRegisterReport::generate(
                storage,
                &account,
                parse_optional_date(from.as_deref())?,
                parse_optional_date(to.as_deref())?,
            )?;
            match output {
                Some(path) => {
                    report.export_csv(&mut create_output(&path)?)?;
                    println!("Register exported to: {}", path.display());
                }
                None => print!("{}", report.format_terminal()),
            }
        }

        ReportCommands::Budget { month, output } => {
            let month = parse_month_or_current(month.as_deref())?;
            let report = BudgetOverviewReport::generate(storage, month)?;
            match output {
                Some(path) => {
                    report.export_csv(&mut create_output(&path)?)?;
                    println!("Budget report exported to: {}", path.display());
                }
                None => print!("{}", report.format_terminal()),
            }
        }
    }

    Ok(())
}
