//! Budget CLI commands
//!
//! Monthly spending limits per expense account and the budget vs actual
//! overview.

use clap::Subcommand;

use crate::error::LibroResult;
use crate::reports::BudgetOverviewReport;
use crate::services::BudgetService;
use crate::storage::Storage;

use super::args::{parse_money, parse_month, parse_month_or_current};

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Budget vs actual for a month
    Show {
        /// Month (YYYY-MM, default current)
        month: Option<String>,
    },

    /// Set the budget of an expense account
    Set {
        /// Expense account (code or name)
        account: String,
        amount: String,
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Remove an account from a month's budget
    Remove {
        account: String,
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Copy every line of one month's budget to another
    Copy {
        /// Source month (YYYY-MM)
        from: String,
        /// Target month (YYYY-MM)
        to: String,
    },

    /// List the months that have a budget
    List,
}

/// Handle a budget command
pub fn handle_budget_command(storage: &Storage, cmd: BudgetCommands) -> LibroResult<()> {
    let service = BudgetService::new(storage);

    match cmd {
        BudgetCommands::Show { month } => {
            let month = parse_month_or_current(month.as_deref())?;
            let report = BudgetOverviewReport::generate(storage, month)?;
            print!("{}", report.format_terminal());
        }

        BudgetCommands::Set {
            account,
            amount,
            month,
        } => {
            let month = parse_month_or_current(month.as_deref())?;
            let amount = parse_money(&amount)?;
            let budget = service.set_category(month, &account, amount)?;
            println!("Budget for {} set: {} on {}", month, amount, account);
            println!("Month total: {}", budget.total());
        }

        BudgetCommands::Remove { account, month } => {
            let month = parse_month_or_current(month.as_deref())?;
            let budget = service.remove_category(month, &account)?;
            println!("Removed {} from the {} budget", account, month);
            println!("Month total: {}", budget.total());
        }

        BudgetCommands::Copy { from, to } => {
            let (from, to) = (parse_month(&from)?, parse_month(&to)?);
            let budget = service.copy_month(from, to)?;
            println!(
                "Copied {} line(s) from {} to {} (total {})",
                budget.categories.len(),
                from,
                to,
                budget.total()
            );
        }

        BudgetCommands::List => {
            let budgets = service.list()?;
            if budgets.is_empty() {
                println!("No budgets yet. Create one with 'libro budget set'.");
                return Ok(());
            }
            println!("{:<10} {:>6} {:>14}", "Month", "Lines", "Total");
            println!("{}", "-".repeat(32));
            for budget in budgets {
                println!(
                    "{:<10} {:>6} {:>14}",
                    budget.month.to_string(),
                    budget.categories.len(),
                    budget.total()
                );
            }
        }
    }

    Ok(())
}
