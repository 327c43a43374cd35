//! Cash-flow CLI commands

use clap::Subcommand;

use crate::display::{format_cash_flow_list, format_projection};
use crate::error::{LibroError, LibroResult};
use crate::models::{FlowKind, FlowStatus};
use crate::services::{CashFlowFilter, CashFlowService, CashFlowUpdate};
use crate::storage::Storage;

use super::args::{parse_date, parse_date_or_today, parse_money, parse_optional_date, today};

/// Cash-flow subcommands
#[derive(Subcommand)]
pub enum CashFlowCommands {
    /// Plan an expected income or expense
    Add {
        /// "income" or "expense"
        kind: String,
        description: String,
        amount: String,
        /// Expected date (YYYY-MM-DD, default today)
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        /// Mark as a monthly recurring item
        #[arg(short, long)]
        recurring: bool,
    },
    /// List planned items
    List {
        /// Only "income" or "expense"
        #[arg(short, long)]
        kind: Option<String>,
        #[arg(long, conflicts_with = "realized")]
        pending: bool,
        #[arg(long)]
        realized: bool,
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
    },
    /// Change fields of an item
    Update {
        /// Item ID or prefix
        id: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(short, long)]
        amount: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(long)]
        recurring: Option<bool>,
    },
    /// Switch an item between pending and realized
    Toggle {
        id: String,
    },
    /// Delete an item
    Delete {
        id: String,
    },
    /// Projected liquid balance over the pending items
    Projection,
}

fn parse_kind(s: &str) -> LibroResult<FlowKind> {
    FlowKind::parse(s).ok_or_else(|| {
        LibroError::Validation(format!("Unknown kind '{}'. Use income or expense", s))
    })
}

/// Handle a cash-flow command
pub fn handle_cashflow_command(storage: &Storage, cmd: CashFlowCommands) -> LibroResult<()> {
    let service = CashFlowService::new(storage);

    match cmd {
        CashFlowCommands::Add {
            kind,
            description,
            amount,
            date,
            category,
            recurring,
        } => {
            let item = service.add(
                parse_kind(&kind)?,
                &description,
                parse_money(&amount)?,
                parse_date_or_today(date.as_deref())?,
                category.as_deref(),
                recurring,
            )?;
            println!("Planned {} {}: {} on {}", item.kind, item.id, item.amount, item.date);
        }

        CashFlowCommands::List {
            kind,
            pending,
            realized,
            from,
            to,
        } => {
            let status = match (pending, realized) {
                (true, _) => Some(FlowStatus::Pending),
                (_, true) => Some(FlowStatus::Realized),
                _ => None,
            };
            let filter = CashFlowFilter {
                kind: kind.as_deref().map(parse_kind).transpose()?,
                status,
                from: parse_optional_date(from.as_deref())?,
                to: parse_optional_date(to.as_deref())?,
            };
            print!("{}", format_cash_flow_list(&service.list(&filter)?));

            let overdue = service.overdue(today())?;
            if !overdue.is_empty() {
                println!();
                println!("{} pending item(s) are past their date.", overdue.len());
            }
        }

        CashFlowCommands::Update {
            id,
            description,
            amount,
            date,
            category,
            recurring,
        } => {
            let item = service.find(&id)?;
            let changes = CashFlowUpdate {
                description,
                amount: amount.as_deref().map(parse_money).transpose()?,
                date: date.as_deref().map(parse_date).transpose()?,
                category,
                is_recurring: recurring,
            };
            let updated = service.update(item.id, changes)?;
            println!("Updated {}: {} {} on {}", updated.id, updated.description, updated.amount, updated.date);
        }

        CashFlowCommands::Toggle { id } => {
            let item = service.find(&id)?;
            let toggled = service.toggle_status(item.id)?;
            println!("{} is now {}", toggled.description, toggled.status);
        }

        CashFlowCommands::Delete { id } => {
            let item = service.find(&id)?;
            let deleted = service.delete(item.id)?;
            println!("Deleted {}: {}", deleted.id, deleted.description);
        }

        CashFlowCommands::Projection => {
            print!("{}", format_projection(&service.projection(today())?));
        }
    }

    Ok(())
}
