//! Partner CLI commands
//!
//! Clients and suppliers, their current-account movements and statements.

use clap::Subcommand;

use crate::display::{format_movements, format_partner_details, format_partner_overview, format_statement};
use crate::error::{LibroError, LibroResult};
use crate::models::{MovementKind, MovementStatus, PartnerKind};
use crate::services::{NewMovement, PartnerDetails, PartnerService};
use crate::storage::Storage;

use super::args::{parse_date_or_today, parse_money, parse_optional_date, today};

/// Partner subcommands
#[derive(Subcommand)]
pub enum PartnerCommands {
    /// Add a client or supplier
    Add {
        name: String,
        /// "client", "supplier" or "both"
        #[arg(short, long, default_value = "client")]
        kind: String,
        #[arg(long)]
        tax_id: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        /// Payment terms in days
        #[arg(long)]
        credit_days: Option<u32>,
        #[arg(long)]
        credit_limit: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Change partner fields
    Edit {
        /// Partner ID, prefix or name
        partner: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(short, long)]
        kind: Option<String>,
        #[arg(long)]
        tax_id: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        credit_days: Option<u32>,
        #[arg(long, conflicts_with = "no_limit")]
        credit_limit: Option<String>,
        /// Remove the credit limit
        #[arg(long)]
        no_limit: bool,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Balances of every partner
    List {
        #[arg(short, long)]
        kind: Option<String>,
    },
    /// Partner details and statement
    Show {
        partner: String,
    },
    /// Delete a partner
    Delete {
        partner: String,
        /// Also delete its movements
        #[arg(short, long)]
        force: bool,
    },
    /// Record an invoice, payment, credit or debit note
    Record {
        partner: String,
        /// "invoice", "payment", "credit-note" or "debit-note"
        kind: String,
        amount: String,
        #[arg(short, long)]
        date: Option<String>,
        /// Due date (default: date plus the partner's credit days)
        #[arg(long)]
        due: Option<String>,
        #[arg(short, long, default_value = "")]
        reference: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// List movements, optionally for one partner
    Movements {
        partner: Option<String>,
    },
    /// Set the status of a movement
    Status {
        /// Movement ID or prefix
        movement: String,
        /// "pending", "partial" or "paid"
        status: String,
    },
    /// Delete a movement
    Unrecord {
        movement: String,
    },
    /// Overdue charges across all partners
    Overdue,
}

fn parse_kind(s: &str) -> LibroResult<PartnerKind> {
    PartnerKind::parse(s).ok_or_else(|| {
        LibroError::Validation(format!("Unknown partner kind '{}'. Use client, supplier or both", s))
    })
}

/// Handle a partner command
pub fn handle_partner_command(storage: &Storage, cmd: PartnerCommands) -> LibroResult<()> {
    let service = PartnerService::new(storage);

    match cmd {
        PartnerCommands::Add {
            name,
            kind,
            tax_id,
            email,
            phone,
            credit_days,
            credit_limit,
            notes,
        } => {
            let details = PartnerDetails {
                tax_id,
                email,
                phone,
                credit_days,
                credit_limit: credit_limit.as_deref().map(parse_money).transpose()?.map(Some),
                notes,
                ..Default::default()
            };
            let partner = service.create(&name, parse_kind(&kind)?, details)?;
            println!("Added {} {} ({})", partner.kind, partner.name, partner.id);
        }

        PartnerCommands::Edit {
            partner,
            name,
            kind,
            tax_id,
            email,
            phone,
            credit_days,
            credit_limit,
            no_limit,
            notes,
        } => {
            let existing = service.find(&partner)?;
            let credit_limit = if no_limit {
                Some(None)
            } else {
                credit_limit.as_deref().map(parse_money).transpose()?.map(Some)
            };
            let details = PartnerDetails {
                name,
                kind: kind.as_deref().map(parse_kind).transpose()?,
                tax_id,
                email,
                phone,
                credit_days,
                credit_limit,
                notes,
            };
            let updated = service.update(existing.id, details)?;
            println!("Updated {}", updated.name);
        }

        PartnerCommands::List { kind } => {
            let kind = kind.as_deref().map(parse_kind).transpose()?;
            let mut overview = service.summaries(today())?;
            if let Some(kind) = kind {
                overview.partners.retain(|s| s.partner.kind == kind);
            }
            print!("{}", format_partner_overview(&overview));
        }

        PartnerCommands::Show { partner } => {
            let partner = service.find(&partner)?;
            print!("{}", format_partner_details(&partner));
            println!();
            print!("{}", format_statement(&partner, &service.statement(partner.id)?));
        }

        PartnerCommands::Delete { partner, force } => {
            let partner = service.find(&partner)?;
            let deleted = service.delete(partner.id, force)?;
            println!("Deleted {}", deleted.name);
        }

        PartnerCommands::Record {
            partner,
            kind,
            amount,
            date,
            due,
            reference,
            description,
        } => {
            let partner = service.find(&partner)?;
            let kind = MovementKind::parse(&kind).ok_or_else(|| {
                LibroError::Validation(format!(
                    "Unknown movement kind '{}'. Use invoice, payment, credit-note or debit-note",
                    kind
                ))
            })?;
            let input = NewMovement {
                kind,
                date: parse_date_or_today(date.as_deref())?,
                amount: parse_money(&amount)?,
                due_date: parse_optional_date(due.as_deref())?,
                reference,
                description,
            };
            let movement = service.record_movement(partner.id, input)?;
            println!("Recorded {} {} for {}: {}", movement.kind, movement.id, partner.name, movement.amount);
            if let Some(due) = movement.due_date {
                println!("Due: {}", due);
            }
            println!("Balance: {}", service.balance(partner.id)?);
        }

        PartnerCommands::Movements { partner } => {
            let partner_id = match partner {
                Some(p) => Some(service.find(&p)?.id),
                None => None,
            };
            print!("{}", format_movements(&service.movements(partner_id)?, today()));
        }

        PartnerCommands::Status { movement, status } => {
            let movement = service.find_movement(&movement)?;
            let status = MovementStatus::parse(&status).ok_or_else(|| {
                LibroError::Validation(format!(
                    "Unknown status '{}'. Use pending, partial or paid",
                    status
                ))
            })?;
            let updated = service.set_status(movement.id, status)?;
            println!("Movement {} is now {}", updated.id, updated.status);
        }

        PartnerCommands::Unrecord { movement } => {
            let movement = service.find_movement(&movement)?;
            let deleted = service.delete_movement(movement.id)?;
            println!("Deleted {} {}", deleted.kind, deleted.id);
        }

        PartnerCommands::Overdue => {
            let overdue = service.overdue(today())?;
            if overdue.is_empty() {
                println!("Nothing overdue.");
            } else {
                print!("{}", format_movements(&overdue, today()));
            }
        }
    }

    Ok(())
}
