//! CSV Export functionality
//!
//! Spreadsheet-friendly dumps of the journal (one row per posting) and of
//! the cash-flow plan.

use std::io::Write;

use crate::error::{LibroError, LibroResult};
use crate::models::account::find_account;
use crate::models::Money;
use crate::storage::Storage;

const JOURNAL_HEADER: [&str; 8] = [
    "Entry", "Date", "Description", "Side", "Account", "Account Name", "Amount", "Compound",
];

const CASH_FLOW_HEADER: [&str; 8] = [
    "ID", "Date", "Kind", "Status", "Description", "Category", "Amount", "Recurring",
];

fn csv_err(e: impl std::fmt::Display) -> LibroError {
    LibroError::Export(format!("CSV write error: {}", e))
}

fn amount(m: Money) -> String {
    format!("{:.2}", m.as_decimal())
}

fn writer<W: Write>(out: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out)
}

/// Export every journal posting, oldest entry first
pub fn export_journal_csv<W: Write>(storage: &Storage, out: &mut W) -> LibroResult<usize> {
    let mut entries = storage.journal.get_all()?;
    entries.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));

    let mut csv = writer(out);
    csv.write_record(JOURNAL_HEADER).map_err(csv_err)?;

    let mut rows = 0;
    for entry in &entries {
        let compound = entry.is_compound().to_string();
        for (side, posting) in entry.postings_with_side() {
            let name = find_account(&posting.account_id)
                .map(|a| a.name)
                .unwrap_or("Unknown");
            csv.write_record([
                entry.id.as_uuid().to_string(),
                entry.date.to_string(),
                entry.description.clone(),
                side.to_string(),
                posting.account_id.clone(),
                name.to_string(),
                amount(posting.amount),
                compound.clone(),
            ])
            .map_err(csv_err)?;
            rows += 1;
        }
    }

    csv.flush().map_err(csv_err)?;
    Ok(rows)
}

/// Export the cash-flow plan in date order
pub fn export_cash_flow_csv<W: Write>(storage: &Storage, out: &mut W) -> LibroResult<usize> {
    let mut items = storage.cash_flow.get_all()?;
    items.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));

    let mut csv = writer(out);
    csv.write_record(CASH_FLOW_HEADER).map_err(csv_err)?;

    for item in &items {
        csv.write_record([
            item.id.as_uuid().to_string(),
            item.date.to_string(),
            item.kind.to_string(),
            item.status.to_string(),
            item.description.clone(),
            item.category.clone(),
            amount(item.amount),
            item.is_recurring.to_string(),
        ])
        .map_err(csv_err)?;
    }

    csv.flush().map_err(csv_err)?;
    Ok(items.len())
}
