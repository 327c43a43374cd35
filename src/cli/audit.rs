//! Audit log CLI command

use chrono::{DateTime, Duration, Utc};

use crate::audit::{AuditFilter, EntityType};
use crate::error::{LibroError, LibroResult};
use crate::storage::Storage;

/// Start of a look-back window of `days` days
fn since_days_ago(days: i64) -> LibroResult<DateTime<Utc>> {
    if days < 0 {
        return Err(LibroError::Validation("--days cannot be negative".into()));
    }
    Duration::try_days(days)
        .and_then(|window| Utc::now().checked_sub_signed(window))
        .ok_or_else(|| LibroError::Validation(format!("--days {} reaches too far back", days)))
}

/// Print the most recent audit entries
pub fn handle_audit_command(
    storage: &Storage,
    entity_type: Option<&str>,
    entity: Option<String>,
    days: Option<i64>,
    limit: usize,
) -> LibroResult<()> {
    let entity_type = entity_type
        .map(|s| {
            EntityType::parse(s).ok_or_else(|| {
                LibroError::Validation(format!(
                    "Unknown entity type '{}'. Use entry, cashflow, budget, partner, movement, product, stock, tax or obligation",
                    s
                ))
            })
        })
        .transpose()?;

    let filter = AuditFilter {
        entity_type,
        entity,
        since: days.map(since_days_ago).transpose()?,
    };

    let entries = storage.audit().read_filtered(&filter, limit)?;
    if entries.is_empty() {
        println!("No audit entries found.");
        return Ok(());
    }

    for entry in &entries {
        println!("{}", entry.format_human_readable());
    }
    println!();
    println!(
        "{} of {} entries ({})",
        entries.len(),
        storage.audit().entry_count()?,
        storage.audit().path().display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_since_days_ago_bounds() {
        let week = since_days_ago(7).unwrap();
        assert!(week < Utc::now());
        assert!(since_days_ago(-1).is_err());
        assert!(since_days_ago(i64::MAX).is_err());
        assert!(since_days_ago(400_000_000).is_err());
    }
}
