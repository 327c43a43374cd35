//! Journal service
//!
//! The only way entries get into the journal. Every add path resolves the
//! accounts against the chart and enforces the balance rule; aggregations
//! (liquid balance, account balances, per-account totals) used by the
//! dashboard, cash-flow projection and reports live here too.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::error::{LibroError, LibroResult};
use crate::models::account::{is_liquid, resolve_account};
use crate::models::{
    Account, AccountType, BalanceCheck, EntryId, JournalEntry, Money, Posting, Side,
};
use crate::storage::Storage;

/// Selection for [`JournalService::list`]
#[derive(Debug, Clone, Default)]
pub struct JournalFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    /// Account code or name; matches either side
    pub account: Option<String>,
    /// Case-insensitive substring of the description
    pub text: Option<String>,
    pub limit: Option<usize>,
}

/// Debit and credit totals of one account
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccountTotals {
    pub debits: Money,
    pub credits: Money,
}

impl AccountTotals {
    /// Balance according to the account's normal side
    pub fn balance(&self, account_type: AccountType) -> Money {
        account_type.balance_change(self.debits, self.credits)
    }
}

/// One row of an account ledger
#[derive(Debug, Clone)]
pub struct LedgerLine {
    pub date: NaiveDate,
    pub entry_id: EntryId,
    pub description: String,
    pub debit: Money,
    pub credit: Money,
    /// Balance after this row, on the account's normal side
    pub balance: Money,
}

/// An entry whose stored postings break the balance rule
#[derive(Debug, Clone)]
pub struct InvalidEntry {
    pub entry: JournalEntry,
    pub check: BalanceCheck,
}

/// Service for journal entries
pub struct JournalService<'a> {
    storage: &'a Storage,
}

impl<'a> JournalService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record a two-account entry
    pub fn add_simple(
        &self,
        date: NaiveDate,
        description: &str,
        amount: Money,
        debit_account: &str,
        credit_account: &str,
    ) -> LibroResult<JournalEntry> {
        let description = require_description(description)?;
        if !amount.is_positive() {
            return Err(LibroError::Validation(
                "Amount must be greater than zero".into(),
            ));
        }

        let debit = resolve(debit_account)?;
        let credit = resolve(credit_account)?;
        if debit.id == credit.id {
            return Err(LibroError::Validation(
                "Debit and credit accounts must be different".into(),
            ));
        }

        let entry = JournalEntry::simple(date, description, amount, debit.id, credit.id);
        self.persist(entry)
    }

    /// Record a multi-line entry; both sides must match to the cent
    pub fn add_compound(
        &self,
        date: NaiveDate,
        description: &str,
        debit_parts: Vec<Posting>,
        credit_parts: Vec<Posting>,
    ) -> LibroResult<JournalEntry> {
        let description = require_description(description)?;
        let debit_parts = normalize_parts(debit_parts, "debit")?;
        let credit_parts = normalize_parts(credit_parts, "credit")?;

        let check = BalanceCheck::from_parts(&debit_parts, &credit_parts);
        if !check.can_submit() {
            return Err(LibroError::Unbalanced {
                debits: check.debits,
                credits: check.credits,
            });
        }

        let entry = JournalEntry::compound(date, description, debit_parts, credit_parts);
        self.persist(entry)
    }

    /// Record an entry built elsewhere (assistant suggestions, imports)
    ///
    /// Single-posting sides are stored in the simple shape.
    pub fn add_postings(
        &self,
        date: NaiveDate,
        description: &str,
        debit_parts: Vec<Posting>,
        credit_parts: Vec<Posting>,
    ) -> LibroResult<JournalEntry> {
        match (debit_parts.as_slice(), credit_parts.as_slice()) {
            ([debit], [credit]) if debit.amount == credit.amount => self.add_simple(
                date,
                description,
                debit.amount,
                &debit.account_id,
                &credit.account_id,
            ),
            _ => self.add_compound(date, description, debit_parts, credit_parts),
        }
    }

    fn persist(&self, entry: JournalEntry) -> LibroResult<JournalEntry> {
        self.storage.journal.upsert(entry.clone())?;
        self.storage.journal.save()?;

        self.storage.log_create(
            EntityType::JournalEntry,
            entry.id.to_string(),
            Some(entry.description.clone()),
            &entry,
        )?;

        tracing::info!(id = %entry.id, amount = %entry.amount, "journal entry recorded");
        Ok(entry)
    }

    pub fn get(&self, id: EntryId) -> LibroResult<Option<JournalEntry>> {
        self.storage.journal.get(id)
    }

    /// Find by short or full id
    pub fn find(&self, identifier: &str) -> LibroResult<JournalEntry> {
        self.storage
            .journal
            .find(identifier)?
            .ok_or_else(|| LibroError::entry_not_found(identifier))
    }

    /// Entries matching `filter`, oldest first; `limit` keeps the newest
    pub fn list(&self, filter: &JournalFilter) -> LibroResult<Vec<JournalEntry>> {
        let account = match &filter.account {
            Some(a) => Some(resolve(a)?.id),
            None => None,
        };
        let text = filter.text.as_ref().map(|t| t.to_lowercase());

        let mut entries: Vec<_> = self
            .storage
            .journal
            .get_all()?
            .into_iter()
            .filter(|e| filter.from.map_or(true, |from| e.date >= from))
            .filter(|e| filter.to.map_or(true, |to| e.date <= to))
            .filter(|e| account.map_or(true, |a| e.touches(a)))
            .filter(|e| {
                text.as_ref()
                    .map_or(true, |t| e.description.to_lowercase().contains(t))
            })
            .collect();

        if let Some(limit) = filter.limit {
            let skip = entries.len().saturating_sub(limit);
            entries.drain(..skip);
        }
        Ok(entries)
    }

    pub fn delete(&self, id: EntryId) -> LibroResult<JournalEntry> {
        let entry = self
            .storage
            .journal
            .get(id)?
            .ok_or_else(|| LibroError::entry_not_found(id.to_string()))?;

        self.storage.journal.delete(id)?;
        self.storage.journal.save()?;

        self.storage.log_delete(
            EntityType::JournalEntry,
            entry.id.to_string(),
            Some(entry.description.clone()),
            &entry,
        )?;

        tracing::info!(id = %entry.id, "journal entry deleted");
        Ok(entry)
    }

    /// Entries that are unbalanced, disagree with their declared amount,
    /// or post to accounts missing from the chart
    pub fn verify(&self) -> LibroResult<Vec<InvalidEntry>> {
        Ok(self
            .storage
            .journal
            .get_all()?
            .into_iter()
            .filter(|e| {
                !e.is_consistent()
                    || e.postings_with_side()
                        .iter()
                        .any(|(_, p)| resolve_account(&p.account_id).is_none())
            })
            .map(|e| InvalidEntry {
                check: e.balance_check(),
                entry: e,
            })
            .collect())
    }

    /// Debits minus credits posted to cash and bank up to `as_of`
    pub fn liquid_balance(&self, as_of: NaiveDate) -> LibroResult<Money> {
        let mut balance = Money::zero();
        for entry in self.storage.journal.get_all()? {
            if entry.date > as_of {
                continue;
            }
            for (side, posting) in entry.postings_with_side() {
                if is_liquid(&posting.account_id) {
                    match side {
                        Side::Debit => balance += posting.amount,
                        Side::Credit => balance -= posting.amount,
                    }
                }
            }
        }
        Ok(balance)
    }

    /// Per-account debit and credit totals over an optional date range
    pub fn totals(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> LibroResult<BTreeMap<String, AccountTotals>> {
        let mut totals: BTreeMap<String, AccountTotals> = BTreeMap::new();
        for entry in self.storage.journal.get_all()? {
            if from.map_or(false, |f| entry.date < f) || to.map_or(false, |t| entry.date > t) {
                continue;
            }
            for (side, posting) in entry.postings_with_side() {
                let slot = totals.entry(posting.account_id).or_default();
                match side {
                    Side::Debit => slot.debits += posting.amount,
                    Side::Credit => slot.credits += posting.amount,
                }
            }
        }
        Ok(totals)
    }

    /// Balance of one account on its normal side
    pub fn account_balance(
        &self,
        account: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> LibroResult<Money> {
        let account = resolve(account)?;
        let totals = self.totals(from, to)?;
        Ok(totals
            .get(account.id)
            .copied()
            .unwrap_or_default()
            .balance(account.account_type))
    }

    /// Every posting to an account with a running balance
    pub fn ledger(
        &self,
        account: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> LibroResult<Vec<LedgerLine>> {
        let account = resolve(account)?;
        let mut running = match from.and_then(|f| f.pred_opt()) {
            Some(before) => self.account_balance(account.id, None, Some(before))?,
            None => Money::zero(),
        };

        let filter = JournalFilter {
            from,
            to,
            account: Some(account.id.to_string()),
            ..Default::default()
        };

        let mut lines = Vec::new();
        for entry in self.list(&filter)? {
            let debit = entry.amount_on(account.id, Side::Debit);
            let credit = entry.amount_on(account.id, Side::Credit);
            running += account.account_type.balance_change(debit, credit);
            lines.push(LedgerLine {
                date: entry.date,
                entry_id: entry.id,
                description: entry.description,
                debit,
                credit,
                balance: running,
            });
        }
        Ok(lines)
    }
}

fn resolve(identifier: &str) -> LibroResult<&'static Account> {
    resolve_account(identifier).ok_or_else(|| LibroError::account_not_found(identifier))
}

fn require_description(description: &str) -> LibroResult<&str> {
    let description = description.trim();
    if description.is_empty() {
        return Err(LibroError::Validation("Description is required".into()));
    }
    Ok(description)
}

/// Resolve account names to codes and reject empty sides or non-positive lines
fn normalize_parts(parts: Vec<Posting>, side: &str) -> LibroResult<Vec<Posting>> {
    if parts.is_empty() {
        return Err(LibroError::Validation(format!(
            "At least one {} line is required",
            side
        )));
    }
    parts
        .into_iter()
        .map(|p| {
            if !p.amount.is_positive() {
                return Err(LibroError::Validation(format!(
                    "Each {} line needs an amount greater than zero",
                    side
                )));
            }
            Ok(Posting::new(resolve(&p.account_id)?.id, p.amount))
        })
        .collect()
}
