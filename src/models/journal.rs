//! Journal entry model
//!
//! An entry is either *simple* (one debit account, one credit account, one
//! amount) or *compound* (any number of debit and credit parts). Both shapes
//! are read through [`JournalEntry::debit_postings`] and
//! [`JournalEntry::credit_postings`] so that aggregation code never has to
//! care which one it got.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::EntryId;
use super::money::Money;

/// One line on either side of an entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub account_id: String,
    pub amount: Money,
}

impl Posting {
    pub fn new(account_id: impl Into<String>, amount: Money) -> Self {
        Self {
            account_id: account_id.into(),
            amount,
        }
    }
}

/// Side of a posting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Debit,
    Credit,
}

/// Totals of both sides of an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceCheck {
    pub debits: Money,
    pub credits: Money,
}

impl BalanceCheck {
    pub fn from_parts(debits: &[Posting], credits: &[Posting]) -> Self {
        Self {
            debits: debits.iter().map(|p| p.amount).sum(),
            credits: credits.iter().map(|p| p.amount).sum(),
        }
    }

    /// Absolute difference between both sides
    pub fn difference(&self) -> Money {
        (self.debits - self.credits).abs()
    }

    /// `|debits - credits| < 0.01`; amounts are whole cents so this is equality
    pub fn is_balanced(&self) -> bool {
        self.difference().cents() < 1
    }

    /// Whether the compound-entry form may be submitted
    pub fn can_submit(&self) -> bool {
        self.is_balanced() && self.debits.is_positive()
    }
}

/// A journal entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: EntryId,

    pub date: NaiveDate,

    #[serde(default)]
    pub description: String,

    /// Total of the entry (equal to each side's total when balanced)
    pub amount: Money,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debit_account: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_account: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub debit_parts: Vec<Posting>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub credit_parts: Vec<Posting>,

    pub created_at: DateTime<Utc>,
}

impl JournalEntry {
    /// Create a two-account entry
    pub fn simple(
        date: NaiveDate,
        description: impl Into<String>,
        amount: Money,
        debit_account: impl Into<String>,
        credit_account: impl Into<String>,
    ) -> Self {
        Self {
            id: EntryId::new(),
            date,
            description: description.into(),
            amount,
            debit_account: Some(debit_account.into()),
            credit_account: Some(credit_account.into()),
            debit_parts: Vec::new(),
            credit_parts: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Create a multi-line entry; `amount` becomes the debit total
    pub fn compound(
        date: NaiveDate,
        description: impl Into<String>,
        debit_parts: Vec<Posting>,
        credit_parts: Vec<Posting>,
    ) -> Self {
        let amount = debit_parts.iter().map(|p| p.amount).sum();
        Self {
            id: EntryId::new(),
            date,
            description: description.into(),
            amount,
            debit_account: None,
            credit_account: None,
            debit_parts,
            credit_parts,
            created_at: Utc::now(),
        }
    }

    pub fn is_compound(&self) -> bool {
        !self.debit_parts.is_empty() || !self.credit_parts.is_empty()
    }

    /// Effective debit lines, whichever shape the entry has
    pub fn debit_postings(&self) -> Vec<Posting> {
        Self::postings(&self.debit_parts, self.debit_account.as_deref(), self.amount)
    }

    /// Effective credit lines, whichever shape the entry has
    pub fn credit_postings(&self) -> Vec<Posting> {
        Self::postings(&self.credit_parts, self.credit_account.as_deref(), self.amount)
    }

    fn postings(parts: &[Posting], account: Option<&str>, amount: Money) -> Vec<Posting> {
        if !parts.is_empty() {
            return parts.to_vec();
        }
        match account {
            Some(id) => vec![Posting::new(id, amount)],
            None => Vec::new(),
        }
    }

    /// Every posting tagged with its side
    pub fn postings_with_side(&self) -> Vec<(Side, Posting)> {
        self.debit_postings()
            .into_iter()
            .map(|p| (Side::Debit, p))
            .chain(self.credit_postings().into_iter().map(|p| (Side::Credit, p)))
            .collect()
    }

    /// Totals of the effective postings
    pub fn balance_check(&self) -> BalanceCheck {
        BalanceCheck::from_parts(&self.debit_postings(), &self.credit_postings())
    }

    /// Balanced on both sides, and each side equals the declared amount
    pub fn is_consistent(&self) -> bool {
        let check = self.balance_check();
        check.is_balanced() && check.debits == self.amount
    }

    /// Amount posted to `account_id` on the given side
    pub fn amount_on(&self, account_id: &str, side: Side) -> Money {
        let lines = match side {
            Side::Debit => self.debit_postings(),
            Side::Credit => self.credit_postings(),
        };
        lines
            .iter()
            .filter(|p| p.account_id == account_id)
            .map(|p| p.amount)
            .sum()
    }

    pub fn touches(&self, account_id: &str) -> bool {
        self.postings_with_side()
            .iter()
            .any(|(_, p)| p.account_id == account_id)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Debit => write!(f, "Debit"),
            Side::Credit => write!(f, "Credit"),
        }
    }
}

impl fmt::Display for JournalEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.date, self.description, self.amount)
    }
}
