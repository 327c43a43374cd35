//! Monthly budget model
//!
//! One budget per month; each line assigns an amount to an expense account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;
use super::period::YearMonth;

/// Amount planned for one expense account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetLine {
    pub account_id: String,
    pub budgeted: Money,
}

/// The budget of a month
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyBudget {
    pub month: YearMonth,

    #[serde(default)]
    pub categories: Vec<BudgetLine>,

    pub updated_at: DateTime<Utc>,
}

impl MonthlyBudget {
    pub fn new(month: YearMonth) -> Self {
        Self {
            month,
            categories: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    /// Insert or replace the line for `account_id`
    pub fn set_line(&mut self, account_id: &str, budgeted: Money) {
        match self.categories.iter_mut().find(|l| l.account_id == account_id) {
            Some(line) => line.budgeted = budgeted,
            None => self.categories.push(BudgetLine {
                account_id: account_id.to_string(),
                budgeted,
            }),
        }
        self.updated_at = Utc::now();
    }

    /// Remove a line, returning whether it existed
    pub fn remove_line(&mut self, account_id: &str) -> bool {
        let before = self.categories.len();
        self.categories.retain(|l| l.account_id != account_id);
        self.updated_at = Utc::now();
        self.categories.len() != before
    }

    pub fn budgeted_for(&self, account_id: &str) -> Option<Money> {
        self.categories
            .iter()
            .find(|l| l.account_id == account_id)
            .map(|l| l.budgeted)
    }

    pub fn total(&self) -> Money {
        self.categories.iter().map(|l| l.budgeted).sum()
    }
}

/// Traffic-light status of a budget line
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    /// At most 80% used
    Green,
    /// Above 80%, at most 100%
    Yellow,
    /// Over budget
    Red,
}

impl BudgetStatus {
    /// Classify a usage percentage; `None` means nothing was budgeted
    pub fn classify(percentage: Option<f64>, actual: Money) -> Self {
        match percentage {
            Some(p) if p <= 80.0 => Self::Green,
            Some(p) if p <= 100.0 => Self::Yellow,
            Some(_) => Self::Red,
            None if actual.is_positive() => Self::Red,
            None => Self::Green,
        }
    }
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Green => f.pad("OK"),
            Self::Yellow => f.pad("Warning"),
            Self::Red => f.pad("Over"),
        }
    }
}
