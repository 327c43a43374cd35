//! Cash-flow item model
//!
//! Expected incomes and expenses used to project the liquid balance forward.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CashFlowId;
use super::money::Money;

/// Direction of a cash-flow item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowKind {
    Income,
    Expense,
}

impl FlowKind {
    /// Signed effect of `amount` on the projected balance
    pub fn signed(&self, amount: Money) -> Money {
        match self {
            Self::Income => amount,
            Self::Expense => -amount,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" | "in" | "ingreso" => Some(Self::Income),
            "expense" | "out" | "egreso" | "gasto" => Some(Self::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => f.pad("Income"),
            Self::Expense => f.pad("Expense"),
        }
    }
}

/// Whether the expected flow already happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FlowStatus {
    #[default]
    Pending,
    Realized,
}

impl FlowStatus {
    pub fn toggled(&self) -> Self {
        match self {
            Self::Pending => Self::Realized,
            Self::Realized => Self::Pending,
        }
    }
}

impl fmt::Display for FlowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.pad("Pending"),
            Self::Realized => f.pad("Realized"),
        }
    }
}

/// An expected income or expense
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlowItem {
    pub id: CashFlowId,

    pub kind: FlowKind,

    pub description: String,

    /// Always positive; the direction comes from `kind`
    pub amount: Money,

    pub date: NaiveDate,

    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub is_recurring: bool,

    #[serde(default)]
    pub status: FlowStatus,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl CashFlowItem {
    pub fn new(
        kind: FlowKind,
        description: impl Into<String>,
        amount: Money,
        date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: CashFlowId::new(),
            kind,
            description: description.into(),
            amount,
            date,
            category: String::new(),
            is_recurring: false,
            status: FlowStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == FlowStatus::Pending
    }

    /// Flip pending/realized; amount and date are untouched
    pub fn toggle_status(&mut self) {
        self.status = self.status.toggled();
        self.updated_at = Utc::now();
    }

    pub fn signed_amount(&self) -> Money {
        self.kind.signed(self.amount)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.description.trim().is_empty() {
            return Err("Description cannot be empty".into());
        }
        if !self.amount.is_positive() {
            return Err("Amount must be greater than zero".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> CashFlowItem {
        CashFlowItem::new(
            FlowKind::Expense,
            "Rent",
            Money::from_units(500),
            NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
        )
    }

    #[test]
    fn test_toggle_keeps_amount_and_date() {
        let mut flow = item();
        let (amount, date) = (flow.amount, flow.date);

        flow.toggle_status();
        assert_eq!(flow.status, FlowStatus::Realized);
        flow.toggle_status();
        assert_eq!(flow.status, FlowStatus::Pending);

        assert_eq!(flow.amount, amount);
        assert_eq!(flow.date, date);
    }

    #[test]
    fn test_signed_amount() {
        assert_eq!(item().signed_amount(), Money::from_units(-500));
        assert_eq!(FlowKind::Income.signed(Money::from_units(5)), Money::from_units(5));
    }

    #[test]
    fn test_validation() {
        let mut flow = item();
        assert!(flow.validate().is_ok());
        flow.amount = Money::zero();
        assert!(flow.validate().is_err());
    }
}
