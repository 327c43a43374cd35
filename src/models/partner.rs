//! Partner (client / supplier) and partner movement models

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{MovementId, PartnerId};
use super::money::Money;

/// Role of a counterparty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PartnerKind {
    #[default]
    Client,
    Supplier,
    Both,
}

impl PartnerKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "client" | "customer" | "cliente" => Some(Self::Client),
            "supplier" | "vendor" | "proveedor" => Some(Self::Supplier),
            "both" | "ambos" => Some(Self::Both),
            _ => None,
        }
    }

    pub fn is_client(&self) -> bool {
        matches!(self, Self::Client | Self::Both)
    }

    pub fn is_supplier(&self) -> bool {
        matches!(self, Self::Supplier | Self::Both)
    }
}

impl fmt::Display for PartnerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Client => f.pad("Client"),
            Self::Supplier => f.pad("Supplier"),
            Self::Both => f.pad("Both"),
        }
    }
}

/// Longest payment term accepted, ten years
pub const MAX_CREDIT_DAYS: u32 = 3650;

/// A client or supplier with credit terms
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Partner {
    pub id: PartnerId,

    pub name: String,

    #[serde(default)]
    pub kind: PartnerKind,

    /// Tax identification number (CUIT/CUIL/DNI)
    #[serde(default)]
    pub tax_id: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub phone: String,

    /// Days granted to pay an invoice
    #[serde(default)]
    pub credit_days: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_limit: Option<Money>,

    #[serde(default)]
    pub notes: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Partner {
    pub fn new(name: impl Into<String>, kind: PartnerKind) -> Self {
        let now = Utc::now();
        Self {
            id: PartnerId::new(),
            name: name.into(),
            kind,
            tax_id: String::new(),
            email: String::new(),
            phone: String::new(),
            credit_days: 0,
            credit_limit: None,
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Partner name cannot be empty".into());
        }
        if self.name.len() > 120 {
            return Err(format!("Partner name too long ({} chars, max 120)", self.name.len()));
        }
        if self.credit_days > MAX_CREDIT_DAYS {
            return Err(format!(
                "Credit days must be at most {}, got {}",
                MAX_CREDIT_DAYS, self.credit_days
            ));
        }
        if let Some(limit) = self.credit_limit {
            if limit.is_negative() {
                return Err("Credit limit cannot be negative".into());
            }
        }
        Ok(())
    }
}

impl fmt::Display for Partner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}

/// Kind of document exchanged with a partner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    Invoice,
    Payment,
    DebitNote,
    CreditNote,
}

impl MovementKind {
    /// +1 for documents that increase what is owed, -1 for those that settle it
    pub fn sign(&self) -> i64 {
        match self {
            Self::Invoice | Self::DebitNote => 1,
            Self::Payment | Self::CreditNote => -1,
        }
    }

    pub fn signed(&self, amount: Money) -> Money {
        Money::from_cents(amount.cents() * self.sign())
    }

    /// Whether the document has a due date of its own
    pub fn is_charge(&self) -> bool {
        self.sign() > 0
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "invoice" | "factura" => Some(Self::Invoice),
            "payment" | "pago" | "cobro" => Some(Self::Payment),
            "debit_note" | "nd" => Some(Self::DebitNote),
            "credit_note" | "nc" => Some(Self::CreditNote),
            _ => None,
        }
    }
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invoice => f.pad("Invoice"),
            Self::Payment => f.pad("Payment"),
            Self::DebitNote => f.pad("Debit note"),
            Self::CreditNote => f.pad("Credit note"),
        }
    }
}

/// Settlement state of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MovementStatus {
    #[default]
    Pending,
    Partial,
    Paid,
}

impl MovementStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "partial" => Some(Self::Partial),
            "paid" => Some(Self::Paid),
            _ => None,
        }
    }
}

impl fmt::Display for MovementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.pad("Pending"),
            Self::Partial => f.pad("Partial"),
            Self::Paid => f.pad("Paid"),
        }
    }
}

/// An invoice, payment or note tied to a partner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartnerMovement {
    pub id: MovementId,

    pub partner_id: PartnerId,

    pub kind: MovementKind,

    pub date: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    pub amount: Money,

    /// Document number
    #[serde(default)]
    pub reference: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub status: MovementStatus,

    pub created_at: DateTime<Utc>,
}

impl PartnerMovement {
    pub fn new(partner_id: PartnerId, kind: MovementKind, date: NaiveDate, amount: Money) -> Self {
        // Payments and credit notes settle immediately
        let status = if kind.is_charge() {
            MovementStatus::Pending
        } else {
            MovementStatus::Paid
        };
        Self {
            id: MovementId::new(),
            partner_id,
            kind,
            date,
            due_date: None,
            amount,
            reference: String::new(),
            description: String::new(),
            status,
            created_at: Utc::now(),
        }
    }

    /// Set the due date from the partner's credit terms
    pub fn with_terms(mut self, credit_days: u32) -> Result<Self, String> {
        if self.kind.is_charge() && self.due_date.is_none() {
            let due = self
                .date
                .checked_add_days(Days::new(u64::from(credit_days)))
                .ok_or_else(|| format!("{} plus {} credit days is out of range", self.date, credit_days))?;
            self.due_date = Some(due);
        }
        Ok(self)
    }

    pub fn signed_amount(&self) -> Money {
        self.kind.signed(self.amount)
    }

    /// `due_date < today` and not paid
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        match self.due_date {
            Some(due) => due < today && self.status != MovementStatus::Paid,
            None => false,
        }
    }

    /// Days past due, or zero
    pub fn days_overdue(&self, today: NaiveDate) -> i64 {
        match self.due_date {
            Some(due) if self.is_overdue(today) => (today - due).num_days(),
            _ => 0,
        }
    }
}

/// Signed sum of a partner's movements
pub fn partner_balance<'a, I>(movements: I) -> Money
where
    I: IntoIterator<Item = &'a PartnerMovement>,
{
    movements.into_iter().map(|m| m.signed_amount()).sum()
}
