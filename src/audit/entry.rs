//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Create => f.pad("CREATE"),
            Operation::Update => f.pad("UPDATE"),
            Operation::Delete => f.pad("DELETE"),
        }
    }
}

/// Types of entities that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    JournalEntry,
    CashFlowItem,
    MonthlyBudget,
    Partner,
    PartnerMovement,
    Product,
    StockMovement,
    TaxConfig,
    TaxObligation,
}

impl EntityType {
    /// Parse the names accepted by `libro audit --entity`
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "entry" | "journal" | "journal_entry" => Some(Self::JournalEntry),
            "cashflow" | "cash_flow" | "cash_flow_item" => Some(Self::CashFlowItem),
            "budget" | "monthly_budget" => Some(Self::MonthlyBudget),
            "partner" => Some(Self::Partner),
            "movement" | "partner_movement" => Some(Self::PartnerMovement),
            "product" => Some(Self::Product),
            "stock" | "stock_movement" => Some(Self::StockMovement),
            "tax" | "tax_config" => Some(Self::TaxConfig),
            "obligation" | "tax_obligation" => Some(Self::TaxObligation),
            _ => None,
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityType::JournalEntry => "JournalEntry",
            EntityType::CashFlowItem => "CashFlowItem",
            EntityType::MonthlyBudget => "MonthlyBudget",
            EntityType::Partner => "Partner",
            EntityType::PartnerMovement => "PartnerMovement",
            EntityType::Product => "Product",
            EntityType::StockMovement => "StockMovement",
            EntityType::TaxConfig => "TaxConfig",
            EntityType::TaxObligation => "TaxObligation",
        };
        f.pad(name)
    }
}

/// One line of the audit log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub entity_type: EntityType,

    /// Short display id of the entity (`je-1a2b3c4d`, a tax code, a month)
    pub entity_id: String,

    /// Human-readable label (description, name, SKU)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    /// Snapshot before the operation (updates and deletes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    /// Snapshot after the operation (creates and updates)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    fn build(
        operation: Operation,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id,
            entity_name,
            before: None,
            after: None,
            diff_summary: None,
        }
    }

    pub fn create<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        let mut entry = Self::build(Operation::Create, entity_type, entity_id.into(), entity_name);
        entry.after = serde_json::to_value(entity).ok();
        entry
    }

    /// Update entry; the diff summary is computed from the two snapshots
    pub fn update<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> Self {
        let mut entry = Self::build(Operation::Update, entity_type, entity_id.into(), entity_name);
        entry.before = serde_json::to_value(before).ok();
        entry.after = serde_json::to_value(after).ok();
        if let (Some(b), Some(a)) = (&entry.before, &entry.after) {
            entry.diff_summary = super::diff::summarize_changes(b, a);
        }
        entry
    }

    pub fn delete<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        let mut entry = Self::build(Operation::Delete, entity_type, entity_id.into(), entity_name);
        entry.before = serde_json::to_value(entity).ok();
        entry
    }

    /// One line per entry, plus a changes line for updates
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "{}  {:<6}  {:<15}  {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.operation,
            self.entity_type,
            self.entity_id
        );

        if let Some(name) = &self.entity_name {
            output.push_str(&format!("  {}", name));
        }
        if let Some(diff) = &self.diff_summary {
            output.push_str(&format!("\n    {}", diff));
        }
        output
    }
}
