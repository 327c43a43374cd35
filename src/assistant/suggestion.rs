//! Structured answers from the model
//!
//! The model answers with JSON using floating amounts; it is parsed into
//! [`SuggestedEntry`] values. Nothing here checks the balance rule; that
//! happens when a suggestion is applied through the journal service.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{LibroError, LibroResult};
use crate::models::{BalanceCheck, Money, Posting};

/// A journal entry proposed by the model
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestedEntry {
    pub description: String,
    pub amount: Money,
    pub date: Option<NaiveDate>,
    pub debit_parts: Vec<Posting>,
    pub credit_parts: Vec<Posting>,
    /// Set for receipts
    pub vendor: Option<String>,
}

impl SuggestedEntry {
    pub fn balance_check(&self) -> BalanceCheck {
        BalanceCheck::from_parts(&self.debit_parts, &self.credit_parts)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPart {
    account_id: String,
    amount: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntry {
    #[serde(default)]
    description: String,
    #[serde(default)]
    amount: f64,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    debit_parts: Vec<RawPart>,
    #[serde(default)]
    credit_parts: Vec<RawPart>,
    #[serde(default)]
    vendor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawLedger {
    #[serde(default)]
    entries: Vec<RawEntry>,
}

impl From<RawEntry> for SuggestedEntry {
    fn from(raw: RawEntry) -> Self {
        let parts = |parts: Vec<RawPart>| -> Vec<Posting> {
            parts
                .into_iter()
                .map(|p| Posting::new(p.account_id, Money::from_decimal(p.amount).unwrap_or_default()))
                .collect()
        };
        let debit_parts = parts(raw.debit_parts);
        let amount = match Money::from_decimal(raw.amount) {
            Some(m) if !m.is_zero() => m,
            _ => debit_parts.iter().map(|p| p.amount).sum(),
        };
        Self {
            description: raw.description.trim().to_string(),
            amount,
            date: raw
                .date
                .as_deref()
                .and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok()),
            debit_parts,
            credit_parts: parts(raw.credit_parts),
            vendor: raw.vendor.filter(|v| !v.trim().is_empty()),
        }
    }
}

/// Strip a Markdown code fence around the payload, if any
pub fn extract_json(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json"), with or without a newline after it
    let body = rest.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

pub fn parse_entry(text: &str) -> LibroResult<SuggestedEntry> {
    let raw: RawEntry = serde_json::from_str(extract_json(text))
        .map_err(|e| LibroError::Json(format!("Unexpected model answer: {}", e)))?;
    Ok(raw.into())
}

/// A ledger answer is either `{"entries": [...]}` or a bare array
pub fn parse_ledger(text: &str) -> LibroResult<Vec<SuggestedEntry>> {
    let json = extract_json(text);
    let raw = match serde_json::from_str::<RawLedger>(json) {
        Ok(ledger) => ledger.entries,
        Err(_) => serde_json::from_str::<Vec<RawEntry>>(json)
            .map_err(|e| LibroError::Json(format!("Unexpected model answer: {}", e)))?,
    };
    Ok(raw.into_iter().map(Into::into).collect())
}

fn part_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "accountId": {"type": "STRING"},
                "amount": {"type": "NUMBER"}
            },
            "required": ["accountId", "amount"]
        }
    })
}

/// Schema of a single entry; receipts add a vendor
pub fn entry_schema(with_vendor: bool) -> Value {
    let mut properties = json!({
        "description": {"type": "STRING"},
        "amount": {"type": "NUMBER"},
        "date": {"type": "STRING", "description": "YYYY-MM-DD"},
        "debitParts": part_schema(),
        "creditParts": part_schema()
    });
    if with_vendor {
        properties["vendor"] = json!({"type": "STRING"});
    }
    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": ["description", "amount", "debitParts", "creditParts"]
    })
}

pub fn ledger_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "entries": {"type": "ARRAY", "items": entry_schema(false)}
        },
        "required": ["entries"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_variants() {
        assert_eq!(extract_json(r#"  {"a":1} "#), r#"{"a":1}"#);
        assert_eq!(extract_json("```json\n{\"a\":1}\n```"), r#"{"a":1}"#);
        assert_eq!(extract_json("```\n[1]\n```\n"), "[1]");
    }

    #[test]
    fn test_extract_json_single_line_fence() {
        assert_eq!(extract_json("```json{\"a\":1}```"), r#"{"a":1}"#);
        assert_eq!(extract_json("```JSON {\"a\":1} ```"), r#"{"a":1}"#);
        assert_eq!(extract_json("```[1]```"), "[1]");
        assert_eq!(extract_json("```json{\"a\":\n1}\n```"), "{\"a\":\n1}");
        let value: serde_json::Value = serde_json::from_str(extract_json("```json{\"a\":1}```")).unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn test_parse_entry() {
        let text = r#"```json
        {"description": "Office rent", "amount": 350.5, "date": "2025-05-01",
         "debitParts": [{"accountId": "acc_rent", "amount": 350.5}],
         "creditParts": [{"accountId": "acc_bank", "amount": 350.5}]}
        ```"#;
        let entry = parse_entry(text).unwrap();
        assert_eq!(entry.amount, Money::from_cents(35050));
        assert_eq!(entry.date, NaiveDate::from_ymd_opt(2025, 5, 1));
        assert!(entry.balance_check().is_balanced());
        assert!(entry.vendor.is_none());
    }

    #[test]
    fn test_amount_falls_back_to_debits() {
        let entry = parse_entry(
            r#"{"description": "x", "debitParts": [{"accountId": "acc_rent", "amount": 10}], "creditParts": []}"#,
        )
        .unwrap();
        assert_eq!(entry.amount, Money::from_units(10));
        assert!(!entry.balance_check().is_balanced());
    }

    #[test]
    fn test_parse_ledger_shapes() {
        let wrapped = r#"{"entries": [{"description": "a", "amount": 1, "debitParts": [], "creditParts": []}]}"#;
        assert_eq!(parse_ledger(wrapped).unwrap().len(), 1);

        let bare = r#"[{"description": "a", "amount": 1}, {"description": "b", "amount": 2}]"#;
        assert_eq!(parse_ledger(bare).unwrap().len(), 2);

        assert!(parse_ledger("I could not read the image").is_err());
    }

    #[test]
    fn test_receipt_schema_has_vendor() {
        assert!(entry_schema(true)["properties"].get("vendor").is_some());
        assert!(entry_schema(false)["properties"].get("vendor").is_none());
    }
}
