//! Change summaries for audit log entries
//!
//! Walks two JSON snapshots and lists changed leaf fields with dotted paths
//! (`credit_parts[0].amount`). Money fields are stored as cents and shown as
//! currency.

use serde_json::Value;

use crate::models::Money;

const MONEY_FIELDS: &[&str] = &["amount", "budgeted", "cost", "price", "credit_limit", "unit_cost"];

/// Comma-separated list of changes, or `None` when nothing differs
pub fn summarize_changes(before: &Value, after: &Value) -> Option<String> {
    let changes = collect_changes(before, after, "");
    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

/// Every changed path between two snapshots
pub fn collect_changes(before: &Value, after: &Value, prefix: &str) -> Vec<String> {
    let mut changes = Vec::new();

    match (before, after) {
        (Value::Object(b), Value::Object(a)) => {
            for (key, b_val) in b {
                let path = join_path(prefix, key);
                match a.get(key) {
                    Some(a_val) if a_val != b_val => {
                        changes.extend(collect_changes(b_val, a_val, &path));
                    }
                    Some(_) => {}
                    None => changes.push(format!("{}: {} -> (removed)", path, render(&path, b_val))),
                }
            }
            for (key, a_val) in a {
                if !b.contains_key(key) {
                    let path = join_path(prefix, key);
                    changes.push(format!("{}: (added) -> {}", path, render(&path, a_val)));
                }
            }
        }
        (Value::Array(b), Value::Array(a)) if b.len() == a.len() => {
            for (i, (b_item, a_item)) in b.iter().zip(a).enumerate() {
                if b_item != a_item {
                    changes.extend(collect_changes(b_item, a_item, &format!("{}[{}]", prefix, i)));
                }
            }
        }
        _ if before != after => {
            changes.push(format!(
                "{}: {} -> {}",
                prefix,
                render(prefix, before),
                render(prefix, after)
            ));
        }
        _ => {}
    }

    changes
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

fn is_money_field(path: &str) -> bool {
    let leaf = path.rsplit('.').next().unwrap_or(path);
    MONEY_FIELDS.contains(&leaf)
}

fn render(path: &str, value: &Value) -> String {
    match value {
        Value::Number(n) if is_money_field(path) => match n.as_i64() {
            Some(cents) => Money::from_cents(cents).to_string(),
            None => n.to_string(),
        },
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) if s.chars().count() > 50 => {
            let head: String = s.chars().take(47).collect();
            format!("\"{}...\"", head)
        }
        Value::String(s) => format!("\"{}\"", s),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}
