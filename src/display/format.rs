//! Formatting helpers shared by the terminal views

use crate::models::Money;

/// Format a money amount with color hints for terminal display
pub fn format_money_colored(amount: Money) -> String {
    if amount.is_negative() {
        format!("\x1b[31m{}\x1b[0m", amount)
    } else if amount.is_positive() {
        format!("\x1b[32m{}\x1b[0m", amount)
    } else {
        amount.to_string()
    }
}

/// Format a percentage with appropriate precision
pub fn format_percentage(pct: f64) -> String {
    if pct.abs() < 0.1 && pct != 0.0 {
        format!("{:.2}%", pct)
    } else if pct.abs() < 10.0 {
        format!("{:.1}%", pct)
    } else {
        format!("{:.0}%", pct)
    }
}

/// Horizontal bar proportional to `value / max_value`
pub fn format_bar(value: f64, max_value: f64, width: usize) -> String {
    if max_value <= 0.0 || value <= 0.0 {
        return " ".repeat(width);
    }

    let filled = ((value / max_value) * width as f64).round() as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

/// Cut to `max` characters, marking the cut with an ellipsis
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

/// Empty for zero, the amount otherwise
pub fn blank_if_zero(amount: Money) -> String {
    if amount.is_zero() {
        String::new()
    } else {
        amount.to_string()
    }
}
