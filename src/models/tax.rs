//! Tax configuration and tax obligation models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::TaxObligationId;
use super::money::Money;
use super::period::YearMonth;

/// A tax the business is subject to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxConfig {
    /// Short stable code ("IVA", "IIBB"...)
    pub code: String,

    pub name: String,

    /// Rate in basis points (2100 = 21%)
    #[serde(default)]
    pub rate_bps: u32,

    #[serde(default)]
    pub jurisdiction: String,

    /// Day of the month after the period on which it is due
    #[serde(default = "default_due_day")]
    pub due_day: u32,
}

fn default_due_day() -> u32 {
    20
}

impl TaxConfig {
    pub fn new(code: &str, name: &str, rate_bps: u32, jurisdiction: &str, due_day: u32) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            rate_bps,
            jurisdiction: jurisdiction.to_string(),
            due_day,
        }
    }

    pub fn rate_percent(&self) -> f64 {
        f64::from(self.rate_bps) / 100.0
    }

    /// Tax on `base`, rounded to the cent
    pub fn apply(&self, base: Money) -> Money {
        let cents = (i128::from(base.cents()) * i128::from(self.rate_bps) + 5_000) / 10_000;
        Money::from_cents(cents as i64)
    }

    /// Default due date for `period`: `due_day` of the following month
    pub fn due_date_for(&self, period: YearMonth) -> NaiveDate {
        period.next().day(self.due_day)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.code.trim().is_empty() {
            return Err("Tax code cannot be empty".into());
        }
        if !(1..=31).contains(&self.due_day) {
            return Err(format!("Due day must be between 1 and 31, got {}", self.due_day));
        }
        if self.rate_bps > 10_000 {
            return Err("Rate cannot exceed 100%".into());
        }
        Ok(())
    }
}

/// Tax table seeded by `init`
pub fn default_tax_configs() -> Vec<TaxConfig> {
    vec![
        TaxConfig::new("IVA", "Impuesto al Valor Agregado", 2100, "National", 20),
        TaxConfig::new("IIBB", "Ingresos Brutos", 350, "Provincial", 15),
        TaxConfig::new("GAN", "Ganancias", 3500, "National", 13),
        TaxConfig::new("MONO", "Monotributo", 0, "National", 20),
        TaxConfig::new("CS", "Cargas sociales", 2400, "National", 10),
    ]
}

/// Whether an obligation was settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ObligationStatus {
    #[default]
    Pending,
    Paid,
}

impl fmt::Display for ObligationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.pad("Pending"),
            Self::Paid => f.pad("Paid"),
        }
    }
}

/// A tax amount owed for a period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxObligation {
    pub id: TaxObligationId,

    pub tax_code: String,

    pub period: YearMonth,

    pub due_date: NaiveDate,

    pub amount: Money,

    #[serde(default)]
    pub status: ObligationStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_date: Option<NaiveDate>,

    #[serde(default)]
    pub notes: String,

    pub created_at: DateTime<Utc>,
}

impl TaxObligation {
    pub fn new(tax_code: impl Into<String>, period: YearMonth, due_date: NaiveDate, amount: Money) -> Self {
        Self {
            id: TaxObligationId::new(),
            tax_code: tax_code.into(),
            period,
            due_date,
            amount,
            status: ObligationStatus::Pending,
            paid_date: None,
            notes: String::new(),
            created_at: Utc::now(),
        }
    }

    pub fn is_paid(&self) -> bool {
        self.status == ObligationStatus::Paid
    }

    pub fn mark_paid(&mut self, date: NaiveDate) {
        self.status = ObligationStatus::Paid;
        self.paid_date = Some(date);
    }

    pub fn reopen(&mut self) {
        self.status = ObligationStatus::Pending;
        self.paid_date = None;
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.is_paid() && self.due_date < today
    }

    /// Pending and due between `today` and `today + days`, inclusive
    pub fn is_upcoming(&self, today: NaiveDate, days: i64) -> bool {
        !self.is_paid()
            && self.due_date >= today
            && (self.due_date - today).num_days() <= days
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_due_date_is_in_following_month() {
        let iva = &default_tax_configs()[0];
        let dec = YearMonth::new(2024, 12).unwrap();
        assert_eq!(iva.due_date_for(dec), d(2025, 1, 20));

        let feb = TaxConfig::new("X", "X", 0, "", 31);
        assert_eq!(feb.due_date_for(YearMonth::new(2025, 1).unwrap()), d(2025, 2, 28));
    }

    #[test]
    fn test_apply_rate() {
        let iva = TaxConfig::new("IVA", "IVA", 2100, "", 20);
        assert_eq!(iva.apply(Money::from_units(1000)), Money::from_units(210));
        assert_eq!(iva.apply(Money::from_cents(5)), Money::from_cents(1));
        assert_eq!(iva.rate_percent(), 21.0);
    }

    #[test]
    fn test_paid_lifecycle() {
        let period = YearMonth::new(2025, 3).unwrap();
        let mut ob = TaxObligation::new("IVA", period, d(2025, 4, 20), Money::from_units(100));

        assert!(ob.is_overdue(d(2025, 4, 21)));
        assert!(ob.is_upcoming(d(2025, 4, 1), 30));
        assert!(!ob.is_upcoming(d(2025, 3, 1), 30));

        ob.mark_paid(d(2025, 4, 18));
        assert!(!ob.is_overdue(d(2025, 5, 1)));
        assert_eq!(ob.paid_date, Some(d(2025, 4, 18)));

        ob.reopen();
        assert!(ob.paid_date.is_none());
    }

    #[test]
    fn test_default_configs_are_valid() {
        for config in default_tax_configs() {
            assert!(config.validate().is_ok(), "{}", config.code);
        }
    }
}
