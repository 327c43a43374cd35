//! Money type for representing currency amounts
//!
//! Amounts are integer cents. Ledger arithmetic never touches floating point;
//! floats only appear at the edges (legacy snapshots, model responses) and are
//! rounded to the nearest cent on the way in.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// A monetary amount in cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use libro::models::Money;
    /// let amount = Money::from_cents(1050); // 10.50
    /// assert_eq!(amount.to_string(), "$10.50");
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a Money amount from whole units
    pub const fn from_units(units: i64) -> Self {
        Self(units * 100)
    }

    /// Convert a decimal amount (as found in JSON produced elsewhere),
    /// rounding half away from zero to the nearest cent
    pub fn from_decimal(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let cents = (value * 100.0).round();
        if cents.abs() > i64::MAX as f64 {
            return None;
        }
        Some(Self(cents as i64))
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Whole units, truncated toward zero
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// The cents portion (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Decimal representation, for serializing to services that expect numbers
    pub fn as_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Multiply by a whole quantity (unit cost × units)
    pub const fn times(&self, quantity: i64) -> Self {
        Self(self.0 * quantity)
    }

    /// `self` as a percentage of `total`, or `None` when `total` is zero
    pub fn percent_of(&self, total: Money) -> Option<f64> {
        if total.is_zero() {
            None
        } else {
            Some(self.0 as f64 * 100.0 / total.0 as f64)
        }
    }

    /// Parse a money amount from a string
    ///
    /// Accepts "10.50", "-10.50", "$10.50", "1,250.00" and "10" (whole units)
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let s = s.trim();

        let (negative, s) = match s.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, s),
        };

        let s = s.strip_prefix('$').unwrap_or(s);
        let cleaned: String = s.chars().filter(|c| *c != ',' && *c != '_').collect();

        // One leading sign only; digits and a single point from here on
        if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_ascii_digit() || c == '.') {
            return Err(MoneyParseError::InvalidFormat(s.to_string()));
        }

        let cents = match cleaned.split_once('.') {
            Some((whole, fraction)) => {
                if whole.is_empty() && fraction.is_empty() {
                    return Err(MoneyParseError::InvalidFormat(s.to_string()));
                }
                let whole: i64 = if whole.is_empty() {
                    0
                } else {
                    whole
                        .parse()
                        .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?
                };

                if fraction.len() > 2 || !fraction.chars().all(|c| c.is_ascii_digit()) {
                    return Err(MoneyParseError::InvalidFormat(s.to_string()));
                }

                let fraction_cents: i64 = match fraction.len() {
                    0 => 0,
                    1 => fraction.parse::<i64>().unwrap_or(0) * 10,
                    _ => fraction.parse().unwrap_or(0),
                };

                whole
                    .checked_mul(100)
                    .and_then(|c| c.checked_add(fraction_cents))
                    .ok_or_else(|| MoneyParseError::OutOfRange(s.to_string()))?
            }
            None => cleaned
                .parse::<i64>()
                .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?
                .checked_mul(100)
                .ok_or_else(|| MoneyParseError::OutOfRange(s.to_string()))?,
        };

        Ok(Self(if negative { -cents } else { cents }))
    }

    /// Format with a currency symbol
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        format!(
            "{}{}{}.{:02}",
            sign,
            symbol,
            self.units().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.format_with_symbol("$");
        match f.width() {
            Some(_) => f.pad(&text),
            None => f.write_str(&text),
        }
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> std::iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
    OutOfRange(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
            MoneyParseError::OutOfRange(s) => write!(f, "Amount out of range: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1050).to_string(), "$10.50");
        assert_eq!(Money::from_cents(0).to_string(), "$0.00");
        assert_eq!(Money::from_cents(-1050).to_string(), "-$10.50");
        assert_eq!(Money::from_cents(5).to_string(), "$0.05");
        assert_eq!(format!("{:>8}", Money::from_cents(100)), "   $1.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((-a).cents(), -1000);
        assert_eq!(b.times(3).cents(), 1500);
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("10.50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("$10.50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("-10.50").unwrap().cents(), -1050);
        assert_eq!(Money::parse("10").unwrap().cents(), 1000);
        assert_eq!(Money::parse("10.5").unwrap().cents(), 1050);
        assert_eq!(Money::parse(".05").unwrap().cents(), 5);
        assert_eq!(Money::parse("1,250.00").unwrap().cents(), 125000);
        assert!(Money::parse("abc").is_err());
        assert!(Money::parse("1.x").is_err());
        assert!(Money::parse("").is_err());
    }

    #[test]
    fn test_parse_rejects_extra_signs_and_sub_cent_digits() {
        assert!(Money::parse("--5").is_err());
        assert!(Money::parse("-$-5").is_err());
        assert!(Money::parse("-+5").is_err());
        assert!(Money::parse("+5").is_err());
        assert!(Money::parse("10.999").is_err());
        assert!(Money::parse("10.001").is_err());
        assert!(Money::parse("1.2.3").is_err());
        assert!(Money::parse(".").is_err());
        assert_eq!(Money::parse("-$5.25").unwrap().cents(), -525);
        assert_eq!(Money::parse("10.").unwrap().cents(), 1000);
    }

    #[test]
    fn test_from_decimal_rounds_to_cents() {
        assert_eq!(Money::from_decimal(1000.0).unwrap().cents(), 100000);
        assert_eq!(Money::from_decimal(0.1 + 0.2).unwrap().cents(), 30);
        assert_eq!(Money::from_decimal(-12.345).unwrap().cents(), -1235);
        assert!(Money::from_decimal(f64::NAN).is_none());
    }

    #[test]
    fn test_percent_of() {
        let spent = Money::from_units(80);
        assert_eq!(spent.percent_of(Money::from_units(100)), Some(80.0));
        assert_eq!(spent.percent_of(Money::zero()), None);
    }

    #[test]
    fn test_sum() {
        let amounts = vec![
            Money::from_cents(100),
            Money::from_cents(200),
            Money::from_cents(300),
        ];
        let by_ref: Money = amounts.iter().sum();
        let total: Money = amounts.into_iter().sum();
        assert_eq!(total.cents(), 600);
        assert_eq!(by_ref, total);
    }

    #[test]
    fn test_serialization() {
        let m = Money::from_cents(1050);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "1050");

        let deserialized: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(m, deserialized);
    }
}
