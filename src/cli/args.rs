//! Parsing of free-form CLI arguments

use chrono::NaiveDate;

use crate::error::{LibroError, LibroResult};
use crate::models::{Money, Posting, YearMonth};

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn parse_date(s: &str) -> LibroResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| LibroError::Validation(format!("Invalid date format: '{}'. Use YYYY-MM-DD", s)))
}

/// Parse a date string or return today's date
pub fn parse_date_or_today(s: Option<&str>) -> LibroResult<NaiveDate> {
    s.map(parse_date).unwrap_or_else(|| Ok(today()))
}

pub fn parse_optional_date(s: Option<&str>) -> LibroResult<Option<NaiveDate>> {
    s.map(parse_date).transpose()
}

pub fn parse_money(s: &str) -> LibroResult<Money> {
    Money::parse(s).map_err(|e| {
        LibroError::Validation(format!(
            "Invalid amount: '{}'. Use a format like '1250.50'. Error: {}",
            s, e
        ))
    })
}

pub fn parse_month(s: &str) -> LibroResult<YearMonth> {
    YearMonth::parse(s)
        .map_err(|_| LibroError::Validation(format!("Invalid month: '{}'. Use YYYY-MM", s)))
}

pub fn parse_month_or_current(s: Option<&str>) -> LibroResult<YearMonth> {
    s.map(parse_month).unwrap_or_else(|| Ok(YearMonth::of(today())))
}

/// Parse `ACCOUNT=AMOUNT` lines of a compound entry
pub fn parse_postings(lines: &[String]) -> LibroResult<Vec<Posting>> {
    lines
        .iter()
        .map(|line| {
            let (account, amount) = line.rsplit_once('=').ok_or_else(|| {
                LibroError::Validation(format!("Invalid line '{}'. Use ACCOUNT=AMOUNT", line))
            })?;
            Ok(Posting::new(account.trim(), parse_money(amount)?))
        })
        .collect()
}

/// Parse a percentage like `21` or `10.5` into basis points
pub fn parse_rate_bps(s: &str) -> LibroResult<u32> {
    let rate: f64 = s
        .trim()
        .trim_end_matches('%')
        .parse()
        .map_err(|_| LibroError::Validation(format!("Invalid rate: '{}'", s)))?;
    if !(0.0..=100.0).contains(&rate) {
        return Err(LibroError::Validation(format!("Rate must be between 0 and 100: {}", s)));
    }
    Ok((rate * 100.0).round() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_postings() {
        let parts = parse_postings(&["acc_sales=100".into(), "IVA débito fiscal = 21.00".into()]).unwrap();
        assert_eq!(parts[0].account_id, "acc_sales");
        assert_eq!(parts[1].account_id, "IVA débito fiscal");
        assert_eq!(parts[1].amount, Money::from_units(21));
        assert!(parse_postings(&["acc_sales 100".into()]).is_err());
    }

    #[test]
    fn test_parse_rate() {
        assert_eq!(parse_rate_bps("21").unwrap(), 2100);
        assert_eq!(parse_rate_bps("10.5%").unwrap(), 1050);
        assert!(parse_rate_bps("120").is_err());
    }

    #[test]
    fn test_dates() {
        assert!(parse_date("2025-02-30").is_err());
        assert_eq!(parse_optional_date(None).unwrap(), None);
        assert_eq!(parse_month("2025-03").unwrap(), YearMonth::new(2025, 3).unwrap());
    }
}
