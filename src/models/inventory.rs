//! Inventory models: products and stock movements

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{ProductId, StockMovementId};
use super::money::Money;

/// Largest stock a product can hold, in units
pub const MAX_QUANTITY: i64 = 1_000_000_000;

/// A stocked product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,

    /// Unique stock-keeping unit
    pub sku: String,

    pub name: String,

    #[serde(default)]
    pub category: String,

    /// Unit of measure ("u", "kg", "box"...)
    #[serde(default = "default_unit")]
    pub unit: String,

    /// Unit cost
    #[serde(default)]
    pub cost: Money,

    /// Unit sale price
    #[serde(default)]
    pub price: Money,

    /// Current stock, in whole units
    #[serde(default)]
    pub stock: i64,

    /// Threshold at or below which the product counts as low stock
    #[serde(default)]
    pub min_stock: i64,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

fn default_unit() -> String {
    "u".to_string()
}

impl Product {
    pub fn new(sku: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ProductId::new(),
            sku: sku.into(),
            name: name.into(),
            category: String::new(),
            unit: default_unit(),
            cost: Money::zero(),
            price: Money::zero(),
            stock: 0,
            min_stock: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.min_stock
    }

    /// Stock valued at cost
    pub fn valuation(&self) -> Money {
        self.cost.times(self.stock)
    }

    /// Gross margin per unit as a percentage of price
    pub fn margin_percent(&self) -> Option<f64> {
        (self.price - self.cost).percent_of(self.price)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.sku.trim().is_empty() {
            return Err("SKU cannot be empty".into());
        }
        if self.name.trim().is_empty() {
            return Err("Product name cannot be empty".into());
        }
        if self.cost.is_negative() || self.price.is_negative() {
            return Err("Cost and price cannot be negative".into());
        }
        if self.min_stock < 0 {
            return Err("Minimum stock cannot be negative".into());
        }
        if self.stock > MAX_QUANTITY || self.min_stock > MAX_QUANTITY {
            return Err(format!("Stock cannot exceed {} units", MAX_QUANTITY));
        }
        Ok(())
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.sku, self.name)
    }
}

/// Reason for a stock change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockMovementKind {
    Purchase,
    Sale,
    Adjustment,
}

impl StockMovementKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "purchase" | "in" | "compra" => Some(Self::Purchase),
            "sale" | "out" | "venta" => Some(Self::Sale),
            "adjustment" | "adjust" | "ajuste" => Some(Self::Adjustment),
            _ => None,
        }
    }
}

impl fmt::Display for StockMovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Purchase => f.pad("Purchase"),
            Self::Sale => f.pad("Sale"),
            Self::Adjustment => f.pad("Adjustment"),
        }
    }
}

/// A recorded change of stock
///
/// `resulting_stock` is the product's stock right after this movement, as
/// it was when the movement was recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockMovement {
    pub id: StockMovementId,

    pub product_id: ProductId,

    pub date: NaiveDate,

    pub kind: StockMovementKind,

    #[serde(default)]
    pub qty_in: i64,

    #[serde(default)]
    pub qty_out: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_cost: Option<Money>,

    pub resulting_stock: i64,

    #[serde(default)]
    pub notes: String,

    pub created_at: DateTime<Utc>,
}

impl StockMovement {
    pub fn net_quantity(&self) -> i64 {
        self.qty_in - self.qty_out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_stock_and_valuation() {
        let mut product = Product::new("SKU-1", "Widget");
        product.cost = Money::from_units(4);
        product.price = Money::from_units(10);
        product.stock = 5;
        product.min_stock = 5;

        assert!(product.is_low_stock());
        assert_eq!(product.valuation(), Money::from_units(20));
        assert_eq!(product.margin_percent(), Some(60.0));

        product.stock = 6;
        assert!(!product.is_low_stock());
    }

    #[test]
    fn test_validation() {
        let mut product = Product::new("", "Widget");
        assert!(product.validate().is_err());
        product.sku = "W-1".into();
        assert!(product.validate().is_ok());
        product.cost = Money::from_units(-1);
        assert!(product.validate().is_err());
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!(StockMovementKind::parse("venta"), Some(StockMovementKind::Sale));
        assert_eq!(StockMovementKind::parse("nope"), None);
    }
}
