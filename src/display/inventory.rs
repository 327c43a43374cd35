//! Inventory display formatting

use std::collections::HashMap;

use crate::models::{Product, ProductId, StockMovement};
use crate::services::{StockDrift, Valuation};

use super::format::truncate;

pub fn format_product_list(products: &[Product]) -> String {
    if products.is_empty() {
        return "No products found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12}  {:<26}  {:<12}  {:>7}  {:>7}  {:>11}  {:>11}\n",
        "SKU", "Name", "Category", "Stock", "Min", "Cost", "Price"
    ));
    output.push_str(&"-".repeat(96));
    output.push('\n');

    for product in products {
        let low = if product.is_low_stock() { " low" } else { "" };
        output.push_str(&format!(
            "{:<12}  {:<26}  {:<12}  {:>7}  {:>7}  {:>11}  {:>11}{}\n",
            truncate(&product.sku, 12),
            truncate(&product.name, 26),
            truncate(&product.category, 12),
            product.stock,
            product.min_stock,
            product.cost,
            product.price,
            low
        ));
    }
    output
}

pub fn format_product_details(product: &Product) -> String {
    let mut output = String::new();
    output.push_str(&format!("Product:   {}\n", product.name));
    output.push_str(&format!("SKU:       {}\n", product.sku));
    output.push_str(&format!("ID:        {}\n", product.id.as_uuid()));
    output.push_str(&format!("Category:  {}\n", product.category));
    output.push_str(&format!("Unit:      {}\n", product.unit));
    output.push_str(&format!("Stock:     {} (min {})\n", product.stock, product.min_stock));
    output.push_str(&format!("Cost:      {}\n", product.cost));
    output.push_str(&format!("Price:     {}\n", product.price));
    if let Some(margin) = product.margin_percent() {
        output.push_str(&format!("Margin:    {:.1}%\n", margin));
    }
    output.push_str(&format!("Value:     {}\n", product.valuation()));
    output
}

/// Stock history; `products` supplies SKU labels
pub fn format_stock_movements(movements: &[StockMovement], products: &[Product]) -> String {
    if movements.is_empty() {
        return "No stock movements found.\n".to_string();
    }
    let skus: HashMap<ProductId, &str> = products.iter().map(|p| (p.id, p.sku.as_str())).collect();

    let mut output = String::new();
    output.push_str(&format!(
        "{:<10}  {:<12}  {:<10}  {:>6}  {:>6}  {:>7}  {}\n",
        "Date", "SKU", "Kind", "In", "Out", "Stock", "Notes"
    ));
    for m in movements {
        output.push_str(&format!(
            "{:<10}  {:<12}  {:<10}  {:>6}  {:>6}  {:>7}  {}\n",
            m.date,
            skus.get(&m.product_id).copied().unwrap_or("?"),
            m.kind,
            m.qty_in,
            m.qty_out,
            m.resulting_stock,
            truncate(&m.notes, 30)
        ));
    }
    output
}

pub fn format_valuation(valuation: &Valuation) -> String {
    let mut output = String::new();
    output.push_str("Inventory valuation (at cost)\n");
    output.push_str(&"=".repeat(60));
    output.push('\n');
    for (product, value) in &valuation.products {
        output.push_str(&format!(
            "{:<12}  {:<26}  {:>5}  {:>11}\n",
            truncate(&product.sku, 12),
            truncate(&product.name, 26),
            product.stock,
            value
        ));
    }
    output.push_str(&"-".repeat(60));
    output.push('\n');
    output.push_str(&format!("{:<40}  {:>5}  {:>11}\n", "TOTAL", valuation.units, valuation.total));
    output
}

pub fn format_drift(drifts: &[StockDrift]) -> String {
    if drifts.is_empty() {
        return "Stock levels match the movement history.\n".to_string();
    }
    let mut output = String::new();
    for drift in drifts {
        if drift.stock_mismatch() {
            output.push_str(&format!(
                "{}: stored stock {} but history gives {}\n",
                drift.product.sku, drift.product.stock, drift.computed
            ));
        }
        if !drift.bad_snapshots.is_empty() {
            output.push_str(&format!(
                "{}: {} movement(s) with a wrong resulting stock\n",
                drift.product.sku,
                drift.bad_snapshots.len()
            ));
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;

    #[test]
    fn test_product_list_marks_low_stock() {
        let mut product = Product::new("SKU-1", "Coffee beans");
        product.stock = 2;
        product.min_stock = 5;
        product.cost = Money::from_units(4);
        let text = format_product_list(&[product]);
        assert!(text.contains("Coffee beans"));
        assert!(text.trim_end().ends_with("low"));
    }

    #[test]
    fn test_drift_report() {
        let product = Product::new("SKU-1", "Tea");
        let ok = format_drift(&[]);
        assert!(ok.contains("match"));

        let drift = StockDrift {
            product,
            computed: 3,
            bad_snapshots: Vec::new(),
        };
        assert!(format_drift(&[drift]).contains("history gives 3"));
    }
}
