//! Inventory CLI commands

use clap::Subcommand;

use crate::display::{
    format_drift, format_product_details, format_product_list, format_stock_movements,
    format_valuation,
};
use crate::error::{LibroError, LibroResult};
use crate::models::StockMovementKind;
use crate::services::{InventoryService, NewStockMovement, ProductDetails};
use crate::storage::Storage;

use super::args::{parse_date_or_today, parse_money};

/// Inventory subcommands
#[derive(Subcommand)]
pub enum InventoryCommands {
    /// Add a product
    Add {
        sku: String,
        name: String,
        /// Units on hand when the product is created
        #[arg(short, long, default_value = "0")]
        stock: i64,
        #[arg(long)]
        cost: Option<String>,
        #[arg(long)]
        price: Option<String>,
        #[arg(long)]
        min_stock: Option<i64>,
        #[arg(short, long)]
        category: Option<String>,
        /// Unit of measure (e.g., "u", "kg")
        #[arg(short, long)]
        unit: Option<String>,
    },
    /// Change product fields
    Edit {
        /// Product SKU, ID or prefix
        product: String,
        #[arg(long)]
        sku: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        cost: Option<String>,
        #[arg(long)]
        price: Option<String>,
        #[arg(long)]
        min_stock: Option<i64>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        unit: Option<String>,
    },
    /// List products
    List,
    /// Product details and its movements
    Show {
        product: String,
    },
    /// Delete a product without movements
    Delete {
        product: String,
    },
    /// Record a purchase, sale or adjustment
    Move {
        product: String,
        /// "purchase", "sale" or "adjustment"
        kind: String,
        /// Units; adjustments accept negative values
        #[arg(allow_hyphen_values = true)]
        quantity: i64,
        #[arg(long)]
        unit_cost: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long, default_value = "")]
        notes: String,
    },
    /// Stock movement history
    Movements {
        product: Option<String>,
    },
    /// Products at or below their minimum stock
    Low,
    /// Stock valued at cost
    Valuation,
    /// Compare stored stock with the movement history
    Verify,
}

/// Split a signed quantity into (in, out) for the given movement kind
fn quantities(kind: StockMovementKind, quantity: i64) -> LibroResult<(i64, i64)> {
    match kind {
        StockMovementKind::Purchase | StockMovementKind::Sale if quantity <= 0 => Err(
            LibroError::Validation("Quantity must be positive".into()),
        ),
        StockMovementKind::Purchase => Ok((quantity, 0)),
        StockMovementKind::Sale => Ok((0, quantity)),
        StockMovementKind::Adjustment if quantity >= 0 => Ok((quantity, 0)),
        StockMovementKind::Adjustment => Ok((0, -quantity)),
    }
}

/// Handle an inventory command
pub fn handle_inventory_command(storage: &Storage, cmd: InventoryCommands) -> LibroResult<()> {
    let service = InventoryService::new(storage);

    match cmd {
        InventoryCommands::Add {
            sku,
            name,
            stock,
            cost,
            price,
            min_stock,
            category,
            unit,
        } => {
            let details = ProductDetails {
                name: None,
                category,
                unit,
                cost: cost.as_deref().map(parse_money).transpose()?,
                price: price.as_deref().map(parse_money).transpose()?,
                min_stock,
            };
            let product = service.create(&sku, &name, stock, details)?;
            println!("Added {} with {} {} on hand", product, product.stock, product.unit);
        }

        InventoryCommands::Edit {
            product,
            sku,
            name,
            cost,
            price,
            min_stock,
            category,
            unit,
        } => {
            let existing = service.find(&product)?;
            let details = ProductDetails {
                name,
                category,
                unit,
                cost: cost.as_deref().map(parse_money).transpose()?,
                price: price.as_deref().map(parse_money).transpose()?,
                min_stock,
            };
            let updated = service.update(existing.id, sku.as_deref(), details)?;
            println!("Updated {}", updated);
        }

        InventoryCommands::List => {
            print!("{}", format_product_list(&service.list()?));
        }

        InventoryCommands::Show { product } => {
            let product = service.find(&product)?;
            print!("{}", format_product_details(&product));
            let movements = service.movements(Some(product.id))?;
            if !movements.is_empty() {
                println!();
                print!("{}", format_stock_movements(&movements, std::slice::from_ref(&product)));
            }
        }

        InventoryCommands::Delete { product } => {
            let product = service.find(&product)?;
            let deleted = service.delete(product.id)?;
            println!("Deleted {}", deleted);
        }

        InventoryCommands::Move {
            product,
            kind,
            quantity,
            unit_cost,
            date,
            notes,
        } => {
            let product = service.find(&product)?;
            let kind = StockMovementKind::parse(&kind).ok_or_else(|| {
                LibroError::Validation(format!(
                    "Unknown movement '{}'. Use purchase, sale or adjustment",
                    kind
                ))
            })?;
            let (qty_in, qty_out) = quantities(kind, quantity)?;
            let input = NewStockMovement {
                kind,
                date: parse_date_or_today(date.as_deref())?,
                qty_in,
                qty_out,
                unit_cost: unit_cost.as_deref().map(parse_money).transpose()?,
                notes,
            };
            let (product, movement) = service.record_movement(product.id, input)?;
            println!(
                "Recorded {} of {}: stock now {} {}",
                movement.kind, product.sku, product.stock, product.unit
            );
            if product.is_low_stock() {
                println!("Warning: {} is at or below its minimum stock ({})", product.sku, product.min_stock);
            }
        }

        InventoryCommands::Movements { product } => {
            let product_id = match product {
                Some(p) => Some(service.find(&p)?.id),
                None => None,
            };
            let products = service.list()?;
            print!("{}", format_stock_movements(&service.movements(product_id)?, &products));
        }

        InventoryCommands::Low => {
            let low = service.low_stock()?;
            if low.is_empty() {
                println!("No products below their minimum stock.");
            } else {
                print!("{}", format_product_list(&low));
            }
        }

        InventoryCommands::Valuation => {
            print!("{}", format_valuation(&service.valuation()?));
        }

        InventoryCommands::Verify => {
            print!("{}", format_drift(&service.verify()?));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantities_by_kind() {
        assert_eq!(quantities(StockMovementKind::Purchase, 5).unwrap(), (5, 0));
        assert_eq!(quantities(StockMovementKind::Sale, 3).unwrap(), (0, 3));
        assert_eq!(quantities(StockMovementKind::Adjustment, -2).unwrap(), (0, 2));
        assert!(quantities(StockMovementKind::Sale, -3).is_err());
        assert!(quantities(StockMovementKind::Purchase, 0).is_err());
    }
}
