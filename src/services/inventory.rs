//! Inventory service
//!
//! Products and the stock movements that change them. Every movement stores
//! the stock it produced so history can be audited later.

use chrono::{NaiveDate, Utc};

use crate::audit::EntityType;
use crate::error::{LibroError, LibroResult};
use crate::models::inventory::MAX_QUANTITY;
use crate::models::{Money, Product, ProductId, StockMovement, StockMovementId, StockMovementKind};
use crate::storage::Storage;

/// Optional product fields, used by both create and update
#[derive(Debug, Clone, Default)]
pub struct ProductDetails {
    pub name: Option<String>,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub cost: Option<Money>,
    pub price: Option<Money>,
    pub min_stock: Option<i64>,
}

impl ProductDetails {
    fn apply(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name.trim().to_string();
        }
        if let Some(category) = self.category {
            product.category = category.trim().to_string();
        }
        if let Some(unit) = self.unit {
            product.unit = unit.trim().to_string();
        }
        if let Some(cost) = self.cost {
            product.cost = cost;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(min) = self.min_stock {
            product.min_stock = min;
        }
    }
}

/// Input for [`InventoryService::record_movement`]
#[derive(Debug, Clone)]
pub struct NewStockMovement {
    pub kind: StockMovementKind,
    pub date: NaiveDate,
    pub qty_in: i64,
    pub qty_out: i64,
    pub unit_cost: Option<Money>,
    pub notes: String,
}

/// Stock value of the whole catalogue
#[derive(Debug, Clone)]
pub struct Valuation {
    pub products: Vec<(Product, Money)>,
    pub total: Money,
    pub units: i64,
}

/// A product whose history disagrees with its stored stock
#[derive(Debug, Clone)]
pub struct StockDrift {
    pub product: Product,
    /// Stock recomputed from the movement history
    pub computed: i64,
    /// Movements whose recorded resulting stock differs from the replay
    pub bad_snapshots: Vec<StockMovementId>,
}

impl StockDrift {
    pub fn stock_mismatch(&self) -> bool {
        self.product.stock != self.computed
    }
}

/// Service for products and stock
pub struct InventoryService<'a> {
    storage: &'a Storage,
}

impl<'a> InventoryService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a product; an initial stock is recorded as an adjustment
    pub fn create(
        &self,
        sku: &str,
        name: &str,
        initial_stock: i64,
        details: ProductDetails,
    ) -> LibroResult<Product> {
        let mut product = Product::new(sku.trim(), name.trim());
        details.apply(&mut product);
        product.validate().map_err(LibroError::Validation)?;
        if initial_stock < 0 {
            return Err(LibroError::Validation("Stock cannot be negative".into()));
        }
        if initial_stock > MAX_QUANTITY {
            return Err(LibroError::Validation(format!(
                "Stock cannot exceed {} units",
                MAX_QUANTITY
            )));
        }

        if self.storage.inventory.get_by_sku(&product.sku)?.is_some() {
            return Err(LibroError::Duplicate {
                entity_type: "Product",
                identifier: product.sku.clone(),
            });
        }

        self.storage.inventory.upsert(product.clone())?;
        self.storage.inventory.save()?;
        self.storage.log_create(
            EntityType::Product,
            product.id.to_string(),
            Some(product.sku.clone()),
            &product,
        )?;
        tracing::info!(sku = %product.sku, "product created");

        if initial_stock > 0 {
            let (updated, _) = self.record_movement(
                product.id,
                NewStockMovement {
                    kind: StockMovementKind::Adjustment,
                    date: Utc::now().date_naive(),
                    qty_in: initial_stock,
                    qty_out: 0,
                    unit_cost: Some(product.cost),
                    notes: "Initial stock".into(),
                },
            )?;
            return Ok(updated);
        }
        Ok(product)
    }

    /// Edit product fields; stock only changes through movements
    pub fn update(&self, id: ProductId, sku: Option<&str>, details: ProductDetails) -> LibroResult<Product> {
        let mut product = self.require(id)?;
        let before = product.clone();

        if let Some(sku) = sku {
            let sku = sku.trim();
            if let Some(existing) = self.storage.inventory.get_by_sku(sku)? {
                if existing.id != id {
                    return Err(LibroError::Duplicate {
                        entity_type: "Product",
                        identifier: sku.to_string(),
                    });
                }
            }
            product.sku = sku.to_string();
        }
        details.apply(&mut product);
        product.updated_at = Utc::now();
        product.validate().map_err(LibroError::Validation)?;

        self.storage.inventory.upsert(product.clone())?;
        self.storage.inventory.save()?;
        self.storage.log_update(
            EntityType::Product,
            product.id.to_string(),
            Some(product.sku.clone()),
            &before,
            &product,
        )?;
        Ok(product)
    }

    /// Products by SKU
    pub fn list(&self) -> LibroResult<Vec<Product>> {
        self.storage.inventory.get_all()
    }

    /// Find by SKU, id or name
    pub fn find(&self, identifier: &str) -> LibroResult<Product> {
        self.storage
            .inventory
            .find(identifier)?
            .ok_or_else(|| LibroError::product_not_found(identifier))
    }

    /// Delete a product with no stock history
    pub fn delete(&self, id: ProductId) -> LibroResult<Product> {
        let product = self.require(id)?;
        let history = self.storage.inventory.get_movements_for(id)?;
        if !history.is_empty() {
            return Err(LibroError::Validation(format!(
                "{} has {} stock movement(s) and cannot be deleted",
                product.sku,
                history.len()
            )));
        }

        self.storage.inventory.delete(id)?;
        self.storage.inventory.save()?;
        self.storage.log_delete(
            EntityType::Product,
            product.id.to_string(),
            Some(product.sku.clone()),
            &product,
        )?;
        Ok(product)
    }

    /// Apply a movement and store the resulting stock on both records
    pub fn record_movement(
        &self,
        product_id: ProductId,
        input: NewStockMovement,
    ) -> LibroResult<(Product, StockMovement)> {
        let mut product = self.require(product_id)?;
        let before = product.clone();

        if input.qty_in < 0 || input.qty_out < 0 {
            return Err(LibroError::Validation(
                "Quantities cannot be negative".into(),
            ));
        }
        match input.kind {
            StockMovementKind::Purchase if input.qty_in == 0 || input.qty_out != 0 => {
                return Err(LibroError::Validation(
                    "A purchase needs an incoming quantity only".into(),
                ))
            }
            StockMovementKind::Sale if input.qty_out == 0 || input.qty_in != 0 => {
                return Err(LibroError::Validation(
                    "A sale needs an outgoing quantity only".into(),
                ))
            }
            StockMovementKind::Adjustment if input.qty_in == 0 && input.qty_out == 0 => {
                return Err(LibroError::Validation(
                    "An adjustment needs a quantity".into(),
                ))
            }
            _ => {}
        }

        let resulting = product
            .stock
            .checked_add(input.qty_in)
            .and_then(|stock| stock.checked_sub(input.qty_out))
            .filter(|stock| *stock <= MAX_QUANTITY)
            .ok_or_else(|| {
                LibroError::Validation(format!(
                    "Stock of {} cannot exceed {} units",
                    product.sku, MAX_QUANTITY
                ))
            })?;
        if resulting < 0 {
            return Err(LibroError::Validation(format!(
                "Insufficient stock for {}: {} on hand, {} requested",
                product.sku, product.stock, input.qty_out
            )));
        }

        let movement = StockMovement {
            id: StockMovementId::new(),
            product_id,
            date: input.date,
            kind: input.kind,
            qty_in: input.qty_in,
            qty_out: input.qty_out,
            unit_cost: input.unit_cost,
            resulting_stock: resulting,
            notes: input.notes.trim().to_string(),
            created_at: Utc::now(),
        };
        product.stock = resulting;
        product.updated_at = Utc::now();

        self.storage.inventory.upsert_movement(movement.clone())?;
        self.storage.inventory.upsert(product.clone())?;
        self.storage.inventory.save()?;

        self.storage.log_create(
            EntityType::StockMovement,
            movement.id.to_string(),
            Some(format!("{} {}", product.sku, movement.kind)),
            &movement,
        )?;
        self.storage.log_update(
            EntityType::Product,
            product.id.to_string(),
            Some(product.sku.clone()),
            &before,
            &product,
        )?;

        tracing::info!(sku = %product.sku, stock = resulting, "stock movement recorded");
        Ok((product, movement))
    }

    /// Movements of one product, or of all of them, in recording order
    pub fn movements(&self, product_id: Option<ProductId>) -> LibroResult<Vec<StockMovement>> {
        match product_id {
            Some(id) => self.storage.inventory.get_movements_for(id),
            None => self.storage.inventory.get_all_movements(),
        }
    }

    /// Products at or below their minimum stock
    pub fn low_stock(&self) -> LibroResult<Vec<Product>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|p| p.is_low_stock())
            .collect())
    }

    /// Σ stock × cost
    pub fn valuation(&self) -> LibroResult<Valuation> {
        let products: Vec<(Product, Money)> = self
            .list()?
            .into_iter()
            .map(|p| {
                let value = p.valuation();
                (p, value)
            })
            .collect();
        Ok(Valuation {
            total: products.iter().map(|(_, v)| *v).sum(),
            units: products.iter().map(|(p, _)| p.stock).sum(),
            products,
        })
    }

    /// Replay every product's history and report the ones that disagree
    pub fn verify(&self) -> LibroResult<Vec<StockDrift>> {
        let movements = self.storage.inventory.get_all_movements()?;
        let mut drifts = Vec::new();

        for product in self.list()? {
            let mut computed = 0;
            let mut bad_snapshots = Vec::new();
            for movement in movements.iter().filter(|m| m.product_id == product.id) {
                computed += movement.net_quantity();
                if movement.resulting_stock != computed {
                    bad_snapshots.push(movement.id);
                }
            }

            if computed != product.stock || !bad_snapshots.is_empty() {
                tracing::warn!(sku = %product.sku, stored = product.stock, computed, "stock drift");
                drifts.push(StockDrift {
                    product,
                    computed,
                    bad_snapshots,
                });
            }
        }
        Ok(drifts)
    }

    fn require(&self, id: ProductId) -> LibroResult<Product> {
        self.storage
            .inventory
            .get(id)?
            .ok_or_else(|| LibroError::product_not_found(id.to_string()))
    }
}
