//! Product and stock movement repository
//!
//! Both collections live in inventory.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::LibroError;
use crate::models::{Product, ProductId, StockMovement, StockMovementId};

use super::file_io::{read_json, write_json_atomic};
use super::{read_lock_err, write_lock_err};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct InventoryData {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub movements: Vec<StockMovement>,
}

/// Repository for products and their stock history
pub struct InventoryRepository {
    path: PathBuf,
    products: RwLock<HashMap<ProductId, Product>>,
    movements: RwLock<HashMap<StockMovementId, StockMovement>>,
}

impl InventoryRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            products: RwLock::new(HashMap::new()),
            movements: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), LibroError> {
        let file_data: InventoryData = read_json(&self.path)?;
        self.replace_all(file_data.products, file_data.movements)
    }

    pub fn save(&self) -> Result<(), LibroError> {
        let file_data = InventoryData {
            products: self.get_all()?,
            movements: self.get_all_movements()?,
        };
        write_json_atomic(&self.path, &file_data)
    }

    pub fn get(&self, id: ProductId) -> Result<Option<Product>, LibroError> {
        let products = self.products.read().map_err(read_lock_err)?;
        Ok(products.get(&id).cloned())
    }

    /// All products sorted by SKU
    pub fn get_all(&self) -> Result<Vec<Product>, LibroError> {
        let products = self.products.read().map_err(read_lock_err)?;
        let mut list: Vec<_> = products.values().cloned().collect();
        list.sort_by(|a, b| a.sku.cmp(&b.sku));
        Ok(list)
    }

    /// Case-insensitive SKU match
    pub fn get_by_sku(&self, sku: &str) -> Result<Option<Product>, LibroError> {
        let products = self.products.read().map_err(read_lock_err)?;
        let sku = sku.trim();
        Ok(products
            .values()
            .find(|p| p.sku.eq_ignore_ascii_case(sku))
            .cloned())
    }

    /// Look a product up by SKU, id, or name
    pub fn find(&self, identifier: &str) -> Result<Option<Product>, LibroError> {
        if let Some(product) = self.get_by_sku(identifier)? {
            return Ok(Some(product));
        }
        let products = self.products.read().map_err(read_lock_err)?;
        let lower = identifier.trim().to_lowercase();
        Ok(products
            .values()
            .find(|p| p.id.matches(identifier) || p.name.to_lowercase() == lower)
            .cloned())
    }

    pub fn upsert(&self, product: Product) -> Result<(), LibroError> {
        let mut products = self.products.write().map_err(write_lock_err)?;
        products.insert(product.id, product);
        Ok(())
    }

    pub fn delete(&self, id: ProductId) -> Result<bool, LibroError> {
        let mut products = self.products.write().map_err(write_lock_err)?;
        Ok(products.remove(&id).is_some())
    }

    /// All stock movements in recording order
    pub fn get_all_movements(&self) -> Result<Vec<StockMovement>, LibroError> {
        let movements = self.movements.read().map_err(read_lock_err)?;
        let mut list: Vec<_> = movements.values().cloned().collect();
        list.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.date.cmp(&b.date)));
        Ok(list)
    }

    pub fn get_movements_for(&self, product_id: ProductId) -> Result<Vec<StockMovement>, LibroError> {
        Ok(self
            .get_all_movements()?
            .into_iter()
            .filter(|m| m.product_id == product_id)
            .collect())
    }

    pub fn upsert_movement(&self, movement: StockMovement) -> Result<(), LibroError> {
        let mut movements = self.movements.write().map_err(write_lock_err)?;
        movements.insert(movement.id, movement);
        Ok(())
    }

    pub fn replace_all(
        &self,
        products: Vec<Product>,
        movements: Vec<StockMovement>,
    ) -> Result<(), LibroError> {
        let mut product_map = self.products.write().map_err(write_lock_err)?;
        let mut movement_map = self.movements.write().map_err(write_lock_err)?;
        product_map.clear();
        movement_map.clear();
        product_map.extend(products.into_iter().map(|p| (p.id, p)));
        movement_map.extend(movements.into_iter().map(|m| (m.id, m)));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_by_sku_name_or_id() {
        let temp_dir = TempDir::new().unwrap();
        let repo = InventoryRepository::new(temp_dir.path().join("inventory.json"));
        let product = Product::new("YM-01", "Yerba 1kg");
        repo.upsert(product.clone()).unwrap();

        assert!(repo.find("ym-01").unwrap().is_some());
        assert!(repo.find("yerba 1kg").unwrap().is_some());
        assert!(repo.find(&product.id.to_string()).unwrap().is_some());
        assert!(repo.find("cafe").unwrap().is_none());
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("inventory.json");
        let repo = InventoryRepository::new(path.clone());
        let mut product = Product::new("A", "Alpha");
        product.stock = 7;
        repo.upsert(product.clone()).unwrap();
        repo.save().unwrap();

        let reloaded = InventoryRepository::new(path);
        reloaded.load().unwrap();
        assert_eq!(reloaded.get(product.id).unwrap().unwrap().stock, 7);
    }
}
