//! Partner and partner movement repository
//!
//! Both collections live in partners.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::LibroError;
use crate::models::{MovementId, Partner, PartnerId, PartnerMovement};

use super::file_io::{read_json, write_json_atomic};
use super::{read_lock_err, write_lock_err};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct PartnerData {
    #[serde(default)]
    pub partners: Vec<Partner>,
    #[serde(default)]
    pub movements: Vec<PartnerMovement>,
}

/// Repository for partners and their movements
pub struct PartnerRepository {
    path: PathBuf,
    partners: RwLock<HashMap<PartnerId, Partner>>,
    movements: RwLock<HashMap<MovementId, PartnerMovement>>,
}

impl PartnerRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            partners: RwLock::new(HashMap::new()),
            movements: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), LibroError> {
        let file_data: PartnerData = read_json(&self.path)?;
        self.replace_all(file_data.partners, file_data.movements)
    }

    pub fn save(&self) -> Result<(), LibroError> {
        let file_data = PartnerData {
            partners: self.get_all()?,
            movements: self.get_all_movements()?,
        };
        write_json_atomic(&self.path, &file_data)
    }

    // Partner operations

    pub fn get(&self, id: PartnerId) -> Result<Option<Partner>, LibroError> {
        let partners = self.partners.read().map_err(read_lock_err)?;
        Ok(partners.get(&id).cloned())
    }

    /// All partners sorted by name
    pub fn get_all(&self) -> Result<Vec<Partner>, LibroError> {
        let partners = self.partners.read().map_err(read_lock_err)?;
        let mut list: Vec<_> = partners.values().cloned().collect();
        list.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(list)
    }

    /// Case-insensitive exact name match
    pub fn get_by_name(&self, name: &str) -> Result<Option<Partner>, LibroError> {
        let partners = self.partners.read().map_err(read_lock_err)?;
        let name = name.trim().to_lowercase();
        Ok(partners
            .values()
            .find(|p| p.name.to_lowercase() == name)
            .cloned())
    }

    /// Look a partner up by id, short id, or name
    pub fn find(&self, identifier: &str) -> Result<Option<Partner>, LibroError> {
        if let Some(partner) = self.get_by_name(identifier)? {
            return Ok(Some(partner));
        }
        let partners = self.partners.read().map_err(read_lock_err)?;
        Ok(partners.values().find(|p| p.id.matches(identifier)).cloned())
    }

    pub fn upsert(&self, partner: Partner) -> Result<(), LibroError> {
        let mut partners = self.partners.write().map_err(write_lock_err)?;
        partners.insert(partner.id, partner);
        Ok(())
    }

    pub fn delete(&self, id: PartnerId) -> Result<bool, LibroError> {
        let mut partners = self.partners.write().map_err(write_lock_err)?;
        Ok(partners.remove(&id).is_some())
    }

    // Movement operations

    pub fn get_movement(&self, id: MovementId) -> Result<Option<PartnerMovement>, LibroError> {
        let movements = self.movements.read().map_err(read_lock_err)?;
        Ok(movements.get(&id).cloned())
    }

    pub fn find_movement(&self, identifier: &str) -> Result<Option<PartnerMovement>, LibroError> {
        let movements = self.movements.read().map_err(read_lock_err)?;
        Ok(movements.values().find(|m| m.id.matches(identifier)).cloned())
    }

    /// All movements in date order
    pub fn get_all_movements(&self) -> Result<Vec<PartnerMovement>, LibroError> {
        let movements = self.movements.read().map_err(read_lock_err)?;
        let mut list: Vec<_> = movements.values().cloned().collect();
        list.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));
        Ok(list)
    }

    /// Movements of one partner in date order
    pub fn get_movements_for(&self, partner_id: PartnerId) -> Result<Vec<PartnerMovement>, LibroError> {
        Ok(self
            .get_all_movements()?
            .into_iter()
            .filter(|m| m.partner_id == partner_id)
            .collect())
    }

    pub fn upsert_movement(&self, movement: PartnerMovement) -> Result<(), LibroError> {
        let mut movements = self.movements.write().map_err(write_lock_err)?;
        movements.insert(movement.id, movement);
        Ok(())
    }

    pub fn delete_movement(&self, id: MovementId) -> Result<bool, LibroError> {
        let mut movements = self.movements.write().map_err(write_lock_err)?;
        Ok(movements.remove(&id).is_some())
    }

    /// Remove every movement of a partner, returning how many were removed
    pub fn delete_movements_for(&self, partner_id: PartnerId) -> Result<usize, LibroError> {
        let mut movements = self.movements.write().map_err(write_lock_err)?;
        let before = movements.len();
        movements.retain(|_, m| m.partner_id != partner_id);
        Ok(before - movements.len())
    }

    pub fn replace_all(
        &self,
        partners: Vec<Partner>,
        movements: Vec<PartnerMovement>,
    ) -> Result<(), LibroError> {
        let mut partner_map = self.partners.write().map_err(write_lock_err)?;
        let mut movement_map = self.movements.write().map_err(write_lock_err)?;
        partner_map.clear();
        movement_map.clear();
        partner_map.extend(partners.into_iter().map(|p| (p.id, p)));
        movement_map.extend(movements.into_iter().map(|m| (m.id, m)));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, MovementKind, PartnerKind};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn setup() -> (TempDir, PartnerRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = PartnerRepository::new(temp_dir.path().join("partners.json"));
        (temp_dir, repo)
    }

    #[test]
    fn test_partner_and_movements_round_trip() {
        let (temp_dir, repo) = setup();
        let partner = Partner::new("Acme SA", PartnerKind::Client);
        let movement = PartnerMovement::new(
            partner.id,
            MovementKind::Invoice,
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            Money::from_units(500),
        );
        repo.upsert(partner.clone()).unwrap();
        repo.upsert_movement(movement.clone()).unwrap();
        repo.save().unwrap();

        let reloaded = PartnerRepository::new(temp_dir.path().join("partners.json"));
        reloaded.load().unwrap();
        assert_eq!(reloaded.get_all().unwrap().len(), 1);
        assert_eq!(reloaded.get_movements_for(partner.id).unwrap()[0].id, movement.id);
    }

    #[test]
    fn test_find_by_name_or_id() {
        let (_temp_dir, repo) = setup();
        let partner = Partner::new("Distribuidora Norte", PartnerKind::Supplier);
        repo.upsert(partner.clone()).unwrap();

        assert!(repo.find("distribuidora norte").unwrap().is_some());
        assert!(repo.find(&partner.id.to_string()).unwrap().is_some());
        assert!(repo.find("nobody").unwrap().is_none());
    }

    #[test]
    fn test_delete_movements_for_partner() {
        let (_temp_dir, repo) = setup();
        let a = Partner::new("A", PartnerKind::Client);
        let b = Partner::new("B", PartnerKind::Client);
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        for partner in [&a, &a, &b] {
            repo.upsert_movement(PartnerMovement::new(
                partner.id,
                MovementKind::Invoice,
                date,
                Money::from_units(1),
            ))
            .unwrap();
        }

        assert_eq!(repo.delete_movements_for(a.id).unwrap(), 2);
        assert_eq!(repo.get_all_movements().unwrap().len(), 1);
    }
}
