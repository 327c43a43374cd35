//! Partner service
//!
//! Clients and suppliers, their invoices, payments and notes, and the
//! current-account balances derived from them.

use chrono::{NaiveDate, Utc};

use crate::audit::EntityType;
use crate::error::{LibroError, LibroResult};
use crate::models::{
    partner_balance, Money, MovementId, MovementKind, MovementStatus, Partner, PartnerId,
    PartnerKind, PartnerMovement,
};
use crate::storage::Storage;

/// Optional partner fields, used by both create and update
#[derive(Debug, Clone, Default)]
pub struct PartnerDetails {
    pub name: Option<String>,
    pub kind: Option<PartnerKind>,
    pub tax_id: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub credit_days: Option<u32>,
    /// `Some(None)` clears the limit
    pub credit_limit: Option<Option<Money>>,
    pub notes: Option<String>,
}

impl PartnerDetails {
    fn apply(self, partner: &mut Partner) {
        if let Some(name) = self.name {
            partner.name = name.trim().to_string();
        }
        if let Some(kind) = self.kind {
            partner.kind = kind;
        }
        if let Some(tax_id) = self.tax_id {
            partner.tax_id = tax_id.trim().to_string();
        }
        if let Some(email) = self.email {
            partner.email = email.trim().to_string();
        }
        if let Some(phone) = self.phone {
            partner.phone = phone.trim().to_string();
        }
        if let Some(days) = self.credit_days {
            partner.credit_days = days;
        }
        if let Some(limit) = self.credit_limit {
            partner.credit_limit = limit;
        }
        if let Some(notes) = self.notes {
            partner.notes = notes;
        }
    }
}

/// Input for [`PartnerService::record_movement`]
#[derive(Debug, Clone)]
pub struct NewMovement {
    pub kind: MovementKind,
    pub date: NaiveDate,
    pub amount: Money,
    /// Defaults to `date + credit_days` for charges
    pub due_date: Option<NaiveDate>,
    pub reference: String,
    pub description: String,
}

/// One line of a partner statement
#[derive(Debug, Clone)]
pub struct StatementLine {
    pub movement: PartnerMovement,
    pub balance: Money,
}

/// Current-account position of one partner
#[derive(Debug, Clone)]
pub struct PartnerSummary {
    pub partner: Partner,
    pub balance: Money,
    pub overdue: Money,
    pub overdue_count: usize,
    /// Balance above the partner's credit limit
    pub over_limit: bool,
}

/// Position of every partner plus the totals owed in each direction
#[derive(Debug, Clone, Default)]
pub struct PartnerOverview {
    pub partners: Vec<PartnerSummary>,
    /// Positive balances of clients
    pub receivables: Money,
    /// Positive balances of suppliers
    pub payables: Money,
    pub overdue_count: usize,
}

/// Service for partners and their movements
pub struct PartnerService<'a> {
    storage: &'a Storage,
}

impl<'a> PartnerService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn create(&self, name: &str, kind: PartnerKind, details: PartnerDetails) -> LibroResult<Partner> {
        let mut partner = Partner::new(name.trim(), kind);
        details.apply(&mut partner);
        partner.validate().map_err(LibroError::Validation)?;
        self.ensure_unique_name(&partner.name, None)?;

        self.storage.partners.upsert(partner.clone())?;
        self.storage.partners.save()?;

        self.storage.log_create(
            EntityType::Partner,
            partner.id.to_string(),
            Some(partner.name.clone()),
            &partner,
        )?;

        tracing::info!(id = %partner.id, name = %partner.name, "partner created");
        Ok(partner)
    }

    pub fn update(&self, id: PartnerId, details: PartnerDetails) -> LibroResult<Partner> {
        let mut partner = self.require(id)?;
        let before = partner.clone();

        details.apply(&mut partner);
        partner.updated_at = Utc::now();
        partner.validate().map_err(LibroError::Validation)?;
        if partner.name != before.name {
            self.ensure_unique_name(&partner.name, Some(id))?;
        }

        self.storage.partners.upsert(partner.clone())?;
        self.storage.partners.save()?;

        self.storage.log_update(
            EntityType::Partner,
            partner.id.to_string(),
            Some(partner.name.clone()),
            &before,
            &partner,
        )?;
        Ok(partner)
    }

    fn ensure_unique_name(&self, name: &str, exclude: Option<PartnerId>) -> LibroResult<()> {
        match self.storage.partners.get_by_name(name)? {
            Some(existing) if Some(existing.id) != exclude => Err(LibroError::Duplicate {
                entity_type: "Partner",
                identifier: name.to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Partners by name; `Both` partners show up under either kind
    pub fn list(&self, kind: Option<PartnerKind>) -> LibroResult<Vec<Partner>> {
        Ok(self
            .storage
            .partners
            .get_all()?
            .into_iter()
            .filter(|p| match kind {
                None | Some(PartnerKind::Both) => true,
                Some(PartnerKind::Client) => p.kind.is_client(),
                Some(PartnerKind::Supplier) => p.kind.is_supplier(),
            })
            .collect())
    }

    /// Find by name or id
    pub fn find(&self, identifier: &str) -> LibroResult<Partner> {
        self.storage
            .partners
            .find(identifier)?
            .ok_or_else(|| LibroError::partner_not_found(identifier))
    }

    /// Delete a partner; with `force` its movements go too
    pub fn delete(&self, id: PartnerId, force: bool) -> LibroResult<Partner> {
        let partner = self.require(id)?;
        let movements = self.storage.partners.get_movements_for(id)?;

        if !movements.is_empty() && !force {
            return Err(LibroError::Validation(format!(
                "{} has {} movement(s); delete them first or force the deletion",
                partner.name,
                movements.len()
            )));
        }

        self.storage.partners.delete_movements_for(id)?;
        self.storage.partners.delete(id)?;
        self.storage.partners.save()?;

        for movement in &movements {
            self.storage.log_delete(
                EntityType::PartnerMovement,
                movement.id.to_string(),
                Some(movement.reference.clone()).filter(|r| !r.is_empty()),
                movement,
            )?;
        }
        self.storage.log_delete(
            EntityType::Partner,
            partner.id.to_string(),
            Some(partner.name.clone()),
            &partner,
        )?;

        tracing::info!(id = %partner.id, movements = movements.len(), "partner deleted");
        Ok(partner)
    }

    pub fn record_movement(&self, partner_id: PartnerId, input: NewMovement) -> LibroResult<PartnerMovement> {
        let partner = self.require(partner_id)?;
        if !input.amount.is_positive() {
            return Err(LibroError::Validation(
                "Amount must be greater than zero".into(),
            ));
        }
        if let Some(due) = input.due_date {
            if due < input.date {
                return Err(LibroError::Validation(
                    "Due date cannot be before the movement date".into(),
                ));
            }
        }

        let mut movement = PartnerMovement::new(partner.id, input.kind, input.date, input.amount);
        movement.due_date = input.due_date;
        movement.reference = input.reference.trim().to_string();
        movement.description = input.description.trim().to_string();
        let movement = movement
            .with_terms(partner.credit_days)
            .map_err(LibroError::Validation)?;

        self.storage.partners.upsert_movement(movement.clone())?;
        self.storage.partners.save()?;

        self.storage.log_create(
            EntityType::PartnerMovement,
            movement.id.to_string(),
            Some(format!("{} {}", partner.name, movement.kind)),
            &movement,
        )?;

        tracing::info!(
            partner = %partner.name,
            kind = %movement.kind,
            amount = %movement.amount,
            "partner movement recorded"
        );
        Ok(movement)
    }

    pub fn find_movement(&self, identifier: &str) -> LibroResult<PartnerMovement> {
        self.storage
            .partners
            .find_movement(identifier)?
            .ok_or_else(|| LibroError::movement_not_found(identifier))
    }

    pub fn set_status(&self, id: MovementId, status: MovementStatus) -> LibroResult<PartnerMovement> {
        let mut movement = self
            .storage
            .partners
            .get_movement(id)?
            .ok_or_else(|| LibroError::movement_not_found(id.to_string()))?;
        let before = movement.clone();
        movement.status = status;

        self.storage.partners.upsert_movement(movement.clone())?;
        self.storage.partners.save()?;
        self.storage.log_update(
            EntityType::PartnerMovement,
            movement.id.to_string(),
            None,
            &before,
            &movement,
        )?;
        Ok(movement)
    }

    pub fn delete_movement(&self, id: MovementId) -> LibroResult<PartnerMovement> {
        let movement = self
            .storage
            .partners
            .get_movement(id)?
            .ok_or_else(|| LibroError::movement_not_found(id.to_string()))?;

        self.storage.partners.delete_movement(id)?;
        self.storage.partners.save()?;
        self.storage.log_delete(
            EntityType::PartnerMovement,
            movement.id.to_string(),
            None,
            &movement,
        )?;
        Ok(movement)
    }

    /// Movements of one partner, or of everyone, in date order
    pub fn movements(&self, partner_id: Option<PartnerId>) -> LibroResult<Vec<PartnerMovement>> {
        match partner_id {
            Some(id) => self.storage.partners.get_movements_for(id),
            None => self.storage.partners.get_all_movements(),
        }
    }

    /// Σ(invoice + debit note) − Σ(payment + credit note)
    pub fn balance(&self, partner_id: PartnerId) -> LibroResult<Money> {
        let movements = self.storage.partners.get_movements_for(partner_id)?;
        Ok(partner_balance(&movements))
    }

    /// Movements with a running balance
    pub fn statement(&self, partner_id: PartnerId) -> LibroResult<Vec<StatementLine>> {
        let mut balance = Money::zero();
        Ok(self
            .storage
            .partners
            .get_movements_for(partner_id)?
            .into_iter()
            .map(|movement| {
                balance += movement.signed_amount();
                StatementLine { movement, balance }
            })
            .collect())
    }

    /// Pending charges past their due date
    pub fn overdue(&self, today: NaiveDate) -> LibroResult<Vec<PartnerMovement>> {
        Ok(self
            .storage
            .partners
            .get_all_movements()?
            .into_iter()
            .filter(|m| m.is_overdue(today))
            .collect())
    }

    pub fn summaries(&self, today: NaiveDate) -> LibroResult<PartnerOverview> {
        let movements = self.storage.partners.get_all_movements()?;
        let mut overview = PartnerOverview::default();

        for partner in self.storage.partners.get_all()? {
            let own: Vec<&PartnerMovement> = movements
                .iter()
                .filter(|m| m.partner_id == partner.id)
                .collect();
            let balance = partner_balance(own.iter().copied());
            let overdue: Vec<_> = own.iter().filter(|m| m.is_overdue(today)).collect();
            let overdue_amount: Money = overdue.iter().map(|m| m.amount).sum();

            if balance.is_positive() {
                match partner.kind {
                    PartnerKind::Client | PartnerKind::Both => overview.receivables += balance,
                    PartnerKind::Supplier => overview.payables += balance,
                }
            }
            overview.overdue_count += overdue.len();

            overview.partners.push(PartnerSummary {
                over_limit: partner.credit_limit.map_or(false, |limit| balance > limit),
                balance,
                overdue: overdue_amount,
                overdue_count: overdue.len(),
                partner,
            });
        }
        Ok(overview)
    }

    fn require(&self, id: PartnerId) -> LibroResult<Partner> {
        self.storage
            .partners
            .get(id)?
            .ok_or_else(|| LibroError::partner_not_found(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LibroPaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LibroPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    fn d(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, month, day).unwrap()
    }

    fn units(n: i64) -> Money {
        Money::from_units(n)
    }

    fn movement(kind: MovementKind, date: NaiveDate, amount: i64) -> NewMovement {
        NewMovement {
            kind,
            date,
            amount: units(amount),
            due_date: None,
            reference: String::new(),
            description: String::new(),
        }
    }

    #[test]
    fn test_create_rejects_duplicates() {
        let (_temp, storage) = create_test_storage();
        let service = PartnerService::new(&storage);

        service
            .create("ACME", PartnerKind::Client, PartnerDetails::default())
            .unwrap();
        let dup = service.create("acme", PartnerKind::Supplier, PartnerDetails::default());
        assert!(matches!(dup, Err(LibroError::Duplicate { .. })));
        assert!(service
            .create("  ", PartnerKind::Client, PartnerDetails::default())
            .is_err());
    }

    #[test]
    fn test_oversized_credit_days_rejected() {
        let (_temp, storage) = create_test_storage();
        let service = PartnerService::new(&storage);

        let huge = service.create(
            "ACME",
            PartnerKind::Client,
            PartnerDetails {
                credit_days: Some(200_000_000),
                ..Default::default()
            },
        );
        assert!(matches!(huge, Err(LibroError::Validation(_))));
        assert!(storage.partners.get_all().unwrap().is_empty());

        let partner = service
            .create(
                "ACME",
                PartnerKind::Client,
                PartnerDetails {
                    credit_days: Some(crate::models::partner::MAX_CREDIT_DAYS),
                    ..Default::default()
                },
            )
            .unwrap();
        let invoice = service
            .record_movement(partner.id, movement(MovementKind::Invoice, d(1, 1), 10))
            .unwrap();
        assert!(invoice.due_date.unwrap() > d(12, 31));
    }

    #[test]
    fn test_balance_and_statement() {
        let (_temp, storage) = create_test_storage();
        let service = PartnerService::new(&storage);
        let partner = service
            .create(
                "ACME",
                PartnerKind::Client,
                PartnerDetails {
                    credit_days: Some(30),
                    ..Default::default()
                },
            )
            .unwrap();

        let invoice = service
            .record_movement(partner.id, movement(MovementKind::Invoice, d(1, 1), 1000))
            .unwrap();
        assert_eq!(invoice.due_date, Some(d(1, 31)));
        assert_eq!(invoice.status, MovementStatus::Pending);

        service
            .record_movement(partner.id, movement(MovementKind::DebitNote, d(1, 5), 50))
            .unwrap();
        let payment = service
            .record_movement(partner.id, movement(MovementKind::Payment, d(1, 10), 600))
            .unwrap();
        assert_eq!(payment.status, MovementStatus::Paid);
        service
            .record_movement(partner.id, movement(MovementKind::CreditNote, d(1, 12), 100))
            .unwrap();

        assert_eq!(service.balance(partner.id).unwrap(), units(350));

        let statement = service.statement(partner.id).unwrap();
        let balances: Vec<_> = statement.iter().map(|l| l.balance).collect();
        assert_eq!(balances, vec![units(1000), units(1050), units(450), units(350)]);
    }

    #[test]
    fn test_overdue_and_summaries() {
        let (_temp, storage) = create_test_storage();
        let service = PartnerService::new(&storage);
        let client = service
            .create(
                "Client",
                PartnerKind::Client,
                PartnerDetails {
                    credit_days: Some(10),
                    credit_limit: Some(Some(units(500))),
                    ..Default::default()
                },
            )
            .unwrap();
        let supplier = service
            .create("Supplier", PartnerKind::Supplier, PartnerDetails::default())
            .unwrap();

        let invoice = service
            .record_movement(client.id, movement(MovementKind::Invoice, d(1, 1), 800))
            .unwrap();
        service
            .record_movement(supplier.id, movement(MovementKind::Invoice, d(1, 20), 300))
            .unwrap();

        let overview = service.summaries(d(1, 15)).unwrap();
        assert_eq!(overview.receivables, units(800));
        assert_eq!(overview.payables, units(300));
        assert_eq!(overview.overdue_count, 1);
        let client_summary = overview
            .partners
            .iter()
            .find(|s| s.partner.id == client.id)
            .unwrap();
        assert!(client_summary.over_limit);
        assert_eq!(client_summary.overdue, units(800));

        service.set_status(invoice.id, MovementStatus::Paid).unwrap();
        assert!(service.overdue(d(1, 15)).unwrap().is_empty());
    }

    #[test]
    fn test_delete_requires_force_with_movements() {
        let (_temp, storage) = create_test_storage();
        let service = PartnerService::new(&storage);
        let partner = service
            .create("ACME", PartnerKind::Both, PartnerDetails::default())
            .unwrap();
        service
            .record_movement(partner.id, movement(MovementKind::Invoice, d(2, 1), 10))
            .unwrap();

        assert!(service.delete(partner.id, false).unwrap_err().is_validation());
        service.delete(partner.id, true).unwrap();
        assert!(service.movements(None).unwrap().is_empty());
        assert!(service.find("ACME").unwrap_err().is_not_found());
    }

    #[test]
    fn test_list_by_kind() {
        let (_temp, storage) = create_test_storage();
        let service = PartnerService::new(&storage);
        service.create("A", PartnerKind::Client, PartnerDetails::default()).unwrap();
        service.create("B", PartnerKind::Supplier, PartnerDetails::default()).unwrap();
        service.create("C", PartnerKind::Both, PartnerDetails::default()).unwrap();

        assert_eq!(service.list(Some(PartnerKind::Client)).unwrap().len(), 2);
        assert_eq!(service.list(Some(PartnerKind::Supplier)).unwrap().len(), 2);
        assert_eq!(service.list(None).unwrap().len(), 3);
    }
}
