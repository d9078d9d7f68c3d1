use chrono::{DateTime, NaiveDate, Utc};
use culina_shared::{DomainError, DomainResult, EntityId, EntityMeta, MeasurementUnit, StockItem};

/// Items expiring within this many days count as "expiring soon".
pub const EXPIRING_SOON_DAYS: i64 = 3;

/// A stocked product with an expiration date.
///
/// The expiration flags are derived from a caller-supplied `today` on
/// every read. Nothing time-dependent is stored, so the same item
/// answers differently as the calendar moves.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryItem {
    meta: EntityMeta,
    stock: StockItem,
    expiration_date: NaiveDate,
    storage_location: Option<String>,
}

impl InventoryItem {
    pub fn new(
        name: &str,
        quantity: f64,
        unit: MeasurementUnit,
        expiration_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        Ok(Self {
            meta: EntityMeta::new(now),
            stock: StockItem::new(name, quantity, unit)?,
            expiration_date,
            storage_location: None,
        })
    }

    pub fn id(&self) -> EntityId {
        self.meta.id()
    }

    pub fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    pub fn name(&self) -> &str {
        self.stock.name()
    }

    pub fn quantity(&self) -> f64 {
        self.stock.quantity()
    }

    pub fn unit(&self) -> MeasurementUnit {
        self.stock.unit()
    }

    pub fn expiration_date(&self) -> NaiveDate {
        self.expiration_date
    }

    pub fn storage_location(&self) -> Option<&str> {
        self.storage_location.as_deref()
    }

    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiration_date < today
    }

    pub fn is_expiring_soon(&self, today: NaiveDate) -> bool {
        !self.is_expired(today) && self.days_until_expiration(today) <= EXPIRING_SOON_DAYS
    }

    /// Signed day count until expiration; negative once expired.
    pub fn days_until_expiration(&self, today: NaiveDate) -> i64 {
        self.expiration_date.signed_duration_since(today).num_days()
    }

    pub fn set_name(&mut self, name: &str, now: DateTime<Utc>) -> DomainResult<()> {
        self.stock.set_name(name)?;
        self.meta.touch(now);
        Ok(())
    }

    pub fn set_quantity(&mut self, quantity: f64, now: DateTime<Utc>) -> DomainResult<()> {
        self.stock.set_quantity(quantity)?;
        self.meta.touch(now);
        Ok(())
    }

    pub fn set_unit(&mut self, unit: MeasurementUnit, now: DateTime<Utc>) {
        self.stock.set_unit(unit);
        self.meta.touch(now);
    }

    pub fn set_expiration_date(&mut self, expiration_date: NaiveDate, now: DateTime<Utc>) {
        self.expiration_date = expiration_date;
        self.meta.touch(now);
    }

    pub fn set_storage_location(&mut self, location: Option<&str>, now: DateTime<Utc>) {
        self.storage_location = location.map(|l| l.trim().to_owned());
        self.meta.touch(now);
    }

    /// Takes `amount` out of stock. Fails without touching the quantity
    /// when the amount is non-positive or exceeds what is available.
    pub fn consume(&mut self, amount: f64, now: DateTime<Utc>) -> DomainResult<()> {
        if amount <= 0.0 {
            return Err(DomainError::validation("amount must be positive"));
        }
        let available = self.stock.quantity();
        if amount > available {
            return Err(DomainError::InsufficientStock {
                available,
                requested: amount,
            });
        }
        self.stock.set_quantity(available - amount)?;
        self.meta.touch(now);
        Ok(())
    }

    /// Puts `amount` back into stock.
    pub fn replenish(&mut self, amount: f64, now: DateTime<Utc>) -> DomainResult<()> {
        if amount <= 0.0 {
            return Err(DomainError::validation("amount must be positive"));
        }
        self.stock.set_quantity(self.stock.quantity() + amount)?;
        self.meta.touch(now);
        Ok(())
    }

    pub fn assign_id(&mut self, id: EntityId) {
        self.meta.assign_id(id);
    }
}
