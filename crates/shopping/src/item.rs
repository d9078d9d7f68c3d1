use chrono::{DateTime, Utc};
use culina_shared::{DomainError, DomainResult, EntityId, EntityMeta, MeasurementUnit, StockItem};
use rust_decimal::Decimal;

/// A line on a shopping list. Owned by its list; purchase toggling is
/// routed through the list so the collection never leaks mutably.
#[derive(Debug, Clone, PartialEq)]
pub struct ShoppingItem {
    meta: EntityMeta,
    stock: StockItem,
    purchased: bool,
    purchased_at: Option<DateTime<Utc>>,
    estimated_price: Option<Decimal>,
    preferred_store: Option<String>,
    notes: Option<String>,
}

impl ShoppingItem {
    pub fn new(
        name: &str,
        quantity: f64,
        unit: MeasurementUnit,
        estimated_price: Option<Decimal>,
        preferred_store: Option<&str>,
        notes: Option<&str>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let mut item = Self {
            meta: EntityMeta::new(now),
            stock: StockItem::new(name, quantity, unit)?,
            purchased: false,
            purchased_at: None,
            estimated_price: None,
            preferred_store: preferred_store.map(|s| s.trim().to_owned()),
            notes: notes.map(|n| n.trim().to_owned()),
        };
        item.set_estimated_price(estimated_price, now)?;
        Ok(item)
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

    pub fn is_purchased(&self) -> bool {
        self.purchased
    }

    pub fn purchased_at(&self) -> Option<DateTime<Utc>> {
        self.purchased_at
    }

    pub fn estimated_price(&self) -> Option<Decimal> {
        self.estimated_price
    }

    pub fn preferred_store(&self) -> Option<&str> {
        self.preferred_store.as_deref()
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
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

    /// Idempotent: marking an already-purchased item keeps the original
    /// purchase timestamp.
    pub fn mark_purchased(&mut self, now: DateTime<Utc>) {
        if self.purchased {
            return;
        }
        self.purchased = true;
        self.purchased_at = Some(now);
        self.meta.touch(now);
    }

    pub fn mark_not_purchased(&mut self, now: DateTime<Utc>) {
        self.purchased = false;
        self.purchased_at = None;
        self.meta.touch(now);
    }

    pub fn set_estimated_price(
        &mut self,
        price: Option<Decimal>,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        if let Some(price) = price {
            if price < Decimal::ZERO {
                return Err(DomainError::validation("price must not be negative"));
            }
        }
        self.estimated_price = price;
        self.meta.touch(now);
        Ok(())
    }

    pub fn set_preferred_store(&mut self, store: Option<&str>, now: DateTime<Utc>) {
        self.preferred_store = store.map(|s| s.trim().to_owned());
        self.meta.touch(now);
    }

    pub fn set_notes(&mut self, notes: Option<&str>, now: DateTime<Utc>) {
        self.notes = notes.map(|n| n.trim().to_owned());
        self.meta.touch(now);
    }

    pub(crate) fn assign_id(&mut self, id: EntityId) {
        self.meta.assign_id(id);
    }
}
