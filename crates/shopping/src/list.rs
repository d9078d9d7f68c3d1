use crate::item::ShoppingItem;
use chrono::{DateTime, Utc};
use culina_shared::{DomainError, DomainResult, EntityId, EntityMeta, MeasurementUnit};
use rust_decimal::Decimal;

/// Aggregate root for a shopping trip.
///
/// While the list is completed its membership is frozen: adding and
/// removing items fail until it is reopened. Purchased-state bookkeeping
/// stays available in either state.
#[derive(Debug, Clone, PartialEq)]
pub struct ShoppingList {
    meta: EntityMeta,
    name: String,
    description: Option<String>,
    completed: bool,
    completed_at: Option<DateTime<Utc>>,
    items: Vec<ShoppingItem>,
}

impl ShoppingList {
    pub fn new(name: &str, description: Option<&str>, now: DateTime<Utc>) -> DomainResult<Self> {
        let mut list = Self {
            meta: EntityMeta::new(now),
            name: String::new(),
            description: description.map(|d| d.trim().to_owned()),
            completed: false,
            completed_at: None,
            items: Vec::new(),
        };
        list.set_name(name, now)?;
        Ok(list)
    }

    pub fn id(&self) -> EntityId {
        self.meta.id()
    }

    pub fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn items(&self) -> &[ShoppingItem] {
        &self.items
    }

    pub fn item(&self, item_id: EntityId) -> Option<&ShoppingItem> {
        self.items.iter().find(|i| i.id() == item_id)
    }

    pub fn total_items(&self) -> usize {
        self.items.len()
    }

    pub fn purchased_items(&self) -> usize {
        self.items.iter().filter(|i| i.is_purchased()).count()
    }

    /// Sum of the priced items; unpriced items contribute nothing.
    pub fn total_estimated_price(&self) -> Decimal {
        self.items
            .iter()
            .filter_map(|i| i.estimated_price())
            .sum()
    }

    /// Purchased share in percent; 0 for an empty list.
    pub fn completion_percentage(&self) -> f64 {
        if self.items.is_empty() {
            return 0.0;
        }
        self.purchased_items() as f64 / self.items.len() as f64 * 100.0
    }

    pub fn set_name(&mut self, name: &str, now: DateTime<Utc>) -> DomainResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("list name must not be empty"));
        }
        self.name = name.to_owned();
        self.meta.touch(now);
        Ok(())
    }

    pub fn set_description(&mut self, description: Option<&str>, now: DateTime<Utc>) {
        self.description = description.map(|d| d.trim().to_owned());
        self.meta.touch(now);
    }

    /// Adds a line to the list. An existing unpurchased item with the same
    /// name (case-insensitive) absorbs the quantity instead of creating a
    /// duplicate; in that case only the merged item is touched.
    #[allow(clippy::too_many_arguments)]
    pub fn add_item(
        &mut self,
        name: &str,
        quantity: f64,
        unit: MeasurementUnit,
        estimated_price: Option<Decimal>,
        preferred_store: Option<&str>,
        notes: Option<&str>,
        now: DateTime<Utc>,
    ) -> DomainResult<&ShoppingItem> {
        if self.completed {
            return Err(DomainError::rule(
                "cannot add items to a completed shopping list",
            ));
        }

        let lowered = name.trim().to_lowercase();
        if let Some(pos) = self
            .items
            .iter()
            .position(|i| !i.is_purchased() && i.name().to_lowercase() == lowered)
        {
            let merged = self.items[pos].quantity() + quantity;
            self.items[pos].set_quantity(merged, now)?;
            return Ok(&self.items[pos]);
        }

        let item = ShoppingItem::new(
            name,
            quantity,
            unit,
            estimated_price,
            preferred_store,
            notes,
            now,
        )?;
        self.items.push(item);
        self.meta.touch(now);
        Ok(&self.items[self.items.len() - 1])
    }

    pub fn remove_item(&mut self, item_id: EntityId, now: DateTime<Utc>) -> DomainResult<()> {
        if self.completed {
            return Err(DomainError::rule(
                "cannot remove items from a completed shopping list",
            ));
        }
        let Some(pos) = self.items.iter().position(|i| i.id() == item_id) else {
            return Err(DomainError::rule(format!(
                "item with id {item_id} is not part of the list"
            )));
        };
        self.items.remove(pos);
        self.meta.touch(now);
        Ok(())
    }

    pub fn mark_item_purchased(
        &mut self,
        item_id: EntityId,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        let item = self.item_mut(item_id)?;
        item.mark_purchased(now);
        Ok(())
    }

    pub fn mark_item_not_purchased(
        &mut self,
        item_id: EntityId,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        let item = self.item_mut(item_id)?;
        item.mark_not_purchased(now);
        Ok(())
    }

    /// Idempotent: completing an already-completed list keeps the
    /// original completion timestamp.
    pub fn mark_completed(&mut self, now: DateTime<Utc>) {
        if self.completed {
            return;
        }
        self.completed = true;
        self.completed_at = Some(now);
        self.meta.touch(now);
    }

    pub fn reopen(&mut self, now: DateTime<Utc>) {
        self.completed = false;
        self.completed_at = None;
        self.meta.touch(now);
    }

    /// Drops every purchased item, whatever the completion state of the
    /// list itself.
    pub fn clear_purchased_items(&mut self, now: DateTime<Utc>) {
        self.items.retain(|i| !i.is_purchased());
        self.meta.touch(now);
    }

    /// Hands out identities to the list and any owned items still waiting
    /// for one. Reserved for the persistence layer.
    pub fn assign_ids(&mut self, next_id: &mut dyn FnMut() -> EntityId) {
        if !self.meta.is_persisted() {
            self.meta.assign_id(next_id());
        }
        for item in &mut self.items {
            if !item.meta().is_persisted() {
                item.assign_id(next_id());
            }
        }
    }

    fn item_mut(&mut self, item_id: EntityId) -> DomainResult<&mut ShoppingItem> {
        self.items
            .iter_mut()
            .find(|i| i.id() == item_id)
            .ok_or_else(|| {
                DomainError::rule(format!("item with id {item_id} is not part of the list"))
            })
    }
}
