use crate::dto::{CreateInventoryItemInput, InventoryItemDto, UpdateInventoryItemInput};
use crate::error::{AppError, AppResult};
use culina_inventory::{EXPIRING_SOON_DAYS, InventoryItem};
use culina_shared::{Clock, EntityId};
use culina_store::UnitOfWork;
use std::sync::Arc;
use validator::Validate;

/// Inventory CRUD plus the use/replenish stock arithmetic. Every derived
/// expiration value in the returned DTOs is computed against the clock's
/// current date.
pub struct InventoryService {
    uow: Arc<dyn UnitOfWork>,
    clock: Arc<dyn Clock>,
}

impl InventoryService {
    pub fn new(uow: Arc<dyn UnitOfWork>, clock: Arc<dyn Clock>) -> Self {
        Self { uow, clock }
    }

    pub async fn get(&self, id: EntityId) -> AppResult<Option<InventoryItemDto>> {
        let today = self.clock.today();
        Ok(self
            .uow
            .inventory()
            .get_by_id(id)
            .await?
            .map(|item| InventoryItemDto::from_entity(&item, today)))
    }

    pub async fn list(&self) -> AppResult<Vec<InventoryItemDto>> {
        let today = self.clock.today();
        let items = self.uow.inventory().get_all().await?;
        Ok(items
            .iter()
            .map(|item| InventoryItemDto::from_entity(item, today))
            .collect())
    }

    pub async fn expired(&self) -> AppResult<Vec<InventoryItemDto>> {
        let today = self.clock.today();
        let items = self.uow.inventory().get_expired(today).await?;
        Ok(items
            .iter()
            .map(|item| InventoryItemDto::from_entity(item, today))
            .collect())
    }

    pub async fn expiring_soon(&self) -> AppResult<Vec<InventoryItemDto>> {
        let today = self.clock.today();
        let items = self
            .uow
            .inventory()
            .get_expiring_soon(today, EXPIRING_SOON_DAYS)
            .await?;
        Ok(items
            .iter()
            .map(|item| InventoryItemDto::from_entity(item, today))
            .collect())
    }

    pub async fn search(&self, term: &str) -> AppResult<Vec<InventoryItemDto>> {
        let today = self.clock.today();
        let items = self.uow.inventory().search_by_name(term).await?;
        Ok(items
            .iter()
            .map(|item| InventoryItemDto::from_entity(item, today))
            .collect())
    }

    pub async fn by_storage_location(&self, location: &str) -> AppResult<Vec<InventoryItemDto>> {
        let today = self.clock.today();
        let items = self
            .uow
            .inventory()
            .get_by_storage_location(location)
            .await?;
        Ok(items
            .iter()
            .map(|item| InventoryItemDto::from_entity(item, today))
            .collect())
    }

    pub async fn create(&self, input: CreateInventoryItemInput) -> AppResult<InventoryItemDto> {
        tracing::info!(name = %input.name, "adding inventory item");
        input.validate()?;

        let now = self.clock.now_utc();
        let mut item = InventoryItem::new(
            &input.name,
            input.quantity,
            input.unit,
            input.expiration_date,
            now,
        )?;
        if input.storage_location.is_some() {
            item.set_storage_location(input.storage_location.as_deref(), now);
        }

        self.uow.inventory().add(&mut item).await?;
        self.uow.save_changes().await?;

        tracing::info!(id = item.id(), "inventory item added");
        Ok(InventoryItemDto::from_entity(&item, self.clock.today()))
    }

    pub async fn update(&self, input: UpdateInventoryItemInput) -> AppResult<InventoryItemDto> {
        tracing::info!(id = input.id, "updating inventory item");
        input.validate()?;

        let mut item = self.require(input.id).await?;
        let now = self.clock.now_utc();
        item.set_name(&input.name, now)?;
        item.set_quantity(input.quantity, now)?;
        item.set_unit(input.unit, now);
        item.set_expiration_date(input.expiration_date, now);
        item.set_storage_location(input.storage_location.as_deref(), now);

        self.uow.inventory().update(&mut item).await?;
        self.uow.save_changes().await?;

        Ok(InventoryItemDto::from_entity(&item, self.clock.today()))
    }

    /// Takes stock out of an item; fails with the insufficient-stock rule
    /// error when the pantry does not hold enough.
    pub async fn consume(&self, id: EntityId, amount: f64) -> AppResult<InventoryItemDto> {
        tracing::info!(id, amount, "consuming inventory item");
        let mut item = self.require(id).await?;
        item.consume(amount, self.clock.now_utc())?;

        self.uow.inventory().update(&mut item).await?;
        self.uow.save_changes().await?;

        Ok(InventoryItemDto::from_entity(&item, self.clock.today()))
    }

    pub async fn replenish(&self, id: EntityId, amount: f64) -> AppResult<InventoryItemDto> {
        tracing::info!(id, amount, "replenishing inventory item");
        let mut item = self.require(id).await?;
        item.replenish(amount, self.clock.now_utc())?;

        self.uow.inventory().update(&mut item).await?;
        self.uow.save_changes().await?;

        Ok(InventoryItemDto::from_entity(&item, self.clock.today()))
    }

    pub async fn delete(&self, id: EntityId) -> AppResult<()> {
        tracing::info!(id, "deleting inventory item");
        let item = self.require(id).await?;
        self.uow.inventory().delete(&item).await?;
        self.uow.save_changes().await?;
        Ok(())
    }

    async fn require(&self, id: EntityId) -> AppResult<InventoryItem> {
        self.uow
            .inventory()
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("inventory item with id {id} not found")))
    }
}
