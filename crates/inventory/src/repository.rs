use crate::item::InventoryItem;
use async_trait::async_trait;
use chrono::NaiveDate;
use culina_shared::{EntityId, StoreResult};

/// Persistence contract for inventory items. Expiration finders take the
/// reference date explicitly so the backend never consults a wall clock.
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    async fn get_by_id(&self, id: EntityId) -> StoreResult<Option<InventoryItem>>;
    async fn get_all(&self) -> StoreResult<Vec<InventoryItem>>;
    async fn add(&self, item: &mut InventoryItem) -> StoreResult<()>;
    async fn update(&self, item: &mut InventoryItem) -> StoreResult<()>;
    async fn delete(&self, item: &InventoryItem) -> StoreResult<()>;
    async fn exists(&self, id: EntityId) -> StoreResult<bool>;
    async fn count(&self) -> StoreResult<u64>;

    async fn get_expired(&self, today: NaiveDate) -> StoreResult<Vec<InventoryItem>>;
    async fn get_expiring_soon(
        &self,
        today: NaiveDate,
        days_threshold: i64,
    ) -> StoreResult<Vec<InventoryItem>>;
    async fn search_by_name(&self, term: &str) -> StoreResult<Vec<InventoryItem>>;
    async fn get_by_storage_location(&self, location: &str) -> StoreResult<Vec<InventoryItem>>;
    async fn get_by_name(&self, name: &str) -> StoreResult<Option<InventoryItem>>;
}
