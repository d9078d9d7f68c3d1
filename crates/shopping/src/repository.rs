use crate::list::ShoppingList;
use async_trait::async_trait;
use culina_shared::{EntityId, StoreResult};

/// Persistence contract for shopping lists.
#[async_trait]
pub trait ShoppingListRepository: Send + Sync {
    async fn get_by_id(&self, id: EntityId) -> StoreResult<Option<ShoppingList>>;
    async fn get_all(&self) -> StoreResult<Vec<ShoppingList>>;
    async fn add(&self, list: &mut ShoppingList) -> StoreResult<()>;
    async fn update(&self, list: &mut ShoppingList) -> StoreResult<()>;
    async fn delete(&self, list: &ShoppingList) -> StoreResult<()>;
    async fn exists(&self, id: EntityId) -> StoreResult<bool>;
    async fn count(&self) -> StoreResult<u64>;

    async fn get_active(&self) -> StoreResult<Vec<ShoppingList>>;
    async fn get_completed(&self) -> StoreResult<Vec<ShoppingList>>;
    async fn search_by_name(&self, term: &str) -> StoreResult<Vec<ShoppingList>>;
}
