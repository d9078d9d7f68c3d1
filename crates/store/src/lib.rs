//! Persistence boundary: the unit-of-work contract the application layer
//! drives, and an in-memory staged-commit backend for tests and the demo
//! binary.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use culina_inventory::InventoryRepository;
use culina_recipe::{CategoryRepository, RecipeRepository};
use culina_shared::StoreResult;
use culina_shopping::ShoppingListRepository;

/// One repository per aggregate plus transactional scoping.
///
/// Repository `add`/`update`/`delete` calls only stage changes;
/// `save_changes` applies the staged set atomically. `begin_transaction`
/// widens the scope across several saves for multi-aggregate use cases,
/// and `rollback_transaction` restores the state seen at `begin`.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn recipes(&self) -> &dyn RecipeRepository;
    fn categories(&self) -> &dyn CategoryRepository;
    fn inventory(&self) -> &dyn InventoryRepository;
    fn shopping_lists(&self) -> &dyn ShoppingListRepository;

    /// Applies every staged change, returning how many were applied.
    async fn save_changes(&self) -> StoreResult<u64>;

    async fn begin_transaction(&self) -> StoreResult<()>;
    async fn commit_transaction(&self) -> StoreResult<()>;
    async fn rollback_transaction(&self) -> StoreResult<()>;
}
