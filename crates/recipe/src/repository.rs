use crate::aggregate::Recipe;
use crate::category::Category;
use crate::types::{DishType, RecipeStatus};
use async_trait::async_trait;
use culina_shared::{EntityId, StoreResult};

/// Optional filters for a recipe search. A blank term matches everything.
#[derive(Debug, Default, Clone)]
pub struct RecipeFilter {
    pub term: Option<String>,
    pub status: Option<RecipeStatus>,
    pub dish_type: Option<DishType>,
    pub cuisine: Option<String>,
}

/// Persistence contract for recipes. `add` and `update` take the
/// aggregate mutably so the backend can hand out identities to the recipe
/// and its unsaved ingredients when the change is staged; nothing is
/// durable until the unit-of-work's `save_changes`.
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    async fn get_by_id(&self, id: EntityId) -> StoreResult<Option<Recipe>>;
    async fn get_all(&self) -> StoreResult<Vec<Recipe>>;
    async fn add(&self, recipe: &mut Recipe) -> StoreResult<()>;
    async fn update(&self, recipe: &mut Recipe) -> StoreResult<()>;
    async fn delete(&self, recipe: &Recipe) -> StoreResult<()>;
    async fn exists(&self, id: EntityId) -> StoreResult<bool>;
    async fn count(&self) -> StoreResult<u64>;

    /// Looks a recipe up by its business code, matching the stored
    /// upper-cased form.
    async fn get_by_code(&self, code: &str) -> StoreResult<Option<Recipe>>;
    async fn get_by_status(&self, status: RecipeStatus) -> StoreResult<Vec<Recipe>>;
    async fn get_by_cuisine(&self, cuisine: &str) -> StoreResult<Vec<Recipe>>;
    async fn get_by_dish_type(&self, dish_type: DishType) -> StoreResult<Vec<Recipe>>;
    async fn get_by_category(&self, category_id: EntityId) -> StoreResult<Vec<Recipe>>;
    async fn search(&self, filter: &RecipeFilter) -> StoreResult<Vec<Recipe>>;

    /// Distinct cuisines across all recipes, sorted.
    async fn cuisines(&self) -> StoreResult<Vec<String>>;

    /// Uniqueness pre-check for the service layer; `exclude_id` skips the
    /// recipe being renamed.
    async fn code_exists(&self, code: &str, exclude_id: Option<EntityId>) -> StoreResult<bool>;
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn get_by_id(&self, id: EntityId) -> StoreResult<Option<Category>>;
    async fn get_all(&self) -> StoreResult<Vec<Category>>;
    async fn add(&self, category: &mut Category) -> StoreResult<()>;
    async fn update(&self, category: &mut Category) -> StoreResult<()>;
    async fn delete(&self, category: &Category) -> StoreResult<()>;
    async fn exists(&self, id: EntityId) -> StoreResult<bool>;
    async fn count(&self) -> StoreResult<u64>;

    /// Case-insensitive name lookup, used for the uniqueness pre-check.
    async fn get_by_name(&self, name: &str) -> StoreResult<Option<Category>>;
}
