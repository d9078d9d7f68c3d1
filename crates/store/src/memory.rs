use crate::UnitOfWork;
use async_trait::async_trait;
use chrono::NaiveDate;
use culina_inventory::{InventoryItem, InventoryRepository};
use culina_recipe::{
    Category, CategoryRepository, DishType, Recipe, RecipeFilter, RecipeRepository, RecipeStatus,
};
use culina_shared::{EntityId, StoreError, StoreResult};
use culina_shopping::{ShoppingList, ShoppingListRepository};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Committed state, one map per aggregate type.
#[derive(Default, Clone)]
struct Tables {
    recipes: BTreeMap<EntityId, Recipe>,
    categories: BTreeMap<EntityId, Category>,
    inventory: BTreeMap<EntityId, InventoryItem>,
    shopping_lists: BTreeMap<EntityId, ShoppingList>,
}

/// A staged write, applied in order by `save_changes`.
enum Change {
    UpsertRecipe(Recipe),
    DeleteRecipe(EntityId),
    UpsertCategory(Category),
    DeleteCategory(EntityId),
    UpsertInventory(InventoryItem),
    DeleteInventory(EntityId),
    UpsertShoppingList(ShoppingList),
    DeleteShoppingList(EntityId),
}

#[derive(Default)]
struct Inner {
    committed: Tables,
    staged: Vec<Change>,
    snapshot: Option<Tables>,
    next_id: EntityId,
}

impl Inner {
    fn apply(&mut self, change: Change) {
        match change {
            Change::UpsertRecipe(recipe) => {
                self.committed.recipes.insert(recipe.id(), recipe);
            }
            Change::DeleteRecipe(id) => {
                // Owned ingredients live inside the aggregate, so they go
                // with it.
                self.committed.recipes.remove(&id);
            }
            Change::UpsertCategory(category) => {
                self.committed.categories.insert(category.id(), category);
            }
            Change::DeleteCategory(id) => {
                self.committed.categories.remove(&id);
                // Cascade on the association records: strip the tag from
                // every recipe. Re-using each recipe's own update
                // timestamp keeps `updated_at` where it was.
                for recipe in self.committed.recipes.values_mut() {
                    if recipe.has_category(id) {
                        let stamp = recipe.meta().updated_at();
                        recipe.remove_category(id, stamp);
                    }
                }
            }
            Change::UpsertInventory(item) => {
                self.committed.inventory.insert(item.id(), item);
            }
            Change::DeleteInventory(id) => {
                self.committed.inventory.remove(&id);
            }
            Change::UpsertShoppingList(list) => {
                self.committed.shopping_lists.insert(list.id(), list);
            }
            Change::DeleteShoppingList(id) => {
                self.committed.shopping_lists.remove(&id);
            }
        }
    }
}

type Shared = Arc<RwLock<Inner>>;

/// In-memory unit of work with staged-until-save semantics and
/// snapshot-based transactions. Reads always see committed state only.
pub struct MemoryStore {
    recipes: MemoryRecipeRepository,
    categories: MemoryCategoryRepository,
    inventory: MemoryInventoryRepository,
    shopping_lists: MemoryShoppingListRepository,
    inner: Shared,
}

impl MemoryStore {
    pub fn new() -> Self {
        let inner: Shared = Arc::new(RwLock::new(Inner::default()));
        Self {
            recipes: MemoryRecipeRepository {
                inner: inner.clone(),
            },
            categories: MemoryCategoryRepository {
                inner: inner.clone(),
            },
            inventory: MemoryInventoryRepository {
                inner: inner.clone(),
            },
            shopping_lists: MemoryShoppingListRepository {
                inner: inner.clone(),
            },
            inner,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UnitOfWork for MemoryStore {
    fn recipes(&self) -> &dyn RecipeRepository {
        &self.recipes
    }

    fn categories(&self) -> &dyn CategoryRepository {
        &self.categories
    }

    fn inventory(&self) -> &dyn InventoryRepository {
        &self.inventory
    }

    fn shopping_lists(&self) -> &dyn ShoppingListRepository {
        &self.shopping_lists
    }

    async fn save_changes(&self) -> StoreResult<u64> {
        let mut inner = self.inner.write().await;
        let staged = std::mem::take(&mut inner.staged);
        let applied = staged.len() as u64;
        for change in staged {
            inner.apply(change);
        }
        Ok(applied)
    }

    async fn begin_transaction(&self) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        if inner.snapshot.is_some() {
            return Err(StoreError::TransactionInProgress);
        }
        inner.snapshot = Some(inner.committed.clone());
        Ok(())
    }

    async fn commit_transaction(&self) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        if inner.snapshot.take().is_none() {
            return Err(StoreError::NoActiveTransaction);
        }
        Ok(())
    }

    async fn rollback_transaction(&self) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        let Some(snapshot) = inner.snapshot.take() else {
            return Err(StoreError::NoActiveTransaction);
        };
        inner.committed = snapshot;
        inner.staged.clear();
        Ok(())
    }
}

fn contains_ci(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}

#[derive(Clone)]
struct MemoryRecipeRepository {
    inner: Shared,
}

#[async_trait]
impl RecipeRepository for MemoryRecipeRepository {
    async fn get_by_id(&self, id: EntityId) -> StoreResult<Option<Recipe>> {
        Ok(self.inner.read().await.committed.recipes.get(&id).cloned())
    }

    async fn get_all(&self) -> StoreResult<Vec<Recipe>> {
        Ok(self
            .inner
            .read()
            .await
            .committed
            .recipes
            .values()
            .cloned()
            .collect())
    }

    async fn add(&self, recipe: &mut Recipe) -> StoreResult<()> {
        let mut guard = self.inner.write().await;
        let Inner {
            staged, next_id, ..
        } = &mut *guard;
        let mut next = || {
            *next_id += 1;
            *next_id
        };
        recipe.assign_ids(&mut next);
        staged.push(Change::UpsertRecipe(recipe.clone()));
        Ok(())
    }

    async fn update(&self, recipe: &mut Recipe) -> StoreResult<()> {
        let mut guard = self.inner.write().await;
        let Inner {
            staged, next_id, ..
        } = &mut *guard;
        let mut next = || {
            *next_id += 1;
            *next_id
        };
        recipe.assign_ids(&mut next);
        staged.push(Change::UpsertRecipe(recipe.clone()));
        Ok(())
    }

    async fn delete(&self, recipe: &Recipe) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        inner.staged.push(Change::DeleteRecipe(recipe.id()));
        Ok(())
    }

    async fn exists(&self, id: EntityId) -> StoreResult<bool> {
        Ok(self.inner.read().await.committed.recipes.contains_key(&id))
    }

    async fn count(&self) -> StoreResult<u64> {
        Ok(self.inner.read().await.committed.recipes.len() as u64)
    }

    async fn get_by_code(&self, code: &str) -> StoreResult<Option<Recipe>> {
        let code = code.trim().to_uppercase();
        Ok(self
            .inner
            .read()
            .await
            .committed
            .recipes
            .values()
            .find(|r| r.code() == code)
            .cloned())
    }

    async fn get_by_status(&self, status: RecipeStatus) -> StoreResult<Vec<Recipe>> {
        let inner = self.inner.read().await;
        Ok(newest_first(
            inner
                .committed
                .recipes
                .values()
                .filter(|r| r.status() == status)
                .cloned()
                .collect(),
        ))
    }

    async fn get_by_cuisine(&self, cuisine: &str) -> StoreResult<Vec<Recipe>> {
        let lowered = cuisine.trim().to_lowercase();
        let inner = self.inner.read().await;
        Ok(newest_first(
            inner
                .committed
                .recipes
                .values()
                .filter(|r| r.cuisine().to_lowercase() == lowered)
                .cloned()
                .collect(),
        ))
    }

    async fn get_by_dish_type(&self, dish_type: DishType) -> StoreResult<Vec<Recipe>> {
        let inner = self.inner.read().await;
        Ok(newest_first(
            inner
                .committed
                .recipes
                .values()
                .filter(|r| r.dish_type() == dish_type)
                .cloned()
                .collect(),
        ))
    }

    async fn get_by_category(&self, category_id: EntityId) -> StoreResult<Vec<Recipe>> {
        let inner = self.inner.read().await;
        Ok(newest_first(
            inner
                .committed
                .recipes
                .values()
                .filter(|r| r.has_category(category_id))
                .cloned()
                .collect(),
        ))
    }

    async fn search(&self, filter: &RecipeFilter) -> StoreResult<Vec<Recipe>> {
        let term = filter
            .term
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase);
        let cuisine = filter
            .cuisine
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_lowercase);

        let inner = self.inner.read().await;
        let matches = inner
            .committed
            .recipes
            .values()
            .filter(|r| {
                let Some(term) = term.as_deref() else {
                    return true;
                };
                contains_ci(r.name(), term)
                    || r.description().is_some_and(|d| contains_ci(d, term))
                    || contains_ci(r.code(), term)
            })
            .filter(|r| filter.status.is_none_or(|s| r.status() == s))
            .filter(|r| filter.dish_type.is_none_or(|d| r.dish_type() == d))
            .filter(|r| {
                cuisine
                    .as_deref()
                    .is_none_or(|c| contains_ci(r.cuisine(), c))
            })
            .cloned()
            .collect();
        Ok(newest_first(matches))
    }

    async fn cuisines(&self) -> StoreResult<Vec<String>> {
        let inner = self.inner.read().await;
        let mut cuisines: Vec<String> = inner
            .committed
            .recipes
            .values()
            .map(|r| r.cuisine().to_owned())
            .collect();
        cuisines.sort();
        cuisines.dedup();
        Ok(cuisines)
    }

    async fn code_exists(&self, code: &str, exclude_id: Option<EntityId>) -> StoreResult<bool> {
        let code = code.trim().to_uppercase();
        let inner = self.inner.read().await;
        Ok(inner
            .committed
            .recipes
            .values()
            .any(|r| r.code() == code && exclude_id != Some(r.id())))
    }
}

fn newest_first(mut recipes: Vec<Recipe>) -> Vec<Recipe> {
    recipes.sort_by_key(|r| std::cmp::Reverse(r.meta().updated_at()));
    recipes
}

#[derive(Clone)]
struct MemoryCategoryRepository {
    inner: Shared,
}

#[async_trait]
impl CategoryRepository for MemoryCategoryRepository {
    async fn get_by_id(&self, id: EntityId) -> StoreResult<Option<Category>> {
        Ok(self
            .inner
            .read()
            .await
            .committed
            .categories
            .get(&id)
            .cloned())
    }

    async fn get_all(&self) -> StoreResult<Vec<Category>> {
        Ok(self
            .inner
            .read()
            .await
            .committed
            .categories
            .values()
            .cloned()
            .collect())
    }

    async fn add(&self, category: &mut Category) -> StoreResult<()> {
        let mut guard = self.inner.write().await;
        let Inner {
            staged, next_id, ..
        } = &mut *guard;
        if !category.meta().is_persisted() {
            *next_id += 1;
            category.assign_id(*next_id);
        }
        staged.push(Change::UpsertCategory(category.clone()));
        Ok(())
    }

    async fn update(&self, category: &mut Category) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        inner.staged.push(Change::UpsertCategory(category.clone()));
        Ok(())
    }

    async fn delete(&self, category: &Category) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        inner.staged.push(Change::DeleteCategory(category.id()));
        Ok(())
    }

    async fn exists(&self, id: EntityId) -> StoreResult<bool> {
        Ok(self
            .inner
            .read()
            .await
            .committed
            .categories
            .contains_key(&id))
    }

    async fn count(&self) -> StoreResult<u64> {
        Ok(self.inner.read().await.committed.categories.len() as u64)
    }

    async fn get_by_name(&self, name: &str) -> StoreResult<Option<Category>> {
        let lowered = name.trim().to_lowercase();
        Ok(self
            .inner
            .read()
            .await
            .committed
            .categories
            .values()
            .find(|c| c.name().to_lowercase() == lowered)
            .cloned())
    }
}

#[derive(Clone)]
struct MemoryInventoryRepository {
    inner: Shared,
}

#[async_trait]
impl InventoryRepository for MemoryInventoryRepository {
    async fn get_by_id(&self, id: EntityId) -> StoreResult<Option<InventoryItem>> {
        Ok(self
            .inner
            .read()
            .await
            .committed
            .inventory
            .get(&id)
            .cloned())
    }

    async fn get_all(&self) -> StoreResult<Vec<InventoryItem>> {
        Ok(self
            .inner
            .read()
            .await
            .committed
            .inventory
            .values()
            .cloned()
            .collect())
    }

    async fn add(&self, item: &mut InventoryItem) -> StoreResult<()> {
        let mut guard = self.inner.write().await;
        let Inner {
            staged, next_id, ..
        } = &mut *guard;
        if !item.meta().is_persisted() {
            *next_id += 1;
            item.assign_id(*next_id);
        }
        staged.push(Change::UpsertInventory(item.clone()));
        Ok(())
    }

    async fn update(&self, item: &mut InventoryItem) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        inner.staged.push(Change::UpsertInventory(item.clone()));
        Ok(())
    }

    async fn delete(&self, item: &InventoryItem) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        inner.staged.push(Change::DeleteInventory(item.id()));
        Ok(())
    }

    async fn exists(&self, id: EntityId) -> StoreResult<bool> {
        Ok(self
            .inner
            .read()
            .await
            .committed
            .inventory
            .contains_key(&id))
    }

    async fn count(&self) -> StoreResult<u64> {
        Ok(self.inner.read().await.committed.inventory.len() as u64)
    }

    async fn get_expired(&self, today: NaiveDate) -> StoreResult<Vec<InventoryItem>> {
        let inner = self.inner.read().await;
        Ok(inner
            .committed
            .inventory
            .values()
            .filter(|i| i.is_expired(today))
            .cloned()
            .collect())
    }

    async fn get_expiring_soon(
        &self,
        today: NaiveDate,
        days_threshold: i64,
    ) -> StoreResult<Vec<InventoryItem>> {
        let inner = self.inner.read().await;
        let mut items: Vec<InventoryItem> = inner
            .committed
            .inventory
            .values()
            .filter(|i| !i.is_expired(today) && i.days_until_expiration(today) <= days_threshold)
            .cloned()
            .collect();
        items.sort_by_key(|i| i.expiration_date());
        Ok(items)
    }

    async fn search_by_name(&self, term: &str) -> StoreResult<Vec<InventoryItem>> {
        let lowered = term.trim().to_lowercase();
        let inner = self.inner.read().await;
        Ok(inner
            .committed
            .inventory
            .values()
            .filter(|i| contains_ci(i.name(), &lowered))
            .cloned()
            .collect())
    }

    async fn get_by_storage_location(&self, location: &str) -> StoreResult<Vec<InventoryItem>> {
        let lowered = location.trim().to_lowercase();
        let inner = self.inner.read().await;
        Ok(inner
            .committed
            .inventory
            .values()
            .filter(|i| {
                i.storage_location()
                    .is_some_and(|l| l.to_lowercase() == lowered)
            })
            .cloned()
            .collect())
    }

    async fn get_by_name(&self, name: &str) -> StoreResult<Option<InventoryItem>> {
        let lowered = name.trim().to_lowercase();
        Ok(self
            .inner
            .read()
            .await
            .committed
            .inventory
            .values()
            .find(|i| i.name().to_lowercase() == lowered)
            .cloned())
    }
}

#[derive(Clone)]
struct MemoryShoppingListRepository {
    inner: Shared,
}

#[async_trait]
impl ShoppingListRepository for MemoryShoppingListRepository {
    async fn get_by_id(&self, id: EntityId) -> StoreResult<Option<ShoppingList>> {
        Ok(self
            .inner
            .read()
            .await
            .committed
            .shopping_lists
            .get(&id)
            .cloned())
    }

    async fn get_all(&self) -> StoreResult<Vec<ShoppingList>> {
        Ok(self
            .inner
            .read()
            .await
            .committed
            .shopping_lists
            .values()
            .cloned()
            .collect())
    }

    async fn add(&self, list: &mut ShoppingList) -> StoreResult<()> {
        let mut guard = self.inner.write().await;
        let Inner {
            staged, next_id, ..
        } = &mut *guard;
        let mut next = || {
            *next_id += 1;
            *next_id
        };
        list.assign_ids(&mut next);
        staged.push(Change::UpsertShoppingList(list.clone()));
        Ok(())
    }

    async fn update(&self, list: &mut ShoppingList) -> StoreResult<()> {
        let mut guard = self.inner.write().await;
        let Inner {
            staged, next_id, ..
        } = &mut *guard;
        let mut next = || {
            *next_id += 1;
            *next_id
        };
        list.assign_ids(&mut next);
        staged.push(Change::UpsertShoppingList(list.clone()));
        Ok(())
    }

    async fn delete(&self, list: &ShoppingList) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        inner.staged.push(Change::DeleteShoppingList(list.id()));
        Ok(())
    }

    async fn exists(&self, id: EntityId) -> StoreResult<bool> {
        Ok(self
            .inner
            .read()
            .await
            .committed
            .shopping_lists
            .contains_key(&id))
    }

    async fn count(&self) -> StoreResult<u64> {
        Ok(self.inner.read().await.committed.shopping_lists.len() as u64)
    }

    async fn get_active(&self) -> StoreResult<Vec<ShoppingList>> {
        let inner = self.inner.read().await;
        Ok(inner
            .committed
            .shopping_lists
            .values()
            .filter(|l| !l.is_completed())
            .cloned()
            .collect())
    }

    async fn get_completed(&self) -> StoreResult<Vec<ShoppingList>> {
        let inner = self.inner.read().await;
        Ok(inner
            .committed
            .shopping_lists
            .values()
            .filter(|l| l.is_completed())
            .cloned()
            .collect())
    }

    async fn search_by_name(&self, term: &str) -> StoreResult<Vec<ShoppingList>> {
        let lowered = term.trim().to_lowercase();
        let inner = self.inner.read().await;
        Ok(inner
            .committed
            .shopping_lists
            .values()
            .filter(|l| contains_ci(l.name(), &lowered))
            .cloned()
            .collect())
    }
}
