use crate::dto::{DashboardDto, InventoryItemDto, RecipeListItemDto, ShoppingListSummaryDto};
use crate::error::AppResult;
use culina_inventory::EXPIRING_SOON_DAYS;
use culina_recipe::RecipeStatus;
use culina_shared::Clock;
use culina_store::UnitOfWork;
use std::sync::Arc;

const HIGHLIGHT_LIMIT: usize = 5;

/// Read-only aggregation across every aggregate for the overview screen.
pub struct DashboardService {
    uow: Arc<dyn UnitOfWork>,
    clock: Arc<dyn Clock>,
}

impl DashboardService {
    pub fn new(uow: Arc<dyn UnitOfWork>, clock: Arc<dyn Clock>) -> Self {
        Self { uow, clock }
    }

    pub async fn summary(&self) -> AppResult<DashboardDto> {
        tracing::debug!("building dashboard summary");
        let today = self.clock.today();

        let recipes = self.uow.recipes().get_all().await?;
        let inventory = self.uow.inventory().get_all().await?;
        let active_lists = self.uow.shopping_lists().get_active().await?;
        let total_categories = self.uow.categories().count().await?;
        let expiring = self
            .uow
            .inventory()
            .get_expiring_soon(today, EXPIRING_SOON_DAYS)
            .await?;

        let mut recent = recipes.clone();
        recent.sort_by_key(|r| std::cmp::Reverse(r.meta().created_at()));

        Ok(DashboardDto {
            total_recipes: recipes.len(),
            published_recipes: recipes
                .iter()
                .filter(|r| r.status() == RecipeStatus::Published)
                .count(),
            draft_recipes: recipes
                .iter()
                .filter(|r| r.status() == RecipeStatus::Draft)
                .count(),
            archived_recipes: recipes
                .iter()
                .filter(|r| r.status() == RecipeStatus::Archived)
                .count(),
            total_inventory_items: inventory.len(),
            expired_items: inventory.iter().filter(|i| i.is_expired(today)).count(),
            expiring_soon_items: inventory
                .iter()
                .filter(|i| i.is_expiring_soon(today))
                .count(),
            active_shopping_lists: active_lists.len(),
            total_categories,
            recent_recipes: recent
                .iter()
                .take(HIGHLIGHT_LIMIT)
                .map(RecipeListItemDto::from_entity)
                .collect(),
            expiring_items: expiring
                .iter()
                .take(HIGHLIGHT_LIMIT)
                .map(|i| InventoryItemDto::from_entity(i, today))
                .collect(),
            active_lists: active_lists
                .iter()
                .take(HIGHLIGHT_LIMIT)
                .map(ShoppingListSummaryDto::from_entity)
                .collect(),
        })
    }
}
