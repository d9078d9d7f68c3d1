use crate::dto::{CreateShoppingListInput, ShoppingItemInput, ShoppingListDto, ShoppingListSummaryDto};
use crate::error::{AppError, AppResult};
use culina_shared::{Clock, EntityId};
use culina_shopping::ShoppingList;
use culina_store::UnitOfWork;
use std::sync::Arc;
use validator::Validate;

/// Shopping list CRUD, item membership and purchase bookkeeping.
pub struct ShoppingListService {
    uow: Arc<dyn UnitOfWork>,
    clock: Arc<dyn Clock>,
}

impl ShoppingListService {
    pub fn new(uow: Arc<dyn UnitOfWork>, clock: Arc<dyn Clock>) -> Self {
        Self { uow, clock }
    }

    pub async fn get(&self, id: EntityId) -> AppResult<Option<ShoppingListDto>> {
        Ok(self
            .uow
            .shopping_lists()
            .get_by_id(id)
            .await?
            .map(|list| ShoppingListDto::from_entity(&list)))
    }

    pub async fn list(&self) -> AppResult<Vec<ShoppingListSummaryDto>> {
        let lists = self.uow.shopping_lists().get_all().await?;
        Ok(lists.iter().map(ShoppingListSummaryDto::from_entity).collect())
    }

    pub async fn active(&self) -> AppResult<Vec<ShoppingListSummaryDto>> {
        let lists = self.uow.shopping_lists().get_active().await?;
        Ok(lists.iter().map(ShoppingListSummaryDto::from_entity).collect())
    }

    pub async fn completed(&self) -> AppResult<Vec<ShoppingListSummaryDto>> {
        let lists = self.uow.shopping_lists().get_completed().await?;
        Ok(lists.iter().map(ShoppingListSummaryDto::from_entity).collect())
    }

    pub async fn create(&self, input: CreateShoppingListInput) -> AppResult<ShoppingListDto> {
        tracing::info!(name = %input.name, "creating shopping list");
        input.validate()?;

        let now = self.clock.now_utc();
        let mut list = ShoppingList::new(&input.name, input.description.as_deref(), now)?;

        self.uow.shopping_lists().add(&mut list).await?;
        self.uow.save_changes().await?;

        tracing::info!(id = list.id(), "shopping list created");
        Ok(ShoppingListDto::from_entity(&list))
    }

    pub async fn update(
        &self,
        id: EntityId,
        input: CreateShoppingListInput,
    ) -> AppResult<ShoppingListDto> {
        tracing::info!(id, "updating shopping list");
        input.validate()?;

        let mut list = self.require(id).await?;
        let now = self.clock.now_utc();
        list.set_name(&input.name, now)?;
        list.set_description(input.description.as_deref(), now);

        self.uow.shopping_lists().update(&mut list).await?;
        self.uow.save_changes().await?;

        Ok(ShoppingListDto::from_entity(&list))
    }

    pub async fn delete(&self, id: EntityId) -> AppResult<()> {
        tracing::info!(id, "deleting shopping list");
        let list = self.require(id).await?;
        self.uow.shopping_lists().delete(&list).await?;
        self.uow.save_changes().await?;
        Ok(())
    }

    /// Adds a line to the list; a same-named unpurchased line absorbs the
    /// quantity instead (the aggregate decides which).
    pub async fn add_item(
        &self,
        list_id: EntityId,
        input: ShoppingItemInput,
    ) -> AppResult<ShoppingListDto> {
        tracing::info!(list_id, item = %input.name, "adding shopping item");
        input.validate()?;

        let mut list = self.require(list_id).await?;
        list.add_item(
            &input.name,
            input.quantity,
            input.unit,
            input.estimated_price,
            input.preferred_store.as_deref(),
            input.notes.as_deref(),
            self.clock.now_utc(),
        )?;

        self.uow.shopping_lists().update(&mut list).await?;
        self.uow.save_changes().await?;
        Ok(ShoppingListDto::from_entity(&list))
    }

    pub async fn remove_item(
        &self,
        list_id: EntityId,
        item_id: EntityId,
    ) -> AppResult<ShoppingListDto> {
        tracing::info!(list_id, item_id, "removing shopping item");
        let mut list = self.require(list_id).await?;
        list.remove_item(item_id, self.clock.now_utc())?;

        self.uow.shopping_lists().update(&mut list).await?;
        self.uow.save_changes().await?;
        Ok(ShoppingListDto::from_entity(&list))
    }

    pub async fn mark_item_purchased(
        &self,
        list_id: EntityId,
        item_id: EntityId,
    ) -> AppResult<ShoppingListDto> {
        tracing::info!(list_id, item_id, "marking item purchased");
        let mut list = self.require(list_id).await?;
        list.mark_item_purchased(item_id, self.clock.now_utc())?;

        self.uow.shopping_lists().update(&mut list).await?;
        self.uow.save_changes().await?;
        Ok(ShoppingListDto::from_entity(&list))
    }

    pub async fn mark_item_not_purchased(
        &self,
        list_id: EntityId,
        item_id: EntityId,
    ) -> AppResult<ShoppingListDto> {
        tracing::info!(list_id, item_id, "marking item not purchased");
        let mut list = self.require(list_id).await?;
        list.mark_item_not_purchased(item_id, self.clock.now_utc())?;

        self.uow.shopping_lists().update(&mut list).await?;
        self.uow.save_changes().await?;
        Ok(ShoppingListDto::from_entity(&list))
    }

    pub async fn complete(&self, id: EntityId) -> AppResult<ShoppingListDto> {
        tracing::info!(id, "completing shopping list");
        let mut list = self.require(id).await?;
        list.mark_completed(self.clock.now_utc());

        self.uow.shopping_lists().update(&mut list).await?;
        self.uow.save_changes().await?;
        Ok(ShoppingListDto::from_entity(&list))
    }

    pub async fn reopen(&self, id: EntityId) -> AppResult<ShoppingListDto> {
        tracing::info!(id, "reopening shopping list");
        let mut list = self.require(id).await?;
        list.reopen(self.clock.now_utc());

        self.uow.shopping_lists().update(&mut list).await?;
        self.uow.save_changes().await?;
        Ok(ShoppingListDto::from_entity(&list))
    }

    pub async fn clear_purchased_items(&self, id: EntityId) -> AppResult<ShoppingListDto> {
        tracing::info!(id, "clearing purchased items");
        let mut list = self.require(id).await?;
        list.clear_purchased_items(self.clock.now_utc());

        self.uow.shopping_lists().update(&mut list).await?;
        self.uow.save_changes().await?;
        Ok(ShoppingListDto::from_entity(&list))
    }

    async fn require(&self, id: EntityId) -> AppResult<ShoppingList> {
        self.uow
            .shopping_lists()
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("shopping list with id {id} not found")))
    }
}
