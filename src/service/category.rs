use crate::dto::{CategoryDto, CategoryInput};
use crate::error::{AppError, AppResult};
use culina_recipe::Category;
use culina_shared::{Clock, EntityId};
use culina_store::UnitOfWork;
use std::sync::Arc;
use validator::Validate;

/// Category CRUD. Name uniqueness needs a look across all categories, so
/// it is checked here rather than inside the entity.
pub struct CategoryService {
    uow: Arc<dyn UnitOfWork>,
    clock: Arc<dyn Clock>,
}

impl CategoryService {
    pub fn new(uow: Arc<dyn UnitOfWork>, clock: Arc<dyn Clock>) -> Self {
        Self { uow, clock }
    }

    pub async fn get(&self, id: EntityId) -> AppResult<Option<CategoryDto>> {
        let Some(category) = self.uow.categories().get_by_id(id).await? else {
            return Ok(None);
        };
        let count = self.recipe_count(id).await?;
        Ok(Some(CategoryDto::from_entity(&category, Some(count))))
    }

    pub async fn list(&self) -> AppResult<Vec<CategoryDto>> {
        let categories = self.uow.categories().get_all().await?;
        let mut dtos = Vec::with_capacity(categories.len());
        for category in &categories {
            let count = self.recipe_count(category.id()).await?;
            dtos.push(CategoryDto::from_entity(category, Some(count)));
        }
        Ok(dtos)
    }

    pub async fn create(&self, input: CategoryInput) -> AppResult<CategoryDto> {
        tracing::info!(name = %input.name, "creating category");
        input.validate()?;

        if self
            .uow
            .categories()
            .get_by_name(&input.name)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(format!(
                "category '{}' already exists",
                input.name
            )));
        }

        let now = self.clock.now_utc();
        let mut category = Category::new(&input.name, now)?;
        category.set_description(input.description.as_deref(), now);
        category.set_icon_name(input.icon_name.as_deref(), now);

        self.uow.categories().add(&mut category).await?;
        self.uow.save_changes().await?;

        tracing::info!(id = category.id(), "category created");
        Ok(CategoryDto::from_entity(&category, Some(0)))
    }

    pub async fn update(&self, id: EntityId, input: CategoryInput) -> AppResult<CategoryDto> {
        tracing::info!(id, "updating category");
        input.validate()?;

        let mut category = self.require(id).await?;
        if let Some(existing) = self.uow.categories().get_by_name(&input.name).await?
            && existing.id() != id
        {
            return Err(AppError::conflict(format!(
                "category '{}' already exists",
                input.name
            )));
        }

        let now = self.clock.now_utc();
        category.set_name(&input.name, now)?;
        category.set_description(input.description.as_deref(), now);
        category.set_icon_name(input.icon_name.as_deref(), now);

        self.uow.categories().update(&mut category).await?;
        self.uow.save_changes().await?;

        let count = self.recipe_count(id).await?;
        Ok(CategoryDto::from_entity(&category, Some(count)))
    }

    /// Deleting a category also strips its assignment from every recipe;
    /// the store applies that cascade at commit time.
    pub async fn delete(&self, id: EntityId) -> AppResult<()> {
        tracing::info!(id, "deleting category");
        let category = self.require(id).await?;
        self.uow.categories().delete(&category).await?;
        self.uow.save_changes().await?;
        Ok(())
    }

    async fn require(&self, id: EntityId) -> AppResult<Category> {
        self.uow
            .categories()
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("category with id {id} not found")))
    }

    async fn recipe_count(&self, id: EntityId) -> AppResult<u64> {
        Ok(self.uow.recipes().get_by_category(id).await?.len() as u64)
    }
}
