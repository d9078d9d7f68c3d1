use crate::dto::{CategoryDto, CreateRecipeInput, IngredientInput, RecipeDto, RecipeListItemDto, UpdateRecipeInput};
use crate::error::{AppError, AppResult};
use culina_recipe::{Recipe, RecipeFilter};
use culina_shared::{Clock, DomainError, EntityId};
use culina_store::UnitOfWork;
use std::sync::Arc;
use validator::Validate;

/// Orchestrates the recipe workflow: CRUD, the publish/archive lifecycle,
/// ingredient edits and category tagging. Code uniqueness is checked here
/// because it spans sibling aggregates.
pub struct RecipeService {
    uow: Arc<dyn UnitOfWork>,
    clock: Arc<dyn Clock>,
}

impl RecipeService {
    pub fn new(uow: Arc<dyn UnitOfWork>, clock: Arc<dyn Clock>) -> Self {
        Self { uow, clock }
    }

    pub async fn get(&self, id: EntityId) -> AppResult<Option<RecipeDto>> {
        let Some(recipe) = self.uow.recipes().get_by_id(id).await? else {
            return Ok(None);
        };
        Ok(Some(self.to_dto(&recipe).await?))
    }

    pub async fn get_by_code(&self, code: &str) -> AppResult<Option<RecipeDto>> {
        let Some(recipe) = self.uow.recipes().get_by_code(code).await? else {
            return Ok(None);
        };
        Ok(Some(self.to_dto(&recipe).await?))
    }

    pub async fn list(&self) -> AppResult<Vec<RecipeListItemDto>> {
        let recipes = self.uow.recipes().get_all().await?;
        Ok(recipes.iter().map(RecipeListItemDto::from_entity).collect())
    }

    pub async fn search(&self, filter: &RecipeFilter) -> AppResult<Vec<RecipeListItemDto>> {
        let recipes = self.uow.recipes().search(filter).await?;
        Ok(recipes.iter().map(RecipeListItemDto::from_entity).collect())
    }

    pub async fn cuisines(&self) -> AppResult<Vec<String>> {
        Ok(self.uow.recipes().cuisines().await?)
    }

    pub async fn create(&self, input: CreateRecipeInput) -> AppResult<RecipeDto> {
        tracing::info!(name = %input.name, "creating recipe");
        input.validate()?;

        if self.uow.recipes().code_exists(&input.code, None).await? {
            return Err(AppError::conflict(format!(
                "recipe with code '{}' already exists",
                input.code
            )));
        }

        let now = self.clock.now_utc();
        let mut recipe = Recipe::new(
            &input.code,
            &input.name,
            &input.cuisine,
            input.dish_type,
            input.cooking_time_minutes,
            input.servings,
            now,
        )?;
        recipe.set_description(input.description.as_deref(), now);
        recipe.set_instructions(input.instructions.as_deref(), now);
        if let Some(image_path) = input.image_path.as_deref()
            && !image_path.trim().is_empty()
        {
            recipe.set_image_path(Some(image_path), now);
        }

        self.uow.recipes().add(&mut recipe).await?;
        self.uow.save_changes().await?;

        tracing::info!(id = recipe.id(), code = %recipe.code(), "recipe created");
        self.to_dto(&recipe).await
    }

    pub async fn update(&self, input: UpdateRecipeInput) -> AppResult<RecipeDto> {
        tracing::info!(id = input.id, "updating recipe");
        input.validate()?;

        let mut recipe = self.require(input.id).await?;
        if !recipe.can_edit() {
            return Err(AppError::Domain(DomainError::rule(
                "cannot edit a published or archived recipe, return it to draft first",
            )));
        }
        if self
            .uow
            .recipes()
            .code_exists(&input.code, Some(input.id))
            .await?
        {
            return Err(AppError::conflict(format!(
                "recipe with code '{}' already exists",
                input.code
            )));
        }

        let now = self.clock.now_utc();
        recipe.set_code(&input.code, now)?;
        recipe.set_name(&input.name, now)?;
        recipe.set_cuisine(&input.cuisine, now)?;
        recipe.set_dish_type(input.dish_type, now);
        recipe.set_cooking_time(input.cooking_time_minutes, now)?;
        recipe.set_servings(input.servings, now)?;
        recipe.set_description(input.description.as_deref(), now);
        recipe.set_instructions(input.instructions.as_deref(), now);
        recipe.set_image_path(input.image_path.as_deref(), now);

        self.uow.recipes().update(&mut recipe).await?;
        self.uow.save_changes().await?;

        self.to_dto(&recipe).await
    }

    pub async fn delete(&self, id: EntityId) -> AppResult<()> {
        tracing::info!(id, "deleting recipe");
        let recipe = self.require(id).await?;
        self.uow.recipes().delete(&recipe).await?;
        self.uow.save_changes().await?;
        Ok(())
    }

    pub async fn publish(&self, id: EntityId) -> AppResult<RecipeDto> {
        tracing::info!(id, "publishing recipe");
        self.workflow(id, |recipe, now| recipe.publish(now)).await
    }

    pub async fn archive(&self, id: EntityId) -> AppResult<RecipeDto> {
        tracing::info!(id, "archiving recipe");
        self.workflow(id, |recipe, now| recipe.archive(now)).await
    }

    pub async fn restore(&self, id: EntityId) -> AppResult<RecipeDto> {
        tracing::info!(id, "restoring recipe");
        self.workflow(id, |recipe, now| recipe.restore(now)).await
    }

    pub async fn return_to_draft(&self, id: EntityId) -> AppResult<RecipeDto> {
        tracing::info!(id, "returning recipe to draft");
        self.workflow(id, |recipe, now| recipe.return_to_draft(now))
            .await
    }

    pub async fn add_ingredient(
        &self,
        recipe_id: EntityId,
        input: IngredientInput,
    ) -> AppResult<RecipeDto> {
        tracing::info!(recipe_id, ingredient = %input.name, "adding ingredient");
        input.validate()?;

        let mut recipe = self.require(recipe_id).await?;
        let now = self.clock.now_utc();
        recipe.add_ingredient(
            &input.name,
            input.amount,
            input.unit,
            input.is_optional,
            input.notes.as_deref(),
            now,
        )?;

        self.uow.recipes().update(&mut recipe).await?;
        self.uow.save_changes().await?;
        self.to_dto(&recipe).await
    }

    pub async fn remove_ingredient(
        &self,
        recipe_id: EntityId,
        ingredient_id: EntityId,
    ) -> AppResult<RecipeDto> {
        tracing::info!(recipe_id, ingredient_id, "removing ingredient");
        let mut recipe = self.require(recipe_id).await?;
        let now = self.clock.now_utc();
        recipe.remove_ingredient(ingredient_id, now)?;

        self.uow.recipes().update(&mut recipe).await?;
        self.uow.save_changes().await?;
        self.to_dto(&recipe).await
    }

    pub async fn clear_ingredients(&self, recipe_id: EntityId) -> AppResult<RecipeDto> {
        tracing::info!(recipe_id, "clearing ingredients");
        let mut recipe = self.require(recipe_id).await?;
        let now = self.clock.now_utc();
        recipe.clear_ingredients(now)?;

        self.uow.recipes().update(&mut recipe).await?;
        self.uow.save_changes().await?;
        self.to_dto(&recipe).await
    }

    /// Touches two aggregates (reads the category, writes the recipe), so
    /// the whole use case runs inside one transaction.
    pub async fn assign_category(
        &self,
        recipe_id: EntityId,
        category_id: EntityId,
    ) -> AppResult<RecipeDto> {
        tracing::info!(recipe_id, category_id, "assigning category");
        self.uow.begin_transaction().await?;
        match self.assign_category_in_tx(recipe_id, category_id).await {
            Ok(dto) => {
                self.uow.commit_transaction().await?;
                Ok(dto)
            }
            Err(err) => {
                self.uow.rollback_transaction().await?;
                Err(err)
            }
        }
    }

    pub async fn unassign_category(
        &self,
        recipe_id: EntityId,
        category_id: EntityId,
    ) -> AppResult<RecipeDto> {
        tracing::info!(recipe_id, category_id, "unassigning category");
        self.uow.begin_transaction().await?;
        match self.unassign_category_in_tx(recipe_id, category_id).await {
            Ok(dto) => {
                self.uow.commit_transaction().await?;
                Ok(dto)
            }
            Err(err) => {
                self.uow.rollback_transaction().await?;
                Err(err)
            }
        }
    }

    async fn assign_category_in_tx(
        &self,
        recipe_id: EntityId,
        category_id: EntityId,
    ) -> AppResult<RecipeDto> {
        let mut recipe = self.require(recipe_id).await?;
        let category = self
            .uow
            .categories()
            .get_by_id(category_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("category with id {category_id} not found")))?;

        recipe.add_category(category.id(), self.clock.now_utc());
        self.uow.recipes().update(&mut recipe).await?;
        self.uow.save_changes().await?;
        self.to_dto(&recipe).await
    }

    async fn unassign_category_in_tx(
        &self,
        recipe_id: EntityId,
        category_id: EntityId,
    ) -> AppResult<RecipeDto> {
        let mut recipe = self.require(recipe_id).await?;
        let category = self
            .uow
            .categories()
            .get_by_id(category_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("category with id {category_id} not found")))?;

        recipe.remove_category(category.id(), self.clock.now_utc());
        self.uow.recipes().update(&mut recipe).await?;
        self.uow.save_changes().await?;
        self.to_dto(&recipe).await
    }

    async fn workflow(
        &self,
        id: EntityId,
        op: impl FnOnce(&mut Recipe, chrono::DateTime<chrono::Utc>) -> culina_shared::DomainResult<()>,
    ) -> AppResult<RecipeDto> {
        let mut recipe = self.require(id).await?;
        op(&mut recipe, self.clock.now_utc())?;
        self.uow.recipes().update(&mut recipe).await?;
        self.uow.save_changes().await?;
        self.to_dto(&recipe).await
    }

    async fn require(&self, id: EntityId) -> AppResult<Recipe> {
        self.uow
            .recipes()
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("recipe with id {id} not found")))
    }

    /// Resolves the category ids on the aggregate into full category
    /// details for the view.
    async fn to_dto(&self, recipe: &Recipe) -> AppResult<RecipeDto> {
        let mut categories = Vec::with_capacity(recipe.categories().len());
        for assignment in recipe.categories() {
            if let Some(category) = self
                .uow
                .categories()
                .get_by_id(assignment.category_id)
                .await?
            {
                categories.push(CategoryDto::from_entity(&category, None));
            }
        }
        Ok(RecipeDto::from_entity(recipe, categories))
    }
}
