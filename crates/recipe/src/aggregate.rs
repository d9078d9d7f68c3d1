use crate::ingredient::RecipeIngredient;
use crate::types::{DishType, RecipeStatus};
use chrono::{DateTime, Utc};
use culina_shared::{DomainError, DomainResult, EntityId, EntityMeta, MeasurementUnit};

const CODE_MAX_LEN: usize = 20;

/// Association between a recipe and a category. Carries the category id
/// only; category details are resolved by the application layer.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryAssignment {
    pub category_id: EntityId,
    pub assigned_at: DateTime<Utc>,
}

/// Aggregate root for the recipe workflow.
///
/// Owns its ingredients and category assignments; both collections are
/// mutated exclusively through the named operations below. The business
/// code is normalized to upper case and must be unique across recipes;
/// that check needs repository access and lives in the application
/// service.
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    meta: EntityMeta,
    code: String,
    name: String,
    description: Option<String>,
    cuisine: String,
    dish_type: DishType,
    status: RecipeStatus,
    cooking_time_minutes: u32,
    servings: u32,
    instructions: Option<String>,
    image_path: Option<String>,
    published_at: Option<DateTime<Utc>>,
    archived_at: Option<DateTime<Utc>>,
    ingredients: Vec<RecipeIngredient>,
    categories: Vec<CategoryAssignment>,
}

impl Recipe {
    pub fn new(
        code: &str,
        name: &str,
        cuisine: &str,
        dish_type: DishType,
        cooking_time_minutes: u32,
        servings: u32,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let mut recipe = Self {
            meta: EntityMeta::new(now),
            code: String::new(),
            name: String::new(),
            description: None,
            cuisine: String::new(),
            dish_type,
            status: RecipeStatus::Draft,
            cooking_time_minutes: 0,
            servings: 0,
            instructions: None,
            image_path: None,
            published_at: None,
            archived_at: None,
            ingredients: Vec::new(),
            categories: Vec::new(),
        };
        recipe.set_code(code, now)?;
        recipe.set_name(name, now)?;
        recipe.set_cuisine(cuisine, now)?;
        recipe.set_cooking_time(cooking_time_minutes, now)?;
        recipe.set_servings(servings, now)?;
        Ok(recipe)
    }

    pub fn id(&self) -> EntityId {
        self.meta.id()
    }

    pub fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn cuisine(&self) -> &str {
        &self.cuisine
    }

    pub fn dish_type(&self) -> DishType {
        self.dish_type
    }

    pub fn status(&self) -> RecipeStatus {
        self.status
    }

    pub fn cooking_time_minutes(&self) -> u32 {
        self.cooking_time_minutes
    }

    pub fn servings(&self) -> u32 {
        self.servings
    }

    pub fn instructions(&self) -> Option<&str> {
        self.instructions.as_deref()
    }

    pub fn image_path(&self) -> Option<&str> {
        self.image_path.as_deref()
    }

    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }

    pub fn archived_at(&self) -> Option<DateTime<Utc>> {
        self.archived_at
    }

    pub fn ingredients(&self) -> &[RecipeIngredient] {
        &self.ingredients
    }

    pub fn categories(&self) -> &[CategoryAssignment] {
        &self.categories
    }

    /// Field edits are only meaningful while the recipe is a draft. The
    /// setters themselves do not enforce this; the application service
    /// gates on it.
    pub fn can_edit(&self) -> bool {
        self.status == RecipeStatus::Draft
    }

    pub fn set_code(&mut self, code: &str, now: DateTime<Utc>) -> DomainResult<()> {
        let code = code.trim();
        if code.is_empty() {
            return Err(DomainError::validation("recipe code must not be empty"));
        }
        if code.chars().count() > CODE_MAX_LEN {
            return Err(DomainError::validation(format!(
                "recipe code must not exceed {CODE_MAX_LEN} characters"
            )));
        }
        self.code = code.to_uppercase();
        self.meta.touch(now);
        Ok(())
    }

    pub fn set_name(&mut self, name: &str, now: DateTime<Utc>) -> DomainResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("recipe name must not be empty"));
        }
        self.name = name.to_owned();
        self.meta.touch(now);
        Ok(())
    }

    pub fn set_cuisine(&mut self, cuisine: &str, now: DateTime<Utc>) -> DomainResult<()> {
        let cuisine = cuisine.trim();
        if cuisine.is_empty() {
            return Err(DomainError::validation("cuisine must not be empty"));
        }
        self.cuisine = cuisine.to_owned();
        self.meta.touch(now);
        Ok(())
    }

    pub fn set_dish_type(&mut self, dish_type: DishType, now: DateTime<Utc>) {
        self.dish_type = dish_type;
        self.meta.touch(now);
    }

    pub fn set_description(&mut self, description: Option<&str>, now: DateTime<Utc>) {
        self.description = description.map(|d| d.trim().to_owned());
        self.meta.touch(now);
    }

    pub fn set_instructions(&mut self, instructions: Option<&str>, now: DateTime<Utc>) {
        self.instructions = instructions.map(|i| i.trim().to_owned());
        self.meta.touch(now);
    }

    pub fn set_cooking_time(&mut self, minutes: u32, now: DateTime<Utc>) -> DomainResult<()> {
        if minutes == 0 {
            return Err(DomainError::validation("cooking time must be positive"));
        }
        self.cooking_time_minutes = minutes;
        self.meta.touch(now);
        Ok(())
    }

    pub fn set_servings(&mut self, servings: u32, now: DateTime<Utc>) -> DomainResult<()> {
        if servings == 0 {
            return Err(DomainError::validation("servings must be positive"));
        }
        self.servings = servings;
        self.meta.touch(now);
        Ok(())
    }

    pub fn set_image_path(&mut self, image_path: Option<&str>, now: DateTime<Utc>) {
        self.image_path = image_path.map(str::to_owned);
        self.meta.touch(now);
    }

    /// Draft → Published. Requires at least one ingredient and non-blank
    /// instructions; stamps `published_at`.
    pub fn publish(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status != RecipeStatus::Draft {
            return Err(DomainError::rule(format!(
                "cannot publish a recipe with status '{}', only drafts can be published",
                self.status
            )));
        }
        if self.ingredients.is_empty() {
            return Err(DomainError::rule(
                "cannot publish a recipe without ingredients",
            ));
        }
        if self
            .instructions
            .as_deref()
            .is_none_or(|i| i.trim().is_empty())
        {
            return Err(DomainError::rule(
                "cannot publish a recipe without cooking instructions",
            ));
        }
        self.status = RecipeStatus::Published;
        self.published_at = Some(now);
        self.meta.touch(now);
        Ok(())
    }

    /// Published → Archived. Stamps `archived_at`.
    pub fn archive(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status != RecipeStatus::Published {
            return Err(DomainError::rule(format!(
                "cannot archive a recipe with status '{}', only published recipes can be archived",
                self.status
            )));
        }
        self.status = RecipeStatus::Archived;
        self.archived_at = Some(now);
        self.meta.touch(now);
        Ok(())
    }

    /// Archived → Published. Clears `archived_at` and keeps the original
    /// `published_at`.
    pub fn restore(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status != RecipeStatus::Archived {
            return Err(DomainError::rule(format!(
                "cannot restore a recipe with status '{}', only archived recipes can be restored",
                self.status
            )));
        }
        self.status = RecipeStatus::Published;
        self.archived_at = None;
        self.meta.touch(now);
        Ok(())
    }

    /// Published/Archived → Draft. Clears both workflow timestamps.
    pub fn return_to_draft(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status == RecipeStatus::Draft {
            return Err(DomainError::rule("recipe is already a draft"));
        }
        self.status = RecipeStatus::Draft;
        self.published_at = None;
        self.archived_at = None;
        self.meta.touch(now);
        Ok(())
    }

    pub fn add_ingredient(
        &mut self,
        name: &str,
        amount: f64,
        unit: MeasurementUnit,
        is_optional: bool,
        notes: Option<&str>,
        now: DateTime<Utc>,
    ) -> DomainResult<&RecipeIngredient> {
        self.ensure_draft("add ingredients to")?;

        let trimmed = name.trim();
        let lowered = trimmed.to_lowercase();
        if self
            .ingredients
            .iter()
            .any(|i| i.name().to_lowercase() == lowered)
        {
            return Err(DomainError::rule(format!(
                "ingredient '{trimmed}' is already part of the recipe"
            )));
        }

        let ingredient = RecipeIngredient::new(name, amount, unit, is_optional, notes, now)?;
        self.ingredients.push(ingredient);
        self.meta.touch(now);
        Ok(&self.ingredients[self.ingredients.len() - 1])
    }

    pub fn remove_ingredient(
        &mut self,
        ingredient_id: EntityId,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        self.ensure_draft("remove ingredients from")?;

        let Some(pos) = self
            .ingredients
            .iter()
            .position(|i| i.id() == ingredient_id)
        else {
            return Err(DomainError::rule(format!(
                "ingredient with id {ingredient_id} is not part of the recipe"
            )));
        };
        self.ingredients.remove(pos);
        self.meta.touch(now);
        Ok(())
    }

    pub fn clear_ingredients(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_draft("clear the ingredients of")?;
        self.ingredients.clear();
        self.meta.touch(now);
        Ok(())
    }

    /// Tags the recipe with a category. Already-associated ids are a
    /// silent no-op; tagging is allowed in every workflow state.
    pub fn add_category(&mut self, category_id: EntityId, now: DateTime<Utc>) {
        if self.has_category(category_id) {
            return;
        }
        self.categories.push(CategoryAssignment {
            category_id,
            assigned_at: now,
        });
        self.meta.touch(now);
    }

    /// Removes a category tag. Unknown ids are a silent no-op.
    pub fn remove_category(&mut self, category_id: EntityId, now: DateTime<Utc>) {
        let before = self.categories.len();
        self.categories.retain(|c| c.category_id != category_id);
        if self.categories.len() != before {
            self.meta.touch(now);
        }
    }

    pub fn has_category(&self, category_id: EntityId) -> bool {
        self.categories.iter().any(|c| c.category_id == category_id)
    }

    /// Hands out identities to the recipe and any owned ingredients still
    /// waiting for one. Reserved for the persistence layer.
    pub fn assign_ids(&mut self, next_id: &mut dyn FnMut() -> EntityId) {
        if !self.meta.is_persisted() {
            self.meta.assign_id(next_id());
        }
        for ingredient in &mut self.ingredients {
            if !ingredient.meta().is_persisted() {
                ingredient.assign_id(next_id());
            }
        }
    }

    fn ensure_draft(&self, action: &str) -> DomainResult<()> {
        if self.status != RecipeStatus::Draft {
            return Err(DomainError::rule(format!(
                "cannot {action} a recipe with status '{}', return it to draft first",
                self.status
            )));
        }
        Ok(())
    }
}
