//! Wire shapes of the application layer: validated inputs and serialized
//! views. Field bounds mirror what the presentation layer promises before
//! the domain is invoked; the domain re-checks its own invariants anyway.

use chrono::{DateTime, NaiveDate, Utc};
use culina_inventory::InventoryItem;
use culina_recipe::{Category, DishType, Recipe, RecipeIngredient, RecipeStatus};
use culina_shared::{EntityId, MeasurementUnit};
use culina_shopping::{ShoppingItem, ShoppingList};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::{Validate, ValidationError};

static CODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[A-Za-z0-9_-]+$").expect("code pattern"));

fn non_negative_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price < Decimal::ZERO {
        return Err(ValidationError::new("price_negative"));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRecipeInput {
    #[validate(
        length(min = 1, max = 20, message = "recipe code must be 1 to 20 characters"),
        regex(
            path = *CODE_PATTERN,
            message = "recipe code may only contain letters, digits, dash and underscore"
        )
    )]
    pub code: String,
    #[validate(length(min = 1, max = 200, message = "recipe name must be 1 to 200 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 100, message = "cuisine must be 1 to 100 characters"))]
    pub cuisine: String,
    pub dish_type: DishType,
    #[validate(range(min = 1, max = 1440, message = "cooking time must be 1 to 1440 minutes"))]
    pub cooking_time_minutes: u32,
    #[validate(range(min = 1, max = 100, message = "servings must be 1 to 100"))]
    pub servings: u32,
    #[validate(length(max = 2000, message = "description must not exceed 2000 characters"))]
    pub description: Option<String>,
    #[validate(length(max = 10000, message = "instructions must not exceed 10000 characters"))]
    pub instructions: Option<String>,
    pub image_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateRecipeInput {
    #[validate(range(min = 1, message = "invalid recipe id"))]
    pub id: EntityId,
    #[validate(
        length(min = 1, max = 20, message = "recipe code must be 1 to 20 characters"),
        regex(
            path = *CODE_PATTERN,
            message = "recipe code may only contain letters, digits, dash and underscore"
        )
    )]
    pub code: String,
    #[validate(length(min = 1, max = 200, message = "recipe name must be 1 to 200 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 100, message = "cuisine must be 1 to 100 characters"))]
    pub cuisine: String,
    pub dish_type: DishType,
    #[validate(range(min = 1, max = 1440, message = "cooking time must be 1 to 1440 minutes"))]
    pub cooking_time_minutes: u32,
    #[validate(range(min = 1, max = 100, message = "servings must be 1 to 100"))]
    pub servings: u32,
    #[validate(length(max = 2000, message = "description must not exceed 2000 characters"))]
    pub description: Option<String>,
    #[validate(length(max = 10000, message = "instructions must not exceed 10000 characters"))]
    pub instructions: Option<String>,
    pub image_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct IngredientInput {
    #[validate(length(min = 1, max = 200, message = "ingredient name must be 1 to 200 characters"))]
    pub name: String,
    #[validate(range(exclusive_min = 0.0, message = "amount must be positive"))]
    pub amount: f64,
    pub unit: MeasurementUnit,
    #[serde(default)]
    pub is_optional: bool,
    #[validate(length(max = 500, message = "notes must not exceed 500 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CategoryInput {
    #[validate(length(min = 1, max = 100, message = "category name must be 1 to 100 characters"))]
    pub name: String,
    #[validate(length(max = 500, message = "description must not exceed 500 characters"))]
    pub description: Option<String>,
    pub icon_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateInventoryItemInput {
    #[validate(length(min = 1, max = 200, message = "item name must be 1 to 200 characters"))]
    pub name: String,
    #[validate(range(min = 0.0, message = "quantity must not be negative"))]
    pub quantity: f64,
    pub unit: MeasurementUnit,
    pub expiration_date: NaiveDate,
    #[validate(length(max = 100, message = "storage location must not exceed 100 characters"))]
    pub storage_location: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateInventoryItemInput {
    #[validate(range(min = 1, message = "invalid item id"))]
    pub id: EntityId,
    #[validate(length(min = 1, max = 200, message = "item name must be 1 to 200 characters"))]
    pub name: String,
    #[validate(range(min = 0.0, message = "quantity must not be negative"))]
    pub quantity: f64,
    pub unit: MeasurementUnit,
    pub expiration_date: NaiveDate,
    #[validate(length(max = 100, message = "storage location must not exceed 100 characters"))]
    pub storage_location: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateShoppingListInput {
    #[validate(length(min = 1, max = 200, message = "list name must be 1 to 200 characters"))]
    pub name: String,
    #[validate(length(max = 1000, message = "description must not exceed 1000 characters"))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ShoppingItemInput {
    #[validate(length(min = 1, max = 200, message = "item name must be 1 to 200 characters"))]
    pub name: String,
    #[validate(range(exclusive_min = 0.0, message = "quantity must be positive"))]
    pub quantity: f64,
    pub unit: MeasurementUnit,
    #[validate(custom(function = non_negative_price, message = "price must not be negative"))]
    pub estimated_price: Option<Decimal>,
    #[validate(length(max = 100, message = "preferred store must not exceed 100 characters"))]
    pub preferred_store: Option<String>,
    #[validate(length(max = 500, message = "notes must not exceed 500 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecipeIngredientDto {
    pub id: EntityId,
    pub name: String,
    pub amount: f64,
    pub unit: MeasurementUnit,
    pub is_optional: bool,
    pub notes: Option<String>,
}

impl RecipeIngredientDto {
    pub fn from_entity(ingredient: &RecipeIngredient) -> Self {
        Self {
            id: ingredient.id(),
            name: ingredient.name().to_owned(),
            amount: ingredient.amount(),
            unit: ingredient.unit(),
            is_optional: ingredient.is_optional(),
            notes: ingredient.notes().map(str::to_owned),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryDto {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub icon_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipe_count: Option<u64>,
}

impl CategoryDto {
    pub fn from_entity(category: &Category, recipe_count: Option<u64>) -> Self {
        Self {
            id: category.id(),
            name: category.name().to_owned(),
            description: category.description().map(str::to_owned),
            icon_name: category.icon_name().map(str::to_owned),
            recipe_count,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecipeDto {
    pub id: EntityId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub cuisine: String,
    pub dish_type: DishType,
    pub status: RecipeStatus,
    pub cooking_time_minutes: u32,
    pub servings: u32,
    pub instructions: Option<String>,
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
    pub archived_at: Option<DateTime<Utc>>,
    pub ingredients: Vec<RecipeIngredientDto>,
    pub categories: Vec<CategoryDto>,
}

impl RecipeDto {
    /// Category details come from a lookup join done by the service; the
    /// aggregate itself only knows category ids.
    pub fn from_entity(recipe: &Recipe, categories: Vec<CategoryDto>) -> Self {
        Self {
            id: recipe.id(),
            code: recipe.code().to_owned(),
            name: recipe.name().to_owned(),
            description: recipe.description().map(str::to_owned),
            cuisine: recipe.cuisine().to_owned(),
            dish_type: recipe.dish_type(),
            status: recipe.status(),
            cooking_time_minutes: recipe.cooking_time_minutes(),
            servings: recipe.servings(),
            instructions: recipe.instructions().map(str::to_owned),
            image_path: recipe.image_path().map(str::to_owned),
            created_at: recipe.meta().created_at(),
            updated_at: recipe.meta().updated_at(),
            published_at: recipe.published_at(),
            archived_at: recipe.archived_at(),
            ingredients: recipe
                .ingredients()
                .iter()
                .map(RecipeIngredientDto::from_entity)
                .collect(),
            categories,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecipeListItemDto {
    pub id: EntityId,
    pub code: String,
    pub name: String,
    pub cuisine: String,
    pub dish_type: DishType,
    pub status: RecipeStatus,
    pub cooking_time_minutes: u32,
    pub ingredients_count: usize,
}

impl RecipeListItemDto {
    pub fn from_entity(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id(),
            code: recipe.code().to_owned(),
            name: recipe.name().to_owned(),
            cuisine: recipe.cuisine().to_owned(),
            dish_type: recipe.dish_type(),
            status: recipe.status(),
            cooking_time_minutes: recipe.cooking_time_minutes(),
            ingredients_count: recipe.ingredients().len(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InventoryItemDto {
    pub id: EntityId,
    pub name: String,
    pub quantity: f64,
    pub unit: MeasurementUnit,
    pub expiration_date: NaiveDate,
    pub storage_location: Option<String>,
    pub is_expired: bool,
    pub is_expiring_soon: bool,
    pub days_until_expiration: i64,
    pub created_at: DateTime<Utc>,
}

impl InventoryItemDto {
    /// The expiration flags are materialized against the supplied `today`
    /// at mapping time; they are never stored.
    pub fn from_entity(item: &InventoryItem, today: NaiveDate) -> Self {
        Self {
            id: item.id(),
            name: item.name().to_owned(),
            quantity: item.quantity(),
            unit: item.unit(),
            expiration_date: item.expiration_date(),
            storage_location: item.storage_location().map(str::to_owned),
            is_expired: item.is_expired(today),
            is_expiring_soon: item.is_expiring_soon(today),
            days_until_expiration: item.days_until_expiration(today),
            created_at: item.meta().created_at(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ShoppingItemDto {
    pub id: EntityId,
    pub name: String,
    pub quantity: f64,
    pub unit: MeasurementUnit,
    pub is_purchased: bool,
    pub purchased_at: Option<DateTime<Utc>>,
    pub estimated_price: Option<Decimal>,
    pub preferred_store: Option<String>,
    pub notes: Option<String>,
}

impl ShoppingItemDto {
    pub fn from_entity(item: &ShoppingItem) -> Self {
        Self {
            id: item.id(),
            name: item.name().to_owned(),
            quantity: item.quantity(),
            unit: item.unit(),
            is_purchased: item.is_purchased(),
            purchased_at: item.purchased_at(),
            estimated_price: item.estimated_price(),
            preferred_store: item.preferred_store().map(str::to_owned),
            notes: item.notes().map(str::to_owned),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ShoppingListDto {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub total_items: usize,
    pub purchased_items: usize,
    pub total_estimated_price: Decimal,
    pub completion_percentage: f64,
    pub created_at: DateTime<Utc>,
    pub items: Vec<ShoppingItemDto>,
}

impl ShoppingListDto {
    pub fn from_entity(list: &ShoppingList) -> Self {
        Self {
            id: list.id(),
            name: list.name().to_owned(),
            description: list.description().map(str::to_owned),
            is_completed: list.is_completed(),
            completed_at: list.completed_at(),
            total_items: list.total_items(),
            purchased_items: list.purchased_items(),
            total_estimated_price: list.total_estimated_price(),
            completion_percentage: list.completion_percentage(),
            created_at: list.meta().created_at(),
            items: list.items().iter().map(ShoppingItemDto::from_entity).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ShoppingListSummaryDto {
    pub id: EntityId,
    pub name: String,
    pub is_completed: bool,
    pub total_items: usize,
    pub purchased_items: usize,
    pub completion_percentage: f64,
    pub created_at: DateTime<Utc>,
}

impl ShoppingListSummaryDto {
    pub fn from_entity(list: &ShoppingList) -> Self {
        Self {
            id: list.id(),
            name: list.name().to_owned(),
            is_completed: list.is_completed(),
            total_items: list.total_items(),
            purchased_items: list.purchased_items(),
            completion_percentage: list.completion_percentage(),
            created_at: list.meta().created_at(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardDto {
    pub total_recipes: usize,
    pub published_recipes: usize,
    pub draft_recipes: usize,
    pub archived_recipes: usize,
    pub total_inventory_items: usize,
    pub expired_items: usize,
    pub expiring_soon_items: usize,
    pub active_shopping_lists: usize,
    pub total_categories: u64,
    pub recent_recipes: Vec<RecipeListItemDto>,
    pub expiring_items: Vec<InventoryItemDto>,
    pub active_lists: Vec<ShoppingListSummaryDto>,
}
