use chrono::{Days, TimeZone, Utc};
use culina::dto::{
    CategoryInput, CreateInventoryItemInput, CreateRecipeInput, CreateShoppingListInput,
    IngredientInput, ShoppingItemInput, UpdateRecipeInput,
};
use culina::error::AppError;
use culina::service::{
    CategoryService, DashboardService, InventoryService, RecipeService, ShoppingListService,
};
use culina_recipe::{DishType, RecipeStatus};
use culina_shared::{Clock, DomainError, FixedClock, MeasurementUnit};
use culina_store::{MemoryStore, UnitOfWork};
use rust_decimal::Decimal;
use std::sync::Arc;

struct TestApp {
    recipes: RecipeService,
    categories: CategoryService,
    inventory: InventoryService,
    shopping: ShoppingListService,
    dashboard: DashboardService,
    clock: Arc<FixedClock>,
}

fn app() -> TestApp {
    let uow: Arc<dyn UnitOfWork> = Arc::new(MemoryStore::new());
    let clock = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap(),
    ));
    let time: Arc<dyn Clock> = clock.clone();
    TestApp {
        recipes: RecipeService::new(uow.clone(), time.clone()),
        categories: CategoryService::new(uow.clone(), time.clone()),
        inventory: InventoryService::new(uow.clone(), time.clone()),
        shopping: ShoppingListService::new(uow.clone(), time.clone()),
        dashboard: DashboardService::new(uow, time),
        clock,
    }
}

fn borscht_input() -> CreateRecipeInput {
    CreateRecipeInput {
        code: "brs-01".into(),
        name: "Borscht".into(),
        cuisine: "Ukrainian".into(),
        dish_type: DishType::FirstCourse,
        cooking_time_minutes: 90,
        servings: 6,
        description: None,
        instructions: Some("Simmer everything.".into()),
        image_path: None,
    }
}

fn beets() -> IngredientInput {
    IngredientInput {
        name: "Beets".into(),
        amount: 500.0,
        unit: MeasurementUnit::Gram,
        is_optional: false,
        notes: None,
    }
}

fn milk(quantity: f64) -> ShoppingItemInput {
    ShoppingItemInput {
        name: "Milk".into(),
        quantity,
        unit: MeasurementUnit::Liter,
        estimated_price: None,
        preferred_store: None,
        notes: None,
    }
}

#[tokio::test]
async fn duplicate_recipe_codes_conflict_case_insensitively() {
    let app = app();
    app.recipes.create(borscht_input()).await.unwrap();

    let mut second = borscht_input();
    second.code = "BRS-01".into();
    second.name = "Another borscht".into();
    let err = app.recipes.create(second).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn recipe_lifecycle_through_the_service() {
    let app = app();
    let recipe = app.recipes.create(borscht_input()).await.unwrap();
    assert_eq!(recipe.status, RecipeStatus::Draft);
    assert_eq!(recipe.code, "BRS-01");

    app.recipes.add_ingredient(recipe.id, beets()).await.unwrap();
    let published = app.recipes.publish(recipe.id).await.unwrap();
    assert_eq!(published.status, RecipeStatus::Published);
    assert!(published.published_at.is_some());

    // Ingredient edits are locked once published.
    let err = app
        .recipes
        .add_ingredient(
            recipe.id,
            IngredientInput {
                name: "Cabbage".into(),
                amount: 300.0,
                unit: MeasurementUnit::Gram,
                is_optional: false,
                notes: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Domain(DomainError::RuleViolation(_))
    ));

    let draft = app.recipes.return_to_draft(recipe.id).await.unwrap();
    assert_eq!(draft.status, RecipeStatus::Draft);
    assert!(draft.published_at.is_none());

    let with_cabbage = app
        .recipes
        .add_ingredient(
            recipe.id,
            IngredientInput {
                name: "Cabbage".into(),
                amount: 300.0,
                unit: MeasurementUnit::Gram,
                is_optional: false,
                notes: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(with_cabbage.ingredients.len(), 2);
}

#[tokio::test]
async fn remove_ingredient_uses_persisted_ids() {
    let app = app();
    let recipe = app.recipes.create(borscht_input()).await.unwrap();
    let recipe = app.recipes.add_ingredient(recipe.id, beets()).await.unwrap();

    let beet_id = recipe.ingredients[0].id;
    assert!(beet_id > 0);
    let without = app
        .recipes
        .remove_ingredient(recipe.id, beet_id)
        .await
        .unwrap();
    assert!(without.ingredients.is_empty());
}

#[tokio::test]
async fn update_is_rejected_while_published() {
    let app = app();
    let recipe = app.recipes.create(borscht_input()).await.unwrap();
    app.recipes.add_ingredient(recipe.id, beets()).await.unwrap();
    app.recipes.publish(recipe.id).await.unwrap();

    let err = app
        .recipes
        .update(UpdateRecipeInput {
            id: recipe.id,
            code: "BRS-01".into(),
            name: "Renamed".into(),
            cuisine: "Ukrainian".into(),
            dish_type: DishType::FirstCourse,
            cooking_time_minutes: 90,
            servings: 6,
            description: None,
            instructions: Some("Simmer everything.".into()),
            image_path: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Domain(DomainError::RuleViolation(_))
    ));
}

#[tokio::test]
async fn malformed_input_fails_validation_before_the_domain_runs() {
    let app = app();

    let mut input = borscht_input();
    input.code = "x".repeat(21);
    assert!(matches!(
        app.recipes.create(input).await.unwrap_err(),
        AppError::Validation(_)
    ));

    let mut input = borscht_input();
    input.code = "bad code!".into();
    assert!(matches!(
        app.recipes.create(input).await.unwrap_err(),
        AppError::Validation(_)
    ));

    let mut input = borscht_input();
    input.cooking_time_minutes = 0;
    assert!(matches!(
        app.recipes.create(input).await.unwrap_err(),
        AppError::Validation(_)
    ));

    assert!(app.recipes.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_recipe_is_a_not_found_error() {
    let app = app();
    assert!(matches!(
        app.recipes.publish(404).await.unwrap_err(),
        AppError::NotFound(_)
    ));
    assert!(app.recipes.get(404).await.unwrap().is_none());
}

#[tokio::test]
async fn expiration_flags_move_with_the_clock() {
    let app = app();
    let today = app.clock.today();

    let cheese = app
        .inventory
        .create(CreateInventoryItemInput {
            name: "Cheese".into(),
            quantity: 0.5,
            unit: MeasurementUnit::Kilogram,
            expiration_date: today + Days::new(2),
            storage_location: Some("Fridge".into()),
        })
        .await
        .unwrap();
    assert!(!cheese.is_expired);
    assert!(cheese.is_expiring_soon);
    assert_eq!(cheese.days_until_expiration, 2);

    app.clock.advance(chrono::TimeDelta::days(5));
    let cheese = app.inventory.get(cheese.id).await.unwrap().unwrap();
    assert!(cheese.is_expired);
    assert!(!cheese.is_expiring_soon);
    assert_eq!(cheese.days_until_expiration, -3);

    let expired = app.inventory.expired().await.unwrap();
    assert_eq!(expired.len(), 1);
}

#[tokio::test]
async fn consume_overdraw_surfaces_the_insufficient_stock_error() {
    let app = app();
    let today = app.clock.today();
    let cheese = app
        .inventory
        .create(CreateInventoryItemInput {
            name: "Cheese".into(),
            quantity: 0.5,
            unit: MeasurementUnit::Kilogram,
            expiration_date: today + Days::new(5),
            storage_location: None,
        })
        .await
        .unwrap();

    let err = app.inventory.consume(cheese.id, 2.0).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Domain(DomainError::InsufficientStock {
            available,
            requested,
        }) if available == 0.5 && requested == 2.0
    ));

    // Round trip through use and replenish lands back on the original.
    app.inventory.consume(cheese.id, 0.2).await.unwrap();
    let restored = app.inventory.replenish(cheese.id, 0.2).await.unwrap();
    assert_eq!(restored.quantity, 0.5);
}

#[tokio::test]
async fn shopping_merge_and_completion_gate() {
    let app = app();
    let list = app
        .shopping
        .create(CreateShoppingListInput {
            name: "Weekly".into(),
            description: None,
        })
        .await
        .unwrap();

    app.shopping.add_item(list.id, milk(1.0)).await.unwrap();
    let mut second = milk(1.0);
    second.name = "milk".into();
    let merged = app.shopping.add_item(list.id, second).await.unwrap();
    assert_eq!(merged.total_items, 1);
    assert_eq!(merged.items[0].quantity, 2.0);

    let completed = app.shopping.complete(list.id).await.unwrap();
    assert!(completed.is_completed);
    let err = app.shopping.add_item(list.id, milk(1.0)).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Domain(DomainError::RuleViolation(_))
    ));
}

#[tokio::test]
async fn purchase_bookkeeping_and_totals() {
    let app = app();
    let list = app
        .shopping
        .create(CreateShoppingListInput {
            name: "Weekly".into(),
            description: Some("Groceries".into()),
        })
        .await
        .unwrap();

    let mut priced = milk(1.0);
    priced.estimated_price = Some(Decimal::new(189, 2));
    let list_dto = app.shopping.add_item(list.id, priced).await.unwrap();
    let milk_id = list_dto.items[0].id;
    app.shopping
        .add_item(
            list.id,
            ShoppingItemInput {
                name: "Bread".into(),
                quantity: 1.0,
                unit: MeasurementUnit::Piece,
                estimated_price: None,
                preferred_store: None,
                notes: None,
            },
        )
        .await
        .unwrap();

    let after = app
        .shopping
        .mark_item_purchased(list.id, milk_id)
        .await
        .unwrap();
    assert_eq!(after.purchased_items, 1);
    assert_eq!(after.total_estimated_price, Decimal::new(189, 2));
    assert!((after.completion_percentage - 50.0).abs() < 1e-9);

    let cleared = app.shopping.clear_purchased_items(list.id).await.unwrap();
    assert_eq!(cleared.total_items, 1);
    assert_eq!(cleared.items[0].name, "Bread");
}

#[tokio::test]
async fn category_names_are_unique_and_deletion_cascades() {
    let app = app();
    let soups = app
        .categories
        .create(CategoryInput {
            name: "Soups".into(),
            description: None,
            icon_name: None,
        })
        .await
        .unwrap();

    let err = app
        .categories
        .create(CategoryInput {
            name: "soups".into(),
            description: None,
            icon_name: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // Tagging works even on a published recipe.
    let recipe = app.recipes.create(borscht_input()).await.unwrap();
    app.recipes.add_ingredient(recipe.id, beets()).await.unwrap();
    app.recipes.publish(recipe.id).await.unwrap();
    let tagged = app
        .recipes
        .assign_category(recipe.id, soups.id)
        .await
        .unwrap();
    assert_eq!(tagged.categories.len(), 1);
    assert_eq!(tagged.categories[0].name, "Soups");

    let listed = app.categories.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].recipe_count, Some(1));

    app.categories.delete(soups.id).await.unwrap();
    let reloaded = app.recipes.get(recipe.id).await.unwrap().unwrap();
    assert!(reloaded.categories.is_empty());
}

#[tokio::test]
async fn assigning_an_unknown_category_fails_without_side_effects() {
    let app = app();
    let recipe = app.recipes.create(borscht_input()).await.unwrap();

    let err = app
        .recipes
        .assign_category(recipe.id, 404)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let reloaded = app.recipes.get(recipe.id).await.unwrap().unwrap();
    assert!(reloaded.categories.is_empty());
}

#[tokio::test]
async fn dashboard_counts_span_every_aggregate() {
    let app = app();
    let today = app.clock.today();

    let recipe = app.recipes.create(borscht_input()).await.unwrap();
    app.recipes.add_ingredient(recipe.id, beets()).await.unwrap();
    app.recipes.publish(recipe.id).await.unwrap();
    let mut second = borscht_input();
    second.code = "SAL-01".into();
    second.name = "Olivier".into();
    app.recipes.create(second).await.unwrap();

    app.inventory
        .create(CreateInventoryItemInput {
            name: "Cheese".into(),
            quantity: 0.5,
            unit: MeasurementUnit::Kilogram,
            expiration_date: today + Days::new(2),
            storage_location: None,
        })
        .await
        .unwrap();
    app.inventory
        .create(CreateInventoryItemInput {
            name: "Old milk".into(),
            quantity: 1.0,
            unit: MeasurementUnit::Liter,
            expiration_date: today - Days::new(1),
            storage_location: None,
        })
        .await
        .unwrap();

    app.shopping
        .create(CreateShoppingListInput {
            name: "Weekly".into(),
            description: None,
        })
        .await
        .unwrap();
    app.categories
        .create(CategoryInput {
            name: "Soups".into(),
            description: None,
            icon_name: None,
        })
        .await
        .unwrap();

    let summary = app.dashboard.summary().await.unwrap();
    assert_eq!(summary.total_recipes, 2);
    assert_eq!(summary.published_recipes, 1);
    assert_eq!(summary.draft_recipes, 1);
    assert_eq!(summary.archived_recipes, 0);
    assert_eq!(summary.total_inventory_items, 2);
    assert_eq!(summary.expired_items, 1);
    assert_eq!(summary.expiring_soon_items, 1);
    assert_eq!(summary.active_shopping_lists, 1);
    assert_eq!(summary.total_categories, 1);
    assert_eq!(summary.recent_recipes.len(), 2);
    assert_eq!(summary.expiring_items.len(), 1);
    assert_eq!(summary.active_lists.len(), 1);
}
