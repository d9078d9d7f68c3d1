use anyhow::Result;
use chrono::Days;
use clap::{Parser, Subcommand};
use culina::config::Config;
use culina::dto::{
    CategoryInput, CreateInventoryItemInput, CreateRecipeInput, CreateShoppingListInput,
    IngredientInput, ShoppingItemInput,
};
use culina::observability::init_observability;
use culina::service::{
    CategoryService, DashboardService, InventoryService, RecipeService, ShoppingListService,
};
use culina_recipe::DishType;
use culina_shared::{Clock, MeasurementUnit, SystemClock};
use culina_store::{MemoryStore, UnitOfWork};
use rust_decimal::Decimal;
use std::sync::Arc;

/// culina - recipe, pantry and shopping list manager
#[derive(Parser)]
#[command(name = "culina")]
#[command(about = "Recipe, pantry and shopping list manager", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed an in-memory store with sample data and log a dashboard
    /// summary
    Demo,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    init_observability(&config.log.level, config.log.json)?;

    match cli.command {
        Commands::Demo => demo().await,
    }
}

async fn demo() -> Result<()> {
    let uow: Arc<dyn UnitOfWork> = Arc::new(MemoryStore::new());
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let recipes = RecipeService::new(uow.clone(), clock.clone());
    let categories = CategoryService::new(uow.clone(), clock.clone());
    let inventory = InventoryService::new(uow.clone(), clock.clone());
    let shopping = ShoppingListService::new(uow.clone(), clock.clone());
    let dashboard = DashboardService::new(uow.clone(), clock.clone());

    let comfort = categories
        .create(CategoryInput {
            name: "Comfort food".into(),
            description: Some("Slow evenings".into()),
            icon_name: Some("pot".into()),
        })
        .await?;

    let borscht = recipes
        .create(CreateRecipeInput {
            code: "borscht-01".into(),
            name: "Borscht".into(),
            cuisine: "Ukrainian".into(),
            dish_type: DishType::FirstCourse,
            cooking_time_minutes: 90,
            servings: 6,
            description: Some("Beet soup with beef stock".into()),
            instructions: Some("Simmer stock, add beets, cabbage and potatoes.".into()),
            image_path: None,
        })
        .await?;

    recipes
        .add_ingredient(
            borscht.id,
            IngredientInput {
                name: "Beets".into(),
                amount: 500.0,
                unit: MeasurementUnit::Gram,
                is_optional: false,
                notes: None,
            },
        )
        .await?;
    recipes
        .add_ingredient(
            borscht.id,
            IngredientInput {
                name: "Cabbage".into(),
                amount: 300.0,
                unit: MeasurementUnit::Gram,
                is_optional: false,
                notes: Some("Shredded".into()),
            },
        )
        .await?;
    recipes.assign_category(borscht.id, comfort.id).await?;
    let borscht = recipes.publish(borscht.id).await?;
    tracing::info!(code = %borscht.code, status = %borscht.status, "recipe ready");

    let today = clock.today();
    inventory
        .create(CreateInventoryItemInput {
            name: "Beets".into(),
            quantity: 1.2,
            unit: MeasurementUnit::Kilogram,
            expiration_date: today + Days::new(2),
            storage_location: Some("Cellar".into()),
        })
        .await?;
    inventory
        .create(CreateInventoryItemInput {
            name: "Sour cream".into(),
            quantity: 0.4,
            unit: MeasurementUnit::Liter,
            expiration_date: today + Days::new(10),
            storage_location: Some("Fridge".into()),
        })
        .await?;

    let weekly = shopping
        .create(CreateShoppingListInput {
            name: "Weekly".into(),
            description: None,
        })
        .await?;
    shopping
        .add_item(
            weekly.id,
            ShoppingItemInput {
                name: "Milk".into(),
                quantity: 1.0,
                unit: MeasurementUnit::Liter,
                estimated_price: Some(Decimal::new(189, 2)),
                preferred_store: None,
                notes: None,
            },
        )
        .await?;
    // Same name, different case: merges into the existing line.
    let weekly = shopping
        .add_item(
            weekly.id,
            ShoppingItemInput {
                name: "milk".into(),
                quantity: 1.0,
                unit: MeasurementUnit::Liter,
                estimated_price: None,
                preferred_store: None,
                notes: None,
            },
        )
        .await?;
    tracing::info!(
        items = weekly.total_items,
        quantity = weekly.items[0].quantity,
        "shopping list seeded"
    );

    let summary = dashboard.summary().await?;
    tracing::info!(
        recipes = summary.total_recipes,
        published = summary.published_recipes,
        inventory = summary.total_inventory_items,
        expiring_soon = summary.expiring_soon_items,
        active_lists = summary.active_shopping_lists,
        categories = summary.total_categories,
        "dashboard"
    );

    Ok(())
}
