use chrono::{DateTime, Days, TimeZone, Utc};
use culina_inventory::InventoryItem;
use culina_recipe::{Category, DishType, Recipe, RecipeFilter, RecipeStatus};
use culina_shared::{MeasurementUnit, StoreError};
use culina_shopping::ShoppingList;
use culina_store::{MemoryStore, UnitOfWork};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
}

fn recipe(code: &str, name: &str) -> Recipe {
    let mut recipe = Recipe::new(
        code,
        name,
        "Ukrainian",
        DishType::FirstCourse,
        90,
        6,
        t0(),
    )
    .unwrap();
    recipe
        .add_ingredient("Beets", 500.0, MeasurementUnit::Gram, false, None, t0())
        .unwrap();
    recipe
}

#[tokio::test]
async fn staged_changes_are_invisible_until_save() {
    let store = MemoryStore::new();
    let mut borscht = recipe("BRS-01", "Borscht");

    store.recipes().add(&mut borscht).await.unwrap();
    assert!(borscht.id() > 0);
    assert!(store.recipes().get_by_id(borscht.id()).await.unwrap().is_none());

    let applied = store.save_changes().await.unwrap();
    assert_eq!(applied, 1);
    let loaded = store.recipes().get_by_id(borscht.id()).await.unwrap().unwrap();
    assert_eq!(loaded.code(), "BRS-01");
    assert_eq!(loaded.ingredients().len(), 1);
}

#[tokio::test]
async fn add_assigns_distinct_ids_to_the_aggregate_and_its_children() {
    let store = MemoryStore::new();
    let mut borscht = recipe("BRS-01", "Borscht");
    borscht
        .add_ingredient("Cabbage", 300.0, MeasurementUnit::Gram, false, None, t0())
        .unwrap();

    store.recipes().add(&mut borscht).await.unwrap();

    let mut ids = vec![borscht.id()];
    ids.extend(borscht.ingredients().iter().map(|i| i.id()));
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 3);
    assert!(ids.iter().all(|id| *id > 0));
}

#[tokio::test]
async fn update_assigns_ids_to_newly_added_children() {
    let store = MemoryStore::new();
    let mut list = ShoppingList::new("Weekly", None, t0()).unwrap();
    store.shopping_lists().add(&mut list).await.unwrap();
    store.save_changes().await.unwrap();

    list.add_item("Milk", 1.0, MeasurementUnit::Liter, None, None, None, t0())
        .unwrap();
    store.shopping_lists().update(&mut list).await.unwrap();
    store.save_changes().await.unwrap();

    let loaded = store
        .shopping_lists()
        .get_by_id(list.id())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded.items().len(), 1);
    assert!(loaded.items()[0].id() > 0);
}

#[tokio::test]
async fn delete_removes_the_aggregate_after_save() {
    let store = MemoryStore::new();
    let mut borscht = recipe("BRS-01", "Borscht");
    store.recipes().add(&mut borscht).await.unwrap();
    store.save_changes().await.unwrap();

    store.recipes().delete(&borscht).await.unwrap();
    assert!(store.recipes().exists(borscht.id()).await.unwrap());
    store.save_changes().await.unwrap();
    assert!(!store.recipes().exists(borscht.id()).await.unwrap());
    assert_eq!(store.recipes().count().await.unwrap(), 0);
}

#[tokio::test]
async fn code_lookup_normalizes_case_and_honors_exclusions() {
    let store = MemoryStore::new();
    let mut borscht = recipe("BRS-01", "Borscht");
    store.recipes().add(&mut borscht).await.unwrap();
    store.save_changes().await.unwrap();

    assert!(store.recipes().code_exists("brs-01", None).await.unwrap());
    assert!(
        store
            .recipes()
            .get_by_code("brs-01")
            .await
            .unwrap()
            .is_some()
    );
    assert!(
        !store
            .recipes()
            .code_exists("BRS-01", Some(borscht.id()))
            .await
            .unwrap()
    );
    assert!(!store.recipes().code_exists("BRS-02", None).await.unwrap());
}

#[tokio::test]
async fn search_filters_by_term_and_status() {
    let store = MemoryStore::new();
    let mut borscht = recipe("BRS-01", "Borscht");
    borscht.set_instructions(Some("Simmer."), t0());
    borscht.publish(t0()).unwrap();
    let mut salad = Recipe::new("SAL-01", "Olivier", "Russian", DishType::Salad, 30, 4, t0())
        .unwrap();

    store.recipes().add(&mut borscht).await.unwrap();
    store.recipes().add(&mut salad).await.unwrap();
    store.save_changes().await.unwrap();

    let by_term = store
        .recipes()
        .search(&RecipeFilter {
            term: Some("bors".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_term.len(), 1);
    assert_eq!(by_term[0].code(), "BRS-01");

    let drafts = store
        .recipes()
        .search(&RecipeFilter {
            status: Some(RecipeStatus::Draft),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].code(), "SAL-01");

    let cuisines = store.recipes().cuisines().await.unwrap();
    assert_eq!(cuisines, vec!["Russian".to_string(), "Ukrainian".to_string()]);
}

#[tokio::test]
async fn attribute_finders_filter_by_status_cuisine_and_dish_type() {
    let store = MemoryStore::new();
    let mut borscht = recipe("BRS-01", "Borscht");
    borscht.set_instructions(Some("Simmer."), t0());
    borscht.publish(t0()).unwrap();
    let mut salad = Recipe::new("SAL-01", "Olivier", "Russian", DishType::Salad, 30, 4, t0())
        .unwrap();
    store.recipes().add(&mut borscht).await.unwrap();
    store.recipes().add(&mut salad).await.unwrap();
    store.save_changes().await.unwrap();

    let published = store
        .recipes()
        .get_by_status(RecipeStatus::Published)
        .await
        .unwrap();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].code(), "BRS-01");

    let ukrainian = store.recipes().get_by_cuisine("ukrainian").await.unwrap();
    assert_eq!(ukrainian.len(), 1);

    let salads = store
        .recipes()
        .get_by_dish_type(DishType::Salad)
        .await
        .unwrap();
    assert_eq!(salads.len(), 1);
    assert_eq!(salads[0].code(), "SAL-01");
}

#[tokio::test]
async fn inventory_location_and_name_lookups() {
    let store = MemoryStore::new();
    let today = t0().date_naive();
    let mut cheese = InventoryItem::new(
        "Cheese",
        0.5,
        MeasurementUnit::Kilogram,
        today + Days::new(5),
        t0(),
    )
    .unwrap();
    cheese.set_storage_location(Some("Fridge"), t0());
    store.inventory().add(&mut cheese).await.unwrap();
    store.save_changes().await.unwrap();

    let in_fridge = store
        .inventory()
        .get_by_storage_location("fridge")
        .await
        .unwrap();
    assert_eq!(in_fridge.len(), 1);

    let by_name = store.inventory().get_by_name("cheese").await.unwrap();
    assert!(by_name.is_some());
    assert!(store.inventory().exists(cheese.id()).await.unwrap());
    assert_eq!(store.inventory().count().await.unwrap(), 1);
}

#[tokio::test]
async fn deleting_a_category_strips_its_assignments_from_recipes() {
    let store = MemoryStore::new();
    let mut soups = Category::new("Soups", t0()).unwrap();
    store.categories().add(&mut soups).await.unwrap();

    let mut borscht = recipe("BRS-01", "Borscht");
    borscht.add_category(soups.id(), t0());
    store.recipes().add(&mut borscht).await.unwrap();
    store.save_changes().await.unwrap();

    let tagged = store.recipes().get_by_category(soups.id()).await.unwrap();
    assert_eq!(tagged.len(), 1);

    store.categories().delete(&soups).await.unwrap();
    store.save_changes().await.unwrap();

    assert!(store.categories().get_by_id(soups.id()).await.unwrap().is_none());
    let reloaded = store.recipes().get_by_id(borscht.id()).await.unwrap().unwrap();
    assert!(reloaded.categories().is_empty());
}

#[tokio::test]
async fn category_name_lookup_is_case_insensitive() {
    let store = MemoryStore::new();
    let mut soups = Category::new("Soups", t0()).unwrap();
    store.categories().add(&mut soups).await.unwrap();
    store.save_changes().await.unwrap();

    assert!(
        store
            .categories()
            .get_by_name("soups")
            .await
            .unwrap()
            .is_some()
    );
    assert!(
        store
            .categories()
            .get_by_name("stews")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn expiration_finders_split_expired_from_expiring() {
    let store = MemoryStore::new();
    let today = t0().date_naive();

    let mut old_milk = InventoryItem::new(
        "Old milk",
        1.0,
        MeasurementUnit::Liter,
        today - Days::new(1),
        t0(),
    )
    .unwrap();
    let mut cheese = InventoryItem::new(
        "Cheese",
        0.5,
        MeasurementUnit::Kilogram,
        today + Days::new(2),
        t0(),
    )
    .unwrap();
    let mut flour = InventoryItem::new(
        "Flour",
        2.0,
        MeasurementUnit::Kilogram,
        today + Days::new(60),
        t0(),
    )
    .unwrap();
    store.inventory().add(&mut old_milk).await.unwrap();
    store.inventory().add(&mut cheese).await.unwrap();
    store.inventory().add(&mut flour).await.unwrap();
    store.save_changes().await.unwrap();

    let expired = store.inventory().get_expired(today).await.unwrap();
    assert_eq!(expired.len(), 1);
    assert_eq!(expired[0].name(), "Old milk");

    let expiring = store.inventory().get_expiring_soon(today, 3).await.unwrap();
    assert_eq!(expiring.len(), 1);
    assert_eq!(expiring[0].name(), "Cheese");

    let found = store.inventory().search_by_name("che").await.unwrap();
    assert_eq!(found.len(), 1);
}

#[tokio::test]
async fn active_and_completed_list_finders() {
    let store = MemoryStore::new();
    let mut weekly = ShoppingList::new("Weekly", None, t0()).unwrap();
    let mut done = ShoppingList::new("Party", None, t0()).unwrap();
    done.mark_completed(t0());
    store.shopping_lists().add(&mut weekly).await.unwrap();
    store.shopping_lists().add(&mut done).await.unwrap();
    store.save_changes().await.unwrap();

    let active = store.shopping_lists().get_active().await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].name(), "Weekly");

    let completed = store.shopping_lists().get_completed().await.unwrap();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].name(), "Party");

    let found = store.shopping_lists().search_by_name("week").await.unwrap();
    assert_eq!(found.len(), 1);
}

#[tokio::test]
async fn rollback_restores_the_snapshot_and_discards_staged_changes() {
    let store = MemoryStore::new();
    let mut borscht = recipe("BRS-01", "Borscht");
    store.recipes().add(&mut borscht).await.unwrap();
    store.save_changes().await.unwrap();

    store.begin_transaction().await.unwrap();
    let mut salad = Recipe::new("SAL-01", "Olivier", "Russian", DishType::Salad, 30, 4, t0())
        .unwrap();
    store.recipes().add(&mut salad).await.unwrap();
    store.save_changes().await.unwrap();
    store.recipes().delete(&borscht).await.unwrap();

    store.rollback_transaction().await.unwrap();

    assert_eq!(store.recipes().count().await.unwrap(), 1);
    assert!(store.recipes().exists(borscht.id()).await.unwrap());
    // The staged delete was discarded with the rollback.
    assert_eq!(store.save_changes().await.unwrap(), 0);
}

#[tokio::test]
async fn commit_keeps_transactional_work() {
    let store = MemoryStore::new();
    store.begin_transaction().await.unwrap();
    let mut borscht = recipe("BRS-01", "Borscht");
    store.recipes().add(&mut borscht).await.unwrap();
    store.save_changes().await.unwrap();
    store.commit_transaction().await.unwrap();

    assert_eq!(store.recipes().count().await.unwrap(), 1);
}

#[tokio::test]
async fn transaction_misuse_is_reported() {
    let store = MemoryStore::new();
    assert!(matches!(
        store.commit_transaction().await,
        Err(StoreError::NoActiveTransaction)
    ));
    assert!(matches!(
        store.rollback_transaction().await,
        Err(StoreError::NoActiveTransaction)
    ));

    store.begin_transaction().await.unwrap();
    assert!(matches!(
        store.begin_transaction().await,
        Err(StoreError::TransactionInProgress)
    ));
    store.commit_transaction().await.unwrap();
}
