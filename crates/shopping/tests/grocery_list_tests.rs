use grocery_shopping::{
    Category, GroceryList, MemoryStorage, SharedStorage, StorageChange, categorize,
    to_reference_units,
};

#[test]
fn test_recipe_ingredients_become_shopping_list() {
    let mut list = GroceryList::open(MemoryStorage::new());

    let added = list.add_many(
        [
            "2 tbsp extra-virgin olive oil (divided)",
            "1 onion",
            "2 tbsp olive oil",
        ],
        false,
    );

    assert_eq!(added, 2);
    assert_eq!(list.export_list(), vec!["Olive Oil", "Onion"]);
    assert_eq!(categorize("Olive Oil"), Category::Pantry);
    assert_eq!(categorize("Onion"), Category::Produce);
    assert_eq!(
        list.grouped(),
        vec![
            (Category::Produce, vec!["Onion"]),
            (Category::Pantry, vec!["Olive Oil"]),
        ]
    );
}

#[test]
fn test_import_then_add_is_idempotent() {
    let mut list = GroceryList::open(MemoryStorage::new());

    list.import_list(["1 lb ground beef", "3 garlic cloves", "1 cup chicken stock"]);
    let before = list.export_list();

    assert_eq!(list.add_many(&before, true), 0);
    assert_eq!(list.add_one("Garlic"), 0);
    assert_eq!(list.export_list(), vec!["Beef", "Garlic", "Chicken Broth"]);
}

#[test]
fn test_reopen_restores_persisted_list() {
    let shared = SharedStorage::new();

    {
        let (writer, _feed) = shared.context().split();
        let mut list = GroceryList::open(writer);
        list.add_many(["2 cups whole milk", "Eggs"], true);
    }

    let (writer, _feed) = shared.context().split();
    let list = GroceryList::open(writer);
    assert_eq!(list.export_list(), vec!["2 cups whole milk", "Eggs"]);

    let conversions = list.conversions();
    assert_eq!(conversions[0].1, to_reference_units(2.0, "cups"));
    assert_eq!(conversions[1].1, None);
}

#[test]
fn test_legacy_object_entries_are_migrated() {
    let shared = SharedStorage::with_value(r#"[" Olive  Oil ", {"name": "Eggs"}, {"id": 3}, 12]"#);
    let (writer, _feed) = shared.context().split();

    let list = GroceryList::open(writer);
    assert_eq!(list.export_list(), vec!["Olive Oil", "Eggs"]);
}

#[test]
fn test_corrupt_storage_starts_empty_and_recovers() {
    let shared = SharedStorage::with_value("{\"items\": [\"Milk\"]}");
    let (writer, _feed) = shared.context().split();

    let mut list = GroceryList::open(writer);
    assert!(list.is_empty());

    list.add_one("Milk");
    assert_eq!(shared.snapshot().unwrap().as_deref(), Some(r#"["Milk"]"#));
}

#[test]
fn test_changes_propagate_between_contexts() {
    let shared = SharedStorage::new();
    let (writer_a, feed_a) = shared.context().split();
    let (writer_b, feed_b) = shared.context().split();
    let mut tab_a = GroceryList::open_with_feed(writer_a, feed_a);
    let mut tab_b = GroceryList::open_with_feed(writer_b, feed_b);

    tab_a.add_many(["Eggs"], true);
    assert_eq!(tab_b.sync(), 1);
    assert_eq!(tab_b.export_list(), vec!["Eggs"]);

    // Own writes are never echoed back
    assert_eq!(tab_a.sync(), 0);

    tab_b.add_many(["Milk"], true);
    tab_a.sync();
    assert_eq!(tab_a.export_list(), vec!["Eggs", "Milk"]);
}

#[test]
fn test_last_write_wins() {
    let shared = SharedStorage::new();
    let (writer_a, feed_a) = shared.context().split();
    let (writer_b, feed_b) = shared.context().split();
    let mut tab_a = GroceryList::open_with_feed(writer_a, feed_a);
    let mut tab_b = GroceryList::open_with_feed(writer_b, feed_b);

    tab_a.add_many(["Bread"], true);
    tab_b.add_many(["Butter"], true);

    tab_a.sync();
    assert_eq!(tab_a.export_list(), vec!["Butter"]);
    assert_eq!(shared.snapshot().unwrap().as_deref(), Some(r#"["Butter"]"#));
}

#[test]
fn test_external_removal_and_garbage() {
    let shared = SharedStorage::new();
    let (writer, feed) = shared.context().split();
    let mut list = GroceryList::open_with_feed(writer, feed);
    list.add_many(["Eggs", "Milk"], true);

    shared.set_external(Some("not json".to_string())).unwrap();
    assert_eq!(list.sync(), 0);
    assert_eq!(list.export_list(), vec!["Eggs", "Milk"]);

    shared.set_external(None).unwrap();
    assert_eq!(list.sync(), 1);
    assert!(list.is_empty());
    // Adopting never writes back
    assert_eq!(shared.snapshot().unwrap(), None);
}

#[test]
fn test_apply_external_directly() {
    let mut list = GroceryList::open(MemoryStorage::new());

    let change = StorageChange {
        new_value: Some(r#"["Rice", "rice", "Beans"]"#.to_string()),
    };
    assert!(list.apply_external(&change));
    // Adopted wholesale, as written by the other context
    assert_eq!(list.len(), 3);
}
