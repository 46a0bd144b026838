//! Grocery lists persisted to JSON files

use grocery::JsonFileStorage;
use grocery_shopping::{Category, GroceryList, ListStorage};
use temp_dir::TempDir;

#[test]
fn test_list_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.child("grocery-list.json");

    let mut list = GroceryList::open(JsonFileStorage::new(&path));
    list.add_many(["2 tbsp olive oil", "1 onion", "1 lb chicken breast"], false);
    list.remove_at(1);
    drop(list);

    let list = GroceryList::open(JsonFileStorage::new(&path));
    assert_eq!(list.export_list(), vec!["Olive Oil", "Chicken"]);
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        r#"["Olive Oil","Chicken"]"#
    );
}

#[test]
fn test_corrupt_file_starts_empty_and_is_overwritten() {
    let dir = TempDir::new().unwrap();
    let path = dir.child("grocery-list.json");
    std::fs::write(&path, "{ definitely not a list").unwrap();

    let mut list = GroceryList::open(JsonFileStorage::new(&path));
    assert!(list.is_empty());

    list.add_one("Greek Yogurt");
    assert_eq!(list.grouped(), vec![(Category::DairyEggs, vec!["Greek Yogurt"])]);

    let storage = JsonFileStorage::new(&path);
    assert_eq!(storage.read().unwrap().as_deref(), Some(r#"["Greek Yogurt"]"#));
}

#[test]
fn test_missing_file_is_an_empty_list() {
    let dir = TempDir::new().unwrap();
    let storage = JsonFileStorage::new(dir.child("nothing-here.json"));

    assert_eq!(storage.read().unwrap(), None);
    assert!(GroceryList::open(storage).is_empty());
}
