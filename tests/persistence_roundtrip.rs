//! Saving and loading the inventory through the filesystem.

use std::fs;
use tempfile::TempDir;
use thicket::{GemStore, Inventory, InventoryStore, ThicketError, ThicketResult};

fn sample() -> Inventory {
    let mut inventory = Inventory::new();
    for (power, quantity) in [(20, 1), (10, 4), (50, 60), (5, 2), (15, 9)] {
        inventory.insert(power, quantity);
    }
    inventory
}

#[test]
fn test_save_then_load_restores_tree() -> ThicketResult<()> {
    let dir = TempDir::new()?;
    let store = InventoryStore::in_data_dir(dir.path());
    assert!(!store.has_saved_inventory());

    let original = sample();
    store.save(&original)?;
    assert!(store.has_saved_inventory());
    assert_eq!(store.path().file_name().and_then(|name| name.to_str()), Some("save_inventory.txt"));

    let mut loaded = Inventory::new();
    loaded.insert(99, 1);
    store.load(&mut loaded)?;
    assert_eq!(loaded, original);
    assert_eq!(loaded.quantity_of(99), 0);
    Ok(())
}

#[test]
fn test_file_format_is_preorder_records() -> ThicketResult<()> {
    let dir = TempDir::new()?;
    let store = InventoryStore::in_data_dir(dir.path());
    store.save(&sample())?;

    let text = fs::read_to_string(store.path())?;
    assert_eq!(text, "20;1\n10;4\n5;2\n15;9\n50;60\n");
    Ok(())
}

#[test]
fn test_save_creates_missing_directories() -> ThicketResult<()> {
    let dir = TempDir::new()?;
    let store = InventoryStore::in_data_dir(dir.path().join("nested").join("data"));
    store.save(&sample())?;
    assert!(store.path().exists());
    Ok(())
}

#[test]
fn test_missing_file_loads_empty() -> ThicketResult<()> {
    let dir = TempDir::new()?;
    let store = InventoryStore::new(dir.path().join("absent.txt"));

    let mut inventory = sample();
    store.load(&mut inventory)?;
    assert!(inventory.is_empty());
    Ok(())
}

#[test]
fn test_empty_save_is_not_a_saved_inventory() -> ThicketResult<()> {
    let dir = TempDir::new()?;
    let store = InventoryStore::in_data_dir(dir.path());
    store.save(&Inventory::new())?;

    assert!(store.path().exists());
    assert!(!store.has_saved_inventory());

    let mut inventory = sample();
    store.load(&mut inventory)?;
    assert!(inventory.is_empty());
    Ok(())
}

#[test]
fn test_blank_lines_are_ignored() -> ThicketResult<()> {
    let dir = TempDir::new()?;
    let store = InventoryStore::in_data_dir(dir.path());
    fs::write(store.path(), "\n10;2\n\n  \n5;1\n")?;

    let mut inventory = Inventory::new();
    store.load(&mut inventory)?;
    assert_eq!(inventory.entries(), vec![(5, 1), (10, 2)]);
    Ok(())
}

#[test]
fn test_malformed_file_is_rejected_atomically() -> ThicketResult<()> {
    let dir = TempDir::new()?;
    let store = InventoryStore::in_data_dir(dir.path());
    fs::write(store.path(), "10;2\n5;1\nruby;3\n")?;

    let mut inventory = sample();
    let result = store.load(&mut inventory);
    match result {
        Err(ThicketError::MalformedSave { line, content }) => {
            assert_eq!(line, 3);
            assert_eq!(content, "ruby;3");
        }
        other => panic!("expected a malformed save error, got {:?}", other),
    }
    assert!(inventory.is_empty());
    Ok(())
}

#[test]
fn test_overflowing_repeated_power_is_rejected() -> ThicketResult<()> {
    let dir = TempDir::new()?;
    let store = InventoryStore::in_data_dir(dir.path());
    fs::write(store.path(), "5;4294967295\n10;1\n5;1\n")?;

    let mut inventory = sample();
    match store.load(&mut inventory) {
        Err(ThicketError::MalformedSave { line, content }) => {
            assert_eq!(line, 3);
            assert_eq!(content, "5;1");
        }
        other => panic!("expected a malformed save error, got {:?}", other),
    }
    assert!(inventory.is_empty());
    Ok(())
}
