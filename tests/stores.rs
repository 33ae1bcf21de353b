//! Integration tests for the cart and wishlist stores: duplicate handling,
//! removal, independence of the two stores and persistence across sessions.

use std::{fs, sync::Arc};

use tempfile::tempdir;
use testresult::TestResult;

use storefront::{prelude::*, storage::MockStorage};

fn catalog() -> TestResult<Catalog> {
    Ok(Catalog::from_path("fixtures/catalog.yml")?)
}

#[test]
fn added_product_is_in_cart() -> TestResult {
    let catalog = catalog()?;
    let mut ctx = StoreContext::in_memory();

    assert!(ctx.cart.add_to_cart(catalog.cart_item("laptop-x1")?));
    assert!(ctx.cart.is_in_cart("laptop-x1"));

    Ok(())
}

#[test]
fn removed_product_is_not_in_cart() -> TestResult {
    let catalog = catalog()?;
    let mut ctx = StoreContext::in_memory();

    ctx.cart.add_to_cart(catalog.cart_item("laptop-x1")?);

    assert!(ctx.cart.remove_from_cart("laptop-x1"));
    assert!(!ctx.cart.is_in_cart("laptop-x1"));
    assert!(ctx.cart.is_empty());

    Ok(())
}

#[test]
fn adding_twice_keeps_one_entry() -> TestResult {
    let catalog = catalog()?;
    let mut ctx = StoreContext::in_memory();

    assert!(ctx.cart.add_to_cart(catalog.cart_item("phone-p8")?));
    assert!(!ctx.cart.add_to_cart(catalog.cart_item("phone-p8")?));

    assert_eq!(ctx.cart.len(), 1);

    assert!(ctx.wishlist.add_to_wishlist(catalog.wishlist_item("phone-p8")?));
    assert!(!ctx.wishlist.add_to_wishlist(catalog.wishlist_item("phone-p8")?));

    assert_eq!(ctx.wishlist.len(), 1);

    Ok(())
}

#[test]
fn removing_missing_product_changes_nothing() -> TestResult {
    let catalog = catalog()?;
    let mut ctx = StoreContext::in_memory();

    ctx.cart.add_to_cart(catalog.cart_item("laptop-x1")?);

    assert!(!ctx.cart.remove_from_cart("phone-p8"));
    assert!(!ctx.wishlist.remove_from_wishlist("phone-p8"));

    assert_eq!(ctx.cart.len(), 1);

    Ok(())
}

#[test]
fn cart_and_wishlist_do_not_share_entries() -> TestResult {
    let catalog = catalog()?;
    let mut ctx = StoreContext::in_memory();

    ctx.wishlist
        .add_to_wishlist(catalog.wishlist_item("headphones-wh")?);

    assert!(!ctx.cart.is_in_cart("headphones-wh"));

    ctx.cart.add_to_cart(catalog.cart_item("headphones-wh")?);
    ctx.wishlist.remove_from_wishlist("headphones-wh");

    assert!(ctx.cart.is_in_cart("headphones-wh"));
    assert!(!ctx.wishlist.is_in_wishlist("headphones-wh"));

    Ok(())
}

#[test]
fn insertion_order_is_preserved() -> TestResult {
    let catalog = catalog()?;
    let mut ctx = StoreContext::in_memory();

    for id in ["phone-p8", "laptop-x1", "charger-65w"] {
        ctx.cart.add_to_cart(catalog.cart_item(id)?);
    }

    let ids: Vec<&str> = ctx.cart.items().iter().map(|item| item.id.as_str()).collect();

    assert_eq!(ids, ["phone-p8", "laptop-x1", "charger-65w"]);

    Ok(())
}

#[test]
fn stores_survive_a_new_session() -> TestResult {
    let catalog = catalog()?;
    let dir = tempdir()?;

    {
        let mut ctx = StoreContext::open_dir(dir.path(), DEFAULT_NAMESPACE)?;

        ctx.cart.add_to_cart(catalog.cart_item("laptop-x1")?);
        ctx.cart.add_to_cart(catalog.cart_item("charger-65w")?);
        ctx.wishlist
            .add_to_wishlist(catalog.wishlist_item("monitor-27")?);
    }

    let ctx = StoreContext::open_dir(dir.path(), DEFAULT_NAMESPACE)?;

    assert_eq!(ctx.cart.len(), 2);
    assert_eq!(ctx.cart.get("laptop-x1"), Some(&catalog.cart_item("laptop-x1")?));
    assert!(ctx.wishlist.is_in_wishlist("monitor-27"));

    Ok(())
}

#[test]
fn persisted_cart_uses_camel_case_fields() -> TestResult {
    let catalog = catalog()?;
    let dir = tempdir()?;

    let mut ctx = StoreContext::open_dir(dir.path(), DEFAULT_NAMESPACE)?;

    ctx.wishlist
        .add_to_wishlist(catalog.wishlist_item("laptop-x1")?);

    let raw = fs::read_to_string(dir.path().join("storefront.wishlist.json"))?;
    let value: serde_json::Value = serde_json::from_str(&raw)?;

    assert_eq!(value[0]["id"], "laptop-x1");
    assert_eq!(value[0]["type"], "new");
    assert_eq!(value[0]["isFeatured"], true);

    Ok(())
}

#[test]
fn corrupt_file_starts_empty_and_is_overwritten() -> TestResult {
    let catalog = catalog()?;
    let dir = tempdir()?;

    fs::write(dir.path().join("storefront.cart.json"), "{ not json")?;

    let mut ctx = StoreContext::open_dir(dir.path(), DEFAULT_NAMESPACE)?;

    assert!(ctx.cart.is_empty());

    ctx.cart.add_to_cart(catalog.cart_item("phone-p8")?);

    let reloaded = StoreContext::open_dir(dir.path(), DEFAULT_NAMESPACE)?;

    assert!(reloaded.cart.is_in_cart("phone-p8"));

    Ok(())
}

#[test]
fn failed_write_keeps_in_memory_state() -> TestResult {
    let catalog = catalog()?;

    let mut storage = MockStorage::new();

    storage.expect_get().returning(|_| Ok(None));
    storage
        .expect_set()
        .returning(|_, _| Err(StorageError::Poisoned));

    let mut ctx = StoreContext::new(Arc::new(storage), DEFAULT_NAMESPACE);

    assert!(ctx.cart.add_to_cart(catalog.cart_item("laptop-x1")?));
    assert!(ctx.cart.is_in_cart("laptop-x1"));

    Ok(())
}
