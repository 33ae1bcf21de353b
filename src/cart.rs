//! Cart

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    collection::{Keyed, PersistedCollection},
    products::ProductId,
    storage::Storage,
};

/// A product the shopper intends to purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Product identifier
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Unit price in minor currency units (pence/cents)
    pub price: u64,

    /// ISO currency code of `price`
    pub currency: String,

    /// Product image URL
    pub image: String,

    /// Product category
    pub category: String,

    /// Product brand
    pub brand: String,

    /// Condition label, e.g. "new" or "refurbished"
    pub condition: String,

    /// Units in stock
    pub stock: u32,

    /// Model or SKU code
    pub model: String,
}

impl Keyed for CartItem {
    fn id(&self) -> &ProductId {
        &self.id
    }
}

/// The shopper's cart.
///
/// Holds at most one entry per product; quantities are chosen at checkout.
#[derive(Debug)]
pub struct Cart {
    items: PersistedCollection<CartItem>,
}

impl Cart {
    /// Load the cart persisted under `key`.
    pub fn load(storage: Arc<dyn Storage>, key: impl Into<String>) -> Self {
        Self {
            items: PersistedCollection::load(storage, key),
        }
    }

    /// Add an item. An item already in the cart is left unchanged.
    ///
    /// Returns `true` if the item was added.
    pub fn add_to_cart(&mut self, item: CartItem) -> bool {
        self.items.insert(item)
    }

    /// Remove the item with the given id; removing an absent id is a no-op.
    ///
    /// Returns `true` if an item was removed.
    pub fn remove_from_cart(&mut self, id: &str) -> bool {
        self.items.remove(id).is_some()
    }

    /// Check whether the product is in the cart.
    pub fn is_in_cart(&self, id: &str) -> bool {
        self.items.contains(id)
    }

    /// Look up a cart item.
    pub fn get(&self, id: &str) -> Option<&CartItem> {
        self.items.get(id)
    }

    /// Items in the order they were added.
    pub fn items(&self) -> &[CartItem] {
        self.items.items()
    }

    /// Number of distinct products in the cart.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Empty the cart, e.g. once an order has been placed.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use testresult::TestResult;

    use crate::storage::MemoryStorage;

    use super::*;

    pub(crate) fn cart_item(id: &str, price: u64) -> CartItem {
        CartItem {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price,
            currency: "USD".to_string(),
            image: format!("https://cdn.example.com/{id}.jpg"),
            category: "laptops".to_string(),
            brand: "Acme".to_string(),
            condition: "new".to_string(),
            stock: 5,
            model: format!("ACM-{id}"),
        }
    }

    fn empty_cart() -> Cart {
        Cart::load(Arc::new(MemoryStorage::new()), "test:cart")
    }

    #[test]
    fn add_then_contains() {
        let mut cart = empty_cart();

        assert!(cart.add_to_cart(cart_item("p1", 1000)));
        assert!(cart.is_in_cart("p1"));
        assert!(!cart.is_in_cart("p2"));
    }

    #[test]
    fn add_twice_keeps_original_entry() {
        let mut cart = empty_cart();

        cart.add_to_cart(cart_item("p1", 1000));

        assert!(!cart.add_to_cart(cart_item("p1", 1)));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get("p1").map(|item| item.price), Some(1000));
    }

    #[test]
    fn remove_missing_is_no_op() {
        let mut cart = empty_cart();

        cart.add_to_cart(cart_item("p1", 1000));

        assert!(!cart.remove_from_cart("nope"));
        assert_eq!(cart.len(), 1);

        assert!(cart.remove_from_cart("p1"));
        assert!(cart.is_empty());
    }

    #[test]
    fn items_keep_insertion_order() {
        let mut cart = empty_cart();

        cart.add_to_cart(cart_item("b", 1));
        cart.add_to_cart(cart_item("a", 2));
        cart.add_to_cart(cart_item("c", 3));

        let ids: Vec<&str> = cart.items().iter().map(|item| item.id.as_str()).collect();

        assert_eq!(ids, ["b", "a", "c"]);
    }

    #[test]
    fn clear_empties_cart_and_storage() -> TestResult {
        let storage = Arc::new(MemoryStorage::new());
        let mut cart = Cart::load(storage.clone(), "test:cart");

        cart.add_to_cart(cart_item("p1", 1000));
        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(storage.get("test:cart")?, Some("[]".to_string()));

        Ok(())
    }

    #[test]
    fn serializes_with_camel_case_fields() -> TestResult {
        let json = serde_json::to_value(cart_item("p1", 1999))?;

        assert_eq!(json["id"], "p1");
        assert_eq!(json["price"], 1999);
        assert_eq!(json["currency"], "USD");
        assert_eq!(json["stock"], 5);
        assert_eq!(json["model"], "ACM-p1");

        Ok(())
    }
}
