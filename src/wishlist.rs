//! Wishlist

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    collection::{Keyed, PersistedCollection},
    products::ProductId,
    storage::Storage,
};

/// A product saved for later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
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

    /// Type label
    #[serde(rename = "type")]
    pub kind: String,

    /// Size or SKU code
    pub sku: String,

    /// Whether the product is featured in the storefront
    pub is_featured: bool,
}

impl Keyed for WishlistItem {
    fn id(&self) -> &ProductId {
        &self.id
    }
}

/// The shopper's wishlist, independent from the cart.
#[derive(Debug)]
pub struct Wishlist {
    items: PersistedCollection<WishlistItem>,
}

impl Wishlist {
    /// Load the wishlist persisted under `key`.
    pub fn load(storage: Arc<dyn Storage>, key: impl Into<String>) -> Self {
        Self {
            items: PersistedCollection::load(storage, key),
        }
    }

    /// Save an item. An item already on the wishlist is left unchanged.
    ///
    /// Returns `true` if the item was added.
    pub fn add_to_wishlist(&mut self, item: WishlistItem) -> bool {
        self.items.insert(item)
    }

    /// Remove the item with the given id; removing an absent id is a no-op.
    ///
    /// Returns `true` if an item was removed.
    pub fn remove_from_wishlist(&mut self, id: &str) -> bool {
        self.items.remove(id).is_some()
    }

    /// Check whether the product is on the wishlist.
    pub fn is_in_wishlist(&self, id: &str) -> bool {
        self.items.contains(id)
    }

    /// Look up a wishlist item.
    pub fn get(&self, id: &str) -> Option<&WishlistItem> {
        self.items.get(id)
    }

    /// Items in the order they were saved.
    pub fn items(&self) -> &[WishlistItem] {
        self.items.items()
    }

    /// Saved items flagged as featured.
    pub fn featured(&self) -> impl Iterator<Item = &WishlistItem> {
        self.items.items().iter().filter(|item| item.is_featured)
    }

    /// Number of saved products.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the wishlist is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Remove every saved item.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}
