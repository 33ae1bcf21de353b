//! Store Context

use std::{path::PathBuf, sync::Arc};

use crate::{
    cart::{Cart, CartItem},
    storage::{FileStorage, MemoryStorage, Storage, StorageError, validate_key},
    wishlist::Wishlist,
};

/// Namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "storefront";

/// The shopper's cart and wishlist, sharing one storage port.
///
/// Create one per application session and hand it to whatever needs the stores.
#[derive(Debug)]
pub struct StoreContext {
    /// The cart, persisted under `<namespace>:cart`
    pub cart: Cart,

    /// The wishlist, persisted under `<namespace>:wishlist`
    pub wishlist: Wishlist,
}

impl StoreContext {
    /// Load both stores from `storage` under `namespace`.
    pub fn new(storage: Arc<dyn Storage>, namespace: &str) -> Self {
        Self {
            cart: Cart::load(Arc::clone(&storage), storage_key(namespace, "cart")),
            wishlist: Wishlist::load(storage, storage_key(namespace, "wishlist")),
        }
    }

    /// Stores that live only as long as the process.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()), DEFAULT_NAMESPACE)
    }

    /// Stores persisted to files in `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidKey`] if the namespace cannot be used in
    /// file names, or [`StorageError::Io`] if the directory cannot be created.
    pub fn open_dir(dir: impl Into<PathBuf>, namespace: &str) -> Result<Self, StorageError> {
        validate_key(&storage_key(namespace, "cart"))?;
        validate_key(&storage_key(namespace, "wishlist"))?;

        let storage = FileStorage::open(dir)?;

        Ok(Self::new(Arc::new(storage), namespace))
    }

    /// Move a saved product from the wishlist into the cart.
    ///
    /// The wishlist entry is removed even when the product is already in the
    /// cart. Returns `true` if the cart gained the item.
    pub fn move_to_cart(&mut self, item: CartItem) -> bool {
        self.wishlist.remove_from_wishlist(item.id.as_str());
        self.cart.add_to_cart(item)
    }
}

/// Storage key of a collection within a namespace.
pub fn storage_key(namespace: &str, collection: &str) -> String {
    format!("{namespace}:{collection}")
}
