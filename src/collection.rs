//! Persisted Collections
//!
//! The keyed, storage-backed collection the cart and the wishlist are built on.

use std::{fmt, sync::Arc};

use rustc_hash::FxHashSet;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::{products::ProductId, storage::Storage};

/// Something stored in a collection under a product id.
pub trait Keyed {
    /// The key of this entry.
    fn id(&self) -> &ProductId;
}

/// An insertion-ordered collection holding at most one entry per product id.
///
/// Every change is written to the storage port as a JSON array under the
/// collection key. Write failures are logged and otherwise ignored: the
/// in-memory entries stay authoritative, and because each write stores the
/// full collection the next successful write brings storage back in line.
pub struct PersistedCollection<T> {
    key: String,
    items: Vec<T>,
    storage: Arc<dyn Storage>,
}

impl<T: Keyed + Serialize + DeserializeOwned> PersistedCollection<T> {
    /// Load the collection stored under `key`, or start empty.
    ///
    /// Unreadable or corrupt stored values are logged and discarded.
    pub fn load(storage: Arc<dyn Storage>, key: impl Into<String>) -> Self {
        let key = key.into();

        let items = match storage.get(&key) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<T>>(&raw) {
                Ok(items) => unique_by_id(items),
                Err(error) => {
                    warn!(key = %key, %error, "discarding unreadable persisted collection");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(error) => {
                warn!(key = %key, %error, "failed to read persisted collection");
                Vec::new()
            }
        };

        debug!(key = %key, len = items.len(), "loaded collection");

        Self {
            key,
            items,
            storage,
        }
    }

    /// Insert an entry unless one with the same id is already present.
    ///
    /// Returns `true` if the entry was inserted.
    pub fn insert(&mut self, item: T) -> bool {
        if self.contains(item.id().as_str()) {
            debug!(key = %self.key, id = %item.id(), "entry already present");
            return false;
        }

        debug!(key = %self.key, id = %item.id(), "inserting entry");

        self.items.push(item);
        self.persist();

        true
    }

    /// Remove the entry with the given id, returning it if it was present.
    pub fn remove(&mut self, id: &str) -> Option<T> {
        let position = self
            .items
            .iter()
            .position(|item| item.id().as_str() == id)?;

        let removed = self.items.remove(position);

        debug!(key = %self.key, id, "removed entry");

        self.persist();

        Some(removed)
    }

    /// Check whether an entry with the given id is present.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Look up an entry by id.
    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id().as_str() == id)
    }

    /// Entries in insertion order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        if self.items.is_empty() {
            return;
        }

        self.items.clear();
        self.persist();
    }

    /// Storage key the collection is written under.
    pub fn key(&self) -> &str {
        &self.key
    }

    fn persist(&self) {
        let raw = match serde_json::to_string(&self.items) {
            Ok(raw) => raw,
            Err(error) => {
                warn!(key = %self.key, %error, "failed to serialize collection");
                return;
            }
        };

        if let Err(error) = self.storage.set(&self.key, &raw) {
            warn!(key = %self.key, %error, "failed to persist collection; keeping in-memory state");
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for PersistedCollection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistedCollection")
            .field("key", &self.key)
            .field("items", &self.items)
            .finish_non_exhaustive()
    }
}

/// Keep the first entry for each id.
fn unique_by_id<T: Keyed>(items: Vec<T>) -> Vec<T> {
    let mut seen = FxHashSet::default();

    items
        .into_iter()
        .filter(|item| seen.insert(item.id().clone()))
        .collect()
}
