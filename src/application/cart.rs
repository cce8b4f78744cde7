//! Cart store and its provisioning wrapper.
//!
//! The store holds the ordered list of cart items, applies mutations in
//! memory first, and writes the full list back to device storage as a JSON
//! snapshot under a fixed key. Storage failures never escape a mutation:
//! they are recorded on the store and drained by the caller.

use crate::domain::{Cart, CartError, CartItem, CartResult, Product};
use crate::infrastructure::{KeyValueStorage, STORAGE_KEY};

/// When cart snapshots are written back to storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistMode {
    /// Write the full snapshot synchronously after every mutation.
    WriteThrough,
    /// Mark the store dirty and write only on [`CartStore::flush`].
    Deferred,
}

/// The stateful unit holding and mutating the list of cart items.
///
/// Mutations follow an applied-then-persisted contract: the in-memory list
/// is updated first and is immediately visible through [`products`], then a
/// snapshot write is attempted according to the store's [`PersistMode`]. A
/// failed write is recorded and not retried; the in-memory state always
/// wins.
///
/// [`products`]: CartStore::products
///
/// # Examples
///
/// ```
/// use gomarket::application::{CartStore, PersistMode};
/// use gomarket::domain::Product;
/// use gomarket::infrastructure::MemoryStorage;
///
/// let storage = Box::new(MemoryStorage::default());
/// let mut store = CartStore::load(storage, PersistMode::WriteThrough);
///
/// store.add_to_cart(Product {
///     id: "1".to_string(),
///     title: "Cadeira Rustes".to_string(),
///     image_url: String::new(),
///     price: 57.8,
/// });
///
/// assert_eq!(store.products().len(), 1);
/// assert_eq!(store.products()[0].quantity, 1);
/// ```
pub struct CartStore {
    cart: Cart,
    storage: Box<dyn KeyValueStorage>,
    mode: PersistMode,
    dirty: bool,
    last_storage_error: Option<String>,
}

impl CartStore {
    /// Builds a store by restoring the snapshot under the fixed storage key.
    ///
    /// A missing key yields an empty cart. A read or parse failure also
    /// yields an empty cart, with the failure recorded for
    /// [`take_storage_error`].
    ///
    /// [`take_storage_error`]: CartStore::take_storage_error
    pub fn load(storage: Box<dyn KeyValueStorage>, mode: PersistMode) -> Self {
        let mut last_storage_error = None;

        let cart = match storage.get_item(STORAGE_KEY) {
            Ok(Some(snapshot)) => match serde_json::from_str::<Cart>(&snapshot) {
                Ok(cart) => cart,
                Err(e) => {
                    last_storage_error = Some(format!("Invalid cart snapshot - {}", e));
                    Cart::default()
                }
            },
            Ok(None) => Cart::default(),
            Err(e) => {
                last_storage_error = Some(e);
                Cart::default()
            }
        };

        Self {
            cart,
            storage,
            mode,
            dirty: false,
            last_storage_error,
        }
    }

    /// Current snapshot of the cart, read-only.
    pub fn products(&self) -> &[CartItem] {
        self.cart.items()
    }

    /// Sum of quantities across all entries (the cart badge).
    pub fn total_quantity(&self) -> u32 {
        self.cart.total_quantity()
    }

    /// Sum of quantities across entries with the given id.
    pub fn quantity_of(&self, id: &str) -> u32 {
        self.cart.quantity_of(id)
    }

    /// Appends the product as a new entry with quantity 1.
    ///
    /// Always appends, even when an entry with the same id already exists.
    pub fn add_to_cart(&mut self, product: Product) {
        self.cart.add(product);
        self.after_mutation();
    }

    /// Adds 1 to the quantity of every entry whose id matches. No-op when
    /// nothing matches; the snapshot write still happens.
    pub fn increment(&mut self, id: &str) {
        self.cart.increment(id);
        self.after_mutation();
    }

    /// Subtracts 1 from the quantity of every entry whose id matches,
    /// stopping at 0. Entries stay in the cart at quantity 0.
    pub fn decrement(&mut self, id: &str) {
        self.cart.decrement(id);
        self.after_mutation();
    }

    /// Writes the snapshot now if there are unpersisted mutations.
    pub fn flush(&mut self) {
        if self.dirty {
            self.persist();
        }
    }

    /// True when a mutation has not been followed by a snapshot write.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Takes the most recent storage failure, if any. Draining is the only
    /// way failures surface; mutations never return them.
    pub fn take_storage_error(&mut self) -> Option<CartError> {
        self.last_storage_error.take().map(CartError::StorageFailure)
    }

    fn after_mutation(&mut self) {
        self.dirty = true;
        if self.mode == PersistMode::WriteThrough {
            self.persist();
        }
    }

    fn persist(&mut self) {
        // A failed write is not retried; the next mutation writes a fresh
        // full snapshot anyway.
        self.dirty = false;

        match serde_json::to_string(&self.cart) {
            Ok(snapshot) => {
                if let Err(e) = self.storage.set_item(STORAGE_KEY, &snapshot) {
                    self.last_storage_error = Some(e);
                }
            }
            Err(e) => {
                self.last_storage_error = Some(format!("Serialization failed: {}", e));
            }
        }
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart)
            .field("mode", &self.mode)
            .field("dirty", &self.dirty)
            .field("last_storage_error", &self.last_storage_error)
            .finish_non_exhaustive()
    }
}

/// Provisioning wrapper constructed once per application session.
///
/// Consumers reach the cart only through [`cart`]/[`cart_mut`]; before
/// [`provide`] has run the accessors fail with [`CartError::NotProvided`].
///
/// [`cart`]: CartProvider::cart
/// [`cart_mut`]: CartProvider::cart_mut
/// [`provide`]: CartProvider::provide
#[derive(Debug, Default)]
pub struct CartProvider {
    store: Option<CartStore>,
}

impl CartProvider {
    pub fn new() -> Self {
        Self { store: None }
    }

    /// Provisions the session's cart store, restoring state from the given
    /// storage backend.
    pub fn provide(&mut self, storage: Box<dyn KeyValueStorage>, mode: PersistMode) {
        self.store = Some(CartStore::load(storage, mode));
    }

    pub fn is_provisioned(&self) -> bool {
        self.store.is_some()
    }

    pub fn cart(&self) -> CartResult<&CartStore> {
        self.store.as_ref().ok_or(CartError::NotProvided)
    }

    pub fn cart_mut(&mut self) -> CartResult<&mut CartStore> {
        self.store.as_mut().ok_or(CartError::NotProvided)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::{FileStorage, MemoryStorage};

    fn product(id: &str) -> Product {
        Product {
            id: id.to_string(),
            title: format!("Product {}", id),
            image_url: format!("https://example.com/{}.jpg", id),
            price: 10.0,
        }
    }

    fn memory_store() -> CartStore {
        CartStore::load(Box::new(MemoryStorage::default()), PersistMode::WriteThrough)
    }

    struct FailingStorage;

    impl KeyValueStorage for FailingStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>, String> {
            Err("read failed".to_string())
        }

        fn set_item(&mut self, _key: &str, _value: &str) -> Result<(), String> {
            Err("write failed".to_string())
        }
    }

    struct WriteOnlyFailingStorage;

    impl KeyValueStorage for WriteOnlyFailingStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>, String> {
            Ok(None)
        }

        fn set_item(&mut self, _key: &str, _value: &str) -> Result<(), String> {
            Err("write failed".to_string())
        }
    }

    #[test]
    fn test_add_always_appends() {
        let mut store = memory_store();

        store.add_to_cart(product("a"));
        store.add_to_cart(product("a"));
        store.add_to_cart(product("a"));

        // No dedup: three calls, three entries
        assert_eq!(store.products().len(), 3);
        assert!(store.products().iter().all(|item| item.quantity == 1));
    }

    #[test]
    fn test_increment_absent_id_is_noop() {
        let mut store = memory_store();

        store.increment("missing");
        assert!(store.products().is_empty());

        store.add_to_cart(product("a"));
        store.increment("missing");

        assert_eq!(store.products().len(), 1);
        assert_eq!(store.products()[0].quantity, 1);
    }

    #[test]
    fn test_increment_and_decrement() {
        let mut store = memory_store();
        store.add_to_cart(product("a"));

        store.increment("a");
        assert_eq!(store.products()[0].quantity, 2);

        store.decrement("a");
        assert_eq!(store.products()[0].quantity, 1);
    }

    #[test]
    fn test_decrement_at_one_keeps_entry_at_zero() {
        let mut store = memory_store();
        store.add_to_cart(product("a"));

        store.decrement("a");
        store.decrement("a");

        // Entry stays in the cart at quantity 0, and never goes below
        assert_eq!(store.products().len(), 1);
        assert_eq!(store.products()[0].quantity, 0);

        store.decrement("a");
        assert_eq!(store.products()[0].quantity, 0);
    }

    #[test]
    fn test_decrement_absent_id_is_noop() {
        let mut store = memory_store();
        store.add_to_cart(product("a"));

        store.decrement("missing");

        assert_eq!(store.products()[0].quantity, 1);
    }

    #[test]
    fn test_duplicate_ids_all_match() {
        let mut store = memory_store();
        store.add_to_cart(product("a"));
        store.add_to_cart(product("a"));

        store.increment("a");

        // Mutations map over the whole list, so both copies are touched
        assert_eq!(store.products()[0].quantity, 2);
        assert_eq!(store.products()[1].quantity, 2);
    }

    #[test]
    fn test_single_item_lifecycle() {
        let mut store = memory_store();

        store.add_to_cart(product("a"));
        assert_eq!(store.products().len(), 1);
        assert_eq!(store.products()[0].id, "a");
        assert_eq!(store.products()[0].quantity, 1);

        store.increment("a");
        assert_eq!(store.products()[0].quantity, 2);

        store.decrement("a");
        store.decrement("a");
        assert_eq!(store.products().len(), 1);
        assert_eq!(store.products()[0].quantity, 0);
    }

    #[test]
    fn test_total_and_per_id_quantities() {
        let mut store = memory_store();
        store.add_to_cart(product("a"));
        store.add_to_cart(product("b"));
        store.increment("b");

        assert_eq!(store.total_quantity(), 3);
        assert_eq!(store.quantity_of("a"), 1);
        assert_eq!(store.quantity_of("b"), 2);
        assert_eq!(store.quantity_of("c"), 0);
    }

    #[test]
    fn test_round_trip_through_file_storage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        {
            let storage = Box::new(FileStorage::open(&path).unwrap());
            let mut store = CartStore::load(storage, PersistMode::WriteThrough);
            store.add_to_cart(product("a"));
            store.add_to_cart(product("b"));
            store.increment("b");
        }

        let storage = Box::new(FileStorage::open(&path).unwrap());
        let reloaded = CartStore::load(storage, PersistMode::WriteThrough);

        assert_eq!(reloaded.products().len(), 2);
        assert_eq!(reloaded.products()[0].id, "a");
        assert_eq!(reloaded.products()[0].quantity, 1);
        assert_eq!(reloaded.products()[1].id, "b");
        assert_eq!(reloaded.products()[1].quantity, 2);
    }

    #[test]
    fn test_snapshot_is_a_bare_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let storage = Box::new(FileStorage::open(&path).unwrap());
        let mut store = CartStore::load(storage, PersistMode::WriteThrough);
        store.add_to_cart(product("a"));

        let peek = FileStorage::open(&path).unwrap();
        let value = peek.get_item(STORAGE_KEY).unwrap().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&value).unwrap();

        assert!(parsed.is_array());
        assert_eq!(parsed[0]["id"], "a");
        assert_eq!(parsed[0]["quantity"], 1);
    }

    #[test]
    fn test_read_failure_starts_empty() {
        let mut store = CartStore::load(Box::new(FailingStorage), PersistMode::WriteThrough);

        assert!(store.products().is_empty());
        assert!(matches!(
            store.take_storage_error(),
            Some(CartError::StorageFailure(_))
        ));
    }

    #[test]
    fn test_corrupt_snapshot_starts_empty() {
        let mut backing = MemoryStorage::default();
        backing.set_item(STORAGE_KEY, "not json").unwrap();

        let mut store = CartStore::load(Box::new(backing), PersistMode::WriteThrough);

        assert!(store.products().is_empty());
        assert!(store.take_storage_error().is_some());
    }

    #[test]
    fn test_write_failure_state_continues() {
        let mut store =
            CartStore::load(Box::new(WriteOnlyFailingStorage), PersistMode::WriteThrough);

        store.add_to_cart(product("a"));

        // The mutation applied even though the snapshot write failed
        assert_eq!(store.products().len(), 1);
        let error = store.take_storage_error().unwrap();
        assert_eq!(
            error,
            CartError::StorageFailure("write failed".to_string())
        );

        // No retry, and later mutations still apply
        store.add_to_cart(product("b"));
        assert_eq!(store.products().len(), 2);
        assert!(store.take_storage_error().is_some());
    }

    #[test]
    fn test_take_storage_error_drains() {
        let mut store = CartStore::load(Box::new(FailingStorage), PersistMode::WriteThrough);

        assert!(store.take_storage_error().is_some());
        assert!(store.take_storage_error().is_none());
    }

    #[test]
    fn test_deferred_mode_writes_on_flush() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let storage = Box::new(FileStorage::open(&path).unwrap());
        let mut store = CartStore::load(storage, PersistMode::Deferred);

        store.add_to_cart(product("a"));
        store.increment("a");
        assert!(store.is_dirty());

        // Nothing on disk until flush
        let peek = FileStorage::open(&path).unwrap();
        assert_eq!(peek.get_item(STORAGE_KEY).unwrap(), None);

        store.flush();
        assert!(!store.is_dirty());

        // Flush wrote the latest snapshot, not the intermediate ones
        let peek = FileStorage::open(&path).unwrap();
        let value = peek.get_item(STORAGE_KEY).unwrap().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&value).unwrap();
        assert_eq!(parsed[0]["quantity"], 2);
    }

    #[test]
    fn test_flush_without_mutations_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let storage = Box::new(FileStorage::open(&path).unwrap());
        let mut store = CartStore::load(storage, PersistMode::Deferred);

        store.flush();

        let peek = FileStorage::open(&path).unwrap();
        assert_eq!(peek.get_item(STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_provider_fails_before_provisioning() {
        let mut provider = CartProvider::new();

        assert!(!provider.is_provisioned());
        assert_eq!(provider.cart().unwrap_err(), CartError::NotProvided);
        assert_eq!(provider.cart_mut().unwrap_err(), CartError::NotProvided);
    }

    #[test]
    fn test_provider_hands_out_store_after_provisioning() {
        let mut provider = CartProvider::new();
        provider.provide(Box::new(MemoryStorage::default()), PersistMode::WriteThrough);

        assert!(provider.is_provisioned());
        provider.cart_mut().unwrap().add_to_cart(product("a"));
        assert_eq!(provider.cart().unwrap().products().len(), 1);
    }
}
